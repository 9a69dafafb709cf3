use std::fs;

use super::*;
use tempfile::TempDir;

fn files_of(entries: &[ScanEntry], root: &Path) -> Vec<String> {
    entries
        .iter()
        .filter_map(|entry| match entry {
            ScanEntry::File(path) => Some(
                path.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/"),
            ),
            ScanEntry::Unreadable { .. } => None,
        })
        .collect()
}

#[test]
fn finds_class_files_recursively_in_name_order() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("com/example")).unwrap();
    fs::write(root.join("com/example/B.class"), b"").unwrap();
    fs::write(root.join("com/example/A.CLASS"), b"").unwrap();
    fs::write(root.join("com/example/notes.txt"), b"").unwrap();
    fs::write(root.join("Top.class"), b"").unwrap();

    let entries = DirectoryScanner::new(ClassFileFilter).scan(root);
    assert_eq!(
        files_of(&entries, root),
        vec!["Top.class", "com/example/A.CLASS", "com/example/B.class"]
    );
}

#[test]
fn folders_named_like_classes_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("odd.class")).unwrap();
    let entries = DirectoryScanner::new(ClassFileFilter).scan(temp_dir.path());
    assert!(entries.is_empty());
}

#[test]
fn missing_root_is_unreadable() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("absent");
    let entries = DirectoryScanner::new(ClassFileFilter).scan(&root);
    assert!(matches!(
        entries.as_slice(),
        [ScanEntry::Unreadable { path, .. }] if *path == root
    ));
}

#[cfg(unix)]
#[test]
fn linked_class_files_and_folders_are_followed() {
    use std::os::unix::fs::symlink;

    let temp_dir = TempDir::new().unwrap();
    let store = temp_dir.path().join("store");
    fs::create_dir_all(store.join("pkg")).unwrap();
    fs::write(store.join("Real.class"), b"").unwrap();
    fs::write(store.join("pkg/Deep.class"), b"").unwrap();

    let root = temp_dir.path().join("classes");
    fs::create_dir_all(&root).unwrap();
    symlink(store.join("Real.class"), root.join("Linked.class")).unwrap();
    symlink(store.join("pkg"), root.join("pkg")).unwrap();

    let entries = DirectoryScanner::new(ClassFileFilter).scan(&root);
    assert_eq!(files_of(&entries, &root), vec!["Linked.class", "pkg/Deep.class"]);
}

#[cfg(unix)]
#[test]
fn dangling_link_is_reported() {
    use std::os::unix::fs::symlink;

    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("A.class"), b"").unwrap();
    symlink(root.join("gone.class"), root.join("Broken.class")).unwrap();

    let entries = DirectoryScanner::new(ClassFileFilter).scan(root);
    assert_eq!(files_of(&entries, root), vec!["A.class"]);
    assert!(entries.iter().any(|entry| matches!(
        entry,
        ScanEntry::Unreadable { path, .. } if path.ends_with("Broken.class")
    )));
}
