use std::fs::File;
use std::io::Write;
use std::path::Path;

use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::*;
use crate::classfile::test_fixtures::ClassBuilder;
use crate::config::DEFAULT_OUTPUT_ERROR_LIMIT;
use crate::context::RecordingReporter;

const MANIFEST: &str = "Manifest-Version: 1.0\r\n\
Main-Class: com.example.Main\r\n\
Created-By: test\r\n\
\r\n\
Name: com/example/\r\n\
Sealed: true\r\n\
\r\n";

enum Item<'a> {
    Dir(&'a str),
    File(&'a str, Vec<u8>),
}

fn class(name: &str, major: u16) -> Vec<u8> {
    ClassBuilder::new(name).major(major).build()
}

fn write_jar(path: &Path, items: Vec<Item<'_>>) {
    let mut writer = ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default();
    for item in items {
        match item {
            Item::Dir(name) => writer.add_directory(name, options).unwrap(),
            Item::File(name, bytes) => {
                writer.start_file(name, options).unwrap();
                writer.write_all(&bytes).unwrap();
            }
        }
    }
    writer.finish().unwrap();
}

fn sample_jar(dir: &Path) -> PathBuf {
    let path = dir.join("app.jar");
    write_jar(
        &path,
        vec![
            Item::Dir("META-INF/"),
            Item::File("META-INF/MANIFEST.MF", MANIFEST.as_bytes().to_vec()),
            Item::File("META-INF/versions/9/module-info.class", class("module-info", 0x35)),
            Item::Dir("com/example/"),
            Item::File("com/example/Main.class", class("com/example/Main", 0x34)),
            Item::File("com/example/api/Service.class", class("com/example/api/Service", 0x34)),
            Item::File(
                "com/example/api/ServiceTest.class",
                class("com/example/api/ServiceTest", 0x37),
            ),
            Item::File("config/app.properties", b"key=value\n".to_vec()),
        ],
    );
    path
}

fn options(archive: &Path, config: JarConfig) -> JarOptions {
    JarOptions::from_config(&JarConfig {
        archive: Some(archive.to_path_buf()),
        ..config
    })
    .unwrap()
}

fn run(options: &JarOptions) -> (JarSummary, RecordingReporter) {
    let reporter = RecordingReporter::new();
    let summary =
        check_archive(options, Box::new(reporter.clone()), &AtomicBool::new(false)).unwrap();
    (summary, reporter)
}

// =============================================================================
// Option decoding
// =============================================================================

#[test]
fn archive_must_be_defined() {
    let result = JarOptions::from_config(&JarConfig::default());
    assert!(matches!(result, Err(MetaCheckerError::Config(_))));
}

#[test]
fn broken_pattern_is_rejected() {
    let result = JarOptions::from_config(&JarConfig {
        archive: Some(PathBuf::from("app.jar")),
        unexpected: vec!["**/[abc.txt".into()],
        ..JarConfig::default()
    });
    assert!(matches!(result, Err(MetaCheckerError::InvalidPattern { .. })));
}

#[test]
fn cli_overrides_extend_lists() {
    let mut config = JarConfig {
        archive: Some(PathBuf::from("old.jar")),
        expected: vec!["**/Main.class".into()],
        ..JarConfig::default()
    };
    let args = JarArgs {
        archive: Some(PathBuf::from("new.jar")),
        expected: vec!["**/*.properties".into()],
        manifest_has_not: vec!["Class-Path".into()],
        limit_illegal_versions: Some(5),
        ..JarArgs::default()
    };
    apply_jar_overrides(&mut config, &args);

    assert_eq!(config.archive, Some(PathBuf::from("new.jar")));
    assert_eq!(config.expected, vec!["**/Main.class", "**/*.properties"]);
    assert_eq!(config.manifest_has_not, vec!["Class-Path"]);
    assert_eq!(config.limit_illegal_class_version_errors, 5);
    assert_eq!(config.limit_output_errors, DEFAULT_OUTPUT_ERROR_LIMIT);
}

#[test]
fn class_names_come_from_entry_paths() {
    assert_eq!(class_name_of("com/example/Main.class"), "com.example.Main");
    assert_eq!(class_name_of("Root.CLASS"), "Root");
}

// =============================================================================
// Archive runs
// =============================================================================

#[test]
fn missing_archive_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let options = options(&temp_dir.path().join("absent.jar"), JarConfig::default());
    let err = check_archive(&options, Box::new(RecordingReporter::new()), &AtomicBool::new(false))
        .unwrap_err();
    assert!(err.to_string().contains("Can't find archive file: "));
}

#[test]
fn plain_archive_passes() {
    let temp_dir = TempDir::new().unwrap();
    let jar = sample_jar(temp_dir.path());

    let (summary, reporter) = run(&options(&jar, JarConfig::default()));
    assert_eq!(summary.processed_classes, 3);
    assert_eq!(summary.max_major_version, Some(0x37));
    assert_eq!(summary.illegal_class_versions, 0);
    assert!(summary.passed());
    assert!(reporter.records().is_empty());
}

#[test]
fn version_violations_name_the_class() {
    let temp_dir = TempDir::new().unwrap();
    let jar = sample_jar(temp_dir.path());

    let (summary, reporter) = run(&options(
        &jar,
        JarConfig {
            restrict_class_format: Some("<=8".into()),
            ..JarConfig::default()
        },
    ));
    assert_eq!(summary.illegal_class_versions, 1);
    assert_eq!(summary.errors, 1);
    assert_eq!(
        reporter.messages(Severity::Error),
        vec!["Detected class version violation 11.0 : com.example.api.ServiceTest"]
    );
}

#[test]
fn include_and_exclude_select_classes() {
    let temp_dir = TempDir::new().unwrap();
    let jar = sample_jar(temp_dir.path());

    let (summary, _) = run(&options(
        &jar,
        JarConfig {
            restrict_class_format: Some("8".into()),
            include: vec!["com/example/api/".into()],
            exclude: vec!["**/*Test.class".into()],
            ..JarConfig::default()
        },
    ));
    assert_eq!(summary.processed_classes, 1);
    assert_eq!(summary.max_major_version, Some(0x34));
    assert!(summary.passed());
}

#[test]
fn expected_resources() {
    let temp_dir = TempDir::new().unwrap();
    let jar = sample_jar(temp_dir.path());

    let (summary, reporter) = run(&options(
        &jar,
        JarConfig {
            expected: vec!["**/Main.class".into(), "**/*.xml".into()],
            ..JarConfig::default()
        },
    ));
    assert_eq!(summary.errors, 1);
    assert_eq!(
        reporter.messages(Severity::Info),
        vec!["Contains com/example/Main.class (pattern: **/Main.class)"]
    );
    assert_eq!(
        reporter.messages(Severity::Error),
        vec!["Can't find resource for pattern: **/*.xml"]
    );
}

#[test]
fn unexpected_resource_counts_hit_and_pattern() {
    let temp_dir = TempDir::new().unwrap();
    let jar = sample_jar(temp_dir.path());

    let (summary, reporter) = run(&options(
        &jar,
        JarConfig {
            unexpected: vec!["config/*.properties".into(), "**/*.kt".into()],
            ..JarConfig::default()
        },
    ));
    assert_eq!(summary.errors, 2);
    assert_eq!(
        reporter.messages(Severity::Error),
        vec![
            "Detected unexpected config/app.properties (pattern: config/*.properties)",
            "Detected unexpected resource for pattern: config/*.properties",
        ]
    );
}

#[test]
fn manifest_keys() {
    let temp_dir = TempDir::new().unwrap();
    let jar = sample_jar(temp_dir.path());

    let (summary, reporter) = run(&options(
        &jar,
        JarConfig {
            manifest_has: vec!["main-class".into(), "com/example/".into(), "Class-Path".into()],
            manifest_has_not: vec!["Created-By".into(), "Sealed".into()],
            ..JarConfig::default()
        },
    ));
    assert_eq!(summary.errors, 2);
    assert_eq!(
        reporter.messages(Severity::Error),
        vec![
            "Can't find key 'Class-Path' in MANIFEST.MF",
            "Detected key 'Created-By' in MANIFEST.MF",
        ]
    );
}

#[test]
fn missing_manifest_is_one_error() {
    let temp_dir = TempDir::new().unwrap();
    let jar = temp_dir.path().join("bare.jar");
    write_jar(&jar, vec![Item::File("A.class", class("A", 0x34))]);

    let (summary, reporter) = run(&options(
        &jar,
        JarConfig {
            manifest_has: vec!["Main-Class".into()],
            ..JarConfig::default()
        },
    ));
    assert_eq!(summary.errors, 1);
    assert_eq!(summary.processed_classes, 1);
    assert_eq!(
        reporter.messages(Severity::Error),
        vec!["Java can't find MANIFEST.MF in the archive"]
    );
}

#[test]
fn output_limit_keeps_counting() {
    let temp_dir = TempDir::new().unwrap();
    let jar = sample_jar(temp_dir.path());

    let (summary, reporter) = run(&options(
        &jar,
        JarConfig {
            expected: vec!["a/**".into(), "b/**".into(), "c/**".into()],
            limit_output_errors: 1,
            ..JarConfig::default()
        },
    ));
    assert_eq!(summary.errors, 3);
    assert_eq!(reporter.messages(Severity::Error).len(), 1);
}

#[test]
fn illegal_version_limit() {
    let temp_dir = TempDir::new().unwrap();
    let jar = temp_dir.path().join("new.jar");
    write_jar(
        &jar,
        vec![
            Item::File("A.class", class("A", 0x37)),
            Item::File("B.class", class("B", 0x3D)),
            Item::File("C.class", class("C", 0x99)),
        ],
    );

    let (summary, reporter) = run(&options(
        &jar,
        JarConfig {
            restrict_class_format: Some("<9".into()),
            limit_illegal_class_version_errors: 1,
            ..JarConfig::default()
        },
    ));
    assert_eq!(summary.illegal_class_versions, 3);
    assert_eq!(summary.errors, 3);
    assert_eq!(summary.max_major_version, Some(0x99));
    assert_eq!(
        reporter.messages(Severity::Error),
        vec!["Detected class version violation 11.0 : A"]
    );
}

#[test]
fn unreadable_class_header_stops_the_run() {
    let temp_dir = TempDir::new().unwrap();
    let jar = temp_dir.path().join("broken.jar");
    write_jar(&jar, vec![Item::File("Broken.class", b"nope".to_vec())]);

    let err = check_archive(
        &options(&jar, JarConfig::default()),
        Box::new(RecordingReporter::new()),
        &AtomicBool::new(false),
    )
    .unwrap_err();
    assert!(matches!(&err, MetaCheckerError::ClassFormat(message) if message.contains("Broken.class")));
}

#[test]
fn interrupted_run_reads_no_entries() {
    let temp_dir = TempDir::new().unwrap();
    let jar = sample_jar(temp_dir.path());

    let summary = check_archive(
        &options(&jar, JarConfig::default()),
        Box::new(RecordingReporter::new()),
        &AtomicBool::new(true),
    )
    .unwrap();
    assert_eq!(summary.processed_classes, 0);
    assert_eq!(summary.max_major_version, None);
}
