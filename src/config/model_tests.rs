use super::*;

#[test]
fn check_defaults() {
    let check = CheckConfig::default();
    assert_eq!(check.target_directory, std::path::PathBuf::from("target/classes"));
    assert_eq!(check.violating_class_output_limit, 42);
    assert!(check.restrict_class_format.is_none());
    assert!(!check.check_nullable);
    assert!(!check.hide_banner);
}

#[test]
fn jar_defaults() {
    let jar = JarConfig::default();
    assert_eq!(jar.limit_output_errors, 65_534);
    assert_eq!(jar.limit_illegal_class_version_errors, 52);
    assert!(jar.archive.is_none());
    assert!(jar.manifest_has.is_empty());
}

#[test]
fn empty_document_gives_defaults() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn partial_sections_keep_other_defaults() {
    let config: Config = toml::from_str(
        r#"
[jar]
manifest_has = ["Main-Class"]
limit_illegal_class_version_errors = 3
"#,
    )
    .unwrap();
    assert_eq!(config.jar.manifest_has, vec!["Main-Class"]);
    assert_eq!(config.jar.limit_illegal_class_version_errors, 3);
    assert_eq!(config.jar.limit_output_errors, DEFAULT_OUTPUT_ERROR_LIMIT);
    assert_eq!(config.check, CheckConfig::default());
}
