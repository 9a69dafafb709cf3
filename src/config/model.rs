use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Version violations printed before the rest are only counted.
pub const DEFAULT_VIOLATING_CLASS_OUTPUT_LIMIT: usize = 42;

/// Archive mode: errors printed before the rest go to the debug log.
pub const DEFAULT_OUTPUT_ERROR_LIMIT: usize = 65_534;

/// Archive mode: class version violations printed before the ellipsis marker.
pub const DEFAULT_ILLEGAL_VERSION_LIMIT: usize = 52;

/// Root of `.meta-checker.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Directory mode options, `[check]`.
    #[serde(default)]
    pub check: CheckConfig,

    /// Archive mode options, `[jar]`.
    #[serde(default)]
    pub jar: JarConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckConfig {
    /// Folder with compiled classes.
    #[serde(default = "default_target_directory")]
    pub target_directory: PathBuf,

    /// Allowed class format, e.g. `>=1.8` or `<11`.
    #[serde(default)]
    pub restrict_class_format: Option<String>,

    /// Annotation names whose presence fails the run.
    #[serde(default)]
    pub fail_for_annotations: Vec<String>,

    /// Canonical class name masks (`*`, `?`) excluded from the check.
    #[serde(default)]
    pub ignore_classes: Vec<String>,

    #[serde(default)]
    pub check_nullable: bool,

    #[serde(default)]
    pub check_may_contain_null: bool,

    #[serde(default)]
    pub max_allowed_weight: Option<String>,

    #[serde(default)]
    pub max_allowed_time_complexity: Option<String>,

    #[serde(default)]
    pub max_allowed_memory_complexity: Option<String>,

    #[serde(default)]
    pub hide_banner: bool,

    #[serde(default = "default_violating_class_output_limit")]
    pub violating_class_output_limit: usize,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            target_directory: default_target_directory(),
            restrict_class_format: None,
            fail_for_annotations: Vec::new(),
            ignore_classes: Vec::new(),
            check_nullable: false,
            check_may_contain_null: false,
            max_allowed_weight: None,
            max_allowed_time_complexity: None,
            max_allowed_memory_complexity: None,
            hide_banner: false,
            violating_class_output_limit: DEFAULT_VIOLATING_CLASS_OUTPUT_LIMIT,
        }
    }
}

/// Archive checks. Patterns are Ant style (`**/*.class`) and matched against
/// entry paths inside the archive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JarConfig {
    #[serde(default)]
    pub archive: Option<PathBuf>,

    #[serde(default)]
    pub restrict_class_format: Option<String>,

    /// When not empty, only matching class entries are inspected.
    #[serde(default)]
    pub include: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,

    /// Every pattern must match at least one entry.
    #[serde(default)]
    pub expected: Vec<String>,

    /// No pattern may match any entry.
    #[serde(default)]
    pub unexpected: Vec<String>,

    /// Keys that must be present in `META-INF/MANIFEST.MF`.
    #[serde(default)]
    pub manifest_has: Vec<String>,

    /// Keys that must be absent from `META-INF/MANIFEST.MF`.
    #[serde(default)]
    pub manifest_has_not: Vec<String>,

    #[serde(default = "default_output_error_limit")]
    pub limit_output_errors: usize,

    #[serde(default = "default_illegal_version_limit")]
    pub limit_illegal_class_version_errors: usize,
}

impl Default for JarConfig {
    fn default() -> Self {
        Self {
            archive: None,
            restrict_class_format: None,
            include: Vec::new(),
            exclude: Vec::new(),
            expected: Vec::new(),
            unexpected: Vec::new(),
            manifest_has: Vec::new(),
            manifest_has_not: Vec::new(),
            limit_output_errors: DEFAULT_OUTPUT_ERROR_LIMIT,
            limit_illegal_class_version_errors: DEFAULT_ILLEGAL_VERSION_LIMIT,
        }
    }
}

fn default_target_directory() -> PathBuf {
    PathBuf::from("target/classes")
}

const fn default_violating_class_output_limit() -> usize {
    DEFAULT_VIOLATING_CLASS_OUTPUT_LIMIT
}

const fn default_output_error_limit() -> usize {
    DEFAULT_OUTPUT_ERROR_LIMIT
}

const fn default_illegal_version_limit() -> usize {
    DEFAULT_ILLEGAL_VERSION_LIMIT
}
