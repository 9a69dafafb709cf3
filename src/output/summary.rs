use std::time::Duration;

use crate::processor::{AnnotationCounts, MetaAnnotation};

/// Totals of a directory check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckSummary {
    pub processed_classes: usize,
    pub annotations: AnnotationCounts,
    pub version_violations: usize,
    pub info: usize,
    pub warnings: usize,
    pub errors: usize,
    pub elapsed: Duration,
    /// Message of the processor abort that stopped the run early.
    pub aborted: Option<String>,
}

impl CheckSummary {
    #[must_use]
    pub fn detected(&self, kind: MetaAnnotation) -> usize {
        self.annotations.get(kind)
    }

    #[must_use]
    pub const fn has_messages(&self) -> bool {
        self.info + self.warnings + self.errors != 0
    }

    #[must_use]
    pub const fn passed(&self) -> bool {
        self.errors == 0 && self.aborted.is_none()
    }
}

/// Totals of an archive check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JarSummary {
    pub processed_classes: usize,
    pub illegal_class_versions: usize,
    /// Highest class file major version seen.
    pub max_major_version: Option<u16>,
    pub errors: usize,
    pub elapsed: Duration,
}

impl JarSummary {
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.errors == 0
    }
}
