use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use crate::error::Result;
use crate::jversion::JavaVersion;

use super::{CheckSummary, JarSummary, OutputFormatter, format_duration};

pub struct JsonFormatter;

#[derive(Serialize)]
struct CheckOutput<'a> {
    status: &'static str,
    processed_classes: usize,
    detected_annotations: usize,
    annotations: BTreeMap<&'static str, usize>,
    class_version_violations: usize,
    info: usize,
    warnings: usize,
    errors: usize,
    elapsed: String,
    elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    aborted: Option<&'a str>,
}

#[derive(Serialize)]
struct JarOutput {
    status: &'static str,
    processed_classes: usize,
    illegal_class_versions: usize,
    max_major_version: Option<u16>,
    max_java_version: Option<String>,
    errors: usize,
    elapsed: String,
    elapsed_ms: u64,
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

const fn status(passed: bool) -> &'static str {
    if passed { "passed" } else { "failed" }
}

impl OutputFormatter for JsonFormatter {
    fn format_check(&self, summary: &CheckSummary) -> Result<String> {
        let output = CheckOutput {
            status: status(summary.passed()),
            processed_classes: summary.processed_classes,
            detected_annotations: summary.annotations.total(),
            annotations: summary
                .annotations
                .iter()
                .filter(|(_, count)| *count > 0)
                .map(|(kind, count)| (kind.name(), count))
                .collect(),
            class_version_violations: summary.version_violations,
            info: summary.info,
            warnings: summary.warnings,
            errors: summary.errors,
            elapsed: format_duration(summary.elapsed),
            elapsed_ms: millis(summary.elapsed),
            aborted: summary.aborted.as_deref(),
        };
        Ok(serde_json::to_string_pretty(&output)?)
    }

    fn format_jar(&self, summary: &JarSummary) -> Result<String> {
        let output = JarOutput {
            status: status(summary.passed()),
            processed_classes: summary.processed_classes,
            illegal_class_versions: summary.illegal_class_versions,
            max_major_version: summary.max_major_version,
            max_java_version: summary.max_major_version.map(JavaVersion::describe_major),
            errors: summary.errors,
            elapsed: format_duration(summary.elapsed),
            elapsed_ms: millis(summary.elapsed),
        };
        Ok(serde_json::to_string_pretty(&output)?)
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
