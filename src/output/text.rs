use std::fmt::Write;

use crate::error::Result;
use crate::jversion::JavaVersion;
use crate::processor::MetaAnnotation;

use super::{CheckSummary, DELIMITER, JarSummary, OutputFormatter, format_duration};

/// Plain text summary with right aligned labels.
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn format_check(&self, summary: &CheckSummary) -> Result<String> {
        let mut output = String::new();
        if summary.has_messages() {
            writeln!(output, "{DELIMITER}").ok();
        }
        let rows = [
            ("Processed classes", summary.processed_classes),
            ("Detected annotations", summary.annotations.total()),
            ("Detected To-Do", summary.detected(MetaAnnotation::ToDo)),
            ("Detected risks", summary.detected(MetaAnnotation::Risky)),
            (
                "Detected experimental",
                summary.detected(MetaAnnotation::Experimental),
            ),
            ("Class version violation(s)", summary.version_violations),
            ("Total warnings", summary.warnings),
            ("Total errors", summary.errors),
        ];
        for (label, value) in rows {
            writeln!(output, "{label:>27}: {value}").ok();
        }
        writeln!(output, "{DELIMITER}").ok();
        writeln!(
            output,
            " Total spent time: {}",
            format_duration(summary.elapsed)
        )
        .ok();
        if let Some(message) = &summary.aborted {
            writeln!(output, "Aborted: {message}").ok();
        }
        Ok(output)
    }

    fn format_jar(&self, summary: &JarSummary) -> Result<String> {
        let mut output = String::new();
        writeln!(output, "Processed {} class(es)", summary.processed_classes).ok();
        if summary.illegal_class_versions > 0 {
            let max = summary
                .max_major_version
                .map_or_else(|| "-".to_string(), JavaVersion::describe_major);
            writeln!(
                output,
                "Total detected illegal class versions {}, detected max JDK version {max}",
                summary.illegal_class_versions
            )
            .ok();
        }
        if summary.errors > 0 {
            writeln!(output, "Detected {} error(s)", summary.errors).ok();
        }
        writeln!(
            output,
            " Total spent time: {}",
            format_duration(summary.elapsed)
        )
        .ok();
        Ok(output)
    }
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
