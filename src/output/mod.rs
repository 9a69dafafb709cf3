mod error_output;
mod json;
mod summary;
mod text;

use std::time::Duration;

pub use error_output::ErrorOutput;
pub use json::JsonFormatter;
pub use summary::{CheckSummary, JarSummary};
pub use text::TextFormatter;

use crate::error::Result;

/// Line printed between the banner, the findings and the summary.
pub const DELIMITER: &str = "................................";

/// Trait for rendering run summaries.
pub trait OutputFormatter {
    /// Render the summary of a directory check.
    ///
    /// # Errors
    /// Returns an error if the formatting fails.
    fn format_check(&self, summary: &CheckSummary) -> Result<String>;

    /// Render the summary of an archive check.
    ///
    /// # Errors
    /// Returns an error if the formatting fails.
    fn format_jar(&self, summary: &JarSummary) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    #[must_use]
    pub fn formatter(self) -> Box<dyn OutputFormatter> {
        match self {
            Self::Text => Box::new(TextFormatter),
            Self::Json => Box::new(JsonFormatter),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

/// Render a duration as `HH:MM:SS.mmm`.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    let hours = millis / 3_600_000;
    let minutes = (millis / 60_000) % 60;
    let seconds = (millis / 1000) % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{:03}", millis % 1000)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
