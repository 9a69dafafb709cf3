use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetaCheckerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed class file: {0}")]
    ClassFormat(String),

    #[error("Invalid pattern: {pattern}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid regular expression: {0}")]
    Regex(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON serialization error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Raised by a processor to stop the whole run immediately.
    #[error("Aborted: {0}")]
    Abort(String),
}

impl MetaCheckerError {
    /// Short category name used in error output.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Config(_) | Self::TomlParse(_) => "Config",
            Self::FileRead { .. } => "FileRead",
            Self::ClassFormat(_) => "ClassFormat",
            Self::InvalidPattern { .. } | Self::Regex(_) => "Pattern",
            Self::Io(_) => "IO",
            Self::JsonSerialize(_) => "JSON",
            Self::Archive(_) => "Archive",
            Self::Abort(_) => "Abort",
        }
    }

    /// Returns the underlying cause if there is one worth printing.
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::FileRead { source, .. } => Some(source.to_string()),
            Self::InvalidPattern { source, .. } => Some(source.to_string()),
            _ => None,
        }
    }

    #[must_use]
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Config(_) => Some("Check option values and the config file format"),
            Self::TomlParse(_) => Some("Check TOML syntax of the config file"),
            Self::FileRead { source, .. } | Self::Io(source) => match source.kind() {
                std::io::ErrorKind::NotFound => Some("Check that the file path exists"),
                std::io::ErrorKind::PermissionDenied => Some("Check file permissions"),
                _ => None,
            },
            Self::InvalidPattern { .. } | Self::Regex(_) => {
                Some("Check pattern syntax ('*' and '?' wildcards)")
            }
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_abort(&self) -> bool {
        matches!(self, Self::Abort(_))
    }
}

pub type Result<T> = std::result::Result<T, MetaCheckerError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
