//! Class file format versions and version restrictions such as `>=7`.

use std::fmt;

use crate::error::{MetaCheckerError, Result};

/// Known Java releases and their class file major versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JavaVersion {
    text: &'static str,
    major: u16,
}

const VERSIONS: &[JavaVersion] = &[
    JavaVersion::new("1.1", 0x2D),
    JavaVersion::new("1.2", 0x2E),
    JavaVersion::new("1.3", 0x2F),
    JavaVersion::new("1.4", 0x30),
    JavaVersion::new("5.0", 0x31),
    JavaVersion::new("6.0", 0x32),
    JavaVersion::new("7.0", 0x33),
    JavaVersion::new("8.0", 0x34),
    JavaVersion::new("9.0", 0x35),
    JavaVersion::new("10.0", 0x36),
    JavaVersion::new("11.0", 0x37),
    JavaVersion::new("12.0", 0x38),
    JavaVersion::new("13.0", 0x39),
    JavaVersion::new("14.0", 0x3A),
    JavaVersion::new("15.0", 0x3B),
    JavaVersion::new("16.0", 0x3C),
    JavaVersion::new("17.0", 0x3D),
    JavaVersion::new("18.0", 0x3E),
    JavaVersion::new("19.0", 0x3F),
    JavaVersion::new("20.0", 0x40),
    JavaVersion::new("21.0", 0x41),
];

impl JavaVersion {
    const fn new(text: &'static str, major: u16) -> Self {
        Self { text, major }
    }

    #[must_use]
    pub const fn major(self) -> u16 {
        self.major
    }

    #[must_use]
    pub const fn text(self) -> &'static str {
        self.text
    }

    /// Look up a release by its text; `8` is read as `8.0`.
    #[must_use]
    pub fn decode(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        let normalized = if trimmed.contains('.') {
            trimmed.to_string()
        } else {
            format!("{trimmed}.0")
        };
        VERSIONS.iter().copied().find(|v| v.text == normalized)
    }

    #[must_use]
    pub fn from_major(major: u16) -> Option<Self> {
        VERSIONS.iter().copied().find(|v| v.major == major)
    }

    /// Release text for a major version, or `0xNN` when unknown.
    #[must_use]
    pub fn describe_major(major: u16) -> String {
        Self::from_major(major).map_or_else(|| format!("0x{major:X}"), |v| v.text.to_string())
    }
}

impl fmt::Display for JavaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionComparator {
    LessOrEqual,
    GreaterOrEqual,
    Equal,
    Less,
    Greater,
}

impl VersionComparator {
    /// Prefix order matters: two-character operators are tried first.
    const ALL: [Self; 5] = [
        Self::LessOrEqual,
        Self::GreaterOrEqual,
        Self::Equal,
        Self::Less,
        Self::Greater,
    ];

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::LessOrEqual => "<=",
            Self::GreaterOrEqual => ">=",
            Self::Equal => "=",
            Self::Less => "<",
            Self::Greater => ">",
        }
    }

    /// Operator at the start of `text`, if any.
    #[must_use]
    pub fn find(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        Self::ALL
            .into_iter()
            .find(|op| trimmed.starts_with(op.symbol()))
    }

    #[must_use]
    pub const fn compare(self, value: u16, limit: u16) -> bool {
        match self {
            Self::LessOrEqual => value <= limit,
            Self::GreaterOrEqual => value >= limit,
            Self::Equal => value == limit,
            Self::Less => value < limit,
            Self::Greater => value > limit,
        }
    }
}

/// Allowed class format versions, e.g. `<8` or `>= 1.4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRestriction {
    pub comparator: VersionComparator,
    pub version: JavaVersion,
}

impl VersionRestriction {
    /// Parse a restriction; a bare version means `=`.
    ///
    /// # Errors
    /// Returns a configuration error for empty text or an unknown version.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(MetaCheckerError::Config(
                "Detected empty value for 'restrict_class_format'".to_string(),
            ));
        }
        let (comparator, rest) = match VersionComparator::find(trimmed) {
            Some(op) => (op, &trimmed[op.symbol().len()..]),
            None => (VersionComparator::Equal, trimmed),
        };
        let version = JavaVersion::decode(rest).ok_or_else(|| {
            MetaCheckerError::Config(format!(
                "Illegal java version in 'restrict_class_format': {}",
                rest.trim()
            ))
        })?;
        Ok(Self {
            comparator,
            version,
        })
    }

    #[must_use]
    pub const fn allows(&self, major: u16) -> bool {
        self.comparator.compare(major, self.version.major)
    }
}

impl fmt::Display for VersionRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.comparator.symbol(), self.version)
    }
}

#[cfg(test)]
#[path = "jversion_tests.rs"]
mod tests;
