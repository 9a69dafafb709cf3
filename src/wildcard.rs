//! `*`/`?` wildcard masks for canonical class names.

use std::fmt::Write as _;

use regex::Regex;

use crate::error::Result;

/// Convert a wildcard mask into an anchored regular expression.
///
/// `*` matches any run of characters, `?` one character and a space any
/// whitespace character. Everything else is matched literally through a
/// Unicode escape.
#[must_use]
pub fn escape_wildcard_to_pattern(text: &str) -> String {
    let mut result = String::with_capacity(text.len() * 6 + 2);
    result.push('^');
    for c in text.chars() {
        match c {
            ' ' => result.push_str("\\s"),
            '*' => result.push_str(".*?"),
            '?' => result.push('.'),
            c if u32::from(c) <= 0xFFFF => {
                let _ = write!(result, "\\u{:04X}", u32::from(c));
            }
            c => {
                let _ = write!(result, "\\U{{{:X}}}", u32::from(c));
            }
        }
    }
    result.push('$');
    result
}

/// Compiled set of class name masks.
#[derive(Debug, Clone, Default)]
pub struct ClassNameMatcher {
    patterns: Vec<Regex>,
}

impl ClassNameMatcher {
    /// # Errors
    /// Returns an error if a mask produces an invalid expression.
    pub fn new<S: AsRef<str>>(masks: &[S]) -> Result<Self> {
        let patterns = masks
            .iter()
            .map(|mask| Regex::new(&escape_wildcard_to_pattern(mask.as_ref())))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True when any mask matches the whole canonical class name.
    #[must_use]
    pub fn matches(&self, class_name: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(class_name))
    }
}

#[cfg(test)]
#[path = "wildcard_tests.rs"]
mod tests;
