use std::path::Path;

use globset::{Glob, GlobBuilder, GlobMatcher};

use crate::error::{MetaCheckerError, Result};

pub trait FileFilter {
    fn should_include(&self, path: &Path) -> bool;
}

/// Accepts `*.class` files, extension case ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClassFileFilter;

impl ClassFileFilter {
    #[must_use]
    pub fn is_class_name(name: &str) -> bool {
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("class"))
    }
}

impl FileFilter for ClassFileFilter {
    fn should_include(&self, path: &Path) -> bool {
        path.to_str().is_some_and(Self::is_class_name)
    }
}

/// Ant style path patterns matched against `/` separated archive paths.
///
/// `*` and `?` stay inside one path segment, `**` spans any number of
/// segments and a trailing `/` stands for everything below that folder.
#[derive(Debug, Clone, Default)]
pub struct AntPatterns {
    patterns: Vec<(String, GlobMatcher)>,
}

impl AntPatterns {
    /// # Errors
    /// Returns `InvalidPattern` for the first pattern that does not compile.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                compile(pattern).map(|matcher| (pattern.to_string(), matcher))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// First pattern matching `path`.
    #[must_use]
    pub fn first_match(&self, path: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|(_, matcher)| matcher.is_match(path))
            .map(|(pattern, _)| pattern.as_str())
    }

    /// Remove and return every pattern matching `path`, keeping the order.
    pub fn take_matches(&mut self, path: &str) -> Vec<String> {
        let mut taken = Vec::new();
        self.patterns.retain(|(pattern, matcher)| {
            let hit = matcher.is_match(path);
            if hit {
                taken.push(pattern.clone());
            }
            !hit
        });
        taken
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|(pattern, _)| pattern.as_str())
    }
}

fn compile(pattern: &str) -> Result<GlobMatcher> {
    let trimmed = pattern.trim().trim_start_matches('/');
    let expanded = if trimmed.ends_with('/') {
        format!("{trimmed}**")
    } else {
        trimmed.to_string()
    };
    let glob: Glob = GlobBuilder::new(&expanded)
        .literal_separator(true)
        .backslash_escape(true)
        .build()
        .map_err(|source| MetaCheckerError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
    Ok(glob.compile_matcher())
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
