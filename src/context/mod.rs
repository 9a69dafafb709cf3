//! Per-run state shared by all processors: thresholds, switches, counters,
//! the reporting sink and the collection-type cache.

mod reporter;
mod target;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::MetaCheckerError;
use crate::levels::{Complexity, WeightUnit};

pub use reporter::{RecordingReporter, Reporter, Severity, TracingReporter};
pub use target::{ElementKind, Member, Target};

/// Configured maximum levels; `None` means no limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thresholds {
    pub max_weight: Option<WeightUnit>,
    pub max_time_complexity: Option<Complexity>,
    pub max_memory_complexity: Option<Complexity>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub info: usize,
    pub warnings: usize,
    pub errors: usize,
}

/// Memoised answer to "is this type a collection or object array".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Positive,
    Negative,
    /// Lookup in progress; breaks cycles in broken class hierarchies.
    Pending,
}

pub struct CheckContext {
    thresholds: Thresholds,
    check_nullable: bool,
    check_may_contain_null: bool,
    target_dir: PathBuf,
    reporter: Box<dyn Reporter>,
    counters: Counters,
    collection_cache: HashMap<String, CacheState>,
}

impl CheckContext {
    #[must_use]
    pub fn new(reporter: Box<dyn Reporter>) -> Self {
        Self {
            thresholds: Thresholds::default(),
            check_nullable: false,
            check_may_contain_null: false,
            target_dir: PathBuf::from("."),
            reporter,
            counters: Counters::default(),
            collection_cache: HashMap::new(),
        }
    }

    #[must_use]
    pub const fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    #[must_use]
    pub const fn with_nullability_checks(mut self, nullable: bool, may_contain_null: bool) -> Self {
        self.check_nullable = nullable;
        self.check_may_contain_null = may_contain_null;
        self
    }

    #[must_use]
    pub fn with_target_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.target_dir = dir.into();
        self
    }

    #[must_use]
    pub const fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    #[must_use]
    pub const fn check_nullable(&self) -> bool {
        self.check_nullable
    }

    #[must_use]
    pub const fn check_may_contain_null(&self) -> bool {
        self.check_may_contain_null
    }

    #[must_use]
    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    #[must_use]
    pub const fn counters(&self) -> Counters {
        self.counters
    }

    /// Report a finding, prefixed with the target location when given.
    pub fn report(&mut self, severity: Severity, message: &str, target: Option<&Target<'_>>) {
        self.count_suppressed(severity);
        match target {
            Some(target) => {
                let text = format!("{} {message}", target.location());
                self.reporter.report(severity, &text);
            }
            None => self.reporter.report(severity, message),
        }
    }

    /// Count a finding whose message is over an output limit.
    pub const fn count_suppressed(&mut self, severity: Severity) {
        match severity {
            Severity::Info => self.counters.info += 1,
            Severity::Warning => self.counters.warnings += 1,
            Severity::Error => self.counters.errors += 1,
        }
    }

    pub fn info(&mut self, message: &str, target: Option<&Target<'_>>) {
        self.report(Severity::Info, message, target);
    }

    pub fn warning(&mut self, message: &str, target: Option<&Target<'_>>) {
        self.report(Severity::Warning, message, target);
    }

    pub fn error(&mut self, message: &str, target: Option<&Target<'_>>) {
        self.report(Severity::Error, message, target);
    }

    /// Build the error that stops the whole run; return it with `Err(..)`.
    #[must_use]
    pub fn abort(&self, message: &str, target: Option<&Target<'_>>) -> MetaCheckerError {
        let text = target.map_or_else(
            || message.to_string(),
            |target| format!("{} {message}", target.location()),
        );
        MetaCheckerError::Abort(text)
    }

    #[must_use]
    pub fn cached_collection_state(&self, type_name: &str) -> Option<CacheState> {
        self.collection_cache.get(type_name).copied()
    }

    pub fn remember_collection_state(&mut self, type_name: &str, state: CacheState) {
        self.collection_cache.insert(type_name.to_string(), state);
    }
}

impl std::fmt::Debug for CheckContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckContext")
            .field("thresholds", &self.thresholds)
            .field("check_nullable", &self.check_nullable)
            .field("check_may_contain_null", &self.check_may_contain_null)
            .field("target_dir", &self.target_dir)
            .field("counters", &self.counters)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
