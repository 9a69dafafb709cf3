//! `check` subcommand: annotation rules over a folder of class files.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::cli::{CheckArgs, Cli};
use crate::classfile::{ClassFile, parse_class_file};
use crate::config::CheckConfig;
use crate::context::{CheckContext, Reporter, Severity, Thresholds, TracingReporter};
use crate::error::{MetaCheckerError, Result};
use crate::jversion::{JavaVersion, VersionRestriction};
use crate::levels::Scale;
use crate::nullability;
use crate::output::{CheckSummary, DELIMITER};
use crate::processor::{AnnotationCounts, MetaAnnotation, ProcessorRegistry, traverse_class};
use crate::scanner::{ClassFileFilter, DirectoryScanner, FileScanner, ScanEntry};
use crate::wildcard::ClassNameMatcher;
use crate::{EXIT_ABORT, EXIT_CHECK_FAILED, EXIT_CONFIG_ERROR, EXIT_SUCCESS};

use super::context::{load_config, print_summary};

pub const BANNER: &[&str] = &[
    "  __  __  ____  ____   __   ",
    " (  \\/  )( ___)(_  _) /__\\  ",
    "  )    (  )__)   )(  /(__)\\ ",
    " (_/\\/\\_)(____) (__)(__)(__)",
    "https://github.com/raydac/meta",
    "",
];

/// Validated settings of a directory check.
#[derive(Debug)]
pub struct CheckOptions {
    pub target_dir: PathBuf,
    pub restriction: Option<VersionRestriction>,
    pub thresholds: Thresholds,
    pub ignore: ClassNameMatcher,
    pub fail_for: Vec<String>,
    pub check_nullable: bool,
    pub check_may_contain_null: bool,
    pub hide_banner: bool,
    pub violation_output_limit: usize,
}

impl CheckOptions {
    /// Decode every configured limit and pattern.
    ///
    /// # Errors
    /// Returns a configuration error for an unknown level, a malformed
    /// version restriction or an invalid ignore mask.
    pub fn from_config(config: &CheckConfig) -> Result<Self> {
        let thresholds = Thresholds {
            max_weight: decode_limit(config.max_allowed_weight.as_deref())?,
            max_time_complexity: decode_limit(
                config.max_allowed_time_complexity.as_deref(),
            )?,
            max_memory_complexity: decode_limit(
                config.max_allowed_memory_complexity.as_deref(),
            )?,
        };
        let restriction = config
            .restrict_class_format
            .as_deref()
            .map(VersionRestriction::parse)
            .transpose()?;
        Ok(Self {
            target_dir: config.target_directory.clone(),
            restriction,
            thresholds,
            ignore: ClassNameMatcher::new(&config.ignore_classes)?,
            fail_for: config
                .fail_for_annotations
                .iter()
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
            check_nullable: config.check_nullable,
            check_may_contain_null: config.check_may_contain_null,
            hide_banner: config.hide_banner,
            violation_output_limit: config.violating_class_output_limit,
        })
    }
}

fn decode_limit<S: Scale>(value: Option<&str>) -> Result<Option<S>> {
    let Some(value) = value else {
        return Ok(None);
    };
    S::decode(value).map_err(|_| {
        let allowed: Vec<&str> = S::all().iter().map(|level| level.name()).collect();
        MetaCheckerError::Config(format!(
            "Can't recognize {} value : {value}, allowed values : [{}]",
            S::TITLE,
            allowed.join(", ")
        ))
    })
}

#[must_use]
pub fn run_check(args: &CheckArgs, cli: &Cli) -> i32 {
    match run_check_impl(args, cli) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            crate::output::ErrorOutput::stderr().print(&e);
            EXIT_CONFIG_ERROR
        }
    }
}

pub(crate) fn run_check_impl(args: &CheckArgs, cli: &Cli) -> Result<i32> {
    // 1. Load configuration
    let mut config = load_config(cli.config.as_deref(), cli.no_config)?;

    // 2. Apply CLI argument overrides
    apply_cli_overrides(&mut config.check, args);

    // 3. Decode limits before touching any file
    let options = CheckOptions::from_config(&config.check)?;

    // 4. Run
    let interrupted = AtomicBool::new(false);
    let Some(summary) = check_directory(&options, Box::new(TracingReporter), &interrupted) else {
        return Ok(EXIT_SUCCESS);
    };

    print_summary(&cli.format.formatter().format_check(&summary)?);

    Ok(if summary.aborted.is_some() {
        EXIT_ABORT
    } else if summary.passed() {
        EXIT_SUCCESS
    } else {
        EXIT_CHECK_FAILED
    })
}

pub(crate) fn apply_cli_overrides(config: &mut CheckConfig, args: &CheckArgs) {
    if let Some(target) = &args.target {
        config.target_directory.clone_from(target);
    }
    if args.restrict_class_format.is_some() {
        config
            .restrict_class_format
            .clone_from(&args.restrict_class_format);
    }
    config.fail_for_annotations.extend(args.fail_for.iter().cloned());
    config.ignore_classes.extend(args.ignore.iter().cloned());
    config.check_nullable |= args.check_nullable;
    config.check_may_contain_null |= args.check_may_contain_null;
    if args.max_weight.is_some() {
        config.max_allowed_weight.clone_from(&args.max_weight);
    }
    if args.max_time_complexity.is_some() {
        config
            .max_allowed_time_complexity
            .clone_from(&args.max_time_complexity);
    }
    if args.max_memory_complexity.is_some() {
        config
            .max_allowed_memory_complexity
            .clone_from(&args.max_memory_complexity);
    }
    config.hide_banner |= args.hide_banner;
    if let Some(limit) = args.violation_output_limit {
        config.violating_class_output_limit = limit;
    }
}

/// Check every class file under the target folder.
///
/// Returns `None` when the folder does not exist; that is only a warning
/// because a module may have nothing to compile. Findings go to `reporter`,
/// the returned summary is complete even when a processor aborted the run.
pub fn check_directory(
    options: &CheckOptions,
    reporter: Box<dyn Reporter>,
    interrupted: &AtomicBool,
) -> Option<CheckSummary> {
    if !options.target_dir.is_dir() {
        warn!(
            "Can't find directory for investigation, may be there are not classes for compilation : {}",
            options.target_dir.display()
        );
        return None;
    }

    if !options.hide_banner {
        for line in BANNER {
            info!("{line}");
        }
        info!("{DELIMITER}");
    }
    let folder = std::path::absolute(&options.target_dir)
        .unwrap_or_else(|_| options.target_dir.clone());
    info!("Class file folder : {}", folder.display());
    info!("{DELIMITER}");
    if let Some(restriction) = &options.restriction {
        debug!("Class version restriction: {restriction}");
    }

    let mut context = CheckContext::new(reporter)
        .with_thresholds(options.thresholds)
        .with_nullability_checks(options.check_nullable, options.check_may_contain_null)
        .with_target_dir(&options.target_dir);
    let mut run = DirectoryRun::new(options);
    let start = Instant::now();

    for entry in DirectoryScanner::new(ClassFileFilter).scan(&options.target_dir) {
        if interrupted.load(Ordering::Relaxed) {
            warn!("Check interrupted");
            break;
        }
        let path = match entry {
            ScanEntry::File(path) => path,
            ScanEntry::Unreadable { path, reason } => {
                context.error(
                    &format!("Can't read class file : {} ({reason})", path.display()),
                    None,
                );
                continue;
            }
        };
        if let Err(abort) = run.check_file(&mut context, &path) {
            run.aborted = Some(abort);
            break;
        }
    }

    if run.aborted.is_none() {
        run.apply_fail_for(&mut context);
    }

    let counters = context.counters();
    Some(CheckSummary {
        processed_classes: run.processed,
        annotations: run.counts,
        version_violations: run.version_violations,
        info: counters.info,
        warnings: counters.warnings,
        errors: counters.errors,
        elapsed: start.elapsed(),
        aborted: run.aborted,
    })
}

struct DirectoryRun<'a> {
    options: &'a CheckOptions,
    registry: ProcessorRegistry,
    counts: AnnotationCounts,
    processed: usize,
    version_violations: usize,
    aborted: Option<String>,
}

impl<'a> DirectoryRun<'a> {
    fn new(options: &'a CheckOptions) -> Self {
        Self {
            options,
            registry: ProcessorRegistry::default(),
            counts: AnnotationCounts::new(),
            processed: 0,
            version_violations: 0,
            aborted: None,
        }
    }

    /// Check one class file; `Err` carries the message of a processor abort.
    fn check_file(
        &mut self,
        context: &mut CheckContext,
        path: &Path,
    ) -> std::result::Result<(), String> {
        debug!("Processing class file : {}", path.display());
        let class = match parse_class_file(path) {
            Ok(class) => class,
            Err(MetaCheckerError::FileRead { .. }) => {
                context.error(&format!("Can't read class file : {}", path.display()), None);
                return Ok(());
            }
            Err(_) => {
                context.error(&format!("Can't parse class file : {}", path.display()), None);
                return Ok(());
            }
        };

        if self.options.ignore.matches(&class.class_name()) {
            context.info(&format!("Ignored class file : {}", path.display()), None);
            return Ok(());
        }
        self.processed += 1;
        self.check_version(context, &class, path);

        let processed = self.processed;
        match traverse_class(&self.registry, context, &class, processed, &mut self.counts) {
            Ok(()) => {}
            Err(MetaCheckerError::Abort(message)) => return Err(message),
            Err(other) => context.error(&other.to_string(), None),
        }
        nullability::check_class(context, &class);
        Ok(())
    }

    fn check_version(&mut self, context: &mut CheckContext, class: &ClassFile, path: &Path) {
        let Some(restriction) = &self.options.restriction else {
            return;
        };
        if restriction.allows(class.major_version) {
            return;
        }
        self.version_violations += 1;
        let limit = self.options.violation_output_limit;
        if self.version_violations <= limit {
            context.error(
                &format!(
                    "detected class version violation, detected {}: {}",
                    JavaVersion::describe_major(class.major_version),
                    path.display()
                ),
                None,
            );
        } else {
            if self.version_violations == limit + 1 {
                error!("...");
            }
            context.count_suppressed(Severity::Error);
        }
    }

    /// One error per detected annotation family listed in `fail_for`.
    fn apply_fail_for(&self, context: &mut CheckContext) {
        if self.options.fail_for.is_empty() {
            debug!("There are no annotations defined that are interpreted as an error");
            return;
        }
        debug!(
            "Defined annotations to be interpreted as error : {:?}",
            self.options.fail_for
        );
        for kind in MetaAnnotation::ALL {
            if self.counts.get(kind) == 0 {
                continue;
            }
            for name in &self.options.fail_for {
                if kind.is_among_class_names(name) {
                    context.error(
                        &format!("Detected annotation '{name}' defined to be recognized as error"),
                        None,
                    );
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "check_tests.rs"]
mod tests;
