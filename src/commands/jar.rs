//! `check-jar` subcommand: resource patterns, manifest keys and class
//! format versions of a packaged archive.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::{debug, error, info};
use zip::ZipArchive;

use crate::classfile::read_version;
use crate::cli::{Cli, JarArgs};
use crate::config::JarConfig;
use crate::context::{CheckContext, Reporter, Severity, TracingReporter};
use crate::error::{MetaCheckerError, Result};
use crate::jversion::{JavaVersion, VersionRestriction};
use crate::manifest::{MANIFEST_PATH, Manifest};
use crate::output::JarSummary;
use crate::scanner::{AntPatterns, ClassFileFilter};
use crate::{EXIT_CHECK_FAILED, EXIT_CONFIG_ERROR, EXIT_SUCCESS};

use super::context::{load_config, print_summary};

/// Validated settings of an archive check.
#[derive(Debug)]
pub struct JarOptions {
    pub archive: PathBuf,
    pub restriction: Option<VersionRestriction>,
    pub include: AntPatterns,
    pub exclude: AntPatterns,
    pub expected: AntPatterns,
    pub unexpected: AntPatterns,
    pub manifest_has: Vec<String>,
    pub manifest_has_not: Vec<String>,
    pub limit_output_errors: usize,
    pub limit_illegal_versions: usize,
}

impl JarOptions {
    /// # Errors
    /// Returns a configuration error when no archive is set, the version
    /// restriction is malformed or a pattern does not compile.
    pub fn from_config(config: &JarConfig) -> Result<Self> {
        let archive = config.archive.clone().ok_or_else(|| {
            MetaCheckerError::Config(
                "Archive is not defined, pass it as argument or set 'archive' in [jar]".to_string(),
            )
        })?;
        let restriction = config
            .restrict_class_format
            .as_deref()
            .map(VersionRestriction::parse)
            .transpose()?;
        Ok(Self {
            archive,
            restriction,
            include: AntPatterns::new(&config.include)?,
            exclude: AntPatterns::new(&config.exclude)?,
            expected: AntPatterns::new(&config.expected)?,
            unexpected: AntPatterns::new(&config.unexpected)?,
            manifest_has: non_blank(&config.manifest_has),
            manifest_has_not: non_blank(&config.manifest_has_not),
            limit_output_errors: config.limit_output_errors,
            limit_illegal_versions: config.limit_illegal_class_version_errors,
        })
    }
}

fn non_blank(keys: &[String]) -> Vec<String> {
    keys.iter()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .collect()
}

#[must_use]
pub fn run_check_jar(args: &JarArgs, cli: &Cli) -> i32 {
    match run_check_jar_impl(args, cli) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            crate::output::ErrorOutput::stderr().print(&e);
            EXIT_CONFIG_ERROR
        }
    }
}

pub(crate) fn run_check_jar_impl(args: &JarArgs, cli: &Cli) -> Result<i32> {
    // 1. Load configuration
    let mut config = load_config(cli.config.as_deref(), cli.no_config)?;

    // 2. Apply CLI argument overrides
    apply_jar_overrides(&mut config.jar, args);

    // 3. Compile patterns and the restriction
    let options = JarOptions::from_config(&config.jar)?;

    // 4. Run
    let interrupted = AtomicBool::new(false);
    let summary = check_archive(&options, Box::new(TracingReporter), &interrupted)?;

    print_summary(&cli.format.formatter().format_jar(&summary)?);

    Ok(if summary.passed() {
        EXIT_SUCCESS
    } else {
        EXIT_CHECK_FAILED
    })
}

pub(crate) fn apply_jar_overrides(config: &mut JarConfig, args: &JarArgs) {
    if args.archive.is_some() {
        config.archive.clone_from(&args.archive);
    }
    if args.restrict_class_format.is_some() {
        config
            .restrict_class_format
            .clone_from(&args.restrict_class_format);
    }
    config.include.extend(args.include.iter().cloned());
    config.exclude.extend(args.exclude.iter().cloned());
    config.expected.extend(args.expected.iter().cloned());
    config.unexpected.extend(args.unexpected.iter().cloned());
    config.manifest_has.extend(args.manifest_has.iter().cloned());
    config
        .manifest_has_not
        .extend(args.manifest_has_not.iter().cloned());
    if let Some(limit) = args.limit_output_errors {
        config.limit_output_errors = limit;
    }
    if let Some(limit) = args.limit_illegal_versions {
        config.limit_illegal_class_version_errors = limit;
    }
}

/// Check one archive.
///
/// Entries are visited in archive order. Every finding counts as an error;
/// messages past `limit_output_errors` only go to the debug log.
///
/// # Errors
/// Returns an error when the archive is missing or unreadable, or when a
/// class entry has no valid class file header.
pub fn check_archive(
    options: &JarOptions,
    reporter: Box<dyn Reporter>,
    interrupted: &AtomicBool,
) -> Result<JarSummary> {
    if !options.archive.is_file() {
        return Err(MetaCheckerError::Config(format!(
            "Can't find archive file: {}",
            options.archive.display()
        )));
    }
    info!("Check archive: {}", options.archive.display());
    if let Some(restriction) = &options.restriction {
        info!("Class version restriction: {restriction}");
    }

    let file = File::open(&options.archive).map_err(|source| MetaCheckerError::FileRead {
        path: options.archive.clone(),
        source,
    })?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;

    let start = Instant::now();
    let mut run = ArchiveRun::new(options, CheckContext::new(reporter));

    if !options.manifest_has.is_empty() || !options.manifest_has_not.is_empty() {
        let manifest = read_manifest(&mut archive)?;
        run.check_manifest(manifest.as_ref());
    }

    for index in 0..archive.len() {
        if interrupted.load(Ordering::Relaxed) {
            break;
        }
        let mut entry = archive.by_index(index)?;
        let path = entry.name().to_string();
        if !run.select_entry(&path) || entry.is_dir() {
            continue;
        }

        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;
        let (_, major) = read_version(&bytes).map_err(|e| {
            MetaCheckerError::ClassFormat(format!("Can't parse JAR item: {path} ({e})"))
        })?;
        run.check_class_version(&path, major);
    }

    Ok(run.finish(start))
}

fn read_manifest<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Option<Manifest>> {
    let mut entry = match archive.by_name(MANIFEST_PATH) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut text = String::new();
    entry.read_to_string(&mut text)?;
    Ok(Some(Manifest::parse(&text)))
}

struct ArchiveRun<'a> {
    options: &'a JarOptions,
    context: CheckContext,
    expected: AntPatterns,
    unexpected: AntPatterns,
    detected_unexpected: Vec<String>,
    processed: usize,
    illegal_versions: usize,
    max_major: Option<u16>,
}

impl<'a> ArchiveRun<'a> {
    fn new(options: &'a JarOptions, context: CheckContext) -> Self {
        Self {
            options,
            context,
            expected: options.expected.clone(),
            unexpected: options.unexpected.clone(),
            detected_unexpected: Vec::new(),
            processed: 0,
            illegal_versions: 0,
            max_major: None,
        }
    }

    fn errors(&self) -> usize {
        self.context.counters().errors
    }

    /// Count one error; print it only while under the output limit.
    fn fail(&mut self, message: &str) {
        if self.errors() < self.options.limit_output_errors {
            self.context.error(message, None);
        } else {
            debug!("{message}");
            self.context.count_suppressed(Severity::Error);
        }
    }

    fn check_manifest(&mut self, manifest: Option<&Manifest>) {
        let Some(manifest) = manifest else {
            self.fail("Java can't find MANIFEST.MF in the archive");
            return;
        };
        debug!(
            "Detected manifest entries: {:?}",
            manifest.entry_names().collect::<Vec<_>>()
        );
        debug!(
            "Detected manifest main attributes: {:?}",
            manifest.main_keys().collect::<Vec<_>>()
        );

        for key in &self.options.manifest_has {
            if !manifest.has_key(key) {
                self.fail(&format!("Can't find key '{key}' in MANIFEST.MF"));
            }
        }
        for key in &self.options.manifest_has_not {
            if manifest.has_key(key) {
                self.fail(&format!("Detected key '{key}' in MANIFEST.MF"));
            }
        }
    }

    /// Apply resource patterns to an entry and tell whether its class
    /// header must be inspected.
    fn select_entry(&mut self, path: &str) -> bool {
        for pattern in self.expected.take_matches(path) {
            self.context
                .info(&format!("Contains {path} (pattern: {pattern})"), None);
        }
        for pattern in self.unexpected.take_matches(path) {
            self.fail(&format!("Detected unexpected {path} (pattern: {pattern})"));
            self.detected_unexpected.push(pattern);
        }

        if !self.options.include.is_empty() {
            match self.options.include.first_match(path) {
                Some(pattern) => debug!("{path} included by pattern {pattern}"),
                None => return false,
            }
        }
        if let Some(pattern) = self.options.exclude.first_match(path) {
            debug!("{path} excluded by pattern {pattern}");
            return false;
        }

        !path.starts_with("META-INF/") && ClassFileFilter::is_class_name(path)
    }

    fn check_class_version(&mut self, path: &str, major: u16) {
        self.processed += 1;
        self.max_major = self.max_major.max(Some(major));

        let Some(restriction) = &self.options.restriction else {
            return;
        };
        if restriction.allows(major) {
            return;
        }

        self.illegal_versions += 1;
        let limit = self.options.limit_illegal_versions;
        if self.errors() < self.options.limit_output_errors && self.illegal_versions <= limit {
            let message = format!(
                "Detected class version violation {} : {}",
                JavaVersion::describe_major(major),
                class_name_of(path)
            );
            self.context.error(&message, None);
        } else {
            if self.illegal_versions == limit + 1 {
                error!("more illegal class versions...");
            }
            self.context.count_suppressed(Severity::Error);
        }
    }

    fn finish(mut self, start: Instant) -> JarSummary {
        let missing: Vec<String> = self.expected.iter().map(str::to_string).collect();
        for pattern in missing {
            self.fail(&format!("Can't find resource for pattern: {pattern}"));
        }
        for pattern in std::mem::take(&mut self.detected_unexpected) {
            self.fail(&format!("Detected unexpected resource for pattern: {pattern}"));
        }

        JarSummary {
            processed_classes: self.processed,
            illegal_class_versions: self.illegal_versions,
            max_major_version: self.max_major,
            errors: self.errors(),
            elapsed: start.elapsed(),
        }
    }
}

/// `com/example/Main.class` becomes `com.example.Main`.
fn class_name_of(path: &str) -> String {
    let stem = path.get(..path.len().saturating_sub(".class".len())).unwrap_or(path);
    stem.replace('/', ".")
}

#[cfg(test)]
#[path = "jar_tests.rs"]
mod tests;
