use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "meta-checker")]
#[command(author, version, about = "Check meta annotations in compiled class files")]
#[command(long_about = "Scans compiled class files and archives for meta annotations \
    (weight, complexity, nullability, constraints and so on) and enforces their rules.\n\n\
    Exit codes:\n  \
    0 - All checks passed\n  \
    1 - Errors detected\n  \
    2 - Configuration or runtime error\n  \
    3 - Check aborted")]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print warnings, errors and the summary
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file (default: ./.meta-checker.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Skip loading configuration file
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Summary format [possible values: text, json]
    #[arg(short, long, default_value = "text", global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check annotations in a folder of class files
    Check(CheckArgs),

    /// Check class versions, resources and manifest of an archive
    CheckJar(JarArgs),
}

#[derive(Parser, Debug, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct CheckArgs {
    /// Folder with compiled classes (overrides config)
    pub target: Option<PathBuf>,

    /// Allowed class format, e.g. ">=1.8" or "<11"
    #[arg(long)]
    pub restrict_class_format: Option<String>,

    /// Annotation names to be recognized as errors (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub fail_for: Vec<String>,

    /// Canonical class name masks to skip, '*' and '?' allowed (repeatable)
    #[arg(long, short = 'x')]
    pub ignore: Vec<String>,

    /// Require @Nullable or @Nonnull on object results and arguments
    #[arg(long)]
    pub check_nullable: bool,

    /// Require @MayContainNull or @MustNotContainNull on collections and object arrays
    #[arg(long)]
    pub check_may_contain_null: bool,

    /// Max allowed weight, e.g. NORMAL
    #[arg(long)]
    pub max_weight: Option<String>,

    /// Max allowed time complexity, e.g. LINEAR or "O(n)"
    #[arg(long)]
    pub max_time_complexity: Option<String>,

    /// Max allowed memory complexity
    #[arg(long)]
    pub max_memory_complexity: Option<String>,

    /// Don't print the banner
    #[arg(long)]
    pub hide_banner: bool,

    /// Max number of printed class version violations
    #[arg(long)]
    pub violation_output_limit: Option<usize>,
}

#[derive(Parser, Debug, Default)]
pub struct JarArgs {
    /// Archive to check (overrides config)
    pub archive: Option<PathBuf>,

    /// Allowed class format, e.g. ">=1.8" or "<11"
    #[arg(long)]
    pub restrict_class_format: Option<String>,

    /// Ant patterns of class entries to inspect (repeatable)
    #[arg(long, short = 'I')]
    pub include: Vec<String>,

    /// Ant patterns of class entries to skip (repeatable)
    #[arg(long, short = 'x')]
    pub exclude: Vec<String>,

    /// Ant patterns which must match some entry (repeatable)
    #[arg(long)]
    pub expected: Vec<String>,

    /// Ant patterns which must not match any entry (repeatable)
    #[arg(long)]
    pub unexpected: Vec<String>,

    /// Keys required in META-INF/MANIFEST.MF (repeatable)
    #[arg(long)]
    pub manifest_has: Vec<String>,

    /// Keys forbidden in META-INF/MANIFEST.MF (repeatable)
    #[arg(long)]
    pub manifest_has_not: Vec<String>,

    /// Errors printed before the rest go to the debug log
    #[arg(long)]
    pub limit_output_errors: Option<usize>,

    /// Class version violations printed before the rest are only counted
    #[arg(long)]
    pub limit_illegal_versions: Option<usize>,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
