use std::io::IsTerminal;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use meta_checker::cli::{Cli, Commands};
use meta_checker::commands::{run_check, run_check_jar};

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let exit_code = match &cli.command {
        Commands::Check(args) => run_check(args, &cli),
        Commands::CheckJar(args) => run_check_jar(args, &cli),
    };

    std::process::exit(exit_code);
}

/// Log lines go to stderr so stdout carries only the summary.
///
/// `RUST_LOG` wins over the verbosity flags when set.
fn init_logging(cli: &Cli) {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}
