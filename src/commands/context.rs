use std::io::Write;
use std::path::Path;

use crate::config::{Config, ConfigLoader, FileConfigLoader};
use crate::error::Result;

/// Load the configuration file, or defaults when `no_config` is set.
///
/// An explicit path must exist; the implicit `.meta-checker.toml` is optional.
pub(crate) fn load_config(config_path: Option<&Path>, no_config: bool) -> Result<Config> {
    if no_config {
        return Ok(Config::default());
    }
    let loader = FileConfigLoader::new();
    config_path.map_or_else(|| loader.load(), |path| loader.load_from_path(path))
}

/// Print a rendered summary on stdout; logging goes to stderr.
pub(crate) fn print_summary(content: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_all(content.as_bytes());
    if !content.ends_with('\n') {
        let _ = writeln!(stdout);
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
