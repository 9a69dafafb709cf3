//! Error output for failures that stop a run before or during the check.
//!
//! Format: `✖ Error Type: message` / `  × detail` / `  help: suggestion`

use std::io::{IsTerminal, Write};

use crate::error::MetaCheckerError;

mod ansi {
    pub const RED: &str = "\x1b[31m";
    pub const CYAN: &str = "\x1b[36m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";
    pub const RESET: &str = "\x1b[0m";
}

pub struct ErrorOutput {
    use_colors: bool,
}

impl ErrorOutput {
    /// Creates an error output formatter that auto-detects color support on stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            use_colors: std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal(),
        }
    }

    /// Creates an error output formatter with explicit color control.
    #[must_use]
    pub const fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    pub fn print(&self, error: &MetaCheckerError) {
        let mut stderr = std::io::stderr().lock();
        self.write_error(&mut stderr, error);
    }

    /// Writes error to a writer (for testing).
    pub fn write_error<W: Write>(&self, w: &mut W, error: &MetaCheckerError) {
        // Write failures on stderr are not recoverable here.
        let error_type = error.error_type();
        if self.use_colors {
            let _ = writeln!(
                w,
                "{}{}✖ {error_type}:{} {error}",
                ansi::BOLD,
                ansi::RED,
                ansi::RESET
            );
        } else {
            let _ = writeln!(w, "✖ {error_type}: {error}");
        }

        if let Some(detail) = error.detail() {
            if self.use_colors {
                let _ = writeln!(w, "  {}× {detail}{}", ansi::DIM, ansi::RESET);
            } else {
                let _ = writeln!(w, "  × {detail}");
            }
        }

        if let Some(suggestion) = error.suggestion() {
            if self.use_colors {
                let _ = writeln!(w, "  {}help:{} {suggestion}", ansi::CYAN, ansi::RESET);
            } else {
                let _ = writeln!(w, "  help: {suggestion}");
            }
        }
    }
}

impl Default for ErrorOutput {
    fn default() -> Self {
        Self::stderr()
    }
}

#[cfg(test)]
#[path = "error_output_tests.rs"]
mod tests;
