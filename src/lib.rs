pub mod classfile;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod expr;
pub mod jversion;
pub mod levels;
pub mod manifest;
pub mod nullability;
pub mod output;
pub mod processor;
pub mod scanner;
pub mod wildcard;

pub use error::{MetaCheckerError, Result};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_CHECK_FAILED: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;
pub const EXIT_ABORT: i32 = 3;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
