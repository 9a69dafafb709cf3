mod check;
mod context;
mod jar;

pub use check::{BANNER, CheckOptions, check_directory, run_check};
pub use jar::{JarOptions, check_archive, run_check_jar};
