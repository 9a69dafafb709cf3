mod filesystem;
mod loader;
mod model;

pub use filesystem::{FileSystem, RealFileSystem};
pub use loader::{ConfigLoader, FileConfigLoader, LOCAL_CONFIG_NAME};
pub use model::{
    CheckConfig, Config, DEFAULT_ILLEGAL_VERSION_LIMIT, DEFAULT_OUTPUT_ERROR_LIMIT,
    DEFAULT_VIOLATING_CLASS_OUTPUT_LIMIT, JarConfig,
};


#[cfg(test)]
#[path = "model_tests.rs"]
mod model_tests;
