#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

#[path = "../../src/classfile/test_fixtures.rs"]
pub mod classes;

pub use classes::{AnnotationSpec, ClassBuilder, MethodSpec, Value};

pub const WEIGHT_UNIT: &str = "Lcom/igormaznitsa/meta/annotation/Weight$Unit;";

/// Creates an `assert_cmd` Command for the meta-checker binary.
#[macro_export]
macro_rules! meta_checker {
    () => {
        assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("meta-checker"))
    };
}

/// Temporary project folder with compiled classes and archives.
pub struct TestFixture {
    pub dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `builder` as `target/classes/<internal name>.class`.
    pub fn create_class(&self, internal_name: &str, builder: &ClassBuilder) -> PathBuf {
        let path = self
            .path()
            .join("target/classes")
            .join(format!("{internal_name}.class"));
        fs::create_dir_all(path.parent().expect("class path has a parent"))
            .expect("Failed to create class folders");
        fs::write(&path, builder.build()).expect("Failed to write class file");
        path
    }

    /// Creates `.meta-checker.toml` in the fixture root.
    pub fn create_config(&self, content: &str) {
        fs::write(self.path().join(".meta-checker.toml"), content).expect("Failed to write config");
    }

    /// Writes an archive with the given `(entry, bytes)` pairs in order.
    pub fn create_jar(&self, name: &str, entries: &[(&str, Vec<u8>)]) -> PathBuf {
        let path = self.path().join(name);
        let file = File::create(&path).expect("Failed to create archive");
        let mut writer = ZipWriter::new(file);
        for (entry, bytes) in entries {
            writer
                .start_file(*entry, SimpleFileOptions::default())
                .expect("Failed to start entry");
            writer.write_all(bytes).expect("Failed to write entry");
        }
        writer.finish().expect("Failed to finish archive");
        path
    }
}

/// A method marked `@Weight(unit)`.
pub fn weighted_method(name: &str, unit: &str) -> MethodSpec {
    MethodSpec::new(name, "()V").annotated(
        AnnotationSpec::meta("Weight").with("value", Value::enumeration(WEIGHT_UNIT, unit)),
    )
}

/// Plain class bytes with the given major version.
pub fn class_bytes(internal_name: &str, major: u16) -> Vec<u8> {
    ClassBuilder::new(internal_name).major(major).build()
}
