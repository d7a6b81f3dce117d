//! Shared test fixtures and utilities for all test types

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use resource_bundle::{CompilerConfig, Manifest, ResourceCompiler};

/// Contents of the canonical fixture files
pub const RESOURCE1: &[u8] = b"this is a test resource\n";
pub const RESOURCE2: &[u8] = b"this is test resource #2\n";

/// Size of the bundle built from the canonical manifest
pub const CANONICAL_BUNDLE_SIZE: usize = 281;

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

pub fn canonical_manifest_path() -> PathBuf {
    fixtures_dir().join("resources.gresource.xml")
}

pub fn canonical_manifest() -> Manifest {
    Manifest::load(canonical_manifest_path()).expect("Failed to load canonical manifest")
}

/// Compiler with default settings, ignoring the environment
pub fn default_compiler() -> ResourceCompiler {
    ResourceCompiler::new(CompilerConfig::default()).expect("Default config must be valid")
}

/// Bundle image built from the canonical manifest
pub fn canonical_bundle() -> Vec<u8> {
    default_compiler()
        .compile(&canonical_manifest())
        .expect("Failed to compile canonical manifest")
}

/// Temporary source directory with a manifest
pub struct SourceTree {
    pub dir: TempDir,
}

impl SourceTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `name`, creating parent directories
    pub fn write(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, contents).expect("Failed to write fixture file");
        path
    }

    /// Write a manifest listing `files` under `prefix`
    pub fn write_manifest(&self, prefix: &str, files: &[&str]) -> PathBuf {
        let entries: String = files
            .iter()
            .map(|file| format!("    <file>{}</file>\n", file))
            .collect();
        let xml = format!(
            "<gresources>\n  <gresource prefix=\"{}\">\n{}  </gresource>\n</gresources>\n",
            prefix, entries
        );
        self.write("resources.gresource.xml", xml.as_bytes())
    }
}
