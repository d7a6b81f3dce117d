// SPDX-License-Identifier: MIT
//! Manifest to output pipeline
//!
//! ```text
//! manifest.xml -> Manifest -> source files -> preprocess -> BundleWriter
//!                                                               |
//!                          .gresource / .c / .h / .rs  <--------+
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, info};

use crate::codegen::{self, CodegenError, CodegenOptions};
use crate::compression::Compressor;
use crate::config::CompilerConfig;
use crate::manifest::{Manifest, ManifestError};
use crate::writer::BundleWriter;

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What to produce from a manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    /// Raw bundle image
    Bundle,
    CSource,
    CHeader,
    RustSource,
    /// Newline separated list of source files
    Dependencies,
}

impl OutputKind {
    /// Guess from the target's extension, falling back to a raw bundle
    pub fn from_target(target: &Path) -> Self {
        match target.extension().and_then(|ext| ext.to_str()) {
            Some("c") => OutputKind::CSource,
            Some("h") => OutputKind::CHeader,
            Some("rs") => OutputKind::RustSource,
            _ => OutputKind::Bundle,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputKind::Bundle => "gresource",
            OutputKind::CSource => "c",
            OutputKind::CHeader => "h",
            OutputKind::RustSource => "rs",
            OutputKind::Dependencies => "d",
        }
    }

    /// `dir/app.gresource.xml` becomes `app.c` for C source
    pub fn default_target(&self, manifest_path: &Path) -> PathBuf {
        let name = manifest_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = name
            .strip_suffix(".xml")
            .map(|s| s.strip_suffix(".gresource").unwrap_or(s))
            .unwrap_or(&name);
        PathBuf::from(format!("{}.{}", stem, self.extension()))
    }
}

impl FromStr for OutputKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bundle" | "gresource" => Ok(OutputKind::Bundle),
            "c" | "source" => Ok(OutputKind::CSource),
            "h" | "header" => Ok(OutputKind::CHeader),
            "rs" | "rust" => Ok(OutputKind::RustSource),
            "deps" | "dependencies" => Ok(OutputKind::Dependencies),
            other => Err(format!("Unknown output kind: {}", other)),
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputKind::Bundle => "bundle",
            OutputKind::CSource => "c",
            OutputKind::CHeader => "header",
            OutputKind::RustSource => "rust",
            OutputKind::Dependencies => "dependencies",
        };
        f.write_str(name)
    }
}

/// Builds bundles and generated sources from manifests
#[derive(Debug, Clone, Default)]
pub struct ResourceCompiler {
    config: CompilerConfig,
}

impl ResourceCompiler {
    pub fn new(config: CompilerConfig) -> Result<Self, CompileError> {
        config.validate().map_err(CompileError::Config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Build the bundle image for `manifest`
    pub fn compile(&self, manifest: &Manifest) -> Result<Vec<u8>, CompileError> {
        let mut writer =
            BundleWriter::with_compressor(Compressor::new(self.config.compression_level));
        manifest.fill_writer(&mut writer, &self.config.source_dirs)?;
        let data = writer.finalize().map_err(ManifestError::from)?;
        info!(
            resources = manifest.resources.len(),
            bytes = data.len(),
            "bundle compiled"
        );
        Ok(data)
    }

    /// Codegen options for an output written to `target`
    pub fn codegen_options(&self, target: &Path) -> Result<CodegenOptions, CompileError> {
        let mut options = match &self.config.c_name {
            Some(name) => CodegenOptions::new(name.clone())?,
            None => CodegenOptions::for_target(target)?,
        };
        options.internal = self.config.internal;
        options.external_data = self.config.external_data;
        options.manual_register = self.config.manual_register;
        Ok(options)
    }

    /// Produce the bytes of `kind` for a manifest whose output goes to `target`
    pub fn generate(
        &self,
        manifest: &Manifest,
        kind: OutputKind,
        target: &Path,
    ) -> Result<Vec<u8>, CompileError> {
        debug!(%kind, target = %target.display(), "generating output");
        let output = match kind {
            OutputKind::Bundle => self.compile(manifest)?,
            OutputKind::CSource => {
                let options = self.codegen_options(target)?;
                let data = self.compile(manifest)?;
                codegen::generate_c_source(&data, &options).into_bytes()
            }
            OutputKind::CHeader => {
                codegen::generate_c_header(&self.codegen_options(target)?).into_bytes()
            }
            OutputKind::RustSource => {
                let options = self.codegen_options(target)?;
                let data = self.compile(manifest)?;
                codegen::generate_rust_source(&data, &options).into_bytes()
            }
            OutputKind::Dependencies => {
                let files = manifest.dependencies(&self.config.source_dirs)?;
                codegen::dependency_list(&files).into_bytes()
            }
        };
        Ok(output)
    }

    /// Load `manifest_path`, generate `kind` and write it to `target`
    pub fn compile_to_file(
        &self,
        manifest_path: &Path,
        kind: OutputKind,
        target: &Path,
    ) -> Result<(), CompileError> {
        let manifest = Manifest::load(manifest_path)?;
        let output = self.generate(&manifest, kind, target)?;
        std::fs::write(target, &output).map_err(|source| CompileError::Io {
            path: target.to_path_buf(),
            source,
        })?;
        info!(%kind, target = %target.display(), bytes = output.len(), "output written");
        Ok(())
    }
}
