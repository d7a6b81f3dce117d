// SPDX-License-Identifier: MIT
//! resource-compiler
//!
//! Compiles a resource manifest into a bundle image or into C or Rust source
//! that embeds it.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use resource_bundle::{CompilerConfig, Manifest, OutputKind, ResourceCompiler};

#[derive(Parser)]
#[command(name = "resource-compiler")]
#[command(about = "Compile resource manifests into bundles and embeddable source", long_about = None)]
#[command(group(
    ArgGroup::new("output")
        .args(["generate", "generate_source", "generate_header", "generate_rust", "generate_dependencies"])
))]
struct Cli {
    /// Manifest describing the bundle
    manifest: PathBuf,

    /// Output file (default: derived from the manifest name)
    #[arg(long)]
    target: Option<PathBuf>,

    /// Directory to load files from; may be repeated (default: manifest directory)
    #[arg(long = "sourcedir", value_name = "DIR")]
    source_dirs: Vec<PathBuf>,

    /// Write the raw bundle image
    #[arg(long)]
    generate: bool,

    /// Write C source embedding the bundle
    #[arg(long)]
    generate_source: bool,

    /// Write a C header declaring the accessors
    #[arg(long)]
    generate_header: bool,

    /// Write a Rust module embedding the bundle
    #[arg(long)]
    generate_rust: bool,

    /// List the files the bundle depends on
    #[arg(long)]
    generate_dependencies: bool,

    /// Prefix for generated symbols
    #[arg(long)]
    c_name: Option<String>,

    /// Emit register/unregister functions instead of constructors
    #[arg(long)]
    manual_register: bool,

    /// Do not export the generated functions
    #[arg(long)]
    internal: bool,

    /// Declare the data as external instead of embedding it
    #[arg(long)]
    external_data: bool,

    /// TOML configuration file (default: RESOURCE_COMPILER_* environment)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn requested_kind(&self) -> Option<OutputKind> {
        [
            (self.generate, OutputKind::Bundle),
            (self.generate_source, OutputKind::CSource),
            (self.generate_header, OutputKind::CHeader),
            (self.generate_rust, OutputKind::RustSource),
            (self.generate_dependencies, OutputKind::Dependencies),
        ]
        .into_iter()
        .find_map(|(set, kind)| set.then_some(kind))
    }

    fn load_config(&self) -> Result<CompilerConfig> {
        let mut config = match &self.config {
            Some(path) => CompilerConfig::from_toml_file(path).map_err(anyhow::Error::msg)?,
            None => CompilerConfig::from_env(),
        };

        if !self.source_dirs.is_empty() {
            config.source_dirs = self.source_dirs.clone();
        }
        if let Some(name) = &self.c_name {
            config.c_name = Some(name.clone());
        }
        config.manual_register |= self.manual_register;
        config.internal |= self.internal;
        config.external_data |= self.external_data;

        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Configuration validation failed: {}", e))?;
        Ok(config)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.load_config()?;
    debug!(?config, "configuration loaded");
    let compiler = ResourceCompiler::new(config)?;

    let kind = cli
        .requested_kind()
        .or_else(|| cli.target.as_deref().map(OutputKind::from_target))
        .unwrap_or(OutputKind::Bundle);

    // Dependencies go to stdout unless a target is given
    if kind == OutputKind::Dependencies && cli.target.is_none() {
        let manifest = Manifest::load(&cli.manifest)
            .with_context(|| format!("Failed to load {}", cli.manifest.display()))?;
        let output = compiler.generate(&manifest, kind, &cli.manifest)?;
        std::io::stdout()
            .write_all(&output)
            .context("Failed to write dependency list")?;
        return Ok(());
    }

    let target = cli
        .target
        .clone()
        .unwrap_or_else(|| kind.default_target(&cli.manifest));

    compiler
        .compile_to_file(&cli.manifest, kind, &target)
        .with_context(|| format!("Failed to compile {}", cli.manifest.display()))?;
    Ok(())
}
