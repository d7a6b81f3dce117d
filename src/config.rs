// SPDX-License-Identifier: MIT
//! Compiler configuration
//!
//! Values come from `RESOURCE_COMPILER_*` environment variables or a TOML
//! file; command line flags override both.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::codegen::is_c_identifier;
use crate::compression::DEFAULT_COMPRESSION_LEVEL;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Directories searched for source files, in order
    pub source_dirs: Vec<PathBuf>,

    /// Symbol prefix for generated code; derived from the target when unset
    pub c_name: Option<String>,

    pub manual_register: bool,
    pub internal: bool,
    pub external_data: bool,

    /// zlib level for `compressed="true"` entries (0-9)
    pub compression_level: u32,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            source_dirs: Vec::new(),
            c_name: None,
            manual_register: false,
            internal: false,
            external_data: false,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl CompilerConfig {
    pub fn from_env() -> Self {
        Self {
            source_dirs: std::env::var("RESOURCE_COMPILER_SOURCEDIRS")
                .map(|dirs| {
                    dirs.split(':')
                        .filter(|dir| !dir.is_empty())
                        .map(PathBuf::from)
                        .collect()
                })
                .unwrap_or_default(),
            c_name: std::env::var("RESOURCE_COMPILER_C_NAME")
                .ok()
                .filter(|name| !name.is_empty()),
            manual_register: env_flag("RESOURCE_COMPILER_MANUAL_REGISTER"),
            internal: env_flag("RESOURCE_COMPILER_INTERNAL"),
            external_data: env_flag("RESOURCE_COMPILER_EXTERNAL_DATA"),
            compression_level: std::env::var("RESOURCE_COMPILER_COMPRESSION_LEVEL")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_COMPRESSION_LEVEL),
        }
    }

    /// Load from a TOML file; missing keys take their defaults
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_toml_str(&text).map_err(|e| format!("{}: {}", path.display(), e))
    }

    pub fn from_toml_str(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.c_name {
            if !is_c_identifier(name) {
                return Err(format!("c_name {:?} is not a valid C identifier", name));
            }
        }

        if self.compression_level > 9 {
            return Err("compression_level must be between 0 and 9".to_string());
        }

        if let Some(dir) = self.source_dirs.iter().find(|dir| dir.as_os_str().is_empty()) {
            return Err(format!("source directory {:?} is empty", dir));
        }

        Ok(())
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = CompilerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.compression_level, 9);
        assert!(config.source_dirs.is_empty());
    }

    #[test]
    fn test_from_toml() {
        let config = CompilerConfig::from_toml_str(
            r#"
            source_dirs = ["data", "build/data"]
            c_name = "app_resources"
            manual_register = true
            "#,
        )
        .unwrap();

        assert_eq!(
            config.source_dirs,
            vec![PathBuf::from("data"), PathBuf::from("build/data")]
        );
        assert_eq!(config.c_name.as_deref(), Some("app_resources"));
        assert!(config.manual_register);
        assert!(!config.internal);
        assert_eq!(config.compression_level, DEFAULT_COMPRESSION_LEVEL);
    }

    #[test]
    fn test_from_toml_rejects_unknown_keys() {
        assert!(CompilerConfig::from_toml_str("sourcedir = \"x\"").is_err());
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "internal = true\ncompression_level = 3").unwrap();

        let config = CompilerConfig::from_toml_file(file.path()).unwrap();
        assert!(config.internal);
        assert_eq!(config.compression_level, 3);

        assert!(CompilerConfig::from_toml_file("/nonexistent/config.toml").is_err());
    }

    #[test]
    fn test_validate() {
        let mut config = CompilerConfig {
            c_name: Some("not-valid".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.c_name = Some("valid_name".to_string());
        config.compression_level = 12;
        assert!(config.validate().is_err());

        config.compression_level = 0;
        assert!(config.validate().is_ok());
    }
}
