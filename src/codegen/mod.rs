// SPDX-License-Identifier: MIT
//! Source generators for embedding a bundle in a program
//!
//! - [`c_source`]: C translation unit holding the bundle and its accessor
//! - [`c_header`]: matching C declarations
//! - [`rust_source`]: Rust module with a [`StaticResource`](crate::StaticResource)
//! - [`dependency_list`]: newline separated list of input files

use std::path::{Path, PathBuf};

pub mod c_header;
pub mod c_source;
pub mod rust_source;

pub use c_header::generate_c_header;
pub use c_source::generate_c_source;
pub use rust_source::generate_rust_source;

/// Code generation errors
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error("Invalid C identifier {0:?}")]
    InvalidIdentifier(String),

    #[error("Cannot derive a C name from {0:?}")]
    NoName(String),
}

/// Options shared by the generators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Prefix of every generated symbol
    pub c_name: String,

    /// Hide the accessors from other shared objects
    pub internal: bool,

    /// Declare the data instead of defining it
    pub external_data: bool,

    /// Emit register/unregister functions instead of constructors
    pub manual_register: bool,
}

impl CodegenOptions {
    pub fn new(c_name: impl Into<String>) -> Result<Self, CodegenError> {
        let c_name = c_name.into();
        if !is_c_identifier(&c_name) {
            return Err(CodegenError::InvalidIdentifier(c_name));
        }
        Ok(Self {
            c_name,
            internal: false,
            external_data: false,
            manual_register: false,
        })
    }

    /// Options named after the output file, e.g. `my-app.c` gives `my_app`
    pub fn for_target(target: &Path) -> Result<Self, CodegenError> {
        Self::new(c_name_from_target(target)?)
    }

    /// Linkage keyword for exported function definitions
    pub(crate) fn export(&self) -> &'static str {
        if self.internal {
            "G_GNUC_INTERNAL"
        } else {
            "G_MODULE_EXPORT"
        }
    }

    /// Linkage keyword for declarations in headers
    pub(crate) fn linkage(&self) -> &'static str {
        if self.internal {
            "G_GNUC_INTERNAL"
        } else {
            "extern"
        }
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_c_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Derive a symbol prefix from a file name
///
/// Everything from the first `.` is dropped, `-` becomes `_` and other
/// characters that cannot appear in an identifier are skipped.
pub fn c_name_from_target(target: &Path) -> Result<String, CodegenError> {
    let base = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = base.split('.').next().unwrap_or_default();

    let mut name = String::with_capacity(stem.len());
    for c in stem.chars() {
        let allowed = if name.is_empty() {
            c.is_ascii_alphabetic() || c == '_'
        } else {
            c.is_ascii_alphanumeric() || c == '_'
        };
        if allowed {
            name.push(c);
        } else if c == '-' {
            name.push('_');
        }
    }

    if name.is_empty() {
        return Err(CodegenError::NoName(base));
    }
    Ok(name)
}

/// One path per line, as consumed by build systems
pub fn dependency_list(files: &[PathBuf]) -> String {
    files
        .iter()
        .map(|path| format!("{}\n", path.display()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_c_identifier() {
        assert!(is_c_identifier("resources"));
        assert!(is_c_identifier("_my_app2"));
        assert!(!is_c_identifier(""));
        assert!(!is_c_identifier("2fast"));
        assert!(!is_c_identifier("my-app"));
    }

    #[test]
    fn test_c_name_from_target() {
        assert_eq!(c_name_from_target(Path::new("out/resources.c")).unwrap(), "resources");
        assert_eq!(c_name_from_target(Path::new("my-app.gresource.h")).unwrap(), "my_app");
        assert_eq!(c_name_from_target(Path::new("9lives.c")).unwrap(), "lives");
        assert!(matches!(
            c_name_from_target(Path::new(".c")),
            Err(CodegenError::NoName(_))
        ));
    }

    #[test]
    fn test_options() {
        assert!(CodegenOptions::new("bad name").is_err());

        let mut options = CodegenOptions::new("app").unwrap();
        assert_eq!(options.export(), "G_MODULE_EXPORT");
        assert_eq!(options.linkage(), "extern");
        options.internal = true;
        assert_eq!(options.export(), "G_GNUC_INTERNAL");
        assert_eq!(options.linkage(), "G_GNUC_INTERNAL");
    }

    #[test]
    fn test_dependency_list() {
        let files = vec![PathBuf::from("a/one.txt"), PathBuf::from("two.ui")];
        assert_eq!(dependency_list(&files), "a/one.txt\ntwo.ui\n");
        assert_eq!(dependency_list(&[]), "");
    }
}
