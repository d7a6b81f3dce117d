// SPDX-License-Identifier: MIT
//! Resource manifests
//!
//! A manifest lists the files of a bundle grouped under path prefixes:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <gresources>
//!   <gresource prefix="/assets">
//!     <file>resource1.txt</file>
//!     <file compressed="true" alias="style.css">css/site.css</file>
//!     <file preprocess="xml-stripblanks">ui/window.ui</file>
//!   </gresource>
//! </gresources>
//! ```
//!
//! Each `<file>` is stored at `prefix + "/" + (alias or file name)` and read
//! from the first source directory that contains it.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::path::{join_prefix, validate_resource_path};
use crate::preprocess::{self, Preprocessor};
use crate::writer::{BundleWriter, EntryOptions, WriteError};

/// Errors raised while parsing or building a manifest
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Element <{element}> not allowed inside {context}")]
    UnexpectedElement { element: String, context: String },

    #[error("Invalid value {value:?} for attribute {attribute} of <{element}>")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
    },

    #[error("<file> element without a file name")]
    MissingFileName,

    #[error("Invalid resource path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("File {0} appears multiple times in the resource")]
    DuplicateResource(String),

    #[error("Failed to locate “{file}” in any source directory")]
    SourceNotFound { file: String, searched: Vec<PathBuf> },

    #[error("Failed to preprocess {file}: {reason}")]
    Preprocess { file: String, reason: String },

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// One `<file>` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSpec {
    /// Path inside the bundle
    pub path: String,

    /// File name relative to the source directories
    pub file: String,

    pub compressed: bool,

    pub preprocess: Vec<Preprocessor>,
}

/// Parsed manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub resources: Vec<ResourceSpec>,

    /// Directory of the manifest file, used when no source directory is given
    pub base_dir: Option<PathBuf>,
}

enum Scope {
    Document,
    Resources,
    Resource { prefix: String },
    File { prefix: String, spec: FileAttributes, name: String },
    Done,
}

impl Scope {
    fn describe(&self) -> &'static str {
        match self {
            Scope::Document => "the document",
            Scope::Resources => "<gresources>",
            Scope::Resource { .. } => "<gresource>",
            Scope::File { .. } => "<file>",
            Scope::Done => "the end of the document",
        }
    }
}

#[derive(Default)]
struct FileAttributes {
    alias: Option<String>,
    compressed: bool,
    preprocess: Vec<Preprocessor>,
}

impl Manifest {
    /// Parse manifest XML
    pub fn parse(xml: &str) -> Result<Self, ManifestError> {
        let mut reader = Reader::from_str(xml);
        let mut scope = Scope::Document;
        let mut manifest = Manifest::default();
        let mut seen: HashSet<String> = HashSet::new();

        loop {
            let event = reader
                .read_event()
                .map_err(|e| ManifestError::Xml(e.to_string()))?;

            match event {
                Event::Start(ref element) => {
                    scope = open_element(scope, element)?;
                }
                Event::Empty(ref element) => {
                    let opened = open_element(scope, element)?;
                    scope = manifest.close_element(opened, &mut seen)?;
                }
                Event::Text(ref text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| ManifestError::Xml(e.to_string()))?;
                    scope = append_text(scope, &text)?;
                }
                Event::CData(ref data) => {
                    let text = String::from_utf8_lossy(data).into_owned();
                    scope = append_text(scope, &text)?;
                }
                Event::End(_) => {
                    scope = manifest.close_element(scope, &mut seen)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        match scope {
            Scope::Done => {
                debug!(resources = manifest.resources.len(), "manifest parsed");
                Ok(manifest)
            }
            _ => Err(ManifestError::Xml(
                "document does not contain a complete <gresources> element".to_string(),
            )),
        }
    }

    /// Read and parse a manifest file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let xml = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut manifest = Self::parse(&xml)?;
        manifest.base_dir = Some(
            path.parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        );
        Ok(manifest)
    }

    fn close_element(
        &mut self,
        scope: Scope,
        seen: &mut HashSet<String>,
    ) -> Result<Scope, ManifestError> {
        match scope {
            Scope::File { prefix, spec, name } => {
                let file = name.trim().to_string();
                if file.is_empty() {
                    return Err(ManifestError::MissingFileName);
                }

                let path = join_prefix(&prefix, spec.alias.as_deref().unwrap_or(&file));
                validate_resource_path(&path).map_err(|problem| ManifestError::InvalidPath {
                    path: path.clone(),
                    reason: problem.to_string(),
                })?;
                if !seen.insert(path.clone()) {
                    return Err(ManifestError::DuplicateResource(path));
                }

                self.resources.push(ResourceSpec {
                    path,
                    file,
                    compressed: spec.compressed,
                    preprocess: spec.preprocess,
                });
                Ok(Scope::Resource { prefix })
            }
            Scope::Resource { .. } => Ok(Scope::Resources),
            Scope::Resources => Ok(Scope::Done),
            other => Err(ManifestError::Xml(format!(
                "unexpected closing tag in {}",
                other.describe()
            ))),
        }
    }

    /// Directories searched for source files, in order
    fn search_dirs(&self, source_dirs: &[PathBuf]) -> Vec<PathBuf> {
        if !source_dirs.is_empty() {
            return source_dirs.to_vec();
        }
        vec![self.base_dir.clone().unwrap_or_else(|| PathBuf::from("."))]
    }

    /// Locate the source file of `spec`
    pub fn resolve_source(
        &self,
        spec: &ResourceSpec,
        source_dirs: &[PathBuf],
    ) -> Result<PathBuf, ManifestError> {
        let searched = self.search_dirs(source_dirs);
        searched
            .iter()
            .map(|dir| dir.join(&spec.file))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| ManifestError::SourceNotFound {
                file: spec.file.clone(),
                searched,
            })
    }

    /// Every source file the bundle depends on, in manifest order
    pub fn dependencies(&self, source_dirs: &[PathBuf]) -> Result<Vec<PathBuf>, ManifestError> {
        self.resources
            .iter()
            .map(|spec| self.resolve_source(spec, source_dirs))
            .collect()
    }

    /// Read, preprocess and add every file to a new writer
    pub fn to_writer(&self, source_dirs: &[PathBuf]) -> Result<BundleWriter, ManifestError> {
        let mut writer = BundleWriter::new();
        self.fill_writer(&mut writer, source_dirs)?;
        Ok(writer)
    }

    /// Read, preprocess and add every file to `writer`
    pub fn fill_writer(
        &self,
        writer: &mut BundleWriter,
        source_dirs: &[PathBuf],
    ) -> Result<(), ManifestError> {
        for spec in &self.resources {
            let source = self.resolve_source(spec, source_dirs)?;
            let data = std::fs::read(&source).map_err(|e| ManifestError::Io {
                path: source.clone(),
                source: e,
            })?;
            let data = preprocess::apply_all(&spec.preprocess, data).map_err(|reason| {
                ManifestError::Preprocess {
                    file: spec.file.clone(),
                    reason,
                }
            })?;

            debug!(path = %spec.path, source = %source.display(), bytes = data.len(), "adding resource");
            writer.add_resource_with_options(
                &spec.path,
                data,
                EntryOptions {
                    compressed: spec.compressed,
                },
            )?;
        }
        Ok(())
    }

    /// Build the bundle image
    pub fn build(&self, source_dirs: &[PathBuf]) -> Result<Vec<u8>, ManifestError> {
        Ok(self.to_writer(source_dirs)?.finalize()?)
    }
}

fn element_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.name().as_ref()).into_owned()
}

fn open_element(scope: Scope, element: &BytesStart<'_>) -> Result<Scope, ManifestError> {
    let name = element_name(element);
    match (name.as_str(), scope) {
        ("gresources", Scope::Document) => Ok(Scope::Resources),
        ("gresource", Scope::Resources) => {
            let mut prefix = String::from("/");
            for (key, value) in attributes(element)? {
                match key.as_str() {
                    "prefix" => prefix = value,
                    _ => return Err(invalid_attribute(&name, &key, &value)),
                }
            }
            Ok(Scope::Resource { prefix })
        }
        ("file", Scope::Resource { prefix }) => {
            let mut spec = FileAttributes::default();
            for (key, value) in attributes(element)? {
                match key.as_str() {
                    "alias" => spec.alias = Some(value),
                    "compressed" => {
                        spec.compressed = parse_boolean(&value)
                            .ok_or_else(|| invalid_attribute(&name, &key, &value))?
                    }
                    "preprocess" => {
                        spec.preprocess = Preprocessor::parse_list(&value)
                            .map_err(|_| invalid_attribute(&name, &key, &value))?
                    }
                    _ => return Err(invalid_attribute(&name, &key, &value)),
                }
            }
            Ok(Scope::File {
                prefix,
                spec,
                name: String::new(),
            })
        }
        (_, scope) => Err(ManifestError::UnexpectedElement {
            element: name,
            context: scope.describe().to_string(),
        }),
    }
}

fn append_text(scope: Scope, text: &str) -> Result<Scope, ManifestError> {
    match scope {
        Scope::File {
            prefix,
            spec,
            mut name,
        } => {
            name.push_str(text);
            Ok(Scope::File { prefix, spec, name })
        }
        other if text.trim().is_empty() => Ok(other),
        other => Err(ManifestError::Xml(format!(
            "text {:?} not allowed in {}",
            text.trim(),
            other.describe()
        ))),
    }
}

fn attributes(element: &BytesStart<'_>) -> Result<Vec<(String, String)>, ManifestError> {
    element
        .attributes()
        .map(|attr| {
            let attr = attr.map_err(|e| ManifestError::Xml(e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| ManifestError::Xml(e.to_string()))?
                .into_owned();
            Ok((key, value))
        })
        .collect()
}

fn invalid_attribute(element: &str, attribute: &str, value: &str) -> ManifestError {
    ManifestError::InvalidAttribute {
        element: element.to_string(),
        attribute: attribute.to_string(),
        value: value.to_string(),
    }
}

fn parse_boolean(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "t" | "1" => Some(true),
        "false" | "no" | "n" | "f" | "0" => Some(false),
        _ => None,
    }
}
