// SPDX-License-Identifier: MIT
//! Bundle reader: path lookups, decompression and directory listings

use std::io::{Cursor, Read};
use std::path::Path;

use bytes::Bytes;
use tracing::debug;

use crate::bundle::ResourceBundle;
use crate::compression;
use crate::format::{flags, ItemType, BUNDLE_HEADER_SIZE};
use crate::path::{canonicalize, directory_key};
use crate::variant::ResourceValue;

/// Errors that can occur during reading
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("The resource at “{0}” does not exist")]
    NotFound(String),

    #[error("The resource at “{path}” failed to decompress: {reason}")]
    Decompression { path: String, reason: String },

    #[error("The resource at “{path}” is malformed: {reason}")]
    Malformed { path: String, reason: String },
}

/// Size and flags of a stored file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceInfo {
    /// Uncompressed size in bytes
    pub size: usize,

    /// Resource flags (see [`crate::format::flags`])
    pub flags: u32,
}

impl ResourceInfo {
    pub fn is_compressed(&self) -> bool {
        self.flags & flags::COMPRESSED != 0
    }
}

/// Reader for bundle images
#[derive(Debug, Clone)]
pub struct BundleReader {
    bundle: ResourceBundle,
}

impl BundleReader {
    /// Create a reader over shared bytes
    pub fn from_bytes(data: Bytes) -> Result<Self, ReadError> {
        let bundle = ResourceBundle::from_bytes(data).map_err(ReadError::InvalidFormat)?;
        debug!(
            size = bundle.size(),
            items = bundle.item_count(),
            "bundle opened"
        );
        Ok(Self { bundle })
    }

    /// Create a reader from owned data
    pub fn from_vec(data: Vec<u8>) -> Result<Self, ReadError> {
        Self::from_bytes(Bytes::from(data))
    }

    /// Create a reader over data embedded in the binary
    pub fn from_static(data: &'static [u8]) -> Result<Self, ReadError> {
        Self::from_bytes(Bytes::from_static(data))
    }

    /// Read a bundle file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ReadError> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_vec(data)
    }

    pub fn bundle(&self) -> &ResourceBundle {
        &self.bundle
    }

    fn find_value(&self, path: &str) -> Result<(String, ResourceValue<'_>), ReadError> {
        let key = canonicalize(path);
        let item = match self.bundle.find(&key) {
            Some((_, item)) if item.kind() == Some(ItemType::Value) => item,
            _ => return Err(ReadError::NotFound(key)),
        };

        let raw = self.bundle.value(&item).ok_or_else(|| ReadError::Malformed {
            path: key.clone(),
            reason: "value pointer is outside the bundle".to_string(),
        })?;
        let value = ResourceValue::decode(raw).map_err(|reason| ReadError::Malformed {
            path: key.clone(),
            reason,
        })?;

        Ok((key, value))
    }

    /// Size and flags of the file at `path`
    pub fn get_info(&self, path: &str) -> Result<ResourceInfo, ReadError> {
        let (_, value) = self.find_value(path)?;
        Ok(ResourceInfo {
            size: value.size as usize,
            flags: value.flags,
        })
    }

    /// Contents of the file at `path`, decompressed if needed
    ///
    /// Uncompressed files are returned as a slice of the bundle without
    /// copying.
    pub fn lookup_data(&self, path: &str) -> Result<Bytes, ReadError> {
        let (key, value) = self.find_value(path)?;
        let payload = value
            .payload()
            .map_err(|reason| ReadError::Malformed {
                path: key.clone(),
                reason,
            })?;

        if value.is_compressed() {
            compression::decompress(payload, value.size as usize)
                .map(Bytes::from)
                .map_err(|reason| ReadError::Decompression { path: key, reason })
        } else {
            Ok(self.bundle.data().slice_ref(payload))
        }
    }

    /// Stream the file at `path`
    ///
    /// The stream shares the bundle bytes and may outlive the reader.
    pub fn open_stream(&self, path: &str) -> Result<Box<dyn Read + Send>, ReadError> {
        let (key, value) = self.find_value(path)?;
        let payload = value
            .payload()
            .map_err(|reason| ReadError::Malformed {
                path: key.clone(),
                reason,
            })?;

        let payload = self.bundle.data().slice_ref(payload);
        if value.is_compressed() {
            compression::decoder(payload)
                .map_err(|reason| ReadError::Decompression { path: key, reason })
        } else {
            Ok(Box::new(Cursor::new(payload)))
        }
    }

    /// Names of the entries directly below the directory `path`
    ///
    /// Subdirectory names keep their trailing slash.
    pub fn enumerate_children(&self, path: &str) -> Result<Vec<String>, ReadError> {
        let key = directory_key(path);
        let children = self
            .bundle
            .find(&key)
            .and_then(|(_, item)| self.bundle.child_indices(&item))
            .ok_or_else(|| ReadError::NotFound(key.clone()))?;

        children
            .into_iter()
            .map(|index| {
                self.bundle
                    .item(index)
                    .and_then(|child| self.bundle.key_segment(&child))
                    .and_then(|segment| std::str::from_utf8(segment).ok())
                    .map(str::to_string)
                    .ok_or_else(|| ReadError::Malformed {
                        path: key.clone(),
                        reason: format!("child item {} is invalid", index),
                    })
            })
            .collect()
    }

    /// Whether `path` is a directory with at least one entry
    pub fn has_children(&self, path: &str) -> bool {
        self.enumerate_children(path)
            .map(|children| !children.is_empty())
            .unwrap_or(false)
    }

    /// Full paths of every file, sorted
    pub fn resource_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .bundle
            .items()
            .filter(|(_, item)| item.kind() == Some(ItemType::Value))
            .filter_map(|(index, _)| self.bundle.item_key(index))
            .collect();
        paths.sort();
        paths
    }

    /// Bundle statistics
    pub fn stats(&self) -> BundleStats {
        let mut stats = BundleStats {
            total_size: self.bundle.size(),
            header_size: BUNDLE_HEADER_SIZE,
            table_size: self.bundle.table_size(),
            ..BundleStats::default()
        };

        for (_, item) in self.bundle.items() {
            match item.kind() {
                Some(ItemType::Children) => stats.directory_count += 1,
                Some(ItemType::Value) => {
                    stats.file_count += 1;
                    let value = self
                        .bundle
                        .value(&item)
                        .and_then(|raw| ResourceValue::decode(raw).ok());
                    if let Some(value) = value {
                        stats.content_size += value.size as usize;
                        stats.stored_size += value.content.len();
                        if value.is_compressed() {
                            stats.compressed_count += 1;
                        }
                    }
                }
                _ => {}
            }
        }

        stats
    }
}

/// Bundle statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleStats {
    pub total_size: usize,
    pub header_size: usize,
    pub table_size: usize,
    pub file_count: usize,
    pub directory_count: usize,
    pub compressed_count: usize,
    /// Sum of uncompressed file sizes
    pub content_size: usize,
    /// Sum of stored payload sizes (compressed streams, nul terminators)
    pub stored_size: usize,
}

impl BundleStats {
    /// Stored payload bytes per content byte
    pub fn compression_ratio(&self) -> f64 {
        if self.content_size == 0 {
            return 1.0;
        }
        self.stored_size as f64 / self.content_size as f64
    }
}
