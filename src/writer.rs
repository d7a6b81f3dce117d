// SPDX-License-Identifier: MIT
//! Bundle writer
//!
//! Produces the byte image of a bundle. The output depends only on the set of
//! `(path, data, options)` inputs, never on insertion order, so generated
//! sources are stable across builds.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::compression::Compressor;
use crate::format::{
    align_up, bloom_header, flags, key_hash, BundleHeader, HashItem, ItemType, Pointer,
    BUNDLE_HEADER_SIZE, DEFAULT_BLOOM_SHIFT, HASH_ITEM_SIZE, HASH_TABLE_HEADER_SIZE, NO_PARENT,
};
use crate::path::{ancestor_keys, parent_key, validate_resource_path, PathProblem};
use crate::variant::ResourceValue;

/// Errors that can occur during writing
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Compression error for {path}: {reason}")]
    Compression { path: String, reason: String },

    #[error("Invalid resource path {path:?}: {problem}")]
    InvalidPath { path: String, problem: PathProblem },

    #[error("Resource already added: {0}")]
    DuplicateResource(String),

    #[error("Resource {path} is {size} bytes, larger than the format allows")]
    ResourceTooLarge { path: String, size: usize },

    #[error("Bundle would be {0} bytes, larger than the format allows")]
    BundleTooLarge(usize),
}

/// Per-entry storage options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryOptions {
    /// Store the payload as a zlib stream
    pub compressed: bool,
}

impl EntryOptions {
    pub fn compressed() -> Self {
        Self { compressed: true }
    }
}

/// A file ready to be laid out
#[derive(Debug, Clone)]
struct PendingResource {
    size: u32,
    flags: u32,
    /// Stored bytes, including the trailing nul when uncompressed
    content: Vec<u8>,
}

enum Node<'a> {
    Directory(Vec<&'a str>),
    File(&'a PendingResource),
}

/// Builder for bundle images
pub struct BundleWriter {
    resources: BTreeMap<String, PendingResource>,
    compressor: Compressor,
}

impl BundleWriter {
    /// Create an empty writer using the default compression level
    pub fn new() -> Self {
        Self {
            resources: BTreeMap::new(),
            compressor: Compressor::default(),
        }
    }

    /// Create a writer with a custom compressor
    pub fn with_compressor(compressor: Compressor) -> Self {
        Self {
            resources: BTreeMap::new(),
            compressor,
        }
    }

    /// Number of files added so far
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.resources.contains_key(path)
    }

    /// Add an uncompressed file
    pub fn add_resource(&mut self, path: &str, data: Vec<u8>) -> Result<(), WriteError> {
        self.add_resource_with_options(path, data, EntryOptions::default())
    }

    /// Add a file with explicit storage options
    pub fn add_resource_with_options(
        &mut self,
        path: &str,
        mut data: Vec<u8>,
        options: EntryOptions,
    ) -> Result<(), WriteError> {
        validate_resource_path(path).map_err(|problem| WriteError::InvalidPath {
            path: path.to_string(),
            problem,
        })?;

        if self.resources.contains_key(path) {
            return Err(WriteError::DuplicateResource(path.to_string()));
        }

        let size = u32::try_from(data.len()).map_err(|_| WriteError::ResourceTooLarge {
            path: path.to_string(),
            size: data.len(),
        })?;

        let resource = if options.compressed {
            let content =
                self.compressor
                    .compress(&data)
                    .map_err(|reason| WriteError::Compression {
                        path: path.to_string(),
                        reason,
                    })?;
            debug!(
                path,
                original = data.len(),
                compressed = content.len(),
                "compressed resource"
            );
            PendingResource {
                size,
                flags: flags::COMPRESSED,
                content,
            }
        } else {
            data.push(0);
            PendingResource {
                size,
                flags: flags::NONE,
                content: data,
            }
        };

        self.resources.insert(path.to_string(), resource);
        Ok(())
    }

    /// Lay out the bundle and return its bytes
    pub fn finalize(self) -> Result<Vec<u8>, WriteError> {
        let nodes = self.collect_nodes();
        let keys: Vec<&str> = nodes.keys().copied().collect();
        let n_items = keys.len();
        let hashes: Vec<u32> = keys.iter().map(|key| key_hash(key)).collect();

        // Keys are already sorted; a stable sort keeps that order within a bucket.
        let n_buckets = n_items;
        let mut order: Vec<usize> = (0..n_items).collect();
        order.sort_by_key(|&i| hashes[i] % n_buckets as u32);

        let index_of: HashMap<&str, u32> = order
            .iter()
            .enumerate()
            .map(|(index, &i)| (keys[i], index as u32))
            .collect();

        let table_size = HASH_TABLE_HEADER_SIZE + 4 * n_buckets + HASH_ITEM_SIZE * n_items;
        let mut buffer = vec![0u8; BUNDLE_HEADER_SIZE];
        let table_start = allocate(&mut buffer, 4, table_size);
        let buckets_start = table_start + HASH_TABLE_HEADER_SIZE;
        let items_start = buckets_start + 4 * n_buckets;

        buffer[table_start..table_start + 4]
            .copy_from_slice(&bloom_header(DEFAULT_BLOOM_SHIFT, 0).to_le_bytes());
        buffer[table_start + 4..table_start + 8]
            .copy_from_slice(&(n_buckets as u32).to_le_bytes());

        let mut bucket_sizes = vec![0u32; n_buckets];
        for &hash in &hashes {
            bucket_sizes[(hash % n_buckets as u32) as usize] += 1;
        }
        let mut first_item = 0u32;
        for (bucket, size) in bucket_sizes.iter().enumerate() {
            let offset = buckets_start + 4 * bucket;
            buffer[offset..offset + 4].copy_from_slice(&first_item.to_le_bytes());
            first_item += size;
        }

        for (index, &i) in order.iter().enumerate() {
            let key = keys[i];
            let parent = parent_key(key);
            let segment = match parent {
                Some(parent) => &key[parent.len()..],
                None => key,
            };

            let key_start = allocate(&mut buffer, 1, segment.len());
            buffer[key_start..key_start + segment.len()].copy_from_slice(segment.as_bytes());

            let (item_type, value) = match &nodes[key] {
                Node::Directory(children) => {
                    let mut children = children.clone();
                    children.sort_unstable();
                    let start =
                        allocate(&mut buffer, ItemType::Children.alignment(), 4 * children.len());
                    for (n, child) in children.iter().enumerate() {
                        let offset = start + 4 * n;
                        buffer[offset..offset + 4].copy_from_slice(&index_of[child].to_le_bytes());
                    }
                    (ItemType::Children, Pointer::new(start, buffer.len()))
                }
                Node::File(resource) => {
                    let encoded = ResourceValue {
                        size: resource.size,
                        flags: resource.flags,
                        content: &resource.content,
                    }
                    .encode();
                    let start = allocate(&mut buffer, ItemType::Value.alignment(), encoded.len());
                    buffer[start..].copy_from_slice(&encoded);
                    (ItemType::Value, Pointer::new(start, buffer.len()))
                }
            };

            let item = HashItem {
                hash_value: hashes[i],
                parent: parent.map_or(NO_PARENT, |p| index_of[p]),
                key_start: key_start as u32,
                key_size: segment.len() as u16,
                item_type: item_type.tag(),
                value,
            };
            let offset = items_start + HASH_ITEM_SIZE * index;
            item.write_to_buffer(&mut buffer[offset..offset + HASH_ITEM_SIZE]);
        }

        if u32::try_from(buffer.len()).is_err() {
            return Err(WriteError::BundleTooLarge(buffer.len()));
        }

        let header = BundleHeader::new(Pointer::new(table_start, table_start + table_size));
        header.write_to_buffer(&mut buffer[..BUNDLE_HEADER_SIZE]);

        debug!(
            files = self.resources.len(),
            items = n_items,
            bytes = buffer.len(),
            "bundle finalized"
        );
        Ok(buffer)
    }

    /// Every key of the bundle: the files plus all their ancestor directories
    fn collect_nodes(&self) -> BTreeMap<&str, Node<'_>> {
        let mut nodes: BTreeMap<&str, Node<'_>> = BTreeMap::new();

        for (path, resource) in &self.resources {
            for dir in ancestor_keys(path) {
                if nodes.contains_key(dir) {
                    continue;
                }
                nodes.insert(dir, Node::Directory(Vec::new()));
                if let Some(parent) = parent_key(dir) {
                    if let Some(Node::Directory(children)) = nodes.get_mut(parent) {
                        children.push(dir);
                    }
                }
            }

            nodes.insert(path.as_str(), Node::File(resource));
            if let Some(parent) = parent_key(path) {
                if let Some(Node::Directory(children)) = nodes.get_mut(parent) {
                    children.push(path.as_str());
                }
            }
        }

        nodes
    }
}

impl Default for BundleWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Reserve `size` zeroed bytes at the next `alignment` boundary
fn allocate(buffer: &mut Vec<u8>, alignment: usize, size: usize) -> usize {
    let start = align_up(buffer.len(), alignment);
    buffer.resize(start + size, 0);
    start
}
