// SPDX-License-Identifier: MIT
//! # Resource Bundle
//!
//! Compile a set of files into a single read-only bundle image and embed it in
//! a program, either as generated C or Rust source or as a file loaded at
//! runtime. Files are addressed by absolute paths such as
//! `/assets/resource1.txt`.
//!
//! ## Format Overview
//!
//! A bundle is a GVariant-style hash table. Every file and every directory on
//! the way to it is an item; items know their parent, so keys are stored as
//! the segment relative to the parent directory. Lookups hash the full path,
//! scan one bucket, and compare keys by walking up the parent chain.
//!
//! ## Format Specification
//!
//! ```text
//! Header (24 bytes, little-endian):
//! - Magic: "GVariant" (8 bytes)
//! - Version: 0 (4 bytes)
//! - Options: 0 (4 bytes)
//! - Root: start, end of the hash table (4 + 4 bytes)
//!
//! Hash table (4-byte aligned):
//! - Bloom header: shift << 27 | bloom words (4 bytes)
//! - Bucket count (4 bytes)
//! - Bloom words (4 bytes each, always zero)
//! - Buckets: index of the first item in each bucket (4 bytes each)
//! - Items (24 bytes each):
//!     hash (4) | parent (4) | key start (4) | key size (2)
//!     | type 'v' file, 'L' directory (1) | unused (1) | value start, end (4 + 4)
//!
//! Payload:
//! - Keys (unaligned)
//! - Directory values: sorted child item indices (4-byte aligned)
//! - File values (8-byte aligned):
//!     size (4) | flags (4) | content | nul | "(uuay)"
//! ```
//!
//! Flag bit 0 marks content stored as a zlib stream; `size` is always the
//! uncompressed length.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use resource_bundle::{BundleReader, BundleWriter, EntryOptions, Registry};
//!
//! let mut writer = BundleWriter::new();
//! writer.add_resource("/assets/hello.txt", b"hello".to_vec()).unwrap();
//! writer
//!     .add_resource_with_options("/assets/big.txt", vec![b'x'; 4096], EntryOptions::compressed())
//!     .unwrap();
//! let data = writer.finalize().unwrap();
//!
//! let bundle = Arc::new(BundleReader::from_vec(data).unwrap());
//! assert_eq!(bundle.enumerate_children("/assets").unwrap(), vec!["big.txt", "hello.txt"]);
//!
//! let registry = Registry::new();
//! registry.register(Arc::clone(&bundle));
//! assert_eq!(&registry.lookup_data("/assets/hello.txt").unwrap()[..], b"hello");
//! assert_eq!(registry.lookup_data("/assets/big.txt").unwrap().len(), 4096);
//! ```
//!
//! Bundles compiled into a binary are wrapped in a [`StaticResource`] and
//! registered explicitly with [`StaticResource::init`].

pub mod bundle;
pub mod codegen;
pub mod compiler;
pub mod compression;
pub mod config;
pub mod format;
pub mod manifest;
pub mod path;
pub mod preprocess;
pub mod reader;
pub mod registry;
pub mod static_resource;
pub mod variant;
pub mod writer;

// Re-export main types
pub use bundle::ResourceBundle;
pub use codegen::{CodegenError, CodegenOptions};
pub use compiler::{CompileError, OutputKind, ResourceCompiler};
pub use compression::Compressor;
pub use config::CompilerConfig;
pub use format::{flags, BUNDLE_HEADER_SIZE, BUNDLE_MAGIC};
pub use manifest::{Manifest, ManifestError, ResourceSpec};
pub use preprocess::Preprocessor;
pub use reader::{BundleReader, BundleStats, ReadError, ResourceInfo};
pub use registry::Registry;
pub use static_resource::StaticResource;
pub use writer::{BundleWriter, EntryOptions, WriteError};
