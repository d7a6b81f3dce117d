// SPDX-License-Identifier: MIT
//! Process-wide registry of loaded bundles
//!
//! Lookups walk the registered bundles from the most recently registered to
//! the oldest, so a later bundle can shadow a path provided by an earlier one.

use std::io::Read;
use std::sync::Arc;

use bytes::Bytes;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::path::{canonicalize, directory_key};
use crate::reader::{BundleReader, ReadError, ResourceInfo};

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::new);

/// Ordered set of bundles that path lookups are resolved against
#[derive(Debug, Default)]
pub struct Registry {
    bundles: RwLock<Vec<Arc<BundleReader>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by the whole process
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Make `bundle` visible to lookups, ahead of earlier registrations
    pub fn register(&self, bundle: Arc<BundleReader>) {
        let mut bundles = self.bundles.write();
        bundles.insert(0, bundle);
        info!(registered = bundles.len(), "bundle registered");
    }

    /// Remove `bundle`; returns `false` if it was not registered
    pub fn unregister(&self, bundle: &Arc<BundleReader>) -> bool {
        let mut bundles = self.bundles.write();
        match bundles.iter().position(|b| Arc::ptr_eq(b, bundle)) {
            Some(index) => {
                bundles.remove(index);
                info!(registered = bundles.len(), "bundle unregistered");
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.bundles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.read().is_empty()
    }

    /// First successful lookup across bundles, newest first
    ///
    /// A bundle that holds the path but fails to produce it stops the search.
    fn resolve<T>(
        &self,
        path: &str,
        lookup: impl Fn(&BundleReader) -> Result<T, ReadError>,
    ) -> Result<T, ReadError> {
        let bundles = self.bundles.read();
        for bundle in bundles.iter() {
            match lookup(bundle.as_ref()) {
                Err(ReadError::NotFound(_)) => continue,
                result => return result,
            }
        }
        debug!(path, bundles = bundles.len(), "resource not found");
        Err(ReadError::NotFound(canonicalize(path)))
    }

    pub fn lookup_data(&self, path: &str) -> Result<Bytes, ReadError> {
        self.resolve(path, |bundle| bundle.lookup_data(path))
    }

    pub fn open_stream(&self, path: &str) -> Result<Box<dyn Read + Send>, ReadError> {
        self.resolve(path, |bundle| bundle.open_stream(path))
    }

    pub fn get_info(&self, path: &str) -> Result<ResourceInfo, ReadError> {
        self.resolve(path, |bundle| bundle.get_info(path))
    }

    /// Union of the directory listings of every bundle containing `path`
    ///
    /// Names keep the order of the first bundle that reports them.
    pub fn enumerate_children(&self, path: &str) -> Result<Vec<String>, ReadError> {
        let bundles = self.bundles.read();
        let mut found = false;
        let mut children: Vec<String> = Vec::new();

        for bundle in bundles.iter() {
            match bundle.enumerate_children(path) {
                Ok(names) => {
                    found = true;
                    for name in names {
                        if !children.contains(&name) {
                            children.push(name);
                        }
                    }
                }
                Err(ReadError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }

        if found {
            Ok(children)
        } else {
            Err(ReadError::NotFound(directory_key(path)))
        }
    }

    pub fn has_children(&self, path: &str) -> bool {
        self.bundles
            .read()
            .iter()
            .any(|bundle| bundle.has_children(path))
    }
}

/// Register `bundle` with the global registry
pub fn register(bundle: Arc<BundleReader>) {
    Registry::global().register(bundle)
}

/// Unregister `bundle` from the global registry
pub fn unregister(bundle: &Arc<BundleReader>) -> bool {
    Registry::global().unregister(bundle)
}

/// Look `path` up in the global registry
pub fn lookup_data(path: &str) -> Result<Bytes, ReadError> {
    Registry::global().lookup_data(path)
}

pub fn open_stream(path: &str) -> Result<Box<dyn Read + Send>, ReadError> {
    Registry::global().open_stream(path)
}

pub fn get_info(path: &str) -> Result<ResourceInfo, ReadError> {
    Registry::global().get_info(path)
}

pub fn enumerate_children(path: &str) -> Result<Vec<String>, ReadError> {
    Registry::global().enumerate_children(path)
}

pub fn has_children(path: &str) -> bool {
    Registry::global().has_children(path)
}
