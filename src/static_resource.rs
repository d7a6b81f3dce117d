// SPDX-License-Identifier: MIT
//! Bundles compiled into the binary
//!
//! A [`StaticResource`] wraps the embedded bytes of one bundle. The embedding
//! program decides when it becomes visible: call [`StaticResource::init`]
//! once during startup and [`StaticResource::fini`] during shutdown.
//!
//! ```
//! use resource_bundle::StaticResource;
//!
//! static EMPTY: [u8; 32] = [
//!     b'G', b'V', b'a', b'r', b'i', b'a', b'n', b't', 0, 0, 0, 0, 0, 0, 0, 0,
//!     24, 0, 0, 0, 32, 0, 0, 0, 0, 0, 0, 0x28, 0, 0, 0, 0,
//! ];
//! static RESOURCE: StaticResource = StaticResource::new(&EMPTY);
//!
//! RESOURCE.init().unwrap();
//! assert!(RESOURCE.is_registered());
//! RESOURCE.fini();
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::reader::{BundleReader, ReadError};
use crate::registry::Registry;

/// A bundle embedded as static data
#[derive(Debug)]
pub struct StaticResource {
    data: &'static [u8],
    resource: OnceCell<Arc<BundleReader>>,
    registered: AtomicBool,
}

impl StaticResource {
    pub const fn new(data: &'static [u8]) -> Self {
        Self {
            data,
            resource: OnceCell::new(),
            registered: AtomicBool::new(false),
        }
    }

    /// The embedded bytes
    pub fn data(&self) -> &'static [u8] {
        self.data
    }

    /// Parsed bundle, created on first use
    ///
    /// Works whether or not the bundle has been registered.
    pub fn get_resource(&self) -> Result<Arc<BundleReader>, ReadError> {
        self.resource
            .get_or_try_init(|| {
                debug!(size = self.data.len(), "parsing static bundle");
                BundleReader::from_static(self.data).map(Arc::new)
            })
            .cloned()
    }

    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }

    /// Register with the global registry
    pub fn init(&self) -> Result<(), ReadError> {
        self.init_in(Registry::global())
    }

    /// Unregister from the global registry
    pub fn fini(&self) {
        self.fini_in(Registry::global())
    }

    /// Register with `registry`
    ///
    /// A second call without an intervening [`fini_in`](Self::fini_in) is
    /// ignored with a warning.
    pub fn init_in(&self, registry: &Registry) -> Result<(), ReadError> {
        let resource = self.get_resource()?;
        if self.registered.swap(true, Ordering::AcqRel) {
            warn!("static bundle is already registered");
            return Ok(());
        }
        registry.register(resource);
        Ok(())
    }

    /// Unregister from `registry`
    ///
    /// A no-op with a warning when the bundle is not registered there; the
    /// bundle then stays registered wherever [`init_in`](Self::init_in) put it.
    pub fn fini_in(&self, registry: &Registry) {
        let Some(resource) = self.resource.get() else {
            warn!("static bundle finalized without being registered");
            return;
        };
        if !self.is_registered() {
            warn!("static bundle finalized without being registered");
            return;
        }
        if !registry.unregister(resource) {
            warn!("static bundle is not registered in this registry");
            return;
        }
        self.registered.store(false, Ordering::Release);
    }
}
