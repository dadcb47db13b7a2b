//! The single owner of one native handle.

use super::{FluidSynthApi, SynthError};
use crate::native::{Handle, MarshalError};
use std::sync::Arc;

/// Native destroy function for one kind of handle.
pub(crate) type Destroy = fn(&FluidSynthApi, Handle) -> Result<(), MarshalError>;

/// Owns a non-null handle and calls its destroy function exactly once, on
/// drop.
pub(crate) struct OwnedHandle {
    api: Arc<FluidSynthApi>,
    handle: Handle,
    resource: &'static str,
    destroy: Destroy,
}

impl OwnedHandle {
    /// Takes ownership of the result of a native create call.
    ///
    /// # Errors
    ///
    /// `OutOfMemory` if `handle` is null. Nothing is destroyed in that case.
    pub fn new(
        api: &Arc<FluidSynthApi>,
        handle: Handle,
        resource: &'static str,
        destroy: Destroy,
    ) -> Result<Self, SynthError> {
        if handle.is_null() {
            return Err(SynthError::OutOfMemory { resource });
        }

        Ok(Self {
            api: Arc::clone(api),
            handle,
            resource,
            destroy,
        })
    }

    pub fn api(&self) -> &Arc<FluidSynthApi> {
        &self.api
    }

    pub fn get(&self) -> Handle {
        self.handle
    }
}

impl Drop for OwnedHandle {
    fn drop(&mut self) {
        tracing::trace!("Destroying {} {:?}", self.resource, self.handle);
        // Destroy functions take no text, so marshaling cannot fail here.
        if let Err(e) = (self.destroy)(&self.api, self.handle) {
            tracing::error!("Failed to destroy {}: {}", self.resource, e);
        }
    }
}
