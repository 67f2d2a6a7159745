//! Shared access to codec registries.
//!
//! A [`RegistryHandle`] is a cheaply cloneable reference
//! to a registry which can be read concurrently
//! and reconfigured at run-time.
//! A [`DefaultRegistry`] is a slot for a handle
//! which is filled in with the default descriptor document on first use.
use crate::descriptor::{CodecDescriptor, ReaderDescriptor, WriterDescriptor};
use crate::registry::{CodecRegistry, LoadError};
use crate::resolve::{first_reader, first_writer, ReaderItem, WriterItem};
use dicom_codec::CodecCatalog;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// A shared, lockable codec registry.
///
/// Codec resolution through the handle takes a snapshot
/// of the transfer syntax' descriptors,
/// so concurrent changes to the registry
/// never disturb a resolution in progress.
pub struct RegistryHandle<D> {
    inner: Arc<RwLock<CodecRegistry<D>>>,
}

impl<D> Clone for RegistryHandle<D> {
    fn clone(&self) -> Self {
        RegistryHandle {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: fmt::Display> fmt::Debug for RegistryHandle<D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("RegistryHandle").field(&*self.read()).finish()
    }
}

impl<D> From<CodecRegistry<D>> for RegistryHandle<D> {
    fn from(registry: CodecRegistry<D>) -> Self {
        RegistryHandle::new(registry)
    }
}

impl<D> RegistryHandle<D> {
    /// Wrap a registry into a new handle.
    pub fn new(registry: CodecRegistry<D>) -> Self {
        RegistryHandle {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    /// Lock the registry for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, CodecRegistry<D>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock the registry for changes.
    pub fn write(&self) -> RwLockWriteGuard<'_, CodecRegistry<D>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Check whether two handles refer to the same registry.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<D: Clone> RegistryHandle<D> {
    /// Obtain a copy of the descriptors registered for a transfer syntax.
    pub fn get(&self, tsuid: &str) -> Option<Vec<D>> {
        self.read().get(tsuid).map(<[D]>::to_vec)
    }
}

impl<D: CodecDescriptor> RegistryHandle<D> {
    /// Create a handle to a registry loaded with the default descriptor document,
    /// failing if the document cannot be loaded.
    pub fn load_default() -> Result<Self, LoadError> {
        CodecRegistry::load_default().map(RegistryHandle::new)
    }
}

impl RegistryHandle<ReaderDescriptor> {
    /// Obtain a decoder for the given transfer syntax.
    ///
    /// See [`CodecRegistry::resolve_reader`].
    pub fn resolve_reader<C>(&self, catalog: &C, tsuid: &str) -> Option<ReaderItem>
    where
        C: ?Sized + CodecCatalog,
    {
        let candidates = self.get(tsuid)?;
        first_reader(catalog, &candidates)
    }
}

impl RegistryHandle<WriterDescriptor> {
    /// Obtain an encoder for the given transfer syntax.
    ///
    /// See [`CodecRegistry::resolve_writer`].
    pub fn resolve_writer<C>(&self, catalog: &C, tsuid: &str) -> Option<WriterItem>
    where
        C: ?Sized + CodecCatalog,
    {
        let candidates = self.get(tsuid)?;
        first_writer(catalog, &candidates)
    }
}

/// A lazily loaded registry slot.
///
/// The first call to [`get`](DefaultRegistry::get)
/// loads the default descriptor document
/// (see [`CodecRegistry::load_default`]).
/// The slot can be emptied with [`reset`](DefaultRegistry::reset),
/// causing the document to be loaded again on next use,
/// or filled with another registry via [`replace`](DefaultRegistry::replace).
///
/// ```
/// use dicom_codec_registry::{DefaultRegistry, ReaderDescriptor};
///
/// static READERS: DefaultRegistry<ReaderDescriptor> = DefaultRegistry::new();
///
/// let readers = READERS.get()?;
/// assert!(readers.read().contains("1.2.840.10008.1.2.4.50"));
/// # Ok::<(), dicom_codec_registry::LoadError>(())
/// ```
pub struct DefaultRegistry<D> {
    slot: RwLock<Option<RegistryHandle<D>>>,
}

impl<D> Default for DefaultRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: fmt::Display> fmt::Debug for DefaultRegistry<D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("DefaultRegistry").field("slot", &*slot).finish()
    }
}

impl<D> DefaultRegistry<D> {
    /// Create an empty slot.
    pub const fn new() -> Self {
        DefaultRegistry {
            slot: RwLock::new(None),
        }
    }

    /// Empty the slot, so that the default document is loaded again
    /// on the next call to [`get`](DefaultRegistry::get).
    ///
    /// Handles obtained before remain valid.
    pub fn reset(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Fill the slot with the given registry.
    pub fn replace(&self, handle: RegistryHandle<D>) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(handle);
    }

    fn current(&self) -> Option<RegistryHandle<D>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<D: CodecDescriptor> DefaultRegistry<D> {
    /// Obtain the registry in the slot,
    /// loading the default descriptor document if the slot is empty.
    ///
    /// Concurrent first calls may load the document more than once,
    /// but all of them obtain the same registry.
    pub fn get(&self) -> Result<RegistryHandle<D>, LoadError> {
        if let Some(handle) = self.current() {
            return Ok(handle);
        }

        let loaded = RegistryHandle::load_default()?;
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        match &*slot {
            Some(handle) => Ok(handle.clone()),
            None => {
                debug!("Initialized default {} registry", D::ENTRY_ELEMENT);
                *slot = Some(loaded.clone());
                Ok(loaded)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_codec::{ImageReader, ReaderPlugin, StaticCatalog};
    use std::thread;

    #[derive(Debug)]
    struct Decoder;
    impl ImageReader for Decoder {}

    fn decoder() -> Box<dyn ImageReader> {
        Box::new(Decoder)
    }

    #[test]
    fn default_slot_lifecycle() {
        let slot: DefaultRegistry<ReaderDescriptor> = DefaultRegistry::new();
        let first = slot.get().unwrap();
        let again = slot.get().unwrap();
        assert!(first.ptr_eq(&again));

        slot.reset();
        let reloaded = slot.get().unwrap();
        assert!(!first.ptr_eq(&reloaded));
        assert_eq!(first.read().len(), reloaded.read().len());

        let custom = RegistryHandle::new(CodecRegistry::new());
        slot.replace(custom.clone());
        let current = slot.get().unwrap();
        assert!(current.ptr_eq(&custom));
        assert!(current.read().is_empty());
    }

    #[test]
    fn concurrent_first_use_yields_one_registry() {
        let slot: Arc<DefaultRegistry<WriterDescriptor>> = Arc::new(DefaultRegistry::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let slot = Arc::clone(&slot);
                thread::spawn(move || slot.get().unwrap())
            })
            .collect();
        let registries: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for r in &registries[1..] {
            assert!(r.ptr_eq(&registries[0]));
        }
    }

    #[test]
    fn resolution_uses_a_snapshot() {
        let handle = RegistryHandle::new(CodecRegistry::new());
        handle
            .write()
            .put("1.2.3", ReaderDescriptor::new("jpeg", "JPEG").unwrap());
        let catalog = StaticCatalog::new().with_reader(ReaderPlugin::new(&["jpeg"], decoder));

        let item = handle.resolve_reader(&catalog, "1.2.3").unwrap();
        assert_eq!(item.descriptor().name(), "JPEG");

        // mutating while holding a resolved item is fine
        handle.write().remove("1.2.3");
        assert_eq!(item.descriptor().format_name(), "jpeg");
        assert!(handle.resolve_reader(&catalog, "1.2.3").is_none());
    }
}
