//! This crate contains the DICOM image codec registry.
//!
//! The codec registry maps the UID of a compressed transfer syntax
//! to an ordered list of candidate image codecs,
//! described by a [`ReaderDescriptor`] (for decoding)
//! or a [`WriterDescriptor`] (for encoding).
//! Descriptors are loaded from XML descriptor documents.
//! A default document for each kind is bundled with this crate,
//! and can be replaced through an environment variable
//! (see [`CodecDescriptor::RESOURCE_ENV`]).
//!
//! Candidates are turned into codec instances with the help of
//! a [`CodecCatalog`](dicom_codec::CodecCatalog),
//! which knows which codec implementations are installed.
//! The first candidate for which an implementation is available wins.
//!
//! ```
//! use dicom_codec::{ImageReader, ReaderPlugin, StaticCatalog};
//! use dicom_codec_registry::{uids, ReaderRegistry};
//!
//! #[derive(Debug)]
//! struct RleDecoder;
//! impl ImageReader for RleDecoder {}
//!
//! fn new_rle_decoder() -> Box<dyn ImageReader> {
//!     Box::new(RleDecoder)
//! }
//!
//! let catalog = StaticCatalog::new()
//!     .with_reader(ReaderPlugin::new(&["rle"], new_rle_decoder));
//!
//! let registry = ReaderRegistry::load_default()?;
//! let item = registry
//!     .resolve_reader(&catalog, uids::RLE_LOSSLESS)
//!     .expect("RLE decoder should be available");
//! assert_eq!(item.descriptor().format_name(), "rle");
//!
//! // no JPEG decoder installed
//! assert!(registry.resolve_reader(&catalog, uids::JPEG_BASELINE).is_none());
//! # Ok::<(), dicom_codec_registry::LoadError>(())
//! ```
//!
//! Registries which need to be shared and changed at run-time
//! are kept behind a [`RegistryHandle`].
//! A [`DefaultRegistry`] lazily fills a handle with the default document.

pub mod descriptor;
mod document;
pub mod handle;
pub mod locator;
pub mod platform;
pub mod property;
pub mod registry;
pub mod resolve;
pub mod uids;

pub use descriptor::{Attributes, CodecDescriptor, ReaderDescriptor, WriterDescriptor};
pub use handle::{DefaultRegistry, RegistryHandle};
pub use locator::{DefaultLocator, Resource, ResourceLocator};
pub use platform::platform_tag;
pub use property::{Property, PropertyValue};
pub use registry::{CodecRegistry, LoadError};
pub use resolve::{create_writer, CreateWriterError, ReaderItem, WriterItem};

/// A registry of image decoder candidates.
pub type ReaderRegistry = CodecRegistry<ReaderDescriptor>;

/// A registry of image encoder candidates.
pub type WriterRegistry = CodecRegistry<WriterDescriptor>;
