//! DICOM image codec plugin interfaces.
//!
//! This crate provides the traits and registration records
//! through which image codec implementations
//! (decoders and encoders of encapsulated pixel data)
//! make themselves known to the rest of the program.
//! It does not implement any image codec itself.
//!
//! - [`ImageReader`] and [`ImageWriter`] are implemented by codec instances.
//! - [`ReaderPlugin`] and [`WriterPlugin`] describe how to create them,
//!   and which image format names they handle.
//! - A [`CodecCatalog`] is the place where a program looks up
//!   the plugins installed at run-time.
//!   [`StaticCatalog`] is filled in by hand,
//!   whereas `InventoryCatalog` (Cargo feature **inventory-registry**)
//!   collects plugins submitted from any crate linked into the program
//!   with [`submit_image_reader!`] and [`submit_image_writer!`].
//!
//! Picking the right codec for a given transfer syntax
//! is the concern of the `dicom-codec-registry` crate.
pub mod catalog;
pub mod patch;
pub mod plugin;

pub use catalog::{CodecCatalog, StaticCatalog};
#[cfg(feature = "inventory-registry")]
pub use catalog::InventoryCatalog;
pub use patch::PatchJpegLs;
pub use plugin::{
    ImageReader, ImageWriter, InstantiateError, InstantiateResult, ReaderPlugin, WriterPlugin,
};

// re-export for the registration macros
#[cfg(feature = "inventory-registry")]
#[doc(hidden)]
pub use inventory;
