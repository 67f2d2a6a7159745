//! Resolution of codec instances for a transfer syntax.
//!
//! Descriptors are tried in registration order.
//! For each of them, the catalog's plugins for the descriptor's image format
//! are tried in catalog order,
//! and the first instance satisfying the descriptor's implementation
//! constraint is taken.
//!
//! Not finding a codec this way is not an error.
//! In contrast, [`create_writer`] builds an encoder for one given descriptor
//! by enumerating writer services,
//! and reports a missing encoder as a [`CreateWriterError`].
use crate::descriptor::{CodecDescriptor, ReaderDescriptor, WriterDescriptor};
use crate::registry::CodecRegistry;
use dicom_codec::{CodecCatalog, ImageReader, ImageWriter, InstantiateError};
use snafu::{Backtrace, ResultExt, Snafu};
use tracing::debug;

/// A decoder instance and the descriptor it was picked for.
#[derive(Debug)]
pub struct ReaderItem {
    reader: Box<dyn ImageReader>,
    descriptor: ReaderDescriptor,
}

impl ReaderItem {
    /// The decoder instance.
    pub fn reader(&self) -> &dyn ImageReader {
        &*self.reader
    }

    /// The descriptor which selected the decoder.
    /// Its JPEG-LS quirk applies when decoding.
    pub fn descriptor(&self) -> &ReaderDescriptor {
        &self.descriptor
    }

    /// Take the decoder instance and its descriptor.
    pub fn into_parts(self) -> (Box<dyn ImageReader>, ReaderDescriptor) {
        (self.reader, self.descriptor)
    }
}

/// An encoder instance and the descriptor it was picked for.
#[derive(Debug)]
pub struct WriterItem {
    writer: Box<dyn ImageWriter>,
    descriptor: WriterDescriptor,
}

impl WriterItem {
    /// The encoder instance.
    pub fn writer(&self) -> &dyn ImageWriter {
        &*self.writer
    }

    /// The descriptor which selected the encoder.
    /// Its write parameters and metadata overrides
    /// are to be applied to the encoder.
    pub fn descriptor(&self) -> &WriterDescriptor {
        &self.descriptor
    }

    /// Take the encoder instance and its descriptor.
    pub fn into_parts(self) -> (Box<dyn ImageWriter>, WriterDescriptor) {
        (self.writer, self.descriptor)
    }
}

/// An error which may occur when creating an encoder
/// directly from a writer descriptor.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum CreateWriterError {
    #[snafu(display("No image writer for format `{}` registered", format_name))]
    NoWriter {
        format_name: String,
        backtrace: Backtrace,
    },
    #[snafu(display("Error instantiating image writer for format `{}`", format_name))]
    Instantiate {
        format_name: String,
        backtrace: Backtrace,
        source: InstantiateError,
    },
}

/// Find the first decoder in the catalog satisfying
/// one of the given descriptors, trying descriptors in order.
pub fn first_reader<'a, C, I>(catalog: &C, candidates: I) -> Option<ReaderItem>
where
    C: ?Sized + CodecCatalog,
    I: IntoIterator<Item = &'a ReaderDescriptor>,
{
    for descriptor in candidates {
        for reader in catalog.readers_by_format(descriptor.format_name()) {
            if descriptor.accepts(reader.implementation()) {
                return Some(ReaderItem {
                    reader,
                    descriptor: descriptor.clone(),
                });
            }
        }
    }
    None
}

/// Find the first encoder in the catalog satisfying
/// one of the given descriptors, trying descriptors in order.
pub fn first_writer<'a, C, I>(catalog: &C, candidates: I) -> Option<WriterItem>
where
    C: ?Sized + CodecCatalog,
    I: IntoIterator<Item = &'a WriterDescriptor>,
{
    for descriptor in candidates {
        for writer in catalog.writers_by_format(descriptor.format_name()) {
            if descriptor.accepts(writer.implementation()) {
                return Some(WriterItem {
                    writer,
                    descriptor: descriptor.clone(),
                });
            }
        }
    }
    None
}

/// Create an encoder for the given descriptor
/// from the first suitable writer service in the catalog.
///
/// Services are matched by declared format name,
/// ignoring case and surrounding whitespace.
/// Fails if no service provides a suitable encoder,
/// or if a service fails to create one.
pub fn create_writer<C>(
    catalog: &C,
    descriptor: &WriterDescriptor,
) -> Result<Box<dyn ImageWriter>, CreateWriterError>
where
    C: ?Sized + CodecCatalog,
{
    let format_name = descriptor.format_name();
    for service in catalog.writer_services() {
        if !service.supports_format(format_name) {
            continue;
        }
        let writer = service
            .create_writer()
            .context(InstantiateSnafu { format_name })?;
        if descriptor.accepts(writer.implementation()) {
            return Ok(writer);
        }
    }
    NoWriterSnafu { format_name }.fail()
}

impl CodecRegistry<ReaderDescriptor> {
    /// Obtain a decoder for the given transfer syntax,
    /// or `None` if no registered descriptor
    /// is satisfied by a decoder in the catalog.
    pub fn resolve_reader<C>(&self, catalog: &C, tsuid: &str) -> Option<ReaderItem>
    where
        C: ?Sized + CodecCatalog,
    {
        let item = self
            .get(tsuid)
            .and_then(|candidates| first_reader(catalog, candidates));
        debug!(
            "Image reader for {}: {:?}",
            tsuid,
            item.as_ref().map(|i| i.reader().implementation())
        );
        item
    }
}

impl CodecRegistry<WriterDescriptor> {
    /// Obtain an encoder for the given transfer syntax,
    /// or `None` if no registered descriptor
    /// is satisfied by an encoder in the catalog.
    pub fn resolve_writer<C>(&self, catalog: &C, tsuid: &str) -> Option<WriterItem>
    where
        C: ?Sized + CodecCatalog,
    {
        let item = self
            .get(tsuid)
            .and_then(|candidates| first_writer(catalog, candidates));
        debug!(
            "Image writer for {}: {:?}",
            tsuid,
            item.as_ref().map(|i| i.writer().implementation())
        );
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_codec::plugin::instantiate_error::MissingLibrarySnafu;
    use dicom_codec::{InstantiateResult, ReaderPlugin, StaticCatalog, WriterPlugin};

    #[derive(Debug)]
    struct NativeEncoder;
    impl ImageWriter for NativeEncoder {
        fn implementation(&self) -> &str {
            "native"
        }
    }

    #[derive(Debug)]
    struct PortableEncoder;
    impl ImageWriter for PortableEncoder {
        fn implementation(&self) -> &str {
            "portable"
        }
    }

    #[derive(Debug)]
    struct Decoder;
    impl ImageReader for Decoder {
        fn implementation(&self) -> &str {
            "decoder"
        }
    }

    fn native() -> InstantiateResult<Box<dyn ImageWriter>> {
        Ok(Box::new(NativeEncoder))
    }

    fn portable() -> InstantiateResult<Box<dyn ImageWriter>> {
        Ok(Box::new(PortableEncoder))
    }

    fn unavailable() -> InstantiateResult<Box<dyn ImageWriter>> {
        MissingLibrarySnafu { name: "libopenjp2" }.fail()
    }

    fn decoder() -> Box<dyn ImageReader> {
        Box::new(Decoder)
    }

    fn catalog() -> StaticCatalog {
        StaticCatalog::new()
            .with_reader(ReaderPlugin::new(&["jpeg"], decoder))
            .with_writer(WriterPlugin::new(&["JPEG2000 "], native))
            .with_writer(WriterPlugin::new(&["jpeg2000"], portable))
    }

    #[test]
    fn direct_creation_matches_format_loosely() {
        let descriptor = WriterDescriptor::new("jpeg2000", "any").unwrap();
        let writer = create_writer(&catalog(), &descriptor).unwrap();
        assert_eq!(writer.implementation(), "native");
    }

    #[test]
    fn direct_creation_honors_class_constraint() {
        let descriptor = WriterDescriptor::new("jpeg2000", "portable only")
            .unwrap()
            .with_class_name(Some("portable"));
        let writer = create_writer(&catalog(), &descriptor).unwrap();
        assert_eq!(writer.implementation(), "portable");
    }

    #[test]
    fn direct_creation_fails_without_writer() {
        let descriptor = WriterDescriptor::new("jpeg-xl", "none").unwrap();
        let err = create_writer(&catalog(), &descriptor).unwrap_err();
        assert!(matches!(err, CreateWriterError::NoWriter { .. }));

        let descriptor = WriterDescriptor::new("jpeg2000", "none")
            .unwrap()
            .with_class_name(Some("elsewhere"));
        let err = create_writer(&catalog(), &descriptor).unwrap_err();
        assert!(matches!(err, CreateWriterError::NoWriter { .. }));
    }

    #[test]
    fn direct_creation_propagates_instantiation_failure() {
        let catalog = StaticCatalog::new()
            .with_writer(WriterPlugin::new(&["jpeg2000"], unavailable))
            .with_writer(WriterPlugin::new(&["jpeg2000"], portable));
        let descriptor = WriterDescriptor::new("jpeg2000", "any").unwrap();
        let err = create_writer(&catalog, &descriptor).unwrap_err();
        assert!(matches!(err, CreateWriterError::Instantiate { .. }));
    }

    #[test]
    fn first_reader_skips_unsatisfied_descriptors() {
        let candidates = [
            ReaderDescriptor::new("jpeg", "pinned")
                .unwrap()
                .with_class_name(Some("other")),
            ReaderDescriptor::new("jpeg-lossless", "other format").unwrap(),
            ReaderDescriptor::new("jpeg", "fallback").unwrap(),
        ];
        let item = first_reader(&catalog(), &candidates).unwrap();
        assert_eq!(item.reader().implementation(), "decoder");
        assert_eq!(item.descriptor().name(), "fallback");

        assert!(first_reader(&catalog(), &candidates[..2]).is_none());

        let (reader, descriptor) = item.into_parts();
        assert_eq!(reader.implementation(), "decoder");
        assert_eq!(descriptor.format_name(), "jpeg");
    }
}
