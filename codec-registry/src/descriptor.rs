//! Codec descriptors: the entries of a codec registry.
//!
//! A descriptor names the image format of a candidate codec,
//! and optionally the one implementation which is acceptable for it.
//! The display name of a descriptor is informative only,
//! and does not take part in equality.
use crate::property::{ParsePropertyError, Property};
use dicom_codec::patch::ParsePatchJpegLsError;
use dicom_codec::PatchJpegLs;
use snafu::{ResultExt, Snafu};
use std::fmt;

/// An error which may occur when constructing a codec descriptor.
#[derive(Debug, Clone, PartialEq, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// The image format name is missing or empty
    MissingFormatName {},
    /// The display name is missing or empty
    MissingName {},
    #[snafu(display("Invalid JPEG-LS patch mode"))]
    InvalidPatchMode { source: ParsePatchJpegLsError },
    #[snafu(display("Invalid write parameters"))]
    InvalidWriteParams { source: ParsePropertyError },
    #[snafu(display("Invalid metadata overrides"))]
    InvalidMetadata { source: ParsePropertyError },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Attributes of a codec entry, as declared in a descriptor document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    /// Create an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add an attribute.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Look up the first attribute with the given name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Common behavior of reader and writer descriptors.
///
/// The associated constants describe how descriptors of this kind
/// are declared in descriptor documents and where the default document is.
pub trait CodecDescriptor: Clone + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// The name of the document's root element.
    const ROOT_ELEMENT: &'static str;
    /// The name of the element declaring one descriptor.
    const ENTRY_ELEMENT: &'static str;
    /// The logical name of the bundled default document.
    const DEFAULT_RESOURCE: &'static str;
    /// The environment variable overriding the default document name.
    const RESOURCE_ENV: &'static str;
    /// Whether document names may also refer to plain filesystem paths.
    const FILESYSTEM_FALLBACK: bool;

    /// Build a descriptor from the attributes of a document entry.
    ///
    /// Returns `Ok(None)` if the entry does not apply
    /// to the given platform.
    fn from_attributes(attributes: &Attributes, platform: Option<&str>) -> Result<Option<Self>>;

    /// The image format name of the candidate codec.
    fn format_name(&self) -> &str;

    /// The implementation accepted for this descriptor,
    /// or `None` if any implementation of the format will do.
    fn class_name(&self) -> Option<&str>;

    /// The JPEG-LS quirk to apply when using the codec.
    fn patch_jpegls(&self) -> Option<PatchJpegLs>;

    /// The display name of the descriptor.
    fn name(&self) -> &str;

    /// Whether a codec with the given implementation identifier
    /// satisfies this descriptor.
    fn accepts(&self, implementation: &str) -> bool {
        self.class_name().map_or(true, |c| c == implementation)
    }
}

/// Empty and wildcard class names mean "no constraint".
fn nullify(class_name: Option<&str>) -> Option<String> {
    match class_name {
        None | Some("") | Some("*") => None,
        Some(c) => Some(c.to_string()),
    }
}

fn parse_patch(value: Option<&str>) -> Result<Option<PatchJpegLs>> {
    match value {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse::<PatchJpegLs>()
            .map(Some)
            .context(InvalidPatchModeSnafu),
    }
}

fn required(value: impl Into<String>, missing: Error) -> Result<String> {
    let value = value.into();
    if value.is_empty() {
        return Err(missing);
    }
    Ok(value)
}

/// A candidate image decoder for a transfer syntax.
#[derive(Debug, Clone)]
pub struct ReaderDescriptor {
    format_name: String,
    class_name: Option<String>,
    patch_jpegls: Option<PatchJpegLs>,
    name: String,
}

impl ReaderDescriptor {
    /// Create a reader descriptor for any decoder of the given image format.
    ///
    /// Fails if either the format name or the display name is empty.
    pub fn new(format_name: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        Ok(ReaderDescriptor {
            format_name: required(format_name, Error::MissingFormatName {})?,
            class_name: None,
            patch_jpegls: None,
            name: required(name, Error::MissingName {})?,
        })
    }

    /// Constrain the descriptor to one decoder implementation.
    ///
    /// An empty name or `*` removes the constraint.
    pub fn with_class_name(mut self, class_name: Option<&str>) -> Self {
        self.class_name = nullify(class_name);
        self
    }

    /// Set the JPEG-LS quirk to apply when decoding.
    pub fn with_patch_jpegls(mut self, patch: Option<PatchJpegLs>) -> Self {
        self.patch_jpegls = patch;
        self
    }

    /// Obtain the image format name.
    pub fn format_name(&self) -> &str {
        &self.format_name
    }

    /// Obtain the decoder implementation constraint, if any.
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// Obtain the JPEG-LS quirk to apply when decoding, if any.
    pub fn patch_jpegls(&self) -> Option<PatchJpegLs> {
        self.patch_jpegls
    }

    /// Obtain the display name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for ReaderDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.format_name == other.format_name
            && self.class_name == other.class_name
            && self.patch_jpegls == other.patch_jpegls
    }
}

impl fmt::Display for ReaderDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl CodecDescriptor for ReaderDescriptor {
    const ROOT_ELEMENT: &'static str = "ImageReaderFactory";
    const ENTRY_ELEMENT: &'static str = "reader";
    const DEFAULT_RESOURCE: &'static str = crate::locator::READERS_RESOURCE;
    const RESOURCE_ENV: &'static str = "DICOM_IMAGE_READER_REGISTRY";
    const FILESYSTEM_FALLBACK: bool = true;

    fn from_attributes(attributes: &Attributes, platform: Option<&str>) -> Result<Option<Self>> {
        // only admit readers which can run on this platform
        if let Some(systems) = attributes.get("sys") {
            let admitted = platform.map_or(false, |p| systems.split(',').any(|s| s == p));
            if !admitted {
                return Ok(None);
            }
        }

        let descriptor = ReaderDescriptor::new(
            attributes.get("format").unwrap_or_default(),
            attributes.get("name").unwrap_or_default(),
        )?
        .with_class_name(attributes.get("class"))
        .with_patch_jpegls(parse_patch(attributes.get("patchJPEGLS"))?);
        Ok(Some(descriptor))
    }

    fn format_name(&self) -> &str {
        &self.format_name
    }

    fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    fn patch_jpegls(&self) -> Option<PatchJpegLs> {
        self.patch_jpegls
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A candidate image encoder for a transfer syntax,
/// with the configuration overrides to apply to it.
#[derive(Debug, Clone)]
pub struct WriterDescriptor {
    format_name: String,
    class_name: Option<String>,
    patch_jpegls: Option<PatchJpegLs>,
    write_params: Vec<Property>,
    metadata: Vec<Property>,
    name: String,
}

impl WriterDescriptor {
    /// Create a writer descriptor for any encoder of the given image format,
    /// with no configuration overrides.
    ///
    /// Fails if either the format name or the display name is empty.
    pub fn new(format_name: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        Ok(WriterDescriptor {
            format_name: required(format_name, Error::MissingFormatName {})?,
            class_name: None,
            patch_jpegls: None,
            write_params: Vec::new(),
            metadata: Vec::new(),
            name: required(name, Error::MissingName {})?,
        })
    }

    /// Constrain the descriptor to one encoder implementation.
    ///
    /// An empty name or `*` removes the constraint.
    pub fn with_class_name(mut self, class_name: Option<&str>) -> Self {
        self.set_class_name(class_name);
        self
    }

    /// Set the JPEG-LS quirk to apply to the encoded output.
    pub fn with_patch_jpegls(mut self, patch: Option<PatchJpegLs>) -> Self {
        self.patch_jpegls = patch;
        self
    }

    /// Set the overrides of the encoder's write parameters.
    pub fn with_write_params(mut self, params: Vec<Property>) -> Self {
        self.write_params = params;
        self
    }

    /// Set the overrides of the format specific metadata.
    pub fn with_metadata(mut self, metadata: Vec<Property>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Obtain the image format name.
    pub fn format_name(&self) -> &str {
        &self.format_name
    }

    /// Obtain the encoder implementation constraint, if any.
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// Replace the encoder implementation constraint.
    /// An empty name or `*` removes the constraint.
    pub fn set_class_name(&mut self, class_name: Option<&str>) {
        self.class_name = nullify(class_name);
    }

    /// Obtain the JPEG-LS quirk to apply to the encoded output, if any.
    pub fn patch_jpegls(&self) -> Option<PatchJpegLs> {
        self.patch_jpegls
    }

    /// Replace the JPEG-LS quirk to apply when encoding.
    pub fn set_patch_jpegls(&mut self, patch: Option<PatchJpegLs>) {
        self.patch_jpegls = patch;
    }

    /// Obtain the write parameter overrides, in declaration order.
    pub fn write_params(&self) -> &[Property] {
        &self.write_params
    }

    /// Replace the encoder parameter overrides.
    pub fn set_write_params(&mut self, params: Vec<Property>) {
        self.write_params = params;
    }

    /// Obtain the metadata overrides, in declaration order.
    pub fn metadata(&self) -> &[Property] {
        &self.metadata
    }

    /// Replace the image metadata overrides.
    pub fn set_metadata(&mut self, metadata: Vec<Property>) {
        self.metadata = metadata;
    }

    /// Obtain the display name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for WriterDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.format_name == other.format_name
            && self.class_name == other.class_name
            && self.patch_jpegls == other.patch_jpegls
            && self.write_params == other.write_params
            && self.metadata == other.metadata
    }
}

impl fmt::Display for WriterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl CodecDescriptor for WriterDescriptor {
    const ROOT_ELEMENT: &'static str = "ImageWriterFactory";
    const ENTRY_ELEMENT: &'static str = "writer";
    const DEFAULT_RESOURCE: &'static str = crate::locator::WRITERS_RESOURCE;
    const RESOURCE_ENV: &'static str = "DICOM_IMAGE_WRITER_REGISTRY";
    const FILESYSTEM_FALLBACK: bool = false;

    fn from_attributes(attributes: &Attributes, _platform: Option<&str>) -> Result<Option<Self>> {
        let write_params = Property::parse_list(attributes.get("params").unwrap_or_default(), ';')
            .context(InvalidWriteParamsSnafu)?;
        let metadata = Property::parse_list(attributes.get("metadata").unwrap_or_default(), ';')
            .context(InvalidMetadataSnafu)?;

        let descriptor = WriterDescriptor::new(
            attributes.get("format").unwrap_or_default(),
            attributes.get("name").unwrap_or_default(),
        )?
        .with_class_name(attributes.get("class"))
        .with_patch_jpegls(parse_patch(attributes.get("patchJPEGLS"))?)
        .with_write_params(write_params)
        .with_metadata(metadata);
        Ok(Some(descriptor))
    }

    fn format_name(&self) -> &str {
        &self.format_name
    }

    fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    fn patch_jpegls(&self) -> Option<PatchJpegLs> {
        self.patch_jpegls
    }

    fn name(&self) -> &str {
        &self.name
    }
}
