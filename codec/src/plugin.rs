//! Codec plugin traits and registration records.
use snafu::Snafu;
use std::fmt;

/// An image decoder instance provided by a codec plugin.
///
/// The registry only needs to know which implementation an instance is,
/// so that descriptors constrained to a specific implementation
/// can tell it apart from other decoders of the same image format.
pub trait ImageReader: fmt::Debug + Send {
    /// Obtain the identifier of this decoder's concrete implementation.
    ///
    /// The default implementation returns the full path of the type.
    fn implementation(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// An image encoder instance provided by a codec plugin.
///
/// See [`ImageReader`] for the meaning of the implementation identifier.
pub trait ImageWriter: fmt::Debug + Send {
    /// Obtain the identifier of this encoder's concrete implementation.
    ///
    /// The default implementation returns the full path of the type.
    fn implementation(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// The possible error conditions when a plugin fails to
/// create a new codec instance.
///
/// Users of this type are free to handle errors based on their variant,
/// but should not make decisions based on the display message,
/// since that is not considered part of the API
/// and may change on any new release.
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub), module)]
pub enum InstantiateError {
    /// A custom error occurred when creating the codec,
    /// reported as a dynamic error value with a message.
    ///
    /// The [`whatever!`](snafu::whatever) macro can be used
    /// to easily create an error of this kind.
    #[snafu(whatever, display("{}", message))]
    Custom {
        /// The error message.
        message: String,
        /// The underlying error cause, if any.
        #[snafu(source(from(Box<dyn std::error::Error + Send + Sync + 'static>, Some)))]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },

    /// A native library required by the codec is not available.
    #[snafu(display("Native library `{}` is not available", name))]
    MissingLibrary { name: &'static str },
}

/// The result of creating a codec instance
pub type InstantiateResult<T, E = InstantiateError> = Result<T, E>;

/// Registration record of an image decoder plugin.
///
/// Decoders are cheap to create and their creation cannot fail.
#[derive(Clone, Copy)]
pub struct ReaderPlugin {
    format_names: &'static [&'static str],
    create: fn() -> Box<dyn ImageReader>,
}

impl ReaderPlugin {
    /// Declare a decoder plugin for the given image format names.
    pub const fn new(
        format_names: &'static [&'static str],
        create: fn() -> Box<dyn ImageReader>,
    ) -> Self {
        ReaderPlugin {
            format_names,
            create,
        }
    }

    /// The image format names which this plugin can decode.
    pub fn format_names(&self) -> &'static [&'static str] {
        self.format_names
    }

    /// Whether this plugin is indexed under exactly the given format name.
    pub fn handles(&self, format_name: &str) -> bool {
        self.format_names.iter().any(|f| *f == format_name)
    }

    /// Create a new decoder instance.
    pub fn create_reader(&self) -> Box<dyn ImageReader> {
        (self.create)()
    }
}

impl fmt::Debug for ReaderPlugin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ReaderPlugin")
            .field("format_names", &self.format_names)
            .finish_non_exhaustive()
    }
}

/// Registration record of an image encoder plugin.
///
/// Writer plugins also serve as writer _service_ records:
/// besides being indexed by format name in a catalog,
/// they can be enumerated directly
/// and asked whether they support a format
/// (see [`supports_format`](WriterPlugin::supports_format)).
#[derive(Clone, Copy)]
pub struct WriterPlugin {
    format_names: &'static [&'static str],
    create: fn() -> InstantiateResult<Box<dyn ImageWriter>>,
}

impl WriterPlugin {
    /// Declare an encoder plugin for the given image format names.
    pub const fn new(
        format_names: &'static [&'static str],
        create: fn() -> InstantiateResult<Box<dyn ImageWriter>>,
    ) -> Self {
        WriterPlugin {
            format_names,
            create,
        }
    }

    /// The image format names which this plugin can encode.
    pub fn format_names(&self) -> &'static [&'static str] {
        self.format_names
    }

    /// Whether this plugin is indexed under exactly the given format name.
    pub fn handles(&self, format_name: &str) -> bool {
        self.format_names.iter().any(|f| *f == format_name)
    }

    /// Whether this plugin declares support for the given format name,
    /// ignoring case and surrounding whitespace.
    pub fn supports_format(&self, format_name: &str) -> bool {
        let format_name = format_name.trim();
        self.format_names
            .iter()
            .any(|f| f.trim().eq_ignore_ascii_case(format_name))
    }

    /// Create a new encoder instance.
    pub fn create_writer(&self) -> InstantiateResult<Box<dyn ImageWriter>> {
        (self.create)()
    }
}

impl fmt::Debug for WriterPlugin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("WriterPlugin")
            .field("format_names", &self.format_names)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Decoder;

    impl ImageReader for Decoder {}

    #[derive(Debug)]
    struct Encoder;

    impl ImageWriter for Encoder {
        fn implementation(&self) -> &str {
            "custom-encoder"
        }
    }

    fn new_decoder() -> Box<dyn ImageReader> {
        Box::new(Decoder)
    }

    fn new_encoder() -> InstantiateResult<Box<dyn ImageWriter>> {
        Ok(Box::new(Encoder))
    }

    #[test]
    fn default_implementation_is_type_path() {
        let plugin = ReaderPlugin::new(&["jpeg"], new_decoder);
        let reader = plugin.create_reader();
        assert_eq!(reader.implementation(), "dicom_codec::plugin::tests::Decoder");
    }

    #[test]
    fn format_index_is_exact() {
        let plugin = WriterPlugin::new(&["jpeg-ls", "JPEG-LS"], new_encoder);
        assert!(plugin.handles("jpeg-ls"));
        assert!(plugin.handles("JPEG-LS"));
        assert!(!plugin.handles("Jpeg-LS"));
        assert!(!plugin.handles(" jpeg-ls"));
    }

    #[test]
    fn service_format_support_ignores_case_and_whitespace() {
        let plugin = WriterPlugin::new(&[" jpeg2000 "], new_encoder);
        assert!(plugin.supports_format("JPEG2000"));
        assert!(plugin.supports_format("  jpeg2000"));
        assert!(!plugin.supports_format("jpeg"));
        let writer = plugin.create_writer().unwrap();
        assert_eq!(writer.implementation(), "custom-encoder");
    }
}
