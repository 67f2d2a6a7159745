//! Location of descriptor documents by name.
//!
//! A document name may be a `file:` URL,
//! the logical name of a document bundled with this crate,
//! or (where allowed) a path to a regular file.
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use url::Url;

/// Logical name of the bundled reader descriptor document.
pub const READERS_RESOURCE: &str = "dicom-codec-registry/image-readers.xml";

/// Logical name of the bundled writer descriptor document.
pub const WRITERS_RESOURCE: &str = "dicom-codec-registry/image-writers.xml";

static BUNDLED: &[(&str, &str)] = &[
    (READERS_RESOURCE, include_str!("../resources/image-readers.xml")),
    (WRITERS_RESOURCE, include_str!("../resources/image-writers.xml")),
];

/// A located descriptor document, ready to be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// A document compiled into the program
    Bundled(&'static str),
    /// A document in the file system
    File(PathBuf),
}

impl Resource {
    /// Open the document for reading.
    pub fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        match self {
            Resource::Bundled(content) => Ok(Box::new(content.as_bytes())),
            Resource::File(path) => Ok(Box::new(File::open(path)?)),
        }
    }
}

/// Trait for resolving descriptor document names.
pub trait ResourceLocator {
    /// Find the document with the given name,
    /// or `None` if no such document exists.
    fn resolve(&self, name: &str) -> Option<Resource>;
}

impl<T: ?Sized> ResourceLocator for &T
where
    T: ResourceLocator,
{
    fn resolve(&self, name: &str) -> Option<Resource> {
        (**self).resolve(name)
    }
}

/// The standard resource locator.
///
/// Names are tried as a URL first (only the `file` scheme is supported),
/// then as a bundled document,
/// then, if enabled, as a path to an existing regular file.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct DefaultLocator {
    filesystem_fallback: bool,
}

impl DefaultLocator {
    /// Create a locator which may also resolve plain file paths.
    pub fn with_filesystem() -> Self {
        DefaultLocator {
            filesystem_fallback: true,
        }
    }

    /// Create a locator for URLs and bundled documents only.
    pub fn without_filesystem() -> Self {
        DefaultLocator {
            filesystem_fallback: false,
        }
    }
}

impl ResourceLocator for DefaultLocator {
    fn resolve(&self, name: &str) -> Option<Resource> {
        if let Some(url) = parse_url(name) {
            if url.scheme() != "file" {
                return None;
            }
            return url.to_file_path().ok().map(Resource::File);
        }

        let logical = name.trim_start_matches('/');
        if let Some((_, content)) = BUNDLED.iter().find(|(n, _)| *n == logical) {
            return Some(Resource::Bundled(*content));
        }

        if self.filesystem_fallback && Path::new(name).is_file() {
            return Some(Resource::File(PathBuf::from(name)));
        }
        None
    }
}

/// Parse a name as an absolute URL.
///
/// Single letter schemes are not recognized,
/// so that Windows drive letters stay paths.
fn parse_url(name: &str) -> Option<Url> {
    Url::parse(name).ok().filter(|url| url.scheme().len() > 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn resolves_bundled_documents() {
        let locator = DefaultLocator::without_filesystem();
        assert!(matches!(
            locator.resolve(READERS_RESOURCE),
            Some(Resource::Bundled(_))
        ));
        assert!(matches!(
            locator.resolve("/dicom-codec-registry/image-writers.xml"),
            Some(Resource::Bundled(_))
        ));
        assert_eq!(locator.resolve("dicom-codec-registry/missing.xml"), None);
    }

    #[test]
    fn resolves_file_urls() {
        let locator = DefaultLocator::without_filesystem();
        assert_eq!(
            locator.resolve("file:///etc/codecs.xml"),
            Some(Resource::File(PathBuf::from("/etc/codecs.xml")))
        );
        assert_eq!(
            locator.resolve("file://localhost/etc/codecs.xml"),
            Some(Resource::File(PathBuf::from("/etc/codecs.xml")))
        );
        assert_eq!(
            locator.resolve("file:/etc/codecs.xml"),
            Some(Resource::File(PathBuf::from("/etc/codecs.xml")))
        );
        assert_eq!(locator.resolve("https://example.com/codecs.xml"), None);
    }

    #[test]
    fn filesystem_fallback_only_when_enabled() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<ImageReaderFactory/>").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        assert_eq!(
            DefaultLocator::with_filesystem().resolve(&path),
            Some(Resource::File(PathBuf::from(&path)))
        );
        assert_eq!(DefaultLocator::without_filesystem().resolve(&path), None);

        // directories are not documents
        let dir = tempfile::tempdir().unwrap();
        let dir_path = dir.path().to_str().unwrap();
        assert_eq!(DefaultLocator::with_filesystem().resolve(dir_path), None);
    }

    #[test]
    fn file_urls_are_percent_decoded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my readers.xml");
        std::fs::write(&path, "<ImageReaderFactory/>").unwrap();
        let url = Url::from_file_path(&path).unwrap();
        assert!(url.as_str().ends_with("my%20readers.xml"));

        let resource = DefaultLocator::without_filesystem()
            .resolve(url.as_str())
            .unwrap();
        assert_eq!(resource, Resource::File(path));
        assert!(resource.open().is_ok());
    }

    #[test]
    fn drive_letters_are_not_schemes() {
        assert!(parse_url("C:\\codecs.xml").is_none());
        assert_eq!(parse_url("file:/x").map(|u| u.scheme().to_string()).as_deref(), Some("file"));
        assert!(parse_url("dicom-codec-registry/image-readers.xml").is_none());
    }
}
