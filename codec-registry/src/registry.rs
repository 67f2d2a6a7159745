//! The codec registry data structure and its loading procedures.
use crate::descriptor::{self, CodecDescriptor};
use crate::document::{read_document, Outcome, Schema};
use crate::locator::{DefaultLocator, ResourceLocator};
use crate::platform::platform_tag;
use snafu::{Backtrace, OptionExt, ResultExt, Snafu};
use indexmap::map::Entry;
use indexmap::IndexMap;
use std::fmt;
use std::io::{BufReader, Read};
use std::sync::Arc;
use tracing::{debug, error};

/// An error which may occur when loading codec descriptors
/// into a registry.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum LoadError {
    #[snafu(display("No such resource: {}", name))]
    ResourceNotFound { name: String, backtrace: Backtrace },
    #[snafu(display("Could not open resource `{}`", name))]
    OpenResource {
        name: String,
        backtrace: Backtrace,
        source: std::io::Error,
    },
    #[snafu(display("Could not read descriptor document"))]
    ReadDocument {
        backtrace: Backtrace,
        source: Arc<std::io::Error>,
    },
    #[snafu(display("Invalid codec descriptor for transfer syntax {}", tsuid))]
    InvalidDescriptor {
        tsuid: String,
        backtrace: Backtrace,
        source: descriptor::Error,
    },
    #[snafu(display("Failed to load codec registry configuration from `{}`", name))]
    LoadDefault {
        name: String,
        #[snafu(source(from(LoadError, Box::new)))]
        source: Box<LoadError>,
    },
}

/// Data type for a registry of codec descriptors by transfer syntax UID.
///
/// Each transfer syntax maps to a non-empty list of descriptors,
/// in the order in which they were registered.
/// Transfer syntaxes are listed in the order they were first registered.
#[derive(Clone)]
pub struct CodecRegistry<D> {
    map: IndexMap<String, Vec<D>>,
}

impl<D> Default for CodecRegistry<D> {
    fn default() -> Self {
        CodecRegistry {
            map: IndexMap::new(),
        }
    }
}

impl<D: fmt::Display> fmt::Debug for CodecRegistry<D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map()
            .entries(self.entries().map(|(uid, descriptors)| {
                let names: Vec<String> = descriptors.iter().map(|d| d.to_string()).collect();
                (uid, names)
            }))
            .finish()
    }
}

/// Ignore trailing null characters in transfer syntax UIDs.
fn trim_uid(uid: &str) -> &str {
    uid.trim_end_matches('\0')
}

impl<D> CodecRegistry<D> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Obtain the descriptors registered for a transfer syntax.
    pub fn get<U: AsRef<str>>(&self, uid: U) -> Option<&[D]> {
        self.map.get(trim_uid(uid.as_ref())).map(Vec::as_slice)
    }

    /// Check whether any descriptor is registered for a transfer syntax.
    pub fn contains<U: AsRef<str>>(&self, uid: U) -> bool {
        self.map.contains_key(trim_uid(uid.as_ref()))
    }

    /// Register a descriptor for a transfer syntax,
    /// after any descriptors already registered for it.
    pub fn put(&mut self, uid: impl Into<String>, descriptor: D) {
        let mut uid = uid.into();
        let len = trim_uid(&uid).len();
        uid.truncate(len);
        match self.map.entry(uid) {
            Entry::Occupied(mut e) => e.get_mut().push(descriptor),
            Entry::Vacant(e) => {
                e.insert(vec![descriptor]);
            }
        }
    }

    /// Remove all descriptors of a transfer syntax,
    /// returning them if there were any.
    pub fn remove<U: AsRef<str>>(&mut self, uid: U) -> Option<Vec<D>> {
        self.map.shift_remove(trim_uid(uid.as_ref()))
    }

    /// Remove all descriptors.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Iterate over all transfer syntaxes and their descriptors.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[D])> + '_ {
        self.map
            .iter()
            .map(|(uid, descriptors)| (uid.as_str(), descriptors.as_slice()))
    }

    /// The number of transfer syntaxes with registered descriptors.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the registry has no descriptors at all.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K, D> Extend<(K, D)> for CodecRegistry<D>
where
    K: Into<String>,
{
    fn extend<T: IntoIterator<Item = (K, D)>>(&mut self, iter: T) {
        for (uid, descriptor) in iter {
            self.put(uid, descriptor);
        }
    }
}

impl<K, D> FromIterator<(K, D)> for CodecRegistry<D>
where
    K: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, D)>>(iter: T) -> Self {
        let mut registry = CodecRegistry::new();
        registry.extend(iter);
        registry
    }
}

impl<D: CodecDescriptor> CodecRegistry<D> {
    /// Create a registry with the descriptors of the default document.
    ///
    /// The document name is taken from the environment variable
    /// [`D::RESOURCE_ENV`](CodecDescriptor::RESOURCE_ENV) if set,
    /// otherwise the bundled document is used.
    pub fn load_default() -> Result<Self, LoadError> {
        let name = default_resource_name::<D>();
        let mut registry = CodecRegistry::new();
        registry.load(&name).context(LoadDefaultSnafu { name: &name })?;
        Ok(registry)
    }

    /// Load the descriptors of the named document into this registry.
    ///
    /// Returns the number of descriptors added.
    /// See [`DefaultLocator`] for how names are resolved.
    pub fn load(&mut self, name: &str) -> Result<usize, LoadError> {
        let locator = if D::FILESYSTEM_FALLBACK {
            DefaultLocator::with_filesystem()
        } else {
            DefaultLocator::without_filesystem()
        };
        self.load_with(&locator, name)
    }

    /// Load the descriptors of the named document into this registry,
    /// resolving the name with the given locator.
    ///
    /// Returns the number of descriptors added.
    pub fn load_with<L>(&mut self, locator: &L, name: &str) -> Result<usize, LoadError>
    where
        L: ?Sized + ResourceLocator,
    {
        let resource = locator
            .resolve(name)
            .context(ResourceNotFoundSnafu { name })?;
        let source = resource.open().context(OpenResourceSnafu { name })?;
        debug!("Loading codec descriptors from {}", name);
        self.load_from_reader(source)
    }

    /// Load the descriptors of a document read from the given source
    /// into this registry.
    ///
    /// Descriptors are appended to those already registered.
    /// If the document is not well formed,
    /// the descriptors read before the fault are kept,
    /// and the fault is logged rather than returned.
    ///
    /// Returns the number of descriptors added.
    pub fn load_from_reader<R: Read>(&mut self, source: R) -> Result<usize, LoadError> {
        self.load_for_platform(source, platform_tag())
    }

    /// Load the descriptors of a document as if running on
    /// the given platform.
    ///
    /// This is [`load_from_reader`](Self::load_from_reader)
    /// with an explicit platform tag in place of the detected one.
    pub fn load_for_platform<R: Read>(
        &mut self,
        source: R,
        platform: Option<&str>,
    ) -> Result<usize, LoadError> {
        let schema = Schema {
            root: D::ROOT_ELEMENT,
            group: "element",
            key: "tsuid",
            entry: D::ENTRY_ELEMENT,
        };

        let mut added = 0;
        let outcome = read_document(BufReader::new(source), &schema, |tsuid, attributes| {
            match D::from_attributes(&attributes, platform)
                .context(InvalidDescriptorSnafu { tsuid })?
            {
                Some(descriptor) => {
                    self.put(tsuid, descriptor);
                    added += 1;
                }
                None => debug!(
                    "Skipping codec {:?} for {}: not available on platform {:?}",
                    attributes.get("name"),
                    tsuid,
                    platform
                ),
            }
            Ok(())
        })?;

        match outcome {
            Outcome::Complete => {
                debug!("Loaded {} codec descriptors", added);
                Ok(added)
            }
            Outcome::Malformed {
                error: quick_xml::Error::Io(source),
                ..
            } => Err(source).context(ReadDocumentSnafu),
            Outcome::Malformed { error, position } => {
                error!(
                    "Cannot read codec descriptors! {} (at byte {}), kept {} descriptors",
                    error, position, added
                );
                Ok(added)
            }
        }
    }
}

/// The name of the default descriptor document for descriptors of type `D`.
pub fn default_resource_name<D: CodecDescriptor>() -> String {
    std::env::var(D::RESOURCE_ENV)
        .ok()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| D::DEFAULT_RESOURCE.to_string())
}
