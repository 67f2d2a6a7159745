//! Catalogs of installed codec plugins.
//!
//! A catalog answers two kinds of questions:
//! which decoders or encoders are indexed under a format name,
//! and which writer services exist at all.
//! Both are expressed by the [`CodecCatalog`] trait,
//! so that codec resolution can work against
//! the plugins linked into the program
//! as well as against a hand-made set of plugins.
use crate::plugin::{ImageReader, ImageWriter, ReaderPlugin, WriterPlugin};
use tracing::warn;

/// Trait for containers of codec plugins.
///
/// Plugins must be reported in a stable order,
/// since codec resolution picks the first suitable one.
pub trait CodecCatalog {
    /// Create one instance of every decoder
    /// indexed under exactly this format name.
    fn readers_by_format(&self, format_name: &str) -> Vec<Box<dyn ImageReader>>;

    /// Create one instance of every encoder
    /// indexed under exactly this format name.
    ///
    /// Plugins failing to create an encoder are left out.
    fn writers_by_format(&self, format_name: &str) -> Vec<Box<dyn ImageWriter>>;

    /// Enumerate all writer services,
    /// regardless of the format names they declare.
    fn writer_services(&self) -> Vec<&WriterPlugin>;
}

impl<T: ?Sized> CodecCatalog for &T
where
    T: CodecCatalog,
{
    fn readers_by_format(&self, format_name: &str) -> Vec<Box<dyn ImageReader>> {
        (**self).readers_by_format(format_name)
    }

    fn writers_by_format(&self, format_name: &str) -> Vec<Box<dyn ImageWriter>> {
        (**self).writers_by_format(format_name)
    }

    fn writer_services(&self) -> Vec<&WriterPlugin> {
        (**self).writer_services()
    }
}

fn instantiate_writers<'a>(
    plugins: impl IntoIterator<Item = &'a WriterPlugin>,
    format_name: &str,
) -> Vec<Box<dyn ImageWriter>> {
    plugins
        .into_iter()
        .filter(|plugin| plugin.handles(format_name))
        .filter_map(|plugin| match plugin.create_writer() {
            Ok(writer) => Some(writer),
            Err(e) => {
                warn!("Could not create `{}` writer: {}", format_name, e);
                None
            }
        })
        .collect()
}

/// A codec catalog holding an explicit list of plugins,
/// in registration order.
#[derive(Debug, Default, Clone)]
pub struct StaticCatalog {
    readers: Vec<ReaderPlugin>,
    writers: Vec<WriterPlugin>,
}

impl StaticCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a decoder plugin, builder style.
    pub fn with_reader(mut self, plugin: ReaderPlugin) -> Self {
        self.readers.push(plugin);
        self
    }

    /// Register an encoder plugin, builder style.
    pub fn with_writer(mut self, plugin: WriterPlugin) -> Self {
        self.writers.push(plugin);
        self
    }

    /// Register a decoder plugin.
    pub fn register_reader(&mut self, plugin: ReaderPlugin) -> &mut Self {
        self.readers.push(plugin);
        self
    }

    /// Register an encoder plugin.
    pub fn register_writer(&mut self, plugin: WriterPlugin) -> &mut Self {
        self.writers.push(plugin);
        self
    }
}

impl CodecCatalog for StaticCatalog {
    fn readers_by_format(&self, format_name: &str) -> Vec<Box<dyn ImageReader>> {
        self.readers
            .iter()
            .filter(|plugin| plugin.handles(format_name))
            .map(ReaderPlugin::create_reader)
            .collect()
    }

    fn writers_by_format(&self, format_name: &str) -> Vec<Box<dyn ImageWriter>> {
        instantiate_writers(&self.writers, format_name)
    }

    fn writer_services(&self) -> Vec<&WriterPlugin> {
        self.writers.iter().collect()
    }
}

#[cfg(feature = "inventory-registry")]
// Collect codec plugins from other crates.
inventory::collect!(ReaderPlugin);

#[cfg(feature = "inventory-registry")]
inventory::collect!(WriterPlugin);

/// A codec catalog of all plugins submitted to the program
/// via [`submit_image_reader!`] and [`submit_image_writer!`].
///
/// The order of plugins submitted from different crates is unspecified,
/// but it does not change during the program's lifetime.
#[cfg(feature = "inventory-registry")]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct InventoryCatalog;

#[cfg(feature = "inventory-registry")]
impl CodecCatalog for InventoryCatalog {
    fn readers_by_format(&self, format_name: &str) -> Vec<Box<dyn ImageReader>> {
        inventory::iter::<ReaderPlugin>
            .into_iter()
            .filter(|plugin| plugin.handles(format_name))
            .map(ReaderPlugin::create_reader)
            .collect()
    }

    fn writers_by_format(&self, format_name: &str) -> Vec<Box<dyn ImageWriter>> {
        instantiate_writers(inventory::iter::<WriterPlugin>, format_name)
    }

    fn writer_services(&self) -> Vec<&WriterPlugin> {
        inventory::iter::<WriterPlugin>.into_iter().collect()
    }
}

#[cfg(feature = "inventory-registry")]
#[macro_export]
/// Submit an image decoder plugin to be available
/// in the program's [`InventoryCatalog`](crate::InventoryCatalog).
///
/// This macro does not actually "run" anything, so place it outside of a
/// function body at the root of the crate.
/// The expression must be constant,
/// such as a call to [`ReaderPlugin::new`](crate::ReaderPlugin::new).
macro_rules! submit_image_reader {
    ($plugin: expr) => {
        $crate::inventory::submit! {
            $plugin
        }
    };
}

#[cfg(not(feature = "inventory-registry"))]
#[macro_export]
/// Submit an image decoder plugin to be available
/// in the program's `InventoryCatalog`.
///
/// This macro does not actually "run" anything, so place it outside of a
/// function body at the root of the crate.
///
/// Without the `inventory-registry` feature, this request is ignored.
macro_rules! submit_image_reader {
    ($plugin: expr) => {
        // ignore request
    };
}

#[cfg(feature = "inventory-registry")]
#[macro_export]
/// Submit an image encoder plugin to be available
/// in the program's [`InventoryCatalog`](crate::InventoryCatalog).
///
/// This macro does not actually "run" anything, so place it outside of a
/// function body at the root of the crate.
/// The expression must be constant,
/// such as a call to [`WriterPlugin::new`](crate::WriterPlugin::new).
macro_rules! submit_image_writer {
    ($plugin: expr) => {
        $crate::inventory::submit! {
            $plugin
        }
    };
}

#[cfg(not(feature = "inventory-registry"))]
#[macro_export]
/// Submit an image encoder plugin to be available
/// in the program's `InventoryCatalog`.
///
/// This macro does not actually "run" anything, so place it outside of a
/// function body at the root of the crate.
///
/// Without the `inventory-registry` feature, this request is ignored.
macro_rules! submit_image_writer {
    ($plugin: expr) => {
        // ignore request
    };
}
