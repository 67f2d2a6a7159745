//! Independent test for submitting codec plugins in a separate crate.
//!
//! Only applicable to the inventory-based catalog.
#![cfg(feature = "inventory-registry")]

use dicom_codec::{
    submit_image_reader, submit_image_writer, CodecCatalog, ImageReader, ImageWriter,
    InstantiateResult, InventoryCatalog, ReaderPlugin, WriterPlugin,
};

/// this would, in theory, decode some images
#[derive(Debug)]
struct DummyDecoder;

impl ImageReader for DummyDecoder {
    fn implementation(&self) -> &str {
        "dummy-decoder"
    }
}

/// this would, in theory, encode some images
#[derive(Debug)]
struct DummyEncoder;

impl ImageWriter for DummyEncoder {}

fn new_decoder() -> Box<dyn ImageReader> {
    Box::new(DummyDecoder)
}

fn new_encoder() -> InstantiateResult<Box<dyn ImageWriter>> {
    Ok(Box::new(DummyEncoder))
}

submit_image_reader! {
    ReaderPlugin::new(&["dummy-format"], new_decoder)
}

submit_image_writer! {
    WriterPlugin::new(&["dummy-format", "Dummy Format"], new_encoder)
}

#[test]
fn contains_dummy_reader() {
    let readers = InventoryCatalog.readers_by_format("dummy-format");
    assert_eq!(readers.len(), 1);
    assert_eq!(readers[0].implementation(), "dummy-decoder");

    assert!(InventoryCatalog.readers_by_format("dummy").is_empty());
}

#[test]
fn contains_dummy_writer_service() {
    let writers = InventoryCatalog.writers_by_format("Dummy Format");
    assert_eq!(writers.len(), 1);
    assert_eq!(writers[0].implementation(), "submit::DummyEncoder");

    let services = InventoryCatalog.writer_services();
    assert!(services.iter().any(|s| s.supports_format("DUMMY-FORMAT")));
}
