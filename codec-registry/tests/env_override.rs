//! Selecting the default descriptor document through the environment.
//!
//! Kept in its own test binary, since it changes the process environment.
use dicom_codec_registry::{
    registry::default_resource_name, uids, LoadError, WriterDescriptor, WriterRegistry,
};
use std::io::Write;

const WRITERS_ENV: &str = "DICOM_IMAGE_WRITER_REGISTRY";

#[test]
fn default_document_follows_environment() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(
        br#"<ImageWriterFactory>
  <element tsuid="1.2.840.10008.1.2.5">
    <writer name="Custom RLE" format="rle" class="custom::Rle"/>
  </element>
</ImageWriterFactory>"#,
    )
    .unwrap();
    file.flush().unwrap();
    let url = format!("file://{}", file.path().display());

    std::env::set_var(WRITERS_ENV, &url);
    assert_eq!(default_resource_name::<WriterDescriptor>(), url);
    let writers = WriterRegistry::load_default().unwrap();
    assert_eq!(writers.len(), 1);
    let rle = &writers.get(uids::RLE_LOSSLESS).unwrap()[0];
    assert_eq!(rle.class_name(), Some("custom::Rle"));

    std::env::set_var(WRITERS_ENV, "no/such/writers.xml");
    let err = WriterRegistry::load_default().unwrap_err();
    match err {
        LoadError::LoadDefault { name, source } => {
            assert_eq!(name, "no/such/writers.xml");
            assert!(matches!(*source, LoadError::ResourceNotFound { .. }));
        }
        e => panic!("unexpected error: {:?}", e),
    }

    // blank values are ignored
    std::env::set_var(WRITERS_ENV, "  ");
    let writers = WriterRegistry::load_default().unwrap();
    assert!(writers.len() > 1);

    std::env::remove_var(WRITERS_ENV);
}
