use std::path::Path;

use crate::container::domain::container_writer::{
    ContainerError, ContainerWriter, ContainerWriterFactory,
};
use crate::shared::constants::{DEFAULT_QUANTIZER_SPEED, GIF_EXTENSIONS};

use super::gif_container_writer::GifContainerWriter;

/// Animated container formats the encoder can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerFormat {
    Gif,
}

impl ContainerFormat {
    /// Picks the format from the sink's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        if GIF_EXTENSIONS.contains(&ext.as_str()) {
            Some(ContainerFormat::Gif)
        } else {
            None
        }
    }
}

/// Opens the writer matching the sink's container format.
pub fn create_writer(
    sink: &Path,
    expected_frames: usize,
    quantizer_speed: i32,
) -> Result<Box<dyn ContainerWriter>, ContainerError> {
    match ContainerFormat::from_path(sink) {
        Some(ContainerFormat::Gif) => {
            log::debug!("Using GIF container for {}", sink.display());
            Ok(Box::new(GifContainerWriter::create(
                sink,
                expected_frames,
                quantizer_speed,
            )?))
        }
        None => Err(ContainerError::UnsupportedContainer {
            path: sink.to_path_buf(),
        }),
    }
}

/// [`ContainerWriterFactory`] that dispatches on the sink's extension.
pub struct FormatWriterFactory {
    quantizer_speed: i32,
}

impl FormatWriterFactory {
    pub fn new(quantizer_speed: i32) -> Self {
        Self { quantizer_speed }
    }
}

impl Default for FormatWriterFactory {
    fn default() -> Self {
        Self::new(DEFAULT_QUANTIZER_SPEED)
    }
}

impl ContainerWriterFactory for FormatWriterFactory {
    fn open(
        &self,
        sink: &Path,
        expected_frames: usize,
    ) -> Result<Box<dyn ContainerWriter>, ContainerError> {
        create_writer(sink, expected_frames, self.quantizer_speed)
    }
}
