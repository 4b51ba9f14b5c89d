use std::path::PathBuf;

use thiserror::Error;

use crate::container::domain::container_writer::ContainerError;

/// What a successful encode produced.
///
/// Unreadable frames do not fail the encode; their request indices are
/// listed in `dropped_frames`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeSummary {
    pub location: PathBuf,
    pub frames_written: usize,
    pub dropped_frames: Vec<usize>,
}

impl EncodeSummary {
    /// True when every requested frame made it into the container.
    pub fn is_complete(&self) -> bool {
        self.dropped_frames.is_empty()
    }
}

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("destination sink unavailable: {0}")]
    SinkUnavailable(#[source] ContainerError),
    #[error("failed to finalize container: {0}")]
    Finalize(#[source] ContainerError),
    #[error("encode aborted: {0}")]
    Aborted(String),
}

pub type EncodeResult = Result<EncodeSummary, EncodeError>;

/// The flat `(success, location)` view of an [`EncodeResult`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    pub success: bool,
    pub location: Option<PathBuf>,
}

impl From<&EncodeResult> for Completion {
    fn from(result: &EncodeResult) -> Self {
        match result {
            Ok(summary) => Completion {
                success: true,
                location: Some(summary.location.clone()),
            },
            Err(_) => Completion {
                success: false,
                location: None,
            },
        }
    }
}
