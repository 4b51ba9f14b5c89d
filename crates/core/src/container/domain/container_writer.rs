use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::container::domain::frame_timing::{FrameDelay, LoopCount};
use crate::shared::canonical_frame::CanonicalFrame;

/// Lifecycle of a container writer.
///
/// `Created → FramesAppending → MetadataSet → Finalized`. Metadata may be
/// set straight from `Created` (no frames), but never skipped, and frames
/// cannot be appended once metadata is set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriterState {
    Created,
    FramesAppending,
    MetadataSet,
    Finalized,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriterOp {
    Append,
    SetMetadata,
    Finalize,
}

impl WriterOp {
    fn name(self) -> &'static str {
        match self {
            WriterOp::Append => "append a frame",
            WriterOp::SetMetadata => "set container metadata",
            WriterOp::Finalize => "finalize",
        }
    }
}

impl WriterState {
    /// The state after `op`, or `InvalidState` if `op` is out of sequence.
    pub fn advance(self, op: WriterOp) -> Result<WriterState, ContainerError> {
        match (self, op) {
            (WriterState::Created | WriterState::FramesAppending, WriterOp::Append) => {
                Ok(WriterState::FramesAppending)
            }
            (WriterState::Created | WriterState::FramesAppending, WriterOp::SetMetadata) => {
                Ok(WriterState::MetadataSet)
            }
            (WriterState::MetadataSet, WriterOp::Finalize) => Ok(WriterState::Finalized),
            (state, op) => Err(ContainerError::InvalidState {
                operation: op.name(),
                state,
            }),
        }
    }
}

#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("cannot open sink {path}: {source}")]
    SinkUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no container format matches {path}")]
    UnsupportedContainer { path: PathBuf },
    #[error("container has no frames")]
    NoFrames,
    #[error("frame {index} is {width}x{height}, larger than the container allows")]
    FrameTooLarge { index: usize, width: u32, height: u32 },
    #[error("frame {index} could not be converted for encoding")]
    FrameConversion { index: usize },
    #[error("cannot {operation} while the writer is {state:?}")]
    InvalidState {
        operation: &'static str,
        state: WriterState,
    },
    #[error("container encoding failed: {0}")]
    Encoding(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("failed to commit {path}: {source}")]
    Commit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Accumulates upright frames and container metadata, then commits them
/// to the sink in one step.
pub trait ContainerWriter: Send {
    fn append(&mut self, frame: &CanonicalFrame<'_>, delay: FrameDelay)
        -> Result<(), ContainerError>;

    /// Global loop metadata. Must be set after the last frame.
    fn set_loop_count(&mut self, loop_count: LoopCount) -> Result<(), ContainerError>;

    /// Writes the container and returns its location. Consumes the writer,
    /// so it cannot be reused whether or not the commit succeeds.
    fn finalize(self: Box<Self>) -> Result<PathBuf, ContainerError>;

    fn state(&self) -> WriterState;

    fn frames_appended(&self) -> usize;
}

/// Opens a writer bound to a destination sink.
pub trait ContainerWriterFactory: Send + Sync {
    fn open(
        &self,
        sink: &Path,
        expected_frames: usize,
    ) -> Result<Box<dyn ContainerWriter>, ContainerError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::first_frame(WriterState::Created, WriterOp::Append, WriterState::FramesAppending)]
    #[case::next_frame(WriterState::FramesAppending, WriterOp::Append, WriterState::FramesAppending)]
    #[case::metadata(WriterState::FramesAppending, WriterOp::SetMetadata, WriterState::MetadataSet)]
    #[case::metadata_without_frames(WriterState::Created, WriterOp::SetMetadata, WriterState::MetadataSet)]
    #[case::finalize(WriterState::MetadataSet, WriterOp::Finalize, WriterState::Finalized)]
    fn test_valid_transitions(
        #[case] from: WriterState,
        #[case] op: WriterOp,
        #[case] to: WriterState,
    ) {
        assert_eq!(from.advance(op).unwrap(), to);
    }

    #[rstest]
    #[case::append_after_metadata(WriterState::MetadataSet, WriterOp::Append)]
    #[case::metadata_twice(WriterState::MetadataSet, WriterOp::SetMetadata)]
    #[case::finalize_without_metadata(WriterState::FramesAppending, WriterOp::Finalize)]
    #[case::finalize_from_created(WriterState::Created, WriterOp::Finalize)]
    #[case::append_after_finalize(WriterState::Finalized, WriterOp::Append)]
    #[case::finalize_twice(WriterState::Finalized, WriterOp::Finalize)]
    fn test_out_of_sequence_rejected(#[case] from: WriterState, #[case] op: WriterOp) {
        let err = from.advance(op).unwrap_err();
        assert!(matches!(err, ContainerError::InvalidState { state, .. } if state == from));
    }

    #[test]
    fn test_invalid_state_message_names_operation() {
        let err = WriterState::MetadataSet.advance(WriterOp::Append).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot append a frame while the writer is MetadataSet"
        );
    }
}
