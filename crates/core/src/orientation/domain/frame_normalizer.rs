use thiserror::Error;

use crate::shared::canonical_frame::CanonicalFrame;
use crate::shared::frame::RasterFrame;

/// Why a frame's pixels could not be read or redrawn.
///
/// Every variant is a frame-level failure: the encoder drops the frame
/// and carries on with the rest of the sequence.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("frame has no pixels ({width}x{height})")]
    EmptyFrame { width: u32, height: u32 },
    #[error("row stride {stride} is shorter than a packed row of {row_len} bytes")]
    StrideTooSmall { stride: usize, row_len: usize },
    #[error("pixel buffer holds {actual} bytes but the layout needs {expected}")]
    BufferTooShort { expected: usize, actual: usize },
    #[error("frame dimensions {width}x{height} exceed addressable memory")]
    TooLarge { width: u32, height: u32 },
    #[error("orientation transform could not be drawn")]
    DrawFailed,
}

/// Produces an upright copy (or view) of a tagged raster frame.
///
/// Implementations must be shareable across threads so distinct frames
/// can be normalized concurrently.
pub trait FrameNormalizer: Send + Sync {
    fn normalize<'a>(&self, frame: &'a RasterFrame) -> Result<CanonicalFrame<'a>, NormalizeError>;
}

/// Checks that the buffer can back the frame's declared layout.
pub fn validate_layout(frame: &RasterFrame) -> Result<(), NormalizeError> {
    let (width, height) = (frame.width(), frame.height());
    if width == 0 || height == 0 {
        return Err(NormalizeError::EmptyFrame { width, height });
    }

    let row_len = (width as usize)
        .checked_mul(frame.bytes_per_pixel())
        .ok_or(NormalizeError::TooLarge { width, height })?;
    if frame.row_stride() < row_len {
        return Err(NormalizeError::StrideTooSmall {
            stride: frame.row_stride(),
            row_len,
        });
    }

    let expected = (height as usize - 1)
        .checked_mul(frame.row_stride())
        .and_then(|v| v.checked_add(row_len))
        .ok_or(NormalizeError::TooLarge { width, height })?;
    if frame.data().len() < expected {
        return Err(NormalizeError::BufferTooShort {
            expected,
            actual: frame.data().len(),
        });
    }

    Ok(())
}
