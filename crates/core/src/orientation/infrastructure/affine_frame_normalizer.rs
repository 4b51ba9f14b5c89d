use ndarray::{s, ArrayViewMut3};

use crate::orientation::domain::frame_normalizer::{
    validate_layout, FrameNormalizer, NormalizeError,
};
use crate::shared::canonical_frame::CanonicalFrame;
use crate::shared::frame::{RasterFrame, RowOrigin};

/// Redraws frames upright by pushing every destination pixel centre back
/// through the inverse of the orientation transform.
///
/// Sampling is nearest-neighbour, which is exact for the eight
/// orientation transforms: each destination pixel maps to exactly one
/// source pixel and no colour values are blended.
pub struct AffineFrameNormalizer;

impl AffineFrameNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AffineFrameNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameNormalizer for AffineFrameNormalizer {
    fn normalize<'a>(&self, frame: &'a RasterFrame) -> Result<CanonicalFrame<'a>, NormalizeError> {
        validate_layout(frame)?;

        let orientation = frame.orientation();
        if orientation.is_identity() && frame.is_packed_top_down() {
            return Ok(CanonicalFrame::borrowed(frame));
        }

        let source = frame.as_ndarray().ok_or(NormalizeError::DrawFailed)?;
        let inverse = orientation
            .transform(frame.width(), frame.height())
            .inverted()
            .ok_or(NormalizeError::DrawFailed)?;

        let (src_w, src_h) = (frame.width() as usize, frame.height() as usize);
        let (dst_w, dst_h) = orientation.canonical_size(frame.width(), frame.height());
        let bpp = frame.bytes_per_pixel();
        let flip_rows = frame.origin() == RowOrigin::BottomLeft;

        let len = (dst_w as usize)
            .checked_mul(dst_h as usize)
            .and_then(|v| v.checked_mul(bpp))
            .ok_or(NormalizeError::TooLarge {
                width: frame.width(),
                height: frame.height(),
            })?;
        let mut data = vec![0u8; len];
        {
            let mut dest: ArrayViewMut3<'_, u8> =
                ArrayViewMut3::from_shape((dst_h as usize, dst_w as usize, bpp), &mut data[..])
                    .map_err(|_| NormalizeError::DrawFailed)?;

            for (dy, mut row) in dest.outer_iter_mut().enumerate() {
                for dx in 0..dst_w as usize {
                    let (sx, sy) = inverse.apply(dx as f64 + 0.5, dy as f64 + 0.5);
                    let (sx, sy) = (sx.floor(), sy.floor());
                    if sx < 0.0 || sy < 0.0 || sx >= src_w as f64 || sy >= src_h as f64 {
                        continue;
                    }
                    let (sx, sy) = (sx as usize, sy as usize);
                    let stored_row = if flip_rows { src_h - 1 - sy } else { sy };
                    row.slice_mut(s![dx, ..])
                        .assign(&source.slice(s![stored_row, sx, ..]));
                }
            }
        }

        Ok(CanonicalFrame::from_owned(
            data,
            dst_w,
            dst_h,
            frame.format(),
            frame.bit_depth(),
            frame.color_space(),
        ))
    }
}
