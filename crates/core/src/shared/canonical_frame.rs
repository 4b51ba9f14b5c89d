use std::borrow::Cow;

use image::{DynamicImage, ImageBuffer, Luma, LumaA, Rgb, Rgba};

use crate::orientation::domain::orientation::Orientation;
use crate::shared::frame::{BitDepth, ColorSpace, PixelFormat, RasterFrame, RowOrigin};

/// An upright frame: identity orientation, top-left origin, packed rows.
///
/// Borrows the source buffer when the source was already canonical,
/// otherwise owns the redrawn pixels.
#[derive(Clone, Debug)]
pub struct CanonicalFrame<'a> {
    data: Cow<'a, [u8]>,
    width: u32,
    height: u32,
    format: PixelFormat,
    bit_depth: BitDepth,
    color_space: ColorSpace,
}

impl<'a> CanonicalFrame<'a> {
    /// Views an identity, packed, top-down frame without copying.
    pub(crate) fn borrowed(frame: &'a RasterFrame) -> Self {
        debug_assert!(frame.orientation().is_identity() && frame.is_packed_top_down());
        let len = frame.packed_row_len() * frame.height() as usize;
        Self {
            data: Cow::Borrowed(&frame.data()[..len]),
            width: frame.width(),
            height: frame.height(),
            format: frame.format(),
            bit_depth: frame.bit_depth(),
            color_space: frame.color_space(),
        }
    }

    pub fn from_owned(
        data: Vec<u8>,
        width: u32,
        height: u32,
        format: PixelFormat,
        bit_depth: BitDepth,
        color_space: ColorSpace,
    ) -> Self {
        debug_assert_eq!(
            data.len(),
            width as usize * height as usize * format.channels() * bit_depth.bytes_per_sample(),
            "data length must equal width * height * bytes per pixel"
        );
        Self {
            data: Cow::Owned(data),
            width,
            height,
            format,
            bit_depth,
            color_space,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::Identity
    }

    /// True when no pixels were copied to produce this frame.
    pub fn is_borrowed(&self) -> bool {
        matches!(self.data, Cow::Borrowed(_))
    }

    pub fn into_owned(self) -> CanonicalFrame<'static> {
        CanonicalFrame {
            data: Cow::Owned(self.data.into_owned()),
            width: self.width,
            height: self.height,
            format: self.format,
            bit_depth: self.bit_depth,
            color_space: self.color_space,
        }
    }

    /// Copies the pixels into an identity-tagged raster frame.
    pub fn to_raster(&self) -> RasterFrame {
        let stride = self.width as usize * self.format.channels() * self.bit_depth.bytes_per_sample();
        RasterFrame::new(
            self.data.to_vec(),
            self.width,
            self.height,
            self.format,
            self.bit_depth,
            self.color_space,
            stride,
            RowOrigin::TopLeft,
            Orientation::Identity,
        )
    }

    /// Wraps the pixels in an `image` buffer of the matching color type.
    ///
    /// Returns `None` if the buffer does not match the dimensions.
    pub fn to_dynamic_image(&self) -> Option<DynamicImage> {
        let (w, h) = (self.width, self.height);
        match self.bit_depth {
            BitDepth::Eight => {
                let bytes = self.data.to_vec();
                match self.format {
                    PixelFormat::Gray => ImageBuffer::<Luma<u8>, _>::from_raw(w, h, bytes)
                        .map(DynamicImage::ImageLuma8),
                    PixelFormat::GrayAlpha => ImageBuffer::<LumaA<u8>, _>::from_raw(w, h, bytes)
                        .map(DynamicImage::ImageLumaA8),
                    PixelFormat::Rgb => ImageBuffer::<Rgb<u8>, _>::from_raw(w, h, bytes)
                        .map(DynamicImage::ImageRgb8),
                    PixelFormat::Rgba => ImageBuffer::<Rgba<u8>, _>::from_raw(w, h, bytes)
                        .map(DynamicImage::ImageRgba8),
                }
            }
            BitDepth::Sixteen => {
                let samples: Vec<u16> = self
                    .data
                    .chunks_exact(2)
                    .map(|pair| u16::from_ne_bytes([pair[0], pair[1]]))
                    .collect();
                match self.format {
                    PixelFormat::Gray => ImageBuffer::<Luma<u16>, _>::from_raw(w, h, samples)
                        .map(DynamicImage::ImageLuma16),
                    PixelFormat::GrayAlpha => ImageBuffer::<LumaA<u16>, _>::from_raw(w, h, samples)
                        .map(DynamicImage::ImageLumaA16),
                    PixelFormat::Rgb => ImageBuffer::<Rgb<u16>, _>::from_raw(w, h, samples)
                        .map(DynamicImage::ImageRgb16),
                    PixelFormat::Rgba => ImageBuffer::<Rgba<u16>, _>::from_raw(w, h, samples)
                        .map(DynamicImage::ImageRgba16),
                }
            }
        }
    }
}
