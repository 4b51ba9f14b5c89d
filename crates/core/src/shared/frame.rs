use ndarray::{ArrayView3, ShapeBuilder};

use crate::orientation::domain::orientation::Orientation;

/// Channel arrangement of a pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Gray,
    GrayAlpha,
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Gray => 1,
            PixelFormat::GrayAlpha => 2,
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }
}

/// Bits per channel sample. 16-bit samples are stored native-endian.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BitDepth {
    Eight,
    Sixteen,
}

impl BitDepth {
    pub fn bytes_per_sample(self) -> usize {
        match self {
            BitDepth::Eight => 1,
            BitDepth::Sixteen => 2,
        }
    }
}

/// Color-space descriptor carried alongside the pixels. Never converted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    #[default]
    Srgb,
    DisplayP3,
    LinearSrgb,
    Gray,
    Unknown,
}

/// Where the first stored row sits in the displayed grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RowOrigin {
    #[default]
    TopLeft,
    /// Rows are stored bottom-up.
    BottomLeft,
}

/// A captured raster frame together with its declared orientation.
///
/// The buffer is not validated on construction: a frame whose buffer
/// cannot back its declared layout is still representable, and is
/// rejected when it is normalized.
#[derive(Clone, Debug)]
pub struct RasterFrame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    format: PixelFormat,
    bit_depth: BitDepth,
    color_space: ColorSpace,
    row_stride: usize,
    origin: RowOrigin,
    orientation: Orientation,
}

impl RasterFrame {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        format: PixelFormat,
        bit_depth: BitDepth,
        color_space: ColorSpace,
        row_stride: usize,
        origin: RowOrigin,
        orientation: Orientation,
    ) -> Self {
        Self {
            data,
            width,
            height,
            format,
            bit_depth,
            color_space,
            row_stride,
            origin,
            orientation,
        }
    }

    /// Tightly packed, top-left, 8-bit sRGB frame.
    pub fn packed(
        data: Vec<u8>,
        width: u32,
        height: u32,
        format: PixelFormat,
        orientation: Orientation,
    ) -> Self {
        let row_stride = width as usize * format.channels();
        Self::new(
            data,
            width,
            height,
            format,
            BitDepth::Eight,
            ColorSpace::Srgb,
            row_stride,
            RowOrigin::TopLeft,
            orientation,
        )
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
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

    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    pub fn origin(&self) -> RowOrigin {
        self.origin
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.format.channels() * self.bit_depth.bytes_per_sample()
    }

    /// Bytes of pixel data in one row, excluding stride padding.
    pub fn packed_row_len(&self) -> usize {
        self.width as usize * self.bytes_per_pixel()
    }

    /// True when rows are contiguous and top-down, so the buffer can be
    /// used as-is by a canonical frame.
    pub fn is_packed_top_down(&self) -> bool {
        self.origin == RowOrigin::TopLeft
            && (self.row_stride == self.packed_row_len() || self.height <= 1)
    }

    /// Stored rows viewed as `(row, byte_in_row, _)` with stride honoured.
    ///
    /// Returns `None` when the buffer cannot back the declared layout.
    pub fn as_ndarray(&self) -> Option<ArrayView3<'_, u8>> {
        let rows = self.height as usize;
        let pixels = self.width as usize;
        let bpp = self.bytes_per_pixel();
        if rows == 0 || pixels == 0 || self.row_stride < pixels * bpp {
            return None;
        }
        let needed = (rows - 1)
            .checked_mul(self.row_stride)?
            .checked_add(pixels * bpp)?;
        if self.data.len() < needed {
            return None;
        }
        let strides = (self.row_stride, bpp, 1);
        ArrayView3::from_shape((rows, pixels, bpp).strides(strides), &self.data[..needed]).ok()
    }
}
