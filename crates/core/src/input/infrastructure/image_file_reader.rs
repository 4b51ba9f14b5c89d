use std::path::{Path, PathBuf};

use image::metadata::Orientation as ExifOrientation;
use image::{DynamicImage, ImageDecoder, ImageReader};
use thiserror::Error;

use crate::orientation::domain::orientation::Orientation;
use crate::shared::frame::{BitDepth, ColorSpace, PixelFormat, RasterFrame, RowOrigin};

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Decodes still image files into tagged [`RasterFrame`]s.
///
/// Pixels are kept as stored; the EXIF orientation becomes the frame's
/// orientation tag so normalization can draw it upright later.
pub struct ImageFileReader {
    ignore_orientation: bool,
}

impl ImageFileReader {
    pub fn new() -> Self {
        Self {
            ignore_orientation: false,
        }
    }

    /// Tag every frame as upright regardless of its metadata.
    pub fn ignoring_orientation(mut self) -> Self {
        self.ignore_orientation = true;
        self
    }

    pub fn read(&self, path: &Path) -> Result<RasterFrame, ReadError> {
        let decode_err = |source| ReadError::Decode {
            path: path.to_path_buf(),
            source,
        };

        let reader = ImageReader::open(path)
            .map_err(|source| ReadError::Open {
                path: path.to_path_buf(),
                source,
            })?
            .with_guessed_format()
            .map_err(|source| ReadError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        let mut decoder = reader.into_decoder().map_err(decode_err)?;

        let orientation = if self.ignore_orientation {
            Orientation::Identity
        } else {
            decoder
                .orientation()
                .map(from_exif)
                .unwrap_or_else(|e| {
                    log::warn!("Ignoring unreadable orientation in {}: {e}", path.display());
                    Orientation::Identity
                })
        };

        let image = DynamicImage::from_decoder(decoder).map_err(decode_err)?;
        log::debug!(
            "Read {} ({}x{}, {:?})",
            path.display(),
            image.width(),
            image.height(),
            orientation
        );
        Ok(to_raster(image, orientation))
    }

    /// Reads `paths` in order, stopping at the first failure.
    pub fn read_all<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<RasterFrame>, ReadError> {
        paths.iter().map(|p| self.read(p.as_ref())).collect()
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

fn from_exif(orientation: ExifOrientation) -> Orientation {
    match orientation {
        ExifOrientation::NoTransforms => Orientation::Identity,
        ExifOrientation::Rotate90 => Orientation::Rotated90Cw,
        ExifOrientation::Rotate180 => Orientation::Rotated180,
        ExifOrientation::Rotate270 => Orientation::Rotated90Ccw,
        ExifOrientation::FlipHorizontal => Orientation::Mirrored,
        ExifOrientation::FlipVertical => Orientation::Rotated180Mirrored,
        ExifOrientation::Rotate90FlipH => Orientation::Rotated90CcwMirrored,
        ExifOrientation::Rotate270FlipH => Orientation::Rotated90CwMirrored,
    }
}

fn to_raster(image: DynamicImage, orientation: Orientation) -> RasterFrame {
    let (width, height) = (image.width(), image.height());
    let (format, bit_depth, color_space) = match &image {
        DynamicImage::ImageLuma8(_) => (PixelFormat::Gray, BitDepth::Eight, ColorSpace::Gray),
        DynamicImage::ImageLumaA8(_) => (PixelFormat::GrayAlpha, BitDepth::Eight, ColorSpace::Gray),
        DynamicImage::ImageRgb8(_) => (PixelFormat::Rgb, BitDepth::Eight, ColorSpace::Srgb),
        DynamicImage::ImageRgba8(_) => (PixelFormat::Rgba, BitDepth::Eight, ColorSpace::Srgb),
        DynamicImage::ImageLuma16(_) => (PixelFormat::Gray, BitDepth::Sixteen, ColorSpace::Gray),
        DynamicImage::ImageLumaA16(_) => {
            (PixelFormat::GrayAlpha, BitDepth::Sixteen, ColorSpace::Gray)
        }
        DynamicImage::ImageRgb16(_) => (PixelFormat::Rgb, BitDepth::Sixteen, ColorSpace::Srgb),
        DynamicImage::ImageRgba16(_) => (PixelFormat::Rgba, BitDepth::Sixteen, ColorSpace::Srgb),
        // Float and future layouts are reduced to 8-bit RGBA.
        _ => {
            let data = image.to_rgba8().into_raw();
            return RasterFrame::packed(data, width, height, PixelFormat::Rgba, orientation);
        }
    };

    let row_stride = width as usize * format.channels() * bit_depth.bytes_per_sample();
    RasterFrame::new(
        image.as_bytes().to_vec(),
        width,
        height,
        format,
        bit_depth,
        color_space,
        row_stride,
        RowOrigin::TopLeft,
        orientation,
    )
}
