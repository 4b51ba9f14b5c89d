/// Delay used when the caller does not pick one (~10 fps).
pub const DEFAULT_FRAME_DELAY_SECS: f32 = 0.1;

/// NeuQuant sampling speed for GIF palette quantization (1 = best, 30 = fastest).
pub const DEFAULT_QUANTIZER_SPEED: i32 = 10;
pub const MIN_QUANTIZER_SPEED: i32 = 1;
pub const MAX_QUANTIZER_SPEED: i32 = 30;

/// Normalized frames buffered between workers and the appending thread.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 8;

pub const GIF_EXTENSIONS: &[&str] = &["gif"];

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

/// Suffix of the temporary file a container is written to before commit.
pub const PARTIAL_SUFFIX: &str = ".part";
