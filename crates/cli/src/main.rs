use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use gifmux_core::container::domain::frame_timing::{FrameDelay, LoopCount};
use gifmux_core::encoding::encode_animation_use_case::EncodeAnimationUseCase;
use gifmux_core::encoding::encode_config::EncodeConfig;
use gifmux_core::encoding::encode_logger::StageTimingLogger;
use gifmux_core::encoding::encode_request::EncodeRequest;
use gifmux_core::input::infrastructure::image_file_reader::ImageFileReader;
use gifmux_core::shared::constants::{
    DEFAULT_CHANNEL_CAPACITY, DEFAULT_FRAME_DELAY_SECS, DEFAULT_QUANTIZER_SPEED, GIF_EXTENSIONS,
    IMAGE_EXTENSIONS, MAX_QUANTIZER_SPEED, MIN_QUANTIZER_SPEED,
};

/// Assemble still images into an animated GIF, drawing each one upright.
#[derive(Parser)]
#[command(name = "gifmux")]
struct Cli {
    /// Input images, in playback order.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output GIF file.
    #[arg(short, long)]
    output: PathBuf,

    /// Seconds each frame stays on screen.
    #[arg(long, default_value_t = DEFAULT_FRAME_DELAY_SECS)]
    delay: f32,

    /// Times to play the animation (0 = forever).
    #[arg(long, default_value = "0")]
    loop_count: u16,

    /// Frames normalized in parallel (default: available cores).
    #[arg(long)]
    jobs: Option<usize>,

    /// Palette quantizer speed (1 = best quality, 30 = fastest).
    #[arg(long, default_value_t = DEFAULT_QUANTIZER_SPEED)]
    speed: i32,

    /// Treat every input as already upright, ignoring EXIF orientation.
    #[arg(long)]
    ignore_orientation: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let reader = if cli.ignore_orientation {
        ImageFileReader::new().ignoring_orientation()
    } else {
        ImageFileReader::new()
    };
    let frames = reader.read_all(&cli.inputs)?;
    log::info!("Read {} input images", frames.len());

    let request = EncodeRequest::new(frames, FrameDelay::from_secs(cli.delay)?, &cli.output)
        .with_loop_count(LoopCount::from_count(cli.loop_count));

    let mut config = EncodeConfig {
        channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        quantizer_speed: cli.speed,
        ..EncodeConfig::default()
    };
    if let Some(jobs) = cli.jobs {
        config.workers = jobs;
    }

    let mut use_case =
        EncodeAnimationUseCase::from_config(&config, Some(Box::new(StageTimingLogger::default())));
    let summary = use_case.execute(&request)?;

    if !summary.is_complete() {
        log::warn!(
            "{} of {} frames could not be read: {:?}",
            summary.dropped_frames.len(),
            request.frames.len(),
            summary.dropped_frames
        );
    }
    println!("{}", summary.location.display());
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    for input in &cli.inputs {
        if !input.exists() {
            return Err(format!("Input file not found: {}", input.display()).into());
        }
        if !has_extension(input, IMAGE_EXTENSIONS) {
            return Err(format!(
                "Unsupported input image {}, expected one of: {}",
                input.display(),
                IMAGE_EXTENSIONS.join(", ")
            )
            .into());
        }
    }
    if !has_extension(&cli.output, GIF_EXTENSIONS) {
        return Err(format!("Output must be a .gif file, got {}", cli.output.display()).into());
    }
    if !cli.delay.is_finite() || cli.delay < 0.0 {
        return Err(format!("Delay must be a non-negative number of seconds, got {}", cli.delay).into());
    }
    if !(MIN_QUANTIZER_SPEED..=MAX_QUANTIZER_SPEED).contains(&cli.speed) {
        return Err(format!(
            "Speed must be between {MIN_QUANTIZER_SPEED} and {MAX_QUANTIZER_SPEED}, got {}",
            cli.speed
        )
        .into());
    }
    if cli.jobs == Some(0) {
        return Err("Jobs must be at least 1".into());
    }
    Ok(())
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}
