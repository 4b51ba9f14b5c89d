use std::fs::File;
use std::path::Path;

use gifmux_core::container::domain::container_writer::ContainerError;
use gifmux_core::container::domain::frame_timing::{FrameDelay, LoopCount};
use gifmux_core::encoding::encode_animation_use_case::EncodeAnimationUseCase;
use gifmux_core::encoding::encode_config::EncodeConfig;
use gifmux_core::encoding::encode_request::EncodeRequest;
use gifmux_core::encoding::encode_result::{Completion, EncodeError};
use gifmux_core::encoding::encode_worker;
use gifmux_core::orientation::domain::orientation::Orientation;
use gifmux_core::shared::frame::{BitDepth, ColorSpace, PixelFormat, RasterFrame, RowOrigin};

const RED: [u8; 3] = [255, 0, 0];
const BLUE: [u8; 3] = [0, 0, 255];

struct DecodedFrame {
    width: u16,
    height: u16,
    delay: u16,
    rgba: Vec<u8>,
}

impl DecodedFrame {
    fn is_red(&self, x: usize, y: usize) -> bool {
        let i = (y * self.width as usize + x) * 4;
        self.rgba[i] > 128 && self.rgba[i + 2] < 128
    }

    fn red_pixels(&self) -> Vec<(usize, usize)> {
        let mut found = Vec::new();
        for y in 0..self.height as usize {
            for x in 0..self.width as usize {
                if self.is_red(x, y) {
                    found.push((x, y));
                }
            }
        }
        found
    }
}

fn decode(path: &Path) -> (u16, u16, gif::Repeat, Vec<DecodedFrame>) {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = options.read_info(File::open(path).unwrap()).unwrap();
    let mut frames = Vec::new();
    while let Some(frame) = decoder.read_next_frame().unwrap() {
        frames.push(DecodedFrame {
            width: frame.width,
            height: frame.height,
            delay: frame.delay,
            rgba: frame.buffer.to_vec(),
        });
    }
    (decoder.width(), decoder.height(), decoder.repeat(), frames)
}

/// 3x2 RGB frame, red at stored (0, 0) and blue elsewhere.
fn marked_frame(orientation: Orientation) -> RasterFrame {
    let mut data = Vec::with_capacity(18);
    data.extend_from_slice(&RED);
    for _ in 1..6 {
        data.extend_from_slice(&BLUE);
    }
    RasterFrame::packed(data, 3, 2, PixelFormat::Rgb, orientation)
}

fn unreadable_frame() -> RasterFrame {
    RasterFrame::new(
        vec![0; 4],
        3,
        2,
        PixelFormat::Rgb,
        BitDepth::Eight,
        ColorSpace::Srgb,
        9,
        RowOrigin::TopLeft,
        Orientation::Identity,
    )
}

fn use_case(workers: usize) -> EncodeAnimationUseCase {
    let config = EncodeConfig {
        workers,
        ..EncodeConfig::default()
    };
    EncodeAnimationUseCase::from_config(&config, None)
}

#[test]
fn mixed_orientations_are_drawn_upright() {
    let dir = tempfile::tempdir().unwrap();
    let sink = dir.path().join("anim.gif");
    let frames = vec![
        marked_frame(Orientation::Identity),
        marked_frame(Orientation::Rotated180),
        marked_frame(Orientation::Rotated90Cw),
    ];
    let request = EncodeRequest::new(frames, FrameDelay::from_secs(0.2).unwrap(), &sink)
        .with_loop_count(LoopCount::from_count(0));

    let summary = use_case(2).execute(&request).unwrap();

    assert_eq!(summary.location, sink);
    assert_eq!(summary.frames_written, 3);
    assert!(summary.dropped_frames.is_empty());

    let (width, height, repeat, frames) = decode(&sink);
    assert_eq!((width, height), (3, 3));
    assert_eq!(repeat, gif::Repeat::Infinite);
    assert_eq!(frames.len(), 3);
    assert!(frames.iter().all(|f| f.delay == 20));

    assert_eq!((frames[0].width, frames[0].height), (3, 2));
    assert_eq!(frames[0].red_pixels(), vec![(0, 0)]);

    assert_eq!((frames[1].width, frames[1].height), (3, 2));
    assert_eq!(frames[1].red_pixels(), vec![(2, 1)]);

    assert_eq!((frames[2].width, frames[2].height), (2, 3));
    assert_eq!(frames[2].red_pixels(), vec![(1, 0)]);
}

#[test]
fn unreadable_frame_is_dropped_and_rest_encoded() {
    let dir = tempfile::tempdir().unwrap();
    let sink = dir.path().join("partial.gif");
    let frames = vec![
        marked_frame(Orientation::Identity),
        unreadable_frame(),
        marked_frame(Orientation::Mirrored),
    ];
    let request = EncodeRequest::new(frames, FrameDelay::from_secs(0.05).unwrap(), &sink)
        .with_loop_count(LoopCount::from_count(2));

    let summary = use_case(1).execute(&request).unwrap();

    assert_eq!(summary.frames_written, 2);
    assert_eq!(summary.dropped_frames, vec![1]);
    let (_, _, repeat, frames) = decode(&sink);
    assert_eq!(repeat, gif::Repeat::Finite(2));
    assert_eq!(frames.len(), 2);
    assert!(frames.iter().all(|f| f.delay == 5));
    assert_eq!(frames[1].red_pixels(), vec![(2, 0)]);
}

#[test]
fn empty_frame_list_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let sink = dir.path().join("empty.gif");
    let request = EncodeRequest::new(Vec::new(), FrameDelay::from_secs(0.1).unwrap(), &sink);

    let result = use_case(1).execute(&request);

    assert!(matches!(
        result,
        Err(EncodeError::Finalize(ContainerError::NoFrames))
    ));
    assert!(!sink.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn missing_directory_is_sink_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let sink = dir.path().join("no").join("such").join("out.gif");
    let request = EncodeRequest::new(
        vec![marked_frame(Orientation::Identity)],
        FrameDelay::from_secs(0.1).unwrap(),
        &sink,
    );

    let result = use_case(1).execute(&request);

    let completion = Completion::from(&result);
    assert!(!completion.success);
    assert!(completion.location.is_none());
    assert!(matches!(
        result,
        Err(EncodeError::SinkUnavailable(ContainerError::SinkUnavailable { .. }))
    ));
}

#[test]
fn unknown_extension_is_sink_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let request = EncodeRequest::new(
        vec![marked_frame(Orientation::Identity)],
        FrameDelay::from_secs(0.1).unwrap(),
        dir.path().join("anim.mp4"),
    );

    let result = use_case(1).execute(&request);

    assert!(matches!(
        result,
        Err(EncodeError::SinkUnavailable(ContainerError::UnsupportedContainer { .. }))
    ));
}

#[test]
fn background_encode_reports_completion_once() {
    let dir = tempfile::tempdir().unwrap();
    let sink = dir.path().join("bg.gif");
    let request = EncodeRequest::new(
        vec![
            marked_frame(Orientation::Rotated90Ccw),
            marked_frame(Orientation::Rotated180Mirrored),
        ],
        FrameDelay::from_secs(0.1).unwrap(),
        &sink,
    );

    let rx = encode_worker::spawn(use_case(2), request);
    let result = rx.recv().unwrap();

    assert_eq!(
        Completion::from(&result),
        Completion {
            success: true,
            location: Some(sink.clone()),
        }
    );
    assert!(rx.recv().is_err());
    let (width, height, _, frames) = decode(&sink);
    assert_eq!((width, height), (3, 3));
    assert_eq!((frames[0].width, frames[0].height), (2, 3));
    assert_eq!(frames[0].red_pixels(), vec![(0, 2)]);
    assert_eq!(frames[1].red_pixels(), vec![(0, 1)]);
}
