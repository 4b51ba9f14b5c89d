use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::container::domain::container_writer::{
    ContainerError, ContainerWriter, WriterOp, WriterState,
};
use crate::container::domain::frame_timing::{FrameDelay, LoopCount};
use crate::shared::canonical_frame::CanonicalFrame;
use crate::shared::constants::{MAX_QUANTIZER_SPEED, MIN_QUANTIZER_SPEED, PARTIAL_SUFFIX};

/// Animated GIF89a writer built on the `gif` crate.
///
/// Frames are quantized as they are appended but nothing reaches the sink
/// until `finalize`: the GIF header needs the logical screen size (the
/// largest frame) and the loop extension must precede the first frame,
/// yet loop metadata arrives after the last one. The file is written to
/// `<sink>.part` and renamed over the sink on success; on any failure the
/// partial file is removed.
pub struct GifContainerWriter {
    sink: PathBuf,
    part_path: PathBuf,
    file: Option<File>,
    frames: Vec<gif::Frame<'static>>,
    canvas: (u16, u16),
    repeat: gif::Repeat,
    speed: i32,
    state: WriterState,
    appended: usize,
    deferred: Option<ContainerError>,
    committed: bool,
}

impl GifContainerWriter {
    /// Opens the sink for writing. Fails with `SinkUnavailable` if the
    /// partial file cannot be created or the sink is a directory.
    pub fn create(sink: &Path, expected_frames: usize, speed: i32) -> Result<Self, ContainerError> {
        if sink.is_dir() {
            return Err(ContainerError::SinkUnavailable {
                path: sink.to_path_buf(),
                source: std::io::Error::other("sink is a directory"),
            });
        }

        let part_path = partial_path(sink);
        let file = File::create(&part_path).map_err(|source| ContainerError::SinkUnavailable {
            path: sink.to_path_buf(),
            source,
        })?;

        log::debug!(
            "Opened GIF writer for {} ({expected_frames} frames expected)",
            sink.display()
        );

        Ok(Self {
            sink: sink.to_path_buf(),
            part_path,
            file: Some(file),
            frames: Vec::with_capacity(expected_frames),
            canvas: (0, 0),
            repeat: gif::Repeat::Infinite,
            speed: speed.clamp(MIN_QUANTIZER_SPEED, MAX_QUANTIZER_SPEED),
            state: WriterState::Created,
            appended: 0,
            deferred: None,
            committed: false,
        })
    }

    pub fn partial_path(&self) -> &Path {
        &self.part_path
    }

    fn commit(&mut self) -> Result<PathBuf, ContainerError> {
        if let Some(err) = self.deferred.take() {
            return Err(err);
        }
        if self.frames.is_empty() {
            return Err(ContainerError::NoFrames);
        }
        let file = self.file.take().ok_or(ContainerError::InvalidState {
            operation: "finalize",
            state: self.state,
        })?;

        let (width, height) = self.canvas;
        let mut encoder = gif::Encoder::new(BufWriter::new(file), width, height, &[])
            .map_err(encoding_error)?;
        encoder.set_repeat(self.repeat).map_err(encoding_error)?;
        for frame in &self.frames {
            encoder.write_frame(frame).map_err(encoding_error)?;
        }

        let commit_error = |source| ContainerError::Commit {
            path: self.sink.clone(),
            source,
        };
        let mut buffered = encoder.into_inner().map_err(commit_error)?;
        buffered.flush().map_err(commit_error)?;
        let file = buffered.into_inner().map_err(|e| commit_error(e.into_error()))?;
        file.sync_all().map_err(commit_error)?;
        drop(file);

        fs::rename(&self.part_path, &self.sink).map_err(commit_error)?;
        self.committed = true;
        Ok(self.sink.clone())
    }
}

impl ContainerWriter for GifContainerWriter {
    fn append(
        &mut self,
        frame: &CanonicalFrame<'_>,
        delay: FrameDelay,
    ) -> Result<(), ContainerError> {
        self.state = self.state.advance(WriterOp::Append)?;
        let index = self.appended;
        self.appended += 1;

        if self.deferred.is_some() {
            return Ok(());
        }

        match encode_frame(frame, delay, self.speed, index) {
            Ok(gif_frame) => {
                self.canvas = (
                    self.canvas.0.max(gif_frame.width),
                    self.canvas.1.max(gif_frame.height),
                );
                log::debug!(
                    "Appended GIF frame {index} ({}x{}, {}cs)",
                    gif_frame.width,
                    gif_frame.height,
                    gif_frame.delay
                );
                self.frames.push(gif_frame);
            }
            // Surfaces at finalize so the container fails as a whole.
            Err(err) => {
                log::warn!("GIF frame {index} cannot be encoded: {err}");
                self.deferred = Some(err);
            }
        }
        Ok(())
    }

    fn set_loop_count(&mut self, loop_count: LoopCount) -> Result<(), ContainerError> {
        self.state = self.state.advance(WriterOp::SetMetadata)?;
        self.repeat = match loop_count {
            LoopCount::Infinite => gif::Repeat::Infinite,
            LoopCount::Finite(n) => gif::Repeat::Finite(n.get()),
        };
        Ok(())
    }

    fn finalize(mut self: Box<Self>) -> Result<PathBuf, ContainerError> {
        self.state = self.state.advance(WriterOp::Finalize)?;
        self.commit()
    }

    fn state(&self) -> WriterState {
        self.state
    }

    fn frames_appended(&self) -> usize {
        self.appended
    }
}

impl Drop for GifContainerWriter {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        self.file.take();
        if let Err(e) = fs::remove_file(&self.part_path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!(
                    "Failed to remove partial file {}: {e}",
                    self.part_path.display()
                );
            }
        }
    }
}

fn partial_path(sink: &Path) -> PathBuf {
    let mut name = sink.as_os_str().to_owned();
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

fn encoding_error(e: gif::EncodingError) -> ContainerError {
    ContainerError::Encoding(Box::new(e))
}

fn encode_frame(
    frame: &CanonicalFrame<'_>,
    delay: FrameDelay,
    speed: i32,
    index: usize,
) -> Result<gif::Frame<'static>, ContainerError> {
    let too_large = || ContainerError::FrameTooLarge {
        index,
        width: frame.width(),
        height: frame.height(),
    };
    let width = u16::try_from(frame.width()).map_err(|_| too_large())?;
    let height = u16::try_from(frame.height()).map_err(|_| too_large())?;

    let image = frame
        .to_dynamic_image()
        .ok_or(ContainerError::FrameConversion { index })?;
    let mut pixels = image.to_rgba8().into_raw();

    let mut gif_frame = gif::Frame::from_rgba_speed(width, height, &mut pixels, speed);
    gif_frame.delay = delay.centiseconds();
    gif_frame.dispose = gif::DisposalMethod::Background;
    Ok(gif_frame)
}
