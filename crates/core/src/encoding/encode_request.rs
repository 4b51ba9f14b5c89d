use std::path::PathBuf;

use crate::container::domain::frame_timing::{FrameDelay, LoopCount};
use crate::shared::frame::RasterFrame;

/// One animation to encode.
///
/// Frame order is playback order. The delay applies to every frame.
#[derive(Clone, Debug)]
pub struct EncodeRequest {
    pub frames: Vec<RasterFrame>,
    pub delay: FrameDelay,
    pub loop_count: LoopCount,
    pub sink: PathBuf,
}

impl EncodeRequest {
    /// A request that loops forever.
    pub fn new(frames: Vec<RasterFrame>, delay: FrameDelay, sink: impl Into<PathBuf>) -> Self {
        Self {
            frames,
            delay,
            loop_count: LoopCount::Infinite,
            sink: sink.into(),
        }
    }

    pub fn with_loop_count(mut self, loop_count: LoopCount) -> Self {
        self.loop_count = loop_count;
        self
    }
}
