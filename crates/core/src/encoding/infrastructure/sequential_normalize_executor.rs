use std::time::Instant;

use crate::container::domain::container_writer::ContainerError;
use crate::encoding::normalize_executor::{
    elapsed_ms, FrameSink, NormalizeExecutor, NormalizedFrame,
};
use crate::orientation::domain::frame_normalizer::FrameNormalizer;
use crate::shared::frame::RasterFrame;

/// Normalizes one frame at a time on the calling thread.
pub struct SequentialNormalizeExecutor;

impl NormalizeExecutor for SequentialNormalizeExecutor {
    fn run<'a>(
        &self,
        frames: &'a [RasterFrame],
        normalizer: &dyn FrameNormalizer,
        sink: &mut FrameSink<'a, '_>,
    ) -> Result<(), ContainerError> {
        for (index, frame) in frames.iter().enumerate() {
            let start = Instant::now();
            let result = normalizer.normalize(frame);
            sink(NormalizedFrame {
                index,
                result,
                elapsed_ms: elapsed_ms(start),
            })?;
        }
        Ok(())
    }
}
