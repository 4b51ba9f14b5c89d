use crate::container::domain::container_writer::ContainerError;
use crate::orientation::domain::frame_normalizer::{FrameNormalizer, NormalizeError};
use crate::shared::canonical_frame::CanonicalFrame;
use crate::shared::frame::RasterFrame;

/// Outcome of normalizing the frame at `index`.
#[derive(Debug)]
pub struct NormalizedFrame<'a> {
    pub index: usize,
    pub result: Result<CanonicalFrame<'a>, NormalizeError>,
    pub elapsed_ms: f64,
}

/// Receives normalized frames. An error stops the run.
pub type FrameSink<'a, 's> = dyn FnMut(NormalizedFrame<'a>) -> Result<(), ContainerError> + 's;

/// Abstracts how a batch of frames is normalized.
///
/// This is a port. Whatever the concurrency, `sink` sees every frame
/// exactly once and in input order, on the calling thread.
pub trait NormalizeExecutor: Send + Sync {
    fn run<'a>(
        &self,
        frames: &'a [RasterFrame],
        normalizer: &dyn FrameNormalizer,
        sink: &mut FrameSink<'a, '_>,
    ) -> Result<(), ContainerError>;
}

pub(crate) fn elapsed_ms(start: std::time::Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
