use std::collections::BTreeMap;
use std::time::Instant;

use crossbeam_channel::Receiver;

use crate::container::domain::container_writer::ContainerError;
use crate::encoding::normalize_executor::{
    elapsed_ms, FrameSink, NormalizeExecutor, NormalizedFrame,
};
use crate::orientation::domain::frame_normalizer::FrameNormalizer;
use crate::shared::constants::DEFAULT_CHANNEL_CAPACITY;
use crate::shared::frame::RasterFrame;

/// Normalizes frames on a pool of scoped worker threads.
///
/// Layout: `jobs → workers [normalize] → main [reorder/sink]`
///
/// Workers finish out of order; the calling thread holds early results
/// until every lower index has been handed to the sink.
pub struct ThreadedNormalizeExecutor {
    workers: usize,
    channel_capacity: usize,
}

impl ThreadedNormalizeExecutor {
    pub fn new(workers: usize, channel_capacity: usize) -> Self {
        Self {
            workers: workers.max(1),
            channel_capacity: channel_capacity.max(1),
        }
    }
}

impl Default for ThreadedNormalizeExecutor {
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::new(workers, DEFAULT_CHANNEL_CAPACITY)
    }
}

impl NormalizeExecutor for ThreadedNormalizeExecutor {
    fn run<'a>(
        &self,
        frames: &'a [RasterFrame],
        normalizer: &dyn FrameNormalizer,
        sink: &mut FrameSink<'a, '_>,
    ) -> Result<(), ContainerError> {
        if frames.is_empty() {
            return Ok(());
        }
        let workers = self.workers.min(frames.len());

        let (job_tx, job_rx) = crossbeam_channel::unbounded::<usize>();
        for index in 0..frames.len() {
            // Receiver is alive in this scope.
            let _ = job_tx.send(index);
        }
        drop(job_tx);

        let (done_tx, done_rx) =
            crossbeam_channel::bounded::<NormalizedFrame<'a>>(self.channel_capacity);

        std::thread::scope(|scope| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let done_tx = done_tx.clone();
                scope.spawn(move || {
                    for index in job_rx {
                        let start = Instant::now();
                        let result = normalizer.normalize(&frames[index]);
                        let normalized = NormalizedFrame {
                            index,
                            result,
                            elapsed_ms: elapsed_ms(start),
                        };
                        if done_tx.send(normalized).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(done_tx);

            sink_in_order(done_rx, sink)
        })
    }
}

/// Drains `done_rx`, passing frames to `sink` by ascending index.
///
/// Returning early drops the receiver, which stops the workers at their
/// next send.
fn sink_in_order<'a>(
    done_rx: Receiver<NormalizedFrame<'a>>,
    sink: &mut FrameSink<'a, '_>,
) -> Result<(), ContainerError> {
    let mut pending: BTreeMap<usize, NormalizedFrame<'a>> = BTreeMap::new();
    let mut next = 0;
    for normalized in done_rx {
        pending.insert(normalized.index, normalized);
        while let Some(ready) = pending.remove(&next) {
            sink(ready)?;
            next += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use rstest::rstest;

    use crate::orientation::domain::frame_normalizer::NormalizeError;
    use crate::orientation::domain::orientation::Orientation;
    use crate::shared::canonical_frame::CanonicalFrame;
    use crate::shared::frame::PixelFormat;

    /// Sleeps longer for earlier frames so they finish last.
    struct ReversingNormalizer {
        calls: AtomicUsize,
    }

    impl FrameNormalizer for ReversingNormalizer {
        fn normalize<'a>(
            &self,
            frame: &'a RasterFrame,
        ) -> Result<CanonicalFrame<'a>, NormalizeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let value = frame.data()[0];
            std::thread::sleep(Duration::from_millis(u64::from(10 - value.min(10)) * 3));
            if value == 0 {
                return Err(NormalizeError::DrawFailed);
            }
            Ok(CanonicalFrame::from_owned(
                frame.data().to_vec(),
                frame.width(),
                frame.height(),
                frame.format(),
                frame.bit_depth(),
                frame.color_space(),
            ))
        }
    }

    fn gray(value: u8) -> RasterFrame {
        RasterFrame::packed(vec![value], 1, 1, PixelFormat::Gray, Orientation::Identity)
    }

    fn normalizer() -> ReversingNormalizer {
        ReversingNormalizer {
            calls: AtomicUsize::new(0),
        }
    }

    #[rstest]
    fn test_sink_sees_input_order(
        #[values(1, 2, 4, 16)] workers: usize,
        #[values(1, 8)] capacity: usize,
    ) {
        let frames: Vec<_> = (1..=8).map(gray).collect();
        let mut seen = Vec::new();
        ThreadedNormalizeExecutor::new(workers, capacity)
            .run(&frames, &normalizer(), &mut |n| {
                seen.push((n.index, n.result.unwrap().data()[0]));
                Ok(())
            })
            .unwrap();
        let expected: Vec<_> = (0..8usize).map(|i| (i, i as u8 + 1)).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_failed_frames_keep_their_slot() {
        let frames = vec![gray(3), gray(0), gray(5)];
        let mut seen = Vec::new();
        ThreadedNormalizeExecutor::new(3, 2)
            .run(&frames, &normalizer(), &mut |n| {
                seen.push((n.index, n.result.is_ok()));
                Ok(())
            })
            .unwrap();
        assert_eq!(seen, vec![(0, true), (1, false), (2, true)]);
    }

    #[test]
    fn test_sink_error_stops_run() {
        let frames: Vec<_> = (1..=6).map(gray).collect();
        let mut calls = 0;
        let result = ThreadedNormalizeExecutor::new(2, 1).run(&frames, &normalizer(), &mut |_| {
            calls += 1;
            Err(ContainerError::NoFrames)
        });
        assert!(matches!(result, Err(ContainerError::NoFrames)));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_empty_input_never_calls_sink() {
        let normalizer = normalizer();
        let mut calls = 0;
        ThreadedNormalizeExecutor::default()
            .run(&[], &normalizer, &mut |_| {
                calls += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(calls, 0);
        assert_eq!(normalizer.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_each_frame_normalized_once() {
        let frames: Vec<_> = (1..=10).map(gray).collect();
        let normalizer = normalizer();
        ThreadedNormalizeExecutor::new(4, 2)
            .run(&frames, &normalizer, &mut |_| Ok(()))
            .unwrap();
        assert_eq!(normalizer.calls.load(Ordering::SeqCst), 10);
    }
}
