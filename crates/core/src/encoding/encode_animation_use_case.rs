use std::time::Instant;

use crate::container::domain::container_writer::ContainerWriterFactory;
use crate::container::infrastructure::writer_factory::FormatWriterFactory;
use crate::encoding::encode_config::EncodeConfig;
use crate::encoding::encode_logger::{
    EncodeLogger, NullEncodeLogger, STAGE_APPEND, STAGE_FINALIZE, STAGE_NORMALIZE,
};
use crate::encoding::encode_request::EncodeRequest;
use crate::encoding::encode_result::{EncodeError, EncodeResult, EncodeSummary};
use crate::encoding::infrastructure::create_executor;
use crate::encoding::normalize_executor::{elapsed_ms, NormalizeExecutor};
use crate::orientation::domain::frame_normalizer::FrameNormalizer;
use crate::orientation::infrastructure::affine_frame_normalizer::AffineFrameNormalizer;

/// Animation encoding pipeline: open sink → normalize → append → loop
/// metadata → finalize.
///
/// Frames that fail to normalize are dropped and reported in the summary;
/// only sink and container failures fail the encode.
pub struct EncodeAnimationUseCase {
    writers: Box<dyn ContainerWriterFactory>,
    normalizer: Box<dyn FrameNormalizer>,
    executor: Box<dyn NormalizeExecutor>,
    logger: Box<dyn EncodeLogger>,
}

impl EncodeAnimationUseCase {
    pub fn new(
        writers: Box<dyn ContainerWriterFactory>,
        normalizer: Box<dyn FrameNormalizer>,
        executor: Box<dyn NormalizeExecutor>,
        logger: Option<Box<dyn EncodeLogger>>,
    ) -> Self {
        Self {
            writers,
            normalizer,
            executor,
            logger: logger.unwrap_or_else(|| Box::new(NullEncodeLogger)),
        }
    }

    /// Wires the default GIF writer, affine normalizer and an executor
    /// sized by `config.workers`.
    pub fn from_config(config: &EncodeConfig, logger: Option<Box<dyn EncodeLogger>>) -> Self {
        Self::new(
            Box::new(FormatWriterFactory::new(config.quantizer_speed)),
            Box::new(AffineFrameNormalizer::new()),
            create_executor(config.workers, config.channel_capacity),
            logger,
        )
    }

    pub fn execute(&mut self, request: &EncodeRequest) -> EncodeResult {
        let total = request.frames.len();
        log::info!(
            "Encoding {total} frames to {} (delay {:.2}s, loop {})",
            request.sink.display(),
            request.delay.as_secs(),
            request.loop_count.count(),
        );

        let mut writer = self.writers.open(&request.sink, total).map_err(|e| {
            log::error!("Cannot open {}: {e}", request.sink.display());
            EncodeError::SinkUnavailable(e)
        })?;

        let mut dropped = Vec::new();
        let logger = &mut self.logger;
        let delay = request.delay;
        self.executor
            .run(
                &request.frames,
                self.normalizer.as_ref(),
                &mut |normalized| {
                    logger.timing(STAGE_NORMALIZE, normalized.elapsed_ms);
                    match normalized.result {
                        Ok(frame) => {
                            let start = Instant::now();
                            writer.append(&frame, delay)?;
                            logger.timing(STAGE_APPEND, elapsed_ms(start));
                        }
                        Err(reason) => {
                            log::warn!("Dropping frame {}: {reason}", normalized.index);
                            logger.frame_dropped(normalized.index, &reason);
                            dropped.push(normalized.index);
                        }
                    }
                    logger.progress(normalized.index + 1, total);
                    Ok(())
                },
            )
            .map_err(EncodeError::Finalize)?;

        writer
            .set_loop_count(request.loop_count)
            .map_err(EncodeError::Finalize)?;

        let frames_written = writer.frames_appended();
        let start = Instant::now();
        let finalized = writer.finalize();
        self.logger.timing(STAGE_FINALIZE, elapsed_ms(start));
        self.logger.summary();

        match finalized {
            Ok(location) => {
                log::info!(
                    "Wrote {frames_written}/{total} frames to {}",
                    location.display()
                );
                Ok(EncodeSummary {
                    location,
                    frames_written,
                    dropped_frames: dropped,
                })
            }
            Err(e) => {
                log::error!("Encode to {} failed: {e}", request.sink.display());
                Err(EncodeError::Finalize(e))
            }
        }
    }
}
