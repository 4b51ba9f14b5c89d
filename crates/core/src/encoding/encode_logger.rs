use std::collections::HashMap;
use std::time::Instant;

use crate::orientation::domain::frame_normalizer::NormalizeError;

pub const STAGE_NORMALIZE: &str = "normalize";
pub const STAGE_APPEND: &str = "append";
pub const STAGE_FINALIZE: &str = "finalize";

/// Observer for encode orchestration events.
///
/// Lets callers watch progress and stage timings without the use case
/// knowing where the output goes.
pub trait EncodeLogger: Send {
    /// Report frame-level progress; `current` is 1-based.
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long a named stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// A frame could not be normalized and was left out.
    fn frame_dropped(&mut self, index: usize, reason: &NormalizeError);

    fn info(&mut self, message: &str);

    /// Emit an end-of-encode summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards all events.
pub struct NullEncodeLogger;

impl EncodeLogger for NullEncodeLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn frame_dropped(&mut self, _index: usize, _reason: &NormalizeError) {}
    fn info(&mut self, _message: &str) {}
}

/// Collects per-stage timings and dropped frames, and writes progress and
/// a closing summary through `log`.
///
/// Progress lines are throttled to every `throttle_frames` frames.
pub struct StageTimingLogger {
    throttle_frames: usize,
    timings: HashMap<String, Vec<f64>>,
    dropped: Vec<usize>,
    start_time: Instant,
    total_frames: usize,
    messages: Vec<String>,
}

impl StageTimingLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: HashMap::new(),
            dropped: Vec::new(),
            start_time: Instant::now(),
            total_frames: 0,
            messages: Vec::new(),
        }
    }

    /// Returns the formatted summary, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.dropped.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let frames = self.total_frames;
        let mut lines = vec![format!(
            "Encode summary ({frames} frames, {:.1}s total):",
            elapsed_ms / 1000.0
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = if durations.is_empty() {
                0.0
            } else {
                total_ms / durations.len() as f64
            };
            lines.push(format!(
                "  {stage:10}: avg {avg_ms:6.1}ms  total {total_ms:7.0}ms"
            ));
        }

        if !self.dropped.is_empty() {
            lines.push(format!("  Dropped frames: {:?}", self.dropped));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn dropped_frames(&self) -> &[usize] {
        &self.dropped
    }
}

impl Default for StageTimingLogger {
    fn default() -> Self {
        Self::new(10)
    }
}

impl EncodeLogger for StageTimingLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.total_frames = total;
        if total > 0 && (current % self.throttle_frames == 0 || current == total) {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("Encoding: {current}/{total} frames ({pct:.1}%)");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn frame_dropped(&mut self, index: usize, reason: &NormalizeError) {
        self.dropped.push(index);
        log::debug!("frame {index} dropped: {reason}");
    }

    fn info(&mut self, message: &str) {
        self.messages.push(message.to_string());
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
