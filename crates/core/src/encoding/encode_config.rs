use crate::shared::constants::{DEFAULT_CHANNEL_CAPACITY, DEFAULT_QUANTIZER_SPEED};

/// Tuning for an encode run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeConfig {
    /// Threads normalizing frames; `1` normalizes on the encoding thread.
    pub workers: usize,
    pub channel_capacity: usize,
    /// GIF palette quantizer speed, 1..=30.
    pub quantizer_speed: i32,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            quantizer_speed: DEFAULT_QUANTIZER_SPEED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_at_least_one_worker() {
        let config = EncodeConfig::default();
        assert!(config.workers >= 1);
        assert_eq!(config.channel_capacity, DEFAULT_CHANNEL_CAPACITY);
        assert_eq!(config.quantizer_speed, DEFAULT_QUANTIZER_SPEED);
    }
}
