use std::num::NonZeroU16;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimingError {
    #[error("frame delay must be a finite, non-negative number of seconds, got {0}")]
    InvalidDelay(f32),
}

/// Display time of one frame, in seconds.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct FrameDelay(f32);

impl FrameDelay {
    pub fn from_secs(secs: f32) -> Result<Self, TimingError> {
        if !secs.is_finite() || secs < 0.0 {
            return Err(TimingError::InvalidDelay(secs));
        }
        Ok(Self(secs))
    }

    pub fn as_secs(self) -> f32 {
        self.0
    }

    /// The delay in hundredths of a second, rounded and saturating.
    pub fn centiseconds(self) -> u16 {
        (self.0 * 100.0).round().clamp(0.0, u16::MAX as f32) as u16
    }
}

/// How many times the animation plays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LoopCount {
    #[default]
    Infinite,
    Finite(NonZeroU16),
}

impl LoopCount {
    /// `0` means loop forever.
    pub fn from_count(count: u16) -> Self {
        match NonZeroU16::new(count) {
            Some(n) => LoopCount::Finite(n),
            None => LoopCount::Infinite,
        }
    }

    /// The stored count; `0` for infinite.
    pub fn count(self) -> u16 {
        match self {
            LoopCount::Infinite => 0,
            LoopCount::Finite(n) => n.get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case::zero(0.0, 0)]
    #[case::fifth(0.2, 20)]
    #[case::rounds_up(0.125, 13)]
    #[case::rounds_down(0.014, 1)]
    #[case::saturates(10_000.0, u16::MAX)]
    fn test_centiseconds(#[case] secs: f32, #[case] expected: u16) {
        assert_eq!(FrameDelay::from_secs(secs).unwrap().centiseconds(), expected);
    }

    #[rstest]
    #[case::negative(-0.1)]
    #[case::nan(f32::NAN)]
    #[case::infinite(f32::INFINITY)]
    fn test_invalid_delay_rejected(#[case] secs: f32) {
        assert!(FrameDelay::from_secs(secs).is_err());
    }

    #[test]
    fn test_as_secs_preserves_value() {
        assert_relative_eq!(FrameDelay::from_secs(0.35).unwrap().as_secs(), 0.35);
    }

    #[test]
    fn test_zero_loop_count_is_infinite() {
        assert_eq!(LoopCount::from_count(0), LoopCount::Infinite);
        assert_eq!(LoopCount::default(), LoopCount::Infinite);
        assert_eq!(LoopCount::Infinite.count(), 0);
    }

    #[test]
    fn test_finite_loop_count_round_trips() {
        let count = LoopCount::from_count(3);
        assert!(matches!(count, LoopCount::Finite(n) if n.get() == 3));
        assert_eq!(count.count(), 3);
    }
}
