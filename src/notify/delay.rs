// src/notify/delay.rs
// Pause between consecutive sends

use rand::Rng;
use std::time::Duration;

pub trait DelayPolicy: Send + Sync {
    fn next_delay(&self) -> Duration;
}

/// Longest pause a configured bound can produce
pub const MAX_DELAY: Duration = Duration::from_secs(600);

fn bounded(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).map_or(MAX_DELAY, |d| d.min(MAX_DELAY))
}

/// Uniform random pause in `[min, max]`, to stay under gateway rate limits
#[derive(Debug, Clone, Copy)]
pub struct UniformDelay {
    min: Duration,
    max: Duration,
}

impl UniformDelay {
    /// Bounds are swapped if given in the wrong order
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Negative or NaN seconds become zero; anything above `MAX_DELAY`,
    /// infinity included, is capped.
    pub fn from_secs(min: f64, max: f64) -> Self {
        Self::new(bounded(min), bounded(max))
    }
}

impl DelayPolicy for UniformDelay {
    fn next_delay(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let secs = rand::rng().random_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}

/// No pause at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl DelayPolicy for NoDelay {
    fn next_delay(&self) -> Duration {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_delay_stays_in_bounds() {
        let policy = UniformDelay::from_secs(3.0, 8.0);
        for _ in 0..200 {
            let d = policy.next_delay();
            assert!(d >= Duration::from_secs(3) && d <= Duration::from_secs(8));
        }
    }

    #[test]
    fn test_uniform_delay_normalises_bounds() {
        let policy = UniformDelay::from_secs(5.0, 1.0);
        let d = policy.next_delay();
        assert!(d >= Duration::from_secs(1) && d <= Duration::from_secs(5));
    }

    #[test]
    fn test_degenerate_range() {
        let policy = UniformDelay::from_secs(2.0, 2.0);
        assert_eq!(policy.next_delay(), Duration::from_secs(2));
        assert_eq!(NoDelay.next_delay(), Duration::ZERO);
    }

    #[test]
    fn test_unrepresentable_bounds_are_capped() {
        let policy = UniformDelay::from_secs(f64::NAN, f64::INFINITY);
        assert!(policy.next_delay() <= MAX_DELAY);

        let policy = UniformDelay::from_secs(1e30, 1e30);
        assert_eq!(policy.next_delay(), MAX_DELAY);

        let policy = UniformDelay::from_secs(-4.0, -1.0);
        assert_eq!(policy.next_delay(), Duration::ZERO);
    }
}
