//! Frame timing utilities

use std::time::{Duration, Instant};

use crate::config::FrameConfig;

/// Frame clock for the external frame driver.
///
/// Measures the time between ticks and clamps it to a maximum delta, so a
/// long stall (debugger, window drag) does not produce one huge simulation
/// step.
pub struct FrameClock {
    last_frame: Instant,
    max_delta: f32,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(&FrameConfig::default())
    }
}

impl FrameClock {
    /// Create a new clock from frame settings
    pub fn new(config: &FrameConfig) -> Self {
        Self {
            last_frame: Instant::now(),
            max_delta: config.max_delta_time,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Advance the clock to now and return the clamped delta in seconds
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.advance(elapsed)
    }

    /// Advance the clock by an explicit duration and return the clamped delta
    pub fn advance(&mut self, elapsed: Duration) -> f32 {
        self.delta_time = elapsed.as_secs_f32().min(self.max_delta);
        self.total_time += self.delta_time;
        self.frame_count += 1;
        self.delta_time
    }

    /// Time of the last frame in seconds (after clamping)
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Simulated time accumulated since the clock was created
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of ticks so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_delta_is_clamped() {
        let mut clock = FrameClock::new(&FrameConfig { max_delta_time: 0.05, ..FrameConfig::default() });

        assert_relative_eq!(clock.advance(Duration::from_millis(16)), 0.016, epsilon = 1e-6);
        assert_relative_eq!(clock.advance(Duration::from_secs(2)), 0.05);
        assert_eq!(clock.frame_count(), 2);
        assert_relative_eq!(clock.total_time(), 0.066, epsilon = 1e-6);
    }
}
