//! Frame timing for the host loop.

use crate::clock::Clock;

/// Tracks per-frame delta time from successive clock readings.
#[derive(Debug, Clone)]
pub struct Time {
    /// Clock reading when timing started.
    start: f64,
    /// Clock reading of the last frame.
    last_frame: f64,
    /// Duration of the last frame in seconds.
    delta: f64,
    /// Frame count since start.
    frame_count: u64,
    /// Upper bound on a single frame's delta, so a stall doesn't teleport the simulation.
    max_delta: f64,
}

impl Time {
    /// Start timing from the clock's current reading.
    pub fn new(clock: &impl Clock) -> Self {
        let now = clock.now();
        Self {
            start: now,
            last_frame: now,
            delta: 0.0,
            frame_count: 0,
            max_delta: 0.25,
        }
    }

    /// Update timing at the start of a new frame.
    pub fn update(&mut self, clock: &impl Clock) {
        let now = clock.now();
        self.delta = (now - self.last_frame).clamp(0.0, self.max_delta);
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta as f32
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f64 {
        self.last_frame - self.start
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn delta_follows_clock() {
        let clock = ManualClock::new();
        let mut time = Time::new(&clock);
        clock.advance(0.05);
        time.update(&clock);
        assert!((time.delta_seconds() - 0.05).abs() < 1e-6);
        assert_eq!(time.frame_count(), 1);
        assert!((time.elapsed_seconds() - 0.05).abs() < 1e-9);
    }

    #[test]
    fn long_stall_is_clamped() {
        let clock = ManualClock::new();
        let mut time = Time::new(&clock);
        clock.advance(3.0);
        time.update(&clock);
        assert!((time.delta_seconds() - 0.25).abs() < 1e-6);
    }
}
