//! Monotonic clocks for gameplay timing.
//!
//! Gameplay code reads time through the [`Clock`] trait so that firing
//! cadence and reload deadlines can be replayed deterministically.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// A monotonic time source measured in seconds.
pub trait Clock {
    /// Seconds since an arbitrary fixed origin. Never decreases.
    fn now(&self) -> f64;
}

/// Wall clock backed by [`Instant`], starting at zero when created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Manually advanced clock for fixed-step simulation and tests.
///
/// Clones share the same time, so a host can keep one handle and hand
/// another to the system that reads it.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    seconds: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the clock at a given time.
    pub fn starting_at(seconds: f64) -> Self {
        Self { seconds: Rc::new(Cell::new(seconds)) }
    }

    /// Move time forward. Negative steps are ignored.
    pub fn advance(&self, dt: f64) {
        if dt > 0.0 {
            self.seconds.set(self.seconds.get() + dt);
        }
    }

    /// Jump to an absolute time. Ignored if it would move backwards.
    pub fn set(&self, seconds: f64) {
        if seconds >= self.seconds.get() {
            self.seconds.set(seconds);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.seconds.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> f64 {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let reader = clock.clone();
        clock.advance(0.25);
        assert_eq!(reader.now(), 0.25);
    }

    #[test]
    fn manual_clock_never_runs_backwards() {
        let clock = ManualClock::starting_at(2.0);
        clock.advance(-1.0);
        clock.set(1.0);
        assert_eq!(clock.now(), 2.0);
        clock.set(3.5);
        assert_eq!(clock.now(), 3.5);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
