//! Time sources.
//!
//! [`FrameClock`] turns the host's per-frame timestamps into a clamped delta
//! for [`crate::logic::tick`]. [`Clock`] supplies wall-clock seconds for the
//! save timestamp and offline progress.

use std::cell::Cell;

/// Largest delta a single frame may report. A tab that was backgrounded
/// for minutes is reconciled by offline progress on the next load, not by
/// one giant frame.
pub const MAX_FRAME_DELTA_MS: f64 = 500.0;

pub struct FrameClock {
    /// Timestamp of the last update (ms), None if first frame
    last_timestamp: Option<f64>,
    /// Total seconds handed out since creation
    pub elapsed_secs: f64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_timestamp: None,
            elapsed_secs: 0.0,
        }
    }

    /// Feed a monotonic timestamp in milliseconds (`performance.now()` or
    /// similar). Returns the seconds to advance the simulation by.
    pub fn update(&mut self, now_ms: f64) -> f64 {
        let delta_ms = match self.last_timestamp {
            Some(prev) => (now_ms - prev).clamp(0.0, MAX_FRAME_DELTA_MS),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);
        let secs = delta_ms / 1000.0;
        self.elapsed_secs += secs;
        secs
    }
}

/// Wall-clock source, in whole seconds since the Unix epoch.
pub trait Clock {
    fn now_unix_secs(&self) -> i64;
}

/// The real clock. Uses `Date.now()` in the browser.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg(not(target_arch = "wasm32"))]
    fn now_unix_secs(&self) -> i64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }

    #[cfg(target_arch = "wasm32")]
    fn now_unix_secs(&self) -> i64 {
        (js_sys::Date::now() / 1000.0) as i64
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<i64>,
}

impl ManualClock {
    pub fn new(now: i64) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn set(&self, now: i64) {
        self.now.set(now);
    }

    pub fn advance(&self, secs: i64) {
        self.now.set(self.now.get() + secs);
    }
}

impl Clock for ManualClock {
    fn now_unix_secs(&self) -> i64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_unix_secs(&self) -> i64 {
        (**self).now_unix_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_returns_zero() {
        let mut fc = FrameClock::new();
        assert!(fc.update(0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn delta_in_seconds() {
        let mut fc = FrameClock::new();
        fc.update(1_000.0);
        assert!((fc.update(1_250.0) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn clamp_large_delta() {
        let mut fc = FrameClock::new();
        fc.update(0.0);
        // 10 second gap (tab backgrounded) is clamped to 0.5s
        assert!((fc.update(10_000.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn backwards_timestamp_is_zero() {
        let mut fc = FrameClock::new();
        fc.update(500.0);
        assert!(fc.update(100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn steady_60fps() {
        let mut fc = FrameClock::new();
        fc.update(0.0);
        let mut total = 0.0;
        for i in 1..=60 {
            total += fc.update(i as f64 * 16.667);
        }
        assert!((total - 1.0).abs() < 0.01, "expected ~1s, got {}", total);
        assert!((fc.elapsed_secs - total).abs() < 1e-12);
    }

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now_unix_secs() > 1_577_836_800);
    }

    #[test]
    fn manual_clock_moves_on_request() {
        let clock = ManualClock::new(100);
        clock.advance(50);
        assert_eq!(clock.now_unix_secs(), 150);
        clock.set(10);
        assert_eq!((&clock).now_unix_secs(), 10);
    }
}
