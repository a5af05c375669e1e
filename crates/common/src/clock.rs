//! Loop timing utilities.
//!
//! The control loop is paced by the frame source, not by a timer. These
//! helpers only observe that pace:
//! - [`FrameRateMeter`] reports the achieved cycle rate
//! - [`StatusTicker`] decides when a periodic status line is due

use std::time::{Duration, Instant};

/// Measures how many cycles per second the loop is achieving.
#[derive(Debug, Clone)]
pub struct FrameRateMeter {
    epoch: Instant,
    window_start: Instant,
    window_frames: u64,
    total_frames: u64,
    last_fps: f64,
}

impl FrameRateMeter {
    /// Start measuring from now.
    pub fn start() -> Self {
        let now = Instant::now();
        Self {
            epoch: now,
            window_start: now,
            window_frames: 0,
            total_frames: 0,
            last_fps: 0.0,
        }
    }

    /// Record one completed cycle.
    pub fn record_frame(&mut self) {
        self.window_frames += 1;
        self.total_frames += 1;
    }

    /// Close the current window and return its average rate.
    pub fn roll_window(&mut self) -> f64 {
        let elapsed = self.window_start.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.last_fps = self.window_frames as f64 / elapsed;
        }
        self.window_start = Instant::now();
        self.window_frames = 0;
        self.last_fps
    }

    /// Frames recorded since start.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Time since the meter started.
    pub fn elapsed(&self) -> Duration {
        self.epoch.elapsed()
    }

    /// Average rate over the whole run.
    pub fn average_fps(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.total_frames as f64 / secs
    }
}

/// Fires at most once per interval, driven by caller-supplied timestamps.
#[derive(Debug)]
pub struct StatusTicker {
    interval_ns: u64,
    last_tick_ns: Option<u64>,
}

impl StatusTicker {
    /// Create a ticker that fires every `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval_ns: interval.as_nanos() as u64,
            last_tick_ns: None,
        }
    }

    /// Check if enough time has passed for the next tick.
    /// Returns true and updates internal state if ready.
    /// The first call only arms the ticker.
    pub fn should_tick(&mut self, current_ns: u64) -> bool {
        match self.last_tick_ns {
            None => {
                self.last_tick_ns = Some(current_ns);
                false
            }
            Some(last) if current_ns >= last + self.interval_ns => {
                self.last_tick_ns = Some(current_ns);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meter_counts_frames() {
        let mut meter = FrameRateMeter::start();
        for _ in 0..5 {
            meter.record_frame();
        }
        assert_eq!(meter.total_frames(), 5);
        let fps = meter.roll_window();
        assert!(fps >= 0.0);
        meter.record_frame();
        assert_eq!(meter.total_frames(), 6);
    }

    #[test]
    fn status_ticker_fires_once_per_interval() {
        let mut ticker = StatusTicker::new(Duration::from_secs(5));
        assert!(!ticker.should_tick(0)); // first call arms
        assert!(!ticker.should_tick(1_000_000_000));
        assert!(ticker.should_tick(5_000_000_000));
        assert!(!ticker.should_tick(6_000_000_000));
        assert!(ticker.should_tick(10_000_000_000));
    }
}
