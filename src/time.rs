//! Tick timing and frame telemetry.
//!
//! The engine runs on a fixed cadence, not the display's refresh signal.
//! [`Ticker`] hands out deadlines every [`TICK_INTERVAL`] and reports when a
//! tick is due; [`Telemetry`] turns the per-tick [`PopulationReport`] stream
//! into the numbers the stats overlay shows.
//!
//! # Example
//!
//! ```ignore
//! use stormwave::time::{Ticker, Telemetry};
//!
//! let mut ticker = Ticker::new(Instant::now());
//! let mut telemetry = Telemetry::new(Instant::now());
//!
//! // In your event loop:
//! if ticker.due(Instant::now()) {
//!     let report = engine.tick(&mut framebuffer);
//!     telemetry.record(report, Instant::now());
//! }
//! let wake_at = ticker.next_deadline();
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::engine::PopulationReport;

/// Fixed tick period (about 30 Hz).
pub const TICK_INTERVAL: Duration = Duration::from_millis(33);

/// Totals kept for the rolling average.
pub const AVERAGE_WINDOW: usize = 10;

/// Fixed-interval tick scheduler.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next: Instant,
    ticks: u64,
}

impl Ticker {
    /// A ticker at [`TICK_INTERVAL`] whose first tick is due immediately.
    pub fn new(now: Instant) -> Self {
        Self::with_interval(now, TICK_INTERVAL)
    }

    pub fn with_interval(now: Instant, interval: Duration) -> Self {
        Self {
            interval,
            next: now,
            ticks: 0,
        }
    }

    /// Whether a tick is due at `now`. Consumes the tick if so.
    ///
    /// A late tick schedules the next one a full interval after `now`, so
    /// ticks never overlap or queue up behind a stall.
    pub fn due(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.ticks += 1;
        self.next += self.interval;
        if self.next <= now {
            self.next = now + self.interval;
        }
        true
    }

    /// When the next tick is due.
    #[inline]
    pub fn next_deadline(&self) -> Instant {
        self.next
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Ticks handed out so far.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// FPS and population statistics.
#[derive(Debug, Clone)]
pub struct Telemetry {
    /// Frames counted in the current FPS window.
    window_frames: u32,
    /// Start of the current FPS window.
    window_start: Instant,
    /// How long a window lasts before FPS is recomputed.
    window: Duration,
    fps: f32,
    totals: VecDeque<usize>,
    last: PopulationReport,
}

impl Telemetry {
    pub fn new(now: Instant) -> Self {
        Self {
            window_frames: 0,
            window_start: now,
            window: Duration::from_secs(1),
            fps: 0.0,
            totals: VecDeque::with_capacity(AVERAGE_WINDOW),
            last: PopulationReport::default(),
        }
    }

    /// Record one tick's report.
    pub fn record(&mut self, report: PopulationReport, now: Instant) {
        self.window_frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= self.window {
            self.fps = self.window_frames as f32 / elapsed.as_secs_f32();
            self.window_frames = 0;
            self.window_start = now;
        }

        if self.totals.len() == AVERAGE_WINDOW {
            self.totals.pop_front();
        }
        self.totals.push_back(report.total);
        self.last = report;
    }

    /// Frames per second over the last completed window.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Mean of the last [`AVERAGE_WINDOW`] totals.
    pub fn average_total(&self) -> f32 {
        if self.totals.is_empty() {
            return 0.0;
        }
        self.totals.iter().sum::<usize>() as f32 / self.totals.len() as f32
    }

    #[inline]
    pub fn last(&self) -> PopulationReport {
        self.last
    }

    /// One-line overlay text.
    pub fn summary(&self) -> String {
        let r = self.last;
        let mut line = format!(
            "FPS: {:.0} | Total: {} | Avg: {:.0} | P: {} | BG: {} | R: {}",
            self.fps,
            r.total,
            self.average_total(),
            r.particles,
            r.background,
            r.ripples
        );
        if r.shapes > 0 {
            line.push_str(&format!(" | 3D: {}", r.shapes));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(total: usize) -> PopulationReport {
        PopulationReport {
            total,
            particles: total,
            ..Default::default()
        }
    }

    #[test]
    fn test_ticker_first_tick_immediate() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new(t0);
        assert!(ticker.due(t0));
        assert!(!ticker.due(t0));
        assert_eq!(ticker.next_deadline(), t0 + TICK_INTERVAL);
    }

    #[test]
    fn test_ticker_fixed_cadence() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new(t0);
        ticker.due(t0);
        assert!(!ticker.due(t0 + Duration::from_millis(20)));
        assert!(ticker.due(t0 + Duration::from_millis(35)));
        // Scheduled from the deadline, not from when it was observed.
        assert_eq!(ticker.next_deadline(), t0 + Duration::from_millis(66));
        assert_eq!(ticker.ticks(), 2);
    }

    #[test]
    fn test_ticker_does_not_queue_after_stall() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new(t0);
        ticker.due(t0);
        let late = t0 + Duration::from_secs(1);
        assert!(ticker.due(late));
        assert!(!ticker.due(late));
        assert_eq!(ticker.next_deadline(), late + TICK_INTERVAL);
    }

    #[test]
    fn test_fps_window() {
        let t0 = Instant::now();
        let mut telemetry = Telemetry::new(t0);
        for i in 1..=30 {
            telemetry.record(report(1), t0 + Duration::from_millis(i * 33));
        }
        assert_eq!(telemetry.fps(), 0.0);
        telemetry.record(report(1), t0 + Duration::from_millis(1000));
        assert!((telemetry.fps() - 31.0).abs() < 0.5);
    }

    #[test]
    fn test_rolling_average() {
        let now = Instant::now();
        let mut telemetry = Telemetry::new(now);
        assert_eq!(telemetry.average_total(), 0.0);
        for total in 1..=20 {
            telemetry.record(report(total), now);
        }
        // Last ten: 11..=20
        assert!((telemetry.average_total() - 15.5).abs() < 1e-6);
        assert_eq!(telemetry.last().total, 20);
    }

    #[test]
    fn test_summary_mentions_shapes_only_when_present() {
        let now = Instant::now();
        let mut telemetry = Telemetry::new(now);
        telemetry.record(report(5), now);
        assert!(!telemetry.summary().contains("3D"));
        telemetry.record(
            PopulationReport {
                total: 6,
                shapes: 1,
                ..Default::default()
            },
            now,
        );
        assert!(telemetry.summary().contains("3D: 1"));
    }
}
