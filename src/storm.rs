//! Storms: bursts of synthetic clicks.
//!
//! A storm picks one effect for its whole run, a duration and an event rate,
//! then fires events at random canvas positions until time runs out. The
//! controller is polled from the host's tick; it never owns a timer.
//!
//! ```ignore
//! let mut storms = StormController::new();
//! storms.start(Instant::now());
//! // every tick:
//! for event in storms.poll(Instant::now(), width, height) {
//!     engine.storm_event(&event);
//! }
//! ```

use std::time::{Duration, Instant};

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::effects::ClickEffect;
use crate::error::StormError;

/// Upper bound on events released by a single poll.
pub const MAX_EVENTS_PER_POLL: usize = 64;

/// One synthetic click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StormEvent {
    pub position: Vec2,
    /// Resolved per event when `Random`.
    pub effect: ClickEffect,
}

/// An active storm.
#[derive(Debug, Clone, PartialEq)]
pub struct Storm {
    pub effect: ClickEffect,
    pub duration: Duration,
    /// Events per second.
    pub intensity: f32,
    started: Instant,
    period: Duration,
    emitted: u64,
}

impl Storm {
    /// Validate parameters and derive the event period.
    ///
    /// The intensity is checked before `1 / intensity` is computed.
    pub fn new(effect: ClickEffect, duration_secs: f32, intensity: f32, now: Instant) -> Result<Self, StormError> {
        if !intensity.is_finite() || intensity <= 0.0 {
            return Err(StormError::InvalidIntensity(intensity));
        }
        if !duration_secs.is_finite() || duration_secs < 0.0 {
            return Err(StormError::InvalidDuration(duration_secs));
        }
        let period = Duration::from_secs_f64(1.0 / intensity as f64);
        Ok(Self {
            effect,
            duration: Duration::from_secs_f32(duration_secs),
            intensity,
            started: now,
            period,
            emitted: 0,
        })
    }

    /// Time between events.
    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn time_left(&self, now: Instant) -> Duration {
        self.duration.saturating_sub(now.saturating_duration_since(self.started))
    }

    pub fn is_over(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }

    /// Events emitted so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Events due by `now` that have not been emitted yet.
    fn due(&self, now: Instant) -> u64 {
        let elapsed = now.saturating_duration_since(self.started).min(self.duration);
        let total = (elapsed.as_secs_f64() / self.period.as_secs_f64()).floor() as u64;
        total.saturating_sub(self.emitted)
    }
}

/// Owns at most one active storm.
#[derive(Debug)]
pub struct StormController {
    active: Option<Storm>,
    rng: SmallRng,
}

impl Default for StormController {
    fn default() -> Self {
        Self::new()
    }
}

impl StormController {
    pub fn new() -> Self {
        Self {
            active: None,
            rng: SmallRng::from_entropy(),
        }
    }

    /// Start a random storm: 3–11 s, 2–10 events/s, one effect drawn from
    /// the storm kinds plus `random`.
    ///
    /// Ignored while a storm is already running. Returns the new storm.
    pub fn start(&mut self, now: Instant) -> Option<&Storm> {
        if self.active.is_some() {
            return None;
        }
        let duration = self.rng.gen_range(3.0..11.0);
        let intensity = self.rng.gen_range(2.0..10.0);
        let choices: Vec<ClickEffect> = ClickEffect::storm_choices().collect();
        let effect = choices[self.rng.gen_range(0..choices.len())];
        self.start_with(effect, duration, intensity, now).ok()?;
        self.active.as_ref()
    }

    /// Start a storm with explicit parameters.
    ///
    /// Invalid intensity or duration is rejected before any period is
    /// derived. Ignored while a storm is already running.
    pub fn start_with(
        &mut self,
        effect: ClickEffect,
        duration_secs: f32,
        intensity: f32,
        now: Instant,
    ) -> Result<(), StormError> {
        let storm = Storm::new(effect, duration_secs, intensity, now)?;
        if self.active.is_some() {
            log::debug!("storm already active; ignoring start");
            return Ok(());
        }
        log::info!(
            "storm started: effect {}, duration {:.1}s, intensity {:.1} events/sec",
            storm.effect,
            duration_secs,
            intensity
        );
        self.active = Some(storm);
        Ok(())
    }

    /// Release the events that fell due since the last poll, at random
    /// positions inside a `width × height` canvas.
    ///
    /// Ends the storm once its duration has elapsed.
    pub fn poll(&mut self, now: Instant, width: u32, height: u32) -> Vec<StormEvent> {
        let Some(storm) = self.active.as_mut() else {
            return Vec::new();
        };

        let due = (storm.due(now) as usize).min(MAX_EVENTS_PER_POLL);
        let effect = storm.effect;
        let mut events = Vec::with_capacity(due);
        for _ in 0..due {
            let position = Vec2::new(
                self.rng.gen::<f32>() * width as f32,
                self.rng.gen::<f32>() * height as f32,
            );
            events.push(StormEvent { position, effect });
        }
        // Skipped events past the per-poll cap are dropped, not deferred.
        storm.emitted += storm.due(now);

        if storm.is_over(now) {
            log::info!("storm ended after {} events", storm.emitted);
            self.active = None;
        }
        events
    }

    /// End the current storm, if any.
    pub fn stop(&mut self) {
        if self.active.take().is_some() {
            log::info!("storm stopped");
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&Storm> {
        self.active.as_ref()
    }

    /// Remaining time of the active storm, zero when idle.
    pub fn time_left(&self, now: Instant) -> Duration {
        self.active
            .as_ref()
            .map_or(Duration::ZERO, |storm| storm.time_left(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EffectKind;

    #[test]
    fn test_zero_intensity_rejected() {
        let mut storms = StormController::new();
        let now = Instant::now();
        assert_eq!(
            storms.start_with(ClickEffect::Random, 5.0, 0.0, now),
            Err(StormError::InvalidIntensity(0.0))
        );
        assert!(storms.start_with(ClickEffect::Random, 5.0, -2.0, now).is_err());
        assert!(storms.start_with(ClickEffect::Random, 5.0, f32::INFINITY, now).is_err());
        assert!(storms.start_with(ClickEffect::Random, 5.0, f32::NAN, now).is_err());
        assert!(!storms.is_active());
    }

    #[test]
    fn test_bad_duration_rejected() {
        let mut storms = StormController::new();
        let err = storms.start_with(ClickEffect::Random, -1.0, 4.0, Instant::now());
        assert_eq!(err, Err(StormError::InvalidDuration(-1.0)));
    }

    #[test]
    fn test_random_start_within_ranges() {
        for _ in 0..50 {
            let mut storms = StormController::new();
            let storm = storms.start(Instant::now()).unwrap().clone();
            let secs = storm.duration.as_secs_f32();
            assert!((3.0..11.0).contains(&secs));
            assert!((2.0..10.0).contains(&storm.intensity));
            assert_ne!(storm.effect, ClickEffect::Kind(EffectKind::Glitch));
        }
    }

    #[test]
    fn test_start_ignored_while_active() {
        let mut storms = StormController::new();
        let now = Instant::now();
        storms.start_with(ClickEffect::Kind(EffectKind::Star), 5.0, 4.0, now).unwrap();
        assert!(storms.start(now).is_none());
        assert_eq!(storms.active().unwrap().effect, ClickEffect::Kind(EffectKind::Star));
    }

    #[test]
    fn test_poll_emits_at_rate_and_ends() {
        let mut storms = StormController::new();
        let t0 = Instant::now();
        storms.start_with(ClickEffect::Kind(EffectKind::Crack), 2.0, 4.0, t0).unwrap();
        assert_eq!(storms.active().unwrap().period(), Duration::from_millis(250));

        assert!(storms.poll(t0 + Duration::from_millis(100), 800, 600).is_empty());
        let events = storms.poll(t0 + Duration::from_millis(1010), 800, 600);
        assert_eq!(events.len(), 4);
        for e in &events {
            assert_eq!(e.effect, ClickEffect::Kind(EffectKind::Crack));
            assert!((0.0..800.0).contains(&e.position.x));
            assert!((0.0..600.0).contains(&e.position.y));
        }
        assert!(storms.is_active());

        let tail = storms.poll(t0 + Duration::from_secs(5), 800, 600);
        assert_eq!(tail.len(), 4);
        assert!(!storms.is_active());
        assert_eq!(storms.time_left(t0 + Duration::from_secs(5)), Duration::ZERO);
    }

    #[test]
    fn test_poll_caps_burst() {
        let mut storms = StormController::new();
        let t0 = Instant::now();
        storms.start_with(ClickEffect::Random, 10.0, 1000.0, t0).unwrap();
        let events = storms.poll(t0 + Duration::from_secs(1), 100, 100);
        assert_eq!(events.len(), MAX_EVENTS_PER_POLL);
        assert!(storms.poll(t0 + Duration::from_secs(1), 100, 100).is_empty());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut storms = StormController::new();
        storms.start(Instant::now());
        storms.stop();
        storms.stop();
        assert!(!storms.is_active());
        assert!(storms.poll(Instant::now(), 10, 10).is_empty());
    }
}
