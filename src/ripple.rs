//! Pointer ripples.
//!
//! Moving the pointer leaves a trail of expanding glyph rings. New rings are
//! throttled by distance and time since the last recorded position, and the
//! trail is capped; the oldest ring goes first.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use glam::Vec2;

/// An expanding ring anchored at a recorded pointer position.
#[derive(Debug, Clone, PartialEq)]
pub struct Ripple {
    pub center: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    pub life: i32,
    pub max_life: i32,
}

impl Ripple {
    /// A fresh ring sized for the given ripple intensity.
    pub fn new(center: Vec2, intensity: f32) -> Self {
        let life = (50.0 + intensity * 10.0).round() as i32;
        Self {
            center,
            radius: 0.0,
            max_radius: 150.0 + intensity * 50.0,
            life,
            max_life: life,
        }
    }

    /// Age one tick and grow by `2 * intensity` pixels.
    ///
    /// Negative intensities do not shrink the ring.
    pub fn advance(&mut self, intensity: f32) {
        self.life -= 1;
        self.radius += 2.0 * intensity.max(0.0);
    }

    pub fn is_expired(&self) -> bool {
        self.life <= 0 || self.radius > self.max_radius
    }

    /// Opacity from remaining life, optionally faded further by radius.
    pub fn alpha(&self, fade_from_center: bool) -> f32 {
        if self.max_life <= 0 {
            return 0.0;
        }
        let time_alpha = self.life as f32 / self.max_life as f32;
        let alpha = if fade_from_center && self.max_radius > 0.0 {
            time_alpha * (1.0 - self.radius / self.max_radius)
        } else {
            time_alpha
        };
        alpha.clamp(0.0, 1.0)
    }
}

/// Minimum pointer travel before a new ring is emitted.
pub fn throttle_distance(intensity: f32) -> f32 {
    (30.0 - intensity * 5.0).max(10.0)
}

/// Minimum time between rings when the pointer barely moves.
pub fn throttle_time(intensity: f32) -> Duration {
    let millis = (100.0 - intensity * 20.0).max(20.0);
    Duration::from_micros((millis * 1000.0).round() as u64)
}

#[derive(Debug, Clone, Copy)]
struct PointerMark {
    position: Vec2,
    at: Instant,
}

/// The live set of ripples plus the pointer throttle state.
#[derive(Debug, Default)]
pub struct RippleTrail {
    ripples: VecDeque<Ripple>,
    last_mark: Option<PointerMark>,
}

impl RippleTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer position and maybe emit a ring.
    ///
    /// The first call only records. Later calls emit when the pointer moved
    /// farther than [`throttle_distance`] or longer than [`throttle_time`]
    /// passed since the last recorded mark. The trail is then trimmed to
    /// `max_count`, oldest first. Returns whether a ring was added.
    pub fn pointer_moved(
        &mut self,
        position: Vec2,
        now: Instant,
        intensity: f32,
        max_count: usize,
    ) -> bool {
        let emitted = match self.last_mark {
            None => {
                self.last_mark = Some(PointerMark { position, at: now });
                false
            }
            Some(mark) => {
                let distance = position.distance(mark.position);
                let elapsed = now.saturating_duration_since(mark.at);
                if distance > throttle_distance(intensity) || elapsed > throttle_time(intensity) {
                    self.ripples.push_back(Ripple::new(position, intensity));
                    self.last_mark = Some(PointerMark { position, at: now });
                    true
                } else {
                    false
                }
            }
        };
        self.enforce_cap(max_count);
        emitted
    }

    /// Drop the oldest rings until at most `max_count` remain.
    pub fn enforce_cap(&mut self, max_count: usize) {
        while self.ripples.len() > max_count {
            self.ripples.pop_front();
        }
    }

    /// Age and grow every ring by one tick.
    pub fn advance(&mut self, intensity: f32) {
        for ripple in &mut self.ripples {
            ripple.advance(intensity);
        }
    }

    /// Remove expired rings. Returns how many were dropped.
    pub fn prune(&mut self) -> usize {
        let before = self.ripples.len();
        self.ripples.retain(|r| !r.is_expired());
        before - self.ripples.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ripple> {
        self.ripples.iter()
    }

    pub fn len(&self) -> usize {
        self.ripples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ripples.is_empty()
    }

    pub fn clear(&mut self) {
        self.ripples.clear();
        self.last_mark = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttle_values() {
        assert_eq!(throttle_distance(1.0), 25.0);
        assert_eq!(throttle_distance(10.0), 10.0);
        assert_eq!(throttle_time(1.0), Duration::from_millis(80));
        assert_eq!(throttle_time(5.0), Duration::from_millis(20));
    }

    #[test]
    fn test_new_ripple_dimensions() {
        let r = Ripple::new(Vec2::new(5.0, 5.0), 1.0);
        assert_eq!(r.radius, 0.0);
        assert_eq!(r.max_radius, 200.0);
        assert_eq!(r.life, 60);
        assert_eq!(r.max_life, 60);
    }

    #[test]
    fn test_first_move_only_records() {
        let mut trail = RippleTrail::new();
        let t0 = Instant::now();
        assert!(!trail.pointer_moved(Vec2::ZERO, t0, 1.0, 50));
        assert!(trail.is_empty());
    }

    #[test]
    fn test_distance_throttle() {
        let mut trail = RippleTrail::new();
        let t0 = Instant::now();
        trail.pointer_moved(Vec2::new(100.0, 100.0), t0, 1.0, 50);

        let t1 = t0 + Duration::from_millis(5);
        assert!(!trail.pointer_moved(Vec2::new(105.0, 100.0), t1, 1.0, 50));
        assert_eq!(trail.len(), 0);

        let t2 = t0 + Duration::from_millis(10);
        assert!(trail.pointer_moved(Vec2::new(140.0, 100.0), t2, 1.0, 50));
        assert_eq!(trail.len(), 1);
    }

    #[test]
    fn test_time_throttle() {
        let mut trail = RippleTrail::new();
        let t0 = Instant::now();
        trail.pointer_moved(Vec2::ZERO, t0, 1.0, 50);
        assert!(trail.pointer_moved(Vec2::new(1.0, 0.0), t0 + Duration::from_millis(81), 1.0, 50));
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut trail = RippleTrail::new();
        let t0 = Instant::now();
        trail.pointer_moved(Vec2::ZERO, t0, 1.0, 3);
        for i in 1..=10 {
            let pos = Vec2::new(i as f32 * 100.0, 0.0);
            trail.pointer_moved(pos, t0 + Duration::from_millis(i), 1.0, 3);
            assert!(trail.len() <= 3);
        }
        let centers: Vec<f32> = trail.iter().map(|r| r.center.x).collect();
        assert_eq!(centers, vec![800.0, 900.0, 1000.0]);
    }

    #[test]
    fn test_lowered_cap_trims_fully() {
        let mut trail = RippleTrail::new();
        let t0 = Instant::now();
        trail.pointer_moved(Vec2::ZERO, t0, 1.0, 50);
        for i in 1..=10 {
            trail.pointer_moved(Vec2::new(i as f32 * 100.0, 0.0), t0, 1.0, 50);
        }
        assert_eq!(trail.len(), 10);
        trail.pointer_moved(Vec2::new(5000.0, 0.0), t0, 1.0, 2);
        assert_eq!(trail.len(), 2);
    }

    #[test]
    fn test_advance_and_prune() {
        let mut trail = RippleTrail::new();
        let t0 = Instant::now();
        trail.pointer_moved(Vec2::ZERO, t0, 1.0, 50);
        trail.pointer_moved(Vec2::new(100.0, 0.0), t0, 1.0, 50);

        let mut last_radius = 0.0;
        let mut ticks = 0;
        while !trail.is_empty() {
            trail.advance(1.0);
            if let Some(r) = trail.iter().next() {
                assert!(r.radius >= last_radius);
                last_radius = r.radius;
            }
            trail.prune();
            ticks += 1;
            assert!(ticks <= 60);
        }
        assert_eq!(ticks, 60);
    }

    #[test]
    fn test_fade_from_center_alpha() {
        let mut r = Ripple::new(Vec2::ZERO, 1.0);
        r.radius = 100.0;
        assert!((r.alpha(false) - 1.0).abs() < 1e-6);
        assert!((r.alpha(true) - 0.5).abs() < 1e-6);
    }
}
