//! Sound collaborator hooks.
//!
//! The engine reports four kinds of events to an optional [`SoundHooks`]
//! implementation. Every hook defaults to a no-op, so hosts only override
//! what they react to. Hooks must not fail; audio problems stay inside the
//! implementation.

use std::cell::RefCell;
use std::rc::Rc;

use crate::effects::EffectKind;

/// Callbacks fired by the engine.
pub trait SoundHooks {
    /// A click spawned a particle with this position and velocity.
    fn on_particle_create(&mut self, _x: f32, _y: f32, _vx: f32, _vy: f32) {}

    /// A particle died at this position.
    fn on_particle_destroy(&mut self, _x: f32, _y: f32) {}

    /// A click resolved to `kind` at this position.
    fn on_click_event(&mut self, _x: f32, _y: f32, _kind: EffectKind) {}

    /// Total population after a tick.
    fn on_particle_count_update(&mut self, _total: usize) {}
}

/// Shared hooks: the host keeps one handle, the engine owns the other.
impl<T: SoundHooks + ?Sized> SoundHooks for Rc<RefCell<T>> {
    fn on_particle_create(&mut self, x: f32, y: f32, vx: f32, vy: f32) {
        self.borrow_mut().on_particle_create(x, y, vx, vy);
    }

    fn on_particle_destroy(&mut self, x: f32, y: f32) {
        self.borrow_mut().on_particle_destroy(x, y);
    }

    fn on_click_event(&mut self, x: f32, y: f32, kind: EffectKind) {
        self.borrow_mut().on_click_event(x, y, kind);
    }

    fn on_particle_count_update(&mut self, total: usize) {
        self.borrow_mut().on_particle_count_update(total);
    }
}

/// Running counters over the hook stream.
///
/// Tracks the same density signal a drone voice follows: how much was
/// created, how much died, and the last reported total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleTally {
    pub created: u64,
    pub destroyed: u64,
    pub clicks: u64,
    pub last_kind: Option<EffectKind>,
    pub last_total: usize,
    pub peak_total: usize,
}

impl ParticleTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Particles created but not yet reported destroyed.
    pub fn outstanding(&self) -> u64 {
        self.created.saturating_sub(self.destroyed)
    }

    /// Last total relative to the peak, in `[0, 1]`.
    pub fn density(&self) -> f32 {
        if self.peak_total == 0 {
            0.0
        } else {
            self.last_total as f32 / self.peak_total as f32
        }
    }
}

impl SoundHooks for ParticleTally {
    fn on_particle_create(&mut self, _x: f32, _y: f32, _vx: f32, _vy: f32) {
        self.created += 1;
    }

    fn on_particle_destroy(&mut self, _x: f32, _y: f32) {
        self.destroyed += 1;
    }

    fn on_click_event(&mut self, _x: f32, _y: f32, kind: EffectKind) {
        self.clicks += 1;
        self.last_kind = Some(kind);
    }

    fn on_particle_count_update(&mut self, total: usize) {
        self.last_total = total;
        self.peak_total = self.peak_total.max(total);
    }
}
