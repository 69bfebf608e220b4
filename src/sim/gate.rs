//! Proximity trigger gate
//!
//! The gate samples the player's distance to a fixed trigger point on its own
//! clock, independent of the movement tick. Between samples the value is
//! stale by up to one period; that is expected.
//!
//! The sampling side is the only writer. Readers hold a [`GateHandle`], which
//! is a cheap clone over an atomic flag, so a UI on another thread never sees
//! a half-written state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Anything that can answer "may the notes open right now?"
pub trait GateQuery {
    fn is_open(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GateState {
    #[default]
    Closed,
    Open,
}

/// Fixed trigger point plus activation radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerZone {
    pub point: Vec2,
    pub radius: f32,
}

impl TriggerZone {
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.distance(self.point) < self.radius
    }
}

/// Read-only view of the gate for UI code
#[derive(Debug, Clone)]
pub struct GateHandle {
    open: Arc<AtomicBool>,
}

impl GateQuery for GateHandle {
    fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }
}

/// Sampling side of the gate
#[derive(Debug)]
pub struct TriggerGate {
    zone: TriggerZone,
    period: f32,
    elapsed: f32,
    state: GateState,
    shared: Arc<AtomicBool>,
}

impl TriggerGate {
    /// Starts `Closed`; the first sample happens one period in
    pub fn new(zone: TriggerZone, period: Duration) -> Self {
        Self {
            zone,
            period: period.as_secs_f32().max(f32::EPSILON),
            elapsed: 0.0,
            state: GateState::Closed,
            shared: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn handle(&self) -> GateHandle {
        GateHandle {
            open: Arc::clone(&self.shared),
        }
    }

    /// Take one sample now
    ///
    /// Returns the new state if it changed.
    pub fn sample(&mut self, player_pos: Vec2) -> Option<GateState> {
        let next = if self.zone.contains(player_pos) {
            GateState::Open
        } else {
            GateState::Closed
        };
        self.shared.store(next == GateState::Open, Ordering::Release);
        if next != self.state {
            self.state = next;
            log::debug!(
                "gate {:?} at distance {:.1}",
                next,
                player_pos.distance(self.zone.point)
            );
            Some(next)
        } else {
            None
        }
    }

    /// Advance the gate clock by `dt` seconds, sampling at each elapsed period
    ///
    /// `player_pos` is the position at the end of `dt`; every sample in this
    /// call sees it. Returns the last state change, if any.
    pub fn advance(&mut self, dt: f32, player_pos: Vec2) -> Option<GateState> {
        self.elapsed += dt.max(0.0);
        let mut changed = None;
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
            if let Some(state) = self.sample(player_pos) {
                changed = Some(state);
            }
        }
        changed
    }
}

impl GateQuery for TriggerGate {
    fn is_open(&self) -> bool {
        self.state == GateState::Open
    }
}
