//! Frame driver
//!
//! Turns variable frame deltas into fixed simulation ticks (accumulator with
//! a substep cap) and runs the trigger gate on its own slower clock. Both
//! cadences run on the caller's thread, one after the other, so they never
//! interleave.

use std::time::Duration;

use super::gate::{GateHandle, GateQuery, GateState, TriggerGate, TriggerZone};
use super::level::Level;
use super::state::{GameEvent, GameState};
use super::tick::{TickInput, tick};
use crate::consts::MAX_FRAME_DT;
use crate::settings::Settings;

/// Owns one play session
#[derive(Debug)]
pub struct Runner {
    state: GameState,
    gate: TriggerGate,
    tick_dt: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl Runner {
    pub fn new(level: &Level, settings: &Settings) -> Self {
        let zone = TriggerZone {
            point: settings.trigger_point,
            radius: settings.trigger_radius,
        };
        Self {
            state: GameState::new(level, settings),
            gate: TriggerGate::new(zone, Duration::from_millis(settings.gate_period_ms)),
            tick_dt: settings.tick_dt(),
            max_substeps: settings.max_substeps.max(1),
            accumulator: 0.0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Read side of the trigger gate for UI code
    pub fn gate(&self) -> GateHandle {
        self.gate.handle()
    }

    pub fn is_gate_open(&self) -> bool {
        self.gate.is_open()
    }

    pub fn tick_dt(&self) -> f32 {
        self.tick_dt
    }

    /// Run as many fixed ticks as `frame_dt` covers
    ///
    /// After every tick the gate clock advances by the same amount, so each
    /// gate sample sees the player exactly where that tick left it.
    pub fn frame(&mut self, frame_dt: f32, input: &TickInput) -> Vec<GameEvent> {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= self.tick_dt && substeps < self.max_substeps {
            events.extend(self.step(input));
            self.accumulator -= self.tick_dt;
            substeps += 1;
        }

        if substeps == self.max_substeps && self.accumulator >= self.tick_dt {
            log::warn!(
                "Dropping {:.1} ms of simulation time after {} substeps",
                self.accumulator * 1000.0,
                substeps
            );
            self.accumulator = 0.0;
        }

        events
    }

    /// One fixed tick plus its share of gate time
    pub fn step(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let mut events = tick(&mut self.state, input, self.tick_dt);
        if let Some(state) = self.gate.advance(self.tick_dt, self.state.player.pos) {
            let open = state == GateState::Open;
            log::info!("Trigger gate {}", if open { "opened" } else { "closed" });
            events.push(GameEvent::GateChanged { open });
        }
        events
    }
}
