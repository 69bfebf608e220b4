//! Directional intent to player velocity

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Four independent direction flags, sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl MoveIntent {
    pub const NONE: Self = Self {
        left: false,
        right: false,
        up: false,
        down: false,
    };

    pub fn right() -> Self {
        Self {
            right: true,
            ..Self::NONE
        }
    }

    pub fn left() -> Self {
        Self {
            left: true,
            ..Self::NONE
        }
    }

    pub fn up() -> Self {
        Self {
            up: true,
            ..Self::NONE
        }
    }

    pub fn down() -> Self {
        Self {
            down: true,
            ..Self::NONE
        }
    }

    /// Per-axis direction in {-1, 0, 1}; opposing flags cancel. +y is down.
    pub fn axes(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| match (neg, pos) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Velocity for the player this tick
///
/// Each asserted axis gets the full `speed`, so diagonals run √2 faster
/// unless `normalize_diagonal` is set.
pub fn desired_velocity(intent: MoveIntent, speed: f32, normalize_diagonal: bool) -> Vec2 {
    let axes = intent.axes();
    if normalize_diagonal {
        axes.normalize_or_zero() * speed
    } else {
        axes * speed
    }
}
