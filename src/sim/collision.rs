//! Collision detection and response for the tile world
//!
//! Every collider is an AABB. Static walls never move; actors are pushed out
//! of them along the axis of least penetration. Movement is split into
//! sub-steps no longer than half the actor's smallest extent so a fast actor
//! cannot skip over a wall in one step.

use glam::Vec2;

use super::aabb::Aabb;
use super::state::{Enemy, Player};
use crate::consts::{MAX_RESOLVE_ITERATIONS, MIN_SUBSTEP};

/// How an actor's velocity responds to a wall or bound contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallResponse {
    /// Zero the velocity component pushing into the surface
    Stop,
    /// Negate the velocity component pushing into the surface
    Reflect,
}

/// Resolved position and velocity after a movement step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub pos: Vec2,
    pub vel: Vec2,
    /// True if any wall or bound was touched
    pub hit: bool,
}

/// Static collision geometry: wall boxes plus the world bounds
#[derive(Debug, Clone)]
pub struct SpatialWorld {
    walls: Vec<Aabb>,
    bounds: Aabb,
}

impl SpatialWorld {
    pub fn new(walls: Vec<Aabb>, bounds: Aabb) -> Self {
        Self { walls, bounds }
    }

    /// True if `aabb` overlaps any wall
    pub fn overlaps_wall(&self, aabb: &Aabb) -> bool {
        self.walls.iter().any(|w| aabb.overlaps(w))
    }

    /// True if `aabb` lies inside the world bounds
    pub fn within_bounds(&self, aabb: &Aabb) -> bool {
        let min = aabb.min();
        let max = aabb.max();
        let b_min = self.bounds.min();
        let b_max = self.bounds.max();
        min.x >= b_min.x && min.y >= b_min.y && max.x <= b_max.x && max.y <= b_max.y
    }

    /// Move the player by `desired_velocity * dt` and resolve walls and bounds
    ///
    /// Any velocity component blocked by a wall or bound comes back zeroed.
    pub fn resolve_player_movement(&self, player: &Player, desired_velocity: Vec2, dt: f32) -> Motion {
        self.integrate(player.aabb(), desired_velocity, dt, WallResponse::Stop)
    }

    /// Move an enemy by its velocity and bounce it off walls and bounds
    ///
    /// Reflection only flips signs, so speed is preserved exactly.
    pub fn resolve_enemy_movement(&self, enemy: &Enemy, dt: f32) -> Motion {
        self.integrate(enemy.aabb(), enemy.vel, dt, WallResponse::Reflect)
    }

    fn integrate(&self, body: Aabb, vel: Vec2, dt: f32, response: WallResponse) -> Motion {
        let mut pos = body.center;
        let mut vel = vel;
        let mut hit = false;

        let steps = substep_count(&body, (vel * dt).abs().max_element());
        let sub_dt = dt / steps as f32;

        for _ in 0..steps {
            let prev = pos;
            pos += vel * sub_dt;
            match self.push_out(body.at(pos), &mut vel, response) {
                Some((resolved, touched)) => {
                    pos = resolved;
                    hit |= touched;
                }
                None => {
                    // Could not separate within the iteration cap; keep the last valid spot
                    log::debug!("unresolved overlap at {:?}, reverting step", pos);
                    pos = prev;
                    hit = true;
                    break;
                }
            }
        }

        Motion { pos, vel, hit }
    }

    /// Push `body` out of every wall and back inside bounds
    ///
    /// Deepest overlap is resolved first so an actor sliding along a row of
    /// wall cells does not snag on the seams between them.
    /// Returns `None` if overlap remains after `MAX_RESOLVE_ITERATIONS`.
    fn push_out(&self, mut body: Aabb, vel: &mut Vec2, response: WallResponse) -> Option<(Vec2, bool)> {
        let mut touched = false;

        for _ in 0..MAX_RESOLVE_ITERATIONS {
            let clamped = body.clamp_center_within(&self.bounds);
            if clamped != body.center {
                apply_response(vel, axis_signs(clamped - body.center), response);
                body.center = clamped;
                touched = true;
            }

            let deepest = self
                .walls
                .iter()
                .filter_map(|w| {
                    body.minimum_translation(w).map(|mtv| {
                        let o = body.overlap(w);
                        (o.x * o.y, mtv)
                    })
                })
                .max_by(|a, b| a.0.total_cmp(&b.0));

            match deepest {
                Some((_, mtv)) => {
                    apply_response(vel, axis_signs(mtv), response);
                    body.center += mtv;
                    touched = true;
                }
                None => {
                    if self.within_bounds(&body) {
                        return Some((body.center, touched));
                    }
                }
            }
        }

        if !self.overlaps_wall(&body) && self.within_bounds(&body) {
            Some((body.center, touched))
        } else {
            None
        }
    }

    /// Separate two overlapping enemies and exchange their velocity
    /// components along the collision axis (equal-mass elastic collision)
    ///
    /// Returns true if the pair was in contact.
    pub fn resolve_enemy_enemy_collision(&self, a: &mut Enemy, b: &mut Enemy) -> bool {
        let Some(mtv) = a.aabb().minimum_translation(&b.aabb()) else {
            return false;
        };

        let (a_prev, b_prev) = (a.pos, b.pos);
        a.pos += mtv * 0.5;
        b.pos -= mtv * 0.5;

        if mtv.x != 0.0 {
            std::mem::swap(&mut a.vel.x, &mut b.vel.x);
        } else {
            std::mem::swap(&mut a.vel.y, &mut b.vel.y);
        }

        // Separation must not undo the wall resolution from this tick. An
        // enemy held back by a wall hands the rest of the push to the other.
        let a_shift = self.settle_enemy(a, a_prev);
        let b_shift = self.settle_enemy(b, b_prev);
        if b_shift == Vec2::ZERO && a_shift != Vec2::ZERO {
            b.pos += a_shift;
            self.settle_enemy(b, b_prev);
        } else if a_shift == Vec2::ZERO && b_shift != Vec2::ZERO {
            a.pos += b_shift;
            self.settle_enemy(a, a_prev);
        }

        log::trace!("enemies {} and {} collided", a.id, b.id);
        true
    }

    /// Push an enemy back out of walls and bounds, reflecting its velocity.
    /// Falls back to `fallback` if the overlap cannot be resolved.
    /// Returns how far the enemy moved.
    fn settle_enemy(&self, enemy: &mut Enemy, fallback: Vec2) -> Vec2 {
        let before = enemy.pos;
        let mut vel = enemy.vel;
        match self.push_out(enemy.aabb(), &mut vel, WallResponse::Reflect) {
            Some((pos, _)) => {
                enemy.pos = pos;
                enemy.vel = vel;
            }
            None => enemy.pos = fallback,
        }
        enemy.pos - before
    }
}

/// Sub-steps needed so no single step moves further than half the body's
/// smallest extent (but never shorter than `MIN_SUBSTEP`)
#[inline]
fn substep_count(body: &Aabb, travel: f32) -> u32 {
    let max_step = body.half.min_element().max(MIN_SUBSTEP);
    (travel / max_step).ceil().max(1.0) as u32
}

/// Per-component sign, with zero staying zero
#[inline]
fn axis_signs(d: Vec2) -> Vec2 {
    let sign = |v: f32| {
        if v > 0.0 {
            1.0
        } else if v < 0.0 {
            -1.0
        } else {
            0.0
        }
    };
    Vec2::new(sign(d.x), sign(d.y))
}

/// `normal` is a unit axis vector (or zero) pointing away from the surface
#[inline]
fn apply_response(vel: &mut Vec2, normal: Vec2, response: WallResponse) {
    if normal.x != 0.0 && vel.x * normal.x < 0.0 {
        vel.x = match response {
            WallResponse::Stop => 0.0,
            WallResponse::Reflect => -vel.x,
        };
    }
    if normal.y != 0.0 && vel.y * normal.y < 0.0 {
        vel.y = match response {
            WallResponse::Stop => 0.0,
            WallResponse::Reflect => -vel.y,
        };
    }
}
