//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Fixed timestep only
//! - Stable iteration order (by entity ID)
//! - No rendering, input capture, or storage dependencies

pub mod aabb;
pub mod collision;
pub mod gate;
pub mod level;
pub mod movement;
pub mod runner;
pub mod state;
pub mod tick;

pub use aabb::Aabb;
pub use collision::{Motion, SpatialWorld, WallResponse};
pub use gate::{GateHandle, GateQuery, GateState, TriggerGate, TriggerZone};
pub use level::{Cell, DEFAULT_LAYOUT, GridCell, Level, LevelError, LevelOptions, UnknownTilePolicy};
pub use movement::{MoveIntent, desired_velocity};
pub use runner::Runner;
pub use state::{Collectible, Enemy, EntityRegistry, GameEvent, GameState, Player};
pub use tick::{TickInput, tick};
