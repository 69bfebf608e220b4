//! Rocket Notes - a tile-grid rocket sim with a gated notes store
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (level, collisions, enemies, trigger gate)
//! - `notes`: Gate-checked access flow for the notes overlay
//! - `persistence`: Password-protected note storage backends
//! - `platform`: Browser/native platform abstraction
//! - `settings`: Data-driven tunables

pub mod notes;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use notes::{NotesError, NotesOverlay, OverlayView};
pub use persistence::{MemoryNoteStore, NoteStore, NoteStoreError};
pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (60 Hz movement tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Grid cell edge length in world units
    pub const CELL_SIZE: f32 = 48.0;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 160.0;
    pub const PLAYER_SIZE: Vec2 = Vec2::new(40.0, 24.0);

    /// Enemy defaults - every enemy starts on the same diagonal
    pub const ENEMY_START_VELOCITY: Vec2 = Vec2::new(50.0, 50.0);
    pub const ENEMY_SIZE: Vec2 = Vec2::new(42.0, 42.0);

    /// Collectible box (one per floor cell)
    pub const COLLECTIBLE_SIZE: Vec2 = Vec2::new(36.0, 36.0);

    /// Trigger zone: bottom-right floor cell of the built-in layout
    pub const TRIGGER_POINT: Vec2 = Vec2::new(456.0, 360.0);
    pub const TRIGGER_RADIUS: f32 = 80.0;
    /// Gate sampling period (milliseconds), independent of SIM_DT
    pub const GATE_SAMPLE_PERIOD_MS: u64 = 200;

    /// Push-out passes per movement step before giving up on the step
    pub const MAX_RESOLVE_ITERATIONS: u32 = 8;
    /// Penetration below this is treated as touching, not overlapping
    pub const CONTACT_EPSILON: f32 = 1.0e-3;
    /// Floor on the movement sub-step length (world units)
    pub const MIN_SUBSTEP: f32 = 0.5;

    /// Shortest accepted notes password (characters)
    pub const MIN_PASSWORD_LEN: usize = 3;
}
