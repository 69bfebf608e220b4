//! Game settings and tunables
//!
//! Every field has a default, so a partial settings file only overrides what
//! it names. Native builds read a JSON file; wasm builds use LocalStorage.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::level::{GridCell, LevelOptions, UnknownTilePolicy};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write settings {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tick rate must be at least 1 Hz")]
    ZeroTickRate,
    #[error("{field} must be positive")]
    NonPositive { field: &'static str },
}

/// Simulation tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Level ===
    /// Grid cell edge length (world units)
    pub cell_size: f32,
    /// Designated player spawn cell
    pub player_spawn_cell: GridCell,
    /// What to do with characters outside the legend
    pub unknown_tiles: UnknownTilePolicy,
    /// Level file to load instead of the built-in layout
    pub level_path: Option<PathBuf>,

    // === Timing ===
    /// Movement ticks per second
    pub tick_rate_hz: u32,
    /// Cap on ticks run per frame
    pub max_substeps: u32,
    /// Trigger gate sampling period (milliseconds)
    pub gate_period_ms: u64,

    // === Player ===
    pub player_speed: f32,
    pub player_size: Vec2,
    /// Diagonals are √2 faster unless this is set
    pub normalize_diagonal: bool,

    // === Entities ===
    pub enemy_velocity: Vec2,
    pub enemy_size: Vec2,
    pub collectible_size: Vec2,

    // === Trigger ===
    pub trigger_point: Vec2,
    pub trigger_radius: f32,

    // === Notes ===
    /// Note store document (native only)
    pub notes_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cell_size: CELL_SIZE,
            player_spawn_cell: GridCell::new(1, 1),
            unknown_tiles: UnknownTilePolicy::Solid,
            level_path: None,

            tick_rate_hz: 60,
            max_substeps: MAX_SUBSTEPS,
            gate_period_ms: GATE_SAMPLE_PERIOD_MS,

            player_speed: PLAYER_SPEED,
            player_size: PLAYER_SIZE,
            normalize_diagonal: false,

            enemy_velocity: ENEMY_START_VELOCITY,
            enemy_size: ENEMY_SIZE,
            collectible_size: COLLECTIBLE_SIZE,

            trigger_point: TRIGGER_POINT,
            trigger_radius: TRIGGER_RADIUS,

            notes_path: PathBuf::from("rocket_notes.json"),
        }
    }
}

impl Settings {
    /// Settings file looked up in the working directory
    pub const FILE_NAME: &'static str = "rocket_notes.settings.json";

    /// Fixed movement timestep (seconds)
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.tick_rate_hz.max(1) as f32
    }

    /// Parameters the level loader needs
    pub fn level_options(&self) -> LevelOptions {
        LevelOptions {
            cell_size: self.cell_size,
            player_spawn: self.player_spawn_cell,
            unknown_tiles: self.unknown_tiles,
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tick_rate_hz == 0 {
            return Err(SettingsError::ZeroTickRate);
        }
        let sizes = [
            ("player_size", self.player_size),
            ("enemy_size", self.enemy_size),
            ("collectible_size", self.collectible_size),
        ];
        for (field, size) in sizes {
            // Written so NaN fails too
            if !(size.min_element() > 0.0) {
                return Err(SettingsError::NonPositive { field });
            }
        }
        if !(self.trigger_radius > 0.0) {
            return Err(SettingsError::NonPositive {
                field: "trigger_radius",
            });
        }
        Ok(())
    }

    /// Parse settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Write settings to a JSON file
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "rocket_notes_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load `FILE_NAME` from the working directory, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let path = Path::new(Self::FILE_NAME);
        if !path.exists() {
            log::info!("No {} found, using default settings", Self::FILE_NAME);
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        match self.save_to(Path::new(Self::FILE_NAME)) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("{}", e),
        }
    }
}
