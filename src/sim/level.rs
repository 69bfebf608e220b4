//! Level loader
//!
//! ## Format
//! An ordered list of equal-length rows, one character per cell:
//!
//! ```text
//!   '#' = Wall
//!   '.' = Floor (spawns one collectible)
//!   'E' = Enemy spawn (also floor)
//! ```
//!
//! Any other character is handled by [`UnknownTilePolicy`]. There is no
//! player-spawn character: the spawn is a designated floor cell passed in
//! through [`LevelOptions`].
//!
//! Cell `(col, row)` maps to the world-space centre
//! `(col * cell + cell / 2, row * cell + cell / 2)`.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::aabb::Aabb;
use crate::consts::CELL_SIZE;

/// Built-in 9x11 layout
pub const DEFAULT_LAYOUT: [&str; 9] = [
    "###########",
    "#.........#",
    "#.#####...#",
    "#...#.....#",
    "#...#..E..#",
    "#...#.....#",
    "#...#####.#",
    "#.........#",
    "###########",
];

/// What a grid cell is. Immutable after load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Floor,
    EnemySpawn,
}

impl Cell {
    /// Can actors stand here?
    pub fn is_walkable(self) -> bool {
        !matches!(self, Cell::Wall)
    }
}

/// What to do with characters outside the legend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownTilePolicy {
    /// Treat as an impassable wall cell
    #[default]
    Solid,
    /// Fail the load
    Reject,
}

/// A grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub col: usize,
    pub row: usize,
}

impl GridCell {
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

/// Parameters that are not part of the character grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelOptions {
    pub cell_size: f32,
    pub player_spawn: GridCell,
    pub unknown_tiles: UnknownTilePolicy,
}

impl Default for LevelOptions {
    fn default() -> Self {
        Self {
            cell_size: CELL_SIZE,
            player_spawn: GridCell::new(1, 1),
            unknown_tiles: UnknownTilePolicy::Solid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LevelError {
    #[error("level has no rows")]
    Empty,
    #[error("cell size must be positive, got {0}")]
    InvalidCellSize(f32),
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown tile {ch:?} at row {row}, col {col}")]
    UnknownTile { row: usize, col: usize, ch: char },
    #[error("player spawn ({col}, {row}) is outside the {cols}x{rows} grid")]
    SpawnOutOfGrid {
        col: usize,
        row: usize,
        cols: usize,
        rows: usize,
    },
    #[error("player spawn ({col}, {row}) is not a walkable cell")]
    SpawnNotWalkable { col: usize, row: usize },
}

/// A parsed level: static geometry plus spawn lists
#[derive(Debug, Clone)]
pub struct Level {
    pub cols: usize,
    pub rows: usize,
    pub cell_size: f32,
    /// Row-major cell grid
    cells: Vec<Cell>,
    /// One box per wall cell, row-major
    pub walls: Vec<Aabb>,
    /// Centres of floor cells (one collectible each), row-major
    pub collectible_spawns: Vec<Vec2>,
    /// Centres of enemy spawn cells, row-major
    pub enemy_spawns: Vec<Vec2>,
    pub player_spawn: Vec2,
    pub bounds: Aabb,
}

impl Level {
    /// Parse a level from rows of characters
    pub fn parse<S: AsRef<str>>(rows: &[S], options: &LevelOptions) -> Result<Self, LevelError> {
        if !(options.cell_size > 0.0) {
            return Err(LevelError::InvalidCellSize(options.cell_size));
        }
        let Some(first) = rows.first() else {
            return Err(LevelError::Empty);
        };
        let cols = first.as_ref().chars().count();
        if cols == 0 {
            return Err(LevelError::Empty);
        }

        let cell = options.cell_size;
        let cell_box = Vec2::splat(cell);
        let mut cells = Vec::with_capacity(cols * rows.len());
        let mut walls = Vec::new();
        let mut collectible_spawns = Vec::new();
        let mut enemy_spawns = Vec::new();

        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != cols {
                return Err(LevelError::RaggedRow {
                    row,
                    expected: cols,
                    found,
                });
            }

            for (col, ch) in line.chars().enumerate() {
                let center = cell_center(col, row, cell);
                let kind = match ch {
                    '#' => Cell::Wall,
                    '.' => Cell::Floor,
                    'E' => Cell::EnemySpawn,
                    other => match options.unknown_tiles {
                        UnknownTilePolicy::Solid => {
                            log::debug!("unknown tile {:?} at ({}, {}) treated as wall", other, col, row);
                            Cell::Wall
                        }
                        UnknownTilePolicy::Reject => {
                            return Err(LevelError::UnknownTile { row, col, ch: other });
                        }
                    },
                };

                match kind {
                    Cell::Wall => walls.push(Aabb::new(center, cell_box)),
                    Cell::Floor => collectible_spawns.push(center),
                    Cell::EnemySpawn => enemy_spawns.push(center),
                }
                cells.push(kind);
            }
        }

        let row_count = rows.len();
        let spawn = options.player_spawn;
        if spawn.col >= cols || spawn.row >= row_count {
            return Err(LevelError::SpawnOutOfGrid {
                col: spawn.col,
                row: spawn.row,
                cols,
                rows: row_count,
            });
        }
        if !cells[spawn.row * cols + spawn.col].is_walkable() {
            return Err(LevelError::SpawnNotWalkable {
                col: spawn.col,
                row: spawn.row,
            });
        }

        let bounds = Aabb::from_min_max(
            Vec2::ZERO,
            Vec2::new(cols as f32 * cell, row_count as f32 * cell),
        );

        log::info!(
            "Loaded {}x{} level: {} walls, {} collectibles, {} enemies",
            cols,
            row_count,
            walls.len(),
            collectible_spawns.len(),
            enemy_spawns.len()
        );

        Ok(Self {
            cols,
            rows: row_count,
            cell_size: cell,
            cells,
            walls,
            collectible_spawns,
            enemy_spawns,
            player_spawn: cell_center(spawn.col, spawn.row, cell),
            bounds,
        })
    }

    /// Parse newline-separated level text. Blank lines are skipped.
    ///
    /// Only the line terminator (`\n` or `\r\n`) is stripped; any other
    /// trailing character is a tile.
    pub fn parse_str(text: &str, options: &LevelOptions) -> Result<Self, LevelError> {
        let rows: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();
        Self::parse(&rows, options)
    }

    /// The built-in layout
    pub fn default_layout(options: &LevelOptions) -> Result<Self, LevelError> {
        Self::parse(&DEFAULT_LAYOUT, options)
    }

    /// Cell at a grid coordinate, if inside the grid
    pub fn cell_at(&self, col: usize, row: usize) -> Option<Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get(row * self.cols + col).copied()
    }

    /// World-space centre of a grid cell
    pub fn cell_center(&self, col: usize, row: usize) -> Vec2 {
        cell_center(col, row, self.cell_size)
    }
}

#[inline]
fn cell_center(col: usize, row: usize, cell: f32) -> Vec2 {
    Vec2::new(
        col as f32 * cell + cell / 2.0,
        row as f32 * cell + cell / 2.0,
    )
}
