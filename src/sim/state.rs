//! Game state and core simulation types
//!
//! One `GameState` owns everything the tick touches: static geometry, the
//! player, and the entity registry. Nothing lives in module-level statics.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::collision::SpatialWorld;
use super::level::Level;
use crate::settings::Settings;

/// Something that happened during a tick, for adapters (sound, effects, logs)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player picked up a collectible
    CollectiblePicked { id: u32 },
    /// Player touched an enemy and was sent back to spawn
    PlayerReset,
    /// Enemy bounced off a wall, a bound, or another enemy
    EnemyBounced { id: u32 },
    /// Trigger gate changed state at a sample instant
    GateChanged { open: bool },
}

/// The player-controlled rocket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Box centre
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Where resets send the player. Fixed for the session.
    spawn: Vec2,
}

impl Player {
    pub fn new(spawn: Vec2, size: Vec2) -> Self {
        Self {
            pos: spawn,
            vel: Vec2::ZERO,
            size,
            spawn,
        }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    /// Back to spawn, velocity zeroed
    pub fn reset_to_spawn(&mut self) {
        self.pos = self.spawn;
        self.vel = Vec2::ZERO;
    }
}

/// A bouncing enemy. Never destroyed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl Enemy {
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// A pickup sitting on a floor cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub alive: bool,
}

impl Collectible {
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Live collectibles and enemies
///
/// Both lists stay sorted by id. Consumed collectibles are removed and never
/// come back, so a collectible can be reported at most once per session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityRegistry {
    pub collectibles: Vec<Collectible>,
    pub enemies: Vec<Enemy>,
    consumed: u32,
}

impl EntityRegistry {
    /// Consume every live collectible overlapping `player`
    ///
    /// Returns the ids consumed this call, in id order (possibly empty).
    pub fn check_collectible_pickup(&mut self, player: &Aabb) -> Vec<u32> {
        let mut picked = Vec::new();
        self.collectibles.retain_mut(|c| {
            if c.alive && c.aabb().overlaps(player) {
                c.alive = false;
                picked.push(c.id);
                false
            } else {
                true
            }
        });
        self.consumed += picked.len() as u32;
        picked
    }

    /// True if `player` overlaps any enemy
    pub fn check_enemy_contact(&self, player: &Aabb) -> bool {
        self.enemies.iter().any(|e| e.aabb().overlaps(player))
    }

    /// Total collectibles consumed this session. Never decreases.
    pub fn consumed_count(&self) -> u32 {
        self.consumed
    }

    pub fn remaining_collectibles(&self) -> usize {
        self.collectibles.len()
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub world: SpatialWorld,
    pub player: Player,
    pub registry: EntityRegistry,
    /// Player speed (world units per second)
    pub player_speed: f32,
    /// Scale diagonal input down to axis speed
    pub normalize_diagonal: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Build a session from a parsed level
    ///
    /// Ids are handed out collectibles first, then enemies, each in
    /// row-major grid order.
    pub fn new(level: &Level, settings: &Settings) -> Self {
        let mut state = Self {
            world: SpatialWorld::new(level.walls.clone(), level.bounds),
            player: Player::new(level.player_spawn, settings.player_size),
            registry: EntityRegistry::default(),
            player_speed: settings.player_speed,
            normalize_diagonal: settings.normalize_diagonal,
            time_ticks: 0,
            next_id: 1,
        };

        for &pos in &level.collectible_spawns {
            let id = state.next_entity_id();
            state.registry.collectibles.push(Collectible {
                id,
                pos,
                size: settings.collectible_size,
                alive: true,
            });
        }

        for &pos in &level.enemy_spawns {
            let id = state.next_entity_id();
            state.registry.enemies.push(Enemy {
                id,
                pos,
                vel: settings.enemy_velocity,
                size: settings.enemy_size,
            });
        }

        log::debug!(
            "Session ready: player at {:?}, {} collectibles, {} enemies",
            state.player.pos,
            state.registry.collectibles.len(),
            state.registry.enemies.len()
        );

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::LevelOptions;

    fn default_state() -> GameState {
        let settings = Settings::default();
        let level = Level::default_layout(&settings.level_options()).unwrap();
        GameState::new(&level, &settings)
    }

    #[test]
    fn test_new_state_populates_registry() {
        let state = default_state();
        let level = Level::default_layout(&LevelOptions::default()).unwrap();
        assert_eq!(state.registry.remaining_collectibles(), level.collectible_spawns.len());
        assert_eq!(state.registry.enemies.len(), 1);
        assert_eq!(state.registry.consumed_count(), 0);
        assert_eq!(state.player.pos, Vec2::new(72.0, 72.0));

        // Ids are unique and ascending
        let ids: Vec<u32> = state
            .registry
            .collectibles
            .iter()
            .map(|c| c.id)
            .chain(state.registry.enemies.iter().map(|e| e.id))
            .collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_pickup_consumes_once() {
        let mut state = default_state();
        let player = state.player.aabb();

        let first = state.registry.check_collectible_pickup(&player);
        assert_eq!(first.len(), 1);
        assert_eq!(state.registry.consumed_count(), 1);

        // Same spot, later tick: that id is gone for good
        let second = state.registry.check_collectible_pickup(&player);
        assert!(second.is_empty());
        assert_eq!(state.registry.consumed_count(), 1);
        assert!(state.registry.collectibles.iter().all(|c| c.id != first[0]));
    }

    #[test]
    fn test_pickup_miss_leaves_registry_alone() {
        let mut state = default_state();
        let before = state.registry.remaining_collectibles();
        // Inside the top-left wall cell: no collectible there
        let reach = Aabb::new(Vec2::new(24.0, 24.0), Vec2::splat(10.0));
        assert!(state.registry.check_collectible_pickup(&reach).is_empty());
        assert_eq!(state.registry.remaining_collectibles(), before);
    }

    #[test]
    fn test_enemy_contact() {
        let state = default_state();
        assert!(!state.registry.check_enemy_contact(&state.player.aabb()));

        let enemy_pos = state.registry.enemies[0].pos;
        let reach = Aabb::new(enemy_pos + Vec2::new(30.0, 0.0), Vec2::new(40.0, 24.0));
        assert!(state.registry.check_enemy_contact(&reach));
    }

    #[test]
    fn test_player_reset() {
        let mut player = Player::new(Vec2::new(72.0, 72.0), Vec2::new(40.0, 24.0));
        player.pos = Vec2::new(300.0, 200.0);
        player.vel = Vec2::new(160.0, -160.0);
        player.reset_to_spawn();
        assert_eq!(player.pos, player.spawn());
        assert_eq!(player.vel, Vec2::ZERO);
    }
}
