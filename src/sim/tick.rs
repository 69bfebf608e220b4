//! Fixed timestep simulation tick
//!
//! Order per tick: player intent -> player vs walls -> enemies vs walls ->
//! enemy vs enemy -> pickups -> enemy contact (reset).

use super::movement::{MoveIntent, desired_velocity};
use super::state::{GameEvent, GameState};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Held direction keys
    pub intent: MoveIntent,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    state.time_ticks += 1;

    // Player
    let desired = desired_velocity(input.intent, state.player_speed, state.normalize_diagonal);
    let motion = state.world.resolve_player_movement(&state.player, desired, dt);
    state.player.pos = motion.pos;
    state.player.vel = motion.vel;

    // Enemies vs walls and bounds
    for enemy in &mut state.registry.enemies {
        let motion = state.world.resolve_enemy_movement(enemy, dt);
        let bounced = motion.vel != enemy.vel;
        enemy.pos = motion.pos;
        enemy.vel = motion.vel;
        if bounced {
            events.push(GameEvent::EnemyBounced { id: enemy.id });
        }
    }

    // Enemy vs enemy, each unordered pair once in id order
    let enemies = &mut state.registry.enemies;
    for i in 0..enemies.len() {
        let (head, tail) = enemies.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if state.world.resolve_enemy_enemy_collision(a, b) {
                events.push(GameEvent::EnemyBounced { id: a.id });
                events.push(GameEvent::EnemyBounced { id: b.id });
            }
        }
    }

    // Pickups
    let player_box = state.player.aabb();
    for id in state.registry.check_collectible_pickup(&player_box) {
        events.push(GameEvent::CollectiblePicked { id });
    }

    // Enemy contact sends the player home; nothing else is lost
    if state.registry.check_enemy_contact(&player_box) {
        state.player.reset_to_spawn();
        log::info!("Player hit an enemy at tick {}, back to spawn", state.time_ticks);
        events.push(GameEvent::PlayerReset);
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::Settings;
    use crate::sim::level::Level;
    use crate::sim::state::Enemy;
    use glam::Vec2;
    use proptest::prelude::*;

    fn default_state() -> GameState {
        let settings = Settings::default();
        let level = Level::default_layout(&settings.level_options()).unwrap();
        GameState::new(&level, &settings)
    }

    fn held(intent: MoveIntent) -> TickInput {
        TickInput { intent }
    }

    #[test]
    fn test_move_right_three_ticks() {
        let mut state = default_state();
        for _ in 0..3 {
            tick(&mut state, &held(MoveIntent::right()), SIM_DT);
        }
        assert!((state.player.pos.x - 80.0).abs() < 1e-3, "x = {}", state.player.pos.x);
        assert_eq!(state.player.pos.y, 72.0);
        assert_eq!(state.time_ticks, 3);
    }

    #[test]
    fn test_spawn_collectible_picked_on_first_tick() {
        let mut state = default_state();
        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        let picked: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::CollectiblePicked { .. }))
            .collect();
        assert_eq!(picked.len(), 1);

        // Standing still: nothing more to pick
        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::CollectiblePicked { .. })));
        assert_eq!(state.registry.consumed_count(), 1);
    }

    #[test]
    fn test_enemy_contact_resets_player() {
        let mut state = default_state();
        let enemy_pos = state.registry.enemies[0].pos;
        state.player.pos = enemy_pos + Vec2::new(0.0, 30.0);
        state.player.vel = Vec2::new(160.0, 0.0);

        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(events.contains(&GameEvent::PlayerReset));
        assert_eq!(state.player.pos, state.player.spawn());
        assert_eq!(state.player.vel, Vec2::ZERO);
        // Enemy keeps going
        assert_eq!(state.registry.enemies.len(), 1);
    }

    #[test]
    fn test_enemy_pair_bounces() {
        let mut state = default_state();
        let mut other = state.registry.enemies[0].clone();
        other.id = state.next_entity_id();
        other.pos = state.registry.enemies[0].pos + Vec2::new(43.0, 0.0);
        other.vel = Vec2::new(-50.0, 50.0);
        state.registry.enemies.push(other);

        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        let a = &state.registry.enemies[0];
        let b = &state.registry.enemies[1];
        assert!(events.contains(&GameEvent::EnemyBounced { id: a.id }));
        assert_eq!(a.vel, Vec2::new(-50.0, 50.0));
        assert_eq!(b.vel, Vec2::new(50.0, 50.0));
        assert!(!a.aabb().overlaps(&b.aabb()));
    }

    #[test]
    fn test_enemy_patrol_keeps_speed() {
        let mut state = default_state();
        let speed = ENEMY_START_VELOCITY.length();
        for _ in 0..3000 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            let e: &Enemy = &state.registry.enemies[0];
            assert!((e.vel.length() - speed).abs() <= speed * 1e-6);
            assert!(!state.world.overlaps_wall(&e.aabb()));
        }
    }

    #[test]
    fn test_enemy_pair_at_wall_stays_out_of_walls() {
        let mut state = default_state();
        let mut a = state.registry.enemies[0].clone();
        a.pos = Vec2::new(480.0 - 21.0, 216.0);
        a.vel = Vec2::new(50.0, 0.0);
        let mut b = a.clone();
        b.id = state.next_entity_id();
        b.pos = a.pos - Vec2::new(42.5, 0.0);
        state.registry.enemies = vec![a, b];

        for i in 0..600 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            for e in &state.registry.enemies {
                assert!(
                    !state.world.overlaps_wall(&e.aabb()),
                    "enemy {} in a wall at tick {}: {:?}",
                    e.id,
                    i,
                    e.pos
                );
                assert!(state.world.within_bounds(&e.aabb()));
                assert!((e.vel.length() - 50.0).abs() < 1e-4);
            }
        }
    }

    fn intent_strategy() -> impl Strategy<Value = MoveIntent> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(left, right, up, down)| MoveIntent {
                left,
                right,
                up,
                down,
            },
        )
    }

    proptest! {
        #[test]
        fn prop_session_invariants(
            inputs in prop::collection::vec(intent_strategy(), 1..400)
        ) {
            let mut state = default_state();
            let total = state.registry.remaining_collectibles();
            let mut seen = std::collections::HashSet::new();
            let mut last_consumed = 0;

            for intent in inputs {
                let events = tick(&mut state, &held(intent), SIM_DT);

                let p = state.player.pos;
                prop_assert!(p.x >= 0.0 && p.x <= 528.0 && p.y >= 0.0 && p.y <= 432.0);
                prop_assert!(!state.world.overlaps_wall(&state.player.aabb()));

                for event in events {
                    if let GameEvent::CollectiblePicked { id } = event {
                        prop_assert!(seen.insert(id), "collectible {} picked twice", id);
                    }
                }
                let consumed = state.registry.consumed_count();
                prop_assert!(consumed >= last_consumed);
                prop_assert_eq!(consumed as usize + state.registry.remaining_collectibles(), total);
                last_consumed = consumed;
            }
        }
    }
}
