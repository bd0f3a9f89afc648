//! Full-tick integration tests for the collision subsystem
//!
//! Exercises the rebuild-scan-respond cycle end to end: pair enumeration
//! across cell boundaries, filtering, narrow phase, and response effects.

use approx::assert_relative_eq;
use arena_engine::prelude::*;

fn fixed_grid_config(cell_size: f64) -> CollisionConfig {
    CollisionConfig {
        density: DensityProfile {
            bands: Vec::new(),
            base_cell_size: cell_size,
        },
        ..CollisionConfig::default()
    }
}

fn enemies_only_config(cell_size: f64) -> CollisionConfig {
    CollisionConfig {
        pair_rules: vec![PairRule {
            a: EntityKind::Enemy,
            b: EntityKind::Enemy,
        }],
        ..fixed_grid_config(cell_size)
    }
}

#[test]
fn test_player_enemy_orb_scenario() {
    let mut collision = CollisionSystem::new(&fixed_grid_config(100.0));
    let mut entities = vec![
        SimEntity::player(Vec2::new(100.0, 100.0), 15.0, 100.0),
        SimEntity::enemy(Vec2::new(100.0, 100.0), 10.0, 25.0),
        SimEntity::xp_orb(Vec2::new(100.0, 100.0), 5.0, 50.0),
    ];

    let stats = collision.tick(&mut entities);

    // Player/Enemy and Player/XpOrb collide; Enemy/XpOrb is not compatible.
    assert_eq!(stats.collisions_detected, 2);
    assert_relative_eq!(entities[0].health, 75.0);
    assert_relative_eq!(entities[0].xp, 50.0);
    assert!(entities[2].is_dead);
    assert!(entities[2].collected);
    assert!(!entities[1].is_dead);
}

#[test]
fn test_each_cross_cell_pair_visited_exactly_once() {
    // Eight enemies spread over a 2x2 block of adjacent cells, two per
    // cell, with radii too small to overlap. Every unordered pair is
    // within neighbor range, so the checked count must be exactly
    // C(8, 2) = 28: more would mean duplicate visits (double damage in a
    // real tick), fewer would mean dropped pairs at cell boundaries.
    let mut collision = CollisionSystem::new(&enemies_only_config(100.0));
    let positions = [
        (10.0, 10.0),
        (50.0, 50.0),
        (110.0, 10.0),
        (150.0, 50.0),
        (10.0, 110.0),
        (50.0, 150.0),
        (110.0, 110.0),
        (150.0, 150.0),
    ];
    let mut entities: Vec<SimEntity> = positions
        .iter()
        .map(|&(x, y)| SimEntity::enemy(Vec2::new(x, y), 1.0, 5.0))
        .collect();

    let stats = collision.tick(&mut entities);
    assert_eq!(stats.collisions_checked, 28);
    assert_eq!(stats.collisions_detected, 0);
}

#[test]
fn test_diagonal_cell_boundary_pair_detected_once() {
    // Entities hugging a cell corner from the (1,0) and (0,1) cells: this
    // pair is only reachable through the (-1,1) forward offset.
    let mut collision = CollisionSystem::new(&enemies_only_config(100.0));
    let mut entities = vec![
        SimEntity::enemy(Vec2::new(100.5, 99.5), 5.0, 5.0),
        SimEntity::enemy(Vec2::new(99.5, 100.5), 5.0, 5.0),
    ];

    let stats = collision.tick(&mut entities);
    assert_eq!(stats.collisions_checked, 1);
    assert_eq!(stats.collisions_detected, 1);
}

#[test]
fn test_touching_at_exact_distance_is_not_detected() {
    let mut collision = CollisionSystem::new(&fixed_grid_config(100.0));
    let mut entities = vec![
        SimEntity::player(Vec2::new(0.0, 0.0), 5.0, 100.0),
        SimEntity::enemy(Vec2::new(10.0, 0.0), 5.0, 25.0),
    ];

    let stats = collision.tick(&mut entities);
    assert_eq!(stats.collisions_detected, 0);
    assert_relative_eq!(entities[0].health, 100.0);

    // A hair closer and the hit lands.
    entities[1].position = Vec2::new(10.0 - 1e-9, 0.0);
    let stats = collision.tick(&mut entities);
    assert_eq!(stats.collisions_detected, 1);
    assert_relative_eq!(entities[0].health, 75.0);
}

#[test]
fn test_invulnerable_player_takes_no_damage() {
    let mut collision = CollisionSystem::new(&fixed_grid_config(100.0));
    let mut entities = vec![
        SimEntity::player(Vec2::new(0.0, 0.0), 15.0, 100.0),
        SimEntity::enemy(Vec2::new(5.0, 0.0), 10.0, 25.0),
    ];
    entities[0].is_invulnerable = true;

    let stats = collision.tick(&mut entities);
    // The collision itself still fires; only the damage is suppressed.
    assert_eq!(stats.collisions_detected, 1);
    assert_relative_eq!(entities[0].health, 100.0);

    entities[0].is_invulnerable = false;
    collision.tick(&mut entities);
    assert_relative_eq!(entities[0].health, 75.0);
}

#[test]
fn test_collected_orb_has_no_residual_pairing() {
    let mut collision = CollisionSystem::new(&fixed_grid_config(100.0));
    let mut entities = vec![
        SimEntity::player(Vec2::new(0.0, 0.0), 15.0, 100.0),
        SimEntity::xp_orb(Vec2::new(5.0, 0.0), 5.0, 50.0),
    ];

    collision.tick(&mut entities);
    assert_relative_eq!(entities[0].xp, 50.0);

    // Repeated ticks never re-credit the consumed orb.
    collision.tick(&mut entities);
    collision.tick(&mut entities);
    assert_relative_eq!(entities[0].xp, 50.0);
    assert_eq!(collision.response_stats().orbs_collected, 1);
}

#[test]
fn test_density_retune_shrinks_cells_under_load() {
    let mut collision = CollisionSystem::new(&CollisionConfig::default());

    // A sparse field keeps the coarse default.
    let mut few: Vec<SimEntity> = (0..10)
        .map(|i| SimEntity::enemy(Vec2::new(i as f64 * 40.0, 0.0), 1.0, 5.0))
        .collect();
    collision.tick(&mut few);
    assert_relative_eq!(collision.grid().cell_size(), 160.0);

    // A wave spawn past the resample delta forces a finer grid at once.
    let mut many: Vec<SimEntity> = (0..220)
        .map(|i| SimEntity::enemy(Vec2::new(i as f64 * 10.0, 0.0), 1.0, 5.0))
        .collect();
    collision.tick(&mut many);
    assert_relative_eq!(collision.grid().cell_size(), 100.0);
}

#[test]
fn test_tick_tolerates_malformed_and_empty_input() {
    let mut collision = CollisionSystem::new(&CollisionConfig::default());

    let mut nothing: Vec<SimEntity> = Vec::new();
    let stats = collision.tick(&mut nothing);
    assert_eq!(stats.cells_processed, 0);
    assert_eq!(stats.collisions_checked, 0);

    let mut broken = vec![
        SimEntity::enemy(Vec2::new(f64::NAN, 0.0), 10.0, 5.0),
        SimEntity::player(Vec2::new(f64::INFINITY, f64::NEG_INFINITY), 15.0, 100.0),
    ];
    let stats = collision.tick(&mut broken);
    assert_eq!(stats.cells_processed, 0);
    assert_eq!(stats.collisions_detected, 0);
}
