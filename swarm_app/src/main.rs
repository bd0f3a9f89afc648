//! Headless swarm-survival demo
//!
//! Drives the collision engine with a survivors-style scenario: a circling
//! player, waves of enemies converging on it, auto-fired projectiles, and
//! XP orbs dropped by defeated enemies. Runs a fixed number of simulation
//! ticks and logs collision statistics along the way.
//!
//! Usage: `swarm_demo [collision_config.toml]`

use std::f64::consts::TAU;

use log::{error, info, warn};
use rand::Rng;

use arena_engine::foundation::{logging, time::Timer};
use arena_engine::prelude::*;

const TICKS: u64 = 1200;
const STAT_LOG_INTERVAL: u64 = 60;
const WAVE_INTERVAL: u64 = 45;
const WAVE_SIZE: usize = 12;
const MAX_ENEMIES: usize = 300;
const FIRE_INTERVAL: u64 = 8;
const INVULN_TICKS: u64 = 30;

const ENEMY_SPEED: f64 = 1.5;
const PROJECTILE_SPEED: f64 = 6.0;
const ARENA_RADIUS: f64 = 2000.0;

fn main() {
    logging::init();

    let config = match std::env::args().nth(1) {
        Some(path) => match CollisionConfig::load_from_file(&path) {
            Ok(config) => {
                info!("loaded collision config from {path}");
                config
            }
            Err(e) => {
                error!("failed to load {path}: {e}");
                std::process::exit(1);
            }
        },
        None => CollisionConfig::default(),
    };

    let mut collision = CollisionSystem::new(&config);
    let mut rng = rand::thread_rng();
    let mut timer = Timer::new();

    let mut entities = vec![SimEntity::player(Vec2::new(0.0, 0.0), 15.0, 250.0)];
    let mut velocities = vec![Vec2::new(0.0, 0.0)];
    let mut invuln_until: u64 = 0;

    for tick in 0..TICKS {
        timer.update();

        // The player sweeps a slow circle around the arena center.
        let angle = tick as f64 * 0.02 * TAU / 10.0;
        entities[0].position = Vec2::new(angle.cos(), angle.sin()) * 80.0;
        entities[0].is_invulnerable = tick < invuln_until;

        if tick % WAVE_INTERVAL == 0 {
            spawn_wave(&mut entities, &mut velocities, &mut rng);
        }
        if tick % FIRE_INTERVAL == 0 {
            fire_at_nearest_enemy(&collision, &mut entities, &mut velocities);
        }

        advance(&mut entities, &mut velocities);

        let health_before = entities[0].health;
        collision.tick(&mut entities);

        if entities[0].health < health_before {
            invuln_until = tick + INVULN_TICKS;
        }
        if entities[0].is_dead {
            info!("player defeated on tick {tick}");
            break;
        }

        reap(&mut entities, &mut velocities);

        if tick % STAT_LOG_INTERVAL == 0 {
            let stats = collision.stats();
            info!(
                "tick {tick}: {} live | {} cells (avg {:.1}/cell, size {:.0}) | \
                 {} checked, {} detected, efficiency {:.3} | hp {:.0}, xp {:.0}",
                entities.len(),
                stats.cells_processed,
                stats.avg_entities_per_cell,
                collision.grid().cell_size(),
                stats.collisions_checked,
                stats.collisions_detected,
                stats.efficiency(),
                entities[0].health,
                entities[0].xp,
            );
        }
    }

    let response = collision.response_stats();
    info!(
        "done after {} ticks ({:.0} ticks/sec): {} player hits ({} absorbed), \
         {} enemies destroyed, {} orbs collected for {:.0} xp",
        collision.tick_count(),
        timer.average_fps(),
        response.player_hits,
        response.absorbed_hits,
        response.enemy_hits,
        response.orbs_collected,
        response.xp_credited,
    );
}

/// Spawn a ring of enemies on the arena edge, converging on the player
fn spawn_wave(entities: &mut Vec<SimEntity>, velocities: &mut Vec<Vec2>, rng: &mut impl Rng) {
    let enemy_count = entities
        .iter()
        .filter(|e| e.kind == EntityKind::Enemy)
        .count();
    if enemy_count >= MAX_ENEMIES {
        warn!("enemy cap reached ({MAX_ENEMIES}); skipping wave");
        return;
    }

    for _ in 0..WAVE_SIZE {
        let angle = rng.gen_range(0.0..TAU);
        let distance = rng.gen_range(500.0..800.0);
        let position = Vec2::new(angle.cos(), angle.sin()) * distance;
        let mut enemy = SimEntity::enemy(position, rng.gen_range(8.0..14.0), 10.0);
        enemy.health = 20.0;
        entities.push(enemy);
        velocities.push(Vec2::new(0.0, 0.0));
    }
}

/// Fire a projectile from the player toward the nearest visible enemy
fn fire_at_nearest_enemy(
    collision: &CollisionSystem,
    entities: &mut Vec<SimEntity>,
    velocities: &mut Vec<Vec2>,
) {
    let player_position = entities[0].position;
    let nearby = collision
        .grid()
        .query_circle(entities, player_position, 600.0);

    let target = nearby
        .iter()
        .filter_map(|id| entities.get(id.index()))
        .filter(|e| e.kind == EntityKind::Enemy && !e.is_dead)
        .min_by(|a, b| {
            let da = (a.position - player_position).norm_squared();
            let db = (b.position - player_position).norm_squared();
            da.total_cmp(&db)
        });

    let Some(target) = target else {
        return;
    };
    let direction = target.position - player_position;
    if direction.norm_squared() <= f64::EPSILON {
        return;
    }

    entities.push(SimEntity::projectile(player_position, 4.0, 15.0));
    velocities.push(direction.normalize() * PROJECTILE_SPEED);
}

/// Integrate positions: enemies chase the player, projectiles fly straight
fn advance(entities: &mut [SimEntity], velocities: &mut [Vec2]) {
    let player_position = entities[0].position;
    for (entity, velocity) in entities.iter_mut().zip(velocities.iter_mut()) {
        match entity.kind {
            EntityKind::Enemy => {
                let to_player = player_position - entity.position;
                if to_player.norm_squared() > f64::EPSILON {
                    *velocity = to_player.normalize() * ENEMY_SPEED;
                }
            }
            EntityKind::Projectile => {
                if entity.position.norm() > ARENA_RADIUS {
                    entity.kill();
                }
            }
            _ => {}
        }
        entity.position += *velocity;
    }
}

/// Remove dead entities, dropping an XP orb where each enemy fell
fn reap(entities: &mut Vec<SimEntity>, velocities: &mut Vec<Vec2>) {
    let mut dropped = Vec::new();
    let mut i = 0;
    while i < entities.len() {
        if entities[i].is_dead {
            if entities[i].kind == EntityKind::Enemy {
                dropped.push(entities[i].position);
            }
            entities.swap_remove(i);
            velocities.swap_remove(i);
        } else {
            i += 1;
        }
    }

    for position in dropped {
        entities.push(SimEntity::xp_orb(position, 6.0, 10.0));
        velocities.push(Vec2::new(0.0, 0.0));
    }
}
