//! # Arena Engine
//!
//! Spatial collision subsystem for real-time 2D arcade simulations.
//!
//! ## Features
//!
//! - **Uniform-grid broad phase**: entities hashed into square cells, with
//!   dirty tracking so an unchanged field reuses the previous grid
//! - **Density-adaptive cell sizing**: a data-driven count-to-size table,
//!   sampled on a throttled schedule
//! - **Layer filtering**: a symmetric kind-pair compatibility table pruning
//!   candidates before the narrow phase
//! - **Circle narrow phase**: strict-overlap tests that degrade gracefully
//!   on malformed entities
//! - **Response dispatch**: damage, pickups, and invulnerability rules with
//!   per-tick event reporting and statistics
//!
//! ## Quick Start
//!
//! ```rust
//! use arena_engine::prelude::*;
//!
//! let config = CollisionConfig::default();
//! let mut collision = CollisionSystem::new(&config);
//!
//! let mut entities = vec![
//!     SimEntity::player(Vec2::new(100.0, 100.0), 15.0, 100.0),
//!     SimEntity::enemy(Vec2::new(108.0, 100.0), 10.0, 25.0),
//! ];
//!
//! // Once per simulation tick:
//! let stats = collision.tick(&mut entities);
//! assert_eq!(stats.collisions_detected, 1);
//! assert_eq!(entities[0].health, 75.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod entity;
pub mod foundation;
pub mod physics;
pub mod spatial;

pub use config::{CollisionConfig, ConfigError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{CollisionConfig, ConfigError},
        entity::{Collidable, EntityId, EntityKind, SimEntity},
        foundation::math::Vec2,
        physics::{
            CollisionEvent, CollisionPair, CollisionResponder, CollisionStats, CollisionSystem,
            PairFilter, PairRule,
        },
        spatial::{DensityProfile, DensityTuner, GridIndex},
    };
}
