//! Entity handles and the collision-facing entity model
//!
//! The collision engine does not own entities. Each tick it receives a slice
//! of entity state owned by the surrounding simulation; [`EntityId`] is the
//! entity's index within that slice and is valid for the current tick only.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec2;

/// Entity identifier
///
/// The index of the entity in the tick's entity slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u32);

impl EntityId {
    /// Create a handle from a slice index
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Get the slice index this handle refers to
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Closed set of entity categories used for collision-rule lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// The player character
    Player,
    /// Hostile units
    Enemy,
    /// Player-fired projectiles
    Projectile,
    /// Enemy-fired projectiles
    EnemyProjectile,
    /// Experience pickups dropped by defeated enemies
    XpOrb,
}

impl EntityKind {
    /// Number of kinds in the closed set
    pub const COUNT: usize = 5;

    /// All kinds, for table construction and tests
    pub const ALL: [Self; Self::COUNT] = [
        Self::Player,
        Self::Enemy,
        Self::Projectile,
        Self::EnemyProjectile,
        Self::XpOrb,
    ];
}

/// Minimal read-only view of an entity required by the broad phase
///
/// The grid and scanner only see this trait, so they stay independent of
/// concrete entity stat blocks.
pub trait Collidable {
    /// Center of the circular hull in world space
    fn position(&self) -> Vec2;

    /// Collision radius; values that are not finite and positive never collide
    fn radius(&self) -> f64;

    /// Category tag for pair filtering and response dispatch
    fn kind(&self) -> EntityKind;

    /// Dead entities are excluded from the grid and from all pairing
    fn is_dead(&self) -> bool;
}

/// Mutable entity state operated on by collision response
///
/// A property bag covering every kind in the closed set; fields that do not
/// apply to a kind stay at their zero values. The mutation methods are the
/// side-effect surface the responder invokes.
#[derive(Debug, Clone)]
pub struct SimEntity {
    /// Category tag
    pub kind: EntityKind,
    /// Hull center in world space
    pub position: Vec2,
    /// Hull radius
    pub radius: f64,
    /// Current health (players and enemies)
    pub health: f64,
    /// Damage applied to the other party on contact (enemies and projectiles)
    pub contact_damage: f64,
    /// XP granted when collected (orbs)
    pub value: f64,
    /// XP accumulated so far (players)
    pub xp: f64,
    /// Liveness flag
    pub is_dead: bool,
    /// Suppresses incoming damage while set (players)
    pub is_invulnerable: bool,
    /// Set once an orb has been consumed
    pub collected: bool,
}

impl SimEntity {
    fn base(kind: EntityKind, position: Vec2, radius: f64) -> Self {
        Self {
            kind,
            position,
            radius,
            health: 0.0,
            contact_damage: 0.0,
            value: 0.0,
            xp: 0.0,
            is_dead: false,
            is_invulnerable: false,
            collected: false,
        }
    }

    /// Create a player entity
    pub fn player(position: Vec2, radius: f64, health: f64) -> Self {
        Self {
            health,
            ..Self::base(EntityKind::Player, position, radius)
        }
    }

    /// Create an enemy entity
    pub fn enemy(position: Vec2, radius: f64, contact_damage: f64) -> Self {
        Self {
            health: 1.0,
            contact_damage,
            ..Self::base(EntityKind::Enemy, position, radius)
        }
    }

    /// Create a player-fired projectile
    pub fn projectile(position: Vec2, radius: f64, damage: f64) -> Self {
        Self {
            contact_damage: damage,
            ..Self::base(EntityKind::Projectile, position, radius)
        }
    }

    /// Create an enemy-fired projectile
    pub fn enemy_projectile(position: Vec2, radius: f64, damage: f64) -> Self {
        Self {
            contact_damage: damage,
            ..Self::base(EntityKind::EnemyProjectile, position, radius)
        }
    }

    /// Create an XP orb worth `value` experience
    pub fn xp_orb(position: Vec2, radius: f64, value: f64) -> Self {
        Self {
            value,
            ..Self::base(EntityKind::XpOrb, position, radius)
        }
    }

    /// Apply incoming damage, killing the entity when health is exhausted
    pub fn apply_damage(&mut self, amount: f64) {
        self.health -= amount;
        if self.health <= 0.0 {
            self.kill();
        }
    }

    /// Credit collected XP
    pub fn credit_xp(&mut self, amount: f64) {
        self.xp += amount;
    }

    /// Mark the entity dead
    pub fn kill(&mut self) {
        self.is_dead = true;
    }

    /// Consume an orb: dead and collected in a single step
    pub fn collect(&mut self) {
        self.is_dead = true;
        self.collected = true;
    }
}

impl Collidable for SimEntity {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn radius(&self) -> f64 {
        self.radius
    }

    fn kind(&self) -> EntityKind {
        self.kind
    }

    fn is_dead(&self) -> bool {
        self.is_dead
    }
}
