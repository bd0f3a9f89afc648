//! Kind-pair collision filtering
//!
//! A symmetric compatibility table over the closed entity-kind set,
//! consulted before the narrow phase as a cheap mask test. Rules are data:
//! the table is built from config, and any pair without a rule never
//! collides.

use bitflags::bitflags;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;

bitflags! {
    /// Bit set over the entity-kind space
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct KindMask: u32 {
        /// The player character
        const PLAYER = 1 << 0;
        /// Hostile units
        const ENEMY = 1 << 1;
        /// Player-fired projectiles
        const PROJECTILE = 1 << 2;
        /// Enemy-fired projectiles
        const ENEMY_PROJECTILE = 1 << 3;
        /// Experience pickups
        const XP_ORB = 1 << 4;
    }
}

impl From<EntityKind> for KindMask {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Player => Self::PLAYER,
            EntityKind::Enemy => Self::ENEMY,
            EntityKind::Projectile => Self::PROJECTILE,
            EntityKind::EnemyProjectile => Self::ENEMY_PROJECTILE,
            EntityKind::XpOrb => Self::XP_ORB,
        }
    }
}

/// An unordered kind pair allowed to collide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairRule {
    /// One side of the pair
    pub a: EntityKind,
    /// The other side
    pub b: EntityKind,
}

impl PairRule {
    /// The stock rule set
    ///
    /// Enemy/Enemy and Projectile/Projectile are deliberately absent:
    /// enemies never collide with each other, and projectiles pass through
    /// one another.
    pub const CANONICAL: [Self; 4] = [
        Self { a: EntityKind::Player, b: EntityKind::Enemy },
        Self { a: EntityKind::Player, b: EntityKind::EnemyProjectile },
        Self { a: EntityKind::Player, b: EntityKind::XpOrb },
        Self { a: EntityKind::Projectile, b: EntityKind::Enemy },
    ];
}

/// Symmetric kind-pair compatibility table
///
/// Each rule is folded into both kinds' masks, so
/// `can_collide(a, b) == can_collide(b, a)` holds by construction.
#[derive(Debug, Clone)]
pub struct PairFilter {
    masks: [KindMask; EntityKind::COUNT],
}

impl PairFilter {
    /// Build a filter from a rule list
    pub fn from_rules(rules: &[PairRule]) -> Self {
        let mut masks = [KindMask::empty(); EntityKind::COUNT];
        for rule in rules {
            masks[rule.a as usize] |= KindMask::from(rule.b);
            masks[rule.b as usize] |= KindMask::from(rule.a);
        }

        for kind in EntityKind::ALL {
            if masks[kind as usize].is_empty() {
                debug!("no collision rules reference {kind:?}; it will never pair");
            }
        }

        Self { masks }
    }

    /// Whether two kinds may ever collide
    pub fn can_collide(&self, a: EntityKind, b: EntityKind) -> bool {
        self.masks[a as usize].contains(KindMask::from(b))
    }
}

impl Default for PairFilter {
    fn default() -> Self {
        Self::from_rules(&PairRule::CANONICAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetry_over_all_pairs() {
        let filter = PairFilter::default();
        for a in EntityKind::ALL {
            for b in EntityKind::ALL {
                assert_eq!(filter.can_collide(a, b), filter.can_collide(b, a));
            }
        }
    }

    #[test]
    fn test_canonical_table() {
        let filter = PairFilter::default();
        assert!(filter.can_collide(EntityKind::Player, EntityKind::Enemy));
        assert!(filter.can_collide(EntityKind::Player, EntityKind::EnemyProjectile));
        assert!(filter.can_collide(EntityKind::Player, EntityKind::XpOrb));
        assert!(filter.can_collide(EntityKind::Projectile, EntityKind::Enemy));

        assert!(!filter.can_collide(EntityKind::Enemy, EntityKind::Enemy));
        assert!(!filter.can_collide(EntityKind::Projectile, EntityKind::Projectile));
        assert!(!filter.can_collide(EntityKind::Player, EntityKind::Player));
        assert!(!filter.can_collide(EntityKind::Enemy, EntityKind::XpOrb));
        assert!(!filter.can_collide(EntityKind::Projectile, EntityKind::XpOrb));
    }

    #[test]
    fn test_empty_rules_mean_nothing_collides() {
        let filter = PairFilter::from_rules(&[]);
        for a in EntityKind::ALL {
            for b in EntityKind::ALL {
                assert!(!filter.can_collide(a, b));
            }
        }
    }

    #[test]
    fn test_duplicate_rules_are_idempotent() {
        let rule = PairRule { a: EntityKind::Player, b: EntityKind::Enemy };
        let filter = PairFilter::from_rules(&[rule, rule, rule]);
        assert!(filter.can_collide(EntityKind::Player, EntityKind::Enemy));
        assert!(!filter.can_collide(EntityKind::Player, EntityKind::XpOrb));
    }
}
