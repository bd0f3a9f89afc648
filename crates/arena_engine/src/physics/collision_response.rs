//! Collision response dispatch
//!
//! Given a colliding, compatible pair, applies the matching game rule:
//! damage on contact, XP pickup consumption, invulnerability short-circuit.
//! Every dispatch is a stateless function of the two entities' current
//! fields; the only retained state is the statistics counters.

use log::trace;

use crate::entity::{EntityId, EntityKind, SimEntity};

/// Game-rule effect applied for one colliding pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionEvent {
    /// An enemy or enemy projectile damaged the player
    PlayerDamaged {
        /// Damage applied
        amount: f64,
    },
    /// Contact landed while the player was invulnerable; no damage applied
    PlayerHitAbsorbed,
    /// The player consumed an XP orb
    OrbCollected {
        /// XP credited
        value: f64,
    },
    /// A player projectile damaged an enemy
    EnemyDamaged {
        /// Damage applied
        amount: f64,
    },
}

/// Cumulative response statistics
#[derive(Debug, Default, Clone, Copy)]
pub struct ResponseStats {
    /// Damaging hits taken by the player
    pub player_hits: u64,
    /// Hits absorbed by invulnerability
    pub absorbed_hits: u64,
    /// Orbs consumed
    pub orbs_collected: u64,
    /// Total XP credited from orbs
    pub xp_credited: f64,
    /// Enemy hits from player projectiles
    pub enemy_hits: u64,
}

/// Dispatches colliding pairs to the appropriate game-rule effect
#[derive(Debug, Default)]
pub struct CollisionResponder {
    stats: ResponseStats,
}

impl CollisionResponder {
    /// Create a responder with zeroed statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Cumulative statistics since construction
    pub fn stats(&self) -> &ResponseStats {
        &self.stats
    }

    /// Apply the game rule for one colliding pair
    ///
    /// Order-independent in the two arguments. Re-checks liveness first: an
    /// earlier pair this tick may already have killed a participant, in
    /// which case this is a no-op. Returns the effect applied, or `None`
    /// when the pair has no rule or was skipped.
    pub fn handle(&mut self, a: &mut SimEntity, b: &mut SimEntity) -> Option<CollisionEvent> {
        if a.is_dead || b.is_dead {
            return None;
        }

        use EntityKind::{Enemy, EnemyProjectile, Player, Projectile, XpOrb};
        match (a.kind, b.kind) {
            (Player, Enemy) => Some(self.enemy_contact(a, b)),
            (Enemy, Player) => Some(self.enemy_contact(b, a)),
            (Player, EnemyProjectile) => Some(self.enemy_projectile_hit(a, b)),
            (EnemyProjectile, Player) => Some(self.enemy_projectile_hit(b, a)),
            (Player, XpOrb) => Some(self.collect_orb(a, b)),
            (XpOrb, Player) => Some(self.collect_orb(b, a)),
            (Projectile, Enemy) => Some(self.projectile_hit(a, b)),
            (Enemy, Projectile) => Some(self.projectile_hit(b, a)),
            _ => {
                trace!("no response rule for {:?}/{:?}", a.kind, b.kind);
                None
            }
        }
    }

    fn enemy_contact(&mut self, player: &mut SimEntity, enemy: &SimEntity) -> CollisionEvent {
        if player.is_invulnerable {
            self.stats.absorbed_hits += 1;
            return CollisionEvent::PlayerHitAbsorbed;
        }
        let amount = enemy.contact_damage;
        player.apply_damage(amount);
        self.stats.player_hits += 1;
        CollisionEvent::PlayerDamaged { amount }
    }

    fn enemy_projectile_hit(
        &mut self,
        player: &mut SimEntity,
        projectile: &mut SimEntity,
    ) -> CollisionEvent {
        // The projectile is consumed whether or not the hit lands.
        let event = if player.is_invulnerable {
            self.stats.absorbed_hits += 1;
            CollisionEvent::PlayerHitAbsorbed
        } else {
            let amount = projectile.contact_damage;
            player.apply_damage(amount);
            self.stats.player_hits += 1;
            CollisionEvent::PlayerDamaged { amount }
        };
        projectile.kill();
        event
    }

    fn collect_orb(&mut self, player: &mut SimEntity, orb: &mut SimEntity) -> CollisionEvent {
        let value = orb.value;
        orb.collect();
        player.credit_xp(value);
        self.stats.orbs_collected += 1;
        self.stats.xp_credited += value;
        CollisionEvent::OrbCollected { value }
    }

    fn projectile_hit(
        &mut self,
        projectile: &mut SimEntity,
        enemy: &mut SimEntity,
    ) -> CollisionEvent {
        let amount = projectile.contact_damage;
        enemy.apply_damage(amount);
        projectile.kill();
        self.stats.enemy_hits += 1;
        CollisionEvent::EnemyDamaged { amount }
    }
}

/// Disjoint mutable access to two entities of a slice by handle
///
/// Returns `None` for self-pairs and for handles outside the slice, so a
/// stale or malformed pair degrades to a no-op instead of panicking.
pub fn pair_mut(
    entities: &mut [SimEntity],
    a: EntityId,
    b: EntityId,
) -> Option<(&mut SimEntity, &mut SimEntity)> {
    let (i, j) = (a.index(), b.index());
    if i == j || i >= entities.len() || j >= entities.len() {
        return None;
    }
    if i < j {
        let (left, right) = entities.split_at_mut(j);
        Some((&mut left[i], &mut right[0]))
    } else {
        let (left, right) = entities.split_at_mut(i);
        Some((&mut right[0], &mut left[j]))
    }
}
