//! Core collision detection system
//!
//! Ties the subsystem together once per simulation tick: density-tuned
//! grid rebuild, broad-phase pair enumeration, narrow-phase circle tests,
//! and response dispatch. The whole cycle runs to completion before the
//! caller renders; nothing here suspends or yields.

use log::{debug, trace};

use crate::config::CollisionConfig;
use crate::entity::{Collidable, EntityId, SimEntity};
use crate::physics::collision::CircleHull;
use crate::physics::collision_filter::PairFilter;
use crate::physics::collision_response::{
    pair_mut, CollisionEvent, CollisionResponder, ResponseStats,
};
use crate::spatial::density::DensityTuner;
use crate::spatial::grid::{GridIndex, FORWARD_NEIGHBOR_OFFSETS};

/// Collision pair representing two entities that are colliding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionPair {
    /// First entity (always the smaller handle)
    pub a: EntityId,
    /// Second entity
    pub b: EntityId,
}

impl CollisionPair {
    /// Create a new collision pair (always stores the smaller handle first)
    pub fn new(a: EntityId, b: EntityId) -> Self {
        if a < b {
            Self { a, b }
        } else {
            Self { a: b, b: a }
        }
    }
}

/// Per-tick statistics block for diagnostics and telemetry overlays
#[derive(Debug, Default, Clone, Copy)]
pub struct CollisionStats {
    /// Populated grid cells this tick
    pub cells_processed: usize,
    /// Narrow-phase tests performed
    pub collisions_checked: u64,
    /// Narrow-phase tests that found an overlap
    pub collisions_detected: u64,
    /// Live entities divided by populated cells
    pub avg_entities_per_cell: f64,
}

impl CollisionStats {
    /// Ratio of detected overlaps to narrow-phase tests
    pub fn efficiency(&self) -> f64 {
        self.collisions_detected as f64 / self.collisions_checked.max(1) as f64
    }
}

/// Walks populated cells to enumerate each unordered candidate pair once
///
/// Within a cell, pairs come from index ordering. Across cells, only the
/// forward neighbor offsets are walked (see
/// [`FORWARD_NEIGHBOR_OFFSETS`]), so no deduplication set is needed.
#[derive(Debug, Default)]
pub struct BroadPhaseScanner;

impl BroadPhaseScanner {
    /// Enumerate, gate, and narrow-test candidate pairs over the grid
    ///
    /// Returns every colliding pair. `stats` picks up the checked and
    /// detected counters.
    pub fn scan<T: Collidable>(
        &self,
        grid: &GridIndex,
        entities: &[T],
        filter: &PairFilter,
        stats: &mut CollisionStats,
    ) -> Vec<CollisionPair> {
        let mut hits = Vec::new();

        for (key, residents) in grid.cells() {
            for (i, &a) in residents.iter().enumerate() {
                for &b in &residents[i + 1..] {
                    Self::test_pair(a, b, entities, filter, stats, &mut hits);
                }
            }

            for (dx, dy) in FORWARD_NEIGHBOR_OFFSETS {
                let Some(neighbors) = grid.cell(key.offset(dx, dy)) else {
                    continue;
                };
                for &a in residents {
                    for &b in neighbors {
                        Self::test_pair(a, b, entities, filter, stats, &mut hits);
                    }
                }
            }
        }

        hits
    }

    fn test_pair<T: Collidable>(
        a: EntityId,
        b: EntityId,
        entities: &[T],
        filter: &PairFilter,
        stats: &mut CollisionStats,
        hits: &mut Vec<CollisionPair>,
    ) {
        if a == b {
            return;
        }
        let (Some(entity_a), Some(entity_b)) = (entities.get(a.index()), entities.get(b.index()))
        else {
            return;
        };
        if entity_a.is_dead() || entity_b.is_dead() {
            return;
        }
        if !filter.can_collide(entity_a.kind(), entity_b.kind()) {
            return;
        }

        stats.collisions_checked += 1;
        let hull_a = CircleHull::new(entity_a.position(), entity_a.radius());
        let hull_b = CircleHull::new(entity_b.position(), entity_b.radius());
        if hull_a.intersects(&hull_b) {
            stats.collisions_detected += 1;
            hits.push(CollisionPair::new(a, b));
        }
    }
}

/// The collision subsystem: grid, tuner, filter, scanner, and responder
///
/// Owns all collision state for the duration of a tick; entities remain
/// owned by the caller and are passed in fresh every tick.
pub struct CollisionSystem {
    grid: GridIndex,
    tuner: DensityTuner,
    filter: PairFilter,
    scanner: BroadPhaseScanner,
    responder: CollisionResponder,
    stats: CollisionStats,
    events: Vec<(CollisionPair, CollisionEvent)>,
    tick_count: u64,
}

impl CollisionSystem {
    /// Create a collision system from config
    pub fn new(config: &CollisionConfig) -> Self {
        let tuner = DensityTuner::new(
            config.density.clone(),
            config.sample_interval_ticks,
            config.resample_delta,
        );
        Self {
            grid: GridIndex::new(tuner.current_cell_size()),
            tuner,
            filter: PairFilter::from_rules(&config.pair_rules),
            scanner: BroadPhaseScanner,
            responder: CollisionResponder::new(),
            stats: CollisionStats::default(),
            events: Vec::new(),
            tick_count: 0,
        }
    }

    /// Run one full rebuild-scan-respond cycle
    ///
    /// Detection runs over a snapshot of the slice; response then mutates
    /// entities pair by pair, re-checking liveness before each dispatch so
    /// a kill earlier in the tick suppresses later pairs touching the same
    /// entity.
    pub fn tick(&mut self, entities: &mut [SimEntity]) -> &CollisionStats {
        self.tick_count += 1;
        self.stats = CollisionStats::default();
        self.events.clear();

        let live = entities.iter().filter(|entity| !entity.is_dead).count();
        if let Some(cell_size) = self.tuner.sample(live as u32) {
            debug!("density retune: {live} live entities -> cell size {cell_size}");
            self.grid.set_cell_size(cell_size);
        }

        self.grid.rebuild_if_needed(entities);
        self.stats.cells_processed = self.grid.populated_cell_count();
        self.stats.avg_entities_per_cell =
            live as f64 / self.stats.cells_processed.max(1) as f64;

        let pairs = self
            .scanner
            .scan(&self.grid, entities, &self.filter, &mut self.stats);

        for pair in pairs {
            let Some((a, b)) = pair_mut(entities, pair.a, pair.b) else {
                continue;
            };
            if let Some(event) = self.responder.handle(a, b) {
                trace!("collision {:?}/{:?}: {event:?}", pair.a, pair.b);
                self.events.push((pair, event));
            }
        }

        debug!(
            "tick {}: {} cells, {} checked, {} detected, efficiency {:.3}",
            self.tick_count,
            self.stats.cells_processed,
            self.stats.collisions_checked,
            self.stats.collisions_detected,
            self.stats.efficiency(),
        );

        &self.stats
    }

    /// Statistics from the most recent tick
    pub fn stats(&self) -> &CollisionStats {
        &self.stats
    }

    /// Response effects applied during the most recent tick
    pub fn events(&self) -> &[(CollisionPair, CollisionEvent)] {
        &self.events
    }

    /// Cumulative response statistics
    pub fn response_stats(&self) -> &ResponseStats {
        self.responder.stats()
    }

    /// The spatial grid (for diagnostics and utility queries)
    pub fn grid(&self) -> &GridIndex {
        &self.grid
    }

    /// The active pair filter
    pub fn filter(&self) -> &PairFilter {
        &self.filter
    }

    /// Ticks processed since construction
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
