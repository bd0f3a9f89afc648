//! Uniform-grid spatial hash
//!
//! Buckets entities into square cells keyed by their floor-divided position.
//! The grid is per-tick derived state: it is rebuilt whenever the tracked
//! entity set changed, and reused unchanged otherwise.

use std::collections::HashMap;

use log::debug;

use crate::entity::{Collidable, EntityId};
use crate::foundation::math::{is_finite, Vec2};

/// Forward-only neighbor directions walked by the broad phase
///
/// Exactly these four of the eight neighbor directions, never the reverse
/// set: each unordered cross-cell pair is then visited exactly once across
/// the whole grid, with no seen-pairs bookkeeping. All eight would report
/// every cross-cell pair twice; fewer than these four drops pairs that
/// straddle a cell boundary.
pub const FORWARD_NEIGHBOR_OFFSETS: [(i64, i64); 4] = [(1, 0), (0, 1), (1, 1), (-1, 1)];

/// Discretized grid coordinate a continuous position hashes into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellKey {
    /// Cell column
    pub x: i64,
    /// Cell row
    pub y: i64,
}

impl CellKey {
    /// Compute the cell containing a world-space position
    pub fn for_position(position: Vec2, cell_size: f64) -> Self {
        Self {
            x: (position.x / cell_size).floor() as i64,
            y: (position.y / cell_size).floor() as i64,
        }
    }

    /// The key offset by a neighbor direction
    pub fn offset(self, dx: i64, dy: i64) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }
}

/// Spatial hash mapping cell keys to the entities resident in each cell
///
/// Dead entities and entities with non-finite coordinates are never
/// inserted; every other entity lands in exactly one cell per rebuild.
pub struct GridIndex {
    cell_size: f64,
    cells: HashMap<CellKey, Vec<EntityId>>,
    /// Live-entity snapshot from the last rebuild, in slice order
    tracked: Vec<(EntityId, CellKey)>,
    dirty: bool,
}

impl GridIndex {
    /// Create an empty grid with the given cell size
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size: cell_size.max(f64::EPSILON),
            cells: HashMap::new(),
            tracked: Vec::new(),
            dirty: true,
        }
    }

    /// Current cell size
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Change the cell size; forces a rebuild when the size actually changed
    pub fn set_cell_size(&mut self, cell_size: f64) {
        let cell_size = cell_size.max(f64::EPSILON);
        if (cell_size - self.cell_size).abs() > f64::EPSILON {
            self.cell_size = cell_size;
            self.dirty = true;
        }
    }

    /// Force the next `rebuild_if_needed` call to rebuild
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Rebuild the cell map unless the tracked entity set is provably
    /// unchanged since the last rebuild
    ///
    /// Returns `true` when a rebuild happened. Skipping is purely an
    /// optimization: the reused grid is identical to what a rebuild would
    /// produce, since any entity addition, removal, death, or cross-cell
    /// movement fails the unchanged check.
    pub fn rebuild_if_needed<T: Collidable>(&mut self, entities: &[T]) -> bool {
        if !self.dirty && self.is_unchanged(entities) {
            return false;
        }
        self.rebuild(entities);
        true
    }

    fn rebuild<T: Collidable>(&mut self, entities: &[T]) {
        self.cells.clear();
        self.tracked.clear();

        for (index, entity) in entities.iter().enumerate() {
            if entity.is_dead() || !is_finite(entity.position()) {
                continue;
            }
            let id = EntityId::new(index);
            let key = CellKey::for_position(entity.position(), self.cell_size);
            self.cells.entry(key).or_default().push(id);
            self.tracked.push((id, key));
        }

        self.dirty = false;
        debug!(
            "grid rebuilt: {} entities across {} cells (cell size {})",
            self.tracked.len(),
            self.cells.len(),
            self.cell_size,
        );
    }

    /// True when the live-entity sequence and every cell key match the
    /// snapshot from the last rebuild
    fn is_unchanged<T: Collidable>(&self, entities: &[T]) -> bool {
        let mut tracked = self.tracked.iter();
        for (index, entity) in entities.iter().enumerate() {
            if entity.is_dead() || !is_finite(entity.position()) {
                continue;
            }
            let key = CellKey::for_position(entity.position(), self.cell_size);
            match tracked.next() {
                Some(&(id, tracked_key)) if id.index() == index && tracked_key == key => {}
                _ => return false,
            }
        }
        tracked.next().is_none()
    }

    /// Iterate populated cells and their residents
    pub fn cells(&self) -> impl Iterator<Item = (CellKey, &[EntityId])> + '_ {
        self.cells.iter().map(|(key, residents)| (*key, residents.as_slice()))
    }

    /// Residents of one cell, if populated
    pub fn cell(&self, key: CellKey) -> Option<&[EntityId]> {
        self.cells.get(&key).map(Vec::as_slice)
    }

    /// Number of populated cells
    pub fn populated_cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of live entities indexed by the last rebuild
    pub fn tracked_live_count(&self) -> usize {
        self.tracked.len()
    }

    /// Entities whose center lies within `radius` of `center`
    ///
    /// A utility lookup for aiming and pickup-magnet style queries; this is
    /// not the narrow phase and uses an inclusive distance test.
    pub fn query_circle<T: Collidable>(
        &self,
        entities: &[T],
        center: Vec2,
        radius: f64,
    ) -> Vec<EntityId> {
        if !is_finite(center) || !radius.is_finite() || radius < 0.0 {
            return Vec::new();
        }

        let min = CellKey::for_position(center - Vec2::new(radius, radius), self.cell_size);
        let max = CellKey::for_position(center + Vec2::new(radius, radius), self.cell_size);
        let radius_squared = radius * radius;

        let mut found = Vec::new();
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                let Some(residents) = self.cells.get(&CellKey { x, y }) else {
                    continue;
                };
                for &id in residents {
                    let Some(entity) = entities.get(id.index()) else {
                        continue;
                    };
                    if (entity.position() - center).norm_squared() <= radius_squared {
                        found.push(id);
                    }
                }
            }
        }
        found
    }

    /// Drop all cells and tracking state
    pub fn clear(&mut self) {
        self.cells.clear();
        self.tracked.clear();
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::SimEntity;

    fn enemy_at(x: f64, y: f64) -> SimEntity {
        SimEntity::enemy(Vec2::new(x, y), 10.0, 5.0)
    }

    #[test]
    fn test_cell_key_floor_division() {
        let key = CellKey::for_position(Vec2::new(150.0, -10.0), 100.0);
        assert_eq!(key, CellKey { x: 1, y: -1 });

        let origin = CellKey::for_position(Vec2::new(0.0, 0.0), 100.0);
        assert_eq!(origin, CellKey { x: 0, y: 0 });
    }

    #[test]
    fn test_every_live_entity_in_exactly_one_cell() {
        let entities = vec![
            enemy_at(10.0, 10.0),
            enemy_at(150.0, 10.0),
            enemy_at(-20.0, 250.0),
        ];
        let mut grid = GridIndex::new(100.0);
        grid.rebuild_if_needed(&entities);

        for (index, entity) in entities.iter().enumerate() {
            let expected = CellKey::for_position(entity.position, 100.0);
            let mut appearances = 0;
            for (key, residents) in grid.cells() {
                for &id in residents {
                    if id.index() == index {
                        appearances += 1;
                        assert_eq!(key, expected);
                    }
                }
            }
            assert_eq!(appearances, 1);
        }
    }

    #[test]
    fn test_dead_entities_excluded() {
        let mut entities = vec![enemy_at(10.0, 10.0), enemy_at(20.0, 20.0)];
        entities[1].kill();

        let mut grid = GridIndex::new(100.0);
        grid.rebuild_if_needed(&entities);

        assert_eq!(grid.tracked_live_count(), 1);
        for (_, residents) in grid.cells() {
            assert!(!residents.contains(&EntityId::new(1)));
        }
    }

    #[test]
    fn test_non_finite_positions_excluded() {
        let entities = vec![enemy_at(f64::NAN, 10.0), enemy_at(10.0, 10.0)];
        let mut grid = GridIndex::new(100.0);
        grid.rebuild_if_needed(&entities);
        assert_eq!(grid.tracked_live_count(), 1);
    }

    #[test]
    fn test_unchanged_entities_skip_rebuild() {
        let entities = vec![enemy_at(10.0, 10.0), enemy_at(150.0, 10.0)];
        let mut grid = GridIndex::new(100.0);

        assert!(grid.rebuild_if_needed(&entities));
        assert!(!grid.rebuild_if_needed(&entities));
        // The reused grid still holds everything.
        assert_eq!(grid.tracked_live_count(), 2);
        assert_eq!(grid.populated_cell_count(), 2);
    }

    #[test]
    fn test_cross_cell_movement_forces_rebuild() {
        let mut entities = vec![enemy_at(10.0, 10.0)];
        let mut grid = GridIndex::new(100.0);
        grid.rebuild_if_needed(&entities);

        // Movement within the same cell does not force a rebuild.
        entities[0].position = Vec2::new(90.0, 90.0);
        assert!(!grid.rebuild_if_needed(&entities));

        // Crossing a cell boundary does.
        entities[0].position = Vec2::new(110.0, 90.0);
        assert!(grid.rebuild_if_needed(&entities));
    }

    #[test]
    fn test_entity_death_forces_rebuild() {
        let mut entities = vec![enemy_at(10.0, 10.0), enemy_at(20.0, 20.0)];
        let mut grid = GridIndex::new(100.0);
        grid.rebuild_if_needed(&entities);

        entities[1].kill();
        assert!(grid.rebuild_if_needed(&entities));
        assert_eq!(grid.tracked_live_count(), 1);
    }

    #[test]
    fn test_cell_size_change_forces_rebuild() {
        let entities = vec![enemy_at(150.0, 10.0)];
        let mut grid = GridIndex::new(100.0);
        grid.rebuild_if_needed(&entities);

        grid.set_cell_size(200.0);
        assert!(grid.rebuild_if_needed(&entities));
        assert!(grid.cell(CellKey { x: 0, y: 0 }).is_some());

        // Setting the same size again is a no-op.
        grid.set_cell_size(200.0);
        assert!(!grid.rebuild_if_needed(&entities));
    }

    #[test]
    fn test_mark_dirty_and_clear() {
        let entities = vec![enemy_at(10.0, 10.0)];
        let mut grid = GridIndex::new(100.0);
        grid.rebuild_if_needed(&entities);
        assert!(!grid.rebuild_if_needed(&entities));

        grid.mark_dirty();
        assert!(grid.rebuild_if_needed(&entities));

        grid.clear();
        assert_eq!(grid.populated_cell_count(), 0);
        assert_eq!(grid.tracked_live_count(), 0);
        assert!(grid.rebuild_if_needed(&entities));
    }

    #[test]
    fn test_query_circle() {
        let entities = vec![
            enemy_at(10.0, 10.0),
            enemy_at(60.0, 10.0),
            enemy_at(500.0, 500.0),
        ];
        let mut grid = GridIndex::new(100.0);
        grid.rebuild_if_needed(&entities);

        let found = grid.query_circle(&entities, Vec2::new(0.0, 0.0), 80.0);
        assert_eq!(found.len(), 2);
        assert!(found.contains(&EntityId::new(0)));
        assert!(found.contains(&EntityId::new(1)));

        assert!(grid
            .query_circle(&entities, Vec2::new(f64::NAN, 0.0), 80.0)
            .is_empty());
    }
}
