//! Uniform-grid broad phase.
//!
//! Entities are bucketed into every cell their bounding rectangle touches, keyed
//! by `(floor(x / cell_size), floor(y / cell_size))`. Queries return the union of
//! the buckets a rectangle touches, so results can contain entities that do not
//! actually overlap the rectangle; the narrow phase filters them out.
//!
//! The grid is cleared and refilled every tick by
//! [`rebuild_spatial_grid`](crate::systems::spatialgrid::rebuild_spatial_grid).

use bevy_ecs::prelude::{Entity, Resource};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

/// Smallest cell size accepted. Anything finer fans colliders out over too many cells.
pub const MIN_CELL_SIZE: f32 = 1.0;
const DEFAULT_CELL_SIZE: f32 = 64.0;

fn sanitize(cell_size: f32) -> f32 {
    if cell_size.is_finite() {
        cell_size.max(MIN_CELL_SIZE)
    } else {
        DEFAULT_CELL_SIZE
    }
}

type Cell = (i32, i32);

#[derive(Resource, Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: FxHashMap<Cell, SmallVec<[Entity; 8]>>,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: sanitize(cell_size),
            cells: FxHashMap::default(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Change the cell size. Existing contents are discarded.
    pub fn set_cell_size(&mut self, cell_size: f32) {
        self.cell_size = sanitize(cell_size);
        self.cells.clear();
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn cell_of(&self, v: f32) -> i32 {
        (v / self.cell_size).floor() as i32
    }

    fn cell_range(&self, x: f32, y: f32, w: f32, h: f32) -> (Cell, Cell) {
        let (w, h) = (w.max(0.0), h.max(0.0));
        (
            (self.cell_of(x), self.cell_of(y)),
            (self.cell_of(x + w), self.cell_of(y + h)),
        )
    }

    /// Insert `entity` into every cell overlapped by the rectangle.
    pub fn insert(&mut self, entity: Entity, x: f32, y: f32, w: f32, h: f32) {
        let ((x0, y0), (x1, y1)) = self.cell_range(x, y, w, h);
        for cy in y0..=y1 {
            for cx in x0..=x1 {
                self.cells.entry((cx, cy)).or_default().push(entity);
            }
        }
    }

    /// Entities in the cells overlapped by the rectangle, without duplicates.
    pub fn query(&self, x: f32, y: f32, w: f32, h: f32) -> Vec<Entity> {
        let ((x0, y0), (x1, y1)) = self.cell_range(x, y, w, h);
        let mut seen: FxHashSet<Entity> = FxHashSet::default();
        let mut out = Vec::new();
        for cy in y0..=y1 {
            for cx in x0..=x1 {
                let Some(bucket) = self.cells.get(&(cx, cy)) else {
                    continue;
                };
                for &entity in bucket {
                    if seen.insert(entity) {
                        out.push(entity);
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::world::World;

    fn entities(n: usize) -> Vec<Entity> {
        let mut world = World::new();
        (0..n).map(|_| world.spawn_empty().id()).collect()
    }

    #[test]
    fn query_finds_entity_in_touched_cell() {
        let e = entities(1)[0];
        let mut grid = SpatialGrid::new(64.0);
        grid.insert(e, 70.0, 70.0, 10.0, 10.0);
        assert_eq!(grid.query(60.0, 60.0, 20.0, 20.0), vec![e]);
        assert!(grid.query(200.0, 200.0, 10.0, 10.0).is_empty());
    }

    #[test]
    fn spanning_entity_is_reported_once() {
        let e = entities(1)[0];
        let mut grid = SpatialGrid::new(64.0);
        grid.insert(e, 50.0, 50.0, 100.0, 100.0);
        assert_eq!(grid.cell_count(), 9);
        assert_eq!(grid.query(0.0, 0.0, 200.0, 200.0), vec![e]);
    }

    #[test]
    fn negative_coordinates_floor_toward_negative_infinity() {
        let es = entities(2);
        let mut grid = SpatialGrid::new(64.0);
        grid.insert(es[0], -10.0, -10.0, 5.0, 5.0);
        grid.insert(es[1], 10.0, 10.0, 5.0, 5.0);
        assert_eq!(grid.query(-20.0, -20.0, 5.0, 5.0), vec![es[0]]);
    }

    #[test]
    fn degenerate_cell_sizes_are_floored() {
        let e = entities(1)[0];
        let mut grid = SpatialGrid::new(0.0);
        assert_eq!(grid.cell_size(), MIN_CELL_SIZE);
        grid.insert(e, 0.0, 0.0, 1.0, 1.0);
        assert_eq!(grid.cell_count(), 4);

        grid.set_cell_size(f32::NAN);
        assert_eq!(grid.cell_size(), 64.0);
        grid.set_cell_size(-8.0);
        assert_eq!(grid.cell_size(), MIN_CELL_SIZE);
    }

    #[test]
    fn clear_empties_every_cell() {
        let e = entities(1)[0];
        let mut grid = SpatialGrid::new(32.0);
        grid.insert(e, 0.0, 0.0, 10.0, 10.0);
        grid.clear();
        assert_eq!(grid.cell_count(), 0);
        assert!(grid.query(0.0, 0.0, 10.0, 10.0).is_empty());
    }
}
