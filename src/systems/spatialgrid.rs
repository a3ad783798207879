//! Broad-phase rebuild.
//!
//! Clears the [`SpatialGrid`] and inserts the bounds of every collider. Runs after
//! integration so the grid reflects this tick's positions.
use bevy_ecs::prelude::*;

use crate::components::collider::Collider;
use crate::components::transform::Transform;
use crate::resources::physicsconfig::PhysicsConfig;
use crate::resources::spatialgrid::SpatialGrid;

pub fn rebuild_spatial_grid(
    mut grid: ResMut<SpatialGrid>,
    config: Res<PhysicsConfig>,
    query: Query<(Entity, &Transform, &Collider)>,
) {
    if grid.cell_size() != config.cell_size {
        grid.set_cell_size(config.cell_size);
    }
    grid.clear();
    for (entity, transform, collider) in query.iter() {
        let bounds = collider.bounds(transform);
        grid.insert(
            entity,
            bounds.min.x,
            bounds.min.y,
            bounds.width(),
            bounds.height(),
        );
    }
}
