//! Force, impulse and knockback entry points.
//!
//! These operate on an entity id so callers outside the ECS (input handlers, AI,
//! combat resolution) do not need a query. Each returns `false` and logs a
//! warning when the entity has no [`Physics`] component.
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::warn;

use crate::components::physics::Physics;

fn with_body(world: &mut World, entity: Entity, op: &str, f: impl FnOnce(&mut Physics)) -> bool {
    match world.get_mut::<Physics>(entity) {
        Some(mut body) => {
            f(&mut body);
            true
        }
        None => {
            warn!("{}: entity {:?} has no physics body", op, entity);
            false
        }
    }
}

/// `acceleration += force / mass`, consumed by the next integration.
pub fn apply_force(world: &mut World, entity: Entity, force: Vec2) -> bool {
    with_body(world, entity, "apply_force", |body| body.apply_force(force))
}

/// `velocity += impulse / mass`, immediately.
pub fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec2) -> bool {
    with_body(world, entity, "apply_impulse", |body| {
        body.apply_impulse(impulse)
    })
}

/// Impulse of `magnitude` along `angle` (radians, 0 = +x, y grows downward).
pub fn apply_knockback(world: &mut World, entity: Entity, magnitude: f32, angle: f32) -> bool {
    let impulse = Vec2::from_angle(angle) * magnitude;
    with_body(world, entity, "apply_knockback", |body| {
        body.apply_impulse(impulse)
    })
}
