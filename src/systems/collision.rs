//! Collision detection and resolution.
//!
//! Candidate pairs come from the [`SpatialGrid`]; each unordered pair is examined
//! once, lower serial first, and its events are triggered before the next pair is
//! looked at. Transforms, colliders and bodies are re-read for every pair, so
//! positions moved by earlier pairs and component changes made by observers are
//! taken into account.
//!
//! For a solid pair the boxes are separated along the axis of least penetration.
//! Bodies with [`Physics`] share the correction equally; a lone physics body takes
//! all of it and a pair with no physics body is reported but left in place. The
//! velocity component carrying a body into the other is reflected and scaled by
//! `restitution`, and a body pushed upward comes to rest (`grounded`). A push
//! never leaves the world rectangle; whatever part of its share a body cannot
//! take (a body resting on the floor, for instance) is handed to its partner.
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::debug;
use rustc_hash::FxHashSet;

use crate::components::collider::{Aabb, Collider};
use crate::components::identity::EntitySerial;
use crate::components::physics::Physics;
use crate::components::transform::Transform;
use crate::events::collision::{CollisionEvent, TriggerEvent};
use crate::resources::physicsconfig::PhysicsConfig;
use crate::resources::spatialgrid::SpatialGrid;
use crate::systems::physics::clamp_to_world;

/// Stable ordering key: creation serial, then the raw handle for unserialized entities.
fn order_key(world: &World, entity: Entity) -> (u64, u64) {
    let serial = world
        .get::<EntitySerial>(entity)
        .map_or(u64::MAX, |serial| serial.0);
    (serial, entity.to_bits())
}

fn current_bounds(world: &World, entity: Entity) -> Option<(Aabb, Collider)> {
    let transform = world.get::<Transform>(entity)?;
    let collider = world.get::<Collider>(entity)?;
    Some((collider.bounds(transform), *collider))
}

/// Separation of a pair: the axis normal (from `a` toward `b`) and the depth.
fn separation(a: &Aabb, b: &Aabb) -> (Vec2, f32) {
    let pen = a.penetration(b);
    let delta = b.center() - a.center();
    if pen.x < pen.y {
        let sign = if delta.x < 0.0 { -1.0 } else { 1.0 };
        (Vec2::new(sign, 0.0), pen.x)
    } else {
        let sign = if delta.y < 0.0 { -1.0 } else { 1.0 };
        (Vec2::new(0.0, sign), pen.y)
    }
}

/// Move `entity` by `push`, kept inside the world, and reflect its velocity if it
/// was heading along `-push`. Returns the part of `push` that could not be applied.
fn push_body(world: &mut World, entity: Entity, push: Vec2, config: &PhysicsConfig) -> Vec2 {
    let Some(mut transform) = world.get_mut::<Transform>(entity) else {
        return push;
    };
    transform.translate(push.x, push.y);
    let unclamped = transform.position;
    clamp_to_world(&mut transform, config);
    let leftover = unclamped - transform.position;
    drop(transform);

    let restitution = config.restitution;
    let Some(mut body) = world.get_mut::<Physics>(entity) else {
        return leftover;
    };
    let dir = push.normalize_or_zero();
    if dir.x != 0.0 && body.velocity.x * dir.x < 0.0 {
        body.velocity.x = -body.velocity.x * restitution;
    }
    if dir.y != 0.0 && body.velocity.y * dir.y < 0.0 {
        body.velocity.y = -body.velocity.y * restitution;
    }
    if dir.y < 0.0 {
        body.grounded = true;
    }
    leftover
}

fn resolve_pair(world: &mut World, a: Entity, b: Entity, config: &PhysicsConfig) {
    let Some((bounds_a, collider_a)) = current_bounds(world, a) else {
        return;
    };
    let Some((bounds_b, collider_b)) = current_bounds(world, b) else {
        return;
    };
    if !collider_a.interacts_with(&collider_b) || !bounds_a.overlaps(&bounds_b) {
        return;
    }

    if collider_a.is_trigger || collider_b.is_trigger {
        if collider_a.is_trigger {
            debug!("trigger {:?} touched by {:?}", a, b);
            world.trigger(TriggerEvent {
                trigger: a,
                other: b,
            });
        }
        if collider_b.is_trigger {
            debug!("trigger {:?} touched by {:?}", b, a);
            world.trigger(TriggerEvent {
                trigger: b,
                other: a,
            });
        }
        return;
    }

    let (normal, depth) = separation(&bounds_a, &bounds_b);
    let (share_a, share_b) = match (
        world.get::<Physics>(a).is_some(),
        world.get::<Physics>(b).is_some(),
    ) {
        (true, true) => (0.5, 0.5),
        (true, false) => (1.0, 0.0),
        (false, true) => (0.0, 1.0),
        (false, false) => (0.0, 0.0),
    };
    let mut leftover_a = Vec2::ZERO;
    if share_a > 0.0 {
        leftover_a = push_body(world, a, -normal * depth * share_a, config);
    }
    if share_b > 0.0 {
        let leftover_b = push_body(world, b, normal * depth * share_b - leftover_a, config);
        if share_a > 0.0 && leftover_b != Vec2::ZERO {
            push_body(world, a, -leftover_b, config);
        }
    }

    debug!(
        "collision {:?} <-> {:?} normal {:?} depth {}",
        a, b, normal, depth
    );
    world.trigger(CollisionEvent {
        a,
        b,
        layer_a: collider_a.layer,
        layer_b: collider_b.layer,
        normal,
        penetration: depth,
    });
}

/// Detect and resolve every overlapping collider pair for this tick.
pub fn collision_resolver(world: &mut World) {
    let config = world.resource::<PhysicsConfig>().clone();

    let mut colliders: Vec<Entity> = world
        .query_filtered::<Entity, (With<Collider>, With<Transform>)>()
        .iter(world)
        .collect();
    colliders.sort_by_key(|&e| order_key(world, e));

    let mut visited: FxHashSet<(Entity, Entity)> = FxHashSet::default();
    for a in colliders {
        let Some((bounds, _)) = current_bounds(world, a) else {
            continue;
        };
        let mut candidates = world.resource::<SpatialGrid>().query(
            bounds.min.x,
            bounds.min.y,
            bounds.width(),
            bounds.height(),
        );
        candidates.sort_by_key(|&e| order_key(world, e));

        for b in candidates {
            if a == b {
                continue;
            }
            let pair = if order_key(world, a) < order_key(world, b) {
                (a, b)
            } else {
                (b, a)
            };
            if !visited.insert(pair) {
                continue;
            }
            resolve_pair(world, pair.0, pair.1, &config);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separation_picks_shallowest_axis() {
        let a = Aabb::from_rect(Vec2::new(100.0, 100.0), Vec2::splat(20.0));
        let b = Aabb::from_rect(Vec2::new(110.0, 105.0), Vec2::splat(20.0));
        let (normal, depth) = separation(&a, &b);
        assert_eq!(normal, Vec2::X);
        assert!((depth - 10.0).abs() < 1e-5);

        let c = Aabb::from_rect(Vec2::new(102.0, 85.0), Vec2::splat(20.0));
        let (normal, depth) = separation(&a, &c);
        assert_eq!(normal, Vec2::NEG_Y);
        assert!((depth - 5.0).abs() < 1e-5);
    }
}
