//! Collision and trigger events.
//!
//! The collision resolver triggers these synchronously, one pair at a time, in
//! the order pairs are generated (ascending entity serial). Observers run before
//! the next pair is examined, so component changes they make are visible to the
//! rest of the pass.

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::collider::CollisionLayer;

/// Two solid colliders overlapped and were separated.
///
/// `a` always has the lower serial. `normal` points from `a` toward `b` along the
/// resolution axis; `penetration` is the overlap depth before separation.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub a: Entity,
    pub b: Entity,
    pub layer_a: CollisionLayer,
    pub layer_b: CollisionLayer,
    pub normal: Vec2,
    pub penetration: f32,
}

/// A trigger collider overlaps another collider. Nothing was moved.
///
/// Raised once per trigger side: two overlapping triggers produce two events.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerEvent {
    pub trigger: Entity,
    pub other: Entity,
}
