//! Attack payload carried by a trigger collider.
//!
//! Spawn a [`Hitbox`] together with a trigger [`Collider`](super::collider::Collider)
//! (a sword swing, a projectile). When the trigger overlaps an entity with a
//! [`Combat`](super::combat::Combat) component other than `owner`, the
//! [`queue_hitbox_attacks`](crate::systems::hitbox::queue_hitbox_attacks) observer
//! queues an attack from `owner` against it, resolved later in the same tick.

use bevy_ecs::prelude::{Component, Entity};

use crate::components::combat::AttackType;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub owner: Entity,
    pub attack_type: AttackType,
    pub base_damage: f32,
    /// Input latency in milliseconds reported when the swing was started.
    pub timing_ms: f32,
}

impl Hitbox {
    pub fn new(owner: Entity, attack_type: AttackType, base_damage: f32) -> Self {
        Self {
            owner,
            attack_type,
            base_damage,
            timing_ms: f32::MAX,
        }
    }

    pub fn with_timing(mut self, timing_ms: f32) -> Self {
        self.timing_ms = timing_ms;
        self
    }
}
