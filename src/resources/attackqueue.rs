//! Attack intents waiting to be resolved.
//!
//! Input handlers, AI and the hitbox observer push [`AttackIntent`]s here; the
//! [`process_attack_intents`](crate::systems::attack::process_attack_intents)
//! system drains the queue in push order once per tick, after collisions.

use bevy_ecs::prelude::{Entity, Resource};

use crate::components::combat::AttackType;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackIntent {
    pub attacker: Entity,
    pub target: Entity,
    pub attack_type: AttackType,
    pub base_damage: f32,
    /// Input latency in milliseconds; below the perfect-timing threshold earns a bonus.
    pub timing_ms: f32,
}

impl AttackIntent {
    /// Intent with no timing bonus.
    pub fn new(attacker: Entity, target: Entity, attack_type: AttackType, base_damage: f32) -> Self {
        Self {
            attacker,
            target,
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

#[derive(Resource, Debug, Default)]
pub struct AttackQueue {
    intents: Vec<AttackIntent>,
}

impl AttackQueue {
    pub fn push(&mut self, intent: AttackIntent) {
        self.intents.push(intent);
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttackIntent> {
        self.intents.iter()
    }

    pub(crate) fn take(&mut self) -> Vec<AttackIntent> {
        std::mem::take(&mut self.intents)
    }
}
