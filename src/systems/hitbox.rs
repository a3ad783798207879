//! Hitbox observer.
//!
//! Turns trigger overlaps of [`Hitbox`] colliders into queued attack intents.
//! The queue is drained after collision resolution in the same tick, and the
//! grace invulnerability of the first hit keeps a lingering hitbox from landing
//! again on the following ticks.
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::combat::Combat;
use crate::components::hitbox::Hitbox;
use crate::events::collision::TriggerEvent;
use crate::resources::attackqueue::{AttackIntent, AttackQueue};

pub fn queue_hitbox_attacks(
    trigger: On<TriggerEvent>,
    hitboxes: Query<&Hitbox>,
    fighters: Query<(), With<Combat>>,
    mut queue: ResMut<AttackQueue>,
) {
    let event = trigger.event();
    let Ok(hitbox) = hitboxes.get(event.trigger) else {
        return;
    };
    if event.other == hitbox.owner || !fighters.contains(event.other) {
        return;
    }
    debug!(
        "hitbox {:?} of {:?} struck {:?}",
        event.trigger, hitbox.owner, event.other
    );
    queue.push(
        AttackIntent::new(
            hitbox.owner,
            event.other,
            hitbox.attack_type,
            hitbox.base_damage,
        )
        .with_timing(hitbox.timing_ms),
    );
}
