//! Combat log observer.
use bevy_ecs::prelude::*;

use crate::events::combat::CombatEvent;
use crate::events::lifecycle::EntityDestroyedEvent;
use crate::resources::combatlog::CombatLog;
use crate::resources::worldtime::WorldTime;

/// Append every combat event to the [`CombatLog`], stamped with world time.
pub fn record_combat_event(
    trigger: On<CombatEvent>,
    time: Res<WorldTime>,
    mut log: ResMut<CombatLog>,
) {
    log.record(time.elapsed, trigger.event());
}

/// Drop the running totals of a purged entity.
pub fn release_combat_totals(trigger: On<EntityDestroyedEvent>, mut log: ResMut<CombatLog>) {
    log.release(trigger.event().entity);
}
