//! Entity lifecycle notifications.
//!
//! [`EntityDestroyedEvent`] is raised by the destruction pass once per purged
//! entity, after its components are gone. Collaborators that mirror entities
//! (sprites, sound emitters) use it to drop their own state.

use bevy_ecs::prelude::*;

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct EntityDestroyedEvent {
    pub entity: Entity,
    pub serial: u64,
    pub tag: Option<String>,
}
