//! Entity/component store.
//!
//! Thin layer over the bevy [`World`] that adds what the simulation needs on top
//! of raw spawning: creation serials for deterministic ordering, a tag index,
//! removal by [`ComponentKind`], filtered queries, and deferred destruction.
//!
//! Destruction is two-phase. [`destroy_entity`] only queues the entity; it stays
//! fully readable until [`flush_destroyed`] runs at the end of the tick, which
//! removes it from the tag index, despawns it with all its components and raises
//! an [`EntityDestroyedEvent`].
//!
//! Every function returning a set of entities sorts it by creation serial.

use bevy_ecs::prelude::*;
use bevy_ecs::world::EntityRef;
use log::{debug, warn};

use crate::components::identity::{EntitySerial, Tag};
use crate::components::kind::ComponentKind;
use crate::components::transform::Transform;
use crate::events::lifecycle::EntityDestroyedEvent;
use crate::resources::entityregistry::EntityRegistry;

/// Filter for [`query`]. Build with the chained helpers:
///
/// ```ignore
/// let q = EntityQuery::new()
///     .with(ComponentKind::Combat)
///     .without(ComponentKind::Physics)
///     .tagged("enemy")
///     .matching(|e| e.get::<Combat>().is_some_and(|c| c.health < 50.0));
/// let wounded = store::query(&world, &q);
/// ```
#[derive(Default)]
pub struct EntityQuery<'a> {
    pub with: Vec<ComponentKind>,
    pub without: Vec<ComponentKind>,
    pub tag: Option<String>,
    pub predicate: Option<Box<dyn Fn(&EntityRef<'_>) -> bool + 'a>>,
}

impl<'a> EntityQuery<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: ComponentKind) -> Self {
        self.with.push(kind);
        self
    }

    pub fn without(mut self, kind: ComponentKind) -> Self {
        self.without.push(kind);
        self
    }

    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn matching(mut self, predicate: impl Fn(&EntityRef<'_>) -> bool + 'a) -> Self {
        self.predicate = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, entity: &EntityRef<'_>) -> bool {
        if !self.with.iter().all(|kind| kind.is_present(entity)) {
            return false;
        }
        if self.without.iter().any(|kind| kind.is_present(entity)) {
            return false;
        }
        if let Some(tag) = &self.tag
            && entity.get::<Tag>().is_none_or(|t| t.name() != tag)
        {
            return false;
        }
        self.predicate.as_ref().is_none_or(|p| p(entity))
    }
}

/// Spawn an entity with a transform, an optional tag and the next serial.
pub fn create_entity(world: &mut World, tag: Option<&str>, transform: Transform) -> Entity {
    let serial = world
        .get_resource_or_init::<EntityRegistry>()
        .next_serial();
    let entity = world.spawn((EntitySerial(serial), transform)).id();
    if let Some(tag) = tag {
        world.entity_mut(entity).insert(Tag::new(tag));
        world.resource_mut::<EntityRegistry>().index_tag(tag, entity);
    }
    debug!("created entity {:?} (serial {}, tag {:?})", entity, serial, tag);
    entity
}

/// Queue `entity` for destruction at the end of the tick.
///
/// Returns `true` when the entity was newly queued. Destroying an entity twice
/// is harmless; destroying an unknown entity logs a warning.
pub fn destroy_entity(world: &mut World, entity: Entity) -> bool {
    if world.get_entity(entity).is_err() {
        warn!("destroy_entity: unknown entity {:?}", entity);
        return false;
    }
    world
        .get_resource_or_init::<EntityRegistry>()
        .queue_destroy(entity)
}

pub fn is_pending_destroy(world: &World, entity: Entity) -> bool {
    world
        .get_resource::<EntityRegistry>()
        .is_some_and(|registry| registry.is_pending(entity))
}

/// Whether the entity exists (queued entities still exist until the flush).
pub fn exists(world: &World, entity: Entity) -> bool {
    world.get_entity(entity).is_ok()
}

pub fn serial_of(world: &World, entity: Entity) -> Option<u64> {
    world.get::<EntitySerial>(entity).map(|serial| serial.0)
}

pub fn tag_of(world: &World, entity: Entity) -> Option<&str> {
    world.get::<Tag>(entity).map(Tag::name)
}

/// Attach (or replace) a component. Returns `false` for unknown entities.
pub fn add_component<C: Component>(world: &mut World, entity: Entity, component: C) -> bool {
    match world.get_entity_mut(entity) {
        Ok(mut entity_mut) => {
            entity_mut.insert(component);
            true
        }
        Err(_) => {
            warn!("add_component: unknown entity {:?}", entity);
            false
        }
    }
}

/// Remove a component by kind. The transform is mandatory and cannot be removed.
pub fn remove_component(world: &mut World, entity: Entity, kind: ComponentKind) -> bool {
    if kind == ComponentKind::Transform {
        warn!("remove_component: transform is mandatory on {:?}", entity);
        return false;
    }
    match world.get_entity_mut(entity) {
        Ok(mut entity_mut) => kind.remove_from(&mut entity_mut),
        Err(_) => {
            warn!("remove_component: unknown entity {:?}", entity);
            false
        }
    }
}

pub fn get_component<C: Component>(world: &World, entity: Entity) -> Option<&C> {
    world.get::<C>(entity)
}

pub fn has_component(world: &World, entity: Entity, kind: ComponentKind) -> bool {
    world
        .get_entity(entity)
        .is_ok_and(|entity_ref| kind.is_present(&entity_ref))
}

fn sorted_by_serial(world: &World, mut entities: Vec<Entity>) -> Vec<Entity> {
    entities.sort_by_key(|&e| (serial_of(world, e).unwrap_or(u64::MAX), e.to_bits()));
    entities
}

/// All store-created entities, in serial order.
pub fn all_entities(world: &World) -> Vec<Entity> {
    let Some(mut state) = world.try_query::<(Entity, &EntitySerial)>() else {
        return Vec::new();
    };
    let mut entities: Vec<(u64, Entity)> =
        state.iter(world).map(|(e, serial)| (serial.0, e)).collect();
    entities.sort_unstable_by_key(|&(serial, _)| serial);
    entities.into_iter().map(|(_, e)| e).collect()
}

/// Entities carrying every kind in `kinds`.
pub fn entities_with_components(world: &World, kinds: &[ComponentKind]) -> Vec<Entity> {
    all_entities(world)
        .into_iter()
        .filter(|&e| kinds.iter().all(|&kind| has_component(world, e, kind)))
        .collect()
}

pub fn entities_with_tag(world: &World, tag: &str) -> Vec<Entity> {
    let Some(registry) = world.get_resource::<EntityRegistry>() else {
        return Vec::new();
    };
    sorted_by_serial(world, registry.tagged(tag).collect())
}

/// Entities accepted by every criterion of `filter`.
pub fn query(world: &World, filter: &EntityQuery<'_>) -> Vec<Entity> {
    let candidates = match &filter.tag {
        Some(tag) => entities_with_tag(world, tag),
        None => all_entities(world),
    };
    candidates
        .into_iter()
        .filter(|&e| {
            world
                .get_entity(e)
                .is_ok_and(|entity_ref| filter.accepts(&entity_ref))
        })
        .collect()
}

/// Purge every queued entity. Returns how many were destroyed.
pub fn flush_destroyed(world: &mut World) -> usize {
    let pending = match world.get_resource_mut::<EntityRegistry>() {
        Some(mut registry) => registry.drain_pending(),
        None => return 0,
    };

    let mut destroyed = 0;
    for entity in pending {
        let Ok(entity_mut) = world.get_entity_mut(entity) else {
            continue;
        };
        let serial = entity_mut.get::<EntitySerial>().map_or(u64::MAX, |s| s.0);
        let tag = entity_mut.get::<Tag>().map(|t| t.name().to_string());
        entity_mut.despawn();

        if let Some(tag) = &tag {
            world.resource_mut::<EntityRegistry>().unindex_tag(tag, entity);
        }
        debug!("destroyed entity {:?} (serial {})", entity, serial);
        world.trigger(EntityDestroyedEvent {
            entity,
            serial,
            tag,
        });
        destroyed += 1;
    }
    destroyed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::physics::Physics;

    #[test]
    fn tags_and_serials_are_assigned() {
        let mut world = World::new();
        let a = create_entity(&mut world, Some("enemy"), Transform::default());
        let b = create_entity(&mut world, None, Transform::default());
        assert_eq!(serial_of(&world, a), Some(0));
        assert_eq!(serial_of(&world, b), Some(1));
        assert_eq!(tag_of(&world, a), Some("enemy"));
        assert_eq!(tag_of(&world, b), None);
    }

    #[test]
    fn transform_cannot_be_removed() {
        let mut world = World::new();
        let e = create_entity(&mut world, None, Transform::default());
        assert!(!remove_component(&mut world, e, ComponentKind::Transform));
        assert!(has_component(&world, e, ComponentKind::Transform));
    }

    #[test]
    fn remove_by_kind_reports_presence() {
        let mut world = World::new();
        let e = create_entity(&mut world, None, Transform::default());
        assert!(add_component(&mut world, e, Physics::new(1.0)));
        assert!(remove_component(&mut world, e, ComponentKind::Physics));
        assert!(!remove_component(&mut world, e, ComponentKind::Physics));
    }
}
