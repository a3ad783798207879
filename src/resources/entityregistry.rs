//! Bookkeeping for the entity store.
//!
//! Hands out creation serials, keeps the tag index, and holds the destruction
//! queue drained by [`flush_destroyed`](crate::store::flush_destroyed). Mutated
//! only through [`crate::store`].

use bevy_ecs::prelude::{Entity, Resource};
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Resource, Debug, Default)]
pub struct EntityRegistry {
    next_serial: u64,
    tags: FxHashMap<String, FxHashSet<Entity>>,
    pending: Vec<Entity>,
    pending_set: FxHashSet<Entity>,
}

impl EntityRegistry {
    pub(crate) fn next_serial(&mut self) -> u64 {
        let serial = self.next_serial;
        self.next_serial += 1;
        serial
    }

    /// Serial the next created entity will receive.
    pub fn peek_serial(&self) -> u64 {
        self.next_serial
    }

    pub(crate) fn index_tag(&mut self, tag: &str, entity: Entity) {
        self.tags.entry(tag.to_string()).or_default().insert(entity);
    }

    pub(crate) fn unindex_tag(&mut self, tag: &str, entity: Entity) {
        if let Some(set) = self.tags.get_mut(tag) {
            set.remove(&entity);
            if set.is_empty() {
                self.tags.remove(tag);
            }
        }
    }

    /// Entities indexed under `tag`, in no particular order.
    pub fn tagged(&self, tag: &str) -> impl Iterator<Item = Entity> + '_ {
        self.tags.get(tag).into_iter().flatten().copied()
    }

    /// Queue `entity` for destruction. Returns `false` if it was already queued.
    pub(crate) fn queue_destroy(&mut self, entity: Entity) -> bool {
        if !self.pending_set.insert(entity) {
            return false;
        }
        self.pending.push(entity);
        true
    }

    pub fn is_pending(&self, entity: Entity) -> bool {
        self.pending_set.contains(&entity)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Take the destruction queue in the order entities were queued.
    pub(crate) fn drain_pending(&mut self) -> Vec<Entity> {
        self.pending_set.clear();
        std::mem::take(&mut self.pending)
    }
}
