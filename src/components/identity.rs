//! Entity identity components.
//!
//! [`EntitySerial`] is the creation-order number handed out by the store and is
//! what every set-returning query sorts by. [`Tag`] is the optional category label;
//! it can only be set through the store so the tag index never drifts from it.

use bevy_ecs::prelude::Component;

/// Monotonically increasing creation number. Never reused.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntitySerial(pub u64);

/// Category label such as `"player"` or `"enemy"`.
#[derive(Component, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tag(String);

impl Tag {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Tag(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}
