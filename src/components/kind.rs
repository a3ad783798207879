//! Runtime component-kind selector.
//!
//! Typed access goes through `get_component::<C>()`; [`ComponentKind`] covers the
//! places where the kind is data: presence checks, removal by kind, and
//! `with`/`without` lists in store queries. Kinds parse from their lowercase
//! names so they can come from scripts or config.

use std::fmt;
use std::str::FromStr;

use bevy_ecs::world::{EntityRef, EntityWorldMut};

use crate::components::collider::Collider;
use crate::components::combat::Combat;
use crate::components::hitbox::Hitbox;
use crate::components::physics::Physics;
use crate::components::transform::Transform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Transform,
    Physics,
    Collider,
    Combat,
    Hitbox,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 5] = [
        ComponentKind::Transform,
        ComponentKind::Physics,
        ComponentKind::Collider,
        ComponentKind::Combat,
        ComponentKind::Hitbox,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ComponentKind::Transform => "transform",
            ComponentKind::Physics => "physics",
            ComponentKind::Collider => "collider",
            ComponentKind::Combat => "combat",
            ComponentKind::Hitbox => "hitbox",
        }
    }

    /// Whether the entity currently carries this kind.
    pub fn is_present(self, entity: &EntityRef) -> bool {
        match self {
            ComponentKind::Transform => entity.contains::<Transform>(),
            ComponentKind::Physics => entity.contains::<Physics>(),
            ComponentKind::Collider => entity.contains::<Collider>(),
            ComponentKind::Combat => entity.contains::<Combat>(),
            ComponentKind::Hitbox => entity.contains::<Hitbox>(),
        }
    }

    /// Remove this kind from the entity. Returns `false` if it was absent.
    pub(crate) fn remove_from(self, entity: &mut EntityWorldMut) -> bool {
        match self {
            ComponentKind::Transform => entity.take::<Transform>().is_some(),
            ComponentKind::Physics => entity.take::<Physics>().is_some(),
            ComponentKind::Collider => entity.take::<Collider>().is_some(),
            ComponentKind::Combat => entity.take::<Combat>().is_some(),
            ComponentKind::Hitbox => entity.take::<Hitbox>().is_some(),
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ComponentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown component kind: {}", s))
    }
}
