//! ECS components for entities.
//!
//! Every entity created through [`crate::store`] carries a [`transform`] and an
//! [`identity`] serial; the rest are optional and attached per entity.
//!
//! Submodules overview:
//! - [`collider`] – axis-aligned bounds, trigger flag and collision layers
//! - [`combat`] – vitals, stats, stance, combo and cooldown state
//! - [`hitbox`] – attack payload carried by a trigger collider
//! - [`identity`] – creation serial and category tag
//! - [`kind`] – runtime selector for component kinds
//! - [`physics`] – velocity, acceleration, mass and damping
//! - [`statuseffect`] – timed effects stored on a combat component
//! - [`transform`] – position, size, rotation and scale

pub mod collider;
pub mod combat;
pub mod hitbox;
pub mod identity;
pub mod kind;
pub mod physics;
pub mod statuseffect;
pub mod transform;
