//! Simulation systems and combat entry points.
//!
//! Submodules overview
//! - [`ability`] – ability invocation and dispatch
//! - [`attack`] – attack resolution, damage, healing, block/dodge, status effects
//! - [`collision`] – pair generation, separation and collision/trigger events
//! - [`combat`] – per-tick combat timers, damage over time, mana regeneration
//! - [`combatlog`] – observer feeding the combat log
//! - [`forces`] – force, impulse and knockback on physics bodies
//! - [`hitbox`] – observer turning hitbox overlaps into attack intents
//! - [`physics`] – gravity, integration, damping and world bounds
//! - [`spatialgrid`] – broad-phase rebuild
//! - [`time`] – update simulation time and delta

pub mod ability;
pub mod attack;
pub mod collision;
pub mod combat;
pub mod combatlog;
pub mod forces;
pub mod hitbox;
pub mod physics;
pub mod spatialgrid;
pub mod time;
