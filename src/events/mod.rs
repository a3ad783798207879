//! Event types raised by the simulation.
//!
//! All events are triggered synchronously through `World::trigger`; subscribe
//! with `World::add_observer`.
//!
//! Submodules:
//! - [`collision`] – solid collisions and trigger overlaps
//! - [`combat`] – attack outcomes, damage, healing, effects, combos, abilities, deaths
//! - [`lifecycle`] – entity destruction notifications
pub mod collision;
pub mod combat;
pub mod lifecycle;
