//! brawlcore library.
//!
//! Real-time simulation core of a 2D action game: an entity/component store on
//! top of `bevy_ecs`, a uniform-grid broad phase, physics integration, collision
//! resolution, and a combat state machine with combos, status effects and
//! abilities. Rendering, audio and input live outside this crate and talk to it
//! through [`simulation::Simulation`], [`store`] queries and observers on the
//! [`events`].

pub mod arena;
pub mod components;
pub mod events;
pub mod resources;
pub mod simulation;
pub mod store;
pub mod systems;
