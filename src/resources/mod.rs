//! ECS resources made available to systems.
//!
//! Overview
//! - `abilitybook` – ability definitions keyed by name
//! - `attackqueue` – attack intents resolved once per tick
//! - `combatconfig` – damage model and combat tuning
//! - `combatlog` – timestamped combat history and per-entity totals
//! - `combatrng` – seedable rolls for blocks and criticals
//! - `entityregistry` – serials, tag index and destruction queue
//! - `physicsconfig` – world bounds and physics tuning
//! - `simconfig` – INI-backed configuration file
//! - `spatialgrid` – uniform-grid broad phase
//! - `worldtime` – simulation time and delta
pub mod abilitybook;
pub mod attackqueue;
pub mod combatconfig;
pub mod combatlog;
pub mod combatrng;
pub mod entityregistry;
pub mod physicsconfig;
pub mod simconfig;
pub mod spatialgrid;
pub mod worldtime;
