//! Simulation clock.
//!
//! Updated once per tick by [`update_world_time`](crate::systems::time::update_world_time).
//! `delta` is already multiplied by `time_scale`; every countdown in the core
//! (cooldowns, status effects, stances, combo windows) consumes it.
use bevy_ecs::prelude::Resource;

#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct WorldTime {
    /// Scaled seconds since the simulation started.
    pub elapsed: f32,
    /// Scaled seconds of the current tick.
    pub delta: f32,
    /// Multiplier applied to the caller's delta (`0.5` = slow motion).
    pub time_scale: f32,
    /// Number of ticks run so far.
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale.max(0.0);
        self
    }
}
