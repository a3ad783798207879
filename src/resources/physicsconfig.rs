//! World bounds and physics tuning.
//!
//! Loaded from the `[world]` and `[physics]` sections of the INI file by
//! [`SimConfig`](crate::resources::simconfig::SimConfig). The world spans
//! `0..width` by `0..height`; the ground plane is `y = height`.

use bevy_ecs::prelude::Resource;
use configparser::ini::Ini;
use glam::Vec2;
use log::warn;

use crate::resources::spatialgrid::MIN_CELL_SIZE;

const DEFAULT_WORLD_WIDTH: f32 = 800.0;
const DEFAULT_WORLD_HEIGHT: f32 = 600.0;
const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, 980.0);
const DEFAULT_AIR_RESISTANCE: f32 = 0.99;
const DEFAULT_MAX_VELOCITY: f32 = 1000.0;
const DEFAULT_MIN_VELOCITY: f32 = 0.01;
const DEFAULT_WALL_DAMPING: f32 = 0.5;
const DEFAULT_RESTITUTION: f32 = 0.5;
const DEFAULT_GROUND_EPSILON: f32 = 0.5;
const DEFAULT_CELL_SIZE: f32 = 64.0;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PhysicsConfig {
    pub world_width: f32,
    pub world_height: f32,
    /// Acceleration added every tick to bodies with `gravity` set.
    pub gravity: Vec2,
    /// Fraction of vertical velocity kept per second.
    pub air_resistance: f32,
    /// Velocity magnitude clamp.
    pub max_velocity: f32,
    /// Velocity components below this snap to zero.
    pub min_velocity: f32,
    /// Velocity kept (and reflected) when hitting a side or the top of the world.
    pub wall_damping: f32,
    /// Velocity kept (and reflected) when two solid bodies collide.
    pub restitution: f32,
    /// Distance to the ground plane still counted as grounded.
    pub ground_epsilon: f32,
    /// Spatial grid cell size.
    pub cell_size: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            world_width: DEFAULT_WORLD_WIDTH,
            world_height: DEFAULT_WORLD_HEIGHT,
            gravity: DEFAULT_GRAVITY,
            air_resistance: DEFAULT_AIR_RESISTANCE,
            max_velocity: DEFAULT_MAX_VELOCITY,
            min_velocity: DEFAULT_MIN_VELOCITY,
            wall_damping: DEFAULT_WALL_DAMPING,
            restitution: DEFAULT_RESTITUTION,
            ground_epsilon: DEFAULT_GROUND_EPSILON,
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl PhysicsConfig {
    /// Builder: world size.
    pub fn with_bounds(mut self, width: f32, height: f32) -> Self {
        self.world_width = width;
        self.world_height = height;
        self
    }

    /// Builder: gravity vector.
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    /// Overwrite fields present in `[world]` / `[physics]`. Missing keys keep their value.
    pub(crate) fn read_ini(&mut self, ini: &Ini) {
        let get = |section: &str, key: &str| ini.getfloat(section, key).ok().flatten();

        if let Some(v) = get("world", "width") {
            self.world_width = v as f32;
        }
        if let Some(v) = get("world", "height") {
            self.world_height = v as f32;
        }
        if let Some(v) = get("world", "gravity_x") {
            self.gravity.x = v as f32;
        }
        if let Some(v) = get("world", "gravity_y") {
            self.gravity.y = v as f32;
        }
        if let Some(v) = get("physics", "air_resistance") {
            self.air_resistance = (v as f32).clamp(0.0, 1.0);
        }
        if let Some(v) = get("physics", "max_velocity") {
            self.max_velocity = v as f32;
        }
        if let Some(v) = get("physics", "min_velocity") {
            self.min_velocity = v as f32;
        }
        if let Some(v) = get("physics", "wall_damping") {
            self.wall_damping = v as f32;
        }
        if let Some(v) = get("physics", "restitution") {
            self.restitution = v as f32;
        }
        if let Some(v) = get("physics", "ground_epsilon") {
            self.ground_epsilon = v as f32;
        }
        if let Some(v) = get("physics", "cell_size") {
            let v = v as f32;
            if v.is_finite() && v >= MIN_CELL_SIZE {
                self.cell_size = v;
            } else {
                warn!(
                    "Ignoring cell_size = {} (must be at least {}), keeping {}",
                    v, MIN_CELL_SIZE, self.cell_size
                );
            }
        }
    }

    pub(crate) fn write_ini(&self, ini: &mut Ini) {
        let mut set = |section: &str, key: &str, value: f32| {
            ini.set(section, key, Some(value.to_string()));
        };
        set("world", "width", self.world_width);
        set("world", "height", self.world_height);
        set("world", "gravity_x", self.gravity.x);
        set("world", "gravity_y", self.gravity.y);
        set("physics", "air_resistance", self.air_resistance);
        set("physics", "max_velocity", self.max_velocity);
        set("physics", "min_velocity", self.min_velocity);
        set("physics", "wall_damping", self.wall_damping);
        set("physics", "restitution", self.restitution);
        set("physics", "ground_epsilon", self.ground_epsilon);
        set("physics", "cell_size", self.cell_size);
    }
}
