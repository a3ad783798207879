//! Dynamic body component.
//!
//! The [`Physics`] component stores the velocity and per-tick acceleration of an
//! entity along with its mass and damping. Acceleration is impulse-style: forces
//! are accumulated with [`Physics::apply_force`] during a tick, consumed by the
//! integrator, and reset to zero afterwards. Callers that want a persistent force
//! re-apply it every tick.
//!
//! Entities without this component are immovable as far as collision
//! resolution is concerned.

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Smallest mass accepted; keeps `force / mass` finite.
pub const MIN_MASS: f32 = 1e-3;
/// Horizontal velocity retained per second when nothing else is specified.
pub const DEFAULT_FRICTION: f32 = 0.8;

/// Dynamic body integrated by the physics system.
///
/// # Fields
/// - `velocity` - world units per second
/// - `acceleration` - accumulated for the current tick only
/// - `mass` - always `>= MIN_MASS`
/// - `friction` - fraction of horizontal velocity kept per second, in `0..=1`
/// - `gravity` - whether world gravity is added every tick
/// - `grounded` - resting on the ground plane or on top of another body
///
/// # Example
/// ```ignore
/// let mut body = Physics::new(2.0).with_friction(0.5);
/// body.apply_impulse(Vec2::new(0.0, -400.0)); // jump
/// ```
#[derive(Component, Clone, Debug, PartialEq)]
pub struct Physics {
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub mass: f32,
    pub friction: f32,
    pub gravity: bool,
    pub grounded: bool,
}

impl Default for Physics {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Physics {
    /// Create a gravity-affected body at rest.
    pub fn new(mass: f32) -> Self {
        Self {
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            mass: mass.max(MIN_MASS),
            friction: DEFAULT_FRICTION,
            gravity: true,
            grounded: false,
        }
    }

    /// Builder: horizontal friction coefficient, clamped to `0..=1`.
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction.clamp(0.0, 1.0);
        self
    }

    /// Builder: toggle world gravity.
    pub fn with_gravity(mut self, gravity: bool) -> Self {
        self.gravity = gravity;
        self
    }

    /// Builder: initial velocity.
    pub fn with_velocity(mut self, vx: f32, vy: f32) -> Self {
        self.velocity = Vec2::new(vx, vy);
        self
    }

    /// Accumulate `force / mass` into acceleration. Takes effect on the next integration.
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force / self.mass;
    }

    /// Add `impulse / mass` to velocity immediately.
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse / self.mass;
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}
