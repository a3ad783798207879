//! World-space transform carried by every entity.
//!
//! `position` is the top-left corner of the entity's box in world units (y grows
//! downward, so the ground plane sits at the bottom of the world). `size` is the
//! unscaled box; [`Transform::scaled_size`] applies `scale`. Rotation is kept for
//! collaborators that draw the entity and does not affect collision bounds.

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Position, size, rotation and scale of an entity.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Top-left corner in world units.
    pub position: Vec2,
    /// Unscaled width and height.
    pub size: Vec2,
    /// Rotation in degrees.
    pub rotation: f32,
    /// Independent scale factors along x and y.
    pub scale: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            size: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }
}

impl Transform {
    /// Create a transform at `(x, y)` with the given unscaled size.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            size: Vec2::new(width, height),
            ..Self::default()
        }
    }

    /// Builder: set the rotation in degrees.
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    /// Builder: set independent scale factors.
    pub fn with_scale(mut self, sx: f32, sy: f32) -> Self {
        self.scale = Vec2::new(sx, sy);
        self
    }

    /// Size after applying scale. Negative scale mirrors but never shrinks below zero.
    pub fn scaled_size(&self) -> Vec2 {
        (self.size * self.scale).abs()
    }

    /// Center of the scaled box.
    pub fn center(&self) -> Vec2 {
        self.position + self.scaled_size() * 0.5
    }

    /// Move by a delta in world units.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.position.x += dx;
        self.position.y += dy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_size_applies_independent_factors() {
        let t = Transform::new(0.0, 0.0, 10.0, 20.0).with_scale(2.0, 0.5);
        assert_eq!(t.scaled_size(), Vec2::new(20.0, 10.0));
    }

    #[test]
    fn negative_scale_keeps_positive_extent() {
        let t = Transform::new(5.0, 5.0, 10.0, 10.0).with_scale(-1.0, 1.0);
        assert_eq!(t.scaled_size(), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn rotation_leaves_the_box_alone() {
        let t = Transform::new(10.0, 10.0, 10.0, 20.0).with_rotation(90.0);
        assert_eq!(t.rotation, 90.0);
        assert_eq!(t.scaled_size(), Vec2::new(10.0, 20.0));
        assert_eq!(t.center(), Vec2::new(15.0, 20.0));
    }

    #[test]
    fn center_uses_scaled_box() {
        let t = Transform::new(10.0, 10.0, 10.0, 10.0).with_scale(2.0, 2.0);
        assert_eq!(t.center(), Vec2::new(20.0, 20.0));
    }
}
