//! Axis-aligned collider component and the [`Aabb`] helper.
//!
//! A [`Collider`] derives its bounds from the entity's
//! [`Transform`](super::transform::Transform), optionally shifted by `offset` and
//! resized by `size`. Triggers only report overlaps; solid colliders are also
//! separated by the collision resolver.
//!
//! Layer filtering: two colliders interact only if each one's `layer` is
//! contained in the other's `mask`.

use bevy_ecs::prelude::Component;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::transform::Transform;

/// Axis-aligned bounding box in world units. `min` is always component-wise `<= max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Build from a corner and a size. Negative sizes are normalized.
    pub fn from_rect(position: Vec2, size: Vec2) -> Self {
        let p0 = position;
        let p1 = position + size;
        Self {
            min: p0.min(p1),
            max: p0.max(p1),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Strict overlap: boxes that only touch along an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Penetration depth along x and y. Only meaningful when the boxes overlap.
    pub fn penetration(&self, other: &Aabb) -> Vec2 {
        Vec2::new(
            self.max.x.min(other.max.x) - self.min.x.max(other.min.x),
            self.max.y.min(other.max.y) - self.min.y.max(other.min.y),
        )
    }
}

/// Bitmask of collision layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionLayer(pub u32);

impl CollisionLayer {
    pub const NONE: Self = Self(0);
    pub const DEFAULT: Self = Self(1);
    pub const PLAYER: Self = Self(1 << 1);
    pub const ENEMY: Self = Self(1 << 2);
    pub const PROJECTILE: Self = Self(1 << 3);
    pub const HITBOX: Self = Self(1 << 4);
    pub const TERRAIN: Self = Self(1 << 5);
    pub const ALL: Self = Self(u32::MAX);

    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// Collider shape. Every shape collides through its axis-aligned bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    /// The transform's box (or the `size` override).
    Rect,
    /// Circle centered on the transform's center; bounded by its enclosing square.
    Circle { radius: f32 },
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub shape: ColliderShape,
    pub is_trigger: bool,
    pub layer: CollisionLayer,
    pub mask: CollisionLayer,
    pub offset: Vec2,
    /// Overrides the transform's scaled size for `Rect` colliders.
    pub size: Option<Vec2>,
}

impl Default for Collider {
    fn default() -> Self {
        Self::solid()
    }
}

impl Collider {
    /// Solid rectangle matching the transform, on the default layer, colliding with everything.
    pub fn solid() -> Self {
        Self {
            shape: ColliderShape::Rect,
            is_trigger: false,
            layer: CollisionLayer::DEFAULT,
            mask: CollisionLayer::ALL,
            offset: Vec2::ZERO,
            size: None,
        }
    }

    /// Overlap-only rectangle matching the transform.
    pub fn trigger() -> Self {
        Self {
            is_trigger: true,
            ..Self::solid()
        }
    }

    pub fn circle(radius: f32) -> Self {
        Self {
            shape: ColliderShape::Circle {
                radius: radius.abs(),
            },
            ..Self::solid()
        }
    }

    pub fn with_layer(mut self, layer: CollisionLayer) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_mask(mut self, mask: CollisionLayer) -> Self {
        self.mask = mask;
        self
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = Some(Vec2::new(width, height));
        self
    }

    pub fn as_trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    /// World-space bounds for the given transform.
    pub fn bounds(&self, transform: &Transform) -> Aabb {
        match self.shape {
            ColliderShape::Rect => {
                let size = self.size.unwrap_or_else(|| transform.scaled_size());
                Aabb::from_rect(transform.position + self.offset, size)
            }
            ColliderShape::Circle { radius } => {
                let center = transform.center() + self.offset;
                Aabb {
                    min: center - Vec2::splat(radius),
                    max: center + Vec2::splat(radius),
                }
            }
        }
    }

    /// Layer/mask filter. Symmetric.
    pub fn interacts_with(&self, other: &Collider) -> bool {
        self.mask.intersects(other.layer) && other.mask.intersects(self.layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rect_normalizes_negative_size() {
        let b = Aabb::from_rect(Vec2::new(10.0, 10.0), Vec2::new(-4.0, 6.0));
        assert_eq!(b.min, Vec2::new(6.0, 10.0));
        assert_eq!(b.max, Vec2::new(10.0, 16.0));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Aabb::from_rect(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::from_rect(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        assert!(!a.overlaps(&b));
        let c = Aabb::from_rect(Vec2::new(9.5, 2.0), Vec2::splat(10.0));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn penetration_reports_both_axes() {
        let a = Aabb::from_rect(Vec2::ZERO, Vec2::splat(20.0));
        let b = Aabb::from_rect(Vec2::new(15.0, 5.0), Vec2::splat(20.0));
        assert_eq!(a.penetration(&b), Vec2::new(5.0, 15.0));
    }

    #[test]
    fn bounds_follow_transform_offset_and_override() {
        let t = Transform::new(100.0, 50.0, 32.0, 32.0);
        let b = Collider::solid().bounds(&t);
        assert_eq!(b.min, Vec2::new(100.0, 50.0));
        assert_eq!(b.max, Vec2::new(132.0, 82.0));

        let b = Collider::solid()
            .with_offset(Vec2::new(4.0, 4.0))
            .with_size(8.0, 24.0)
            .bounds(&t);
        assert_eq!(b.min, Vec2::new(104.0, 54.0));
        assert_eq!(b.max, Vec2::new(112.0, 78.0));
    }

    #[test]
    fn circle_bounds_enclose_radius_around_center() {
        let t = Transform::new(0.0, 0.0, 20.0, 20.0);
        let b = Collider::circle(5.0).bounds(&t);
        assert_eq!(b.min, Vec2::new(5.0, 5.0));
        assert_eq!(b.max, Vec2::new(15.0, 15.0));
    }

    #[test]
    fn layer_mask_filter_is_symmetric() {
        let player = Collider::solid()
            .with_layer(CollisionLayer::PLAYER)
            .with_mask(CollisionLayer::ENEMY.union(CollisionLayer::TERRAIN));
        let enemy = Collider::solid().with_layer(CollisionLayer::ENEMY);
        let pickup = Collider::trigger().with_layer(CollisionLayer::DEFAULT);
        assert!(player.interacts_with(&enemy));
        assert!(enemy.interacts_with(&player));
        assert!(!player.interacts_with(&pickup));
        assert!(!pickup.interacts_with(&player));
    }
}
