//! Physics integration.
//!
//! Advances every entity carrying both [`Physics`] and [`Transform`] by the scaled
//! tick delta (semi-implicit Euler):
//!
//! 1. world gravity is added to the accumulated acceleration (when enabled)
//! 2. `velocity += acceleration * dt`, then horizontal friction and vertical air
//!    resistance are applied as per-second retention factors
//! 3. speed is clamped to `max_velocity`; tiny components snap to zero
//! 4. the moved box is kept inside the world: the floor stops and grounds the
//!    body, the walls and ceiling reflect it with `wall_damping`
//! 5. acceleration is reset
//! 6. `grounded` is recomputed from the distance to the floor
use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::physics::Physics;
use crate::components::transform::Transform;
use crate::resources::physicsconfig::PhysicsConfig;
use crate::resources::worldtime::WorldTime;

/// Largest top-left position that keeps a box of `size` inside the world.
fn world_limit(size: Vec2, config: &PhysicsConfig) -> Vec2 {
    Vec2::new(
        (config.world_width - size.x).max(0.0),
        (config.world_height - size.y).max(0.0),
    )
}

/// Clamp a transform into the world rectangle without touching velocity.
pub(crate) fn clamp_to_world(transform: &mut Transform, config: &PhysicsConfig) {
    let limit = world_limit(transform.scaled_size(), config);
    transform.position = transform.position.clamp(Vec2::ZERO, limit);
}

/// Integrate one body over `dt` seconds.
pub fn integrate_body(
    transform: &mut Transform,
    body: &mut Physics,
    config: &PhysicsConfig,
    dt: f32,
) {
    if dt <= 0.0 {
        return;
    }

    if body.gravity {
        body.acceleration += config.gravity;
    }

    body.velocity += body.acceleration * dt;
    body.velocity.x *= body.friction.clamp(0.0, 1.0).powf(dt);
    body.velocity.y *= config.air_resistance.clamp(0.0, 1.0).powf(dt);

    body.velocity = body.velocity.clamp_length_max(config.max_velocity);
    if body.velocity.x.abs() < config.min_velocity {
        body.velocity.x = 0.0;
    }
    if body.velocity.y.abs() < config.min_velocity {
        body.velocity.y = 0.0;
    }

    transform.position += body.velocity * dt;

    let Vec2 { x: max_x, y: max_y } = world_limit(transform.scaled_size(), config);

    if transform.position.x < 0.0 {
        transform.position.x = 0.0;
        body.velocity.x = body.velocity.x.abs() * config.wall_damping;
    } else if transform.position.x > max_x {
        transform.position.x = max_x;
        body.velocity.x = -body.velocity.x.abs() * config.wall_damping;
    }

    let mut hit_floor = false;
    if transform.position.y < 0.0 {
        transform.position.y = 0.0;
        body.velocity.y = body.velocity.y.abs() * config.wall_damping;
    } else if transform.position.y >= max_y {
        transform.position.y = max_y;
        body.velocity.y = body.velocity.y.min(0.0);
        hit_floor = body.velocity.y == 0.0;
    }

    body.acceleration = Vec2::ZERO;

    let gap = max_y - transform.position.y;
    body.grounded =
        hit_floor || (gap <= config.ground_epsilon && body.velocity.y.abs() <= config.min_velocity);
}

/// Integrate every physics body by the current [`WorldTime::delta`].
pub fn physics_integration(
    mut query: Query<(&mut Transform, &mut Physics)>,
    config: Res<PhysicsConfig>,
    time: Res<WorldTime>,
) {
    let dt = time.delta;
    if dt <= 0.0 {
        return;
    }
    for (mut transform, mut body) in query.iter_mut() {
        integrate_body(&mut transform, &mut body, &config, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PhysicsConfig {
        PhysicsConfig::default()
    }

    #[test]
    fn gravity_accelerates_a_free_body() {
        let mut t = Transform::new(100.0, 100.0, 10.0, 10.0);
        let mut b = Physics::new(1.0);
        integrate_body(&mut t, &mut b, &config(), 0.1);
        assert!(b.velocity.y > 90.0 && b.velocity.y <= 98.0);
        assert!(t.position.y > 100.0);
        assert_eq!(b.acceleration, Vec2::ZERO);
        assert!(!b.grounded);
    }

    #[test]
    fn zero_dt_is_a_no_op() {
        let mut t = Transform::new(10.0, 10.0, 5.0, 5.0);
        let mut b = Physics::new(1.0).with_velocity(50.0, 0.0);
        integrate_body(&mut t, &mut b, &config(), 0.0);
        assert_eq!(t.position, Vec2::new(10.0, 10.0));
        assert_eq!(b.velocity, Vec2::new(50.0, 0.0));
    }

    #[test]
    fn floor_stops_and_grounds() {
        let mut t = Transform::new(100.0, 585.0, 10.0, 10.0);
        let mut b = Physics::new(1.0).with_velocity(0.0, 300.0);
        integrate_body(&mut t, &mut b, &config(), 0.1);
        assert_eq!(t.position.y, 590.0);
        assert_eq!(b.velocity.y, 0.0);
        assert!(b.grounded);
    }

    #[test]
    fn walls_reflect_with_damping() {
        let mut t = Transform::new(2.0, 100.0, 10.0, 10.0);
        let mut b = Physics::new(1.0)
            .with_gravity(false)
            .with_friction(1.0)
            .with_velocity(-100.0, 0.0);
        integrate_body(&mut t, &mut b, &config(), 0.1);
        assert_eq!(t.position.x, 0.0);
        assert!((b.velocity.x - 50.0).abs() < 1e-4);

        let mut t = Transform::new(785.0, 100.0, 10.0, 10.0);
        let mut b = Physics::new(1.0)
            .with_gravity(false)
            .with_friction(1.0)
            .with_velocity(100.0, 0.0);
        integrate_body(&mut t, &mut b, &config(), 0.1);
        assert_eq!(t.position.x, 790.0);
        assert!((b.velocity.x + 50.0).abs() < 1e-4);
    }

    #[test]
    fn ceiling_reflects_downward() {
        let mut t = Transform::new(100.0, 1.0, 10.0, 10.0);
        let mut b = Physics::new(1.0)
            .with_gravity(false)
            .with_velocity(0.0, -200.0);
        integrate_body(&mut t, &mut b, &config(), 0.1);
        assert_eq!(t.position.y, 0.0);
        assert!(b.velocity.y > 0.0);
    }

    #[test]
    fn speed_is_clamped_and_tiny_components_snap() {
        let mut t = Transform::new(400.0, 300.0, 1.0, 1.0);
        let mut b = Physics::new(1.0)
            .with_gravity(false)
            .with_friction(1.0)
            .with_velocity(5000.0, 0.001);
        integrate_body(&mut t, &mut b, &config(), 0.01);
        assert!(b.velocity.length() <= 1000.0 + 1e-3);
        assert_eq!(b.velocity.y, 0.0);
    }

    #[test]
    fn friction_decays_horizontal_velocity_per_second() {
        let mut t = Transform::new(100.0, 100.0, 1.0, 1.0);
        let mut b = Physics::new(1.0)
            .with_gravity(false)
            .with_friction(0.5)
            .with_velocity(100.0, 0.0);
        integrate_body(&mut t, &mut b, &config(), 1.0);
        assert!((b.velocity.x - 50.0).abs() < 1e-3);
    }
}
