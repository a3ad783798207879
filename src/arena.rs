//! Headless demo arena.
//!
//! Two fighters trade blows on the floor of the default world with a scripted
//! opponent routine: queued melee attacks, guards, a dodge, abilities and a
//! hitbox swing. Used by the `brawlcore` binary and as an end-to-end smoke test
//! of the whole tick.

use bevy_ecs::prelude::Entity;
use glam::Vec2;
use log::info;

use crate::components::collider::{Collider, CollisionLayer};
use crate::components::combat::{AttackType, Combat, CombatStats};
use crate::components::hitbox::Hitbox;
use crate::components::physics::Physics;
use crate::components::transform::Transform;
use crate::resources::attackqueue::AttackIntent;
use crate::resources::physicsconfig::PhysicsConfig;
use crate::simulation::Simulation;

const FIGHTER_SIZE: Vec2 = Vec2::new(32.0, 48.0);

/// Outcome of [`run_demo`].
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaReport {
    pub ticks: u32,
    pub elapsed: f32,
    pub hero: Entity,
    pub brute: Entity,
    /// `None` once the fighter is dead.
    pub hero_health: Option<f32>,
    pub brute_health: Option<f32>,
}

impl ArenaReport {
    pub fn winner(&self) -> Option<&'static str> {
        match (self.hero_health, self.brute_health) {
            (Some(_), None) => Some("hero"),
            (None, Some(_)) => Some("brute"),
            _ => None,
        }
    }
}

/// Spawn a fighter standing on the floor at horizontal position `x`.
pub fn spawn_fighter(
    sim: &mut Simulation,
    tag: &str,
    x: f32,
    layer: CollisionLayer,
    stats: CombatStats,
    max_health: f32,
) -> Entity {
    let floor = sim.world().resource::<PhysicsConfig>().world_height;
    let entity = sim.create_entity(
        Some(tag),
        Transform::new(x, floor - FIGHTER_SIZE.y, FIGHTER_SIZE.x, FIGHTER_SIZE.y),
    );
    sim.add_component(entity, Physics::new(1.0).with_friction(0.2));
    sim.add_component(entity, Collider::solid().with_layer(layer));
    sim.init_combat(entity, Combat::new(stats, max_health, 100.0));
    entity
}

fn health(sim: &Simulation, entity: Entity) -> Option<f32> {
    sim.get_component::<Combat>(entity).map(|c| c.health)
}

/// Spawn a short-lived trigger carrying an attack from `owner`, centered on `at`.
fn swing(sim: &mut Simulation, owner: Entity, at: Vec2) -> Entity {
    let entity = sim.create_entity(
        Some("hitbox"),
        Transform::new(at.x - 24.0, at.y - 24.0, 48.0, 48.0),
    );
    sim.add_component(
        entity,
        Collider::trigger()
            .with_layer(CollisionLayer::HITBOX)
            .with_mask(CollisionLayer::ENEMY),
    );
    sim.add_component(
        entity,
        Hitbox::new(owner, AttackType::Special, 12.0).with_timing(60.0),
    );
    entity
}

/// Run the scripted bout for at most `ticks` updates of `dt` seconds.
pub fn run_demo(sim: &mut Simulation, ticks: u32, dt: f32) -> ArenaReport {
    let hero = spawn_fighter(
        sim,
        "hero",
        300.0,
        CollisionLayer::PLAYER,
        CombatStats {
            attack: 14.0,
            defense: 6.0,
            speed: 120.0,
            critical_chance: 0.1,
        },
        120.0,
    );
    let brute = spawn_fighter(
        sim,
        "brute",
        420.0,
        CollisionLayer::ENEMY,
        CombatStats {
            attack: 12.0,
            defense: 8.0,
            speed: 80.0,
            critical_chance: 0.05,
        },
        160.0,
    );

    let mut pending_swing: Option<Entity> = None;
    let mut ran = 0;
    for tick in 0..ticks {
        if let Some(hitbox) = pending_swing.take() {
            sim.destroy_entity(hitbox);
        }

        let both_alive = health(sim, hero).is_some() && health(sim, brute).is_some();
        if !both_alive {
            break;
        }

        if tick % 30 == 0 {
            let attack_type = if tick % 120 == 0 {
                AttackType::Heavy
            } else {
                AttackType::Normal
            };
            sim.queue_attack(AttackIntent::new(hero, brute, attack_type, 10.0).with_timing(80.0));
        }
        if tick % 45 == 15 {
            sim.queue_attack(AttackIntent::new(brute, hero, AttackType::Quick, 9.0));
        }
        if tick % 90 == 60 {
            let _ = sim.block(brute, 0.4);
        }
        if tick % 100 == 40 {
            let _ = sim.dodge(hero, 0.25, Vec2::NEG_X);
        }
        if tick % 150 == 75 {
            let _ = sim.use_ability(hero, "fireball", &[brute]);
        }
        if tick % 200 == 120 {
            let _ = sim.use_ability(brute, "war_cry", &[]);
        }
        if tick % 160 == 100
            && let Some(target) = sim.get_component::<Transform>(brute).map(Transform::center)
        {
            pending_swing = Some(swing(sim, hero, target));
        }

        sim.update(dt);
        ran += 1;
    }

    let report = ArenaReport {
        ticks: ran,
        elapsed: sim.time().elapsed,
        hero,
        brute,
        hero_health: health(sim, hero),
        brute_health: health(sim, brute),
    };
    info!(
        "Bout finished after {} ticks ({:.2}s): hero {:?}, brute {:?}",
        report.ticks, report.elapsed, report.hero_health, report.brute_health
    );
    report
}
