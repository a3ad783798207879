//! Entity/component store integration tests: creation, lookups, queries and
//! deferred destruction driven through full simulation ticks.

use std::sync::{Arc, Mutex};

use bevy_ecs::prelude::*;

use brawlcore::components::collider::Collider;
use brawlcore::components::combat::Combat;
use brawlcore::components::kind::ComponentKind;
use brawlcore::components::physics::Physics;
use brawlcore::components::transform::Transform;
use brawlcore::events::lifecycle::EntityDestroyedEvent;
use brawlcore::simulation::Simulation;
use brawlcore::store::{self, EntityQuery};

fn still_sim() -> Simulation {
    let mut sim = Simulation::default();
    sim.world_mut()
        .resource_mut::<brawlcore::resources::physicsconfig::PhysicsConfig>()
        .gravity = glam::Vec2::ZERO;
    sim
}

fn capture_destroyed(sim: &mut Simulation) -> Arc<Mutex<Vec<EntityDestroyedEvent>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    sim.world_mut()
        .add_observer(move |trigger: On<EntityDestroyedEvent>| {
            seen_clone.lock().unwrap().push(trigger.event().clone());
        });
    sim.world_mut().flush();
    seen
}

#[test]
fn destroy_then_update_purges_everywhere() {
    let mut sim = still_sim();
    let seen = capture_destroyed(&mut sim);
    let e = sim.create_entity(Some("enemy"), Transform::new(10.0, 10.0, 8.0, 8.0));
    sim.add_component(e, Physics::new(1.0));
    sim.add_component(e, Collider::solid());
    sim.add_component(e, Combat::default());

    assert!(sim.destroy_entity(e));
    // Still visible until the destruction pass.
    assert!(store::exists(sim.world(), e));
    assert!(store::is_pending_destroy(sim.world(), e));
    assert_eq!(store::entities_with_tag(sim.world(), "enemy"), vec![e]);

    sim.update(1.0 / 60.0);

    let world = sim.world();
    assert!(!store::exists(world, e));
    assert!(store::get_component::<Physics>(world, e).is_none());
    assert!(store::entities_with_tag(world, "enemy").is_empty());
    assert!(store::entities_with_components(world, &[ComponentKind::Combat]).is_empty());
    assert!(!store::is_pending_destroy(world, e));

    let events = seen.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].entity, e);
    assert_eq!(events[0].tag.as_deref(), Some("enemy"));
}

#[test]
fn destroy_is_idempotent() {
    let mut sim = still_sim();
    let seen = capture_destroyed(&mut sim);
    let e = sim.create_entity(None, Transform::default());

    assert!(sim.destroy_entity(e));
    assert!(!sim.destroy_entity(e));
    sim.update(0.016);
    // Destroying a purged entity is a warning, not a second destruction.
    assert!(!sim.destroy_entity(e));
    sim.update(0.016);

    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn set_queries_are_sorted_by_creation_order() {
    let mut sim = still_sim();
    let a = sim.create_entity(Some("enemy"), Transform::default());
    let b = sim.create_entity(Some("player"), Transform::default());
    let c = sim.create_entity(Some("enemy"), Transform::default());
    for &e in &[c, a, b] {
        sim.add_component(e, Combat::default());
    }
    sim.add_component(b, Physics::new(1.0));

    let world = sim.world();
    assert_eq!(store::all_entities(world), vec![a, b, c]);
    assert_eq!(
        store::entities_with_components(world, &[ComponentKind::Combat]),
        vec![a, b, c]
    );
    assert_eq!(
        store::entities_with_components(world, &[ComponentKind::Combat, ComponentKind::Physics]),
        vec![b]
    );
    assert_eq!(store::entities_with_tag(world, "enemy"), vec![a, c]);
}

#[test]
fn query_combines_with_without_tag_and_predicate() {
    let mut sim = still_sim();
    let grunt = sim.create_entity(Some("enemy"), Transform::default());
    let boss = sim.create_entity(Some("enemy"), Transform::default());
    let ally = sim.create_entity(Some("ally"), Transform::default());
    sim.add_component(grunt, Combat::default().with_health(20.0));
    sim.add_component(boss, Combat::default());
    sim.add_component(boss, Physics::new(5.0));
    sim.add_component(ally, Combat::default().with_health(10.0));

    let world = sim.world();
    let with_combat = EntityQuery::new().with(ComponentKind::Combat);
    assert_eq!(store::query(world, &with_combat), vec![grunt, boss, ally]);

    let grounded_enemies = EntityQuery::new()
        .tagged("enemy")
        .without(ComponentKind::Physics);
    assert_eq!(store::query(world, &grounded_enemies), vec![grunt]);

    let threshold = 50.0;
    let wounded = EntityQuery::new()
        .with(ComponentKind::Combat)
        .matching(|e| e.get::<Combat>().is_some_and(|c| c.health < threshold));
    assert_eq!(store::query(world, &wounded), vec![grunt, ally]);
}

#[test]
fn components_can_be_added_replaced_and_removed() {
    let mut sim = still_sim();
    let e = sim.create_entity(None, Transform::default());
    assert!(!store::has_component(sim.world(), e, ComponentKind::Physics));

    sim.add_component(e, Physics::new(1.0));
    sim.add_component(e, Physics::new(4.0));
    assert_eq!(sim.get_component::<Physics>(e).unwrap().mass, 4.0);

    let world = sim.world_mut();
    assert!(store::remove_component(world, e, ComponentKind::Physics));
    assert!(!store::has_component(world, e, ComponentKind::Physics));
    assert!(!store::remove_component(world, e, ComponentKind::Transform));
}

#[test]
fn invalid_entities_are_reported_not_fatal() {
    let mut sim = still_sim();
    let e = sim.create_entity(None, Transform::default());
    sim.destroy_entity(e);
    sim.update(0.016);

    assert!(!sim.add_component(e, Physics::new(1.0)));
    assert!(sim.get_component::<Transform>(e).is_none());
    assert!(!store::has_component(sim.world(), e, ComponentKind::Transform));
    assert!(!store::remove_component(sim.world_mut(), e, ComponentKind::Physics));
}
