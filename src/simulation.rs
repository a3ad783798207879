//! Simulation driver.
//!
//! [`Simulation`] owns the ECS [`World`] with every resource and observer the core
//! needs, plus the per-tick [`Schedule`]. Each [`Simulation::update`]:
//!
//! 1. advances [`WorldTime`] (applying the time scale)
//! 2. integrates physics bodies
//! 3. rebuilds the spatial grid
//! 4. resolves collisions (collision and trigger events fire here)
//! 5. advances combat timers, status effects, mana and cooldowns
//! 6. resolves queued attack intents
//! 7. purges entities queued for destruction
//!
//! Collaborators subscribe to events with `world_mut().add_observer(...)` and read
//! entity state through [`crate::store`].

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::info;

use crate::components::combat::Combat;
use crate::components::statuseffect::StatusEffect;
use crate::components::transform::Transform;
use crate::events::combat::{DamageKind, Rejection};
use crate::resources::abilitybook::AbilityBook;
use crate::resources::attackqueue::{AttackIntent, AttackQueue};
use crate::resources::combatlog::CombatLog;
use crate::resources::combatrng::CombatRng;
use crate::resources::entityregistry::EntityRegistry;
use crate::resources::simconfig::SimConfig;
use crate::resources::spatialgrid::SpatialGrid;
use crate::resources::worldtime::WorldTime;
use crate::store;
use crate::systems::ability::use_ability;
use crate::systems::attack::{
    AttackOutcome, apply_damage, apply_status_effect, block, dodge, heal, init_combat,
    process_attack_intents, remove_status_effect, resolve_attack,
};
use crate::systems::collision::collision_resolver;
use crate::systems::combat::tick_combat;
use crate::systems::combatlog::{record_combat_event, release_combat_totals};
use crate::systems::forces::{apply_force, apply_impulse, apply_knockback};
use crate::systems::hitbox::queue_hitbox_attacks;
use crate::systems::physics::physics_integration;
use crate::systems::spatialgrid::rebuild_spatial_grid;
use crate::systems::time::update_world_time;

pub struct Simulation {
    world: World,
    schedule: Schedule,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimConfig::new())
    }
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(SpatialGrid::new(config.physics.cell_size));
        world.insert_resource(config.physics);
        world.insert_resource(config.combat);
        world.insert_resource(EntityRegistry::default());
        world.insert_resource(AttackQueue::default());
        world.insert_resource(CombatLog::default());
        world.insert_resource(CombatRng::default());
        world.insert_resource(AbilityBook::with_defaults());

        world.spawn(Observer::new(record_combat_event));
        world.spawn(Observer::new(release_combat_totals));
        world.spawn(Observer::new(queue_hitbox_attacks));
        // Observers must be registered before the first tick triggers events.
        world.flush();

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                physics_integration,
                rebuild_spatial_grid,
                collision_resolver,
                tick_combat,
                process_attack_intents,
            )
                .chain(),
        );

        info!("Simulation ready");
        Self { world, schedule }
    }

    /// Advance the simulation by `dt` unscaled seconds.
    pub fn update(&mut self, dt: f32) {
        update_world_time(&mut self.world, dt);
        self.schedule.run(&mut self.world);
        store::flush_destroyed(&mut self.world);
        self.world.clear_trackers();
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn time(&self) -> &WorldTime {
        self.world.resource::<WorldTime>()
    }

    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.world.resource_mut::<WorldTime>().time_scale = time_scale.max(0.0);
    }

    /// Make block and critical rolls reproducible.
    pub fn seed(&mut self, seed: u64) {
        self.world.insert_resource(CombatRng::seeded(seed));
    }

    pub fn set_rng(&mut self, rng: CombatRng) {
        self.world.insert_resource(rng);
    }

    pub fn combat_log(&self) -> &CombatLog {
        self.world.resource::<CombatLog>()
    }

    pub fn abilities_mut(&mut self) -> Mut<'_, AbilityBook> {
        self.world.resource_mut::<AbilityBook>()
    }

    // --- store ---

    pub fn create_entity(&mut self, tag: Option<&str>, transform: Transform) -> Entity {
        store::create_entity(&mut self.world, tag, transform)
    }

    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        store::destroy_entity(&mut self.world, entity)
    }

    pub fn add_component<C: Component>(&mut self, entity: Entity, component: C) -> bool {
        store::add_component(&mut self.world, entity, component)
    }

    pub fn get_component<C: Component>(&self, entity: Entity) -> Option<&C> {
        store::get_component(&self.world, entity)
    }

    // --- physics ---

    pub fn apply_force(&mut self, entity: Entity, force: Vec2) -> bool {
        apply_force(&mut self.world, entity, force)
    }

    pub fn apply_impulse(&mut self, entity: Entity, impulse: Vec2) -> bool {
        apply_impulse(&mut self.world, entity, impulse)
    }

    pub fn apply_knockback(&mut self, entity: Entity, magnitude: f32, angle: f32) -> bool {
        apply_knockback(&mut self.world, entity, magnitude, angle)
    }

    // --- combat ---

    pub fn init_combat(&mut self, entity: Entity, combat: Combat) -> bool {
        init_combat(&mut self.world, entity, combat)
    }

    /// Queue an attack to be resolved during the next update.
    pub fn queue_attack(&mut self, intent: AttackIntent) {
        self.world.resource_mut::<AttackQueue>().push(intent);
    }

    /// Resolve an attack immediately.
    pub fn attack(&mut self, intent: AttackIntent) -> AttackOutcome {
        resolve_attack(&mut self.world, &intent)
    }

    pub fn apply_damage(
        &mut self,
        target: Entity,
        amount: f32,
        kind: DamageKind,
        source: Option<Entity>,
    ) -> Option<f32> {
        apply_damage(&mut self.world, target, amount, kind, source)
    }

    pub fn heal(&mut self, target: Entity, amount: f32, source: Option<Entity>) -> Option<f32> {
        heal(&mut self.world, target, amount, source)
    }

    pub fn block(&mut self, entity: Entity, duration: f32) -> Result<(), Rejection> {
        block(&mut self.world, entity, duration)
    }

    pub fn dodge(&mut self, entity: Entity, duration: f32, direction: Vec2) -> Result<(), Rejection> {
        dodge(&mut self.world, entity, duration, direction)
    }

    pub fn apply_status_effect(&mut self, target: Entity, name: &str, effect: StatusEffect) -> bool {
        apply_status_effect(&mut self.world, target, name, effect)
    }

    pub fn remove_status_effect(&mut self, target: Entity, name: &str) -> bool {
        remove_status_effect(&mut self.world, target, name)
    }

    pub fn use_ability(
        &mut self,
        caster: Entity,
        ability: &str,
        targets: &[Entity],
    ) -> Result<(), Rejection> {
        use_ability(&mut self.world, caster, ability, targets)
    }
}
