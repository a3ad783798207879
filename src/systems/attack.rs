//! Attack resolution, damage, healing, defensive actions and status effects.
//!
//! These are the combat entry points. They operate directly on the [`World`] and
//! raise [`CombatEvent`]s synchronously, so observers see each outcome before the
//! function returns.
//!
//! Attack resolution order:
//!
//! 1. invulnerable target: negated (`Missed`, or `Dodged` mid-dodge)
//! 2. blocking target: block roll; on success chip damage only (`Blocked`), on
//!    failure fall through
//! 3. dodging target: negated (`Dodged`)
//! 4. mitigated damage with the attack-type multiplier
//! 5. combo multiplier while the attacker's combo is live
//! 6. perfect-timing bonus
//! 7. critical roll
//! 8. damage applied (grants the grace invulnerability)
//! 9. attacker combo extended or restarted
//! 10. attack-type side effects (special burns, heavy knocks back)
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{debug, warn};

use crate::components::combat::{AttackType, Combat, Stance};
use crate::components::physics::Physics;
use crate::components::statuseffect::{EffectPayload, StatusEffect};
use crate::components::transform::Transform;
use crate::events::combat::{CombatAction, CombatEvent, DamageKind, MissReason, Rejection};
use crate::resources::attackqueue::{AttackIntent, AttackQueue};
use crate::resources::combatconfig::CombatConfig;
use crate::resources::combatrng::CombatRng;
use crate::resources::worldtime::WorldTime;

/// Result of [`resolve_attack`].
#[derive(Debug, Clone, PartialEq)]
pub enum AttackOutcome {
    /// Full resolution; `damage` is what reached the target's health.
    Hit {
        damage: f32,
        critical: bool,
        perfect: bool,
    },
    /// The block held; only chip damage went through.
    Blocked { chip: f32 },
    Dodged,
    /// The target was invulnerable.
    Missed,
    /// The attack was refused before resolution: stunned or dead attacker,
    /// self-attack, or a target without combat state.
    Rejected(Rejection),
}

pub(crate) fn combat_config(world: &World) -> CombatConfig {
    world
        .get_resource::<CombatConfig>()
        .cloned()
        .unwrap_or_default()
}

pub(crate) fn now(world: &World) -> f32 {
    world
        .get_resource::<WorldTime>()
        .map_or(0.0, |time| time.elapsed)
}

fn roll_chance(world: &mut World, p: f32) -> bool {
    world.get_resource_or_init::<CombatRng>().chance(p)
}

/// Raise an `ActionRejected` event and hand the reason back to the caller.
pub(crate) fn reject(
    world: &mut World,
    entity: Entity,
    action: CombatAction,
    reason: Rejection,
) -> Rejection {
    warn!("{:?}: {:?} rejected ({})", entity, action, reason);
    world.trigger(CombatEvent::ActionRejected {
        entity,
        action,
        reason: reason.clone(),
    });
    reason
}

/// Give `entity` a fresh combat state. Returns `false` for unknown entities.
pub fn init_combat(world: &mut World, entity: Entity, combat: Combat) -> bool {
    match world.get_entity_mut(entity) {
        Ok(mut entity_mut) => {
            entity_mut.insert(combat);
            true
        }
        Err(_) => {
            warn!("init_combat: unknown entity {:?}", entity);
            false
        }
    }
}

/// Subtract `amount` from the target's health.
///
/// Direct damage is refused while the target is invulnerable (raising `Missed`)
/// and otherwise grants the grace invulnerability. Over-time damage ignores both.
/// Reaching zero health raises `Died` once and removes the [`Combat`] component.
///
/// Returns the health actually removed, or `None` when nothing was applied.
pub fn apply_damage(
    world: &mut World,
    target: Entity,
    amount: f32,
    kind: DamageKind,
    source: Option<Entity>,
) -> Option<f32> {
    let grace = combat_config(world).invulnerability_grace;
    let Some(mut combat) = world.get_mut::<Combat>(target) else {
        debug!("apply_damage: {:?} has no combat state", target);
        return None;
    };

    if kind == DamageKind::Direct && combat.is_invulnerable() {
        drop(combat);
        world.trigger(CombatEvent::Missed {
            attacker: source,
            target,
            reason: MissReason::Invulnerable,
        });
        return None;
    }

    let before = combat.health;
    combat.set_health(before - amount.max(0.0));
    let applied = before - combat.health;
    let health = combat.health;
    let alive = combat.is_alive();
    if kind == DamageKind::Direct && alive {
        combat.set_invulnerable(grace);
    }
    drop(combat);

    world.trigger(CombatEvent::Damaged {
        target,
        source,
        amount: applied,
        health,
        kind,
    });

    if !alive {
        world.entity_mut(target).remove::<Combat>();
        debug!("{:?} died (killer {:?})", target, source);
        world.trigger(CombatEvent::Died {
            entity: target,
            killer: source,
        });
    }
    Some(applied)
}

/// Restore health, clamped to the maximum. Returns the amount actually healed.
pub fn heal(world: &mut World, target: Entity, amount: f32, source: Option<Entity>) -> Option<f32> {
    let Some(mut combat) = world.get_mut::<Combat>(target) else {
        debug!("heal: {:?} has no combat state", target);
        return None;
    };
    let before = combat.health;
    combat.set_health(before + amount.max(0.0));
    let applied = combat.health - before;
    let health = combat.health;
    drop(combat);

    world.trigger(CombatEvent::Healed {
        target,
        source,
        amount: applied,
        health,
    });
    Some(applied)
}

/// Raise a guard for `duration` seconds.
///
/// Rejected while stunned or dodging. Blocking again refreshes the countdown.
pub fn block(world: &mut World, entity: Entity, duration: f32) -> Result<(), Rejection> {
    let Some(mut combat) = world.get_mut::<Combat>(entity) else {
        return Err(reject(
            world,
            entity,
            CombatAction::Block,
            Rejection::MissingCombat,
        ));
    };
    let refusal = if combat.is_stunned() {
        Some(Rejection::Stunned)
    } else if combat.is_dodging() {
        Some(Rejection::StanceConflict)
    } else {
        combat.stance = Stance::Blocking {
            remaining: duration.max(0.0),
        };
        None
    };
    drop(combat);

    match refusal {
        Some(reason) => Err(reject(world, entity, CombatAction::Block, reason)),
        None => Ok(()),
    }
}

/// Dodge for `duration` seconds: invulnerable for the same time and, with a
/// physics body, pushed along `direction` proportionally to speed.
///
/// Rejected while stunned or blocking.
pub fn dodge(
    world: &mut World,
    entity: Entity,
    duration: f32,
    direction: Vec2,
) -> Result<(), Rejection> {
    let scale = combat_config(world).dodge_impulse_scale;
    let Some(mut combat) = world.get_mut::<Combat>(entity) else {
        return Err(reject(
            world,
            entity,
            CombatAction::Dodge,
            Rejection::MissingCombat,
        ));
    };
    let refusal = if combat.is_stunned() {
        Some(Rejection::Stunned)
    } else if combat.is_blocking() {
        Some(Rejection::StanceConflict)
    } else {
        let duration = duration.max(0.0);
        combat.stance = Stance::Dodging {
            remaining: duration,
        };
        combat.set_invulnerable(duration);
        None
    };
    let speed = combat.effective_speed();
    drop(combat);

    if let Some(reason) = refusal {
        return Err(reject(world, entity, CombatAction::Dodge, reason));
    }
    if let Some(mut body) = world.get_mut::<Physics>(entity) {
        body.apply_impulse(direction.normalize_or_zero() * speed * scale);
    }
    Ok(())
}

/// Add or refresh a named status effect. A `Stun` payload also stuns the target.
pub fn apply_status_effect(
    world: &mut World,
    target: Entity,
    name: &str,
    effect: StatusEffect,
) -> bool {
    let Some(mut combat) = world.get_mut::<Combat>(target) else {
        debug!("apply_status_effect: {:?} has no combat state", target);
        return false;
    };
    if effect.payload == EffectPayload::Stun {
        combat.stun(effect.remaining);
    }
    combat.status_effects.insert(name.to_string(), effect);
    drop(combat);

    world.trigger(CombatEvent::StatusApplied {
        target,
        name: name.to_string(),
        duration: effect.remaining,
    });
    true
}

/// Remove a status effect before it expires. Removing a stun ends the stun.
pub fn remove_status_effect(world: &mut World, target: Entity, name: &str) -> bool {
    let Some(mut combat) = world.get_mut::<Combat>(target) else {
        return false;
    };
    let Some(effect) = combat.status_effects.remove(name) else {
        return false;
    };
    if effect.payload == EffectPayload::Stun {
        combat.stunned = None;
    }
    drop(combat);

    world.trigger(CombatEvent::StatusRemoved {
        target,
        name: name.to_string(),
    });
    true
}

fn knock_back(world: &mut World, attacker: Entity, target: Entity, magnitude: f32) {
    if magnitude <= 0.0 || world.get::<Physics>(target).is_none() {
        return;
    }
    let from = world.get::<Transform>(attacker).map(Transform::center);
    let to = world.get::<Transform>(target).map(Transform::center);
    let direction = match (from, to) {
        (Some(from), Some(to)) => (to - from).try_normalize().unwrap_or(Vec2::X),
        _ => Vec2::X,
    };
    if let Some(mut body) = world.get_mut::<Physics>(target) {
        body.apply_impulse(direction * magnitude);
    }
}

fn update_combo(world: &mut World, attacker: Entity, window: f32) {
    let now = now(world);
    let Some(mut combat) = world.get_mut::<Combat>(attacker) else {
        return;
    };
    let within = combat.combo_count > 0
        && combat
            .last_attack_time
            .is_some_and(|last| now - last <= window);
    combat.combo_count = if within { combat.combo_count + 1 } else { 1 };
    combat.combo_timer = window;
    combat.last_attack_time = Some(now);
    let count = combat.combo_count;
    drop(combat);

    world.trigger(CombatEvent::ComboUpdated {
        entity: attacker,
        count,
    });
}

/// Resolve one attack right now.
pub fn resolve_attack(world: &mut World, intent: &AttackIntent) -> AttackOutcome {
    let config = combat_config(world);
    let AttackIntent {
        attacker,
        target,
        attack_type,
        base_damage,
        timing_ms,
    } = *intent;

    let Some(offense) = world.get::<Combat>(attacker) else {
        return AttackOutcome::Rejected(reject(
            world,
            attacker,
            CombatAction::Attack,
            Rejection::MissingCombat,
        ));
    };
    if offense.is_stunned() {
        return AttackOutcome::Rejected(reject(
            world,
            attacker,
            CombatAction::Attack,
            Rejection::Stunned,
        ));
    }
    let attack = offense.effective_attack();
    let critical_chance = offense.stats.critical_chance;
    let combo_bonus = if offense.combo_active() {
        config.combo_multiplier.powi(offense.combo_count as i32)
    } else {
        1.0
    };

    if attacker == target {
        return AttackOutcome::Rejected(reject(
            world,
            attacker,
            CombatAction::Attack,
            Rejection::SelfTarget,
        ));
    }
    let Some(defense) = world.get::<Combat>(target) else {
        return AttackOutcome::Rejected(reject(
            world,
            attacker,
            CombatAction::Attack,
            Rejection::InvalidTarget,
        ));
    };
    let invulnerable = defense.is_invulnerable();
    let blocking = defense.is_blocking();
    let dodging = defense.is_dodging();
    let defense_stat = defense.effective_defense();

    // A dodge carries its own invulnerability; report it as a dodge.
    if invulnerable && dodging {
        world.trigger(CombatEvent::Dodged { attacker, target });
        return AttackOutcome::Dodged;
    }
    if invulnerable {
        world.trigger(CombatEvent::Missed {
            attacker: Some(attacker),
            target,
            reason: MissReason::Invulnerable,
        });
        return AttackOutcome::Missed;
    }

    let mitigated = config.mitigated_damage(base_damage, attack, defense_stat, attack_type);

    if blocking {
        let chance = config.block_chance(defense_stat, attack, attack_type);
        if roll_chance(world, chance) {
            let chip = (mitigated.floor() * config.block_chip_ratio)
                .round()
                .max(config.min_damage);
            world.trigger(CombatEvent::Blocked {
                attacker,
                target,
                damage: chip,
            });
            apply_damage(world, target, chip, DamageKind::Direct, Some(attacker));
            return AttackOutcome::Blocked { chip };
        }
        debug!("{:?} broke through {:?}'s guard", attacker, target);
    }

    if dodging {
        world.trigger(CombatEvent::Dodged { attacker, target });
        return AttackOutcome::Dodged;
    }

    let mut damage = mitigated * combo_bonus;
    let perfect = timing_ms < config.perfect_timing_ms;
    if perfect {
        damage *= config.perfect_timing_bonus;
    }
    let critical = roll_chance(world, critical_chance);
    if critical {
        damage *= config.critical_multiplier;
    }
    let damage = damage.floor().max(config.min_damage);

    let Some(dealt) = apply_damage(world, target, damage, DamageKind::Direct, Some(attacker))
    else {
        return AttackOutcome::Missed;
    };

    update_combo(world, attacker, config.combo_window);

    match attack_type {
        AttackType::Special => {
            apply_status_effect(
                world,
                target,
                "burning",
                StatusEffect::burning(config.burning_duration, config.burning_per_second),
            );
        }
        AttackType::Heavy => knock_back(world, attacker, target, config.heavy_knockback),
        AttackType::Normal | AttackType::Quick => {}
    }

    AttackOutcome::Hit {
        damage: dealt,
        critical,
        perfect,
    }
}

/// Resolve every queued attack intent in the order it was queued.
pub fn process_attack_intents(world: &mut World) {
    let intents = match world.get_resource_mut::<AttackQueue>() {
        Some(mut queue) => queue.take(),
        None => return,
    };
    for intent in intents {
        let outcome = resolve_attack(world, &intent);
        debug!(
            "{:?} -> {:?} ({:?}): {:?}",
            intent.attacker, intent.target, intent.attack_type, outcome
        );
    }
}
