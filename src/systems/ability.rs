//! Ability invocation.
//!
//! Abilities are a separate resolution channel from attacks: their damage goes
//! straight through [`apply_damage`] and ignores blocking and dodging (but not
//! invulnerability). Every precondition is checked before mana is debited, so a
//! rejected ability costs nothing.
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::combat::Combat;
use crate::components::statuseffect::StatusSpec;
use crate::events::combat::{CombatAction, CombatEvent, DamageKind, Rejection};
use crate::resources::abilitybook::{AbilityBook, AbilityDef, AbilityEffect};
use crate::systems::attack::{apply_damage, apply_status_effect, heal, reject};

fn apply_status_spec(world: &mut World, target: Entity, spec: &StatusSpec) {
    apply_status_effect(world, target, &spec.name, spec.to_effect());
}

fn damage_with_status(
    world: &mut World,
    caster: Entity,
    target: Entity,
    amount: f32,
    status: Option<&StatusSpec>,
) {
    let landed = apply_damage(world, target, amount, DamageKind::Direct, Some(caster));
    if landed.is_some()
        && let Some(spec) = status
    {
        apply_status_spec(world, target, spec);
    }
}

/// Check every precondition. On failure the matching event has been raised.
fn check(
    world: &mut World,
    caster: Entity,
    def: &AbilityDef,
    targets: &[Entity],
) -> Result<(), Rejection> {
    let Some(combat) = world.get::<Combat>(caster) else {
        return Err(reject(
            world,
            caster,
            CombatAction::Ability,
            Rejection::MissingCombat,
        ));
    };
    let stunned = combat.is_stunned();
    let remaining = combat.cooldown(&def.name);
    let available = combat.mana;

    if stunned {
        return Err(reject(
            world,
            caster,
            CombatAction::Ability,
            Rejection::Stunned,
        ));
    }
    if remaining > 0.0 {
        debug!("{:?}: {} on cooldown ({:.2}s)", caster, def.name, remaining);
        world.trigger(CombatEvent::AbilityOnCooldown {
            caster,
            ability: def.name.clone(),
            remaining,
        });
        return Err(Rejection::OnCooldown { remaining });
    }
    if available < def.mana_cost {
        debug!(
            "{:?}: {} needs {} mana, has {}",
            caster, def.name, def.mana_cost, available
        );
        world.trigger(CombatEvent::InsufficientMana {
            caster,
            ability: def.name.clone(),
            required: def.mana_cost,
            available,
        });
        return Err(Rejection::InsufficientMana {
            required: def.mana_cost,
            available,
        });
    }
    if def.effect.requires_target() {
        let Some(&target) = targets.first() else {
            return Err(reject(
                world,
                caster,
                CombatAction::Ability,
                Rejection::NoTarget,
            ));
        };
        if world.get::<Combat>(target).is_none() {
            return Err(reject(
                world,
                caster,
                CombatAction::Ability,
                Rejection::InvalidTarget,
            ));
        }
    }
    Ok(())
}

/// Invoke the named ability from `caster` on `targets`.
///
/// Damage and debuffs use the first target; heals fall back to the caster; buffs
/// always affect the caster; area effects hit every target.
pub fn use_ability(
    world: &mut World,
    caster: Entity,
    name: &str,
    targets: &[Entity],
) -> Result<(), Rejection> {
    let def = world
        .get_resource::<AbilityBook>()
        .and_then(|book| book.get(name))
        .cloned();
    let Some(def) = def else {
        return Err(reject(
            world,
            caster,
            CombatAction::Ability,
            Rejection::UnknownAbility(name.to_string()),
        ));
    };

    check(world, caster, &def, targets)?;

    let attack = {
        let Some(mut combat) = world.get_mut::<Combat>(caster) else {
            return Err(Rejection::MissingCombat);
        };
        let mana = combat.mana - def.mana_cost;
        combat.set_mana(mana);
        if def.cooldown > 0.0 {
            combat.cooldowns.insert(def.name.clone(), def.cooldown);
        }
        combat.effective_attack()
    };

    world.trigger(CombatEvent::AbilityUsed {
        caster,
        ability: def.name.clone(),
        targets: targets.to_vec(),
    });

    match &def.effect {
        AbilityEffect::Damage {
            amount,
            attack_scaling,
            status,
        } => {
            let damage = (amount + attack * attack_scaling).floor().max(1.0);
            if let Some(&target) = targets.first() {
                damage_with_status(world, caster, target, damage, status.as_ref());
            }
        }
        AbilityEffect::Heal { amount } => {
            let target = targets.first().copied().unwrap_or(caster);
            heal(world, target, *amount, Some(caster));
        }
        AbilityEffect::Buff { status } => apply_status_spec(world, caster, status),
        AbilityEffect::Debuff { status } => {
            if let Some(&target) = targets.first() {
                apply_status_spec(world, target, status);
            }
        }
        AbilityEffect::Area { amount, status } => {
            let damage = amount.floor().max(1.0);
            for &target in targets {
                damage_with_status(world, caster, target, damage, status.as_ref());
            }
        }
    }
    Ok(())
}
