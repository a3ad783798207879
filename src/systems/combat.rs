//! Per-tick combat bookkeeping.
//!
//! Advances every countdown on [`Combat`] components by the scaled delta: stance,
//! stun, invulnerability, combo window, ability cooldowns and status effects.
//! Damage-over-time effects deal `per_second * dt` (never more than their
//! remaining duration allows) through the over-time damage path. Mana
//! regenerates toward its maximum.
//!
//! Entities are visited in creation order, and every event is triggered after the
//! entity's component borrow is released.
use bevy_ecs::prelude::*;

use crate::components::combat::{Combat, Stance};
use crate::components::identity::EntitySerial;
use crate::events::combat::{CombatEvent, DamageKind};
use crate::resources::worldtime::WorldTime;
use crate::systems::attack::{apply_damage, combat_config};

fn count_down(timer: &mut Option<f32>, dt: f32) {
    if let Some(remaining) = timer {
        *remaining -= dt;
        if *remaining <= 0.0 {
            *timer = None;
        }
    }
}

fn advance_stance(stance: &mut Stance, dt: f32) {
    match stance {
        Stance::Neutral => {}
        Stance::Blocking { remaining } | Stance::Dodging { remaining } => {
            *remaining -= dt;
            if *remaining <= 0.0 {
                *stance = Stance::Neutral;
            }
        }
    }
}

/// What one entity's tick produced, applied once the borrow is gone.
#[derive(Default)]
struct TickReport {
    combo_ended: Option<u32>,
    over_time_damage: f32,
    expired: Vec<String>,
}

fn advance(combat: &mut Combat, dt: f32, mana_regen: f32) -> TickReport {
    let mut report = TickReport::default();

    advance_stance(&mut combat.stance, dt);
    count_down(&mut combat.stunned, dt);
    count_down(&mut combat.invulnerable, dt);

    let mana = combat.mana + mana_regen * dt;
    combat.set_mana(mana);

    combat.cooldowns.retain(|_, remaining| {
        *remaining = (*remaining - dt).max(0.0);
        *remaining > 0.0
    });

    if combat.combo_count > 0 {
        combat.combo_timer -= dt;
        if combat.combo_timer <= 0.0 {
            report.combo_ended = Some(combat.combo_count);
            combat.combo_count = 0;
            combat.combo_timer = 0.0;
        }
    }

    for (name, effect) in combat.status_effects.iter_mut() {
        report.over_time_damage += effect.damage_per_second() * effect.remaining.min(dt);
        effect.remaining -= dt;
        if effect.remaining <= 0.0 {
            report.expired.push(name.clone());
        }
    }
    report.expired.sort_unstable();
    for name in &report.expired {
        combat.status_effects.remove(name);
    }

    report
}

/// Advance all combat timers by [`WorldTime::delta`].
pub fn tick_combat(world: &mut World) {
    let dt = world.resource::<WorldTime>().delta;
    if dt <= 0.0 {
        return;
    }
    let mana_regen = combat_config(world).mana_regen_per_second;

    let mut fighters: Vec<(u64, Entity)> = world
        .query_filtered::<(Entity, Option<&EntitySerial>), With<Combat>>()
        .iter(world)
        .map(|(entity, serial)| (serial.map_or(u64::MAX, |s| s.0), entity))
        .collect();
    fighters.sort_unstable();

    for (_, entity) in fighters {
        let Some(mut combat) = world.get_mut::<Combat>(entity) else {
            continue;
        };
        let report = advance(&mut combat, dt, mana_regen);
        drop(combat);

        if let Some(count) = report.combo_ended {
            world.trigger(CombatEvent::ComboEnded { entity, count });
        }
        if report.over_time_damage > 0.0 {
            apply_damage(
                world,
                entity,
                report.over_time_damage,
                DamageKind::OverTime,
                None,
            );
        }
        if world.get::<Combat>(entity).is_none() {
            continue;
        }
        for name in report.expired {
            world.trigger(CombatEvent::StatusRemoved {
                target: entity,
                name,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::statuseffect::StatusEffect;

    #[test]
    fn countdowns_expire_together() {
        let mut c = Combat::default();
        c.stance = Stance::Blocking { remaining: 0.2 };
        c.stunned = Some(0.1);
        c.invulnerable = Some(0.3);
        c.cooldowns.insert("heal".into(), 0.25);

        advance(&mut c, 0.2, 0.0);
        assert_eq!(c.stance, Stance::Neutral);
        assert!(!c.is_stunned());
        assert!(c.is_invulnerable());
        assert!((c.cooldown("heal") - 0.05).abs() < 1e-5);

        advance(&mut c, 0.2, 0.0);
        assert!(!c.is_invulnerable());
        assert_eq!(c.cooldown("heal"), 0.0);
        assert!(c.cooldowns.is_empty());
    }

    #[test]
    fn dot_never_outlasts_its_duration() {
        let mut c = Combat::default();
        c.status_effects
            .insert("burning".into(), StatusEffect::burning(0.25, 4.0));
        let report = advance(&mut c, 1.0, 0.0);
        assert!((report.over_time_damage - 1.0).abs() < 1e-5);
        assert_eq!(report.expired, vec!["burning".to_string()]);
        assert!(!c.has_status("burning"));
    }

    #[test]
    fn combo_expiry_reports_final_count() {
        let mut c = Combat::default();
        c.combo_count = 3;
        c.combo_timer = 0.1;
        let report = advance(&mut c, 0.2, 0.0);
        assert_eq!(report.combo_ended, Some(3));
        assert_eq!(c.combo_count, 0);
    }

    #[test]
    fn mana_regenerates_up_to_max() {
        let mut c = Combat::default().with_mana(98.0);
        advance(&mut c, 1.0, 5.0);
        assert_eq!(c.mana, 100.0);
    }
}
