//! Combat tuning constants.
//!
//! Loaded from the `[combat]` section of the INI file by
//! [`SimConfig`](crate::resources::simconfig::SimConfig). Defaults reproduce the
//! reference damage model:
//!
//! ```text
//! damage = max(1, base + attack * 0.5 - defense * 0.3) * type_multiplier
//!          * combo_multiplier^combo_count   (while the combo is active)
//!          * perfect_timing_bonus           (timing_ms < perfect_timing_ms)
//!          * critical_multiplier            (on a critical roll)
//! ```

use bevy_ecs::prelude::Resource;
use configparser::ini::Ini;

use crate::components::combat::AttackType;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct CombatConfig {
    pub attack_scaling: f32,
    pub defense_scaling: f32,
    pub min_damage: f32,
    pub normal_multiplier: f32,
    pub quick_multiplier: f32,
    pub heavy_multiplier: f32,
    pub special_multiplier: f32,
    /// Seconds after a landed attack during which the next one extends the combo.
    pub combo_window: f32,
    pub combo_multiplier: f32,
    pub perfect_timing_ms: f32,
    pub perfect_timing_bonus: f32,
    pub critical_multiplier: f32,
    /// Invulnerability granted after taking direct damage.
    pub invulnerability_grace: f32,
    pub block_base_chance: f32,
    /// Block chance change per point of `defense - attack`.
    pub block_stat_factor: f32,
    /// Block chance multiplier against heavy attacks.
    pub heavy_block_factor: f32,
    /// Fraction of the hit that still lands through a successful block.
    pub block_chip_ratio: f32,
    pub mana_regen_per_second: f32,
    /// Dodge impulse per point of speed.
    pub dodge_impulse_scale: f32,
    /// Impulse applied to targets of landed heavy attacks. Zero disables.
    pub heavy_knockback: f32,
    pub burning_duration: f32,
    pub burning_per_second: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            attack_scaling: 0.5,
            defense_scaling: 0.3,
            min_damage: 1.0,
            normal_multiplier: 1.0,
            quick_multiplier: 0.8,
            heavy_multiplier: 1.5,
            special_multiplier: 2.0,
            combo_window: 1.5,
            combo_multiplier: 1.1,
            perfect_timing_ms: 100.0,
            perfect_timing_bonus: 1.5,
            critical_multiplier: 2.0,
            invulnerability_grace: 0.3,
            block_base_chance: 0.7,
            block_stat_factor: 0.05,
            heavy_block_factor: 0.5,
            block_chip_ratio: 0.2,
            mana_regen_per_second: 5.0,
            dodge_impulse_scale: 2.0,
            heavy_knockback: 200.0,
            burning_duration: 3.0,
            burning_per_second: 4.0,
        }
    }
}

impl CombatConfig {
    pub fn type_multiplier(&self, attack_type: AttackType) -> f32 {
        match attack_type {
            AttackType::Normal => self.normal_multiplier,
            AttackType::Quick => self.quick_multiplier,
            AttackType::Heavy => self.heavy_multiplier,
            AttackType::Special => self.special_multiplier,
        }
    }

    /// Hit damage before combo, timing and critical modifiers (not yet floored).
    pub fn mitigated_damage(
        &self,
        base_damage: f32,
        attack: f32,
        defense: f32,
        attack_type: AttackType,
    ) -> f32 {
        let raw = base_damage + attack * self.attack_scaling - defense * self.defense_scaling;
        raw.max(self.min_damage) * self.type_multiplier(attack_type)
    }

    /// Probability that a block holds, clamped to `0..=1`.
    pub fn block_chance(&self, defense: f32, attack: f32, attack_type: AttackType) -> f32 {
        let mut chance = self.block_base_chance + (defense - attack) * self.block_stat_factor;
        if attack_type == AttackType::Heavy {
            chance *= self.heavy_block_factor;
        }
        chance.clamp(0.0, 1.0)
    }

    pub(crate) fn read_ini(&mut self, ini: &Ini) {
        let fields: [(&str, &mut f32); 22] = [
            ("attack_scaling", &mut self.attack_scaling),
            ("defense_scaling", &mut self.defense_scaling),
            ("min_damage", &mut self.min_damage),
            ("normal_multiplier", &mut self.normal_multiplier),
            ("quick_multiplier", &mut self.quick_multiplier),
            ("heavy_multiplier", &mut self.heavy_multiplier),
            ("special_multiplier", &mut self.special_multiplier),
            ("combo_window", &mut self.combo_window),
            ("combo_multiplier", &mut self.combo_multiplier),
            ("perfect_timing_ms", &mut self.perfect_timing_ms),
            ("perfect_timing_bonus", &mut self.perfect_timing_bonus),
            ("critical_multiplier", &mut self.critical_multiplier),
            ("invulnerability_grace", &mut self.invulnerability_grace),
            ("block_base_chance", &mut self.block_base_chance),
            ("block_stat_factor", &mut self.block_stat_factor),
            ("heavy_block_factor", &mut self.heavy_block_factor),
            ("block_chip_ratio", &mut self.block_chip_ratio),
            ("mana_regen_per_second", &mut self.mana_regen_per_second),
            ("dodge_impulse_scale", &mut self.dodge_impulse_scale),
            ("heavy_knockback", &mut self.heavy_knockback),
            ("burning_duration", &mut self.burning_duration),
            ("burning_per_second", &mut self.burning_per_second),
        ];
        for (key, field) in fields {
            if let Some(v) = ini.getfloat("combat", key).ok().flatten() {
                *field = v as f32;
            }
        }
    }

    pub(crate) fn write_ini(&self, ini: &mut Ini) {
        let fields: [(&str, f32); 22] = [
            ("attack_scaling", self.attack_scaling),
            ("defense_scaling", self.defense_scaling),
            ("min_damage", self.min_damage),
            ("normal_multiplier", self.normal_multiplier),
            ("quick_multiplier", self.quick_multiplier),
            ("heavy_multiplier", self.heavy_multiplier),
            ("special_multiplier", self.special_multiplier),
            ("combo_window", self.combo_window),
            ("combo_multiplier", self.combo_multiplier),
            ("perfect_timing_ms", self.perfect_timing_ms),
            ("perfect_timing_bonus", self.perfect_timing_bonus),
            ("critical_multiplier", self.critical_multiplier),
            ("invulnerability_grace", self.invulnerability_grace),
            ("block_base_chance", self.block_base_chance),
            ("block_stat_factor", self.block_stat_factor),
            ("heavy_block_factor", self.heavy_block_factor),
            ("block_chip_ratio", self.block_chip_ratio),
            ("mana_regen_per_second", self.mana_regen_per_second),
            ("dodge_impulse_scale", self.dodge_impulse_scale),
            ("heavy_knockback", self.heavy_knockback),
            ("burning_duration", self.burning_duration),
            ("burning_per_second", self.burning_per_second),
        ];
        for (key, value) in fields {
            ini.set("combat", key, Some(value.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mitigated_damage_matches_reference_formula() {
        let config = CombatConfig::default();
        let dmg = config.mitigated_damage(10.0, 10.0, 5.0, AttackType::Normal);
        assert!((dmg - 13.5).abs() < 1e-5);
        let heavy = config.mitigated_damage(10.0, 10.0, 5.0, AttackType::Heavy);
        assert!((heavy - 20.25).abs() < 1e-5);
    }

    #[test]
    fn mitigated_damage_floors_before_type_multiplier() {
        let config = CombatConfig::default();
        let dmg = config.mitigated_damage(0.0, 0.0, 100.0, AttackType::Special);
        assert!((dmg - 2.0).abs() < 1e-5);
    }

    #[test]
    fn block_chance_halves_against_heavy() {
        let config = CombatConfig::default();
        let normal = config.block_chance(5.0, 10.0, AttackType::Normal);
        let heavy = config.block_chance(5.0, 10.0, AttackType::Heavy);
        assert!((normal - 0.45).abs() < 1e-5);
        assert!((heavy - 0.225).abs() < 1e-5);
        assert_eq!(config.block_chance(100.0, 0.0, AttackType::Normal), 1.0);
        assert_eq!(config.block_chance(0.0, 100.0, AttackType::Normal), 0.0);
    }
}
