//! Combat state for an entity.
//!
//! The [`Combat`] component holds vitals, base stats, the defensive [`Stance`],
//! stun and invulnerability countdowns, combo bookkeeping, active status effects
//! and ability cooldowns. It is mutated only by the combat systems in
//! [`crate::systems::attack`], [`crate::systems::ability`] and
//! [`crate::systems::combat`].
//!
//! Blocking and dodging are mutually exclusive by construction: both live in the
//! single `stance` field. Stun and invulnerability are `Option<f32>` countdowns so
//! the flag and its timer can never disagree.
//!
//! A missing `Combat` component means the entity is dead (or never fought).

use bevy_ecs::prelude::Component;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::components::statuseffect::{Stat, StatusEffect};

/// Attack category chosen by the attacker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackType {
    Normal,
    Quick,
    Heavy,
    Special,
}

/// Defensive state. Blocking and dodging carry their own countdown.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Stance {
    #[default]
    Neutral,
    Blocking {
        remaining: f32,
    },
    Dodging {
        remaining: f32,
    },
}

/// Base stats before status-effect modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatStats {
    pub attack: f32,
    pub defense: f32,
    pub speed: f32,
    /// Probability in `0..=1` that a landed attack is critical.
    pub critical_chance: f32,
}

impl Default for CombatStats {
    fn default() -> Self {
        Self {
            attack: 10.0,
            defense: 5.0,
            speed: 100.0,
            critical_chance: 0.05,
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct Combat {
    pub health: f32,
    pub max_health: f32,
    pub mana: f32,
    pub max_mana: f32,
    pub stats: CombatStats,
    pub stance: Stance,
    /// Seconds of stun left; `None` when not stunned.
    pub stunned: Option<f32>,
    /// Seconds of invulnerability left; `None` when vulnerable.
    pub invulnerable: Option<f32>,
    pub combo_count: u32,
    pub combo_timer: f32,
    /// `WorldTime::elapsed` of the last landed attack.
    pub last_attack_time: Option<f32>,
    pub status_effects: FxHashMap<String, StatusEffect>,
    pub cooldowns: FxHashMap<String, f32>,
}

impl Default for Combat {
    fn default() -> Self {
        Self::new(CombatStats::default(), 100.0, 100.0)
    }
}

impl Combat {
    /// Full health and mana, neutral stance, no effects.
    pub fn new(stats: CombatStats, max_health: f32, max_mana: f32) -> Self {
        let max_health = max_health.max(1.0);
        let max_mana = max_mana.max(0.0);
        Self {
            health: max_health,
            max_health,
            mana: max_mana,
            max_mana,
            stats: CombatStats {
                critical_chance: stats.critical_chance.clamp(0.0, 1.0),
                ..stats
            },
            stance: Stance::Neutral,
            stunned: None,
            invulnerable: None,
            combo_count: 0,
            combo_timer: 0.0,
            last_attack_time: None,
            status_effects: FxHashMap::default(),
            cooldowns: FxHashMap::default(),
        }
    }

    /// Builder: start below full health.
    pub fn with_health(mut self, health: f32) -> Self {
        self.set_health(health);
        self
    }

    /// Builder: start below full mana.
    pub fn with_mana(mut self, mana: f32) -> Self {
        self.set_mana(mana);
        self
    }

    pub fn set_health(&mut self, health: f32) {
        self.health = health.clamp(0.0, self.max_health);
    }

    pub fn set_mana(&mut self, mana: f32) {
        self.mana = mana.clamp(0.0, self.max_mana);
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self.stance, Stance::Blocking { .. })
    }

    pub fn is_dodging(&self) -> bool {
        matches!(self.stance, Stance::Dodging { .. })
    }

    pub fn is_stunned(&self) -> bool {
        self.stunned.is_some()
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable.is_some()
    }

    /// Grant invulnerability for at least `duration` seconds.
    pub fn set_invulnerable(&mut self, duration: f32) {
        if duration <= 0.0 {
            return;
        }
        let current = self.invulnerable.unwrap_or(0.0);
        self.invulnerable = Some(current.max(duration));
    }

    pub fn clear_invulnerable(&mut self) {
        self.invulnerable = None;
    }

    /// Stun for at least `duration` seconds. Drops any block or dodge.
    pub fn stun(&mut self, duration: f32) {
        if duration <= 0.0 {
            return;
        }
        let current = self.stunned.unwrap_or(0.0);
        self.stunned = Some(current.max(duration));
        if let Stance::Dodging { .. } = self.stance {
            self.clear_invulnerable();
        }
        self.stance = Stance::Neutral;
    }

    /// A combo is active while it has hits and its window has not closed.
    pub fn combo_active(&self) -> bool {
        self.combo_count > 0 && self.combo_timer > 0.0
    }

    /// Remaining cooldown of an ability, zero if ready.
    pub fn cooldown(&self, ability: &str) -> f32 {
        self.cooldowns.get(ability).copied().unwrap_or(0.0)
    }

    pub fn has_status(&self, name: &str) -> bool {
        self.status_effects.contains_key(name)
    }

    fn stat_bonus(&self, stat: Stat) -> f32 {
        self.status_effects
            .values()
            .map(|effect| effect.modifier_for(stat))
            .sum()
    }

    /// Attack including active modifiers, never negative.
    pub fn effective_attack(&self) -> f32 {
        (self.stats.attack + self.stat_bonus(Stat::Attack)).max(0.0)
    }

    /// Defense including active modifiers, never negative.
    pub fn effective_defense(&self) -> f32 {
        (self.stats.defense + self.stat_bonus(Stat::Defense)).max(0.0)
    }

    /// Speed including active modifiers, never negative.
    pub fn effective_speed(&self) -> f32 {
        (self.stats.speed + self.stat_bonus(Stat::Speed)).max(0.0)
    }
}
