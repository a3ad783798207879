//! Data-driven ability definitions.
//!
//! Abilities are looked up by name when
//! [`use_ability`](crate::systems::ability::use_ability) is called. A built-in set
//! is always available; a JSON file can replace or extend it:
//!
//! ```json
//! [
//!   { "name": "fireball", "mana_cost": 20, "cooldown": 2.0,
//!     "effect": { "type": "damage", "amount": 25, "attack_scaling": 0.5,
//!                 "status": { "name": "burning", "duration": 3,
//!                             "payload": { "type": "damage_over_time", "per_second": 4 } } } }
//! ]
//! ```

use bevy_ecs::prelude::Resource;
use log::info;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::components::statuseffect::{EffectPayload, Stat, StatusSpec};

/// What an ability does once its costs are paid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AbilityEffect {
    /// Damage the first target through the damage path (no block or dodge).
    Damage {
        amount: f32,
        /// Fraction of the caster's effective attack added to `amount`.
        #[serde(default)]
        attack_scaling: f32,
        #[serde(default)]
        status: Option<StatusSpec>,
    },
    /// Heal the first target, or the caster when no target is given.
    Heal { amount: f32 },
    /// Status effect on the caster.
    Buff { status: StatusSpec },
    /// Status effect on the first target.
    Debuff { status: StatusSpec },
    /// Damage and optional status on every supplied target.
    Area {
        amount: f32,
        #[serde(default)]
        status: Option<StatusSpec>,
    },
}

impl AbilityEffect {
    /// Whether the ability is rejected when no target is supplied.
    pub fn requires_target(&self) -> bool {
        matches!(
            self,
            AbilityEffect::Damage { .. } | AbilityEffect::Debuff { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityDef {
    pub name: String,
    #[serde(default)]
    pub mana_cost: f32,
    /// Seconds before the ability can be used again.
    #[serde(default)]
    pub cooldown: f32,
    pub effect: AbilityEffect,
}

impl AbilityDef {
    pub fn new(name: impl Into<String>, mana_cost: f32, cooldown: f32, effect: AbilityEffect) -> Self {
        Self {
            name: name.into(),
            mana_cost,
            cooldown,
            effect,
        }
    }
}

/// Registry of abilities keyed by name.
#[derive(Resource, Debug, Clone, Default)]
pub struct AbilityBook {
    abilities: FxHashMap<String, AbilityDef>,
}

impl AbilityBook {
    /// Book holding the built-in abilities.
    pub fn with_defaults() -> Self {
        let mut book = Self::default();
        for def in default_abilities() {
            book.insert(def);
        }
        book
    }

    /// Parse a JSON array of ability definitions.
    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let defs: Vec<AbilityDef> =
            serde_json::from_str(json).map_err(|e| format!("Failed to parse abilities: {}", e))?;
        let mut book = Self::default();
        for def in defs {
            book.insert(def);
        }
        Ok(book)
    }

    /// Load definitions from a JSON file and merge them over the current ones.
    ///
    /// Returns the number of definitions read.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<usize, String> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read ability file {:?}: {}", path, e))?;
        let loaded = Self::from_json_str(&contents)?;
        let count = loaded.len();
        self.abilities.extend(loaded.abilities);
        info!("Loaded {} abilities from {:?}", count, path);
        Ok(count)
    }

    /// Add or replace a definition.
    pub fn insert(&mut self, def: AbilityDef) {
        self.abilities.insert(def.name.clone(), def);
    }

    pub fn get(&self, name: &str) -> Option<&AbilityDef> {
        self.abilities.get(name)
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }

    /// Ability names in alphabetical order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.abilities.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn default_abilities() -> Vec<AbilityDef> {
    vec![
        AbilityDef::new(
            "fireball",
            20.0,
            2.0,
            AbilityEffect::Damage {
                amount: 25.0,
                attack_scaling: 0.5,
                status: Some(StatusSpec::new(
                    "burning",
                    3.0,
                    EffectPayload::DamageOverTime { per_second: 4.0 },
                )),
            },
        ),
        AbilityDef::new("heal", 25.0, 5.0, AbilityEffect::Heal { amount: 30.0 }),
        AbilityDef::new(
            "war_cry",
            15.0,
            10.0,
            AbilityEffect::Buff {
                status: StatusSpec::new(
                    "war_cry",
                    5.0,
                    EffectPayload::StatModifier {
                        stat: Stat::Attack,
                        amount: 5.0,
                    },
                ),
            },
        ),
        AbilityDef::new(
            "sunder",
            15.0,
            6.0,
            AbilityEffect::Debuff {
                status: StatusSpec::new(
                    "sundered",
                    4.0,
                    EffectPayload::StatModifier {
                        stat: Stat::Defense,
                        amount: -5.0,
                    },
                ),
            },
        ),
        AbilityDef::new(
            "stun_bolt",
            30.0,
            8.0,
            AbilityEffect::Damage {
                amount: 10.0,
                attack_scaling: 0.0,
                status: Some(StatusSpec::new("stunned", 1.0, EffectPayload::Stun)),
            },
        ),
        AbilityDef::new(
            "shockwave",
            40.0,
            12.0,
            AbilityEffect::Area {
                amount: 15.0,
                status: None,
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_include_every_effect_type() {
        let book = AbilityBook::with_defaults();
        assert_eq!(
            book.names(),
            vec!["fireball", "heal", "shockwave", "stun_bolt", "sunder", "war_cry"]
        );
        assert!(book.get("fireball").unwrap().effect.requires_target());
        assert!(!book.get("heal").unwrap().effect.requires_target());
    }

    #[test]
    fn json_definitions_apply_serde_defaults() {
        let book = AbilityBook::from_json_str(
            r#"[{"name":"jab","effect":{"type":"damage","amount":3}},
                {"name":"mend","mana_cost":5,"cooldown":1.5,"effect":{"type":"heal","amount":10}}]"#,
        )
        .unwrap();
        let jab = book.get("jab").unwrap();
        assert_eq!(jab.mana_cost, 0.0);
        assert_eq!(
            jab.effect,
            AbilityEffect::Damage {
                amount: 3.0,
                attack_scaling: 0.0,
                status: None
            }
        );
        assert_eq!(book.get("mend").unwrap().cooldown, 1.5);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = AbilityBook::from_json_str(r#"[{"name":"x","effect":{"type":"teleport"}}]"#)
            .unwrap_err();
        assert!(err.starts_with("Failed to parse abilities"));
    }
}
