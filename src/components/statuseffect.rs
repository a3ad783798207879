//! Timed status effects stored on a [`Combat`](super::combat::Combat) component.
//!
//! Effects are keyed by name (`"burning"`, `"war_cry"`, ...). The payload decides
//! what the effect does while it is active:
//!
//! - [`EffectPayload::DamageOverTime`] – damage per second, applied every tick
//! - [`EffectPayload::Stun`] – target is stunned for the effect's duration
//! - [`EffectPayload::StatModifier`] – flat bonus/penalty on attack, defense or speed
//! - [`EffectPayload::Marker`] – no mechanical effect; read by collaborators

use serde::{Deserialize, Serialize};

/// Stat that a [`EffectPayload::StatModifier`] adjusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Attack,
    Defense,
    Speed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectPayload {
    DamageOverTime { per_second: f32 },
    Stun,
    StatModifier { stat: Stat, amount: f32 },
    Marker,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusEffect {
    /// Seconds left before the effect is removed.
    pub remaining: f32,
    pub payload: EffectPayload,
}

impl StatusEffect {
    pub fn new(duration: f32, payload: EffectPayload) -> Self {
        Self {
            remaining: duration.max(0.0),
            payload,
        }
    }

    pub fn burning(duration: f32, per_second: f32) -> Self {
        Self::new(duration, EffectPayload::DamageOverTime { per_second })
    }

    pub fn poisoned(duration: f32, per_second: f32) -> Self {
        Self::new(duration, EffectPayload::DamageOverTime { per_second })
    }

    pub fn stun(duration: f32) -> Self {
        Self::new(duration, EffectPayload::Stun)
    }

    pub fn modifier(duration: f32, stat: Stat, amount: f32) -> Self {
        Self::new(duration, EffectPayload::StatModifier { stat, amount })
    }

    /// Damage per second for continuous-damage effects, zero otherwise.
    pub fn damage_per_second(&self) -> f32 {
        match self.payload {
            EffectPayload::DamageOverTime { per_second } => per_second,
            _ => 0.0,
        }
    }

    pub fn is_damage_over_time(&self) -> bool {
        matches!(self.payload, EffectPayload::DamageOverTime { .. })
    }

    /// Contribution of this effect to `stat`.
    pub fn modifier_for(&self, stat: Stat) -> f32 {
        match self.payload {
            EffectPayload::StatModifier { stat: s, amount } if s == stat => amount,
            _ => 0.0,
        }
    }
}

/// Serializable description of an effect to apply, as found in ability definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSpec {
    pub name: String,
    pub duration: f32,
    pub payload: EffectPayload,
}

impl StatusSpec {
    pub fn new(name: impl Into<String>, duration: f32, payload: EffectPayload) -> Self {
        Self {
            name: name.into(),
            duration,
            payload,
        }
    }

    pub fn to_effect(&self) -> StatusEffect {
        StatusEffect::new(self.duration, self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_payload_reports_damage_per_second() {
        let e = StatusEffect::burning(3.0, 4.0);
        assert!(e.is_damage_over_time());
        assert_eq!(e.damage_per_second(), 4.0);
        assert_eq!(StatusEffect::stun(1.0).damage_per_second(), 0.0);
    }

    #[test]
    fn modifier_only_counts_for_its_stat() {
        let e = StatusEffect::modifier(5.0, Stat::Attack, 3.0);
        assert_eq!(e.modifier_for(Stat::Attack), 3.0);
        assert_eq!(e.modifier_for(Stat::Defense), 0.0);
    }

    #[test]
    fn payload_json_uses_type_tag() {
        let p: EffectPayload =
            serde_json::from_str(r#"{"type":"stat_modifier","stat":"defense","amount":-2.0}"#)
                .unwrap();
        assert_eq!(
            p,
            EffectPayload::StatModifier {
                stat: Stat::Defense,
                amount: -2.0
            }
        );
    }
}
