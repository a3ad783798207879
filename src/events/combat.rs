//! Combat notifications.
//!
//! Every outcome of the combat state machine, including rejected requests, is
//! reported as a [`CombatEvent`] through `World::trigger`. Observers receive them
//! immediately and in order. The [`CombatLog`](crate::resources::combatlog::CombatLog)
//! is one such observer; audio, UI or stat-tracking collaborators can add their own
//! with `World::add_observer`.

use std::fmt;

use bevy_ecs::prelude::*;

/// Why an attack did no damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissReason {
    Invulnerable,
}

/// Whether damage came from a hit or from a damage-over-time effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageKind {
    /// Attacks, ability damage, block chip. Rejected while invulnerable and grants grace.
    Direct,
    /// Burning, poison. Ignores invulnerability and never grants it.
    OverTime,
}

/// Player-facing request that can be refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatAction {
    Attack,
    Block,
    Dodge,
    Ability,
}

/// Reason a combat request was refused.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// The entity has no combat component (dead, or never initialized).
    MissingCombat,
    Stunned,
    /// Blocking while dodging or dodging while blocking.
    StanceConflict,
    OnCooldown { remaining: f32 },
    InsufficientMana { required: f32, available: f32 },
    UnknownAbility(String),
    /// The ability needs a target and none was supplied.
    NoTarget,
    /// The target has no combat state (dead or never initialized).
    InvalidTarget,
    /// An entity attacked itself.
    SelfTarget,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::MissingCombat => write!(f, "entity has no combat state"),
            Rejection::Stunned => write!(f, "stunned"),
            Rejection::StanceConflict => write!(f, "already blocking or dodging"),
            Rejection::OnCooldown { remaining } => {
                write!(f, "on cooldown for {:.2}s", remaining)
            }
            Rejection::InsufficientMana {
                required,
                available,
            } => write!(f, "needs {:.1} mana, has {:.1}", required, available),
            Rejection::UnknownAbility(name) => write!(f, "unknown ability '{}'", name),
            Rejection::NoTarget => write!(f, "no target"),
            Rejection::InvalidTarget => write!(f, "target has no combat state"),
            Rejection::SelfTarget => write!(f, "cannot attack itself"),
        }
    }
}

impl std::error::Error for Rejection {}

#[derive(Event, Debug, Clone, PartialEq)]
pub enum CombatEvent {
    Missed {
        attacker: Option<Entity>,
        target: Entity,
        reason: MissReason,
    },
    Blocked {
        attacker: Entity,
        target: Entity,
        damage: f32,
    },
    Dodged {
        attacker: Entity,
        target: Entity,
    },
    Damaged {
        target: Entity,
        source: Option<Entity>,
        amount: f32,
        health: f32,
        kind: DamageKind,
    },
    Healed {
        target: Entity,
        source: Option<Entity>,
        amount: f32,
        health: f32,
    },
    StatusApplied {
        target: Entity,
        name: String,
        duration: f32,
    },
    StatusRemoved {
        target: Entity,
        name: String,
    },
    ComboUpdated {
        entity: Entity,
        count: u32,
    },
    ComboEnded {
        entity: Entity,
        count: u32,
    },
    AbilityUsed {
        caster: Entity,
        ability: String,
        targets: Vec<Entity>,
    },
    AbilityOnCooldown {
        caster: Entity,
        ability: String,
        remaining: f32,
    },
    InsufficientMana {
        caster: Entity,
        ability: String,
        required: f32,
        available: f32,
    },
    ActionRejected {
        entity: Entity,
        action: CombatAction,
        reason: Rejection,
    },
    Died {
        entity: Entity,
        killer: Option<Entity>,
    },
}

impl CombatEvent {
    /// Entity the event is primarily about.
    pub fn subject(&self) -> Entity {
        match self {
            CombatEvent::Missed { target, .. }
            | CombatEvent::Blocked { target, .. }
            | CombatEvent::Dodged { target, .. }
            | CombatEvent::Damaged { target, .. }
            | CombatEvent::Healed { target, .. }
            | CombatEvent::StatusApplied { target, .. }
            | CombatEvent::StatusRemoved { target, .. } => *target,
            CombatEvent::ComboUpdated { entity, .. }
            | CombatEvent::ComboEnded { entity, .. }
            | CombatEvent::ActionRejected { entity, .. }
            | CombatEvent::Died { entity, .. } => *entity,
            CombatEvent::AbilityUsed { caster, .. }
            | CombatEvent::AbilityOnCooldown { caster, .. }
            | CombatEvent::InsufficientMana { caster, .. } => *caster,
        }
    }
}
