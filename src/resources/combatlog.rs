//! Combat logging.
//!
//! Records every [`CombatEvent`] with the world time it happened at, for display,
//! post-match analysis and cumulative statistics. Filled by the
//! [`record_combat_event`](crate::systems::combatlog::record_combat_event) observer.
//!
//! The log is bounded: once `max_entries` is reached the oldest entry is dropped
//! for every new one. Totals are kept per live entity and released when the
//! entity is purged by the destruction pass.

use std::collections::VecDeque;

use bevy_ecs::prelude::{Entity, Resource};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::events::combat::{CombatEvent, DamageKind};

/// Types of combat log entries for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatLogKind {
    Damage,
    Healing,
    /// Missed, blocked or dodged attacks.
    Defense,
    AbilityUsed,
    StatusApplied,
    StatusRemoved,
    Combo,
    /// Refused requests: cooldown, mana, stance, stun.
    Rejected,
    Death,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombatLogEntry {
    /// World time in seconds.
    pub timestamp: f32,
    pub kind: CombatLogKind,
    /// Human-readable description of the event.
    pub message: String,
    /// Entity bits (`Entity::to_bits`) of the acting entity, if any.
    pub source: Option<u64>,
    /// Entity bits of the affected entity.
    pub target: u64,
    pub amount: Option<f32>,
}

/// Running totals for one entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CombatTotals {
    pub damage_dealt: f32,
    pub damage_taken: f32,
    pub healing_done: f32,
    pub healing_received: f32,
    pub kills: u32,
    pub deaths: u32,
}

/// Entries kept by a default log.
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

#[derive(Resource, Debug)]
pub struct CombatLog {
    /// Retained log entries in chronological order.
    pub entries: VecDeque<CombatLogEntry>,
    max_entries: usize,
    totals: FxHashMap<Entity, CombatTotals>,
}

impl Default for CombatLog {
    fn default() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }
}

impl CombatLog {
    /// Empty log retaining at most `max_entries` entries (at least one).
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries: max_entries.max(1),
            totals: FxHashMap::default(),
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Forget the totals of `entity`. Returns what was recorded for it.
    pub fn release(&mut self, entity: Entity) -> Option<CombatTotals> {
        self.totals.remove(&entity)
    }

    /// Clear entries and totals.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.totals.clear();
    }

    /// Append an entry for `event` and update the totals it affects.
    pub fn record(&mut self, timestamp: f32, event: &CombatEvent) {
        let target = event.subject();
        let (kind, source, amount, message) = match event {
            CombatEvent::Missed {
                attacker, reason, ..
            } => (
                CombatLogKind::Defense,
                *attacker,
                None,
                format!("{:?} missed ({:?})", target, reason),
            ),
            CombatEvent::Blocked {
                attacker, damage, ..
            } => (
                CombatLogKind::Defense,
                Some(*attacker),
                Some(*damage),
                format!("{:?} blocked {:?} ({:.0} chip)", target, attacker, damage),
            ),
            CombatEvent::Dodged { attacker, .. } => (
                CombatLogKind::Defense,
                Some(*attacker),
                None,
                format!("{:?} dodged {:?}", target, attacker),
            ),
            CombatEvent::Damaged {
                source,
                amount,
                health,
                kind,
                ..
            } => {
                self.totals.entry(target).or_default().damage_taken += amount;
                if let Some(src) = source {
                    self.totals.entry(*src).or_default().damage_dealt += amount;
                }
                let how = match kind {
                    DamageKind::Direct => "damage",
                    DamageKind::OverTime => "damage over time",
                };
                (
                    CombatLogKind::Damage,
                    *source,
                    Some(*amount),
                    format!("{:?} took {:.1} {} ({:.1} left)", target, amount, how, health),
                )
            }
            CombatEvent::Healed {
                source,
                amount,
                health,
                ..
            } => {
                self.totals.entry(target).or_default().healing_received += amount;
                if let Some(src) = source {
                    self.totals.entry(*src).or_default().healing_done += amount;
                }
                (
                    CombatLogKind::Healing,
                    *source,
                    Some(*amount),
                    format!("{:?} healed {:.1} ({:.1} now)", target, amount, health),
                )
            }
            CombatEvent::StatusApplied { name, duration, .. } => (
                CombatLogKind::StatusApplied,
                None,
                Some(*duration),
                format!("{:?} gains {} for {:.1}s", target, name, duration),
            ),
            CombatEvent::StatusRemoved { name, .. } => (
                CombatLogKind::StatusRemoved,
                None,
                None,
                format!("{} fades from {:?}", name, target),
            ),
            CombatEvent::ComboUpdated { count, .. } => (
                CombatLogKind::Combo,
                None,
                Some(*count as f32),
                format!("{:?} combo x{}", target, count),
            ),
            CombatEvent::ComboEnded { count, .. } => (
                CombatLogKind::Combo,
                None,
                Some(*count as f32),
                format!("{:?} combo ended at {}", target, count),
            ),
            CombatEvent::AbilityUsed {
                ability, targets, ..
            } => (
                CombatLogKind::AbilityUsed,
                None,
                None,
                format!("{:?} used {} on {} target(s)", target, ability, targets.len()),
            ),
            CombatEvent::AbilityOnCooldown {
                ability, remaining, ..
            } => (
                CombatLogKind::Rejected,
                None,
                Some(*remaining),
                format!("{:?}: {} on cooldown ({:.1}s)", target, ability, remaining),
            ),
            CombatEvent::InsufficientMana {
                ability,
                required,
                available,
                ..
            } => (
                CombatLogKind::Rejected,
                None,
                Some(*required),
                format!(
                    "{:?}: {} needs {:.0} mana, has {:.0}",
                    target, ability, required, available
                ),
            ),
            CombatEvent::ActionRejected { action, reason, .. } => (
                CombatLogKind::Rejected,
                None,
                None,
                format!("{:?}: {:?} rejected ({})", target, action, reason),
            ),
            CombatEvent::Died { killer, .. } => {
                self.totals.entry(target).or_default().deaths += 1;
                if let Some(k) = killer {
                    self.totals.entry(*k).or_default().kills += 1;
                }
                (
                    CombatLogKind::Death,
                    *killer,
                    None,
                    format!("{:?} died", target),
                )
            }
        };

        if self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(CombatLogEntry {
            timestamp,
            kind,
            message,
            source: source.map(Entity::to_bits),
            target: target.to_bits(),
            amount,
        });
    }

    /// Entries of one kind, oldest first.
    pub fn filter_by_kind(&self, kind: CombatLogKind) -> Vec<&CombatLogEntry> {
        self.entries.iter().filter(|e| e.kind == kind).collect()
    }

    /// The last `count` entries, oldest first.
    pub fn recent(&self, count: usize) -> Vec<&CombatLogEntry> {
        let start = self.entries.len().saturating_sub(count);
        self.entries.iter().skip(start).collect()
    }

    /// Totals for `entity`; zeroes if it never appeared.
    pub fn totals_for(&self, entity: Entity) -> CombatTotals {
        self.totals.get(&entity).copied().unwrap_or_default()
    }

    /// Entries serialized as a JSON array.
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(&self.entries)
            .map_err(|e| format!("Failed to serialize combat log: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::world::World;

    #[test]
    fn damage_and_death_update_totals() {
        let mut world = World::new();
        let hero = world.spawn_empty().id();
        let goblin = world.spawn_empty().id();
        let mut log = CombatLog::default();

        log.record(
            1.0,
            &CombatEvent::Damaged {
                target: goblin,
                source: Some(hero),
                amount: 13.0,
                health: 0.0,
                kind: DamageKind::Direct,
            },
        );
        log.record(
            1.0,
            &CombatEvent::Died {
                entity: goblin,
                killer: Some(hero),
            },
        );

        assert_eq!(log.entries.len(), 2);
        assert_eq!(log.totals_for(hero).damage_dealt, 13.0);
        assert_eq!(log.totals_for(hero).kills, 1);
        assert_eq!(log.totals_for(goblin).damage_taken, 13.0);
        assert_eq!(log.totals_for(goblin).deaths, 1);
        assert_eq!(log.filter_by_kind(CombatLogKind::Death).len(), 1);
    }

    #[test]
    fn oldest_entries_are_dropped_at_capacity() {
        let mut world = World::new();
        let e = world.spawn_empty().id();
        let mut log = CombatLog::with_max_entries(3);
        for count in 1..=5 {
            log.record(count as f32, &CombatEvent::ComboUpdated { entity: e, count });
        }
        let kept: Vec<f32> = log.entries.iter().map(|e| e.timestamp).collect();
        assert_eq!(kept, vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn released_entities_lose_their_totals() {
        let mut world = World::new();
        let hero = world.spawn_empty().id();
        let goblin = world.spawn_empty().id();
        let mut log = CombatLog::default();
        log.record(
            0.0,
            &CombatEvent::Damaged {
                target: goblin,
                source: Some(hero),
                amount: 4.0,
                health: 96.0,
                kind: DamageKind::Direct,
            },
        );

        let released = log.release(goblin).unwrap();
        assert_eq!(released.damage_taken, 4.0);
        assert_eq!(log.totals_for(goblin), CombatTotals::default());
        assert_eq!(log.totals_for(hero).damage_dealt, 4.0);
        assert!(log.release(goblin).is_none());
    }

    #[test]
    fn recent_keeps_chronological_order() {
        let mut world = World::new();
        let e = world.spawn_empty().id();
        let mut log = CombatLog::default();
        for count in 1..=4 {
            log.record(count as f32, &CombatEvent::ComboUpdated { entity: e, count });
        }
        let recent: Vec<f32> = log.recent(2).iter().map(|e| e.timestamp).collect();
        assert_eq!(recent, vec![3.0, 4.0]);
        assert_eq!(log.recent(10).len(), 4);
    }

    #[test]
    fn json_export_contains_kind_and_target() {
        let mut world = World::new();
        let e = world.spawn_empty().id();
        let mut log = CombatLog::default();
        log.record(
            0.5,
            &CombatEvent::StatusRemoved {
                target: e,
                name: "burning".into(),
            },
        );
        let json = log.to_json().unwrap();
        assert!(json.contains("\"status_removed\""));
        assert!(json.contains(&e.to_bits().to_string()));
    }
}
