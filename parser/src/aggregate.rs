//! Stateless summaries over a captured event list.
//!
//! These must agree with the running totals in the player registry for the
//! same file; the tests below check that.

use crate::registry::bump;
use crate::{GameEvent, ParsedEvent, UberKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UberCounts {
    pub activations: u64,
    pub drops: u64,
}

/// All summary tables, keyed by canonical identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub kills: BTreeMap<String, u64>,
    pub damage: BTreeMap<String, u64>,
    pub healing: BTreeMap<String, u64>,
    pub ubers: BTreeMap<String, UberCounts>,
}

pub fn kills_per_attacker(events: &[ParsedEvent]) -> BTreeMap<String, u64> {
    let mut kills = BTreeMap::new();
    for parsed in events {
        if let GameEvent::Kill { attacker, .. } = &parsed.event {
            bump(&mut kills, &attacker.id, 1);
        }
    }
    kills
}

pub fn damage_per_attacker(events: &[ParsedEvent]) -> BTreeMap<String, u64> {
    let mut damage = BTreeMap::new();
    for parsed in events {
        if let GameEvent::Damage {
            attacker, amount, ..
        } = &parsed.event
        {
            bump(&mut damage, &attacker.id, *amount);
        }
    }
    damage
}

pub fn healing_per_healer(events: &[ParsedEvent]) -> BTreeMap<String, u64> {
    let mut healing = BTreeMap::new();
    for parsed in events {
        if let GameEvent::Heal { healer, amount, .. } = &parsed.event {
            bump(&mut healing, &healer.id, *amount);
        }
    }
    healing
}

pub fn ubers_per_medic(events: &[ParsedEvent]) -> BTreeMap<String, UberCounts> {
    let mut ubers: BTreeMap<String, UberCounts> = BTreeMap::new();
    for parsed in events {
        if let GameEvent::Uber { medic, kind, .. } = &parsed.event {
            let counts = ubers.entry(medic.id.clone()).or_default();
            match kind {
                UberKind::Activation => counts.activations += 1,
                UberKind::Drop => counts.drops += 1,
            }
        }
    }
    ubers
}

pub fn summarize(events: &[ParsedEvent]) -> Summary {
    Summary {
        kills: kills_per_attacker(events),
        damage: damage_per_attacker(events),
        healing: healing_per_healer(events),
        ubers: ubers_per_medic(events),
    }
}
