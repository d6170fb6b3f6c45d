use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const UNKNOWN_CLASS: &str = "Unknown";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotCounts {
    pub fired: u64,
    pub hit: u64,
}

/// Cumulative per-player counters.
///
/// Every keyed breakdown sums to its paired scalar: `kills_by_weapon` and
/// `kills_by_players` to `kills`, `damage_by_weapon` and `damage_to_players` to
/// `damage_dealt`, and so on. Entries appear on first write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub damage_dealt: u64,
    pub kills: u64,
    pub deaths: u64,
    pub healing_given: u64,
    pub healing_received: u64,
    pub healing_from_items: u64,

    pub damage_to_players: BTreeMap<String, u64>,
    pub damaged_by_players: BTreeMap<String, u64>,
    pub damage_by_weapon: BTreeMap<String, u64>,
    pub damaged_by_weapon: BTreeMap<String, u64>,

    pub kills_by_players: BTreeMap<String, u64>,
    pub kills_by_weapon: BTreeMap<String, u64>,
    pub deaths_by_players: BTreeMap<String, u64>,
    pub deaths_by_weapon: BTreeMap<String, u64>,

    pub healing_to_players: BTreeMap<String, u64>,
    pub healing_from_players: BTreeMap<String, u64>,

    pub shots: BTreeMap<String, ShotCounts>,
    pub items_picked_up: BTreeMap<String, u64>,
}

pub(crate) fn bump(map: &mut BTreeMap<String, u64>, key: &str, by: u64) {
    match map.get_mut(key) {
        Some(value) => *value = value.saturating_add(by),
        None => {
            map.insert(key.to_string(), by);
        }
    }
}

impl PlayerStats {
    /// Damage received, derived from the per-attacker breakdown.
    pub fn damage_taken(&self) -> u64 {
        self.damaged_by_players.values().fold(0, |acc, v| acc.saturating_add(*v))
    }

    pub fn shots_fired(&self) -> u64 {
        self.shots.values().fold(0, |acc, s| acc.saturating_add(s.fired))
    }

    pub fn shots_hit(&self) -> u64 {
        self.shots.values().fold(0, |acc, s| acc.saturating_add(s.hit))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub legacy_id: String,
    /// Empty until a role change or team join is seen.
    pub team: String,
    pub class: String,
    pub stats: PlayerStats,
}

impl Player {
    fn new(id: &str, legacy_id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            legacy_id: legacy_id.to_string(),
            team: String::new(),
            class: UNKNOWN_CLASS.to_string(),
            stats: PlayerStats::default(),
        }
    }
}

/// Players of one file keyed by canonical identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerRegistry {
    players: BTreeMap<String, Player>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get-or-create. An existing player keeps its counters; only the display
    /// name and legacy identifier are refreshed.
    pub fn ensure(&mut self, id: &str, legacy_id: &str, name: &str) -> &mut Player {
        let player = self.players.entry(id.to_string()).or_insert_with(|| {
            debug!("New player {} ({})", id, name);
            Player::new(id, legacy_id, name)
        });

        if player.name != name {
            player.name = name.to_string();
        }
        if player.legacy_id != legacy_id {
            player.legacy_id = legacy_id.to_string();
        }
        player
    }

    pub fn get(&self, id: &str) -> Option<&Player> {
        self.players.get(id)
    }

    /// Update team and class of a known player. Unknown identifiers are left
    /// alone; callers `ensure` first.
    pub fn set_team_and_class(&mut self, id: &str, team: &str, class: &str) {
        match self.players.get_mut(id) {
            Some(player) => {
                player.team = team.to_string();
                player.class = class.to_string();
            }
            None => warn!("set_team_and_class for unknown player {}", id),
        }
    }

    pub fn reset(&mut self) {
        self.players.clear();
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.players.keys().map(String::as_str)
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }
}
