use crate::dispatcher::{Dispatcher, EventStream, LineStats};
use crate::event_log::{ChatEvent, ChatLog, Combatant, KillEvent, KillLog};
use crate::registry::{bump, Player, PlayerRegistry, UNKNOWN_CLASS};
use crate::session::{SessionBoundary, SessionDetector, SessionResult};
use crate::{GameEvent, ParseError, ParsedEvent, Participant, ShotKind};
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use tracing::{debug, info};

/// Everything derived from one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub events: Vec<ParsedEvent>,
    pub players: PlayerRegistry,
    pub kills: KillLog,
    pub chat: ChatLog,
    pub session: SessionResult,
    pub lines: LineStats,
}

impl MatchReport {
    pub fn to_json(&self) -> Result<String, ParseError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Parse context for a single file: player registry, kill and chat logs and
/// the session detector. A fresh context starts empty, so nothing carries over
/// between files.
#[derive(Debug, Clone, Default)]
pub struct MatchState {
    pub players: PlayerRegistry,
    pub kills: KillLog,
    pub chat: ChatLog,
    pub session: SessionDetector,
}

fn ensure<'a>(players: &'a mut PlayerRegistry, p: &Participant) -> &'a mut Player {
    players.ensure(&p.id, &p.legacy_id, &p.name)
}

impl MatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold an ordered event list into a fresh context.
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a ParsedEvent>) -> Self {
        let mut state = Self::new();
        for event in events {
            state.apply(event);
        }
        state
    }

    /// Clear all state before reusing this context for another file.
    pub fn reset(&mut self) {
        self.players.reset();
        self.kills.reset();
        self.chat.reset();
        self.session.reset();
    }

    /// Apply one event. Returns the boundary outcome for `Game_Over` lines.
    pub fn apply(&mut self, parsed: &ParsedEvent) -> Option<SessionBoundary> {
        match &parsed.event {
            GameEvent::Connection { player } => {
                ensure(&mut self.players, player);
            }
            GameEvent::RoleChange { player, class } => {
                ensure(&mut self.players, player);
                self.players
                    .set_team_and_class(&player.id, &player.team, class);
            }
            GameEvent::TeamJoin { player, team } => {
                ensure(&mut self.players, player);
                self.players
                    .set_team_and_class(&player.id, team, UNKNOWN_CLASS);
            }
            GameEvent::Damage {
                attacker,
                victim,
                amount,
                weapon,
            } => {
                let stats = &mut ensure(&mut self.players, attacker).stats;
                stats.damage_dealt = stats.damage_dealt.saturating_add(*amount);
                bump(&mut stats.damage_to_players, &victim.id, *amount);
                bump(&mut stats.damage_by_weapon, weapon, *amount);

                let stats = &mut ensure(&mut self.players, victim).stats;
                bump(&mut stats.damaged_by_players, &attacker.id, *amount);
                bump(&mut stats.damaged_by_weapon, weapon, *amount);
            }
            GameEvent::Kill {
                attacker,
                victim,
                weapon,
                attacker_position,
                victim_position,
                crit,
                headshot,
            } => {
                self.kills.append(KillEvent {
                    time: parsed.time,
                    attacker: Combatant {
                        id: attacker.id.clone(),
                        position: *attacker_position,
                    },
                    victim: Combatant {
                        id: victim.id.clone(),
                        position: *victim_position,
                    },
                    weapon: weapon.clone(),
                    crit: *crit,
                    headshot: *headshot,
                });

                let stats = &mut ensure(&mut self.players, attacker).stats;
                stats.kills = stats.kills.saturating_add(1);
                bump(&mut stats.kills_by_players, &victim.id, 1);
                bump(&mut stats.kills_by_weapon, weapon, 1);

                let stats = &mut ensure(&mut self.players, victim).stats;
                stats.deaths = stats.deaths.saturating_add(1);
                bump(&mut stats.deaths_by_players, &attacker.id, 1);
                bump(&mut stats.deaths_by_weapon, weapon, 1);
            }
            GameEvent::Shot {
                player,
                weapon,
                kind,
            } => {
                let stats = &mut ensure(&mut self.players, player).stats;
                let shots = stats.shots.entry(weapon.clone()).or_default();
                match kind {
                    ShotKind::Fired => shots.fired = shots.fired.saturating_add(1),
                    ShotKind::Hit => shots.hit = shots.hit.saturating_add(1),
                }
            }
            GameEvent::Heal {
                healer,
                target,
                amount,
            } => {
                let stats = &mut ensure(&mut self.players, healer).stats;
                stats.healing_given = stats.healing_given.saturating_add(*amount);
                bump(&mut stats.healing_to_players, &target.id, *amount);

                let stats = &mut ensure(&mut self.players, target).stats;
                stats.healing_received = stats.healing_received.saturating_add(*amount);
                bump(&mut stats.healing_from_players, &healer.id, *amount);
            }
            GameEvent::ItemPickup {
                player,
                item,
                healing,
            } => {
                let stats = &mut ensure(&mut self.players, player).stats;
                bump(&mut stats.items_picked_up, item, 1);
                stats.healing_from_items = stats.healing_from_items.saturating_add(*healing);
            }
            GameEvent::Chat {
                player,
                message,
                team_chat,
            } => {
                ensure(&mut self.players, player);
                self.chat.append(ChatEvent {
                    time: parsed.time,
                    name: player.name.clone(),
                    id: player.id.clone(),
                    team: player.team.clone(),
                    message: message.clone(),
                    is_team_chat: *team_chat,
                });
            }
            GameEvent::Uber { medic, target, .. } => {
                ensure(&mut self.players, medic);
                if let Some(target) = target {
                    ensure(&mut self.players, target);
                }
            }
            GameEvent::SessionBoundary { reason } => {
                let boundary = self.session.observe(reason);
                debug!(
                    "Game over at line {} ({}), combined: {}",
                    parsed.line, boundary.reason, boundary.is_combined
                );
                return Some(boundary);
            }
        }

        None
    }

    pub fn into_report(self, stream: EventStream) -> MatchReport {
        MatchReport {
            session: self.session.result(),
            players: self.players,
            kills: self.kills,
            chat: self.chat,
            events: stream.events,
            lines: stream.lines,
        }
    }
}

/// Parse a whole log with a fresh dispatcher and a fresh context.
pub fn parse_match_log<R: BufRead>(reader: R) -> Result<MatchReport, ParseError> {
    let stream = Dispatcher::new().parse_reader(reader)?;
    let state = MatchState::from_events(&stream.events);

    info!(
        "Folded {} events into {} players, {} kills, {} chat messages",
        stream.events.len(),
        state.players.len(),
        state.kills.len(),
        state.chat.len()
    );

    Ok(state.into_report(stream))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const KILL: &str = r#"L 10/13/2024 - 20:12:03: "Scout<3><[U:1:1001]><Red>" killed "Sniper<4><[U:1:1002]><Blue>" with "scattergun" (attacker_position "-1020 40 -255") (victim_position "-980 12 -255") (crit "1") (headshot "0")"#;
    const DAMAGE: &str = r#"L 10/13/2024 - 20:12:02: "Scout<3><[U:1:1001]><Red>" triggered "damage" against "Sniper<4><[U:1:1002]><Blue>" (damage "40") (weapon "scattergun")"#;
    const TEAM_CHAT: &str = r#"L 10/13/2024 - 20:12:05: "Sniper<4><[U:1:1002]><Blue>" say_team "scout flank""#;

    const SCOUT: &str = "76561197960266729";
    const SNIPER: &str = "76561197960266730";

    fn parse(lines: &[&str]) -> MatchReport {
        parse_match_log(Cursor::new(lines.join("\n"))).unwrap()
    }

    fn damage_line(amount: u64) -> String {
        format!(
            r#"L 10/13/2024 - 20:12:02: "Soldier<2><[U:1:7]><Blue>" triggered "damage" against "Scout<3><[U:1:1001]><Red>" (damage "{}") (weapon "quake_rl")"#,
            amount
        )
    }

    #[test]
    fn test_kill_damage_and_team_chat() {
        let report = parse(&[KILL, DAMAGE, TEAM_CHAT]);

        assert_eq!(report.kills.len(), 1);
        let kill = &report.kills.all()[0];
        assert!(kill.crit);
        assert!(!kill.headshot);
        assert_eq!(kill.time, 1_728_850_323_000);
        assert_eq!(kill.attacker.id, SCOUT);
        assert_eq!(kill.victim.position.x, -980.0);

        let scout = report.players.get(SCOUT).unwrap();
        let sniper = report.players.get(SNIPER).unwrap();
        assert_eq!(scout.stats.kills, 1);
        assert_eq!(sniper.stats.deaths, 1);
        assert_eq!(scout.stats.damage_dealt, 40);

        assert_eq!(report.chat.len(), 1);
        let chat = &report.chat.all()[0];
        assert!(chat.is_team_chat);
        assert_eq!(chat.team, "Blue");
        assert_eq!(chat.message, "scout flank");
    }

    #[test]
    fn test_damage_breakdowns_agree() {
        let lines: Vec<String> = [12, 40, 90, 7].iter().map(|d| damage_line(*d)).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let report = parse(&refs);

        let soldier_id = crate::identity::to_canonical("[U:1:7]").unwrap();
        let soldier = &report.players.get(&soldier_id).unwrap().stats;
        let scout = &report.players.get(SCOUT).unwrap().stats;

        assert_eq!(soldier.damage_dealt, 149);
        assert_eq!(soldier.damage_by_weapon["quake_rl"], 149);
        assert_eq!(soldier.damage_to_players[SCOUT], 149);
        assert_eq!(scout.damaged_by_weapon["quake_rl"], 149);
        assert_eq!(scout.damaged_by_players[&soldier_id], 149);
        assert_eq!(scout.damage_taken(), 149);
        assert_eq!(scout.damage_dealt, 0);
    }

    #[test]
    fn test_oversized_damage_is_dropped() {
        let huge = damage_line(u64::MAX);
        let report = parse(&[huge.as_str(), huge.as_str(), damage_line(25).as_str()]);

        assert_eq!(report.lines.dropped, 2);
        assert_eq!(report.events.len(), 1);

        let soldier_id = crate::identity::to_canonical("[U:1:7]").unwrap();
        let soldier = &report.players.get(&soldier_id).unwrap().stats;
        assert_eq!(soldier.damage_dealt, 25);
        assert_eq!(soldier.damage_by_weapon["quake_rl"], 25);
    }

    #[test]
    fn test_breakdowns_sum_to_scalars() {
        let report = parse(&[
            KILL,
            KILL,
            DAMAGE,
            r#"L 10/13/2024 - 20:12:06: "Sniper<4><[U:1:1002]><Blue>" killed "Scout<3><[U:1:1001]><Red>" with "sniperrifle" (attacker_position "0 0 0") (victim_position "1 1 1")"#,
        ]);

        for player in report.players.players() {
            let s = &player.stats;
            assert_eq!(s.kills_by_weapon.values().sum::<u64>(), s.kills);
            assert_eq!(s.kills_by_players.values().sum::<u64>(), s.kills);
            assert_eq!(s.deaths_by_weapon.values().sum::<u64>(), s.deaths);
            assert_eq!(s.deaths_by_players.values().sum::<u64>(), s.deaths);
            assert_eq!(s.damage_by_weapon.values().sum::<u64>(), s.damage_dealt);
            assert_eq!(s.damage_to_players.values().sum::<u64>(), s.damage_dealt);
        }

        let scout = &report.players.get(SCOUT).unwrap().stats;
        assert_eq!(scout.kills, 2);
        assert_eq!(scout.deaths, 1);
        assert_eq!(scout.deaths_by_weapon["sniperrifle"], 1);
    }

    #[test]
    fn test_role_and_team_changes() {
        let report = parse(&[
            r#"L 10/13/2024 - 20:10:00: "joe<3><[U:1:9]><Unassigned>" joined team "Red""#,
            r#"L 10/13/2024 - 20:10:01: "joe<3><[U:1:9]><Red>" changed role to "demoman""#,
        ]);
        let joe = report.players.players().next().unwrap();
        assert_eq!(joe.team, "Red");
        assert_eq!(joe.class, "demoman");

        let report = parse(&[
            r#"L 10/13/2024 - 20:10:01: "joe<3><[U:1:9]><Red>" changed role to "demoman""#,
            r#"L 10/13/2024 - 20:10:02: "joe<3><[U:1:9]><Red>" joined team "Blue""#,
        ]);
        let joe = report.players.players().next().unwrap();
        assert_eq!(joe.team, "Blue");
        assert_eq!(joe.class, UNKNOWN_CLASS);
    }

    #[test]
    fn test_heals_items_and_shots() {
        let report = parse(&[
            r#"L 10/13/2024 - 20:10:00: "Medic<8><[U:1:2001]><Red>" triggered "healed" against "Scout<3><[U:1:1001]><Red>" (healing "30")"#,
            r#"L 10/13/2024 - 20:10:01: "Medic<8><[U:1:2001]><Red>" triggered "healed" against "Scout<3><[U:1:1001]><Red>" (healing "12")"#,
            r#"L 10/13/2024 - 20:10:02: "Scout<3><[U:1:1001]><Red>" picked up item "medkit_small" (healing "20")"#,
            r#"L 10/13/2024 - 20:10:03: "Scout<3><[U:1:1001]><Red>" picked up item "medkit_small""#,
            r#"L 10/13/2024 - 20:10:04: "Scout<3><[U:1:1001]><Red>" triggered "shot_fired" (weapon "scattergun")"#,
            r#"L 10/13/2024 - 20:10:04: "Scout<3><[U:1:1001]><Red>" triggered "shot_fired" (weapon "scattergun")"#,
            r#"L 10/13/2024 - 20:10:04: "Scout<3><[U:1:1001]><Red>" triggered "shot_hit" (weapon "scattergun")"#,
        ]);

        let medic_id = crate::identity::to_canonical("[U:1:2001]").unwrap();
        let medic = &report.players.get(&medic_id).unwrap().stats;
        let scout = &report.players.get(SCOUT).unwrap().stats;

        assert_eq!(medic.healing_given, 42);
        assert_eq!(medic.healing_to_players[SCOUT], 42);
        assert_eq!(scout.healing_received, 42);
        assert_eq!(scout.healing_from_players[&medic_id], 42);
        assert_eq!(scout.items_picked_up["medkit_small"], 2);
        assert_eq!(scout.healing_from_items, 20);
        assert_eq!(scout.shots["scattergun"].fired, 2);
        assert_eq!(scout.shots["scattergun"].hit, 1);
    }

    #[test]
    fn test_session_boundaries() {
        const GAME_OVER: &str =
            r#"L 10/13/2024 - 20:40:00: World triggered "Game_Over" reason "Reached Win Limit""#;
        const TIME_LIMIT: &str =
            r#"L 10/13/2024 - 21:20:00: World triggered "Game_Over" reason "Reached Time Limit""#;

        let single = parse(&[KILL, GAME_OVER]);
        assert!(!single.session.is_combined);
        assert_eq!(single.session.boundaries, 1);

        let combined = parse(&[GAME_OVER, KILL, TIME_LIMIT]);
        assert!(combined.session.is_combined);
        assert_eq!(combined.session.boundaries, 2);
        assert_eq!(combined.session.reason, "Reached Time Limit");

        assert_eq!(parse(&[KILL]).session, SessionResult::default());
    }

    #[test]
    fn test_apply_returns_boundary() {
        let mut state = MatchState::new();
        let event = |reason: &str| ParsedEvent {
            line: 1,
            time: 0,
            event: GameEvent::SessionBoundary {
                reason: reason.to_string(),
            },
        };

        assert_eq!(
            state.apply(&event("a")),
            Some(SessionBoundary {
                is_combined: false,
                reason: "a".to_string()
            })
        );
        assert!(state.apply(&event("b")).unwrap().is_combined);
    }

    #[test]
    fn test_fresh_context_per_file() {
        let first = parse(&[KILL]);
        let second = parse(&[damage_line(10).as_str()]);

        assert_eq!(first.players.len(), 2);
        let ids: Vec<_> = second.players.ids().collect();
        let soldier_id = crate::identity::to_canonical("[U:1:7]").unwrap();
        assert_eq!(ids, vec![soldier_id.as_str(), SCOUT]);
        assert_eq!(second.players.get(SCOUT).unwrap().stats.kills, 0);
    }

    #[test]
    fn test_reset_on_reused_context() {
        let dispatcher = Dispatcher::new();
        let mut state = MatchState::new();

        let first = dispatcher.parse_reader(Cursor::new(KILL)).unwrap();
        for event in &first.events {
            state.apply(event);
        }
        assert_eq!(state.kills.len(), 1);

        state.reset();
        let second = dispatcher.parse_reader(Cursor::new(TEAM_CHAT)).unwrap();
        for event in &second.events {
            state.apply(event);
        }

        let ids: Vec<_> = state.players.ids().collect();
        assert_eq!(ids, vec![SNIPER]);
        assert!(state.kills.is_empty());
        assert_eq!(state.players.get(SNIPER).unwrap().stats.deaths, 0);
    }

    #[test]
    fn test_report_json_round_trip() {
        let report = parse(&[KILL, DAMAGE, TEAM_CHAT]);
        let json = report.to_json().unwrap();
        assert_eq!(MatchReport::from_json(&json).unwrap(), report);
    }

    #[test]
    fn test_bot_aborts_the_parse() {
        let result = parse_match_log(Cursor::new(
            r#"L 10/13/2024 - 20:12:03: "Bot<2><BOT><Red>" killed "Scout<3><[U:1:1001]><Red>" with "minigun" (attacker_position "0 0 0") (victim_position "1 1 1")"#,
        ));
        assert!(result.unwrap_err().is_format());
    }
}
