use serde::{Deserialize, Serialize};

/// A player reference as it appears on a log line, with the compact identifier
/// already converted to its canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub user_id: String,
    /// Canonical 64-bit identifier, kept as a string.
    pub id: String,
    /// Compact `[U:1:N]` form seen on the line.
    pub legacy_id: String,
    pub team: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotKind {
    Fired,
    Hit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UberKind {
    Activation,
    Drop,
}

/// One recognised log line, discriminated by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    Connection {
        player: Participant,
    },
    RoleChange {
        player: Participant,
        class: String,
    },
    TeamJoin {
        player: Participant,
        team: String,
    },
    Damage {
        attacker: Participant,
        victim: Participant,
        amount: u64,
        weapon: String,
    },
    Kill {
        attacker: Participant,
        victim: Participant,
        weapon: String,
        attacker_position: Position,
        victim_position: Position,
        crit: bool,
        headshot: bool,
    },
    Shot {
        player: Participant,
        weapon: String,
        kind: ShotKind,
    },
    Heal {
        healer: Participant,
        target: Participant,
        amount: u64,
    },
    ItemPickup {
        player: Participant,
        item: String,
        healing: u64,
    },
    Chat {
        player: Participant,
        message: String,
        team_chat: bool,
    },
    Uber {
        medic: Participant,
        target: Option<Participant>,
        kind: UberKind,
    },
    SessionBoundary {
        reason: String,
    },
}

impl GameEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::Connection { .. } => "connection",
            GameEvent::RoleChange { .. } => "role_change",
            GameEvent::TeamJoin { .. } => "team_join",
            GameEvent::Damage { .. } => "damage",
            GameEvent::Kill { .. } => "kill",
            GameEvent::Shot { .. } => "shot",
            GameEvent::Heal { .. } => "heal",
            GameEvent::ItemPickup { .. } => "item_pickup",
            GameEvent::Chat { .. } => "chat",
            GameEvent::Uber { .. } => "uber",
            GameEvent::SessionBoundary { .. } => "session_boundary",
        }
    }
}

/// An event together with where and when it was logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedEvent {
    /// 1-based line number in the source file.
    pub line: usize,
    /// Epoch milliseconds, UTC.
    pub time: i64,
    pub event: GameEvent,
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid player identifier: {0}")]
    Format(String),
    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    pub fn at_line(self, line: usize) -> Self {
        match self {
            ParseError::AtLine { .. } | ParseError::Io(_) => self,
            other => ParseError::AtLine {
                line,
                source: Box::new(other),
            },
        }
    }

    /// True when the underlying cause is a malformed player identifier.
    pub fn is_format(&self) -> bool {
        match self {
            ParseError::Format(_) => true,
            ParseError::AtLine { source, .. } => source.is_format(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = GameEvent::SessionBoundary {
            reason: "Reached Win Limit".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "session_boundary");
        assert_eq!(json["reason"], "Reached Win Limit");
        assert_eq!(event.kind(), "session_boundary");
    }

    #[test]
    fn test_at_line_wraps_format_errors_once() {
        let err = ParseError::Format("[U:1:x]".to_string()).at_line(7);
        assert!(err.is_format());
        assert_eq!(err.to_string(), "line 7: Invalid player identifier: [U:1:x]");

        let rewrapped = err.at_line(9);
        assert!(matches!(rewrapped, ParseError::AtLine { line: 7, .. }));
    }
}
