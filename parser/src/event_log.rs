use crate::Position;
use serde::{Deserialize, Serialize};

/// One side of a kill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KillEvent {
    /// Epoch milliseconds, UTC.
    pub time: i64,
    pub attacker: Combatant,
    pub victim: Combatant,
    pub weapon: String,
    pub crit: bool,
    pub headshot: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEvent {
    pub time: i64,
    pub name: String,
    pub id: String,
    pub team: String,
    pub message: String,
    pub is_team_chat: bool,
}

/// Append-only record sequence in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog<T> {
    records: Vec<T>,
}

pub type KillLog = EventLog<KillEvent>;
pub type ChatLog = EventLog<ChatEvent>;

impl<T> EventLog<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn append(&mut self, record: T) {
        self.records.push(record);
    }

    pub fn all(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn reset(&mut self) {
        self.records.clear();
    }
}

impl<T> Default for EventLog<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat(message: &str) -> ChatEvent {
        ChatEvent {
            time: 0,
            name: "joe".into(),
            id: "1".into(),
            team: "Red".into(),
            message: message.into(),
            is_team_chat: false,
        }
    }

    #[test]
    fn test_append_keeps_order_and_duplicates() {
        let mut log = ChatLog::new();
        log.append(chat("gg"));
        log.append(chat("wp"));
        log.append(chat("gg"));

        let messages: Vec<_> = log.all().iter().map(|c| c.message.as_str()).collect();
        assert_eq!(messages, vec!["gg", "wp", "gg"]);
    }

    #[test]
    fn test_reset() {
        let mut log = ChatLog::default();
        log.append(chat("gg"));
        log.reset();
        assert!(log.is_empty());
    }
}
