use crate::base_parser::LineParser;
use crate::grammar::take_quoted;
use crate::{GameEvent, ParseError};

/// `World triggered "Game_Over" reason "<reason>"`, one per finished match.
pub struct SessionBoundaryParser;

impl LineParser for SessionBoundaryParser {
    fn name(&self) -> &'static str {
        "session_boundary"
    }

    fn markers(&self) -> &'static [&'static str] {
        &["triggered \"Game_Over\""]
    }

    fn parse(&self, body: &str) -> Result<Option<GameEvent>, ParseError> {
        let reason = body
            .strip_prefix("World triggered \"Game_Over\" reason ")
            .and_then(take_quoted)
            .map(|(reason, _)| reason);

        Ok(reason.map(|reason| GameEvent::SessionBoundary {
            reason: reason.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_over() {
        let event = SessionBoundaryParser
            .parse(r#"World triggered "Game_Over" reason "Reached Win Limit""#)
            .unwrap();
        assert_eq!(
            event,
            Some(GameEvent::SessionBoundary {
                reason: "Reached Win Limit".to_string()
            })
        );
    }

    #[test]
    fn test_player_cannot_end_the_game() {
        let event = SessionBoundaryParser
            .parse(r#""joe<3><[U:1:9]><Red>" triggered "Game_Over" reason "lol""#)
            .unwrap();
        assert!(event.is_none());
    }
}
