use crate::base_parser::LineParser;
use crate::grammar::take_participant;
use crate::{GameEvent, ParseError};

/// `"<player>" say "<message>"` and `"<player>" say_team "<message>"`.
/// The message runs to the last quote on the line and may contain quotes itself.
pub struct ChatParser;

impl LineParser for ChatParser {
    fn name(&self) -> &'static str {
        "chat"
    }

    fn markers(&self) -> &'static [&'static str] {
        &["\" say \"", "\" say_team \""]
    }

    fn parse(&self, body: &str) -> Result<Option<GameEvent>, ParseError> {
        let Some((player, rest)) = take_participant(body) else {
            return Ok(None);
        };

        let (team_chat, quoted) = if let Some(q) = rest.strip_prefix(" say_team ") {
            (true, q)
        } else if let Some(q) = rest.strip_prefix(" say ") {
            (false, q)
        } else {
            return Ok(None);
        };

        let Some(message) = quoted
            .strip_prefix('"')
            .and_then(|q| q.strip_suffix('"'))
        else {
            return Ok(None);
        };

        Ok(Some(GameEvent::Chat {
            player: player.resolve()?,
            message: message.to_string(),
            team_chat,
        }))
    }
}
