use crate::base_parser::LineParser;
use crate::grammar::{take_participant, take_quoted};
use crate::{GameEvent, ParseError};

/// `"<player>" connected, address "<addr>"`
pub struct ConnectionParser;

impl LineParser for ConnectionParser {
    fn name(&self) -> &'static str {
        "connection"
    }

    fn markers(&self) -> &'static [&'static str] {
        &["\" connected, address "]
    }

    fn parse(&self, body: &str) -> Result<Option<GameEvent>, ParseError> {
        let Some((player, rest)) = take_participant(body) else {
            return Ok(None);
        };
        if !rest.starts_with(" connected, address ") {
            return Ok(None);
        }

        Ok(Some(GameEvent::Connection {
            player: player.resolve()?,
        }))
    }
}

/// `"<player>" changed role to "<class>"`
pub struct RoleChangeParser;

impl LineParser for RoleChangeParser {
    fn name(&self) -> &'static str {
        "role_change"
    }

    fn markers(&self) -> &'static [&'static str] {
        &["\" changed role to \""]
    }

    fn parse(&self, body: &str) -> Result<Option<GameEvent>, ParseError> {
        let Some((player, rest)) = take_participant(body) else {
            return Ok(None);
        };
        let Some((class, _)) = rest
            .strip_prefix(" changed role to ")
            .and_then(take_quoted)
        else {
            return Ok(None);
        };

        Ok(Some(GameEvent::RoleChange {
            player: player.resolve()?,
            class: class.to_string(),
        }))
    }
}

/// `"<player>" joined team "<team>"`
pub struct TeamJoinParser;

impl LineParser for TeamJoinParser {
    fn name(&self) -> &'static str {
        "team_join"
    }

    fn markers(&self) -> &'static [&'static str] {
        &["\" joined team \""]
    }

    fn parse(&self, body: &str) -> Result<Option<GameEvent>, ParseError> {
        let Some((player, rest)) = take_participant(body) else {
            return Ok(None);
        };
        let Some((team, _)) = rest.strip_prefix(" joined team ").and_then(take_quoted) else {
            return Ok(None);
        };

        Ok(Some(GameEvent::TeamJoin {
            player: player.resolve()?,
            team: team.to_string(),
        }))
    }
}
