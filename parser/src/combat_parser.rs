use crate::base_parser::LineParser;
use crate::grammar::{take_participant, take_quoted, Properties};
use crate::{GameEvent, ParseError, ShotKind};

/// `"<attacker>" triggered "damage" against "<victim>" (damage "<n>") (weapon "<w>")`
pub struct DamageParser;

impl LineParser for DamageParser {
    fn name(&self) -> &'static str {
        "damage"
    }

    fn markers(&self) -> &'static [&'static str] {
        &["triggered \"damage\""]
    }

    fn parse(&self, body: &str) -> Result<Option<GameEvent>, ParseError> {
        let Some((attacker, rest)) = take_participant(body) else {
            return Ok(None);
        };
        let Some((victim, tail)) = rest
            .strip_prefix(" triggered \"damage\" against ")
            .and_then(take_participant)
        else {
            return Ok(None);
        };

        let props = Properties::parse(tail);
        let (Some(amount), Some(weapon)) = (props.amount("damage"), props.get("weapon")) else {
            return Ok(None);
        };

        Ok(Some(GameEvent::Damage {
            attacker: attacker.resolve()?,
            victim: victim.resolve()?,
            amount,
            weapon: weapon.to_string(),
        }))
    }
}

/// `"<attacker>" killed "<victim>" with "<w>" (attacker_position "x y z") (victim_position "x y z")`
/// followed by optional `(crit "1")` and `(headshot "1")` groups.
pub struct KillParser;

impl LineParser for KillParser {
    fn name(&self) -> &'static str {
        "kill"
    }

    fn markers(&self) -> &'static [&'static str] {
        &["\" killed \""]
    }

    fn parse(&self, body: &str) -> Result<Option<GameEvent>, ParseError> {
        let Some((attacker, rest)) = take_participant(body) else {
            return Ok(None);
        };
        let Some((victim, rest)) = rest.strip_prefix(" killed ").and_then(take_participant) else {
            return Ok(None);
        };
        let Some((weapon, tail)) = rest.strip_prefix(" with ").and_then(take_quoted) else {
            return Ok(None);
        };

        let props = Properties::parse(tail);
        let (Some(attacker_position), Some(victim_position)) = (
            props.position("attacker_position"),
            props.position("victim_position"),
        ) else {
            return Ok(None);
        };

        // Stock servers mark headshots through customkill instead of a flag.
        let headshot = props.flag("headshot") || props.get("customkill") == Some("headshot");

        Ok(Some(GameEvent::Kill {
            attacker: attacker.resolve()?,
            victim: victim.resolve()?,
            weapon: weapon.to_string(),
            attacker_position,
            victim_position,
            crit: props.flag("crit"),
            headshot,
        }))
    }
}

/// `"<player>" triggered "shot_fired" (weapon "<w>")`, same for `shot_hit`
pub struct ShotParser;

impl LineParser for ShotParser {
    fn name(&self) -> &'static str {
        "shot"
    }

    fn markers(&self) -> &'static [&'static str] {
        &["triggered \"shot_fired\"", "triggered \"shot_hit\""]
    }

    fn parse(&self, body: &str) -> Result<Option<GameEvent>, ParseError> {
        let Some((player, rest)) = take_participant(body) else {
            return Ok(None);
        };
        let Some((trigger, tail)) = rest.strip_prefix(" triggered ").and_then(take_quoted) else {
            return Ok(None);
        };
        let kind = match trigger {
            "shot_fired" => ShotKind::Fired,
            "shot_hit" => ShotKind::Hit,
            _ => return Ok(None),
        };
        let Some(weapon) = Properties::parse(tail).get("weapon") else {
            return Ok(None);
        };

        Ok(Some(GameEvent::Shot {
            player: player.resolve()?,
            weapon: weapon.to_string(),
            kind,
        }))
    }
}
