use crate::base_parser::LineParser;
use crate::grammar::{take_participant, take_quoted, Properties};
use crate::{GameEvent, ParseError, UberKind};

/// `"<healer>" triggered "healed" against "<target>" (healing "<n>")`
pub struct HealParser;

impl LineParser for HealParser {
    fn name(&self) -> &'static str {
        "heal"
    }

    fn markers(&self) -> &'static [&'static str] {
        &["triggered \"healed\""]
    }

    fn parse(&self, body: &str) -> Result<Option<GameEvent>, ParseError> {
        let Some((healer, rest)) = take_participant(body) else {
            return Ok(None);
        };
        let Some((target, tail)) = rest
            .strip_prefix(" triggered \"healed\" against ")
            .and_then(take_participant)
        else {
            return Ok(None);
        };
        let Some(amount) = Properties::parse(tail).amount("healing") else {
            return Ok(None);
        };

        Ok(Some(GameEvent::Heal {
            healer: healer.resolve()?,
            target: target.resolve()?,
            amount,
        }))
    }
}

/// `"<player>" picked up item "<item>"`, optionally followed by `(healing "<n>")`
pub struct ItemPickupParser;

impl LineParser for ItemPickupParser {
    fn name(&self) -> &'static str {
        "item_pickup"
    }

    fn markers(&self) -> &'static [&'static str] {
        &["picked up item"]
    }

    fn parse(&self, body: &str) -> Result<Option<GameEvent>, ParseError> {
        let Some((player, rest)) = take_participant(body) else {
            return Ok(None);
        };
        let Some((item, tail)) = rest.strip_prefix(" picked up item ").and_then(take_quoted) else {
            return Ok(None);
        };
        let healing = Properties::parse(tail).amount("healing").unwrap_or(0);

        Ok(Some(GameEvent::ItemPickup {
            player: player.resolve()?,
            item: item.to_string(),
            healing,
        }))
    }
}

/// Uber activations and drops:
///
/// - `"<medic>" triggered "chargedeployed" (medigun "<gun>")`
/// - `"<killer>" triggered "medic_death" against "<medic>" (healing "<n>") (ubercharge "1")`
///
/// A medic death without a full charge is not an uber event.
pub struct UberParser;

impl LineParser for UberParser {
    fn name(&self) -> &'static str {
        "uber"
    }

    fn markers(&self) -> &'static [&'static str] {
        &["triggered \"chargedeployed\"", "triggered \"medic_death\""]
    }

    fn parse(&self, body: &str) -> Result<Option<GameEvent>, ParseError> {
        let Some((actor, rest)) = take_participant(body) else {
            return Ok(None);
        };

        if rest == " triggered \"chargedeployed\"" || rest.starts_with(" triggered \"chargedeployed\" ") {
            return Ok(Some(GameEvent::Uber {
                medic: actor.resolve()?,
                target: None,
                kind: UberKind::Activation,
            }));
        }

        let Some((medic, tail)) = rest
            .strip_prefix(" triggered \"medic_death\" against ")
            .and_then(take_participant)
        else {
            return Ok(None);
        };
        if !Properties::parse(tail).flag("ubercharge") {
            return Ok(None);
        }

        Ok(Some(GameEvent::Uber {
            medic: medic.resolve()?,
            target: Some(actor.resolve()?),
            kind: UberKind::Drop,
        }))
    }
}
