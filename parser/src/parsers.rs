//! Central parser registration module
//!
//! The order of `all_parsers()` is the dispatch priority. Markers are not
//! mutually exclusive (a chat message can quote "killed"), so a line goes to
//! the first parser whose marker it contains and to no other.
//!
//! When adding a new parser:
//! 1. Create your parser file (e.g., objective_parser.rs)
//! 2. Export it in lib.rs
//! 3. Add it to `all_parsers()` at the priority it needs

use crate::base_parser::LineParser;
use crate::{
    ChatParser, ConnectionParser, DamageParser, HealParser, ItemPickupParser, KillParser,
    RoleChangeParser, SessionBoundaryParser, ShotParser, TeamJoinParser, UberParser,
};
use tracing::info;

/// Macro to box a list of parsers in priority order
///
/// Usage:
/// ```rust,ignore
/// let parsers = register_parsers![KillParser, ChatParser];
/// ```
#[macro_export]
macro_rules! register_parsers {
    ($($parser:expr),* $(,)?) => {
        vec![
            $(Box::new($parser) as Box<dyn $crate::base_parser::LineParser>),*
        ]
    };
}

/// Returns all line parsers, highest priority first.
pub fn all_parsers() -> Vec<Box<dyn LineParser>> {
    info!("Initializing line parser collection");

    register_parsers![
        ConnectionParser,
        RoleChangeParser,
        TeamJoinParser,
        DamageParser,
        KillParser,
        ShotParser,
        HealParser,
        ItemPickupParser,
        ChatParser,
        SessionBoundaryParser,
        UberParser,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        let names: Vec<_> = all_parsers().iter().map(|p| p.name()).collect();
        assert_eq!(
            names,
            vec![
                "connection",
                "role_change",
                "team_join",
                "damage",
                "kill",
                "shot",
                "heal",
                "item_pickup",
                "chat",
                "session_boundary",
                "uber",
            ]
        );
    }
}
