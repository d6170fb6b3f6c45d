// Parser crate for game server match logs
// Lines are classified by a priority-ordered dispatcher, captured as an ordered
// event list, then folded into per-player statistics.

pub mod types;
pub mod identity;
pub mod grammar;
pub mod base_parser;
#[macro_use]
pub mod parsers;
pub mod dispatcher;

// Individual line parsers
pub mod player_parser;
pub mod combat_parser;
pub mod support_parser;
pub mod chat_parser;
pub mod game_over_parser;

// State derived from the event list
pub mod registry;
pub mod event_log;
pub mod session;
pub mod match_state;
pub mod aggregate;

// Re-export main types
pub use types::*;
pub use base_parser::{LineParser, looks_like_match_log};
pub use dispatcher::{Dispatcher, EventStream, LineStats};
pub use registry::{Player, PlayerRegistry, PlayerStats, ShotCounts, UNKNOWN_CLASS};
pub use event_log::{ChatEvent, ChatLog, Combatant, EventLog, KillEvent, KillLog};
pub use session::{SessionBoundary, SessionDetector, SessionResult};
pub use match_state::{parse_match_log, MatchReport, MatchState};
pub use aggregate::{summarize, Summary, UberCounts};

// Re-export parsers
pub use player_parser::{ConnectionParser, RoleChangeParser, TeamJoinParser};
pub use combat_parser::{DamageParser, KillParser, ShotParser};
pub use support_parser::{HealParser, ItemPickupParser, UberParser};
pub use chat_parser::ChatParser;
pub use game_over_parser::SessionBoundaryParser;
