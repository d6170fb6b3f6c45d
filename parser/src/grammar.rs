//! Shared building blocks of the server log line grammar.
//!
//! Every line looks like
//! `L 10/13/2024 - 20:12:03: "Name<3><[U:1:1234]><Red>" killed "..." with "scattergun" (crit "1")`.
//! The helpers here only slice the input; none of them allocate until a
//! participant is resolved.

use crate::identity::to_canonical;
use crate::{ParseError, Participant, Position};
use chrono::NaiveDateTime;

const TIMESTAMP_FORMAT: &str = "%m/%d/%Y - %H:%M:%S";

/// Split `L <timestamp>: <body>` into epoch milliseconds and the body.
pub fn split_header(line: &str) -> Option<(i64, &str)> {
    let rest = line.trim_start_matches('\u{feff}').strip_prefix("L ")?;
    let (timestamp, body) = rest.split_once(": ")?;
    Some((parse_timestamp(timestamp)?, body.trim_end()))
}

/// Interpret `MM/DD/YYYY - HH:MM:SS` as UTC and return epoch milliseconds.
pub fn parse_timestamp(s: &str) -> Option<i64> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT)
        .ok()
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// A participant as written on the line, before identifier conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawParticipant<'a> {
    pub name: &'a str,
    pub user_id: &'a str,
    pub compact_id: &'a str,
    pub team: &'a str,
}

impl RawParticipant<'_> {
    pub fn resolve(&self) -> Result<Participant, ParseError> {
        Ok(Participant {
            name: self.name.to_string(),
            user_id: self.user_id.to_string(),
            id: to_canonical(self.compact_id)?,
            legacy_id: self.compact_id.to_string(),
            team: self.team.to_string(),
        })
    }
}

/// Take a leading `"name<uid><id><team>"` from `s`, returning it and the rest.
pub fn take_participant(s: &str) -> Option<(RawParticipant<'_>, &str)> {
    let body = s.strip_prefix('"')?;
    let end = find_participant_end(body)?;
    let inner = &body[..end + 1];
    let rest = &body[end + 2..];

    let (inner, team) = split_tag(inner)?;
    let (inner, compact_id) = split_tag(inner)?;
    let (name, user_id) = split_tag(inner)?;

    Some((
        RawParticipant {
            name,
            user_id,
            compact_id,
            team,
        },
        rest,
    ))
}

// Names may contain quotes, so the closing quote is the first `>"` followed by
// a space or the end of the line.
fn find_participant_end(body: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(pos) = body[from..].find(">\"") {
        let end = from + pos;
        match body.as_bytes().get(end + 2) {
            None | Some(b' ') => return Some(end),
            _ => from = end + 1,
        }
    }
    None
}

fn split_tag(s: &str) -> Option<(&str, &str)> {
    let s = s.strip_suffix('>')?;
    let open = s.rfind('<')?;
    Some((&s[..open], &s[open + 1..]))
}

/// Take a leading `"value"` from `s`. The value ends at the next quote.
pub fn take_quoted(s: &str) -> Option<(&str, &str)> {
    let body = s.strip_prefix('"')?;
    let end = body.find('"')?;
    Some((&body[..end], &body[end + 1..]))
}

/// Trailing `(key "value")` groups of a line.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Properties<'a> {
    pairs: Vec<(&'a str, &'a str)>,
}

impl<'a> Properties<'a> {
    pub fn parse(s: &'a str) -> Self {
        let mut pairs = Vec::new();
        let mut rest = s;

        while let Some(open) = rest.find('(') {
            let group = &rest[open + 1..];
            let Some((key, after_key)) = group.split_once(" \"") else {
                break;
            };
            let Some(close) = after_key.find("\")") else {
                break;
            };
            if !key.contains([' ', '"', ')']) {
                pairs.push((key, &after_key[..close]));
            }
            rest = &after_key[close + 2..];
        }

        Self { pairs }
    }

    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    /// Optional boolean token: only the literal `"1"` counts as set.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key) == Some("1")
    }

    /// Integer amounts are bounded to `u32`; anything larger is treated as
    /// missing.
    pub fn amount(&self, key: &str) -> Option<u64> {
        self.get(key)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .map(u64::from)
    }

    pub fn position(&self, key: &str) -> Option<Position> {
        self.get(key).and_then(parse_position)
    }
}

/// Parse `x y z`.
pub fn parse_position(s: &str) -> Option<Position> {
    let mut parts = s.split_whitespace().map(|p| p.parse::<f64>().ok());
    let position = Position {
        x: parts.next()??,
        y: parts.next()??,
        z: parts.next()??,
    };
    if parts.next().is_some() {
        return None;
    }
    Some(position)
}
