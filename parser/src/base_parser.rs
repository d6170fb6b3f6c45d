use crate::{GameEvent, ParseError};

/// Base trait that every line parser implements.
///
/// `parse` receives the line body with the `L <timestamp>: ` header already
/// stripped. A line that does not fit the parser's grammar is `Ok(None)`, not an
/// error; `Err` is reserved for a recognised shape carrying a broken identifier.
pub trait LineParser: Send + Sync {
    /// Returns the name of this parser (e.g., "kill", "chat")
    fn name(&self) -> &'static str;

    /// Substrings that route a raw line to this parser
    fn markers(&self) -> &'static [&'static str];

    /// Checks if any of this parser's markers occurs in the line
    fn can_parse(&self, line: &str) -> bool {
        self.markers().iter().any(|marker| line.contains(marker))
    }

    fn parse(&self, body: &str) -> Result<Option<GameEvent>, ParseError>;
}

/// Cheap check used by callers to reject uploads that are not server logs:
/// true if any of the first lines carries a valid `L <timestamp>: ` header.
pub fn looks_like_match_log(data: &[u8]) -> bool {
    let sample = match std::str::from_utf8(data) {
        Ok(s) => s,
        // Upload samples may end mid-character.
        Err(e) => std::str::from_utf8(&data[..e.valid_up_to()]).unwrap_or(""),
    };

    sample
        .lines()
        .take(16)
        .any(|line| crate::grammar::split_header(line).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_match_log() {
        let log = "L 10/13/2024 - 20:12:03: Log file started (file \"logs/L1013000.log\")\n";
        assert!(looks_like_match_log(log.as_bytes()));

        assert!(!looks_like_match_log(b"ts_iso,dir,s,f\n1,2,3,4"));
        assert!(!looks_like_match_log(b""));
    }

    #[test]
    fn test_looks_like_match_log_tolerates_truncated_utf8() {
        let mut data = "L 10/13/2024 - 20:12:03: \"J\u{f6}rg<2><[U:1:5]><>\" connected\n"
            .as_bytes()
            .to_vec();
        data.extend_from_slice(&[0xC3]);
        assert!(looks_like_match_log(&data));
    }
}
