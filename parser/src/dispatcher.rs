use crate::base_parser::LineParser;
use crate::grammar::split_header;
use crate::parsers::all_parsers;
use crate::{ParseError, ParsedEvent};
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use tracing::{debug, info, trace};

/// Dispatcher - routes each raw line to at most one line parser
///
/// ## Adding a New Parser
///
/// Parsers and their priority live in `parsers.rs`; no change to this file is
/// needed.
pub struct Dispatcher {
    parsers: Vec<Box<dyn LineParser>>,
}

/// How the lines of one file were classified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineStats {
    pub total: usize,
    pub blank: usize,
    pub matched: usize,
    pub dropped: usize,
}

/// Ordered events captured from one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventStream {
    pub events: Vec<ParsedEvent>,
    pub lines: LineStats,
}

impl Dispatcher {
    /// Create a dispatcher with the parsers from `parsers::all_parsers()`.
    pub fn new() -> Self {
        let parsers = all_parsers();

        info!(
            "Registered {} line parsers: {}",
            parsers.len(),
            parsers.iter().map(|p| p.name()).collect::<Vec<_>>().join(", ")
        );

        Self { parsers }
    }

    /// Register a custom parser at the lowest priority
    pub fn register(&mut self, parser: Box<dyn LineParser>) {
        info!("Registering custom line parser: {}", parser.name());
        debug!("Parser markers: {:?}", parser.markers());
        self.parsers.push(parser);
    }

    /// The parser a raw line would be routed to, if any.
    pub fn route(&self, line: &str) -> Option<&dyn LineParser> {
        self.parsers
            .iter()
            .find(|p| p.can_parse(line))
            .map(|p| p.as_ref())
    }

    /// Classify one line. Lines that carry no marker, lack a valid header or do
    /// not fit the chosen parser's grammar are `Ok(None)`.
    pub fn dispatch(&self, line_number: usize, line: &str) -> Result<Option<ParsedEvent>, ParseError> {
        let Some(parser) = self.route(line) else {
            return Ok(None);
        };
        let Some((time, body)) = split_header(line) else {
            trace!("Line {}: no valid header for '{}' line", line_number, parser.name());
            return Ok(None);
        };

        let event = parser.parse(body).map_err(|e| e.at_line(line_number))?;
        if event.is_none() {
            trace!("Line {}: '{}' marker without matching grammar", line_number, parser.name());
        }

        Ok(event.map(|event| ParsedEvent {
            line: line_number,
            time,
            event,
        }))
    }

    /// Read every line in file order and capture the recognised events.
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than failing the run;
    /// only I/O errors and malformed player identifiers abort.
    pub fn parse_reader<R: BufRead>(&self, mut reader: R) -> Result<EventStream, ParseError> {
        info!("Starting match log parse");

        let mut stream = EventStream::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }

            stream.lines.total += 1;
            let line_number = stream.lines.total;
            let text = String::from_utf8_lossy(&buf);
            let line = text.trim_end_matches(['\r', '\n']);

            if line.trim().is_empty() {
                stream.lines.blank += 1;
                continue;
            }

            match self.dispatch(line_number, line)? {
                Some(event) => {
                    stream.lines.matched += 1;
                    stream.events.push(event);
                }
                None => stream.lines.dropped += 1,
            }
        }

        info!(
            "Match log parse complete: {} events from {} lines ({} dropped)",
            stream.lines.matched, stream.lines.total, stream.lines.dropped
        );

        Ok(stream)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
