use serde::{Deserialize, Serialize};

/// Outcome of a single `Game_Over` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionBoundary {
    pub is_combined: bool,
    pub reason: String,
}

/// Final session state of a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    pub is_combined: bool,
    /// Reason from the last boundary line, empty if there was none.
    pub reason: String,
    pub boundaries: u32,
}

/// Counts match-end markers. More than one means several matches were
/// concatenated into one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionDetector {
    count: u32,
    last_reason: String,
}

impl SessionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, reason: &str) -> SessionBoundary {
        self.count += 1;
        self.last_reason = reason.to_string();
        SessionBoundary {
            is_combined: self.is_combined(),
            reason: self.last_reason.clone(),
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Only meaningful once the whole file has been consumed.
    pub fn is_combined(&self) -> bool {
        self.count > 1
    }

    pub fn result(&self) -> SessionResult {
        SessionResult {
            is_combined: self.is_combined(),
            reason: self.last_reason.clone(),
            boundaries: self.count,
        }
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.last_reason.clear();
    }
}
