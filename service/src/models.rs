use chrono::{DateTime, Utc};
use matchlog::{LineStats, MatchReport, SessionResult};
use serde::{Deserialize, Serialize};

/// Stored alongside every parsed log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogMeta {
    pub log_id: String,
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
    pub session: SessionResult,
    pub lines: LineStats,
    pub players: usize,
    pub kills: usize,
    pub chat_messages: usize,
}

impl LogMeta {
    pub fn from_report(log_id: &str, file_name: &str, report: &MatchReport) -> Self {
        Self {
            log_id: log_id.to_string(),
            file_name: file_name.to_string(),
            uploaded_at: Utc::now(),
            session: report.session.clone(),
            lines: report.lines,
            players: report.players.len(),
            kills: report.kills.len(),
            chat_messages: report.chat.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub log_id: String,
    pub is_combined: bool,
    pub players: usize,
    pub kills: usize,
    pub chat_messages: usize,
}

impl From<&LogMeta> for UploadResponse {
    fn from(meta: &LogMeta) -> Self {
        Self {
            log_id: meta.log_id.clone(),
            is_combined: meta.session.is_combined,
            players: meta.players,
            kills: meta.kills,
            chat_messages: meta.chat_messages,
        }
    }
}
