use axum::{
    Router,
    routing::{get, post},
    response::IntoResponse,
    http::StatusCode,
    extract::{Path, State, Multipart},
    Json,
};
use crate::models::{LogMeta, UploadResponse};
use crate::storage::{LogStorage, StorageError};
use matchlog::{ChatEvent, KillEvent, MatchReport, PlayerRegistry, Summary};
use std::io::Cursor;
use std::sync::Arc;
use tracing::{info, debug, warn, error, instrument};

/// Bytes inspected before accepting an upload as a server log.
const SNIFF_BYTES: usize = 4096;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<LogStorage>,
}

pub fn create_routes(storage: LogStorage) -> Router {
    let state = AppState {
        storage: Arc::new(storage),
    };

    Router::new()
        .route("/health", get(health_check))
        .route("/logs", post(upload_log))
        .route("/logs/:id", get(get_meta).delete(delete_log))
        .route("/logs/:id/report", get(get_report))
        .route("/logs/:id/players", get(get_players))
        .route("/logs/:id/kills", get(get_kills))
        .route("/logs/:id/chat", get(get_chat))
        .route("/logs/:id/summary", get(get_summary))
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

fn storage_error(e: StorageError) -> (StatusCode, String) {
    match e {
        StorageError::NotFound(id) => (StatusCode::NOT_FOUND, format!("Log not found: {}", id)),
        other => {
            error!("Storage error: {}", other);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Storage error: {}", other))
        }
    }
}

#[instrument(skip(state, multipart))]
async fn upload_log(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, (StatusCode, String)> {
    info!("Received log upload request");

    let mut file_data = Vec::new();
    let mut file_name = String::new();

    while let Some(field) = multipart.next_field().await
        .map_err(|e| {
            error!("Multipart error: {}", e);
            (StatusCode::BAD_REQUEST, format!("Multipart error: {}", e))
        })?
    {
        if field.name() == Some("file") {
            file_name = field.file_name().unwrap_or("unknown").to_string();
            info!("Receiving file: {}", file_name);

            let data = field.bytes().await
                .map_err(|e| {
                    error!("Failed to read file data: {}", e);
                    (StatusCode::BAD_REQUEST, format!("Failed to read file: {}", e))
                })?;
            file_data = data.to_vec();
            info!("File data received: {} bytes", file_data.len());
        }
    }

    if file_data.is_empty() {
        error!("No file data provided in request");
        return Err((StatusCode::BAD_REQUEST, "No file provided".to_string()));
    }

    let sniff = &file_data[..file_data.len().min(SNIFF_BYTES)];
    if !matchlog::looks_like_match_log(sniff) {
        warn!("Upload '{}' does not look like a server log", file_name);
        return Err((StatusCode::BAD_REQUEST, "Not a server match log".to_string()));
    }

    // Each upload gets its own dispatcher and parse context.
    let report = tokio::task::spawn_blocking(move || matchlog::parse_match_log(Cursor::new(file_data)))
        .await
        .map_err(|e| {
            error!("Parse task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Parse task failed: {}", e))
        })?
        .map_err(|e| {
            error!("Parse error for file '{}': {}", file_name, e);
            (StatusCode::BAD_REQUEST, format!("Parse error: {}", e))
        })?;

    info!(
        "Parsed '{}': {} events, {} players, combined: {}",
        file_name,
        report.events.len(),
        report.players.len(),
        report.session.is_combined
    );

    let log_id = state.storage.create_log()
        .map_err(|e| {
            error!("Failed to create log directory: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to store log: {}", e))
        })?;

    let meta = LogMeta::from_report(&log_id, &file_name, &report);
    state.storage.commit_log(&meta, &report).map_err(storage_error)?;

    info!("Stored log {}", log_id);
    Ok(Json(UploadResponse::from(&meta)))
}

async fn get_meta(
    State(state): State<AppState>,
    Path(log_id): Path<String>,
) -> Result<Json<LogMeta>, (StatusCode, String)> {
    state.storage.read_meta(&log_id).map(Json).map_err(storage_error)
}

fn read_report(state: &AppState, log_id: &str) -> Result<MatchReport, (StatusCode, String)> {
    debug!("Loading report for log {}", log_id);
    state.storage.read_report(log_id).map_err(storage_error)
}

async fn get_report(
    State(state): State<AppState>,
    Path(log_id): Path<String>,
) -> Result<Json<MatchReport>, (StatusCode, String)> {
    read_report(&state, &log_id).map(Json)
}

async fn get_players(
    State(state): State<AppState>,
    Path(log_id): Path<String>,
) -> Result<Json<PlayerRegistry>, (StatusCode, String)> {
    read_report(&state, &log_id).map(|report| Json(report.players))
}

async fn get_kills(
    State(state): State<AppState>,
    Path(log_id): Path<String>,
) -> Result<Json<Vec<KillEvent>>, (StatusCode, String)> {
    read_report(&state, &log_id).map(|report| Json(report.kills.all().to_vec()))
}

async fn get_chat(
    State(state): State<AppState>,
    Path(log_id): Path<String>,
) -> Result<Json<Vec<ChatEvent>>, (StatusCode, String)> {
    read_report(&state, &log_id).map(|report| Json(report.chat.all().to_vec()))
}

#[instrument(skip(state))]
async fn get_summary(
    State(state): State<AppState>,
    Path(log_id): Path<String>,
) -> Result<Json<Summary>, (StatusCode, String)> {
    let events = state.storage.read_events(&log_id).map_err(storage_error)?;
    debug!("Summarizing {} events", events.len());
    Ok(Json(matchlog::summarize(&events)))
}

#[instrument(skip(state))]
async fn delete_log(
    State(state): State<AppState>,
    Path(log_id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    state.storage.delete_log(&log_id).map_err(storage_error)?;
    info!("Deleted log {}", log_id);
    Ok(StatusCode::NO_CONTENT)
}
