//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{
    ChatRequest, ErrorResponse, FileRequest, QueuedResponse, SectorInfo, SectorsResponse,
    SessionResponse,
};
use super::AppState;
use crate::catalog::{template_for_sector, Sector};
use crate::runtime::{RuntimeError, SseEvent};
use crate::state_machine::Event;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Session retrieval
        .route("/api/session", get(get_session))
        // SSE streaming
        .route("/api/session/stream", get(stream_session))
        // User actions
        .route("/api/session/chat", post(send_chat))
        .route("/api/session/file", post(upload_file))
        // Sector menu
        .route("/api/sectors", get(list_sectors))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Session Retrieval
// ============================================================

async fn get_session(State(state): State<AppState>) -> Result<Json<SessionResponse>, AppError> {
    let snapshot = state.session.snapshot();
    let messages = state.session.messages().await?;

    Ok(Json(SessionResponse {
        session_id: state.session.session_id.clone(),
        state: snapshot.state,
        pending_question: snapshot.pending_question,
        messages,
    }))
}

async fn stream_session(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    // Subscribe before reading the log so nothing falls between the two
    let broadcast_rx = state.session.subscribe();
    let messages = state.session.messages().await?;

    let init_event = SseEvent::Init {
        session_id: state.session.session_id.clone(),
        snapshot: state.session.snapshot(),
        messages,
    };

    Ok(sse_stream(init_event, broadcast_rx))
}

// ============================================================
// User Actions
// ============================================================

async fn send_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<QueuedResponse>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::BadRequest("Message text is empty".to_string()));
    }

    state.session.send_message(req.text).await?;
    Ok(Json(QueuedResponse { queued: true }))
}

async fn upload_file(
    State(state): State<AppState>,
    Json(req): Json<FileRequest>,
) -> Result<Json<QueuedResponse>, AppError> {
    tracing::info!(cells = req.cells.len(), "Spreadsheet received");

    state
        .session
        .send(Event::FileIngested { cells: req.cells })
        .await?;
    Ok(Json(QueuedResponse { queued: true }))
}

// ============================================================
// Sector Menu
// ============================================================

async fn list_sectors() -> Json<SectorsResponse> {
    let sectors = Sector::ALL
        .iter()
        .map(|&sector| SectorInfo {
            code: sector.code(),
            id: sector.as_str(),
            name: sector.display_name(),
            template_id: template_for_sector(sector).map(|t| t.id),
        })
        .collect();

    Json(SectorsResponse { sectors })
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("plan-guide ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Unavailable(String),
    Internal(String),
}

impl From<RuntimeError> for AppError {
    fn from(e: RuntimeError) -> Self {
        match e {
            RuntimeError::Stopped => AppError::Unavailable(e.to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
