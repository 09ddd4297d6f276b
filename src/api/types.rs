//! API request and response types

use crate::message_log::LogEntry;
use crate::state_machine::{Cell, SessionState};
use serde::{Deserialize, Serialize};

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Cells of an uploaded spreadsheet, already extracted by the ingestor
#[derive(Debug, Deserialize)]
pub struct FileRequest {
    pub cells: Vec<Cell>,
}

/// Response for actions handed to the runtime
#[derive(Debug, Serialize)]
pub struct QueuedResponse {
    pub queued: bool,
}

/// Response with the session and its messages
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub state: SessionState,
    pub pending_question: Option<String>,
    pub messages: Vec<LogEntry>,
}

/// One selectable sector
#[derive(Debug, Serialize)]
pub struct SectorInfo {
    pub code: &'static str,
    pub id: &'static str,
    pub name: &'static str,
    pub template_id: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct SectorsResponse {
    pub sectors: Vec<SectorInfo>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
