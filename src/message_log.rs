//! Append-only record of dialogue turns
//!
//! The log is for display only; nothing in the session reads it back to
//! make decisions.

use crate::runtime::MessageLog;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Who sent a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// From the user
    Incoming,
    /// From the assistant
    Outgoing,
}

/// What a message is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Question,
    Response,
    System,
}

/// One entry in the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub sequence_id: u64,
    pub text: String,
    pub direction: Direction,
    pub kind: MessageKind,
    pub created_at: DateTime<Utc>,
}

/// In-memory message log. Sessions are not persisted, so this is also the
/// production log.
#[derive(Debug, Default)]
pub struct InMemoryLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl InMemoryLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageLog for InMemoryLog {
    async fn append(
        &self,
        text: &str,
        direction: Direction,
        kind: MessageKind,
    ) -> Result<LogEntry, String> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| "message log lock poisoned".to_string())?;
        let entry = LogEntry {
            sequence_id: entries.len() as u64 + 1,
            text: text.to_string(),
            direction,
            kind,
            created_at: Utc::now(),
        };
        entries.push(entry.clone());
        Ok(entry)
    }

    async fn entries(&self) -> Result<Vec<LogEntry>, String> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .map_err(|_| "message log lock poisoned".to_string())
    }
}
