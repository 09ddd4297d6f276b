//! Effects produced by state transitions

use crate::message_log::{Direction, MessageKind};
use crate::state_machine::state::Cell;
use serde_json::Value;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Append a message to the message log
    AppendMessage {
        text: String,
        direction: Direction,
        kind: MessageKind,
    },

    /// Publish the new state to readers
    PublishState,

    /// Run the resolution engine over these cells (spawns as background task)
    StartResolution { cells: Vec<Cell> },

    /// Notify connected clients
    NotifyClient { event_type: String, data: Value },
}

impl Effect {
    pub fn question(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            text: text.into(),
            direction: Direction::Outgoing,
            kind: MessageKind::Question,
        }
    }

    pub fn response(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            text: text.into(),
            direction: Direction::Outgoing,
            kind: MessageKind::Response,
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            text: text.into(),
            direction: Direction::Outgoing,
            kind: MessageKind::System,
        }
    }

    pub fn notify_resolution_done(data: Value) -> Self {
        Effect::NotifyClient {
            event_type: "resolution_done".to_string(),
            data,
        }
    }

    pub fn notify_resolution_failed(reason: &str) -> Self {
        Effect::NotifyClient {
            event_type: "resolution_failed".to_string(),
            data: serde_json::json!({ "reason": reason }),
        }
    }

    #[cfg(test)]
    pub fn is_log_append(&self) -> bool {
        matches!(self, Effect::AppendMessage { .. })
    }
}
