//! Events that drive the conversation

use crate::resolution::ResolutionReport;
use crate::state_machine::state::Cell;

/// Events that trigger phase transitions.
///
/// A user message only becomes an [`Event::UserMessage`] when no question is
/// pending; answers to a pending question never reach the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Ordinary dialogue input from the user
    UserMessage { text: String },

    /// The spreadsheet ingestor produced the cells of an uploaded file
    FileIngested { cells: Vec<Cell> },

    /// The resolution engine finished a run
    ResolutionComplete { report: ResolutionReport },

    /// The resolution engine died before producing a report
    ResolutionFailed { reason: String },
}

impl Event {
    pub fn user_message(text: impl Into<String>) -> Self {
        Event::UserMessage { text: text.into() }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Event::UserMessage { .. } => "user_message",
            Event::FileIngested { .. } => "file_ingested",
            Event::ResolutionComplete { .. } => "resolution_complete",
            Event::ResolutionFailed { .. } => "resolution_failed",
        }
    }
}
