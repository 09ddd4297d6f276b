//! Session state types

use crate::catalog::Sector;
use crate::classifier::{classify, ResolutionMode};
use serde::{Deserialize, Serialize};

// ============================================================================
// Cells
// ============================================================================

/// One addressed spreadsheet cell as produced by the ingestor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub value: String,
    #[serde(default)]
    pub marker: Option<String>,
    pub row: u32,
    pub col: u32,
}

impl Cell {
    pub fn new(value: impl Into<String>, marker: Option<&str>, row: u32, col: u32) -> Self {
        Self {
            value: value.into(),
            marker: marker.map(String::from),
            row,
            col,
        }
    }

    pub fn mode(&self) -> ResolutionMode {
        classify(self.marker.as_deref())
    }

    /// Same position as `other`
    pub fn same_address(&self, other: &Cell) -> bool {
        self.row == other.row && self.col == other.col
    }

    /// Copy of this cell with a new value; marker and position are kept
    #[must_use]
    pub fn with_value(&self, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..self.clone()
        }
    }
}

// ============================================================================
// Conversation Phase
// ============================================================================

/// Stage of the guided conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConvPhase {
    /// Waiting for the user to pick a sector from the menu
    #[default]
    AwaitingSector,
    /// Sector bound, waiting for the business story
    AwaitingStory,
    /// Story recorded, waiting for the spreadsheet
    AwaitingFile,
    /// Resolution engine running over the ingested cells
    ResolvingCells,
    /// Cells resolved; free-form follow-up
    AwaitingFollowUp,
}

impl ConvPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            ConvPhase::AwaitingSector => "awaiting_sector",
            ConvPhase::AwaitingStory => "awaiting_story",
            ConvPhase::AwaitingFile => "awaiting_file",
            ConvPhase::ResolvingCells => "resolving_cells",
            ConvPhase::AwaitingFollowUp => "awaiting_follow_up",
        }
    }

    /// Whether a spreadsheet may be ingested in this phase
    pub fn accepts_file(self) -> bool {
        matches!(self, ConvPhase::AwaitingFile | ConvPhase::AwaitingFollowUp)
    }
}

// ============================================================================
// Session State
// ============================================================================

/// Everything the state machine knows about the session.
///
/// The pending question slot is not part of this value; it holds a live
/// reply sender and lives next to it in [`crate::runtime::Session`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: ConvPhase,
    pub sector: Option<Sector>,
    pub template_id: Option<String>,
    pub story: Option<String>,
    pub cells: Vec<Cell>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }
}
