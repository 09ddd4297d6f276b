//! Pure state transition function
//!
//! Given the same state and event this always produces the same new state
//! and effects, with no I/O.

use super::state::{ConvPhase, SessionState};
use super::{Effect, Event};
use crate::catalog::{template_for_sector, Sector};
use crate::prompts;
use crate::resolution::ResolutionReport;
use serde_json::Value;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("{0}")]
    InvalidTransition(String),
}

/// Reason logged when a report does not line up with the ingested cells
const RESOLUTION_MISMATCH: &str = "the result did not line up with the spreadsheet";

pub fn transition(state: &SessionState, event: Event) -> Result<TransitionResult, TransitionError> {
    match (state.phase, event) {
        // ============================================================
        // Sector selection
        // ============================================================
        (ConvPhase::AwaitingSector, Event::UserMessage { text }) => {
            Ok(match Sector::from_code(&text) {
                Some(sector) => bind_sector(state, sector),
                None => TransitionResult::new(state.clone())
                    .with_effect(Effect::system(prompts::invalid_sector(&text))),
            })
        }

        // ============================================================
        // Story capture
        // ============================================================
        (ConvPhase::AwaitingStory, Event::UserMessage { text }) => {
            let new_state = SessionState {
                phase: ConvPhase::AwaitingFile,
                story: Some(text),
                ..state.clone()
            };
            Ok(TransitionResult::new(new_state)
                .with_effect(Effect::question(prompts::FILE_REQUEST))
                .with_effect(Effect::PublishState))
        }

        (ConvPhase::AwaitingFile, Event::UserMessage { .. }) => Ok(TransitionResult::new(
            state.clone(),
        )
        .with_effect(Effect::system(prompts::FILE_REMINDER))),

        // ============================================================
        // File ingestion
        // ============================================================
        (phase, Event::FileIngested { cells }) if phase.accepts_file() => {
            let new_state = SessionState {
                phase: ConvPhase::ResolvingCells,
                cells: cells.clone(),
                ..state.clone()
            };
            Ok(TransitionResult::new(new_state)
                .with_effect(Effect::system(prompts::RESOLUTION_STARTED))
                .with_effect(Effect::PublishState)
                .with_effect(Effect::StartResolution { cells }))
        }

        (ConvPhase::AwaitingSector | ConvPhase::AwaitingStory, Event::FileIngested { .. }) => {
            Err(TransitionError::InvalidTransition(
                "tell me your sector and your story first".to_string(),
            ))
        }

        (ConvPhase::ResolvingCells, Event::FileIngested { .. }) => {
            Err(TransitionError::InvalidTransition(
                "the current spreadsheet is still being filled in".to_string(),
            ))
        }

        // ============================================================
        // Cell resolution
        // ============================================================
        (ConvPhase::ResolvingCells, Event::UserMessage { .. }) => Ok(TransitionResult::new(
            state.clone(),
        )
        .with_effect(Effect::system(prompts::RESOLUTION_BUSY))),

        (ConvPhase::ResolvingCells, Event::ResolutionComplete { report }) => {
            if report.matches_input(&state.cells) {
                Ok(complete_resolution(state, report))
            } else {
                Ok(fail_resolution(state, RESOLUTION_MISMATCH))
            }
        }

        (ConvPhase::ResolvingCells, Event::ResolutionFailed { reason }) => {
            Ok(fail_resolution(state, &reason))
        }

        // ============================================================
        // Follow-up
        // ============================================================
        (ConvPhase::AwaitingFollowUp, Event::UserMessage { .. }) => Ok(TransitionResult::new(
            state.clone(),
        )
        .with_effect(Effect::response(prompts::FOLLOW_UP_ACK))),

        // ============================================================
        // Invalid Transitions
        // ============================================================
        (phase, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {} with event {}",
            phase.as_str(),
            event.name()
        ))),
    }
}

fn bind_sector(state: &SessionState, sector: Sector) -> TransitionResult {
    let template = template_for_sector(sector);
    let new_state = SessionState {
        phase: ConvPhase::AwaitingStory,
        sector: Some(sector),
        template_id: template.map(|t| t.id.to_string()),
        ..state.clone()
    };

    TransitionResult::new(new_state)
        .with_effects(template.map(|t| Effect::system(prompts::template_selected(t))))
        .with_effect(Effect::question(prompts::story_question(sector)))
        .with_effect(Effect::PublishState)
}

fn complete_resolution(state: &SessionState, report: ResolutionReport) -> TransitionResult {
    let summary = prompts::resolution_summary(&report);
    let data = serde_json::to_value(&report).unwrap_or(Value::Null);
    let new_state = SessionState {
        phase: ConvPhase::AwaitingFollowUp,
        cells: report.cells,
        ..state.clone()
    };

    TransitionResult::new(new_state)
        .with_effect(Effect::system(summary))
        .with_effect(Effect::PublishState)
        .with_effect(Effect::notify_resolution_done(data))
}

/// Ends a run without a usable report. The ingested cells are kept as they were.
fn fail_resolution(state: &SessionState, reason: &str) -> TransitionResult {
    let new_state = SessionState {
        phase: ConvPhase::AwaitingFollowUp,
        ..state.clone()
    };

    TransitionResult::new(new_state)
        .with_effect(Effect::system(prompts::resolution_failed(reason)))
        .with_effect(Effect::PublishState)
        .with_effect(Effect::notify_resolution_failed(reason))
}
