//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::transition::*;
use super::*;
use crate::catalog::Sector;
use crate::resolution::{CellOutcome, CellStatus, ResolutionReport};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_marker() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("pink".to_string())),
        Just(Some("yellow".to_string())),
        Just(Some("FFFFC0CB".to_string())),
        "[0-9A-F]{6}".prop_map(Some),
    ]
}

fn arb_cells() -> impl Strategy<Value = Vec<Cell>> {
    proptest::collection::vec(("[a-zA-Z ]{0,12}", arb_marker(), 0u32..50, 0u32..10), 0..8)
        .prop_map(|specs| {
            specs
                .into_iter()
                .map(|(value, marker, row, col)| Cell::new(value, marker.as_deref(), row, col))
                .collect()
        })
}

fn arb_phase() -> impl Strategy<Value = ConvPhase> {
    prop_oneof![
        Just(ConvPhase::AwaitingSector),
        Just(ConvPhase::AwaitingStory),
        Just(ConvPhase::AwaitingFile),
        Just(ConvPhase::ResolvingCells),
        Just(ConvPhase::AwaitingFollowUp),
    ]
}

fn arb_sector() -> impl Strategy<Value = Sector> {
    proptest::sample::select(Sector::ALL.to_vec())
}

fn arb_state() -> impl Strategy<Value = SessionState> {
    (
        arb_phase(),
        proptest::option::of(arb_sector()),
        proptest::option::of("[a-zA-Z ]{1,30}"),
        arb_cells(),
    )
        .prop_map(|(phase, sector, story, cells)| SessionState {
            phase,
            sector,
            template_id: None,
            story,
            cells,
        })
}

fn arb_user_message_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        "[1-9]".prop_map(Event::user_message),
        "[a-zA-Z0-9 ]{0,30}".prop_map(Event::user_message),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_user_message_event(),
        arb_cells().prop_map(|cells| Event::FileIngested { cells }),
        arb_cells().prop_map(|cells| Event::ResolutionComplete {
            report: resolve_all(&cells),
        }),
        "[a-z ]{1,20}".prop_map(|reason| Event::ResolutionFailed { reason }),
    ]
}

/// A report that resolves every cell of `cells` in place
fn resolve_all(cells: &[Cell]) -> ResolutionReport {
    ResolutionReport {
        cells: cells.iter().map(|c| c.with_value("resolved")).collect(),
        outcomes: cells
            .iter()
            .map(|c| CellOutcome {
                row: c.row,
                col: c.col,
                mode: c.mode(),
                status: CellStatus::Resolved,
            })
            .collect(),
    }
}

// ============================================================================
// State Validity Checkers
// ============================================================================

fn is_valid_state(state: &SessionState) -> bool {
    match state.phase {
        ConvPhase::AwaitingSector => state.sector.is_none(),
        ConvPhase::AwaitingStory => state.sector.is_some(),
        ConvPhase::AwaitingFile | ConvPhase::ResolvingCells | ConvPhase::AwaitingFollowUp => {
            state.sector.is_some() && state.story.is_some()
        }
    }
}

fn effects_are_valid(effects: &[Effect], new_state: &SessionState) -> bool {
    let starts_resolution = effects
        .iter()
        .any(|e| matches!(e, Effect::StartResolution { .. }));

    // The engine is only started on entering ResolvingCells
    if starts_resolution && new_state.phase != ConvPhase::ResolvingCells {
        return false;
    }

    // Every accepted event leaves a trace in the message log
    effects.iter().any(Effect::is_log_append)
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: Valid state after any sequence of events from the start
    #[test]
    fn prop_transitions_preserve_validity(events in proptest::collection::vec(arb_event(), 0..20)) {
        let mut state = SessionState::new();

        for event in events {
            match transition(&state, event) {
                Ok(result) => {
                    prop_assert!(is_valid_state(&result.new_state), "Invalid state: {:?}", result.new_state);
                    prop_assert!(
                        effects_are_valid(&result.effects, &result.new_state),
                        "Invalid effects for state {:?}: {:?}",
                        result.new_state,
                        result.effects
                    );
                    state = result.new_state;
                }
                Err(_) => { /* Invalid transition is OK */ }
            }
        }
    }

    // Invariant 2: Codes 1-5 bind a sector, anything else leaves the session untouched
    #[test]
    fn prop_sector_selection(text in "[a-zA-Z0-9]{0,4}") {
        let state = SessionState::new();
        let result = transition(&state, Event::user_message(text.clone())).unwrap();

        match Sector::from_code(&text) {
            Some(sector) => {
                prop_assert_eq!(result.new_state.phase, ConvPhase::AwaitingStory);
                prop_assert_eq!(result.new_state.sector, Some(sector));
            }
            None => {
                prop_assert_eq!(&result.new_state, &state);
            }
        }
    }

    // Invariant 3: Only files outside the file phases and stray engine reports are
    // rejected; dialogue input is accepted in every phase
    #[test]
    fn prop_rejections_are_limited(state in arb_state(), event in arb_event()) {
        let phase = state.phase;
        let is_file = matches!(event, Event::FileIngested { .. });
        let is_engine_report = matches!(
            event,
            Event::ResolutionComplete { .. } | Event::ResolutionFailed { .. }
        );

        match transition(&state, event) {
            Ok(_) => {
                prop_assert!(!is_file || phase.accepts_file());
                prop_assert!(!is_engine_report || phase == ConvPhase::ResolvingCells);
            }
            Err(TransitionError::InvalidTransition(_)) => {
                prop_assert!(
                    (is_file && !phase.accepts_file())
                        || (is_engine_report && phase != ConvPhase::ResolvingCells),
                    "unexpected rejection in {:?}",
                    phase
                );
            }
        }
    }

    // Invariant 3b: A run that ends without a usable report keeps the ingested cells
    #[test]
    fn prop_failed_run_keeps_cells(cells in arb_cells(), reason in "[a-z ]{1,20}") {
        let state = SessionState {
            phase: ConvPhase::ResolvingCells,
            sector: Some(Sector::Retail),
            story: Some("story".to_string()),
            cells: cells.clone(),
            ..SessionState::default()
        };
        let result = transition(&state, Event::ResolutionFailed { reason }).unwrap();

        prop_assert_eq!(result.new_state.phase, ConvPhase::AwaitingFollowUp);
        prop_assert_eq!(&result.new_state.cells, &cells);
    }

    // Invariant 4: Completion keeps cardinality and addresses of the ingested cells
    #[test]
    fn prop_completion_preserves_cells(cells in arb_cells()) {
        let state = SessionState {
            phase: ConvPhase::ResolvingCells,
            sector: Some(Sector::Retail),
            story: Some("story".to_string()),
            cells: cells.clone(),
            ..SessionState::default()
        };
        let result = transition(&state, Event::ResolutionComplete { report: resolve_all(&cells) }).unwrap();

        prop_assert_eq!(result.new_state.phase, ConvPhase::AwaitingFollowUp);
        prop_assert_eq!(result.new_state.cells.len(), cells.len());
        for (out, inp) in result.new_state.cells.iter().zip(&cells) {
            prop_assert!(out.same_address(inp));
        }
    }

    // Invariant 5: Follow-up accepts any message and stays in follow-up
    #[test]
    fn prop_follow_up_is_not_terminal(text in "[a-zA-Z0-9 ]{0,30}") {
        let state = SessionState {
            phase: ConvPhase::AwaitingFollowUp,
            sector: Some(Sector::Food),
            story: Some("story".to_string()),
            ..SessionState::default()
        };
        let result = transition(&state, Event::user_message(text)).unwrap();
        prop_assert_eq!(result.new_state.phase, ConvPhase::AwaitingFollowUp);
    }
}
