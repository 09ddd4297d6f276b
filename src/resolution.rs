//! Resolution engine
//!
//! Fills every lookup and user-input cell of an ingested sheet. Cells are
//! processed strictly one at a time: all lookups in sheet order, then all
//! questions in sheet order. The returned cells are always in the original
//! order with the original addresses; only values change.

mod strategy;

pub use strategy::{StepOutcome, Strategy};

use crate::classifier::ResolutionMode;
use crate::interaction::Interaction;
use crate::lookup::LookupService;
use crate::state_machine::state::Cell;
use serde::{Deserialize, Serialize};

/// Final status of one cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CellStatus {
    Resolved,
    Unchanged,
    Failed { reason: String },
}

/// Per-cell record of what the engine did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellOutcome {
    pub row: u32,
    pub col: u32,
    pub mode: ResolutionMode,
    #[serde(flatten)]
    pub status: CellStatus,
}

/// Output of a resolution run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResolutionReport {
    /// Resolved cells, in input order
    pub cells: Vec<Cell>,
    /// One outcome per cell, in input order
    pub outcomes: Vec<CellOutcome>,
}

impl ResolutionReport {
    fn count(&self, mode: ResolutionMode, resolved: bool) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.mode == mode && (o.status == CellStatus::Resolved) == resolved)
            .count()
    }

    pub fn looked_up(&self) -> usize {
        self.count(ResolutionMode::NeedsLookup, true)
    }

    pub fn answered(&self) -> usize {
        self.count(ResolutionMode::NeedsUserInput, true)
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, CellStatus::Failed { .. }))
            .count()
    }

    pub fn resolved(&self) -> usize {
        self.looked_up() + self.answered()
    }

    /// Check that `cells` is position-for-position the resolution of `input`
    pub fn matches_input(&self, input: &[Cell]) -> bool {
        self.cells.len() == input.len()
            && self.outcomes.len() == input.len()
            && self
                .cells
                .iter()
                .zip(input)
                .all(|(out, inp)| out.same_address(inp) && out.marker == inp.marker)
    }
}

/// Resolve `cells` using the lookup service and the interaction channel.
///
/// Never fails as a whole: a cell whose step fails keeps its original value
/// and is reported as failed.
pub async fn resolve_cells<L, I>(cells: &[Cell], lookup: &L, interaction: &I) -> ResolutionReport
where
    L: LookupService + ?Sized,
    I: Interaction + ?Sized,
{
    let strategies: Vec<Strategy> = cells.iter().map(|c| Strategy::for_mode(c.mode())).collect();

    // Stable: ties keep sheet order
    let mut order: Vec<usize> = (0..cells.len()).collect();
    order.sort_by_key(|&i| strategies[i].rank());

    let mut steps: Vec<StepOutcome> = vec![StepOutcome::Unchanged; cells.len()];
    for index in order {
        let cell = &cells[index];
        let strategy = strategies[index];
        tracing::debug!(row = cell.row, col = cell.col, strategy = ?strategy, "Resolving cell");

        let outcome = strategy.resolve(cell, lookup, interaction).await;
        if let StepOutcome::Failed(reason) = &outcome {
            tracing::warn!(row = cell.row, col = cell.col, reason = %reason, "Cell resolution failed");
        }
        steps[index] = outcome;
    }

    let mut report = ResolutionReport {
        cells: Vec::with_capacity(cells.len()),
        outcomes: Vec::with_capacity(cells.len()),
    };
    for (cell, step) in cells.iter().zip(steps) {
        let (resolved, status) = match step {
            StepOutcome::Resolved(value) => (cell.with_value(value), CellStatus::Resolved),
            StepOutcome::Unchanged => (cell.clone(), CellStatus::Unchanged),
            StepOutcome::Failed(reason) => (cell.clone(), CellStatus::Failed { reason }),
        };
        report.outcomes.push(CellOutcome {
            row: cell.row,
            col: cell.col,
            mode: cell.mode(),
            status,
        });
        report.cells.push(resolved);
    }

    tracing::info!(
        total = cells.len(),
        looked_up = report.looked_up(),
        answered = report.answered(),
        failed = report.failed(),
        "Resolution finished"
    );
    report
}
