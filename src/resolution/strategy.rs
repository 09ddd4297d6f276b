//! Per-cell resolution strategies

use crate::classifier::ResolutionMode;
use crate::interaction::Interaction;
use crate::lookup::LookupService;
use crate::prompts;
use crate::state_machine::state::Cell;

/// How a single cell gets its value. Selected from the cell's
/// [`ResolutionMode`]; the engine loop only sees this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    ExternalLookup,
    UserPrompt,
    PassThrough,
}

/// Result of one resolution step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Resolved(String),
    Unchanged,
    Failed(String),
}

impl Strategy {
    pub fn for_mode(mode: ResolutionMode) -> Self {
        match mode {
            ResolutionMode::NeedsLookup => Strategy::ExternalLookup,
            ResolutionMode::NeedsUserInput => Strategy::UserPrompt,
            ResolutionMode::NoAction => Strategy::PassThrough,
        }
    }

    /// Processing rank: every cell of a lower rank is resolved before any
    /// cell of a higher rank. Lookups need no user attention, so they go first.
    pub fn rank(self) -> u8 {
        match self {
            Strategy::ExternalLookup => 0,
            Strategy::UserPrompt => 1,
            Strategy::PassThrough => 2,
        }
    }

    pub async fn resolve<L, I>(self, cell: &Cell, lookup: &L, interaction: &I) -> StepOutcome
    where
        L: LookupService + ?Sized,
        I: Interaction + ?Sized,
    {
        match self {
            Strategy::ExternalLookup => match lookup.lookup(&cell.value).await {
                Ok(result) => {
                    interaction.notify(prompts::lookup_found(&cell.value)).await;
                    StepOutcome::Resolved(result)
                }
                Err(e) => {
                    interaction
                        .notify(prompts::lookup_failed(&cell.value, &e.message))
                        .await;
                    StepOutcome::Failed(e.message)
                }
            },
            Strategy::UserPrompt => {
                match interaction.ask(prompts::cell_question(&cell.value)).await {
                    Ok(answer) => StepOutcome::Resolved(answer),
                    Err(e) => {
                        interaction.notify(prompts::answer_failed(&cell.value)).await;
                        StepOutcome::Failed(e.to_string())
                    }
                }
            }
            Strategy::PassThrough => StepOutcome::Unchanged,
        }
    }
}
