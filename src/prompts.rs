//! Dialogue text shown to the user

use crate::catalog::{PlanTemplate, Sector};
use crate::resolution::ResolutionReport;
use std::fmt::Write;

/// Opening question with the sector menu
pub fn sector_menu() -> String {
    let mut text =
        String::from("Hello! I'll help you put together your business plan. What sector is your business in?\n");
    for sector in Sector::ALL {
        let _ = write!(text, "\n{}. {}", sector.code(), sector.display_name());
    }
    text
}

pub fn invalid_sector(input: &str) -> String {
    format!(
        "\"{}\" is not one of the listed sectors. Please reply with a number from 1 to 5.",
        input.trim()
    )
}

pub fn template_selected(template: &PlanTemplate) -> String {
    format!("Selected the \"{}\" template.", template.name)
}

pub fn story_question(sector: Sector) -> String {
    format!(
        "Great, {} it is! Tell me the story of your business: how did the idea start?",
        sector.display_name().to_lowercase()
    )
}

pub const FILE_REQUEST: &str =
    "Thanks for sharing. Now upload your business plan spreadsheet and I'll fill in the highlighted cells.";

pub const FILE_REMINDER: &str =
    "I'm waiting for your spreadsheet. Upload it to continue.";

pub const RESOLUTION_STARTED: &str =
    "Got your spreadsheet. Looking up the pink cells first, then I'll ask you about the yellow ones.";

pub const RESOLUTION_BUSY: &str =
    "I'm still working through your spreadsheet. I'll ask when I need something from you.";

pub const FOLLOW_UP_ACK: &str =
    "Noted. You can upload another spreadsheet at any time.";

pub fn file_rejected(reason: &str) -> String {
    format!("Can't take a spreadsheet right now: {reason}")
}

/// Question asked for a yellow cell
pub fn cell_question(value: &str) -> String {
    format!("Please provide value for: {value}")
}

pub fn lookup_found(query: &str) -> String {
    format!("Found data for {query}")
}

pub fn lookup_failed(query: &str, reason: &str) -> String {
    format!("Failed to look up {query}: {reason}")
}

pub fn answer_failed(value: &str) -> String {
    format!("Failed to get user input for {value}")
}

pub fn resolution_failed(reason: &str) -> String {
    format!(
        "Something went wrong while filling in your spreadsheet ({reason}). Your cells were left unchanged; you can upload it again."
    )
}

/// Summary posted when a resolution run completes
pub fn resolution_summary(report: &ResolutionReport) -> String {
    let mut text = format!(
        "Resolved {} of {} cells ({} looked up, {} answered).",
        report.resolved(),
        report.cells.len(),
        report.looked_up(),
        report.answered()
    );
    let failed = report.failed();
    if failed > 0 {
        let _ = write!(text, " {failed} could not be resolved.");
    }
    text
}
