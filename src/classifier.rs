//! Cell classification by visual marker
//!
//! A marker is the background colour the template author painted on a cell.
//! It is read exactly once here; everything downstream branches on
//! [`ResolutionMode`].

use serde::{Deserialize, Serialize};

/// How a cell's value must be obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    /// Yellow cells: the user has to supply the value
    NeedsUserInput,
    /// Pink cells: the value is fetched from the lookup service
    NeedsLookup,
    /// Everything else is passed through untouched
    NoAction,
}

const PINK_RGB: &str = "FFC0CB";
const YELLOW_RGB: &str = "FFFF00";

/// Classify a raw marker. Total over all inputs: unknown markers are `NoAction`.
pub fn classify(marker: Option<&str>) -> ResolutionMode {
    let Some(marker) = marker else {
        return ResolutionMode::NoAction;
    };

    match normalize_marker(marker).as_str() {
        "PINK" | PINK_RGB => ResolutionMode::NeedsLookup,
        "YELLOW" | YELLOW_RGB => ResolutionMode::NeedsUserInput,
        _ => ResolutionMode::NoAction,
    }
}

/// Uppercase, strip `#`, and drop the alpha byte of ARGB hex (`FFFFC0CB` -> `FFC0CB`).
fn normalize_marker(marker: &str) -> String {
    let upper = marker.trim().trim_start_matches('#').to_ascii_uppercase();
    let is_hex = upper.chars().all(|c| c.is_ascii_hexdigit());

    if is_hex && upper.len() == 8 {
        upper.chars().skip(2).collect()
    } else {
        upper
    }
}
