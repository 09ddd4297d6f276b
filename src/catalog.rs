//! Business sectors and the plan templates bound to them

use serde::{Deserialize, Serialize};
use std::fmt;

/// Business sector chosen at the start of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Retail,
    Technology,
    Manufacturing,
    Services,
    Food,
}

impl Sector {
    pub const ALL: [Sector; 5] = [
        Sector::Retail,
        Sector::Technology,
        Sector::Manufacturing,
        Sector::Services,
        Sector::Food,
    ];

    /// Map a user's menu choice ("1".."5") to a sector
    pub fn from_code(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Sector::Retail),
            "2" => Some(Sector::Technology),
            "3" => Some(Sector::Manufacturing),
            "4" => Some(Sector::Services),
            "5" => Some(Sector::Food),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Sector::Retail => "1",
            Sector::Technology => "2",
            Sector::Manufacturing => "3",
            Sector::Services => "4",
            Sector::Food => "5",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Sector::Retail => "retail",
            Sector::Technology => "technology",
            Sector::Manufacturing => "manufacturing",
            Sector::Services => "services",
            Sector::Food => "food",
        }
    }

    /// Menu label shown to the user
    pub fn display_name(self) -> &'static str {
        match self {
            Sector::Retail => "Retail",
            Sector::Technology => "Technology",
            Sector::Manufacturing => "Manufacturing",
            Sector::Services => "Services",
            Sector::Food => "Food",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A business plan spreadsheet template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub sector: Sector,
}

const TEMPLATES: &[PlanTemplate] = &[
    PlanTemplate {
        id: "1",
        name: "Retail Store Business Plan",
        sector: Sector::Retail,
    },
    PlanTemplate {
        id: "2",
        name: "Tech Startup Business Plan",
        sector: Sector::Technology,
    },
    PlanTemplate {
        id: "3",
        name: "Manufacturing Business Plan",
        sector: Sector::Manufacturing,
    },
];

/// Template for a sector, if the catalog carries one
pub fn template_for_sector(sector: Sector) -> Option<&'static PlanTemplate> {
    TEMPLATES.iter().find(|t| t.sector == sector)
}
