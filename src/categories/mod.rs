//! Block library categories
//!
//! The library sidebar groups block definitions by category. Each submodule
//! contributes the built-in definitions of one category.

pub mod interactive;
pub mod layout;
pub mod media;
pub mod travel;
pub mod typography;

use serde::{Deserialize, Serialize};

use crate::core::registry::BlockDefinition;

/// Block category enumeration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LibraryCategory {
    /// Structural blocks that hold other blocks
    Layout,
    /// Headings, paragraphs, code
    Typography,
    /// Images, heroes, cards
    Media,
    /// Buttons, accordions, tabs
    Interactive,
    /// Destination and trip blocks backed by site data
    Travel,
    /// Custom user-defined blocks
    Custom(String),
}

impl LibraryCategory {
    /// Get a human-readable name for the category
    pub fn display_name(&self) -> &str {
        match self {
            LibraryCategory::Layout => "Layout",
            LibraryCategory::Typography => "Typography",
            LibraryCategory::Media => "Media",
            LibraryCategory::Interactive => "Interactive",
            LibraryCategory::Travel => "Travel",
            LibraryCategory::Custom(name) => name,
        }
    }

    /// Sidebar order; custom categories sort last.
    pub fn sort_key(&self) -> (u8, &str) {
        match self {
            LibraryCategory::Layout => (0, ""),
            LibraryCategory::Typography => (1, ""),
            LibraryCategory::Media => (2, ""),
            LibraryCategory::Interactive => (3, ""),
            LibraryCategory::Travel => (4, ""),
            LibraryCategory::Custom(name) => (5, name),
        }
    }
}

impl std::fmt::Display for LibraryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Every built-in block definition
pub fn builtin_definitions() -> Vec<BlockDefinition> {
    let mut defs = Vec::new();
    defs.extend(layout::definitions());
    defs.extend(typography::definitions());
    defs.extend(media::definitions());
    defs.extend(interactive::definitions());
    defs.extend(travel::definitions());
    defs
}
