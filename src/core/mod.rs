//! Core block abstractions and types
//!
//! This module defines the block data model, the responsive style cascade,
//! the prop schema used by the property panel, and the page block tree.

pub mod block;
pub mod breakpoint;
pub mod content;
pub mod parameter;
pub mod registry;
pub mod style;
pub mod tree;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use block::{Block, BlockError, BlockType, Props};
pub use breakpoint::Breakpoint;
pub use style::{BlockStyles, StyleMap, StyleValue};
pub use tree::{BlockTree, Placement, TreeError};

/// Unique identifier for a block
///
/// Ids coming from the database are opaque strings; freshly created blocks
/// get a random UUID.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub String);

impl BlockId {
    /// Generate a new random block ID
    pub fn new() -> Self {
        BlockId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        BlockId(s.to_string())
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        BlockId(s)
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
