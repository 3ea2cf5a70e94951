//! Page Builder - Block model and editor runtime for the travel site CMS
//!
//! This crate provides the page builder's block tree, the responsive style
//! cascade, the block library catalog, rendering, the editor state container
//! and the trip itinerary board.

pub mod categories;
pub mod config;
pub mod core;
pub mod planner;
pub mod render;
pub mod runtime;
mod tests;

#[cfg(target_arch = "wasm32")]
pub mod wasm_api;

// Re-export commonly used types
pub use crate::config::EditorConfig;
pub use crate::core::registry::BlockCatalog;
pub use crate::core::{Block, BlockId, BlockTree, BlockType, Breakpoint};
pub use crate::render::{BlockRenderer, Node, RenderMode};
pub use crate::runtime::{EditorError, PageBuilder};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
