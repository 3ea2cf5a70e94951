//! Rendering of block trees
//!
//! - [`node`]: the virtual node tree and its HTML serialisation
//! - [`renderer`]: block to node mapping for one breakpoint
//! - [`sortable`]: editor chrome around each block

pub mod node;
pub mod renderer;
pub mod sortable;

pub use node::{Element, Node};
pub use renderer::{BlockRenderer, RenderMode};
pub use sortable::{EditorView, SortableAction};
