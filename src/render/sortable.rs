//! Edit-mode decoration of rendered blocks
//!
//! Every block rendered in the editor is wrapped in a sortable item keyed by
//! its id. The selected or hovered block additionally shows its label and an
//! action bar; the actions themselves are dispatched by the editor.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

use super::node::{Element, Node};
use crate::core::{Block, BlockId};

/// Opacity of hidden blocks while outlines are shown
pub const HIDDEN_OPACITY: f64 = 0.4;

/// What the editor shows around blocks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorView {
    pub selected: Option<BlockId>,
    pub hovered: Option<BlockId>,
    pub show_outlines: bool,
}

impl EditorView {
    pub fn is_selected(&self, id: &BlockId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    pub fn is_hovered(&self, id: &BlockId) -> bool {
        self.hovered.as_ref() == Some(id)
    }
}

/// Buttons of the per-block action bar
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum SortableAction {
    Drag,
    Duplicate,
    ToggleVisibility,
    ToggleLock,
    Delete,
}

impl SortableAction {
    /// Button title, which depends on the block's current flags
    pub fn title(self, block: &Block) -> &'static str {
        match self {
            SortableAction::Drag => "Drag to move",
            SortableAction::Duplicate => "Duplicate",
            SortableAction::ToggleVisibility if block.is_hidden => "Show",
            SortableAction::ToggleVisibility => "Hide",
            SortableAction::ToggleLock if block.is_locked => "Unlock",
            SortableAction::ToggleLock => "Lock",
            SortableAction::Delete => "Delete",
        }
    }
}

fn action_bar(block: &Block) -> Element {
    SortableAction::iter().fold(Element::new("div").class("block-actions"), |bar, action| {
        bar.child(
            Element::new("button")
                .class("block-action")
                .attr("type", "button")
                .attr("data-action", action.to_string())
                .attr("data-block-id", block.id.as_str())
                .attr("title", action.title(block))
                .text(action.title(block)),
        )
    })
}

/// Wrap a block's rendered content with its editing affordances.
///
/// Hidden blocks disappear entirely unless outlines are on.
pub fn decorate(block: &Block, content: Node, view: &EditorView) -> Node {
    if block.is_hidden && !view.show_outlines {
        return Node::Empty;
    }

    let selected = view.is_selected(&block.id);
    let hovered = view.is_hovered(&block.id);

    let mut wrapper = Element::new("div")
        .class("sortable-block")
        .attr("data-sortable-id", block.id.as_str())
        .attr("data-block-id", block.id.as_str());
    if selected {
        wrapper = wrapper.class("is-selected");
    }
    if hovered {
        wrapper = wrapper.class("is-hovered");
    }
    if view.show_outlines {
        wrapper = wrapper.class("with-outline");
    }
    if block.is_hidden {
        wrapper = wrapper.class("is-hidden").css("opacity", HIDDEN_OPACITY);
    }

    if selected || hovered {
        wrapper = wrapper
            .child(
                Element::new("div")
                    .class("block-label")
                    .text(block.display_name()),
            )
            .child(action_bar(block));
    }

    let mut body = Element::new("div").class("block-content").child(content);
    if block.is_locked {
        wrapper = wrapper.class("is-locked");
        body = body.css("pointerEvents", "none");
    }
    wrapper = wrapper.child(body);
    if block.is_locked {
        wrapper = wrapper.child(
            Element::new("div")
                .class("lock-overlay")
                .attr("aria-label", "Locked")
                .text("Locked"),
        );
    }
    wrapper.into()
}
