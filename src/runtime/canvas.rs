//! Canvas
//!
//! Hosts the drop surface. A drag gesture selects the dragged block, tracks
//! the hovered drop target for feedback, and on release turns the target into
//! a new parent and position with [`resolve_drop`].

use serde::Serialize;

use super::editor::PageBuilder;
use crate::config::EditorConfig;
use crate::core::style::StyleMap;
use crate::core::tree::Placement;
use crate::core::{BlockId, BlockTree, Breakpoint};
use crate::render::{BlockRenderer, Element, Node, RenderMode};

pub const EMPTY_PAGE_TEXT: &str = "Drag blocks from the library to start building";

// ── Drop resolution ─────────────────────────────────────────────────────────

/// Where a block lands when released over `target`.
///
/// Dropping on a container appends to its children; dropping on anything
/// else takes the target's place among its siblings. `exclude` is the block
/// being moved, which does not count as an existing child.
pub fn placement_for_target(tree: &BlockTree, target: &BlockId, exclude: Option<&BlockId>) -> Option<Placement> {
    let target_block = tree.get(target)?;
    if target_block.is_container() {
        let position = tree
            .children_of(Some(target))
            .iter()
            .filter(|child| Some(&child.id) != exclude)
            .count();
        Some(Placement::inside(target.clone(), position))
    } else {
        Some(Placement {
            parent_id: target_block.parent_id.clone(),
            position: target_block.position,
        })
    }
}

/// New placement for `dragged` released over `target`, or `None` when the
/// drop changes nothing: no target, an unknown block, the block itself, or a
/// target inside the dragged block's own subtree.
pub fn resolve_drop(tree: &BlockTree, dragged: &BlockId, target: Option<&BlockId>) -> Option<Placement> {
    let target = target?;
    if target == dragged || !tree.contains(dragged) {
        return None;
    }
    if tree.is_descendant(dragged, target) {
        return None;
    }
    placement_for_target(tree, target, Some(dragged))
}

// ── Drag session ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DragSession {
    active: Option<BlockId>,
    over: Option<BlockId>,
}

impl DragSession {
    pub fn start(&mut self, id: BlockId) {
        self.active = Some(id);
        self.over = None;
    }

    /// Feedback only; nothing moves until [`DragSession::end`].
    pub fn over(&mut self, target: Option<BlockId>) {
        if self.active.is_some() {
            self.over = target;
        }
    }

    /// Finish the gesture. Returns the dragged block and where it should go.
    pub fn end(&mut self, tree: &BlockTree, target: Option<&BlockId>) -> Option<(BlockId, Placement)> {
        let dragged = self.active.take()?;
        self.over = None;
        let placement = resolve_drop(tree, &dragged, target)?;
        Some((dragged, placement))
    }

    pub fn cancel(&mut self) {
        self.active = None;
        self.over = None;
    }

    pub fn active(&self) -> Option<&BlockId> {
        self.active.as_ref()
    }

    pub fn over_target(&self) -> Option<&BlockId> {
        self.over.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }
}

// ── Viewport ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Viewport {
    pub breakpoint: Breakpoint,
    /// Percentage, 100 = actual size
    pub zoom: u32,
    pub width: u32,
    pub show_grid: bool,
    pub grid_size: u32,
}

impl Viewport {
    pub fn new(config: &EditorConfig, breakpoint: Breakpoint, zoom: u32, show_grid: bool) -> Self {
        Self {
            breakpoint,
            zoom,
            width: config.width_of(breakpoint),
            show_grid,
            grid_size: config.grid_size,
        }
    }

    pub fn scale(&self) -> f64 {
        self.zoom as f64 / 100.0
    }

    pub fn frame_style(&self) -> StyleMap {
        StyleMap::new()
            .with("width", self.width as f64)
            .with("transform", format!("scale({})", self.scale()))
            .with("transformOrigin", "top center")
    }

    pub fn grid_overlay(&self) -> Node {
        if !self.show_grid {
            return Node::Empty;
        }
        let line = "rgba(59, 130, 246, 0.12)";
        Element::new("div")
            .class("canvas-grid")
            .attr("aria-hidden", "true")
            .css("position", "absolute")
            .css("inset", 0i64)
            .css("pointerEvents", "none")
            .css(
                "backgroundImage",
                format!(
                    "linear-gradient(to right, {line} 1px, transparent 1px), linear-gradient(to bottom, {line} 1px, transparent 1px)"
                ),
            )
            .css("backgroundSize", format!("{0}px {0}px", self.grid_size))
            .into()
    }
}

// ── Rendering ───────────────────────────────────────────────────────────────

pub struct Canvas;

impl Canvas {
    pub fn render(editor: &PageBuilder) -> Node {
        if editor.is_loading() {
            return Element::new("div")
                .class("canvas-loading")
                .attr("role", "status")
                .child(Element::new("div").class("spinner"))
                .text("Loading page")
                .into();
        }

        let view = editor.view();
        let viewport = editor.viewport();
        let mode = if view.preview {
            RenderMode::Preview
        } else {
            RenderMode::Edit(editor.editor_view())
        };
        let renderer = BlockRenderer::new(editor.tree(), view.breakpoint).with_mode(mode.clone());

        let mut roots = renderer.render_roots();
        if roots.is_empty() && !mode.is_preview() {
            roots.push(Element::new("div").class("canvas-empty").text(EMPTY_PAGE_TEXT).into());
        }

        let mut frame = Element::new("div")
            .class("canvas-frame")
            .attr("data-breakpoint", view.breakpoint.to_string())
            .style(viewport.frame_style())
            .css("position", "relative")
            .children(roots);
        if !mode.is_preview() {
            frame = frame.child(viewport.grid_overlay());
        }

        Element::new("div")
            .class("canvas")
            .attr("data-zoom", viewport.zoom.to_string())
            .child(frame)
            .child(Self::drag_overlay(editor))
            .into()
    }

    /// Preview of the dragged block that follows the pointer
    fn drag_overlay(editor: &PageBuilder) -> Node {
        let session = editor.drag_session();
        let Some(block) = session.active().and_then(|id| editor.tree().get(id)) else {
            return Node::Empty;
        };
        let preview = BlockRenderer::new(editor.tree(), editor.view().breakpoint).render_block(block);
        let mut overlay = Element::new("div")
            .class("drag-overlay")
            .attr("data-dragging", block.id.as_str())
            .css("opacity", 0.8)
            .css("pointerEvents", "none");
        if let Some(target) = session.over_target() {
            overlay = overlay.attr("data-drop-target", target.as_str());
        }
        overlay.child(preview).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Block;

    fn tree() -> BlockTree {
        BlockTree::from_blocks(vec![
            Block::new("s", "section"),
            Block::new("h", "heading").with_parent("s", 0),
            Block::new("t", "text").with_parent("s", 1),
            Block::new("g", "grid").at_position(1),
            Block::new("b", "button").at_position(2),
        ])
        .unwrap()
    }

    #[test]
    fn test_drop_on_container_appends() {
        let tree = tree();
        assert_eq!(
            resolve_drop(&tree, &"b".into(), Some(&"s".into())),
            Some(Placement::inside("s".into(), 2))
        );
        assert_eq!(
            resolve_drop(&tree, &"b".into(), Some(&"g".into())),
            Some(Placement::inside("g".into(), 0))
        );
    }

    #[test]
    fn test_drop_within_same_container_does_not_count_itself() {
        let tree = tree();
        assert_eq!(
            resolve_drop(&tree, &"h".into(), Some(&"s".into())),
            Some(Placement::inside("s".into(), 1))
        );
    }

    #[test]
    fn test_drop_on_leaf_takes_sibling_position() {
        let tree = tree();
        assert_eq!(
            resolve_drop(&tree, &"b".into(), Some(&"t".into())),
            Some(Placement::inside("s".into(), 1))
        );
        assert_eq!(
            resolve_drop(&tree, &"h".into(), Some(&"b".into())),
            Some(Placement::root(2))
        );
    }

    #[test]
    fn test_noop_drops() {
        let tree = tree();
        assert_eq!(resolve_drop(&tree, &"b".into(), None), None);
        assert_eq!(resolve_drop(&tree, &"b".into(), Some(&"b".into())), None);
        assert_eq!(resolve_drop(&tree, &"b".into(), Some(&"nope".into())), None);
        assert_eq!(resolve_drop(&tree, &"nope".into(), Some(&"s".into())), None);
        assert_eq!(resolve_drop(&tree, &"s".into(), Some(&"h".into())), None);
    }

    #[test]
    fn test_session_lifecycle() {
        let tree = tree();
        let mut session = DragSession::default();
        session.over(Some("s".into()));
        assert_eq!(session.over_target(), None);

        session.start("b".into());
        session.over(Some("s".into()));
        assert_eq!(session.over_target(), Some(&"s".into()));

        let (dragged, placement) = session.end(&tree, Some(&"s".into())).unwrap();
        assert_eq!(dragged, BlockId::from("b"));
        assert_eq!(placement, Placement::inside("s".into(), 2));
        assert!(!session.is_dragging());

        session.start("b".into());
        session.cancel();
        assert!(session.end(&tree, Some(&"s".into())).is_none());
    }

    #[test]
    fn test_viewport_style() {
        let config = EditorConfig::default();
        let viewport = Viewport::new(&config, Breakpoint::Mobile, 75, true);
        let style = viewport.frame_style();
        assert_eq!(style.get("width"), Some(&375.0.into()));
        assert_eq!(style.get("transform"), Some(&"scale(0.75)".into()));
        assert!(viewport.grid_overlay().as_element().is_some());
    }
}
