//! Rendering pages in preview and edit mode

use crate::core::{Block, BlockId, BlockTree, Breakpoint, StyleMap};
use crate::render::{BlockRenderer, EditorView, Node, RenderMode};

fn page() -> BlockTree {
    BlockTree::from_blocks(vec![
        Block::new("a", "section"),
        Block::new("b", "heading").with_parent("a", 0),
        Block::new("c", "text")
            .with_parent("a", 1)
            .with_prop("content", "Sunny all year")
            .with_styles(Breakpoint::Desktop, StyleMap::new().with("fontSize", 18i64))
            .with_styles(Breakpoint::Mobile, StyleMap::new().with("fontSize", 14i64)),
        Block::new("d", "container").at_position(1),
    ])
    .unwrap()
}

fn edit(view: EditorView) -> RenderMode {
    RenderMode::Edit(view)
}

fn sortable<'n>(node: &'n Node, id: &str) -> Option<&'n crate::render::Element> {
    node.find(&|el| el.has_class("sortable-block") && el.attrs.get("data-sortable-id").map(String::as_str) == Some(id))
}

#[test]
fn test_section_with_default_heading_renders_h2() {
    let tree = page();
    let node = BlockRenderer::new(&tree, Breakpoint::Desktop).render_page();

    let section = node.find(&|el| el.tag == "section").unwrap();
    let heading = section.children[0].as_element().unwrap();
    assert_eq!(heading.tag, "h2");
    assert_eq!(section.children[0].text_content(), "Heading");
    assert_eq!(
        heading.attrs.get("data-block-type").map(String::as_str),
        Some("heading")
    );
}

#[test]
fn test_preview_html_has_no_editor_chrome() {
    let tree = page();
    let html = BlockRenderer::new(&tree, Breakpoint::Desktop).render_page().to_html();
    assert!(html.contains("<h2"));
    assert!(html.contains("Sunny all year"));
    assert!(!html.contains("sortable-block"));
    assert!(!html.contains("Drop blocks here"));
}

#[test]
fn test_edit_mode_shows_empty_container_prompt() {
    let tree = page();
    let node = BlockRenderer::new(&tree, Breakpoint::Desktop)
        .with_mode(edit(EditorView::default()))
        .render_page();
    let container = sortable(&node, "d").unwrap();
    assert!(Node::Element(container.clone()).text_content().contains("Drop blocks here"));
}

#[test]
fn test_cascade_applies_per_breakpoint() {
    let tree = page();
    let text_style = |bp: Breakpoint| {
        let node = BlockRenderer::new(&tree, bp).render_page();
        node.find(&|el| el.tag == "p").unwrap().style.clone()
    };
    assert_eq!(text_style(Breakpoint::Desktop), StyleMap::new().with("fontSize", 18i64));
    assert_eq!(text_style(Breakpoint::Tablet), StyleMap::new().with("fontSize", 18i64));
    assert_eq!(text_style(Breakpoint::Mobile), StyleMap::new().with("fontSize", 14i64));
    // wide sits after mobile in the cascade
    assert_eq!(text_style(Breakpoint::Wide), StyleMap::new().with("fontSize", 14i64));
}

#[test]
fn test_hidden_block_depends_on_outlines() {
    let mut tree = page();
    tree.set_hidden(&BlockId::from("c"), true).unwrap();

    let preview = BlockRenderer::new(&tree, Breakpoint::Desktop).render_page();
    assert!(preview.find(&|el| el.tag == "p").is_none());

    let plain = BlockRenderer::new(&tree, Breakpoint::Desktop)
        .with_mode(edit(EditorView::default()))
        .render_page();
    assert!(sortable(&plain, "c").is_none());

    let outlined = BlockRenderer::new(&tree, Breakpoint::Desktop)
        .with_mode(edit(EditorView {
            show_outlines: true,
            ..EditorView::default()
        }))
        .render_page();
    let wrapper = sortable(&outlined, "c").unwrap();
    assert!(wrapper.has_class("is-hidden"));
    assert!(wrapper.has_class("with-outline"));
    assert_eq!(wrapper.style.get("opacity").and_then(|v| v.as_number()), Some(0.4));
}

#[test]
fn test_selected_locked_block_shows_overlay_and_actions() {
    let mut tree = page();
    let id = BlockId::from("b");
    tree.set_locked(&id, true).unwrap();
    tree.rename(&id, "Page title").unwrap();

    let node = BlockRenderer::new(&tree, Breakpoint::Desktop)
        .with_mode(edit(EditorView {
            selected: Some(id.clone()),
            ..EditorView::default()
        }))
        .render_page();

    let wrapper = sortable(&node, "b").unwrap();
    assert!(wrapper.has_class("is-selected"));
    assert!(wrapper.has_class("is-locked"));

    let wrapper = Node::Element(wrapper.clone());
    assert_eq!(
        wrapper.find(&|el| el.has_class("block-label")).map(|el| Node::Element(el.clone()).text_content()),
        Some("Page title".to_string())
    );
    assert!(wrapper.find(&|el| el.has_class("lock-overlay")).is_some());
    let lock_button = wrapper.find_by_attr("data-action", "toggle-lock").unwrap();
    assert_eq!(lock_button.attrs.get("title").map(String::as_str), Some("Unlock"));
    let body = wrapper.find(&|el| el.has_class("block-content")).unwrap();
    assert_eq!(body.style.get("pointerEvents").and_then(|v| v.as_text()), Some("none"));

    // siblings stay undecorated
    let sibling = sortable(&node, "c").unwrap();
    assert!(!sibling.has_class("is-selected"));
    assert!(Node::Element(sibling.clone()).find(&|el| el.has_class("block-actions")).is_none());
}

#[test]
fn test_unknown_block_type_renders_placeholder() {
    let tree = BlockTree::from_blocks(vec![Block::new("x", "carousel")]).unwrap();
    let node = BlockRenderer::new(&tree, Breakpoint::Desktop).render_page();
    let placeholder = node.find(&|el| el.has_class("block-unknown")).unwrap();
    assert_eq!(
        Node::Element(placeholder.clone()).text_content(),
        "Unknown block type: carousel"
    );
}

#[test]
fn test_travel_blocks_render_with_props() {
    let tree = BlockTree::from_blocks(vec![
        Block::new("d", "destination_card").with_prop("slug", "porto"),
        Block::new("g", "destination_grid")
            .at_position(1)
            .with_prop("city", "Lisbon")
            .with_prop("limit", 4i64),
        Block::new("m", "map_embed").at_position(2),
    ])
    .unwrap();
    let text = BlockRenderer::new(&tree, Breakpoint::Desktop).render_page().text_content();
    assert!(text.contains("Destination: porto"));
    assert!(text.contains("Top 4 destinations in Lisbon"));
    assert!(text.contains("Enter a location"));
}
