//! Block renderer
//!
//! Maps blocks to [`Node`] trees for one breakpoint. The renderer only reads
//! the tree; every edit goes through the editor.

use super::node::{Element, Node};
use super::sortable::{self, EditorView};
use crate::core::content::{BlockContent, TabItem};
use crate::core::style::StyleMap;
use crate::core::{Block, BlockTree, Breakpoint};

pub const EMPTY_CONTAINER_TEXT: &str = "Drop blocks here";

/// Preview shows the page as visitors see it; edit adds the sortable chrome.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderMode {
    Preview,
    Edit(EditorView),
}

impl RenderMode {
    pub fn is_preview(&self) -> bool {
        matches!(self, RenderMode::Preview)
    }
}

pub struct BlockRenderer<'a> {
    tree: &'a BlockTree,
    breakpoint: Breakpoint,
    mode: RenderMode,
}

impl<'a> BlockRenderer<'a> {
    pub fn new(tree: &'a BlockTree, breakpoint: Breakpoint) -> Self {
        Self {
            tree,
            breakpoint,
            mode: RenderMode::Preview,
        }
    }

    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    /// Every root block, in order
    pub fn render_roots(&self) -> Vec<Node> {
        self.tree
            .roots()
            .into_iter()
            .map(|block| self.render_block(block))
            .filter(|node| !node.is_empty())
            .collect()
    }

    pub fn render_page(&self) -> Node {
        Element::new("div")
            .class("page")
            .attr("data-breakpoint", self.breakpoint.to_string())
            .children(self.render_roots())
            .into()
    }

    pub fn render_block(&self, block: &Block) -> Node {
        self.render_at_depth(block, 0)
    }

    fn render_at_depth(&self, block: &Block, depth: usize) -> Node {
        // A parent chain longer than the tree itself means stored data has a cycle.
        if depth > self.tree.len() {
            tracing::warn!(block = %block.id, "parent cycle while rendering");
            return Node::Empty;
        }

        match &self.mode {
            RenderMode::Preview if block.is_hidden => Node::Empty,
            RenderMode::Preview => self.render_content(block, depth),
            RenderMode::Edit(view) => {
                if block.is_hidden && !view.show_outlines {
                    return Node::Empty;
                }
                sortable::decorate(block, self.render_content(block, depth), view)
            }
        }
    }

    fn render_children(&self, block: &Block, depth: usize) -> Vec<Node> {
        let children = self.tree.children_of(Some(&block.id));
        if children.is_empty() {
            if self.mode.is_preview() {
                return Vec::new();
            }
            return vec![Element::new("div")
                .class("empty-container")
                .text(EMPTY_CONTAINER_TEXT)
                .into()];
        }
        children
            .into_iter()
            .map(|child| self.render_at_depth(child, depth + 1))
            .collect()
    }

    fn render_content(&self, block: &Block, depth: usize) -> Node {
        let style = block.styles.resolve(self.breakpoint);
        let base = |tag: &str| {
            Element::new(tag)
                .class(&format!("block-{}", block.block_type.as_str().replace('_', "-")))
                .attr("data-block-type", block.block_type.as_str())
        };

        let element = match BlockContent::from_block(block) {
            BlockContent::Container => base("div").children(self.render_children(block, depth)),
            BlockContent::Section { full_width } => {
                let el = base("section");
                let el = if full_width { el.class("full-width") } else { el };
                el.children(self.render_children(block, depth))
            }
            BlockContent::Columns { columns, gap } | BlockContent::Grid { columns, gap } => base("div")
                .css("display", "grid")
                .css("gridTemplateColumns", format!("repeat({}, 1fr)", columns))
                .css("gap", gap)
                .children(self.render_children(block, depth)),
            BlockContent::Heading { text, level } => base(&format!("h{}", level)).text(&text),
            BlockContent::Text { content } => base("p").text(&content),
            BlockContent::Button {
                label,
                href,
                variant,
            } => {
                let el = match href {
                    Some(href) => base("a").attr("href", href),
                    None => base("button").attr("type", "button"),
                };
                el.class(&format!("btn-{}", variant)).text(&label)
            }
            BlockContent::Image { src: Some(src), alt } => base("img").attr("src", src).attr("alt", alt),
            BlockContent::Image { src: None, .. } => base("div")
                .class("placeholder")
                .text("No image selected"),
            BlockContent::Hero {
                title,
                subtitle,
                cta_label,
                cta_href,
                background_image,
            } => {
                let mut el = base("section");
                if let Some(image) = background_image {
                    el = el
                        .css("backgroundImage", format!("url({})", image))
                        .css("backgroundSize", "cover");
                }
                el = el.child(Element::new("h1").text(&title));
                if let Some(subtitle) = subtitle {
                    el = el.child(Element::new("p").class("hero-subtitle").text(&subtitle));
                }
                if let Some(label) = cta_label {
                    el = el.child(
                        Element::new("a")
                            .class("hero-cta")
                            .attr("href", cta_href.unwrap_or_else(|| "#".into()))
                            .text(&label),
                    );
                }
                el
            }
            BlockContent::Card { title, body, image } => {
                let mut el = base("div");
                if let Some(image) = image {
                    el = el.child(Element::new("img").attr("src", image).attr("alt", title.clone()));
                }
                el = el.child(Element::new("h3").text(&title));
                if let Some(body) = body {
                    el = el.child(Element::new("p").text(&body));
                }
                el
            }
            BlockContent::Spacer { height } => base("div").css("height", height),
            BlockContent::Divider { thickness, color } => {
                base("hr").css("borderTop", format!("{}px solid {}", thickness, color))
            }
            BlockContent::Accordion { items } => base("div").children(items.into_iter().map(|item| {
                Element::new("details")
                    .child(Element::new("summary").text(&item.title))
                    .child(Element::new("div").class("accordion-body").text(&item.content))
                    .into()
            })),
            BlockContent::Tabs { tabs, active } => render_tabs(base("div"), &tabs, active),
            BlockContent::Code { code, language } => base("pre").child(
                Element::new("code")
                    .class(&format!("language-{}", language))
                    .text(&code),
            ),
            BlockContent::DestinationCard { slug } => match slug {
                Some(slug) => base("div")
                    .attr("data-slug", slug.clone())
                    .text(&format!("Destination: {}", slug)),
                None => base("div").class("placeholder").text("Select a destination"),
            },
            BlockContent::DestinationGrid { city, limit } => {
                let el = base("div").attr("data-limit", limit.to_string());
                match city {
                    Some(city) => el
                        .attr("data-city", city.clone())
                        .text(&format!("Top {} destinations in {}", limit, city)),
                    None => el.text(&format!("Top {} destinations", limit)),
                }
            }
            BlockContent::TripSummary { trip_id } => match trip_id {
                Some(id) => base("div").attr("data-trip-id", id).text("Trip summary"),
                None => base("div").class("placeholder").text("Select a trip"),
            },
            BlockContent::MapEmbed { query, zoom } => {
                let el = base("div").attr("data-zoom", zoom.to_string());
                match query {
                    Some(query) => el.attr("data-query", query.clone()).text(&format!("Map: {}", query)),
                    None => el.class("placeholder").text("Enter a location"),
                }
            }
            BlockContent::Unknown { type_name } => Element::new("div")
                .class("block-unknown")
                .attr("data-block-type", type_name.clone())
                .text(&format!("Unknown block type: {}", type_name)),
        };

        with_style(element, style).into()
    }
}

fn with_style(element: Element, style: StyleMap) -> Element {
    if style.is_empty() {
        element
    } else {
        element.style(style)
    }
}

fn render_tabs(el: Element, tabs: &[TabItem], active: usize) -> Element {
    let list = tabs.iter().enumerate().fold(
        Element::new("div").attr("role", "tablist"),
        |list, (index, tab)| {
            let button = Element::new("button")
                .attr("role", "tab")
                .attr("aria-selected", (index == active).to_string())
                .text(&tab.label);
            list.child(if index == active { button.class("active") } else { button })
        },
    );
    let panel = Element::new("div")
        .attr("role", "tabpanel")
        .text(tabs.get(active).map(|t| t.content.as_str()).unwrap_or(""));
    el.child(list).child(panel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tree::Placement;

    fn tree_with(blocks: Vec<Block>) -> BlockTree {
        BlockTree::from_blocks(blocks).unwrap()
    }

    #[test]
    fn test_section_with_default_heading() {
        let tree = tree_with(vec![
            Block::new("a", "section"),
            Block::new("b", "heading").with_parent("a", 0),
        ]);
        let renderer = BlockRenderer::new(&tree, Breakpoint::Desktop);
        let roots = renderer.render_roots();
        assert_eq!(roots.len(), 1);
        let section = roots[0].as_element().unwrap();
        assert_eq!(section.tag, "section");
        assert_eq!(section.children.len(), 1);
        let heading = section.children[0].as_element().unwrap();
        assert_eq!(heading.tag, "h2");
        assert_eq!(roots[0].text_content(), "Heading");
    }

    #[test]
    fn test_empty_container_placeholder_only_when_editing() {
        let tree = tree_with(vec![Block::new("a", "container")]);
        let preview = BlockRenderer::new(&tree, Breakpoint::Desktop).render_page();
        assert!(!preview.text_content().contains(EMPTY_CONTAINER_TEXT));

        let edit = BlockRenderer::new(&tree, Breakpoint::Desktop)
            .with_mode(RenderMode::Edit(EditorView::default()))
            .render_page();
        assert!(edit.text_content().contains(EMPTY_CONTAINER_TEXT));
    }

    #[test]
    fn test_unknown_type_placeholder() {
        let tree = tree_with(vec![Block::new("x", "carousel")]);
        let page = BlockRenderer::new(&tree, Breakpoint::Desktop).render_page();
        assert_eq!(page.text_content(), "Unknown block type: carousel");
    }

    #[test]
    fn test_resolved_style_applied() {
        let mut tree = BlockTree::new();
        tree.insert(Block::new("t", "text"), Placement::root(0)).unwrap();
        tree.set_style(&"t".into(), Breakpoint::Desktop, "color", Some("red".into()))
            .unwrap();
        tree.set_style(&"t".into(), Breakpoint::Mobile, "color", Some("blue".into()))
            .unwrap();

        let desktop = BlockRenderer::new(&tree, Breakpoint::Desktop).render_page();
        let mobile = BlockRenderer::new(&tree, Breakpoint::Mobile).render_page();
        let color = |page: &Node| {
            page.find(&|el| el.tag == "p")
                .and_then(|p| p.style.get("color").cloned())
        };
        assert_eq!(color(&desktop), Some("red".into()));
        assert_eq!(color(&mobile), Some("blue".into()));
    }

    #[test]
    fn test_parent_cycle_does_not_recurse_forever() {
        let tree = tree_with(vec![
            Block::new("a", "container").with_parent("b", 0),
            Block::new("b", "container").with_parent("a", 0),
        ]);
        let renderer = BlockRenderer::new(&tree, Breakpoint::Desktop);
        let a = tree.get(&"a".into()).unwrap();
        let node = renderer.render_block(a);
        assert!(node.as_element().is_some());
    }
}
