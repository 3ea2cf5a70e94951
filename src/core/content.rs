//! Typed block content
//!
//! Props are stored as an open map, but nothing downstream reads the map
//! directly: [`BlockContent::from_block`] turns it into one case per block
//! type, substituting defaults for missing or malformed props.

use super::block::{Block, BlockType, Props};
use super::parameter::PropValue;

pub const DEFAULT_HEADING: &str = "Heading";
pub const DEFAULT_TEXT: &str = "Start writing your content here.";
pub const DEFAULT_BUTTON_LABEL: &str = "Button";
pub const DEFAULT_HERO_TITLE: &str = "Discover your next destination";
pub const DEFAULT_CARD_TITLE: &str = "Card title";

/// One accordion panel
#[derive(Debug, Clone, PartialEq)]
pub struct AccordionItem {
    pub title: String,
    pub content: String,
}

/// One tab of a tab set
#[derive(Debug, Clone, PartialEq)]
pub struct TabItem {
    pub label: String,
    pub content: String,
}

/// Typed view of a block's props
#[derive(Debug, Clone, PartialEq)]
pub enum BlockContent {
    Container,
    Section { full_width: bool },
    Columns { columns: u32, gap: f64 },
    Grid { columns: u32, gap: f64 },
    Heading { text: String, level: u8 },
    Text { content: String },
    Button { label: String, href: Option<String>, variant: String },
    Image { src: Option<String>, alt: String },
    Hero {
        title: String,
        subtitle: Option<String>,
        cta_label: Option<String>,
        cta_href: Option<String>,
        background_image: Option<String>,
    },
    Card { title: String, body: Option<String>, image: Option<String> },
    Spacer { height: f64 },
    Divider { thickness: f64, color: String },
    Accordion { items: Vec<AccordionItem> },
    Tabs { tabs: Vec<TabItem>, active: usize },
    Code { code: String, language: String },
    DestinationCard { slug: Option<String> },
    DestinationGrid { city: Option<String>, limit: u32 },
    TripSummary { trip_id: Option<String> },
    MapEmbed { query: Option<String>, zoom: u32 },
    Unknown { type_name: String },
}

fn text(props: &Props, key: &str) -> Option<String> {
    props
        .get(key)
        .and_then(PropValue::as_string)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn text_or(props: &Props, key: &str, default: &str) -> String {
    text(props, key).unwrap_or_else(|| default.to_string())
}

fn number_or(props: &Props, key: &str, default: f64) -> f64 {
    props
        .get(key)
        .and_then(PropValue::as_number)
        .filter(|n| n.is_finite() && *n >= 0.0)
        .unwrap_or(default)
}

fn count_or(props: &Props, key: &str, default: u32, max: u32) -> u32 {
    props
        .get(key)
        .and_then(PropValue::as_integer)
        .filter(|n| *n >= 1)
        .map(|n| n.min(i64::from(max)) as u32)
        .unwrap_or(default)
}

fn bool_or(props: &Props, key: &str, default: bool) -> bool {
    props.get(key).and_then(PropValue::as_bool).unwrap_or(default)
}

fn entries<T>(props: &Props, key: &str, map: impl Fn(&PropValue) -> Option<T>) -> Vec<T> {
    props
        .get(key)
        .and_then(PropValue::as_array)
        .map(|items| items.iter().filter_map(map).collect())
        .unwrap_or_default()
}

fn member(value: &PropValue, key: &str) -> Option<String> {
    value
        .as_object()
        .and_then(|obj| obj.get(key))
        .and_then(PropValue::as_string)
        .map(str::to_string)
}

impl BlockContent {
    /// Read a block's props into its typed case.
    pub fn from_block(block: &Block) -> Self {
        let props = &block.props;
        match &block.block_type {
            BlockType::Container => BlockContent::Container,
            BlockType::Section => BlockContent::Section {
                full_width: bool_or(props, "fullWidth", false),
            },
            BlockType::Columns => BlockContent::Columns {
                columns: count_or(props, "columns", 2, 6),
                gap: number_or(props, "gap", 16.0),
            },
            BlockType::Grid => BlockContent::Grid {
                columns: count_or(props, "columns", 3, 12),
                gap: number_or(props, "gap", 16.0),
            },
            BlockType::Heading => {
                let level = props
                    .get("level")
                    .and_then(PropValue::as_integer)
                    .filter(|l| (1..=6).contains(l))
                    .unwrap_or(2) as u8;
                BlockContent::Heading {
                    text: text_or(props, "text", DEFAULT_HEADING),
                    level,
                }
            }
            BlockType::Text => BlockContent::Text {
                content: text_or(props, "content", DEFAULT_TEXT),
            },
            BlockType::Button => BlockContent::Button {
                label: text_or(props, "label", DEFAULT_BUTTON_LABEL),
                href: text(props, "href"),
                variant: text_or(props, "variant", "primary"),
            },
            BlockType::Image => BlockContent::Image {
                src: text(props, "src"),
                alt: text_or(props, "alt", ""),
            },
            BlockType::Hero => BlockContent::Hero {
                title: text_or(props, "title", DEFAULT_HERO_TITLE),
                subtitle: text(props, "subtitle"),
                cta_label: text(props, "ctaLabel"),
                cta_href: text(props, "ctaHref"),
                background_image: text(props, "backgroundImage"),
            },
            BlockType::Card => BlockContent::Card {
                title: text_or(props, "title", DEFAULT_CARD_TITLE),
                body: text(props, "body"),
                image: text(props, "image"),
            },
            BlockType::Spacer => BlockContent::Spacer {
                height: number_or(props, "height", 32.0),
            },
            BlockType::Divider => BlockContent::Divider {
                thickness: number_or(props, "thickness", 1.0),
                color: text_or(props, "color", "#e5e7eb"),
            },
            BlockType::Accordion => {
                let mut items = entries(props, "items", |item| {
                    Some(AccordionItem {
                        title: member(item, "title")?,
                        content: member(item, "content").unwrap_or_default(),
                    })
                });
                if items.is_empty() {
                    items.push(AccordionItem {
                        title: "Accordion item".into(),
                        content: String::new(),
                    });
                }
                BlockContent::Accordion { items }
            }
            BlockType::Tabs => {
                let mut tabs = entries(props, "tabs", |tab| {
                    Some(TabItem {
                        label: member(tab, "label")?,
                        content: member(tab, "content").unwrap_or_default(),
                    })
                });
                if tabs.is_empty() {
                    tabs.push(TabItem {
                        label: "Tab 1".into(),
                        content: String::new(),
                    });
                }
                let active = props
                    .get("activeTab")
                    .and_then(PropValue::as_integer)
                    .filter(|i| *i >= 0 && (*i as usize) < tabs.len())
                    .unwrap_or(0) as usize;
                BlockContent::Tabs { tabs, active }
            }
            BlockType::Code => BlockContent::Code {
                code: props
                    .get("code")
                    .and_then(PropValue::as_string)
                    .unwrap_or("")
                    .to_string(),
                language: text_or(props, "language", "plaintext"),
            },
            BlockType::DestinationCard => BlockContent::DestinationCard {
                slug: text(props, "slug"),
            },
            BlockType::DestinationGrid => BlockContent::DestinationGrid {
                city: text(props, "city"),
                limit: count_or(props, "limit", 6, 48),
            },
            BlockType::TripSummary => BlockContent::TripSummary {
                trip_id: text(props, "tripId"),
            },
            BlockType::MapEmbed => BlockContent::MapEmbed {
                query: text(props, "query"),
                zoom: count_or(props, "zoom", 12, 20),
            },
            BlockType::Unknown(name) => BlockContent::Unknown {
                type_name: name.clone(),
            },
        }
    }
}
