//! Block type and related types
//!
//! A [`Block`] is one node of a page's content tree. It is a plain data row:
//! type, parent link, sibling position, open prop map and per-breakpoint
//! styles. Everything that interprets props lives in [`super::content`].

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use super::breakpoint::Breakpoint;
use super::parameter::PropValue;
use super::style::{BlockStyles, StyleMap};
use super::BlockId;

/// Open prop map of a block
pub type Props = BTreeMap<String, PropValue>;

/// Block type
///
/// Closed set of built-in types plus the travel placeholders. Anything else is
/// kept verbatim in `Unknown` so it survives a load/save round trip and can be
/// rendered as an error placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    Container,
    Section,
    Columns,
    Grid,
    Heading,
    Text,
    Button,
    Image,
    Hero,
    Card,
    Spacer,
    Divider,
    Accordion,
    Tabs,
    Code,
    DestinationCard,
    DestinationGrid,
    TripSummary,
    MapEmbed,
    Unknown(String),
}

impl BlockType {
    /// Every known type, in library order
    pub const KNOWN: [BlockType; 19] = [
        BlockType::Container,
        BlockType::Section,
        BlockType::Columns,
        BlockType::Grid,
        BlockType::Heading,
        BlockType::Text,
        BlockType::Button,
        BlockType::Image,
        BlockType::Hero,
        BlockType::Card,
        BlockType::Spacer,
        BlockType::Divider,
        BlockType::Accordion,
        BlockType::Tabs,
        BlockType::Code,
        BlockType::DestinationCard,
        BlockType::DestinationGrid,
        BlockType::TripSummary,
        BlockType::MapEmbed,
    ];

    /// Parse a type name. Never fails; unrecognised names become `Unknown`.
    pub fn parse(name: &str) -> Self {
        match name {
            "container" => BlockType::Container,
            "section" => BlockType::Section,
            "columns" => BlockType::Columns,
            "grid" => BlockType::Grid,
            "heading" => BlockType::Heading,
            "text" => BlockType::Text,
            "button" => BlockType::Button,
            "image" => BlockType::Image,
            "hero" => BlockType::Hero,
            "card" => BlockType::Card,
            "spacer" => BlockType::Spacer,
            "divider" => BlockType::Divider,
            "accordion" => BlockType::Accordion,
            "tabs" => BlockType::Tabs,
            "code" => BlockType::Code,
            "destination_card" => BlockType::DestinationCard,
            "destination_grid" => BlockType::DestinationGrid,
            "trip_summary" => BlockType::TripSummary,
            "map_embed" => BlockType::MapEmbed,
            other => BlockType::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BlockType::Container => "container",
            BlockType::Section => "section",
            BlockType::Columns => "columns",
            BlockType::Grid => "grid",
            BlockType::Heading => "heading",
            BlockType::Text => "text",
            BlockType::Button => "button",
            BlockType::Image => "image",
            BlockType::Hero => "hero",
            BlockType::Card => "card",
            BlockType::Spacer => "spacer",
            BlockType::Divider => "divider",
            BlockType::Accordion => "accordion",
            BlockType::Tabs => "tabs",
            BlockType::Code => "code",
            BlockType::DestinationCard => "destination_card",
            BlockType::DestinationGrid => "destination_grid",
            BlockType::TripSummary => "trip_summary",
            BlockType::MapEmbed => "map_embed",
            BlockType::Unknown(name) => name,
        }
    }

    /// Types that own child blocks and accept drops.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            BlockType::Container | BlockType::Section | BlockType::Columns | BlockType::Grid
        )
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, BlockType::Unknown(_))
    }
}

impl From<String> for BlockType {
    fn from(name: String) -> Self {
        BlockType::parse(&name)
    }
}

impl From<&str> for BlockType {
    fn from(name: &str) -> Self {
        BlockType::parse(name)
    }
}

impl From<BlockType> for String {
    fn from(block_type: BlockType) -> Self {
        block_type.as_str().to_string()
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single node of the page content tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parent_id: Option<BlockId>,
    /// Ordinal among siblings sharing `parent_id`
    #[serde(default, deserialize_with = "null_as_default")]
    pub position: usize,
    #[serde(default, deserialize_with = "null_as_default")]
    pub props: Props,
    #[serde(default, deserialize_with = "null_as_default")]
    pub styles: BlockStyles,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_locked: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_hidden: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// Nullable columns read as their default instead of rejecting the row.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Block {
    /// Create an empty root-level block of the given type
    pub fn new(id: impl Into<BlockId>, block_type: impl Into<BlockType>) -> Self {
        Self {
            id: id.into(),
            block_type: block_type.into(),
            parent_id: None,
            position: 0,
            props: Props::new(),
            styles: BlockStyles::new(),
            is_locked: false,
            is_hidden: false,
            name: String::new(),
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<BlockId>, position: usize) -> Self {
        self.parent_id = Some(parent_id.into());
        self.position = position;
        self
    }

    pub fn at_position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    pub fn with_prop(mut self, key: &str, value: impl Into<PropValue>) -> Self {
        self.props.insert(key.to_string(), value.into());
        self
    }

    pub fn with_styles(mut self, breakpoint: Breakpoint, styles: StyleMap) -> Self {
        self.styles = self.styles.with(breakpoint, styles);
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn prop(&self, key: &str) -> Option<&PropValue> {
        self.props.get(key)
    }

    pub fn is_container(&self) -> bool {
        self.block_type.is_container()
    }

    /// Label shown in the editor: the block name, or the type name.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.block_type.as_str()
        } else {
            &self.name
        }
    }
}

/// Block errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum BlockError {
    /// Block type is not registered in the catalog
    #[error("Unknown block type: {0}")]
    UnknownType(String),

    /// Invalid prop value
    #[error("Invalid prop: {0}")]
    InvalidProp(String),

    /// Prop path does not address a value
    #[error("Invalid prop path: {0}")]
    InvalidPath(String),

    /// Serialization failed
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for BlockError {
    fn from(error: serde_json::Error) -> Self {
        BlockError::SerializationError(error.to_string())
    }
}
