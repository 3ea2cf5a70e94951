//! Block Catalog - Central registry of the block types the library offers
//!
//! This module provides a thread-safe catalog for registering, discovering and
//! instantiating block definitions. It supports:
//! - Definition registration and unregistration
//! - Lookup by type, category, or search query
//! - Grouping search results for the library sidebar
//! - Instantiating new blocks with their default props and styles
//! - Checking stored props against a definition's schema

use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::categories::{builtin_definitions, LibraryCategory};
use crate::core::block::{Block, BlockType, Props};
use crate::core::breakpoint::Breakpoint;
use crate::core::parameter::{Parameter, ValidationResult};
use crate::core::style::{BlockStyles, StyleValue};
use crate::core::BlockId;

/// Everything the editor knows about one block type
#[derive(Debug, Clone, Serialize)]
pub struct BlockDefinition {
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub label: String,
    pub category: LibraryCategory,
    pub description: String,
    pub icon: String,
    /// Prop schema; parameter defaults double as the initial props
    pub schema: Vec<Parameter>,
    pub default_styles: BlockStyles,
    pub tags: Vec<String>,
}

impl BlockDefinition {
    pub fn new(block_type: BlockType, label: &str, category: LibraryCategory) -> Self {
        Self {
            block_type,
            label: label.to_string(),
            category,
            description: String::new(),
            icon: String::new(),
            schema: Vec::new(),
            default_styles: BlockStyles::new(),
            tags: Vec::new(),
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn icon(mut self, icon: &str) -> Self {
        self.icon = icon.to_string();
        self
    }

    pub fn param(mut self, parameter: Parameter) -> Self {
        self.schema.push(parameter);
        self
    }

    pub fn style(mut self, breakpoint: Breakpoint, key: &str, value: impl Into<StyleValue>) -> Self {
        self.default_styles.set(breakpoint, key, value);
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    /// Initial props: every schema parameter at its default value
    pub fn default_props(&self) -> Props {
        self.schema
            .iter()
            .filter(|p| !p.default_value.is_null())
            .map(|p| (p.id.clone(), p.default_value.clone()))
            .collect()
    }

    pub fn parameter(&self, id: &str) -> Option<&Parameter> {
        self.schema.iter().find(|p| p.id == id)
    }

    fn matches(&self, query: &str) -> bool {
        query.is_empty()
            || self.label.to_lowercase().contains(query)
            || self.block_type.as_str().to_lowercase().contains(query)
    }
}

/// One sidebar section of the block library
#[derive(Debug, Clone, Serialize)]
pub struct LibraryGroup {
    pub category: LibraryCategory,
    pub blocks: Vec<Arc<BlockDefinition>>,
}

/// Catalog of block definitions
///
/// The catalog uses `Arc<RwLock<HashMap>>` so clones share one set of
/// definitions; reads are concurrent, writes exclusive.
#[derive(Clone)]
pub struct BlockCatalog {
    definitions: Arc<RwLock<HashMap<String, Arc<BlockDefinition>>>>,
}

impl BlockCatalog {
    /// Create a new empty catalog
    ///
    /// # Example
    /// ```
    /// use page_builder::core::registry::BlockCatalog;
    ///
    /// let catalog = BlockCatalog::new();
    /// assert_eq!(catalog.count(), 0);
    /// ```
    pub fn new() -> Self {
        Self {
            definitions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Catalog holding every built-in block type
    pub fn standard() -> Self {
        let catalog = Self::new();
        for definition in builtin_definitions() {
            if let Err(e) = catalog.register(definition) {
                tracing::warn!("skipping built-in block definition: {}", e);
            }
        }
        catalog
    }

    /// Register a new block definition
    ///
    /// # Returns
    /// * `Ok(())` if registration succeeds
    /// * `Err(RegistryError)` if the type is already registered or the
    ///   definition is malformed
    pub fn register(&self, definition: BlockDefinition) -> Result<(), RegistryError> {
        Self::validate_definition(&definition)?;

        let key = definition.block_type.as_str().to_string();
        let mut definitions = self.definitions.write();

        if definitions.contains_key(&key) {
            return Err(RegistryError::DuplicateDefinition(key));
        }

        definitions.insert(key, Arc::new(definition));
        Ok(())
    }

    /// Unregister a block type
    pub fn unregister(&self, block_type: &str) -> Result<(), RegistryError> {
        let mut definitions = self.definitions.write();

        definitions
            .remove(block_type)
            .ok_or_else(|| RegistryError::DefinitionNotFound(block_type.to_string()))?;

        Ok(())
    }

    /// Get a definition by type name
    pub fn get(&self, block_type: &str) -> Result<Arc<BlockDefinition>, RegistryError> {
        let definitions = self.definitions.read();

        definitions
            .get(block_type)
            .cloned()
            .ok_or_else(|| RegistryError::DefinitionNotFound(block_type.to_string()))
    }

    /// All definitions in sidebar order
    pub fn all(&self) -> Vec<Arc<BlockDefinition>> {
        self.search("")
    }

    /// Definitions of one category, in label order
    pub fn by_category(&self, category: &LibraryCategory) -> Vec<Arc<BlockDefinition>> {
        self.search("")
            .into_iter()
            .filter(|d| &d.category == category)
            .collect()
    }

    /// Case-insensitive substring search over label and type name.
    /// An empty (or blank) query matches everything.
    pub fn search(&self, query: &str) -> Vec<Arc<BlockDefinition>> {
        let query = query.trim().to_lowercase();
        let definitions = self.definitions.read();

        let mut results: Vec<Arc<BlockDefinition>> = definitions
            .values()
            .filter(|d| d.matches(&query))
            .cloned()
            .collect();
        results.sort_by(|a, b| {
            a.category
                .sort_key()
                .cmp(&b.category.sort_key())
                .then_with(|| a.label.cmp(&b.label))
        });
        results
    }

    /// Search results grouped by category; empty groups are omitted.
    pub fn grouped(&self, query: &str) -> Vec<LibraryGroup> {
        let mut groups: Vec<LibraryGroup> = Vec::new();
        for definition in self.search(query) {
            match groups.last_mut() {
                Some(group) if group.category == definition.category => {
                    group.blocks.push(definition);
                }
                _ => groups.push(LibraryGroup {
                    category: definition.category.clone(),
                    blocks: vec![definition],
                }),
            }
        }
        groups
    }

    /// Build a new root-level block of `block_type` with default props and
    /// styles and a fresh id.
    pub fn instantiate(&self, block_type: &str) -> Result<Block, RegistryError> {
        let definition = self.get(block_type)?;
        Ok(Block {
            id: BlockId::new(),
            block_type: definition.block_type.clone(),
            parent_id: None,
            position: 0,
            props: definition.default_props(),
            styles: definition.default_styles.clone(),
            is_locked: false,
            is_hidden: false,
            name: definition.label.clone(),
        })
    }

    /// Check a block's props against its definition's schema.
    pub fn validate_props(&self, block: &Block) -> ValidationResult {
        let definition = match self.get(block.block_type.as_str()) {
            Ok(d) => d,
            Err(_) => {
                return ValidationResult::ok()
                    .with_warning(format!("Block type '{}' is not in the catalog", block.block_type));
            }
        };

        let mut result = ValidationResult::ok();
        for parameter in &definition.schema {
            let value = block.prop(&parameter.id).cloned().unwrap_or_default();
            result = result.merge(parameter.validate(&value));
        }
        for key in block.props.keys() {
            if definition.parameter(key).is_none() {
                result = result.with_warning(format!(
                    "Prop '{}' is not used by {} blocks",
                    key, definition.label
                ));
            }
        }
        result
    }

    /// Get the number of registered definitions
    pub fn count(&self) -> usize {
        self.definitions.read().len()
    }

    /// Check if a block type is registered
    pub fn contains(&self, block_type: &str) -> bool {
        self.definitions.read().contains_key(block_type)
    }

    /// Remove every definition
    pub fn clear(&self) {
        self.definitions.write().clear();
    }

    fn validate_definition(definition: &BlockDefinition) -> Result<(), RegistryError> {
        if definition.label.trim().is_empty() {
            return Err(RegistryError::ValidationError(format!(
                "Block type '{}' needs a label",
                definition.block_type
            )));
        }

        if let BlockType::Unknown(name) = &definition.block_type {
            if name.trim().is_empty() {
                return Err(RegistryError::ValidationError(
                    "Block type name cannot be empty".into(),
                ));
            }
        }

        let mut seen = HashSet::new();
        for parameter in &definition.schema {
            if !seen.insert(parameter.id.as_str()) {
                return Err(RegistryError::ValidationError(format!(
                    "Duplicate parameter '{}' in {}",
                    parameter.id, definition.label
                )));
            }
            let check = parameter.validate(&parameter.default_value);
            if check.has_errors() {
                return Err(RegistryError::ValidationError(check.errors.join("; ")));
            }
        }

        Ok(())
    }
}

impl Default for BlockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    /// No definition for the given type
    #[error("Block type not found: {0}")]
    DefinitionNotFound(String),

    /// Attempted to register a type twice
    #[error("Duplicate block type: {0}")]
    DuplicateDefinition(String),

    /// Definition validation failed
    #[error("Validation error: {0}")]
    ValidationError(String),
}
