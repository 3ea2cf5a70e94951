//! Tree validation
//!
//! Checks a block tree against its structural invariants and the catalog:
//! orphaned blocks, parent cycles and non-contiguous sibling positions are
//! errors; children under non-container blocks, unknown block types and props
//! that fail their schema are warnings. Loading keeps going on warnings.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::core::registry::BlockCatalog;
use crate::core::{BlockId, BlockTree};

// ── Result types ────────────────────────────────────────────────────────────

/// One finding, with the block it concerns and a suggested fix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub block_id: Option<BlockId>,
    pub message: String,
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TreeValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl TreeValidationResult {
    fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn add_error(&mut self, block_id: Option<&BlockId>, message: impl Into<String>, suggestion: Option<&str>) {
        self.valid = false;
        self.errors.push(ValidationIssue {
            block_id: block_id.cloned(),
            message: message.into(),
            suggestion: suggestion.map(str::to_string),
        });
    }

    fn add_warning(&mut self, block_id: Option<&BlockId>, message: impl Into<String>, suggestion: Option<&str>) {
        self.warnings.push(ValidationIssue {
            block_id: block_id.cloned(),
            message: message.into(),
            suggestion: suggestion.map(str::to_string),
        });
    }

    fn merge(&mut self, other: TreeValidationResult) {
        if !other.valid {
            self.valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Issues (errors first) concerning one block
    pub fn for_block(&self, id: &BlockId) -> Vec<&ValidationIssue> {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .filter(|issue| issue.block_id.as_ref() == Some(id))
            .collect()
    }
}

// ── Validator ───────────────────────────────────────────────────────────────

pub struct TreeValidator;

impl TreeValidator {
    /// Run every check against `tree`.
    pub fn validate(tree: &BlockTree, catalog: &BlockCatalog) -> TreeValidationResult {
        let mut result = TreeValidationResult::ok();

        result.merge(Self::check_orphans(tree));
        result.merge(Self::check_cycles(tree));
        result.merge(Self::check_positions(tree));
        result.merge(Self::check_container_children(tree));
        result.merge(Self::check_block_types(tree, catalog));
        result.merge(Self::check_props(tree, catalog));

        if !result.valid {
            tracing::debug!(errors = result.errors.len(), "tree failed validation");
        }
        result
    }

    // ── Individual checks ───────────────────────────────────────────────

    /// Every parent reference must point at a block in the tree.
    fn check_orphans(tree: &BlockTree) -> TreeValidationResult {
        let mut result = TreeValidationResult::ok();
        for block in tree.iter() {
            if let Some(parent) = &block.parent_id {
                if !tree.contains(parent) {
                    result.add_error(
                        Some(&block.id),
                        format!("Block '{}' references missing parent '{}'", block.id, parent),
                        Some("Move the block to the page root or delete it"),
                    );
                }
            }
        }
        result
    }

    /// Following parent links must always end at the root.
    fn check_cycles(tree: &BlockTree) -> TreeValidationResult {
        let mut result = TreeValidationResult::ok();
        for block in tree.iter() {
            let mut seen = HashSet::new();
            let mut current = block.parent_id.as_ref();
            while let Some(parent) = current {
                if parent == &block.id {
                    result.add_error(
                        Some(&block.id),
                        format!("Block '{}' is its own ancestor", block.id),
                        Some("Move one block of the cycle to the page root"),
                    );
                    break;
                }
                if !seen.insert(parent.clone()) {
                    // Cycle further up; reported for the blocks on it.
                    break;
                }
                current = tree.get(parent).and_then(|b| b.parent_id.as_ref());
            }
        }
        result
    }

    /// Siblings must occupy positions 0..n exactly once.
    fn check_positions(tree: &BlockTree) -> TreeValidationResult {
        let mut result = TreeValidationResult::ok();
        let mut groups: BTreeMap<Option<&BlockId>, Vec<usize>> = BTreeMap::new();
        for block in tree.iter() {
            groups
                .entry(block.parent_id.as_ref())
                .or_default()
                .push(block.position);
        }
        for (parent, mut positions) in groups {
            positions.sort_unstable();
            let contiguous = positions.iter().enumerate().all(|(i, p)| i == *p);
            if !contiguous {
                let label = parent.map(|p| format!("'{}'", p)).unwrap_or_else(|| "page root".into());
                result.add_error(
                    parent,
                    format!("Children of {} have positions {:?}", label, positions),
                    Some("Normalize positions to 0..n"),
                );
            }
        }
        result
    }

    fn check_container_children(tree: &BlockTree) -> TreeValidationResult {
        let mut result = TreeValidationResult::ok();
        for block in tree.iter() {
            if let Some(parent) = block.parent_id.as_ref().and_then(|p| tree.get(p)) {
                if !parent.is_container() {
                    result.add_warning(
                        Some(&block.id),
                        format!(
                            "Block '{}' is nested in {} block '{}', which does not render children",
                            block.id, parent.block_type, parent.id
                        ),
                        Some("Move the block into a container, section, columns or grid block"),
                    );
                }
            }
        }
        result
    }

    fn check_block_types(tree: &BlockTree, catalog: &BlockCatalog) -> TreeValidationResult {
        let mut result = TreeValidationResult::ok();
        for block in tree.iter() {
            if !catalog.contains(block.block_type.as_str()) {
                result.add_warning(
                    Some(&block.id),
                    format!("Unknown block type '{}'", block.block_type),
                    Some("Delete the block or register a definition for its type"),
                );
            }
        }
        result
    }

    fn check_props(tree: &BlockTree, catalog: &BlockCatalog) -> TreeValidationResult {
        let mut result = TreeValidationResult::ok();
        for block in tree.iter() {
            if !catalog.contains(block.block_type.as_str()) {
                continue;
            }
            let check = catalog.validate_props(block);
            for message in check.errors {
                result.add_warning(Some(&block.id), message, Some("Edit the value in the property panel"));
            }
        }
        result
    }
}
