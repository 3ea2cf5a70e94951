//! Page block tree
//!
//! A page owns a flat set of blocks linked by `parent_id`. The tree keeps the
//! sibling invariant: within each parent, positions are exactly `0..n`. Every
//! structural operation (insert, remove, move, duplicate) renumbers the
//! sibling groups it touches before returning.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use super::block::{Block, Props};
use super::breakpoint::Breakpoint;
use super::parameter::PropValue;
use super::style::{BlockStyles, StyleValue};
use super::BlockId;

/// Where a block sits: its parent (or the page root) and sibling ordinal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub parent_id: Option<BlockId>,
    pub position: usize,
}

impl Placement {
    pub fn root(position: usize) -> Self {
        Self {
            parent_id: None,
            position,
        }
    }

    pub fn inside(parent_id: BlockId, position: usize) -> Self {
        Self {
            parent_id: Some(parent_id),
            position,
        }
    }
}

/// Tree errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeError {
    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("Duplicate block ID: {0}")]
    DuplicateBlock(BlockId),

    #[error("Parent block not found: {0}")]
    ParentNotFound(BlockId),

    #[error("Block {0} cannot contain children")]
    NotAContainer(BlockId),

    #[error("Moving {block} into {target} would create a cycle")]
    Cycle { block: BlockId, target: BlockId },
}

/// All blocks of one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockTree {
    blocks: BTreeMap<BlockId, Block>,
}

impl BlockTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from stored rows. Positions are taken as-is; call
    /// [`BlockTree::normalize`] to repair gaps.
    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self, TreeError> {
        let mut map = BTreeMap::new();
        for block in blocks {
            if map.contains_key(&block.id) {
                return Err(TreeError::DuplicateBlock(block.id));
            }
            map.insert(block.id.clone(), block);
        }
        Ok(Self { blocks: map })
    }

    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.get(id)
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.blocks.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks in id order
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    /// Children of `parent` (`None` = page root), ordered by position.
    pub fn children_of(&self, parent: Option<&BlockId>) -> Vec<&Block> {
        let mut children: Vec<&Block> = self
            .blocks
            .values()
            .filter(|b| b.parent_id.as_ref() == parent)
            .collect();
        children.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.id.cmp(&b.id)));
        children
    }

    pub fn child_count(&self, parent: Option<&BlockId>) -> usize {
        self.blocks
            .values()
            .filter(|b| b.parent_id.as_ref() == parent)
            .count()
    }

    pub fn roots(&self) -> Vec<&Block> {
        self.children_of(None)
    }

    /// Every block below `id`, depth-first in document order.
    pub fn descendants(&self, id: &BlockId) -> Vec<BlockId> {
        let mut out = Vec::new();
        let mut visited = HashSet::new();
        visited.insert(id.clone());
        self.collect_descendants(id, &mut visited, &mut out);
        out
    }

    fn collect_descendants(&self, id: &BlockId, visited: &mut HashSet<BlockId>, out: &mut Vec<BlockId>) {
        for child in self.children_of(Some(id)) {
            if visited.insert(child.id.clone()) {
                out.push(child.id.clone());
                self.collect_descendants(&child.id, visited, out);
            }
        }
    }

    /// Whether `candidate` lies strictly inside the subtree of `ancestor`.
    pub fn is_descendant(&self, ancestor: &BlockId, candidate: &BlockId) -> bool {
        let mut current = self.blocks.get(candidate).and_then(|b| b.parent_id.as_ref());
        let mut steps = 0;
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.blocks.len() {
                // Broken parent chain; treat as unrelated.
                return false;
            }
            current = self.blocks.get(parent).and_then(|b| b.parent_id.as_ref());
        }
        false
    }

    /// Blocks in document order (depth-first from the roots). Blocks not
    /// reachable from the root are appended at the end.
    pub fn to_vec(&self) -> Vec<Block> {
        let mut out = Vec::with_capacity(self.blocks.len());
        let mut seen = HashSet::new();
        for root in self.roots() {
            seen.insert(root.id.clone());
            out.push(root.clone());
            for id in self.descendants(&root.id) {
                if seen.insert(id.clone()) {
                    if let Some(block) = self.blocks.get(&id) {
                        out.push(block.clone());
                    }
                }
            }
        }
        for block in self.blocks.values() {
            if !seen.contains(&block.id) {
                out.push(block.clone());
            }
        }
        out
    }

    fn sibling_ids(&self, parent: Option<&BlockId>) -> Vec<BlockId> {
        self.children_of(parent).iter().map(|b| b.id.clone()).collect()
    }

    fn assign_positions(&mut self, parent: Option<&BlockId>, ids: &[BlockId]) {
        for (position, id) in ids.iter().enumerate() {
            if let Some(block) = self.blocks.get_mut(id) {
                block.parent_id = parent.cloned();
                block.position = position;
            }
        }
    }

    fn renumber(&mut self, parent: Option<&BlockId>) {
        let ids = self.sibling_ids(parent);
        self.assign_positions(parent, &ids);
    }

    fn check_parent(&self, parent: Option<&BlockId>) -> Result<(), TreeError> {
        if let Some(parent_id) = parent {
            let parent_block = self
                .blocks
                .get(parent_id)
                .ok_or_else(|| TreeError::ParentNotFound(parent_id.clone()))?;
            if !parent_block.is_container() {
                return Err(TreeError::NotAContainer(parent_id.clone()));
            }
        }
        Ok(())
    }

    /// Insert a new block at `placement`. The position is clamped to the
    /// current sibling count; later siblings shift down by one.
    pub fn insert(&mut self, block: Block, placement: Placement) -> Result<BlockId, TreeError> {
        if self.blocks.contains_key(&block.id) {
            return Err(TreeError::DuplicateBlock(block.id));
        }
        let parent = placement.parent_id.as_ref();
        self.check_parent(parent)?;

        let id = block.id.clone();
        let mut ids = self.sibling_ids(parent);
        let index = placement.position.min(ids.len());
        ids.insert(index, id.clone());
        self.blocks.insert(id.clone(), block);
        self.assign_positions(parent, &ids);
        Ok(id)
    }

    /// Remove a block together with its whole subtree. Returns the removed
    /// blocks, the requested block first.
    pub fn remove(&mut self, id: &BlockId) -> Result<Vec<Block>, TreeError> {
        let parent = self
            .blocks
            .get(id)
            .ok_or_else(|| TreeError::BlockNotFound(id.clone()))?
            .parent_id
            .clone();

        let mut doomed = vec![id.clone()];
        doomed.extend(self.descendants(id));
        let removed: Vec<Block> = doomed
            .iter()
            .filter_map(|victim| self.blocks.remove(victim))
            .collect();

        self.renumber(parent.as_ref());
        tracing::debug!(block = %id, count = removed.len(), "removed block subtree");
        Ok(removed)
    }

    /// Move a block (and its subtree) to `placement`.
    pub fn move_to(&mut self, id: &BlockId, placement: Placement) -> Result<(), TreeError> {
        let old_parent = self
            .blocks
            .get(id)
            .ok_or_else(|| TreeError::BlockNotFound(id.clone()))?
            .parent_id
            .clone();

        let new_parent = placement.parent_id.as_ref();
        if let Some(target) = new_parent {
            if target == id || self.is_descendant(id, target) {
                return Err(TreeError::Cycle {
                    block: id.clone(),
                    target: target.clone(),
                });
            }
        }
        self.check_parent(new_parent)?;

        let old_ids: Vec<BlockId> = self
            .sibling_ids(old_parent.as_ref())
            .into_iter()
            .filter(|sibling| sibling != id)
            .collect();
        self.assign_positions(old_parent.as_ref(), &old_ids);

        let mut new_ids: Vec<BlockId> = self
            .sibling_ids(new_parent)
            .into_iter()
            .filter(|sibling| sibling != id)
            .collect();
        let index = placement.position.min(new_ids.len());
        new_ids.insert(index, id.clone());
        self.assign_positions(new_parent, &new_ids);

        tracing::debug!(
            block = %id,
            parent = ?new_parent.map(|p| p.as_str()),
            position = index,
            "moved block"
        );
        Ok(())
    }

    /// Deep-copy a block and its subtree with fresh ids; the copy lands
    /// directly after the original.
    pub fn duplicate(&mut self, id: &BlockId) -> Result<BlockId, TreeError> {
        let source = self
            .blocks
            .get(id)
            .ok_or_else(|| TreeError::BlockNotFound(id.clone()))?
            .clone();

        let mut subtree = vec![id.clone()];
        subtree.extend(self.descendants(id));
        let fresh: HashMap<BlockId, BlockId> = subtree
            .iter()
            .map(|old| (old.clone(), BlockId::new()))
            .collect();

        let copy_id = fresh[id].clone();
        let mut root_copy = source.clone();
        root_copy.id = copy_id.clone();
        if !root_copy.name.is_empty() {
            root_copy.name = format!("{} (copy)", source.name);
        }
        self.insert(
            root_copy,
            Placement {
                parent_id: source.parent_id.clone(),
                position: source.position + 1,
            },
        )?;

        for old in subtree.iter().skip(1) {
            let Some(original) = self.blocks.get(old).cloned() else {
                continue;
            };
            let mut copy = original.clone();
            copy.id = fresh[old].clone();
            copy.parent_id = original
                .parent_id
                .as_ref()
                .and_then(|p| fresh.get(p))
                .cloned();
            self.blocks.insert(copy.id.clone(), copy);
        }

        tracing::debug!(source = %id, copy = %copy_id, blocks = subtree.len(), "duplicated block");
        Ok(copy_id)
    }

    fn block_mut(&mut self, id: &BlockId) -> Result<&mut Block, TreeError> {
        self.blocks
            .get_mut(id)
            .ok_or_else(|| TreeError::BlockNotFound(id.clone()))
    }

    /// Mutable access to a block's props
    pub fn props_mut(&mut self, id: &BlockId) -> Result<&mut Props, TreeError> {
        Ok(&mut self.block_mut(id)?.props)
    }

    /// Mutable access to a block's styles
    pub fn styles_mut(&mut self, id: &BlockId) -> Result<&mut BlockStyles, TreeError> {
        Ok(&mut self.block_mut(id)?.styles)
    }

    pub fn set_prop(&mut self, id: &BlockId, key: &str, value: PropValue) -> Result<(), TreeError> {
        self.props_mut(id)?.insert(key.to_string(), value);
        Ok(())
    }

    /// Shallow-merge props into a block
    pub fn update_props(&mut self, id: &BlockId, props: Props) -> Result<(), TreeError> {
        let target = self.props_mut(id)?;
        for (key, value) in props {
            target.insert(key, value);
        }
        Ok(())
    }

    /// Set (or with `None`, clear) one style override at `breakpoint`.
    pub fn set_style(
        &mut self,
        id: &BlockId,
        breakpoint: Breakpoint,
        key: &str,
        value: Option<StyleValue>,
    ) -> Result<(), TreeError> {
        let styles = self.styles_mut(id)?;
        match value {
            Some(value) => styles.set(breakpoint, key, value),
            None => {
                styles.remove(breakpoint, key);
            }
        }
        Ok(())
    }

    pub fn set_hidden(&mut self, id: &BlockId, hidden: bool) -> Result<(), TreeError> {
        self.block_mut(id)?.is_hidden = hidden;
        Ok(())
    }

    pub fn set_locked(&mut self, id: &BlockId, locked: bool) -> Result<(), TreeError> {
        self.block_mut(id)?.is_locked = locked;
        Ok(())
    }

    pub fn rename(&mut self, id: &BlockId, name: &str) -> Result<(), TreeError> {
        self.block_mut(id)?.name = name.to_string();
        Ok(())
    }

    /// Repair sibling positions so every group is `0..n` again, keeping the
    /// current relative order. Returns whether anything changed.
    pub fn normalize(&mut self) -> bool {
        let parents: BTreeSet<Option<BlockId>> =
            self.blocks.values().map(|b| b.parent_id.clone()).collect();
        let before: Vec<usize> = self.blocks.values().map(|b| b.position).collect();
        for parent in &parents {
            self.renumber(parent.as_ref());
        }
        let after: Vec<usize> = self.blocks.values().map(|b| b.position).collect();
        before != after
    }

    /// Move children of non-container blocks out to sit directly after their
    /// leaf parent, in the leaf's own sibling group. Stored rows can carry
    /// such nesting; after this every parent accepts drops and duplicates.
    /// Returns the ids that were moved.
    pub fn lift_from_leaves(&mut self) -> Vec<BlockId> {
        let mut lifted = Vec::new();
        for _ in 0..=self.blocks.len() {
            let mut leaves = BTreeSet::new();
            for block in self.blocks.values() {
                let Some(parent) = block.parent_id.as_ref().and_then(|p| self.blocks.get(p)) else {
                    continue;
                };
                // A child that is also an ancestor of its parent is a cycle; leave it to validation.
                if !parent.is_container() && !self.is_descendant(&block.id, &parent.id) {
                    leaves.insert(parent.id.clone());
                }
            }
            if leaves.is_empty() {
                break;
            }

            for leaf_id in &leaves {
                let children: Vec<BlockId> = self
                    .children_of(Some(leaf_id))
                    .iter()
                    .map(|b| b.id.clone())
                    .filter(|id| !self.is_descendant(id, leaf_id))
                    .collect();
                let Some(grandparent) = self.blocks.get(leaf_id).map(|b| b.parent_id.clone()) else {
                    continue;
                };
                let mut ids = self.sibling_ids(grandparent.as_ref());
                let index = ids.iter().position(|id| id == leaf_id).map_or(ids.len(), |i| i + 1);
                for (offset, child) in children.iter().enumerate() {
                    ids.insert(index + offset, child.clone());
                }
                self.assign_positions(grandparent.as_ref(), &ids);
                self.renumber(Some(leaf_id));
                tracing::debug!(leaf = %leaf_id, moved = children.len(), "lifted children out of leaf block");
                lifted.extend(children);
            }
        }
        lifted.sort();
        lifted.dedup();
        lifted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BlockTree {
        BlockTree::from_blocks(vec![
            Block::new("root", "section"),
            Block::new("h", "heading").with_parent("root", 0),
            Block::new("t", "text").with_parent("root", 1),
            Block::new("inner", "container").with_parent("root", 2),
            Block::new("img", "image").with_parent("inner", 0),
        ])
        .unwrap()
    }

    fn positions(tree: &BlockTree, parent: Option<&str>) -> Vec<(String, usize)> {
        let parent = parent.map(BlockId::from);
        tree.children_of(parent.as_ref())
            .iter()
            .map(|b| (b.id.to_string(), b.position))
            .collect()
    }

    #[test]
    fn test_from_blocks_rejects_duplicates() {
        let result = BlockTree::from_blocks(vec![Block::new("a", "text"), Block::new("a", "text")]);
        assert_eq!(result.unwrap_err(), TreeError::DuplicateBlock("a".into()));
    }

    #[test]
    fn test_insert_shifts_siblings() {
        let mut tree = sample();
        tree.insert(Block::new("new", "button"), Placement::inside("root".into(), 1))
            .unwrap();
        assert_eq!(
            positions(&tree, Some("root")),
            vec![
                ("h".into(), 0),
                ("new".into(), 1),
                ("t".into(), 2),
                ("inner".into(), 3)
            ]
        );
    }

    #[test]
    fn test_insert_clamps_position() {
        let mut tree = sample();
        tree.insert(Block::new("new", "button"), Placement::inside("inner".into(), 99))
            .unwrap();
        assert_eq!(tree.get(&"new".into()).unwrap().position, 1);
    }

    #[test]
    fn test_insert_into_non_container_fails() {
        let mut tree = sample();
        let err = tree
            .insert(Block::new("new", "button"), Placement::inside("h".into(), 0))
            .unwrap_err();
        assert_eq!(err, TreeError::NotAContainer("h".into()));
    }

    #[test]
    fn test_remove_takes_subtree_and_renumbers() {
        let mut tree = sample();
        let removed = tree.remove(&"t".into()).unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(
            positions(&tree, Some("root")),
            vec![("h".into(), 0), ("inner".into(), 1)]
        );

        let removed = tree.remove(&"inner".into()).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(!tree.contains(&"img".into()));
    }

    #[test]
    fn test_move_into_own_subtree_is_rejected() {
        let mut tree = sample();
        let err = tree
            .move_to(&"root".into(), Placement::inside("inner".into(), 0))
            .unwrap_err();
        assert!(matches!(err, TreeError::Cycle { .. }));
    }

    #[test]
    fn test_move_within_parent() {
        let mut tree = sample();
        tree.move_to(&"h".into(), Placement::inside("root".into(), 2))
            .unwrap();
        assert_eq!(
            positions(&tree, Some("root")),
            vec![("t".into(), 0), ("inner".into(), 1), ("h".into(), 2)]
        );
    }

    #[test]
    fn test_duplicate_copies_subtree() {
        let mut tree = sample();
        let copy = tree.duplicate(&"inner".into()).unwrap();
        assert_eq!(tree.len(), 7);
        let copied = tree.get(&copy).unwrap();
        assert_eq!(copied.position, 3);
        let children = tree.children_of(Some(&copy));
        assert_eq!(children.len(), 1);
        assert_ne!(children[0].id, BlockId::from("img"));
        assert_eq!(children[0].block_type, "image".into());
    }

    #[test]
    fn test_normalize_repairs_gaps() {
        let mut tree = BlockTree::from_blocks(vec![
            Block::new("a", "text").at_position(4),
            Block::new("b", "text").at_position(9),
        ])
        .unwrap();
        assert!(tree.normalize());
        assert_eq!(positions(&tree, None), vec![("a".into(), 0), ("b".into(), 1)]);
        assert!(!tree.normalize());
    }

    #[test]
    fn test_lift_from_leaves_keeps_document_order() {
        let mut tree = BlockTree::from_blocks(vec![
            Block::new("root", "section"),
            Block::new("h", "heading").with_parent("root", 0),
            Block::new("t", "text").with_parent("root", 1),
            Block::new("stray-a", "text").with_parent("h", 0),
            Block::new("stray-b", "image").with_parent("h", 1),
            Block::new("deep", "button").with_parent("stray-a", 0),
        ])
        .unwrap();

        let mut lifted: Vec<String> = tree.lift_from_leaves().iter().map(|id| id.to_string()).collect();
        lifted.sort();
        assert_eq!(lifted, vec!["deep", "stray-a", "stray-b"]);
        assert_eq!(
            positions(&tree, Some("root")),
            vec![
                ("h".into(), 0),
                ("stray-a".into(), 1),
                ("deep".into(), 2),
                ("stray-b".into(), 3),
                ("t".into(), 4),
            ]
        );
        assert!(tree.lift_from_leaves().is_empty());
    }

    #[test]
    fn test_lift_from_leaves_ignores_cycles() {
        let mut tree = BlockTree::from_blocks(vec![
            Block::new("a", "text").with_parent("b", 0),
            Block::new("b", "text").with_parent("a", 0),
        ])
        .unwrap();
        assert!(tree.lift_from_leaves().is_empty());
        assert_eq!(tree.get(&BlockId::from("a")).unwrap().parent_id, Some(BlockId::from("b")));
    }

    #[test]
    fn test_to_vec_document_order() {
        let tree = sample();
        let order: Vec<String> = tree.to_vec().iter().map(|b| b.id.to_string()).collect();
        assert_eq!(order, vec!["root", "h", "t", "inner", "img"]);
    }
}
