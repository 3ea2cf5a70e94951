//! Page builder state container
//!
//! [`PageBuilder`] owns the block tree of one page together with selection,
//! view settings, undo history and persistence. Every tree mutation goes
//! through [`PageBuilder::commit`], which records history, so the views
//! (canvas, panel, toolbar) only ever read from it.

use serde::Serialize;
use std::sync::Arc;

use super::canvas::{placement_for_target, Canvas, DragSession, Viewport};
use super::history::History;
use super::notify::NotificationBus;
use super::panel::{PanelView, PropPath, PropertyPanel};
use super::store::{PageStore, StoreError};
use super::timer::Timer;
use super::toolbar::{ToolbarAction, ToolbarState};
use super::validation::{TreeValidationResult, TreeValidator};
use crate::config::EditorConfig;
use crate::core::block::BlockError;
use crate::core::parameter::PropValue;
use crate::core::registry::{BlockCatalog, RegistryError};
use crate::core::style::StyleValue;
use crate::core::tree::{Placement, TreeError};
use crate::core::{Block, BlockId, BlockTree, Breakpoint};
use crate::render::{EditorView, Node, SortableAction};

/// Canvas view settings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSettings {
    pub breakpoint: Breakpoint,
    pub zoom: u32,
    pub show_grid: bool,
    pub show_outlines: bool,
    pub preview: bool,
}

impl ViewSettings {
    fn from_config(config: &EditorConfig) -> Self {
        Self {
            breakpoint: config.default_breakpoint,
            zoom: config.default_zoom,
            show_grid: config.show_grid,
            show_outlines: config.show_outlines,
            preview: false,
        }
    }
}

pub struct PageBuilder {
    page_id: Option<String>,
    tree: BlockTree,
    catalog: BlockCatalog,
    config: EditorConfig,
    store: Arc<dyn PageStore>,
    notifications: NotificationBus,
    history: History,
    saved_revision: u64,
    published_version: Option<u64>,
    selected: Option<BlockId>,
    hovered: Option<BlockId>,
    view: ViewSettings,
    drag: DragSession,
    loading: bool,
}

impl PageBuilder {
    pub fn new(catalog: BlockCatalog, config: EditorConfig, store: Arc<dyn PageStore>) -> Self {
        let history = History::new(config.history_limit);
        Self {
            page_id: None,
            tree: BlockTree::new(),
            catalog,
            view: ViewSettings::from_config(&config),
            config,
            store,
            notifications: NotificationBus::new(),
            saved_revision: history.revision(),
            history,
            published_version: None,
            selected: None,
            hovered: None,
            drag: DragSession::default(),
            loading: false,
        }
    }

    /// Publish notifications on a shared bus instead of a private one.
    pub fn with_notifications(mut self, notifications: NotificationBus) -> Self {
        self.notifications = notifications;
        self
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn tree(&self) -> &BlockTree {
        &self.tree
    }

    pub fn blocks(&self) -> Vec<Block> {
        self.tree.to_vec()
    }

    pub fn catalog(&self) -> &BlockCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn notifications(&self) -> &NotificationBus {
        &self.notifications
    }

    pub fn page_id(&self) -> Option<&str> {
        self.page_id.as_deref()
    }

    pub fn view(&self) -> &ViewSettings {
        &self.view
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(&self.config, self.view.breakpoint, self.view.zoom, self.view.show_grid)
    }

    pub fn editor_view(&self) -> EditorView {
        EditorView {
            selected: self.selected.clone(),
            hovered: self.hovered.clone(),
            show_outlines: self.view.show_outlines,
        }
    }

    pub fn drag_session(&self) -> &DragSession {
        &self.drag
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn selected(&self) -> Option<&BlockId> {
        self.selected.as_ref()
    }

    pub fn selected_block(&self) -> Option<&Block> {
        self.selected.as_ref().and_then(|id| self.tree.get(id))
    }

    pub fn hovered(&self) -> Option<&BlockId> {
        self.hovered.as_ref()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.history.revision() != self.saved_revision
    }

    pub fn published_version(&self) -> Option<u64> {
        self.published_version
    }

    // ── Views ───────────────────────────────────────────────────────────

    pub fn render(&self) -> Node {
        Canvas::render(self)
    }

    pub fn toolbar(&self) -> ToolbarState {
        ToolbarState::from_editor(self)
    }

    /// Property panel for the selected block
    pub fn panel(&self) -> Option<PanelView> {
        self.selected_block()
            .map(|block| PropertyPanel::build(&self.catalog, block, self.view.breakpoint))
    }

    pub fn validate(&self) -> TreeValidationResult {
        TreeValidator::validate(&self.tree, &self.catalog)
    }

    // ── Loading and persistence ─────────────────────────────────────────

    /// Enter the loading state; the canvas shows a spinner until
    /// [`PageBuilder::finish_load`].
    pub fn begin_load(&mut self, page_id: &str) {
        self.loading = true;
        self.page_id = Some(page_id.to_string());
        self.drag.cancel();
    }

    /// Install fetched blocks as the page. Positions are repaired and the
    /// history starts over; structural problems are reported, not fatal.
    pub fn finish_load(&mut self, blocks: Vec<Block>) -> Result<TreeValidationResult, EditorError> {
        self.loading = false;
        let mut tree = BlockTree::from_blocks(blocks)?;
        if tree.normalize() {
            tracing::warn!(page = ?self.page_id, "repaired sibling positions on load");
        }
        let lifted = tree.lift_from_leaves();
        if !lifted.is_empty() {
            tracing::warn!(page = ?self.page_id, blocks = lifted.len(), "moved blocks out of non-container parents");
        }

        let report = TreeValidator::validate(&tree, &self.catalog);
        for issue in report.errors.iter().chain(report.warnings.iter()) {
            tracing::warn!(block = ?issue.block_id, "{}", issue.message);
        }

        self.tree = tree;
        self.saved_revision = self.history.reset();
        self.selected = None;
        self.hovered = None;
        tracing::info!(page = ?self.page_id, blocks = self.tree.len(), "page loaded");
        Ok(report)
    }

    pub async fn load(&mut self, page_id: &str) -> Result<TreeValidationResult, EditorError> {
        self.begin_load(page_id);
        let store = Arc::clone(&self.store);
        let timer = Timer::now();
        let blocks = match store.load_blocks(page_id).await {
            Ok(blocks) => blocks,
            Err(e) => {
                self.loading = false;
                tracing::error!(page = page_id, error = %e, "failed to load page");
                self.notifications.error(format!("Could not load page: {}", e));
                return Err(e.into());
            }
        };
        tracing::debug!(page = page_id, elapsed_ms = timer.elapsed_ms(), "fetched blocks");
        self.finish_load(blocks)
    }

    /// Mark the current state as persisted, for callers that saved the
    /// blocks themselves.
    pub fn mark_saved(&mut self) {
        self.saved_revision = self.history.revision();
    }

    /// Save the draft. Returns false without touching the store when there
    /// is nothing to save.
    pub async fn save(&mut self) -> Result<bool, EditorError> {
        if !self.has_unsaved_changes() {
            return Ok(false);
        }
        let page_id = self.page_id.clone().ok_or(EditorError::NoPage)?;
        let revision = self.history.revision();
        let blocks = self.tree.to_vec();
        let timer = Timer::now();

        match self.store.save_blocks(&page_id, &blocks).await {
            Ok(()) => {
                self.saved_revision = revision;
                tracing::info!(page = %page_id, blocks = blocks.len(), elapsed_ms = timer.elapsed_ms(), "page saved");
                self.notifications.success("Page saved");
                Ok(true)
            }
            Err(e) => {
                tracing::error!(page = %page_id, error = %e, "failed to save page");
                self.notifications.error(format!("Could not save page: {}", e));
                Err(e.into())
            }
        }
    }

    /// Save pending changes, then publish. Returns the published version.
    pub async fn publish(&mut self) -> Result<u64, EditorError> {
        let page_id = self.page_id.clone().ok_or(EditorError::NoPage)?;
        self.save().await?;

        let blocks = self.tree.to_vec();
        match self.store.publish(&page_id, &blocks).await {
            Ok(version) => {
                self.published_version = Some(version);
                tracing::info!(page = %page_id, version, "page published");
                self.notifications.success(format!("Published version {}", version));
                Ok(version)
            }
            Err(e) => {
                tracing::error!(page = %page_id, error = %e, "failed to publish page");
                self.notifications.error(format!("Could not publish page: {}", e));
                Err(e.into())
            }
        }
    }

    // ── Commit path ─────────────────────────────────────────────────────

    /// Apply `edit` to the tree. A successful edit that changed anything is
    /// recorded in history; a failed edit leaves the tree untouched.
    fn commit<T>(
        &mut self,
        action: &str,
        edit: impl FnOnce(&mut BlockTree) -> Result<T, EditorError>,
    ) -> Result<T, EditorError> {
        let before = self.tree.clone();
        match edit(&mut self.tree) {
            Ok(value) => {
                if self.tree != before {
                    let revision = self.history.record(before);
                    tracing::debug!(action, revision, "committed edit");
                }
                Ok(value)
            }
            Err(e) => {
                self.tree = before;
                tracing::warn!(action, error = %e, "edit rejected");
                Err(e)
            }
        }
    }

    fn forget_missing(&mut self) {
        if self.selected.as_ref().map_or(false, |id| !self.tree.contains(id)) {
            self.selected = None;
        }
        if self.hovered.as_ref().map_or(false, |id| !self.tree.contains(id)) {
            self.hovered = None;
        }
    }

    // ── Selection ───────────────────────────────────────────────────────

    pub fn select(&mut self, id: &BlockId) -> Result<(), EditorError> {
        if !self.tree.contains(id) {
            return Err(TreeError::BlockNotFound(id.clone()).into());
        }
        self.selected = Some(id.clone());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn hover(&mut self, id: Option<&BlockId>) {
        self.hovered = id.filter(|id| self.tree.contains(id)).cloned();
    }

    /// Click on the canvas outside any block
    pub fn background_click(&mut self) {
        self.clear_selection();
    }

    // ── View settings ───────────────────────────────────────────────────

    pub fn set_breakpoint(&mut self, breakpoint: Breakpoint) {
        self.view.breakpoint = breakpoint;
    }

    pub fn set_zoom(&mut self, zoom: u32) -> Result<(), EditorError> {
        if !self.config.is_zoom_level(zoom) {
            return Err(EditorError::InvalidZoom(zoom));
        }
        self.view.zoom = zoom;
        Ok(())
    }

    pub fn toggle_grid(&mut self) -> bool {
        self.view.show_grid = !self.view.show_grid;
        self.view.show_grid
    }

    pub fn toggle_outlines(&mut self) -> bool {
        self.view.show_outlines = !self.view.show_outlines;
        self.view.show_outlines
    }

    pub fn toggle_preview(&mut self) -> bool {
        self.view.preview = !self.view.preview;
        if self.view.preview {
            self.hovered = None;
            self.drag.cancel();
        }
        self.view.preview
    }

    // ── Block actions ───────────────────────────────────────────────────

    /// Create a block from the library. Without a placement it goes to the
    /// end of the selected container, or the end of the page.
    pub fn add_block(&mut self, block_type: &str, placement: Option<Placement>) -> Result<BlockId, EditorError> {
        let block = self.catalog.instantiate(block_type)?;
        let placement = placement.unwrap_or_else(|| match self.selected_block() {
            Some(selected) if selected.is_container() => {
                Placement::inside(selected.id.clone(), self.tree.child_count(Some(&selected.id)))
            }
            _ => Placement::root(self.tree.child_count(None)),
        });
        let id = self.commit("add block", |tree| Ok(tree.insert(block, placement)?))?;
        self.selected = Some(id.clone());
        Ok(id)
    }

    /// Create a block from a library item released over `target`, using the
    /// same placement rule as moving blocks. No target means the page end.
    pub fn drop_new_block(&mut self, block_type: &str, target: Option<&BlockId>) -> Result<BlockId, EditorError> {
        let placement = target
            .and_then(|target| placement_for_target(&self.tree, target, None))
            .unwrap_or_else(|| Placement::root(self.tree.child_count(None)));
        self.add_block(block_type, Some(placement))
    }

    pub fn move_block(&mut self, id: &BlockId, placement: Placement) -> Result<(), EditorError> {
        self.commit("move block", |tree| Ok(tree.move_to(id, placement)?))
    }

    pub fn duplicate_block(&mut self, id: &BlockId) -> Result<BlockId, EditorError> {
        let copy = self.commit("duplicate block", |tree| Ok(tree.duplicate(id)?))?;
        self.selected = Some(copy.clone());
        Ok(copy)
    }

    pub fn delete_block(&mut self, id: &BlockId) -> Result<usize, EditorError> {
        let removed = self.commit("delete block", |tree| Ok(tree.remove(id)?))?;
        self.forget_missing();
        Ok(removed.len())
    }

    pub fn toggle_hidden(&mut self, id: &BlockId) -> Result<bool, EditorError> {
        self.commit("toggle visibility", |tree| {
            let hidden = !tree.get(id).ok_or_else(|| TreeError::BlockNotFound(id.clone()))?.is_hidden;
            tree.set_hidden(id, hidden)?;
            Ok(hidden)
        })
    }

    pub fn toggle_locked(&mut self, id: &BlockId) -> Result<bool, EditorError> {
        self.commit("toggle lock", |tree| {
            let locked = !tree.get(id).ok_or_else(|| TreeError::BlockNotFound(id.clone()))?.is_locked;
            tree.set_locked(id, locked)?;
            Ok(locked)
        })
    }

    pub fn rename_block(&mut self, id: &BlockId, name: &str) -> Result<(), EditorError> {
        self.commit("rename block", |tree| Ok(tree.rename(id, name)?))
    }

    /// Dispatch an action-bar button
    pub fn apply_block_action(&mut self, id: &BlockId, action: SortableAction) -> Result<(), EditorError> {
        match action {
            SortableAction::Drag => {
                self.drag_start(id)?;
            }
            SortableAction::Duplicate => {
                self.duplicate_block(id)?;
            }
            SortableAction::ToggleVisibility => {
                self.toggle_hidden(id)?;
            }
            SortableAction::ToggleLock => {
                self.toggle_locked(id)?;
            }
            SortableAction::Delete => {
                self.delete_block(id)?;
            }
        }
        Ok(())
    }

    // ── Drag and drop ───────────────────────────────────────────────────

    /// Begin dragging `id`; the dragged block becomes the selection.
    pub fn drag_start(&mut self, id: &BlockId) -> Result<(), EditorError> {
        self.select(id)?;
        self.drag.start(id.clone());
        tracing::debug!(block = %id, "drag start");
        Ok(())
    }

    pub fn drag_over(&mut self, target: Option<&BlockId>) {
        self.drag.over(target.cloned());
    }

    /// Release the dragged block over `target`. Returns whether the tree
    /// changed.
    pub fn drag_end(&mut self, target: Option<&BlockId>) -> Result<bool, EditorError> {
        let Some((id, placement)) = self.drag.end(&self.tree, target) else {
            tracing::debug!(target = ?target, "drop ignored");
            return Ok(false);
        };
        let before = self.history.revision();
        self.move_block(&id, placement)?;
        Ok(self.history.revision() != before)
    }

    pub fn drag_cancel(&mut self) {
        self.drag.cancel();
    }

    // ── Props and styles ────────────────────────────────────────────────

    pub fn set_prop(&mut self, id: &BlockId, path: &PropPath, value: PropValue) -> Result<(), EditorError> {
        self.commit("edit prop", |tree| {
            path.set(tree.props_mut(id)?, value)?;
            Ok(())
        })
    }

    /// Append a default item to the array prop at `path`. Returns its index.
    pub fn add_prop_item(&mut self, id: &BlockId, path: &PropPath) -> Result<usize, EditorError> {
        let item = self.item_default(id, path);
        self.commit("add item", |tree| Ok(path.push_item(tree.props_mut(id)?, item)?))
    }

    pub fn remove_prop_item(&mut self, id: &BlockId, path: &PropPath, index: usize) -> Result<(), EditorError> {
        self.commit("remove item", |tree| {
            path.remove_item(tree.props_mut(id)?, index)?;
            Ok(())
        })
    }

    /// Default element for a top-level array prop, from the block's schema
    fn item_default(&self, id: &BlockId, path: &PropPath) -> PropValue {
        let Some(block) = self.tree.get(id) else {
            return PropValue::Null;
        };
        let key = path.to_string();
        self.catalog
            .get(block.block_type.as_str())
            .ok()
            .and_then(|def| def.parameter(&key).map(|p| p.item_default()))
            .unwrap_or(PropValue::Null)
    }

    /// Set (or with `None`, clear) a style override at the current breakpoint.
    pub fn set_style(&mut self, id: &BlockId, key: &str, value: Option<StyleValue>) -> Result<(), EditorError> {
        let breakpoint = self.view.breakpoint;
        self.commit("edit style", |tree| Ok(tree.set_style(id, breakpoint, key, value)?))
    }

    // ── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        match self.history.undo(&self.tree) {
            Some(tree) => {
                self.tree = tree;
                self.forget_missing();
                tracing::debug!(revision = self.history.revision(), "undo");
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(&self.tree) {
            Some(tree) => {
                self.tree = tree;
                self.forget_missing();
                tracing::debug!(revision = self.history.revision(), "redo");
                true
            }
            None => false,
        }
    }

    // ── Toolbar ─────────────────────────────────────────────────────────

    pub async fn apply(&mut self, action: ToolbarAction) -> Result<(), EditorError> {
        match action {
            ToolbarAction::Undo => {
                self.undo();
            }
            ToolbarAction::Redo => {
                self.redo();
            }
            ToolbarAction::SetBreakpoint { breakpoint } => self.set_breakpoint(breakpoint),
            ToolbarAction::SetZoom { zoom } => self.set_zoom(zoom)?,
            ToolbarAction::ToggleGrid => {
                self.toggle_grid();
            }
            ToolbarAction::ToggleOutlines => {
                self.toggle_outlines();
            }
            ToolbarAction::TogglePreview => {
                self.toggle_preview();
            }
            ToolbarAction::Save => {
                self.save().await?;
            }
            ToolbarAction::Publish => {
                self.publish().await?;
            }
        }
        Ok(())
    }
}

/// Editor errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Block(String),

    #[error("No page is loaded")]
    NoPage,

    #[error("Zoom level {0}% is not available")]
    InvalidZoom(u32),
}

impl From<BlockError> for EditorError {
    fn from(err: BlockError) -> Self {
        EditorError::Block(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::store::MemoryPageStore;

    fn editor() -> PageBuilder {
        PageBuilder::new(
            BlockCatalog::standard(),
            EditorConfig::default(),
            Arc::new(MemoryPageStore::new()),
        )
    }

    #[test]
    fn test_add_block_selects_and_records_history() {
        let mut editor = editor();
        let section = editor.add_block("section", None).unwrap();
        assert_eq!(editor.selected(), Some(&section));
        assert!(editor.can_undo());

        // With a container selected, new blocks go inside it.
        let heading = editor.add_block("heading", None).unwrap();
        assert_eq!(editor.tree().get(&heading).unwrap().parent_id, Some(section));
    }

    #[test]
    fn test_unknown_library_type_is_rejected() {
        let mut editor = editor();
        assert!(matches!(
            editor.add_block("carousel", None),
            Err(EditorError::Registry(RegistryError::DefinitionNotFound(_)))
        ));
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_failed_edit_leaves_tree_unchanged() {
        let mut editor = editor();
        let text = editor.add_block("text", None).unwrap();
        let before = editor.tree().clone();
        let err = editor.move_block(&text, Placement::inside(text.clone(), 0));
        assert!(err.is_err());
        assert_eq!(editor.tree(), &before);
    }

    #[test]
    fn test_undo_redo_and_selection() {
        let mut editor = editor();
        let text = editor.add_block("text", None).unwrap();
        assert!(editor.undo());
        assert!(editor.tree().is_empty());
        assert_eq!(editor.selected(), None);
        assert!(editor.redo());
        assert!(editor.tree().contains(&text));
        assert!(!editor.redo());
    }

    #[test]
    fn test_zoom_must_be_configured_level() {
        let mut editor = editor();
        assert!(editor.set_zoom(75).is_ok());
        assert_eq!(editor.set_zoom(80), Err(EditorError::InvalidZoom(80)));
        assert_eq!(editor.view().zoom, 75);
    }

    #[test]
    fn test_style_edit_targets_current_breakpoint() {
        let mut editor = editor();
        let text = editor.add_block("text", None).unwrap();
        editor.set_breakpoint(Breakpoint::Tablet);
        editor.set_style(&text, "color", Some("red".into())).unwrap();
        let block = editor.tree().get(&text).unwrap();
        assert!(block.styles.at(Breakpoint::Desktop).is_none());
        assert_eq!(
            block.styles.at(Breakpoint::Tablet).and_then(|s| s.get("color")),
            Some(&"red".into())
        );
    }

    #[test]
    fn test_prop_item_uses_schema_default() {
        let mut editor = editor();
        let accordion = editor.add_block("accordion", None).unwrap();
        let items = PropPath::key("items");
        let index = editor.add_prop_item(&accordion, &items).unwrap();
        assert_eq!(index, 1);
        let title: PropPath = "items.1.title".parse().unwrap();
        assert_eq!(
            title.get(&editor.tree().get(&accordion).unwrap().props),
            Some(&PropValue::from("Accordion item"))
        );
    }
}
