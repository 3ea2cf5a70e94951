//! Toolbar state and actions

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use super::editor::PageBuilder;
use crate::core::Breakpoint;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakpointOption {
    pub value: Breakpoint,
    pub label: String,
    pub width: u32,
}

/// Everything the toolbar needs to draw itself
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolbarState {
    pub can_undo: bool,
    pub can_redo: bool,
    /// Save is disabled while there is nothing to save.
    pub can_save: bool,
    pub has_unsaved_changes: bool,
    pub breakpoint: Breakpoint,
    pub breakpoints: Vec<BreakpointOption>,
    pub zoom: u32,
    pub zoom_levels: Vec<u32>,
    pub show_grid: bool,
    pub show_outlines: bool,
    pub preview: bool,
    pub published_version: Option<u64>,
}

impl ToolbarState {
    pub fn from_editor(editor: &PageBuilder) -> Self {
        let config = editor.config();
        let view = editor.view();
        Self {
            can_undo: editor.can_undo(),
            can_redo: editor.can_redo(),
            can_save: editor.has_unsaved_changes() && editor.page_id().is_some(),
            has_unsaved_changes: editor.has_unsaved_changes(),
            breakpoint: view.breakpoint,
            breakpoints: Breakpoint::iter()
                .map(|bp| BreakpointOption {
                    value: bp,
                    label: bp.label().to_string(),
                    width: config.width_of(bp),
                })
                .collect(),
            zoom: view.zoom,
            zoom_levels: config.zoom_levels.clone(),
            show_grid: view.show_grid,
            show_outlines: view.show_outlines,
            preview: view.preview,
            published_version: editor.published_version(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ToolbarAction {
    Undo,
    Redo,
    SetBreakpoint { breakpoint: Breakpoint },
    SetZoom { zoom: u32 },
    ToggleGrid,
    ToggleOutlines,
    TogglePreview,
    Save,
    Publish,
}
