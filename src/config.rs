//! Editor configuration
//!
//! Loaded from JSON; every field has a default so a partial (or empty)
//! document is valid.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::Breakpoint;

pub const DEFAULT_MOBILE_WIDTH: u32 = 375;
pub const DEFAULT_TABLET_WIDTH: u32 = 768;
pub const DEFAULT_DESKTOP_WIDTH: u32 = 1280;
pub const DEFAULT_WIDE_WIDTH: u32 = 1920;

fn default_breakpoint_widths() -> BTreeMap<Breakpoint, u32> {
    [
        (Breakpoint::Desktop, DEFAULT_DESKTOP_WIDTH),
        (Breakpoint::Tablet, DEFAULT_TABLET_WIDTH),
        (Breakpoint::Mobile, DEFAULT_MOBILE_WIDTH),
        (Breakpoint::Wide, DEFAULT_WIDE_WIDTH),
    ]
    .into_iter()
    .collect()
}

fn default_zoom_levels() -> Vec<u32> {
    vec![50, 75, 100, 125, 150]
}

fn default_zoom() -> u32 {
    100
}

fn default_history_limit() -> usize {
    50
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_grid_size() -> u32 {
    20
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Canvas width per breakpoint, in CSS pixels
    #[serde(default = "default_breakpoint_widths", rename = "breakpointWidths")]
    pub breakpoint_widths: BTreeMap<Breakpoint, u32>,
    /// Zoom percentages offered by the toolbar
    #[serde(default = "default_zoom_levels", rename = "zoomLevels")]
    pub zoom_levels: Vec<u32>,
    #[serde(default = "default_zoom", rename = "defaultZoom")]
    pub default_zoom: u32,
    #[serde(default, rename = "defaultBreakpoint")]
    pub default_breakpoint: Breakpoint,
    /// Undo steps kept
    #[serde(default = "default_history_limit", rename = "historyLimit")]
    pub history_limit: usize,
    #[serde(default = "default_search_debounce_ms", rename = "searchDebounceMs")]
    pub search_debounce_ms: u64,
    #[serde(default, rename = "showOutlines")]
    pub show_outlines: bool,
    #[serde(default, rename = "showGrid")]
    pub show_grid: bool,
    /// Grid overlay cell size, in CSS pixels
    #[serde(default = "default_grid_size", rename = "gridSize")]
    pub grid_size: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            breakpoint_widths: default_breakpoint_widths(),
            zoom_levels: default_zoom_levels(),
            default_zoom: default_zoom(),
            default_breakpoint: Breakpoint::default(),
            history_limit: default_history_limit(),
            search_debounce_ms: default_search_debounce_ms(),
            show_outlines: false,
            show_grid: false,
            grid_size: default_grid_size(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.zoom_levels.is_empty() {
            return Err(ConfigError::Invalid("zoomLevels cannot be empty".into()));
        }
        if self.zoom_levels.contains(&0) {
            return Err(ConfigError::Invalid("zoom levels must be positive".into()));
        }
        if !self.zoom_levels.contains(&self.default_zoom) {
            return Err(ConfigError::Invalid(format!(
                "defaultZoom {} is not one of {:?}",
                self.default_zoom, self.zoom_levels
            )));
        }
        if self.history_limit == 0 {
            return Err(ConfigError::Invalid("historyLimit must be at least 1".into()));
        }
        if let Some((bp, _)) = self.breakpoint_widths.iter().find(|(_, w)| **w == 0) {
            return Err(ConfigError::Invalid(format!("{} width must be positive", bp)));
        }
        Ok(())
    }

    /// Canvas width at `breakpoint`; missing entries use the built-in width.
    pub fn width_of(&self, breakpoint: Breakpoint) -> u32 {
        self.breakpoint_widths
            .get(&breakpoint)
            .copied()
            .unwrap_or(match breakpoint {
                Breakpoint::Desktop => DEFAULT_DESKTOP_WIDTH,
                Breakpoint::Tablet => DEFAULT_TABLET_WIDTH,
                Breakpoint::Mobile => DEFAULT_MOBILE_WIDTH,
                Breakpoint::Wide => DEFAULT_WIDE_WIDTH,
            })
    }

    pub fn is_zoom_level(&self, zoom: u32) -> bool {
        self.zoom_levels.contains(&zoom)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
