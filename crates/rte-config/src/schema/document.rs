//! Document editing configuration: undo history and the image menu.

use serde::{Deserialize, Serialize};

/// Undo/redo history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of undo snapshots kept (valid range: 1-10000).
    pub max_depth: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_depth: 100 }
    }
}

/// Image context menu.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageMenuConfig {
    pub enabled: bool,
    /// Largest width the menu accepts, in pixels (valid range: 16-16384).
    pub max_width_px: u32,
    /// Largest corner radius the menu accepts, in pixels (valid range: 0-1024).
    pub max_radius_px: u32,
}

impl Default for ImageMenuConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_width_px: 4096,
            max_radius_px: 512,
        }
    }
}
