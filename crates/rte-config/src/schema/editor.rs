//! Editor page and webview configuration types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the editor surface is loaded from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// URL of the editor page. The bundled page is served under `rte://`.
    pub page_url: String,
    /// Directory whose files override the bundled editor assets.
    pub asset_dir: Option<PathBuf>,
    /// Placeholder shown by the editor while the document is empty.
    pub placeholder: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            page_url: "rte://localhost/editor/index.html".into(),
            asset_dir: None,
            placeholder: "Start writing...".into(),
        }
    }
}

/// Options passed to the browser surface when it is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebViewSettings {
    /// Dev tools are always available in debug builds.
    pub devtools: bool,
    pub transparent: bool,
    pub user_agent: Option<String>,
    pub clipboard: bool,
}

impl Default for WebViewSettings {
    fn default() -> Self {
        Self {
            devtools: cfg!(debug_assertions),
            transparent: false,
            user_agent: Some(format!("SmartRTE/{}", env!("CARGO_PKG_VERSION"))),
            clipboard: true,
        }
    }
}
