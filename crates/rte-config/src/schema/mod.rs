//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod bridge;
mod document;
mod editor;
mod system;

pub use bridge::*;
pub use document::*;
pub use editor::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RteConfig {
    pub editor: EditorConfig,
    pub bridge: BridgeConfig,
    pub webview: WebViewSettings,
    pub history: HistoryConfig,
    pub image_menu: ImageMenuConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_editor_page_is_bundled() {
        let config = RteConfig::default();
        assert_eq!(
            config.editor.page_url,
            "rte://localhost/editor/index.html"
        );
        assert!(config.editor.asset_dir.is_none());
    }

    #[test]
    fn default_bridge_values() {
        let config = RteConfig::default();
        assert_eq!(config.bridge.change_debounce_ms, 250);
        assert!(config.bridge.emit_on_blur);
        assert_eq!(config.bridge.max_message_bytes, 8 * 1024 * 1024);
    }

    #[test]
    fn default_document_values() {
        let config = RteConfig::default();
        assert_eq!(config.history.max_depth, 100);
        assert!(config.image_menu.enabled);
        assert_eq!(config.image_menu.max_width_px, 4096);
        assert_eq!(config.image_menu.max_radius_px, 512);
    }

    #[test]
    fn user_agent_carries_version() {
        let config = RteConfig::default();
        let ua = config.webview.user_agent.unwrap();
        assert!(ua.starts_with("SmartRTE/"));
    }

    #[test]
    fn log_level_directives() {
        assert_eq!(LogLevel::default().as_directive(), "rte=info");
        assert_eq!(LogLevel::Trace.as_directive(), "rte=trace");
        assert_eq!(LogLevel::Error.as_directive(), "rte=error");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: RteConfig = toml::from_str(
            r#"
[bridge]
change_debounce_ms = 0

[logging]
level = "debug"
"#,
        )
        .unwrap();
        assert_eq!(config.bridge.change_debounce_ms, 0);
        assert!(config.bridge.emit_on_blur);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.history.max_depth, 100);
    }
}
