use rte_config::RteConfig;

use crate::ipc::PageSettings;

/// Configuration for creating the editor WebView.
#[derive(Debug, Clone)]
pub struct WebViewConfig {
    /// Editor page to load.
    pub url: String,
    pub transparent: bool,
    pub devtools: bool,
    pub user_agent: Option<String>,
    pub clipboard: bool,
    /// IPC bodies larger than this are dropped by the handler.
    pub max_message_bytes: usize,
    /// Values exposed to the page as `window.__RTE_CONFIG__`.
    pub page: PageSettings,
}

impl Default for WebViewConfig {
    fn default() -> Self {
        Self::from_config(&RteConfig::default())
    }
}

impl WebViewConfig {
    pub fn from_config(config: &RteConfig) -> Self {
        Self {
            url: config.editor.page_url.clone(),
            transparent: config.webview.transparent,
            devtools: config.webview.devtools,
            user_agent: config.webview.user_agent.clone(),
            clipboard: config.webview.clipboard,
            max_message_bytes: config.bridge.max_message_bytes as usize,
            page: PageSettings::from_config(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_config_sections() {
        let mut config = RteConfig::default();
        config.editor.page_url = "http://rte.localhost/editor/index.html".into();
        config.webview.transparent = true;
        config.bridge.max_message_bytes = 4096;

        let wv = WebViewConfig::from_config(&config);
        assert_eq!(wv.url, "http://rte.localhost/editor/index.html");
        assert!(wv.transparent);
        assert_eq!(wv.max_message_bytes, 4096);
        assert_eq!(wv.page.change_debounce_ms, 250);
    }
}
