//! IPC plumbing between Rust and the editor page.
//!
//! Messages flow in both directions:
//! - **JS -> Rust**: the page calls `window.rte.ipc.send(kind, payload)`,
//!   which posts `{"kind": ..., "payload": ...}` to the WebView's IPC handler.
//! - **Rust -> JS**: Rust evaluates `window.rte.ipc._dispatch(kind, payload)`
//!   in the page, which invokes the handler registered with `rte.ipc.on`.

use rte_config::RteConfig;
use serde::{Deserialize, Serialize};

/// A raw IPC message from JavaScript, before it is typed by
/// [`crate::protocol::decode_event`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcMessage {
    pub kind: String,
    #[serde(default = "IpcPayload::none")]
    pub payload: IpcPayload,
}

/// Payload of an IPC message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IpcPayload {
    Text(String),
    Json(serde_json::Value),
    None,
}

impl IpcPayload {
    fn none() -> Self {
        IpcPayload::None
    }

    /// Look up a string field of a JSON object payload. A bare text payload
    /// answers for any key.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        match self {
            IpcPayload::Text(s) => Some(s),
            IpcPayload::Json(v) => v.get(key).and_then(serde_json::Value::as_str),
            IpcPayload::None => None,
        }
    }
}

/// Installs `window.rte.ipc` before any page script runs.
pub const IPC_INIT_SCRIPT: &str = r#"
(function() {
    window.rte = window.rte || {};
    var pending = [];
    window.rte.ipc = {
        send: function(kind, payload) {
            window.ipc.postMessage(JSON.stringify({
                kind: kind,
                payload: payload === undefined ? null : payload
            }));
        },
        _handlers: {},
        on: function(kind, callback) {
            this._handlers[kind] = callback;
            var rest = [];
            for (var i = 0; i < pending.length; i++) {
                if (pending[i][0] === kind) {
                    callback(pending[i][1]);
                } else {
                    rest.push(pending[i]);
                }
            }
            pending = rest;
        },
        _dispatch: function(kind, payload) {
            var handler = this._handlers[kind];
            if (handler) {
                handler(payload);
            } else {
                pending.push([kind, payload]);
            }
        }
    };
})();
"#;

/// Settings the editor page reads from `window.__RTE_CONFIG__`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSettings {
    pub change_debounce_ms: u32,
    pub emit_on_blur: bool,
    pub image_menu: bool,
    pub max_image_width: u32,
    pub max_image_radius: u32,
    pub placeholder: String,
}

impl PageSettings {
    pub fn from_config(config: &RteConfig) -> Self {
        Self {
            change_debounce_ms: config.bridge.change_debounce_ms,
            emit_on_blur: config.bridge.emit_on_blur,
            image_menu: config.image_menu.enabled,
            max_image_width: config.image_menu.max_width_px,
            max_image_radius: config.image_menu.max_radius_px,
            placeholder: config.editor.placeholder.clone(),
        }
    }

    /// Initialization script assigning `window.__RTE_CONFIG__`.
    pub fn to_script(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string());
        format!("window.__RTE_CONFIG__ = Object.freeze({json});")
    }
}

impl Default for PageSettings {
    fn default() -> Self {
        Self::from_config(&RteConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_message_without_payload() {
        let msg = serde_json::from_str::<IpcMessage>(r#"{"kind":"ready"}"#).unwrap();
        assert_eq!(msg.kind, "ready");
        assert!(matches!(msg.payload, IpcPayload::None));
    }

    #[test]
    fn str_field_reads_object_and_text() {
        let msg = serde_json::from_str::<IpcMessage>(r#"{"kind":"k","payload":{"html":"<p>x</p>"}}"#)
            .unwrap();
        assert_eq!(msg.payload.str_field("html"), Some("<p>x</p>"));
        assert_eq!(msg.payload.str_field("other"), None);
        let text = IpcPayload::Text("raw".into());
        assert_eq!(text.str_field("html"), Some("raw"));
    }

    #[test]
    fn init_script_defines_bridge() {
        assert!(IPC_INIT_SCRIPT.contains("window.rte.ipc"));
        assert!(IPC_INIT_SCRIPT.contains("window.ipc.postMessage"));
        assert!(IPC_INIT_SCRIPT.contains("_dispatch"));
    }

    #[test]
    fn page_settings_follow_config() {
        let mut config = RteConfig::default();
        config.bridge.change_debounce_ms = 40;
        config.image_menu.enabled = false;
        let script = PageSettings::from_config(&config).to_script();
        assert!(script.starts_with("window.__RTE_CONFIG__ = Object.freeze({"));
        assert!(script.contains("\"changeDebounceMs\":40"));
        assert!(script.contains("\"imageMenu\":false"));
    }
}
