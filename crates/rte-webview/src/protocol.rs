//! Typed messages exchanged between the host widget and the editor page.
//!
//! The wire carries exactly one host command (`set_content`) and three
//! editor events (`ready`, `content_changed`, `script_error`). Anything else
//! arriving over IPC is rejected at decode time.

use rte_common::BridgeError;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::ipc::IpcMessage;

/// Host -> editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostCommand {
    /// Replace the whole editor content.
    SetContent { html: String },
}

impl HostCommand {
    pub fn kind(&self) -> &'static str {
        match self {
            HostCommand::SetContent { .. } => "set_content",
        }
    }
}

/// Editor -> host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorEvent {
    /// The page has installed its handlers and can accept `SetContent`.
    Ready,
    /// The document changed; carries the full current HTML.
    ContentChanged { html: String },
    /// An uncaught error inside the page.
    ScriptError { message: String },
}

impl EditorEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            EditorEvent::Ready => "ready",
            EditorEvent::ContentChanged { .. } => "content_changed",
            EditorEvent::ScriptError { .. } => "script_error",
        }
    }
}

/// Render a command as the script the WebView evaluates.
pub fn encode_command(command: &HostCommand) -> Result<String, BridgeError> {
    let payload = match command {
        HostCommand::SetContent { html } => json!({ "html": html }),
    };
    let kind = serde_json::to_string(command.kind()).map_err(|e| BridgeError::Encode(e.to_string()))?;
    let payload = serde_json::to_string(&payload).map_err(|e| BridgeError::Encode(e.to_string()))?;
    Ok(format!("window.rte.ipc._dispatch({kind}, {payload});"))
}

/// Decode one raw IPC body into an [`EditorEvent`].
pub fn decode_event(raw: &str, max_bytes: usize) -> Result<EditorEvent, BridgeError> {
    if raw.len() > max_bytes {
        return Err(BridgeError::Oversized {
            size: raw.len(),
            limit: max_bytes,
        });
    }
    let msg: IpcMessage =
        serde_json::from_str(raw).map_err(|e| BridgeError::Decode(e.to_string()))?;

    match msg.kind.as_str() {
        "ready" => Ok(EditorEvent::Ready),
        "content_changed" => {
            let html = msg
                .payload
                .str_field("html")
                .ok_or_else(|| BridgeError::Decode("content_changed without html".into()))?;
            Ok(EditorEvent::ContentChanged {
                html: html.to_string(),
            })
        }
        "script_error" => Ok(EditorEvent::ScriptError {
            message: msg
                .payload
                .str_field("message")
                .unwrap_or("unknown script error")
                .to_string(),
        }),
        other => Err(BridgeError::UnknownKind(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: usize = 1024;

    #[test]
    fn decodes_ready() {
        assert_eq!(
            decode_event(r#"{"kind":"ready","payload":null}"#, LIMIT).unwrap(),
            EditorEvent::Ready
        );
    }

    #[test]
    fn decodes_content_changed_verbatim() {
        let raw = r#"{"kind":"content_changed","payload":{"html":"<p>Hello&nbsp; World</p>"}}"#;
        assert_eq!(
            decode_event(raw, LIMIT).unwrap(),
            EditorEvent::ContentChanged {
                html: "<p>Hello&nbsp; World</p>".into()
            }
        );
    }

    #[test]
    fn content_changed_accepts_empty_document() {
        let raw = r#"{"kind":"content_changed","payload":{"html":""}}"#;
        assert_eq!(
            decode_event(raw, LIMIT).unwrap(),
            EditorEvent::ContentChanged { html: String::new() }
        );
    }

    #[test]
    fn content_changed_requires_html() {
        let raw = r#"{"kind":"content_changed","payload":{}}"#;
        assert!(matches!(decode_event(raw, LIMIT), Err(BridgeError::Decode(_))));
    }

    #[test]
    fn script_error_defaults_message() {
        let raw = r#"{"kind":"script_error","payload":{"message":"boom"}}"#;
        assert_eq!(
            decode_event(raw, LIMIT).unwrap(),
            EditorEvent::ScriptError {
                message: "boom".into()
            }
        );
        let raw = r#"{"kind":"script_error"}"#;
        assert!(matches!(
            decode_event(raw, LIMIT).unwrap(),
            EditorEvent::ScriptError { .. }
        ));
    }

    #[test]
    fn rejects_unknown_kind() {
        let raw = r#"{"kind":"open_file","payload":"/etc/passwd"}"#;
        assert!(matches!(
            decode_event(raw, LIMIT),
            Err(BridgeError::UnknownKind(k)) if k == "open_file"
        ));
    }

    #[test]
    fn rejects_oversized_body() {
        let html = "x".repeat(LIMIT);
        let raw = format!(r#"{{"kind":"content_changed","payload":{{"html":"{html}"}}}}"#);
        assert!(matches!(
            decode_event(&raw, LIMIT),
            Err(BridgeError::Oversized { limit: LIMIT, .. })
        ));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            decode_event("not json", LIMIT),
            Err(BridgeError::Decode(_))
        ));
    }

    #[test]
    fn encodes_set_content() {
        let js = encode_command(&HostCommand::SetContent {
            html: "<p>Hello</p>".into(),
        })
        .unwrap();
        assert_eq!(
            js,
            r#"window.rte.ipc._dispatch("set_content", {"html":"<p>Hello</p>"});"#
        );
    }

    #[test]
    fn serde_tags_are_snake_case() {
        let v = serde_json::to_value(EditorEvent::ContentChanged { html: "a".into() }).unwrap();
        assert_eq!(v["type"], "content_changed");
        let v = serde_json::to_value(HostCommand::SetContent { html: "a".into() }).unwrap();
        assert_eq!(v["type"], "set_content");
    }
}
