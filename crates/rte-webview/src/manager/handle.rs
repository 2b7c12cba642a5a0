use rte_common::BridgeError;
use tracing::debug;
use wry::WebView;

use crate::protocol::{encode_command, HostCommand};

/// Owned handle to the editor WebView. Dropping it destroys the WebView.
pub struct WebViewHandle {
    pub(super) webview: WebView,
    pub(super) surface_id: u32,
}

impl WebViewHandle {
    pub fn surface_id(&self) -> u32 {
        self.surface_id
    }

    /// Deliver a host command to the editor page.
    pub fn send_command(&self, command: &HostCommand) -> Result<(), BridgeError> {
        let script = encode_command(command)?;
        debug!(
            surface_id = self.surface_id,
            kind = command.kind(),
            script_len = script.len(),
            "sending command to editor"
        );
        self.webview
            .evaluate_script(&script)
            .map_err(|e| BridgeError::Script(e.to_string()))
    }

    /// Set the WebView bounds (position + size) within the parent window.
    pub fn set_bounds(&self, bounds: wry::Rect) -> Result<(), wry::Error> {
        self.webview.set_bounds(bounds)
    }

    pub fn set_visible(&self, visible: bool) -> Result<(), wry::Error> {
        self.webview.set_visible(visible)
    }

    pub fn focus(&self) -> Result<(), wry::Error> {
        self.webview.focus()
    }
}
