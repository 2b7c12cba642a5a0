//! WebView event types.

use serde::{Deserialize, Serialize};

/// State of a page load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageLoadState {
    Started,
    Finished,
}

impl From<wry::PageLoadEvent> for PageLoadState {
    fn from(e: wry::PageLoadEvent) -> Self {
        match e {
            wry::PageLoadEvent::Started => Self::Started,
            wry::PageLoadEvent::Finished => Self::Finished,
        }
    }
}

/// Events queued by a WebView's handlers for the UI loop to drain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebViewEvent {
    PageLoad {
        surface_id: u32,
        state: PageLoadState,
        url: String,
    },
    /// Raw IPC body; already checked to be JSON within the size cap.
    IpcMessage { surface_id: u32, body: String },
    /// An IPC body the handler refused (invalid JSON or oversized).
    IpcRejected { surface_id: u32, reason: String },
    NavigationRequested { surface_id: u32, url: String },
    /// A navigation outside the allowlist was blocked.
    NavigationBlocked { surface_id: u32, url: String },
    Closed { surface_id: u32 },
}

impl WebViewEvent {
    pub fn surface_id(&self) -> u32 {
        match self {
            WebViewEvent::PageLoad { surface_id, .. }
            | WebViewEvent::IpcMessage { surface_id, .. }
            | WebViewEvent::IpcRejected { surface_id, .. }
            | WebViewEvent::NavigationRequested { surface_id, .. }
            | WebViewEvent::NavigationBlocked { surface_id, .. }
            | WebViewEvent::Closed { surface_id } => *surface_id,
        }
    }
}
