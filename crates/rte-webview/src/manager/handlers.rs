use std::sync::{Arc, Mutex};

use tracing::{debug, warn};
use wry::WebViewBuilder;

use crate::events::{PageLoadState, WebViewEvent};

use super::WebViewManager;

// =============================================================================
// NAVIGATION ALLOWLIST
// =============================================================================

/// URL prefixes the editor WebView may navigate to. The editor page is
/// self-contained, so only the bundled origin is allowed.
/// - `rte://` custom protocol serving the editor page
/// - `http://rte.localhost` the same origin as rewritten by WebView2 on Windows
/// - `about:blank`
pub const ALLOWED_NAV_PREFIXES: &[&str] = &["rte://", "http://rte.localhost/", "about:blank"];

pub fn is_navigation_allowed(url: &str) -> bool {
    ALLOWED_NAV_PREFIXES
        .iter()
        .any(|prefix| url.starts_with(prefix))
}

fn push(events: &Mutex<Vec<WebViewEvent>>, event: WebViewEvent) {
    if let Ok(mut evts) = events.lock() {
        evts.push(event);
    }
}

// =============================================================================
// HANDLER ATTACHMENTS
// =============================================================================

impl WebViewManager {
    pub(super) fn attach_ipc_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: Arc<Mutex<Vec<WebViewEvent>>>,
        sid: u32,
        max_bytes: usize,
    ) -> WebViewBuilder<'a> {
        builder.with_ipc_handler(move |request| {
            let body = request.body();

            if body.len() > max_bytes {
                warn!(surface_id = sid, body_len = body.len(), max_bytes, "IPC message rejected: oversized");
                push(
                    &events,
                    WebViewEvent::IpcRejected {
                        surface_id: sid,
                        reason: format!("message of {} bytes exceeds {max_bytes}", body.len()),
                    },
                );
                return;
            }

            if serde_json::from_str::<serde_json::Value>(body).is_err() {
                warn!(surface_id = sid, body_len = body.len(), "IPC message rejected: invalid JSON");
                push(
                    &events,
                    WebViewEvent::IpcRejected {
                        surface_id: sid,
                        reason: "invalid JSON".into(),
                    },
                );
                return;
            }

            debug!(surface_id = sid, body_len = body.len(), "IPC message from editor");
            push(
                &events,
                WebViewEvent::IpcMessage {
                    surface_id: sid,
                    body: body.clone(),
                },
            );
        })
    }

    pub(super) fn attach_page_load_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: Arc<Mutex<Vec<WebViewEvent>>>,
        sid: u32,
    ) -> WebViewBuilder<'a> {
        builder.with_on_page_load_handler(move |event, url| {
            let state = PageLoadState::from(event);
            debug!(surface_id = sid, ?state, url = %url, "page load");
            push(
                &events,
                WebViewEvent::PageLoad {
                    surface_id: sid,
                    state,
                    url,
                },
            );
        })
    }

    pub(super) fn attach_navigation_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: Arc<Mutex<Vec<WebViewEvent>>>,
        sid: u32,
    ) -> WebViewBuilder<'a> {
        builder.with_navigation_handler(move |url| {
            if !is_navigation_allowed(&url) {
                warn!(surface_id = sid, url = %url, "navigation blocked: URL not in allowlist");
                push(&events, WebViewEvent::NavigationBlocked { surface_id: sid, url });
                return false;
            }
            debug!(surface_id = sid, url = %url, "navigation allowed");
            push(&events, WebViewEvent::NavigationRequested { surface_id: sid, url });
            true
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
