use std::borrow::Cow;
use std::sync::Arc;

use tracing::{debug, warn};
use wry::http::Response;
use wry::raw_window_handle;
use wry::WebViewBuilder;

use crate::content::{ContentProvider, SCHEME};
use crate::events::WebViewEvent;
use crate::ipc::IPC_INIT_SCRIPT;

use super::handle::WebViewHandle;
use super::types::WebViewConfig;
use super::WebViewManager;

impl WebViewManager {
    /// Create the editor WebView as a child of `window`, positioned at
    /// `bounds`. The page starts loading immediately; readiness arrives later
    /// as an IPC message.
    pub fn create<W: raw_window_handle::HasWindowHandle>(
        &self,
        surface_id: u32,
        window: &W,
        bounds: wry::Rect,
        config: &WebViewConfig,
    ) -> Result<WebViewHandle, wry::Error> {
        let events = Arc::clone(&self.events);
        let page_script = config.page.to_script();

        let mut builder = WebViewBuilder::new()
            .with_bounds(bounds)
            .with_transparent(config.transparent)
            .with_devtools(config.devtools)
            .with_clipboard(config.clipboard)
            .with_focused(true)
            .with_initialization_script(IPC_INIT_SCRIPT)
            .with_initialization_script(&page_script);

        if let Some(ua) = &config.user_agent {
            builder = builder.with_user_agent(ua);
        }

        builder = Self::attach_ipc_handler(
            builder,
            Arc::clone(&events),
            surface_id,
            config.max_message_bytes,
        );
        builder = Self::attach_page_load_handler(builder, Arc::clone(&events), surface_id);
        builder = Self::attach_navigation_handler(builder, Arc::clone(&events), surface_id);
        builder = self.attach_custom_protocol(builder);

        let webview = builder.with_url(&config.url).build_as_child(window)?;

        debug!(surface_id, url = %config.url, "editor WebView created");

        Ok(WebViewHandle {
            webview,
            surface_id,
        })
    }

    /// Drop the WebView and queue a `Closed` event for it.
    pub fn destroy(&self, handle: WebViewHandle) {
        let surface_id = handle.surface_id;
        drop(handle);
        debug!(surface_id, "editor WebView destroyed");
        if let Ok(mut evts) = self.events.lock() {
            evts.push(WebViewEvent::Closed { surface_id });
        }
    }

    fn attach_custom_protocol<'a>(&self, builder: WebViewBuilder<'a>) -> WebViewBuilder<'a> {
        let cp = Arc::clone(&self.content_provider);
        builder.with_custom_protocol(SCHEME.to_string(), move |_wv_id, request| {
            let uri = request.uri().to_string();
            let path = ContentProvider::request_path(&uri);

            match cp.resolve(path) {
                Some((mime, data)) => respond(200, &mime, data.into_owned()),
                None => {
                    warn!(path = %path, "custom protocol: asset not found");
                    respond(404, "text/plain", b"Not Found".to_vec())
                }
            }
        })
    }
}

fn respond(status: u16, mime: &str, body: Vec<u8>) -> Response<Cow<'static, [u8]>> {
    Response::builder()
        .status(status)
        .header("Content-Type", mime)
        .header("Access-Control-Allow-Origin", "rte://localhost")
        .body(Cow::Owned(body))
        .unwrap_or_else(|_| Response::new(Cow::Borrowed(&[][..])))
}
