//! Editor WebView lifecycle management.
//!
//! `WebViewManager` creates and destroys the `wry::WebView` hosting the
//! editor page. Handlers installed on the WebView never call back into the
//! host directly: they queue [`WebViewEvent`]s that the UI loop drains.

use std::sync::{Arc, Mutex};

use crate::content::ContentProvider;
use crate::events::WebViewEvent;

mod handle;
pub mod handlers;
mod lifecycle;
mod types;

pub use handle::WebViewHandle;
pub use types::WebViewConfig;

pub struct WebViewManager {
    pub(crate) events: Arc<Mutex<Vec<WebViewEvent>>>,
    content_provider: Arc<ContentProvider>,
}

impl WebViewManager {
    pub fn new(content_provider: ContentProvider) -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            content_provider: Arc::new(content_provider),
        }
    }

    /// Drain all pending events.
    pub fn drain_events(&self) -> Vec<WebViewEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Default for WebViewManager {
    fn default() -> Self {
        Self::new(ContentProvider::bundled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_the_queue() {
        let manager = WebViewManager::default();
        manager
            .events
            .lock()
            .unwrap()
            .push(WebViewEvent::Closed { surface_id: 1 });
        assert_eq!(manager.drain_events().len(), 1);
        assert!(manager.drain_events().is_empty());
    }
}
