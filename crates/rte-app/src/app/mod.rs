//! Windowed host: one winit window containing the editor WebView.

mod bounds;
mod event_handler;
mod init;
mod polling;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rte_common::{Event, EventBus};
use rte_config::RteConfig;
use rte_webview::{WebViewConfig, WebViewHandle, WebViewManager};
use rte_widget::HostWidget;
use tokio::sync::broadcast;
use winit::window::Window;

use crate::writer::DocumentWriter;

/// How often queued WebView events are drained while idle.
const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Surface id of the single editor WebView.
const EDITOR_SURFACE: u32 = 1;

/// Top-level application state.
pub struct RteApp {
    config: RteConfig,
    webview_config: WebViewConfig,
    initial_html: String,
    output: Option<PathBuf>,
    markdown: bool,

    window: Option<Arc<Window>>,
    manager: Option<WebViewManager>,
    widget: Option<HostWidget<WebViewHandle>>,
    writer: Option<DocumentWriter>,

    event_bus: Arc<EventBus>,
    bus_rx: broadcast::Receiver<Event>,
    last_poll: Instant,
    should_exit: bool,
}

impl RteApp {
    pub fn new(
        config: RteConfig,
        initial_html: String,
        output: Option<PathBuf>,
        markdown: bool,
    ) -> Self {
        let event_bus = Arc::new(EventBus::default());
        let bus_rx = event_bus.subscribe();
        Self {
            webview_config: WebViewConfig::from_config(&config),
            config,
            initial_html,
            output,
            markdown,
            window: None,
            manager: None,
            widget: None,
            writer: None,
            event_bus,
            bus_rx,
            last_poll: Instant::now(),
            should_exit: false,
        }
    }

    /// Dispose the editor session and forget the WebView.
    fn shutdown(&mut self) {
        let handle = self.widget.take().and_then(|mut widget| widget.dispose());
        if let (Some(manager), Some(handle)) = (&self.manager, handle) {
            manager.destroy(handle);
        }
        // Picks up the `Closed` event queued by `destroy`.
        self.poll_webview_events();
        // The widget (and the queue its callback held) is gone; wait for
        // the last save.
        if let Some(mut writer) = self.writer.take() {
            writer.finish();
        }
        self.event_bus.publish(Event::Shutdown);
        self.manager = None;
        self.should_exit = true;
    }
}
