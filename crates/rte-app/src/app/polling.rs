//! Draining WebView events and scheduling the next wake-up.

use std::time::Instant;

use rte_common::Event;
use rte_webview::{PageLoadState, WebViewEvent};
use tokio::sync::broadcast::error::TryRecvError;
use winit::event_loop::{ActiveEventLoop, ControlFlow};

use super::{RteApp, POLL_INTERVAL};

impl RteApp {
    pub(super) fn poll_and_schedule(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now.duration_since(self.last_poll) >= POLL_INTERVAL {
            self.last_poll = now;
            self.poll_webview_events();
            self.poll_bus();
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL));
    }

    /// Route queued WebView events into the widget, in arrival order.
    pub(super) fn poll_webview_events(&mut self) {
        let Some(manager) = &self.manager else {
            return;
        };
        let events = manager.drain_events();
        let max_bytes = self.webview_config.max_message_bytes;

        for event in events {
            match event {
                WebViewEvent::IpcMessage { body, .. } => {
                    if let Some(widget) = self.widget.as_mut() {
                        widget.handle_raw(&body, max_bytes);
                    }
                }
                WebViewEvent::IpcRejected { surface_id, reason } => {
                    tracing::warn!(surface_id, reason = %reason, "Rejected IPC message");
                }
                WebViewEvent::PageLoad { surface_id, state, url } => match state {
                    PageLoadState::Started => tracing::debug!(surface_id, url = %url, "Page load started"),
                    PageLoadState::Finished => tracing::debug!(surface_id, url = %url, "Page load finished"),
                },
                WebViewEvent::NavigationRequested { surface_id, url } => {
                    tracing::debug!(surface_id, url = %url, "Navigation");
                }
                WebViewEvent::NavigationBlocked { surface_id, url } => {
                    tracing::warn!(surface_id, url = %url, "Blocked navigation");
                }
                WebViewEvent::Closed { surface_id } => {
                    tracing::debug!(surface_id, "WebView closed");
                }
            }
        }
    }

    fn poll_bus(&mut self) {
        loop {
            match self.bus_rx.try_recv() {
                Ok(Event::SurfaceError { session, message }) => {
                    tracing::debug!(session = %session, error_message = %message, "Surface error event");
                }
                Ok(event) => tracing::trace!(?event, "Bus event"),
                Err(TryRecvError::Lagged(n)) => tracing::debug!(skipped = n, "Bus receiver lagged"),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }
}
