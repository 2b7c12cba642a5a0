//! Window creation and editor setup.

use std::sync::Arc;

use winit::event_loop::ActiveEventLoop;
use winit::window::WindowAttributes;

use rte_webview::{ContentProvider, WebViewManager};
use rte_widget::{HostWidget, WidgetError, WidgetOptions};

use crate::writer::{ChangeQueue, DocumentWriter};

use super::bounds::editor_bounds;
use super::{RteApp, EDITOR_SURFACE};

impl RteApp {
    /// Create the window. Returns `false` if the event loop should exit.
    pub(super) fn initialize_window(&mut self, event_loop: &ActiveEventLoop) -> bool {
        let attrs = WindowAttributes::default()
            .with_title("Smart RTE")
            .with_transparent(self.config.webview.transparent)
            .with_inner_size(winit::dpi::LogicalSize::new(1024.0, 768.0));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!("Failed to create window: {e}");
                return false;
            }
        };

        let content_provider = match &self.config.editor.asset_dir {
            Some(dir) => {
                if !dir.is_dir() {
                    tracing::warn!(
                        path = %dir.display(),
                        "Editor asset directory not found, serving the bundled page"
                    );
                }
                ContentProvider::with_asset_dir(dir)
            }
            None => ContentProvider::bundled(),
        };
        self.manager = Some(WebViewManager::new(content_provider));
        self.window = Some(window);
        tracing::info!("Window created");
        true
    }

    /// Build the host widget and let it create the editor WebView.
    pub(super) fn initialize_editor(&mut self) {
        let (Some(window), Some(manager)) = (&self.window, &self.manager) else {
            return;
        };

        if let Some(path) = &self.output {
            match DocumentWriter::spawn(path.clone(), self.markdown) {
                Ok(writer) => self.writer = Some(writer),
                Err(e) => tracing::error!(path = %path.display(), "Failed to start document writer: {e}"),
            }
        }
        let queue = self.writer.as_ref().and_then(DocumentWriter::queue);
        let options = WidgetOptions::new(self.initial_html.clone())
            .on_ready(|| tracing::info!("Editor ready for input"))
            .on_html_change(move |html| deliver_change(queue.as_ref(), html))
            .on_error(|e| tracing::error!("Editor error: {e}"));

        let mut widget = HostWidget::new(options).with_event_bus(Arc::clone(&self.event_bus));
        let bounds = editor_bounds(window.inner_size(), window.scale_factor());
        let config = &self.webview_config;
        let created = widget.initialize(|| {
            manager
                .create(EDITOR_SURFACE, &**window, bounds, config)
                .map_err(|e| WidgetError::SurfaceCreation(e.to_string()))
        });

        match created {
            Ok(()) => {
                tracing::info!(session = %widget.session(), url = %config.url, "Editor loading");
                self.widget = Some(widget);
            }
            // Already reported through on_error.
            Err(_) => self.should_exit = true,
        }
    }
}

/// Application side of the change callback. Runs on the event-loop
/// thread, so saving is only queued here.
fn deliver_change(queue: Option<&ChangeQueue>, html: &str) {
    match queue {
        Some(queue) => queue.submit(html),
        None => tracing::info!(html_len = html.len(), "Document changed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changes_are_written_to_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.html");
        let mut writer = DocumentWriter::spawn(path.clone(), false).unwrap();
        let queue = writer.queue();
        deliver_change(queue.as_ref(), "<p>one</p>");
        deliver_change(queue.as_ref(), "<p>two</p>");
        drop(queue);
        writer.finish();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<p>two</p>");
    }

    #[test]
    fn changes_can_be_saved_as_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.md");
        let mut writer = DocumentWriter::spawn(path.clone(), true).unwrap();
        deliver_change(writer.queue().as_ref(), "<p>Hello <em>there</em></p>");
        writer.finish();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Hello _there_\n");
    }
}
