//! `ApplicationHandler` implementation for the winit event loop.

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowId;

use super::bounds::editor_bounds;
use super::RteApp;

impl ApplicationHandler for RteApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if !self.initialize_window(event_loop) {
            event_loop.exit();
            return;
        }
        self.initialize_editor();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Window close requested");
                // Pick up a final blur flush before tearing down.
                self.poll_webview_events();
                self.shutdown();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    self.sync_editor_bounds(size);
                }
            }

            WindowEvent::Focused(true) => {
                if let Some(handle) = self.widget.as_ref().and_then(|w| w.transport()) {
                    if let Err(e) = handle.focus() {
                        tracing::debug!("Failed to focus editor: {e}");
                    }
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            event_loop.exit();
            return;
        }
        self.poll_and_schedule(event_loop);
    }
}

impl RteApp {
    fn sync_editor_bounds(&self, size: winit::dpi::PhysicalSize<u32>) {
        let Some(window) = &self.window else {
            return;
        };
        let bounds = editor_bounds(size, window.scale_factor());
        if let Some(handle) = self.widget.as_ref().and_then(|w| w.transport()) {
            if let Err(e) = handle.set_bounds(bounds) {
                tracing::warn!(surface_id = handle.surface_id(), "Failed to resize editor: {e}");
            }
        }
    }
}
