//! `--headless`: drive the widget against the in-process editor surface.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use rte_config::RteConfig;
use rte_core::{EditorCore, ImageLimits};
use rte_widget::{ChannelTransport, HeadlessSurface, HostWidget, WidgetError, WidgetOptions};
use tokio::sync::mpsc;
use tracing::info;

use crate::output;

/// Build the editing engine the config describes.
pub fn editor_core(config: &RteConfig) -> EditorCore {
    EditorCore::with_limits(
        config.history.max_depth as usize,
        ImageLimits {
            max_width_px: config.image_menu.max_width_px,
            max_radius_px: config.image_menu.max_radius_px,
        },
    )
}

/// Load `initial_html` through a full widget session and return the
/// document as the editor engine renders it.
pub async fn normalise(config: &RteConfig, initial_html: &str) -> Result<String, WidgetError> {
    let errors: Rc<RefCell<Vec<String>>> = Rc::default();
    let sink = Rc::clone(&errors);
    let (transport, commands) = ChannelTransport::pair();
    let (event_tx, mut events) = mpsc::unbounded_channel();

    let mut widget = HostWidget::new(
        WidgetOptions::new(initial_html).on_error(move |e| sink.borrow_mut().push(e.to_string())),
    );
    widget.initialize(|| Ok(transport))?;

    let surface = HeadlessSurface::with_core(editor_core(config), event_tx);
    let task = tokio::spawn(surface.run(commands));

    // The surface signals readiness first; everything after is a change.
    while let Some(event) = events.recv().await {
        let ready = matches!(event, rte_webview::EditorEvent::Ready);
        widget.handle_event(event);
        if ready {
            break;
        }
    }
    widget.dispose();

    let surface = task
        .await
        .map_err(|e| WidgetError::SurfaceCreation(format!("headless surface task failed: {e}")))?;

    if let Some(message) = errors.borrow().first() {
        return Err(WidgetError::Script(message.clone()));
    }
    Ok(surface.core().to_html())
}

/// Entry point for `rte --headless`.
pub fn run(
    config: &RteConfig,
    initial_html: &str,
    output_path: Option<&Path>,
    markdown: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let html = runtime.block_on(normalise(config, initial_html))?;
    let rendered = output::render(&html, markdown);

    match output_path {
        Some(path) => {
            output::write_document(path, &rendered)?;
            info!(path = %path.display(), bytes = rendered.len(), "Wrote document");
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn normalise_round_trips_through_the_surface() {
        let html = normalise(&RteConfig::default(), "<p>Hello <b>World</b></p>")
            .await
            .unwrap();
        assert_eq!(html, "<p>Hello <strong>World</strong></p>");
    }

    #[tokio::test]
    async fn empty_input_is_an_empty_document() {
        assert_eq!(normalise(&RteConfig::default(), "").await.unwrap(), "");
    }

    #[test]
    fn config_limits_reach_the_core() {
        let mut config = RteConfig::default();
        config.image_menu.max_width_px = 640;
        let core = editor_core(&config);
        assert_eq!(core.image_limits.max_width_px, 640);
    }

    #[test]
    fn run_writes_markdown_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.md");
        run(&RteConfig::default(), "<h2>T</h2><p>x</p>", Some(&path), true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "## T\n\nx\n");
    }
}
