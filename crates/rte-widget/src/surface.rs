//! An editor surface without a browser.
//!
//! `HeadlessSurface` plays the editor page's side of the bridge on top of
//! `rte-core`: it signals readiness, answers `SetContent`, and emits one
//! `ContentChanged` per committed edit. The binary uses it for `--headless`
//! runs; tests use it as the far end of a [`crate::ChannelTransport`].

use rte_core::EditorCore;
use rte_webview::{EditorEvent, HostCommand};
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug)]
pub struct HeadlessSurface {
    core: EditorCore,
    html: String,
    ready_sent: bool,
    events: mpsc::UnboundedSender<EditorEvent>,
}

impl HeadlessSurface {
    pub fn new(events: mpsc::UnboundedSender<EditorEvent>) -> Self {
        Self::with_core(EditorCore::new_empty(), events)
    }

    /// Use `core` (history depth, image limits) as the editing engine.
    pub fn with_core(core: EditorCore, events: mpsc::UnboundedSender<EditorEvent>) -> Self {
        let html = core.to_html();
        Self {
            core,
            html,
            ready_sent: false,
            events,
        }
    }

    /// Finish "loading the page": emit `Ready` the first time only.
    pub fn load(&mut self) {
        if self.ready_sent {
            return;
        }
        self.ready_sent = true;
        self.emit(EditorEvent::Ready);
    }

    pub fn apply(&mut self, command: HostCommand) {
        match command {
            HostCommand::SetContent { html } => {
                debug!(html_len = html.len(), "Headless surface received content");
                // Injected content is the baseline: it is neither echoed
                // back nor undoable. Threads survive only if their anchor does.
                self.core.doc.nodes = rte_core::from_html(&html).nodes;
                self.core.doc.prune_threads();
                self.core.history.clear();
                self.html = html;
            }
        }
    }

    /// Current document HTML, exactly as last set or emitted.
    pub fn content(&self) -> &str {
        &self.html
    }

    pub fn core(&self) -> &EditorCore {
        &self.core
    }

    /// A user edit that replaces the whole document.
    pub fn replace_html(&mut self, html: &str) {
        if html == self.html {
            return;
        }
        self.core.load_html(html);
        self.html = html.to_string();
        self.emit(EditorEvent::ContentChanged {
            html: self.html.clone(),
        });
    }

    /// Run an edit against the engine. A `ContentChanged` is emitted when
    /// the rendered document differs afterwards.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut EditorCore) -> R) -> R {
        let out = f(&mut self.core);
        let html = self.core.to_html();
        if html != self.html {
            self.html = html;
            self.emit(EditorEvent::ContentChanged {
                html: self.html.clone(),
            });
        }
        out
    }

    /// Apply every command already queued on `commands`; returns how many
    /// were applied.
    pub fn pump(&mut self, commands: &mut mpsc::UnboundedReceiver<HostCommand>) -> usize {
        let mut applied = 0;
        while let Ok(command) = commands.try_recv() {
            self.apply(command);
            applied += 1;
        }
        applied
    }

    /// Signal readiness, then serve commands until the host closes the
    /// channel. Returns the surface so its final state can be inspected.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<HostCommand>) -> Self {
        self.load();
        while let Some(command) = commands.recv().await {
            self.apply(command);
        }
        debug!("Headless surface channel closed");
        self
    }

    fn emit(&self, event: EditorEvent) {
        if self.events.send(event).is_err() {
            debug!("Headless surface event dropped, host is gone");
        }
    }
}
