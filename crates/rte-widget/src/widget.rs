//! The host widget: owns one editor surface for the lifetime of a session.

use std::fmt;
use std::sync::Arc;

use rte_common::{BridgeError, Event, EventBus, SessionId};
use rte_webview::{decode_event, EditorEvent, HostCommand};
use tracing::{debug, error, info, warn};

use crate::errors::WidgetError;
use crate::transport::EditorTransport;

type HtmlCallback = Box<dyn FnMut(&str)>;
type ReadyCallback = Box<dyn FnMut()>;
type ErrorCallback = Box<dyn FnMut(&WidgetError)>;

/// Lifecycle of the embedded surface.
///
/// `Created -> Loading -> Ready -> Active -> Disposed`; `Disposed` is
/// reachable from every state and is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    /// Constructed, no surface yet.
    Created,
    /// Surface exists, editor page has not signalled readiness.
    Loading,
    /// Initial content delivered, no edits seen yet.
    Ready,
    /// At least one content change has been forwarded.
    Active,
    Disposed,
}

/// Construction options supplied by the embedding application.
pub struct WidgetOptions {
    pub initial_html: String,
    on_html_change: Option<HtmlCallback>,
    on_ready: Option<ReadyCallback>,
    on_error: Option<ErrorCallback>,
}

impl WidgetOptions {
    pub fn new(initial_html: impl Into<String>) -> Self {
        Self {
            initial_html: initial_html.into(),
            on_html_change: None,
            on_ready: None,
            on_error: None,
        }
    }

    pub fn on_html_change(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.on_html_change = Some(Box::new(f));
        self
    }

    pub fn on_ready(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_ready = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl FnMut(&WidgetError) + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for WidgetOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetOptions")
            .field("initial_html_len", &self.initial_html.len())
            .field("on_html_change", &self.on_html_change.is_some())
            .field("on_ready", &self.on_ready.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// Embeds one editor surface and bridges it to the application.
///
/// The widget never pushes content before the editor reports readiness,
/// pushes the initial content exactly once, and forwards every
/// `ContentChanged` to the application unchanged and in arrival order.
pub struct HostWidget<T: EditorTransport> {
    session: SessionId,
    state: WidgetState,
    options: WidgetOptions,
    transport: Option<T>,
    latest_html: Option<String>,
    bus: Option<Arc<EventBus>>,
}

impl<T: EditorTransport> HostWidget<T> {
    pub fn new(options: WidgetOptions) -> Self {
        Self {
            session: SessionId::new(),
            state: WidgetState::Created,
            options,
            transport: None,
            latest_html: None,
            bus: None,
        }
    }

    /// Publish lifecycle events for this session on `bus`.
    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn session(&self) -> &SessionId {
        &self.session
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, WidgetState::Ready | WidgetState::Active)
    }

    /// Latest content known to the host: the initial content once it has
    /// been delivered, then the most recent `ContentChanged` payload.
    pub fn latest_html(&self) -> Option<&str> {
        self.latest_html.as_deref()
    }

    pub fn transport(&self) -> Option<&T> {
        self.transport.as_ref()
    }

    pub fn transport_mut(&mut self) -> Option<&mut T> {
        self.transport.as_mut()
    }

    /// Create the surface and start loading the editor page.
    ///
    /// `create` builds the transport (for the windowed app, the WebView).
    /// A failure is reported through `on_error` and leaves the widget in
    /// `Created`, so the caller may retry.
    pub fn initialize<F>(&mut self, create: F) -> Result<(), WidgetError>
    where
        F: FnOnce() -> Result<T, WidgetError>,
    {
        match self.state {
            WidgetState::Created => {}
            WidgetState::Disposed => return Err(WidgetError::Disposed),
            other => {
                warn!(session = %self.session, state = ?other, "initialize called twice, ignoring");
                return Ok(());
            }
        }

        match create() {
            Ok(transport) => {
                self.transport = Some(transport);
                self.state = WidgetState::Loading;
                info!(session = %self.session, "Editor surface created, loading page");
                self.publish(Event::SessionStarted(self.session.clone()));
                Ok(())
            }
            Err(e) => {
                error!(session = %self.session, error = %e, "Failed to create editor surface");
                self.publish(Event::SurfaceError {
                    session: self.session.clone(),
                    message: e.to_string(),
                });
                self.report(&e);
                Err(e)
            }
        }
    }

    /// Handle the editor's readiness signal.
    ///
    /// The first call while loading sends `SetContent(initial_html)` and
    /// notifies the application. Every other call does nothing and returns
    /// `false`.
    pub fn on_ready(&mut self) -> bool {
        if self.state != WidgetState::Loading {
            debug!(session = %self.session, state = ?self.state, "Ignoring readiness signal");
            return false;
        }
        self.state = WidgetState::Ready;

        let command = HostCommand::SetContent {
            html: self.options.initial_html.clone(),
        };
        let sent = match self.transport.as_mut() {
            Some(transport) => transport.send(&command),
            None => Err(BridgeError::Closed),
        };
        match sent {
            Ok(()) => {
                debug!(
                    session = %self.session,
                    html_len = self.options.initial_html.len(),
                    "Delivered initial content"
                );
                self.latest_html = Some(self.options.initial_html.clone());
            }
            Err(e) => {
                warn!(session = %self.session, error = %e, "Failed to deliver initial content");
                self.report(&WidgetError::Bridge(e));
            }
        }

        info!(session = %self.session, "Editor ready");
        self.publish(Event::EditorReady(self.session.clone()));
        if let Some(cb) = self.options.on_ready.as_mut() {
            cb();
        }
        true
    }

    /// Forward a content change to the application, unchanged.
    ///
    /// Changes arriving after disposal are dropped.
    pub fn on_content_changed(&mut self, html: &str) {
        match self.state {
            WidgetState::Disposed => {
                debug!(session = %self.session, "Dropping content change after dispose");
                return;
            }
            WidgetState::Ready => self.state = WidgetState::Active,
            WidgetState::Created | WidgetState::Loading => {
                debug!(session = %self.session, state = ?self.state, "Content change before readiness");
            }
            WidgetState::Active => {}
        }

        debug!(session = %self.session, html_len = html.len(), "Content changed");
        self.latest_html = Some(html.to_string());
        self.publish(Event::ContentChanged {
            session: self.session.clone(),
            html_len: html.len(),
        });
        if let Some(cb) = self.options.on_html_change.as_mut() {
            cb(html);
        }
    }

    /// Report an uncaught error raised inside the editor page.
    pub fn on_script_error(&mut self, message: &str) {
        if self.state == WidgetState::Disposed {
            return;
        }
        warn!(session = %self.session, script_message = message, "Editor script error");
        self.publish(Event::SurfaceError {
            session: self.session.clone(),
            message: message.to_string(),
        });
        self.report(&WidgetError::Script(message.to_string()));
    }

    /// Dispatch one typed event from the editor.
    pub fn handle_event(&mut self, event: EditorEvent) {
        debug!(session = %self.session, kind = event.kind(), "Editor event");
        match event {
            EditorEvent::Ready => {
                self.on_ready();
            }
            EditorEvent::ContentChanged { html } => self.on_content_changed(&html),
            EditorEvent::ScriptError { message } => self.on_script_error(&message),
        }
    }

    /// Decode a raw IPC body and dispatch it. Malformed bodies are reported
    /// through `on_error` and otherwise ignored.
    pub fn handle_raw(&mut self, body: &str, max_bytes: usize) {
        if self.state == WidgetState::Disposed {
            return;
        }
        match decode_event(body, max_bytes) {
            Ok(event) => self.handle_event(event),
            Err(e) => {
                warn!(session = %self.session, error = %e, "Rejected editor message");
                self.report(&WidgetError::Bridge(e));
            }
        }
    }

    /// Re-send the mirrored content to the application's change callback.
    /// Returns `false` when nothing has been mirrored yet.
    pub fn redeliver(&mut self) -> bool {
        if self.state == WidgetState::Disposed {
            return false;
        }
        let Some(html) = self.latest_html.as_deref() else {
            return false;
        };
        if let Some(cb) = self.options.on_html_change.as_mut() {
            cb(html);
        }
        true
    }

    /// Tear down the surface and the bridge. Idempotent; nothing is
    /// persisted.
    ///
    /// The closed transport is handed back on the first call so its owner
    /// can release it (the windowed app destroys the WebView).
    pub fn dispose(&mut self) -> Option<T> {
        if self.state == WidgetState::Disposed {
            return None;
        }
        let transport = self.transport.take().map(|mut transport| {
            transport.close();
            transport
        });
        self.latest_html = None;
        self.state = WidgetState::Disposed;
        info!(session = %self.session, "Editor session disposed");
        self.publish(Event::SessionDisposed(self.session.clone()));
        transport
    }

    fn report(&mut self, err: &WidgetError) {
        if let Some(cb) = self.options.on_error.as_mut() {
            cb(err);
        }
    }

    fn publish(&self, event: Event) {
        if let Some(bus) = &self.bus {
            bus.publish(event);
        }
    }
}

impl<T: EditorTransport> Drop for HostWidget<T> {
    fn drop(&mut self) {
        let _ = self.dispose();
    }
}

impl<T: EditorTransport> fmt::Debug for HostWidget<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostWidget")
            .field("session", &self.session)
            .field("state", &self.state)
            .field("options", &self.options)
            .field("has_transport", &self.transport.is_some())
            .finish()
    }
}
