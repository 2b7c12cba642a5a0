use std::cell::RefCell;
use std::rc::Rc;

use rte_core::ops;
use rte_webview::{EditorEvent, HostCommand};
use rte_widget::{ChannelTransport, HeadlessSurface, HostWidget, WidgetOptions, WidgetState};
use tokio::sync::mpsc;

struct Harness {
    widget: HostWidget<ChannelTransport>,
    surface: HeadlessSurface,
    commands: mpsc::UnboundedReceiver<HostCommand>,
    events: mpsc::UnboundedReceiver<EditorEvent>,
    changes: Rc<RefCell<Vec<String>>>,
    ready_calls: Rc<RefCell<usize>>,
}

impl Harness {
    fn new(initial_html: &str) -> Self {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let ready_calls = Rc::new(RefCell::new(0));
        let change_sink = changes.clone();
        let ready_sink = ready_calls.clone();
        let options = WidgetOptions::new(initial_html)
            .on_html_change(move |html| change_sink.borrow_mut().push(html.to_string()))
            .on_ready(move || *ready_sink.borrow_mut() += 1);

        let (transport, commands) = ChannelTransport::pair();
        let (event_tx, events) = mpsc::unbounded_channel();
        let mut widget = HostWidget::new(options);
        widget.initialize(|| Ok(transport)).unwrap();

        Self {
            widget,
            surface: HeadlessSurface::new(event_tx),
            commands,
            events,
            changes,
            ready_calls,
        }
    }

    /// Deliver surface -> host events, then host -> surface commands.
    /// Returns the number of commands the surface applied.
    fn sync(&mut self) -> usize {
        while let Ok(event) = self.events.try_recv() {
            self.widget.handle_event(event);
        }
        self.surface.pump(&mut self.commands)
    }
}

#[test]
fn on_ready_fires_at_most_once() {
    let mut h = Harness::new("<p>Hello</p>");
    assert!(h.widget.on_ready());
    assert_eq!(h.surface.pump(&mut h.commands), 1);

    assert!(!h.widget.on_ready());
    h.widget.handle_event(EditorEvent::Ready);
    assert_eq!(h.surface.pump(&mut h.commands), 0);
    assert_eq!(*h.ready_calls.borrow(), 1);
}

#[test]
fn surface_holds_initial_html_after_ready() {
    let initial = "<h2>Title</h2><p>Some <strong>bold</strong> text</p>";
    let mut h = Harness::new(initial);
    h.surface.load();
    assert_eq!(h.sync(), 1);
    assert_eq!(h.surface.content(), initial);
    assert_eq!(h.widget.latest_html(), Some(initial));
    assert!(h.changes.borrow().is_empty());
}

#[test]
fn no_content_before_readiness() {
    let mut h = Harness::new("<p>Hello</p>");
    assert_eq!(h.sync(), 0);
    assert_eq!(h.widget.state(), WidgetState::Loading);
    assert_eq!(h.surface.content(), "");
}

#[test]
fn forwarded_changes_match_emitted_sequence() {
    let mut h = Harness::new("<p>a</p>");
    h.surface.load();
    h.sync();

    let emitted: Vec<String> = (2..=20).map(|i| format!("<p>{}</p>", "a".repeat(i))).collect();
    for html in &emitted {
        h.surface.replace_html(html);
    }
    // Repeat a value: the host must not filter duplicates it receives.
    h.widget.on_content_changed("<p>a</p>");
    h.widget.on_content_changed("<p>a</p>");
    h.sync();

    let mut expected = vec!["<p>a</p>".to_string(), "<p>a</p>".to_string()];
    expected.extend(emitted.iter().cloned());
    let got = h.changes.borrow().clone();
    assert_eq!(got.len(), expected.len());
    // Direct calls land first; queued surface events follow in emit order.
    assert_eq!(got, expected);
    assert_eq!(h.widget.latest_html(), expected.last().map(String::as_str));
}

#[test]
fn changes_are_forwarded_unchanged() {
    let mut h = Harness::new("");
    h.widget.on_ready();
    let odd = "<p>  spaced &nbsp; <span style=\"color:red\">x</span></p>\n<!-- c -->";
    h.widget.on_content_changed(odd);
    assert_eq!(*h.changes.borrow(), vec![odd.to_string()]);
}

#[test]
fn dispose_before_ready_never_delivers_content() {
    let mut h = Harness::new("<p>Hello</p>");
    h.widget.dispose();
    assert_eq!(h.widget.state(), WidgetState::Disposed);

    h.surface.load();
    h.surface.replace_html("<p>late</p>");
    assert_eq!(h.sync(), 0);
    assert!(!h.widget.on_ready());

    assert_eq!(*h.ready_calls.borrow(), 0);
    assert!(h.changes.borrow().is_empty());
    assert_eq!(h.widget.latest_html(), None);
    assert!(h.commands.try_recv().is_err());
}

#[test]
fn dispose_is_idempotent() {
    let mut h = Harness::new("<p>Hello</p>");
    h.widget.dispose();
    h.widget.dispose();
    assert!(!h.widget.redeliver());
}

#[test]
fn hello_world_scenario() {
    let mut h = Harness::new("<p>Hello</p>");

    h.surface.load();
    assert_eq!(h.sync(), 1, "exactly one SetContent");
    assert_eq!(h.surface.content(), "<p>Hello</p>");

    h.surface
        .edit(|core| core.apply(|doc, hist| ops::set_paragraph_text(doc, 0, "Hello World", hist)))
        .unwrap();
    assert_eq!(h.sync(), 0);

    assert_eq!(*h.changes.borrow(), vec!["<p>Hello World</p>".to_string()]);
    assert_eq!(h.widget.state(), WidgetState::Active);
    assert_eq!(*h.ready_calls.borrow(), 1);
}

#[tokio::test]
async fn headless_surface_as_task() {
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = changes.clone();
    let (transport, commands) = ChannelTransport::pair();
    let (event_tx, mut events) = mpsc::unbounded_channel();

    let mut widget = HostWidget::new(
        WidgetOptions::new("<p>Hello</p>").on_html_change(move |h| sink.borrow_mut().push(h.to_string())),
    );
    widget.initialize(|| Ok(transport)).unwrap();

    let task = tokio::spawn(HeadlessSurface::new(event_tx).run(commands));
    let first = events.recv().await.unwrap();
    assert_eq!(first, EditorEvent::Ready);
    widget.handle_event(first);

    widget.dispose();
    let surface = task.await.unwrap();
    assert_eq!(surface.content(), "<p>Hello</p>");
    assert!(changes.borrow().is_empty());
}
