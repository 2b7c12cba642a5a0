//! `EditorCore`: a document plus its undo history, with format conversions.

use rte_common::{new_id, DocError};
use tracing::debug;

use crate::comments::CommentThread;
use crate::doc::Doc;
use crate::history::History;
use crate::image::{ImageLimits, ImagePatch};
use crate::selection::SelectionRange;
use crate::{delta, html, markdown, ops};

#[derive(Debug, Clone, Default)]
pub struct EditorCore {
    pub doc: Doc,
    pub history: History,
    pub image_limits: ImageLimits,
}

impl EditorCore {
    pub fn new_empty() -> Self {
        Self::default()
    }

    pub fn with_limits(history_depth: usize, image_limits: ImageLimits) -> Self {
        Self {
            doc: Doc::default(),
            history: History::with_max_depth(history_depth),
            image_limits,
        }
    }

    pub fn from_html(html: &str) -> Self {
        Self {
            doc: html::from_html(html),
            ..Default::default()
        }
    }

    /// Replace the document body with parsed `html`. Comment threads are
    /// kept; the previous body goes onto the undo stack.
    pub fn load_html(&mut self, html: &str) {
        self.history.record_before_change(&self.doc);
        let parsed = html::from_html(html);
        self.doc.nodes = parsed.nodes;
        debug!(nodes = self.doc.nodes.len(), "Loaded HTML into editor");
    }

    pub fn to_html(&self) -> String {
        html::to_html(&self.doc)
    }

    pub fn to_markdown(&self) -> String {
        markdown::to_markdown(&self.doc)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.doc)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        Ok(Self {
            doc: serde_json::from_str(json)?,
            ..Default::default()
        })
    }

    pub fn to_delta(&self) -> String {
        delta::to_delta(&self.doc).to_string()
    }

    /// Replace the document from Quill Delta JSON. Invalid JSON leaves the
    /// document and history untouched.
    pub fn from_delta(&mut self, delta_json: &str) -> serde_json::Result<()> {
        let value: serde_json::Value = serde_json::from_str(delta_json)?;
        self.history.record_before_change(&self.doc);
        self.doc.nodes = delta::from_delta(&value).nodes;
        Ok(())
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.doc)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.doc)
    }

    /// Run an operation from [`crate::ops`] against this editor's document
    /// and history.
    pub fn apply<R>(&mut self, op: impl FnOnce(&mut Doc, &mut History) -> R) -> R {
        op(&mut self.doc, &mut self.history)
    }

    /// Image context menu: apply `patch` with the configured limits.
    pub fn set_image_attrs(&mut self, index: usize, patch: &ImagePatch) -> Result<(), DocError> {
        ops::set_image_attrs(
            &mut self.doc,
            index,
            patch,
            self.image_limits,
            &mut self.history,
        )
    }

    pub fn replace_image(&mut self, index: usize, src: &str) -> Result<(), DocError> {
        ops::replace_image(&mut self.doc, index, src, &mut self.history)
    }

    /// Start a comment thread and return its id.
    pub fn add_comment(
        &mut self,
        anchor: Option<SelectionRange>,
        author: &str,
        text: &str,
    ) -> String {
        self.history.record_before_change(&self.doc);
        let id = new_id();
        let mut thread = CommentThread::new(id.clone(), anchor);
        thread.add_message(author.to_string(), text.to_string(), now_ms());
        self.doc.threads.push(thread);
        id
    }

    pub fn reply(&mut self, thread_id: &str, author: &str, text: &str) -> Result<(), DocError> {
        let idx = self.thread_index(thread_id)?;
        self.history.record_before_change(&self.doc);
        self.doc.threads[idx].add_message(author.to_string(), text.to_string(), now_ms());
        Ok(())
    }

    pub fn resolve_comment(&mut self, thread_id: &str, resolved: bool) -> Result<(), DocError> {
        let idx = self.thread_index(thread_id)?;
        self.history.record_before_change(&self.doc);
        self.doc.threads[idx].set_resolved(resolved);
        Ok(())
    }

    pub fn thread(&self, thread_id: &str) -> Option<&CommentThread> {
        self.doc.threads.iter().find(|t| t.id == thread_id)
    }

    fn thread_index(&self, thread_id: &str) -> Result<usize, DocError> {
        self.doc
            .threads
            .iter()
            .position(|t| t.id == thread_id)
            .ok_or_else(|| DocError::ThreadNotFound(thread_id.to_string()))
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::Node;
    use crate::image::ImageAlign;
    use crate::selection::Anchor;

    #[test]
    fn load_html_is_undoable() {
        let mut core = EditorCore::from_html("<p>one</p>");
        core.load_html("<p>two</p>");
        assert_eq!(core.to_html(), "<p>two</p>");
        assert!(core.undo());
        assert_eq!(core.to_html(), "<p>one</p>");
        assert!(core.redo());
        assert_eq!(core.to_html(), "<p>two</p>");
    }

    #[test]
    fn apply_runs_ops() {
        let mut core = EditorCore::new_empty();
        let idx = core.apply(|d, h| ops::insert_table_at(d, None, 2, 2, h));
        core.apply(|d, h| ops::set_cell_text(d, idx, 1, 1, "x", h))
            .unwrap();
        assert!(core.to_html().contains("<td>x</td>"));
        assert!(core.to_markdown().contains("| x |"));
    }

    #[test]
    fn image_menu_uses_configured_limits() {
        let mut core = EditorCore::with_limits(
            10,
            ImageLimits {
                max_width_px: 500,
                max_radius_px: 20,
            },
        );
        core.load_html(r#"<img src="a.png" alt="">"#);
        let patch = ImagePatch {
            width_px: Some(9000),
            radius_px: Some(99),
            align: Some(ImageAlign::Center),
            ..Default::default()
        };
        core.set_image_attrs(0, &patch).unwrap();
        match &core.doc.nodes[0] {
            Node::Image(img) => {
                assert_eq!(img.width_px, Some(500));
                assert_eq!(img.radius_px, Some(20));
            }
            other => panic!("expected image, got {other:?}"),
        }
        core.replace_image(0, "b.png").unwrap();
        assert!(core.to_html().contains("src=\"b.png\""));
    }

    #[test]
    fn comments_lifecycle() {
        let mut core = EditorCore::from_html("<p>text</p>");
        let anchor = SelectionRange::collapsed(Anchor::Text {
            node_index: 0,
            char_offset: 2,
        });
        let id = core.add_comment(Some(anchor), "ann", "check this");
        core.reply(&id, "bo", "done").unwrap();
        core.resolve_comment(&id, true).unwrap();

        let thread = core.thread(&id).unwrap();
        assert!(thread.resolved);
        assert_eq!(thread.messages.len(), 2);
        assert!(thread.messages[0].ts_ms > 0);

        assert_eq!(
            core.reply("missing", "x", "y"),
            Err(DocError::ThreadNotFound("missing".into()))
        );
    }

    #[test]
    fn load_html_keeps_threads() {
        let mut core = EditorCore::new_empty();
        let id = core.add_comment(None, "a", "b");
        core.load_html("<p>new</p>");
        assert!(core.thread(&id).is_some());
    }

    #[test]
    fn json_and_delta_round_trip() {
        let mut core = EditorCore::from_html("<h2>T</h2><p>body</p>");
        let json = core.to_json().unwrap();
        let restored = EditorCore::from_json(&json).unwrap();
        assert_eq!(restored.doc, core.doc);

        let delta = core.to_delta();
        core.load_html("<p>other</p>");
        core.from_delta(&delta).unwrap();
        assert_eq!(core.to_html(), "<h2>T</h2><p>body</p>");
        assert!(core.from_delta("not json").is_err());
    }
}
