//! Document tree structures and helpers.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::comments::CommentThread;
use crate::image::ImageAttrs;

/// Default width of a freshly created table column, in pixels.
pub const DEFAULT_COLUMN_WIDTH: u32 = 120;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Doc {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub threads: Vec<CommentThread>,
}

impl Doc {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            threads: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop comment threads whose anchor node is no longer in the document.
    pub fn prune_threads(&mut self) {
        let anchored: HashSet<&str> = self
            .nodes
            .iter()
            .filter_map(|n| match n {
                Node::CommentAnchor { thread_id } => Some(thread_id.as_str()),
                _ => None,
            })
            .collect();
        self.threads.retain(|t| anchored.contains(t.id.as_str()));
    }

    /// Concatenated plain text of every text-bearing block, one per line.
    pub fn plain_text(&self) -> String {
        self.nodes
            .iter()
            .filter_map(Node::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A block-level node.
///
/// For `Paragraph` and `Heading`, `text` always equals the concatenation of
/// the span texts when `spans` is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    Paragraph {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        spans: Option<Vec<InlineSpan>>,
    },
    Heading {
        level: u8,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        spans: Option<Vec<InlineSpan>>,
    },
    Table(Table),
    Image(ImageAttrs),
    /// An uploaded media object referenced by storage key.
    Media {
        key: String,
        content_type: String,
    },
    Mcq(McqBlock),
    FormulaInline {
        tex: String,
    },
    FormulaBlock {
        tex: String,
    },
    InfoBox {
        kind: String,
        text: String,
    },
    CommentAnchor {
        thread_id: String,
    },
}

impl Default for Node {
    fn default() -> Self {
        Node::paragraph("")
    }
}

impl Node {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Node::Paragraph {
            text: text.into(),
            spans: None,
        }
    }

    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Node::Heading {
            level: level.clamp(1, 6),
            text: text.into(),
            spans: None,
        }
    }

    /// Short type name used in logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Paragraph { .. } => "paragraph",
            Node::Heading { .. } => "heading",
            Node::Table(_) => "table",
            Node::Image(_) => "image",
            Node::Media { .. } => "media",
            Node::Mcq(_) => "mcq",
            Node::FormulaInline { .. } => "formula_inline",
            Node::FormulaBlock { .. } => "formula_block",
            Node::InfoBox { .. } => "info_box",
            Node::CommentAnchor { .. } => "comment_anchor",
        }
    }

    pub fn plain_text(&self) -> Option<String> {
        match self {
            Node::Paragraph { text, .. } | Node::Heading { text, .. } => Some(text.clone()),
            Node::InfoBox { text, .. } => Some(text.clone()),
            Node::Mcq(b) => Some(
                std::iter::once(b.question.as_str())
                    .chain(b.options.iter().map(|o| o.text.as_str()))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            Node::Table(t) => Some(
                t.rows
                    .iter()
                    .map(|r| {
                        r.cells
                            .iter()
                            .filter(|c| !c.placeholder)
                            .map(|c| c.text.as_str())
                            .collect::<Vec<_>>()
                            .join("\t")
                    })
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InlineStyle {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub code: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size_px: Option<u32>,
}

impl InlineStyle {
    pub fn is_plain(&self) -> bool {
        *self == InlineStyle::default()
    }

    /// Inline CSS for the color, highlight and font size, if any is set.
    pub fn css(&self) -> Option<String> {
        let mut parts: Vec<String> = Vec::new();
        if let Some(color) = &self.color {
            parts.push(format!("color:{color}"));
        }
        if let Some(bg) = &self.highlight {
            parts.push(format!("background-color:{bg}"));
        }
        if let Some(px) = self.font_size_px {
            parts.push(format!("font-size:{px}px"));
        }
        (!parts.is_empty()).then(|| parts.join(";"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InlineSpan {
    pub text: String,
    #[serde(default)]
    pub style: InlineStyle,
}

impl InlineSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: InlineStyle::default(),
        }
    }
}

/// Collapse adjacent spans with equal style and drop empty ones. Returns
/// `None` when the result carries no styling at all.
pub fn normalize_spans(spans: Vec<InlineSpan>) -> Option<Vec<InlineSpan>> {
    let mut out: Vec<InlineSpan> = Vec::with_capacity(spans.len());
    for span in spans.into_iter().filter(|s| !s.text.is_empty()) {
        match out.last_mut() {
            Some(prev) if prev.style == span.style => prev.text.push_str(&span.text),
            _ => out.push(span),
        }
    }
    if out.iter().all(|s| s.style.is_plain()) {
        None
    } else {
        Some(out)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Table {
    pub rows: Vec<TableRow>,
    #[serde(default)]
    pub freeze_header: bool,
    #[serde(default)]
    pub freeze_first_col: bool,
    /// Per-column widths in pixels. Empty means auto layout.
    #[serde(default)]
    pub column_widths: Vec<u32>,
}

impl Table {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows: (0..rows).map(|_| TableRow::with_cells(cols)).collect(),
            freeze_header: false,
            freeze_first_col: false,
            column_widths: vec![DEFAULT_COLUMN_WIDTH; cols],
        }
    }

    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.cells.len())
            .max()
            .unwrap_or(0)
            .max(self.column_widths.len())
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.rows.get(row).and_then(|r| r.cells.get(col))
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut TableCell> {
        self.rows.get_mut(row).and_then(|r| r.cells.get_mut(col))
    }

    pub fn has_spans(&self) -> bool {
        self.rows
            .iter()
            .flat_map(|r| r.cells.iter())
            .any(|c| c.colspan > 1 || c.rowspan > 1)
    }
}

/// Smallest row height a table accepts, in pixels.
pub const MIN_ROW_HEIGHT: u32 = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_px: Option<u32>,
}

impl TableRow {
    pub fn with_cells(cols: usize) -> Self {
        Self {
            cells: (0..cols).map(|_| TableCell::default()).collect(),
            height_px: None,
        }
    }
}

/// A table cell. As with paragraphs, `text` equals the concatenation of
/// the span texts when `spans` is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spans: Option<Vec<InlineSpan>>,
    pub colspan: u32,
    pub rowspan: u32,
    #[serde(default)]
    pub style: CellStyle,
    /// Covered by a spanning cell; renderers skip it.
    #[serde(default)]
    pub placeholder: bool,
}

impl Default for TableCell {
    fn default() -> Self {
        Self {
            text: String::new(),
            spans: None,
            colspan: 1,
            rowspan: 1,
            style: CellStyle::default(),
            placeholder: false,
        }
    }
}

impl TableCell {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// A multiple-choice question. With `multiple` unset at most one option
/// may be marked correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqBlock {
    pub question: String,
    #[serde(default)]
    pub options: Vec<McqOption>,
    #[serde(default)]
    pub multiple: bool,
}

impl McqBlock {
    /// The block a fresh insert starts from: a placeholder question and
    /// four unmarked options.
    pub fn template(multiple: bool) -> Self {
        Self {
            question: "New question".into(),
            options: ["A", "B", "C", "D"]
                .iter()
                .map(|l| McqOption {
                    text: format!("Option {l}"),
                    correct: false,
                })
                .collect(),
            multiple,
        }
    }

    pub fn correct_count(&self) -> usize {
        self.options.iter().filter(|o| o.correct).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqOption {
    pub text: String,
    #[serde(default)]
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CellStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<BorderStyle>,
}

impl CellStyle {
    /// Shallow merge: fields present in `incoming` replace ours.
    pub fn merge(&mut self, incoming: &CellStyle) {
        if incoming.background.is_some() {
            self.background = incoming.background.clone();
        }
        if incoming.border.is_some() {
            self.border = incoming.border.clone();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.background.is_none() && self.border.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderStyle {
    pub color: String,
    pub width_px: u32,
}
