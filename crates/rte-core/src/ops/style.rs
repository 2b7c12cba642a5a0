//! Inline formatting of character ranges.

use rte_common::DocError;
use serde::{Deserialize, Serialize};

use crate::doc::{normalize_spans, Doc, InlineSpan, InlineStyle, Node};
use crate::history::History;

use super::{check_node, table_mut, table_ref};

/// Partial inline style. `None` fields keep whatever the text already has;
/// an empty `link`, `color` or `highlight` removes it, as does a zero
/// `font_size_px`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylePatch {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub code: Option<bool>,
    pub link: Option<String>,
    pub color: Option<String>,
    pub highlight: Option<String>,
    pub font_size_px: Option<u32>,
}

impl StylePatch {
    pub fn apply_to(&self, style: &mut InlineStyle) {
        if let Some(v) = self.bold {
            style.bold = v;
        }
        if let Some(v) = self.italic {
            style.italic = v;
        }
        if let Some(v) = self.underline {
            style.underline = v;
        }
        if let Some(v) = self.code {
            style.code = v;
        }
        if let Some(link) = &self.link {
            style.link = (!link.is_empty()).then(|| link.clone());
        }
        if let Some(color) = &self.color {
            style.color = (!color.is_empty()).then(|| color.clone());
        }
        if let Some(bg) = &self.highlight {
            style.highlight = (!bg.is_empty()).then(|| bg.clone());
        }
        if let Some(px) = self.font_size_px {
            style.font_size_px = (px > 0).then_some(px);
        }
    }
}

/// Apply `patch` to characters `start..end` of a paragraph or heading.
pub fn set_text_style(
    doc: &mut Doc,
    index: usize,
    start: usize,
    end: usize,
    patch: &StylePatch,
    history: &mut History,
) -> Result<(), DocError> {
    match check_node(doc, index)? {
        Node::Paragraph { .. } | Node::Heading { .. } => {}
        _ => return Err(DocError::NotAParagraph(index)),
    }
    history.record_before_change(doc);

    if let Some(Node::Paragraph { text, spans } | Node::Heading { text, spans, .. }) =
        doc.nodes.get_mut(index)
    {
        *spans = restyle(text, spans.take(), start, end, patch);
    }
    Ok(())
}

/// Apply `patch` to characters `start..end` of a table cell's text.
#[allow(clippy::too_many_arguments)]
pub fn set_cell_text_style(
    doc: &mut Doc,
    table: usize,
    row: usize,
    col: usize,
    start: usize,
    end: usize,
    patch: &StylePatch,
    history: &mut History,
) -> Result<(), DocError> {
    table_ref(doc, table)?
        .cell(row, col)
        .ok_or(DocError::CellOutOfRange { row, col })?;
    history.record_before_change(doc);
    if let Some(cell) = table_mut(doc, table)?.cell_mut(row, col) {
        cell.spans = restyle(&cell.text, cell.spans.take(), start, end, patch);
    }
    Ok(())
}

/// Split `spans` (or the plain `text`) at the range boundaries, patch the
/// middle, and re-normalize. Offsets count Unicode scalar values and are
/// clamped to the text length.
fn restyle(
    text: &str,
    spans: Option<Vec<InlineSpan>>,
    start: usize,
    end: usize,
    patch: &StylePatch,
) -> Option<Vec<InlineSpan>> {
    let total = text.chars().count();
    let s = start.min(total);
    let e = end.min(total).max(s);

    let current = spans.unwrap_or_else(|| vec![InlineSpan::plain(text)]);

    let mut rebuilt: Vec<InlineSpan> = Vec::with_capacity(current.len() + 2);
    let mut pos = 0usize;
    for span in current {
        let len = span.text.chars().count();
        let (span_start, span_end) = (pos, pos + len);
        pos = span_end;

        if e <= span_start || s >= span_end {
            rebuilt.push(span);
            continue;
        }

        let cut_a = s.saturating_sub(span_start);
        let cut_b = e.min(span_end) - span_start;
        let (before, middle, after) = split_chars(&span.text, cut_a, cut_b);

        rebuilt.push(InlineSpan {
            text: before,
            style: span.style.clone(),
        });
        let mut styled = span.style.clone();
        patch.apply_to(&mut styled);
        rebuilt.push(InlineSpan {
            text: middle,
            style: styled,
        });
        rebuilt.push(InlineSpan {
            text: after,
            style: span.style,
        });
    }

    normalize_spans(rebuilt)
}

fn split_chars(s: &str, a: usize, b: usize) -> (String, String, String) {
    let byte_at = |n: usize| s.char_indices().nth(n).map(|(i, _)| i).unwrap_or(s.len());
    let (ia, ib) = (byte_at(a), byte_at(b));
    (s[..ia].to_string(), s[ia..ib].to_string(), s[ib..].to_string())
}
