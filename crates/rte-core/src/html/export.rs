//! Document -> HTML fragment.

use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute as attr, encode_text};

use crate::doc::{CellStyle, Doc, InlineSpan, McqBlock, Node, Table, TableCell};
use crate::image::{ImageAlign, ImageAttrs};

/// Render a document as a compact HTML fragment: no wrapper element and no
/// whitespace between blocks, the shape the editor page produces itself.
pub fn to_html(doc: &Doc) -> String {
    let mut out = String::new();
    for node in &doc.nodes {
        write_node(&mut out, node);
    }
    out
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Paragraph { text, spans } => {
            out.push_str("<p>");
            write_inline(out, text, spans.as_deref());
            out.push_str("</p>");
        }
        Node::Heading { level, text, spans } => {
            let lvl = (*level).clamp(1, 6);
            let _ = write!(out, "<h{lvl}>");
            write_inline(out, text, spans.as_deref());
            let _ = write!(out, "</h{lvl}>");
        }
        Node::Table(t) => write_table(out, t),
        Node::Image(img) => write_image(out, img),
        Node::Media { key, content_type } => {
            let _ = write!(
                out,
                "<div data-media key=\"{}\" type=\"{}\"></div>",
                attr(key),
                attr(content_type)
            );
        }
        Node::Mcq(block) => write_mcq(out, block),
        Node::FormulaInline { tex } => {
            let _ = write!(
                out,
                "<span class=\"formula-inline\">{}</span>",
                encode_text(tex)
            );
        }
        Node::FormulaBlock { tex } => {
            let _ = write!(
                out,
                "<div class=\"formula-block\">{}</div>",
                encode_text(tex)
            );
        }
        Node::InfoBox { kind, text } => {
            let _ = write!(
                out,
                "<div class=\"info-box\" data-kind=\"{}\">{}</div>",
                attr(kind),
                block_text(text)
            );
        }
        Node::CommentAnchor { thread_id } => {
            let _ = write!(out, "<sup data-comment=\"{}\"></sup>", attr(thread_id));
        }
    }
}

fn write_inline(out: &mut String, text: &str, spans: Option<&[InlineSpan]>) {
    if is_blank_line(text) {
        out.push_str("<br>");
        return;
    }
    match spans {
        Some(spans) => {
            for span in spans {
                out.push_str(&render_span(span));
            }
        }
        None => out.push_str(&text_with_breaks(text)),
    }
}

/// Wrap order, innermost first: code, styled span, u, em, strong, a.
fn render_span(span: &InlineSpan) -> String {
    let mut inner = text_with_breaks(&span.text);
    if span.style.code {
        inner = format!("<code>{inner}</code>");
    }
    if let Some(css) = span.style.css() {
        inner = format!("<span style=\"{}\">{inner}</span>", attr(&css));
    }
    if span.style.underline {
        inner = format!("<u>{inner}</u>");
    }
    if span.style.italic {
        inner = format!("<em>{inner}</em>");
    }
    if span.style.bold {
        inner = format!("<strong>{inner}</strong>");
    }
    if let Some(href) = &span.style.link {
        inner = format!("<a href=\"{}\">{inner}</a>", attr(href));
    }
    inner
}

/// An empty block and a block holding a single line break are the same
/// empty line; both render as the `<br>` placeholder the editor page uses.
fn is_blank_line(text: &str) -> bool {
    text.is_empty() || text == "\n"
}

fn block_text(text: &str) -> String {
    if is_blank_line(text) {
        "<br>".to_string()
    } else {
        text_with_breaks(text)
    }
}

fn text_with_breaks(text: &str) -> String {
    encode_text(text).replace('\n', "<br>")
}

fn write_table(out: &mut String, t: &Table) {
    out.push_str("<table");
    let mut classes: Vec<&str> = Vec::new();
    if t.freeze_header {
        classes.push("freeze-header");
    }
    if t.freeze_first_col {
        classes.push("freeze-first-col");
    }
    if !classes.is_empty() {
        let _ = write!(out, " class=\"{}\"", classes.join(" "));
    }
    out.push('>');

    if !t.column_widths.is_empty() {
        out.push_str("<colgroup>");
        for w in &t.column_widths {
            let _ = write!(out, "<col style=\"width:{w}px\">");
        }
        out.push_str("</colgroup>");
    }

    out.push_str("<tbody>");
    for row in &t.rows {
        match row.height_px {
            Some(h) => {
                let _ = write!(out, "<tr style=\"height:{h}px\">");
            }
            None => out.push_str("<tr>"),
        }
        for cell in row.cells.iter().filter(|c| !c.placeholder) {
            out.push_str("<td");
            if cell.colspan > 1 {
                let _ = write!(out, " colspan=\"{}\"", cell.colspan);
            }
            if cell.rowspan > 1 {
                let _ = write!(out, " rowspan=\"{}\"", cell.rowspan);
            }
            if let Some(style) = cell_style_attr(&cell.style) {
                let _ = write!(out, " style=\"{}\"", attr(&style));
            }
            out.push('>');
            write_cell_text(out, cell);
            out.push_str("</td>");
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
}

fn write_cell_text(out: &mut String, cell: &TableCell) {
    match &cell.spans {
        Some(spans) => {
            for span in spans {
                out.push_str(&render_span(span));
            }
        }
        None => out.push_str(&text_with_breaks(&cell.text)),
    }
}

fn write_mcq(out: &mut String, block: &McqBlock) {
    let _ = write!(
        out,
        "<div class=\"mcq\" data-multiple=\"{}\"><div class=\"mcq-question\">{}</div>",
        block.multiple,
        text_with_breaks(&block.question)
    );
    for option in &block.options {
        let _ = write!(
            out,
            "<div class=\"mcq-option\" data-correct=\"{}\">{}</div>",
            option.correct,
            text_with_breaks(&option.text)
        );
    }
    out.push_str("</div>");
}

fn cell_style_attr(style: &CellStyle) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    if let Some(bg) = &style.background {
        parts.push(format!("background:{bg}"));
    }
    if let Some(b) = &style.border {
        parts.push(format!("border:{}px solid {}", b.width_px, b.color));
    }
    (!parts.is_empty()).then(|| parts.join(";"))
}

fn write_image(out: &mut String, img: &ImageAttrs) {
    if let Some(href) = &img.link {
        let _ = write!(out, "<a href=\"{}\">", attr(href));
    }
    let _ = write!(
        out,
        "<img src=\"{}\" alt=\"{}\"",
        attr(&img.src),
        attr(&img.alt)
    );
    if img.align != ImageAlign::None {
        let _ = write!(out, " data-align=\"{}\"", img.align.as_str());
    }
    if let Some(style) = img.style_attr() {
        let _ = write!(out, " style=\"{}\"", attr(&style));
    }
    out.push('>');
    if img.link.is_some() {
        out.push_str("</a>");
    }
}
