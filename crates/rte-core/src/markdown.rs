//! GitHub-flavoured Markdown export.
//!
//! Markdown cannot express everything the document model holds. Tables with
//! merged cells or fixed row heights, media blocks and images carrying menu
//! attributes (alignment, width, radius) are emitted as inline HTML instead;
//! comment anchors are dropped. Questions become task lists.

use crate::doc::{Doc, InlineSpan, McqBlock, Node, Table, TableCell, TableRow};
use crate::html::to_html;
use crate::image::{ImageAlign, ImageAttrs};

pub fn to_markdown(doc: &Doc) -> String {
    let blocks: Vec<String> = doc.nodes.iter().filter_map(block).collect();
    if blocks.is_empty() {
        return String::new();
    }
    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

fn block(node: &Node) -> Option<String> {
    let md = match node {
        Node::Paragraph { text, spans } => inline(text, spans.as_deref()),
        Node::Heading { level, text, spans } => {
            let hashes = "#".repeat((*level).clamp(1, 6) as usize);
            format!("{hashes} {}", inline(text, spans.as_deref()))
        }
        Node::Table(t) if t.has_spans() || t.rows.iter().any(|r| r.height_px.is_some()) => {
            to_html(&Doc::new(vec![node.clone()]))
        }
        Node::Table(t) => gfm_table(t)?,
        Node::Image(img) => image(img),
        Node::Media { .. } => to_html(&Doc::new(vec![node.clone()])),
        Node::Mcq(block) => mcq(block),
        Node::FormulaInline { tex } => format!("${tex}$"),
        Node::FormulaBlock { tex } => format!("$$\n{tex}\n$$"),
        Node::InfoBox { kind, text } => {
            let mut out = format!("> **{}:**", escape_inline(kind));
            for line in text.lines() {
                out.push_str("\n> ");
                out.push_str(&escape_inline(line));
            }
            out
        }
        Node::CommentAnchor { .. } => return None,
    };
    Some(md)
}

fn inline(text: &str, spans: Option<&[InlineSpan]>) -> String {
    match spans {
        Some(spans) => hard_breaks(&styled(spans)),
        None => hard_breaks(&escape_inline(text)),
    }
}

fn styled(spans: &[InlineSpan]) -> String {
    let mut out = String::new();
    for span in spans {
        let mut s = if span.style.code {
            format!("`{}`", span.text.replace('`', "\\`"))
        } else {
            escape_inline(&span.text)
        };
        if span.style.bold {
            s = format!("**{s}**");
        }
        if span.style.italic {
            s = format!("_{s}_");
        }
        if let Some(css) = span.style.css() {
            s = format!("<span style=\"{css}\">{s}</span>");
        }
        if span.style.underline {
            s = format!("<u>{s}</u>");
        }
        if let Some(href) = &span.style.link {
            s = format!("[{s}]({href})");
        }
        out.push_str(&s);
    }
    out
}

fn hard_breaks(s: &str) -> String {
    s.replace('\n', "  \n")
}

fn escape_inline(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if matches!(ch, '\\' | '*' | '_' | '`' | '[' | ']') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn image(img: &ImageAttrs) -> String {
    let plain = img.align == ImageAlign::None && img.width_px.is_none() && img.radius_px.is_none();
    if !plain {
        return to_html(&Doc::new(vec![Node::Image(img.clone())]));
    }
    let md = format!("![{}]({})", escape_inline(&img.alt), img.src);
    match &img.link {
        Some(href) => format!("[{md}]({href})"),
        None => md,
    }
}

fn gfm_table(t: &Table) -> Option<String> {
    let header = t.rows.first()?;
    let cols = t.column_count();
    let mut lines = vec![gfm_row(header, cols)];
    lines.push(format!("|{}", " --- |".repeat(cols)));
    lines.extend(t.rows.iter().skip(1).map(|r| gfm_row(r, cols)));
    Some(lines.join("\n"))
}

fn gfm_row(row: &TableRow, cols: usize) -> String {
    let mut line = String::from("|");
    for col in 0..cols {
        line.push(' ');
        line.push_str(&row.cells.get(col).map(gfm_cell).unwrap_or_default());
        line.push_str(" |");
    }
    line
}

fn gfm_cell(cell: &TableCell) -> String {
    let text = match &cell.spans {
        Some(spans) => styled(spans).trim().to_string(),
        None => cell.text.trim().replace('\\', "\\\\"),
    };
    text.replace('|', "\\|").replace('\n', "<br>")
}

fn mcq(block: &McqBlock) -> String {
    let mut out = format!("**{}**\n", escape_inline(&block.question));
    for option in &block.options {
        let mark = if option.correct { 'x' } else { ' ' };
        out.push_str(&format!("\n- [{mark}] {}", escape_inline(&option.text)));
    }
    out
}
