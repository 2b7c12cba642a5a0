//! Quill Delta (`{"ops": [...]}`) conversion.
//!
//! Text, headings, inline marks, images and formulas map onto standard Quill
//! ops. Info boxes use an `info-box` line attribute and image corner radius a
//! `radius` embed attribute. Tables, media, questions and comment anchors
//! have no Delta form and are skipped on export.

use serde_json::{json, Map, Value};

use crate::doc::{normalize_spans, Doc, InlineSpan, InlineStyle, Node};
use crate::image::{ImageAlign, ImageAttrs};

pub fn to_delta(doc: &Doc) -> Value {
    let mut ops: Vec<Value> = Vec::new();
    for node in &doc.nodes {
        match node {
            Node::Paragraph { text, spans } => {
                push_text(&mut ops, text, spans.as_deref());
                ops.push(json!({ "insert": "\n" }));
            }
            Node::Heading { level, text, spans } => {
                push_text(&mut ops, text, spans.as_deref());
                ops.push(json!({ "insert": "\n", "attributes": { "header": (*level).clamp(1, 6) } }));
            }
            Node::Image(img) => {
                let mut attrs = Map::new();
                if !img.alt.is_empty() {
                    attrs.insert("alt".into(), json!(img.alt));
                }
                if let Some(w) = img.width_px {
                    attrs.insert("width".into(), json!(w.to_string()));
                }
                if let Some(r) = img.radius_px {
                    attrs.insert("radius".into(), json!(r));
                }
                if let Some(link) = &img.link {
                    attrs.insert("link".into(), json!(link));
                }
                ops.push(with_attrs(json!({ "image": img.src }), attrs));
                let newline = match img.align {
                    ImageAlign::None => json!({ "insert": "\n" }),
                    align => json!({ "insert": "\n", "attributes": { "align": align.as_str() } }),
                };
                ops.push(newline);
            }
            Node::FormulaInline { tex } => ops.push(json!({ "insert": { "formula": tex } })),
            Node::FormulaBlock { tex } => {
                ops.push(json!({ "insert": { "formula": tex } }));
                ops.push(json!({ "insert": "\n" }));
            }
            Node::InfoBox { kind, text } => {
                for line in text.split('\n') {
                    if !line.is_empty() {
                        ops.push(json!({ "insert": line }));
                    }
                    ops.push(json!({ "insert": "\n", "attributes": { "info-box": kind } }));
                }
            }
            Node::Table(_) | Node::Media { .. } | Node::Mcq(_) | Node::CommentAnchor { .. } => {}
        }
    }
    json!({ "ops": ops })
}

fn with_attrs(insert: Value, attrs: Map<String, Value>) -> Value {
    if attrs.is_empty() {
        json!({ "insert": insert })
    } else {
        json!({ "insert": insert, "attributes": attrs })
    }
}

fn push_text(ops: &mut Vec<Value>, text: &str, spans: Option<&[InlineSpan]>) {
    match spans {
        Some(spans) => {
            for span in spans {
                let mut attrs = Map::new();
                let style = &span.style;
                for (key, on) in [
                    ("bold", style.bold),
                    ("italic", style.italic),
                    ("underline", style.underline),
                    ("code", style.code),
                ] {
                    if on {
                        attrs.insert(key.into(), Value::Bool(true));
                    }
                }
                if let Some(link) = &style.link {
                    attrs.insert("link".into(), json!(link));
                }
                if let Some(color) = &style.color {
                    attrs.insert("color".into(), json!(color));
                }
                if let Some(bg) = &style.highlight {
                    attrs.insert("background".into(), json!(bg));
                }
                if let Some(px) = style.font_size_px {
                    attrs.insert("size".into(), json!(format!("{px}px")));
                }
                ops.push(with_attrs(json!(span.text), attrs));
            }
        }
        None if !text.is_empty() => ops.push(json!({ "insert": text })),
        None => {}
    }
}

enum Item {
    Text(InlineSpan),
    Formula(String),
    Image(ImageAttrs),
}

/// Accumulates the items of the current Delta line until its `\n`.
#[derive(Default)]
struct LineBuilder {
    nodes: Vec<Node>,
    items: Vec<Item>,
}

impl LineBuilder {
    /// Close the current line. `attrs` are the attributes of the `\n` op;
    /// `terminated` is false for trailing content with no final newline.
    fn end_line(&mut self, attrs: Option<&Value>, terminated: bool) {
        let mut items = std::mem::take(&mut self.items);
        let attr = |key: &str| attrs.and_then(|a| a.get(key));

        // A formula alone on a terminated line is a block formula.
        if terminated && items.len() == 1 && matches!(items[0], Item::Formula(_)) {
            if let Some(Item::Formula(tex)) = items.pop() {
                self.nodes.push(Node::FormulaBlock { tex });
            }
            return;
        }

        if let Some(kind) = attr("info-box").and_then(Value::as_str) {
            let text: String = items
                .iter()
                .filter_map(|i| match i {
                    Item::Text(span) => Some(span.text.as_str()),
                    _ => None,
                })
                .collect();
            if let Some(Node::InfoBox { kind: k, text: prev }) = self.nodes.last_mut() {
                if k == kind {
                    prev.push('\n');
                    prev.push_str(&text);
                    return;
                }
            }
            self.nodes.push(Node::InfoBox {
                kind: kind.to_string(),
                text,
            });
            return;
        }

        let align = attr("align")
            .and_then(Value::as_str)
            .and_then(ImageAlign::parse)
            .unwrap_or_default();
        let header = attr("header").and_then(Value::as_u64).map(|h| h.clamp(1, 6) as u8);
        let empty_line = items.is_empty();

        let mut spans: Vec<InlineSpan> = Vec::new();
        for item in items {
            match item {
                Item::Text(span) => spans.push(span),
                Item::Formula(tex) => {
                    self.flush_text(&mut spans, header);
                    self.nodes.push(Node::FormulaInline { tex });
                }
                Item::Image(mut img) => {
                    self.flush_text(&mut spans, header);
                    img.align = align;
                    self.nodes.push(Node::Image(img));
                }
            }
        }
        // A bare `\n` is an empty paragraph.
        if !spans.is_empty() || (empty_line && terminated) {
            self.push_block(spans, header);
        }
    }

    fn flush_text(&mut self, spans: &mut Vec<InlineSpan>, header: Option<u8>) {
        if !spans.is_empty() {
            self.push_block(std::mem::take(spans), header);
        }
    }

    fn push_block(&mut self, spans: Vec<InlineSpan>, header: Option<u8>) {
        let text: String = spans.iter().map(|s| s.text.as_str()).collect();
        let spans = normalize_spans(spans);
        self.nodes.push(match header {
            Some(level) => Node::Heading { level, text, spans },
            None => Node::Paragraph { text, spans },
        });
    }
}

fn style_from(attrs: Option<&Value>) -> InlineStyle {
    let flag = |key: &str| {
        attrs
            .and_then(|a| a.get(key))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    };
    let string = |key: &str| {
        attrs
            .and_then(|a| a.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    InlineStyle {
        bold: flag("bold"),
        italic: flag("italic"),
        underline: flag("underline"),
        code: flag("code"),
        link: string("link"),
        color: string("color"),
        highlight: string("background"),
        // Quill's named sizes ("small", "large") carry no pixel value.
        font_size_px: string("size").and_then(|s| s.trim_end_matches("px").parse().ok()),
    }
}

fn image_from(src: &str, attrs: Option<&Value>) -> ImageAttrs {
    let get = |key: &str| attrs.and_then(|a| a.get(key));
    let px = |v: &Value| {
        v.as_u64()
            .map(|n| n as u32)
            .or_else(|| v.as_str().and_then(|s| s.trim_end_matches("px").parse().ok()))
            .filter(|n| *n > 0)
    };
    let mut img = ImageAttrs::new(src, get("alt").and_then(Value::as_str).unwrap_or_default());
    img.width_px = get("width").and_then(px);
    img.radius_px = get("radius").and_then(px);
    img.link = get("link").and_then(Value::as_str).map(str::to_string);
    img
}

/// Build a document from a Delta value. Malformed ops are skipped.
pub fn from_delta(delta: &Value) -> Doc {
    let mut line = LineBuilder::default();
    let ops = delta
        .get("ops")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for op in ops {
        let Some(insert) = op.get("insert") else {
            continue;
        };
        let attrs = op.get("attributes");

        if let Some(s) = insert.as_str() {
            if s == "\n" {
                line.end_line(attrs, true);
                continue;
            }
            let style = style_from(attrs);
            let mut parts = s.split('\n').peekable();
            while let Some(part) = parts.next() {
                if !part.is_empty() {
                    line.items.push(Item::Text(InlineSpan {
                        text: part.to_string(),
                        style: style.clone(),
                    }));
                }
                if parts.peek().is_some() {
                    line.end_line(None, true);
                }
            }
        } else if let Some(embed) = insert.as_object() {
            if let Some(src) = embed.get("image").and_then(Value::as_str) {
                line.items.push(Item::Image(image_from(src, attrs)));
            } else if let Some(tex) = embed.get("formula").and_then(Value::as_str) {
                line.items.push(Item::Formula(tex.to_string()));
            }
        }
    }
    if !line.items.is_empty() {
        line.end_line(None, false);
    }
    Doc::new(line.nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exports_headings_and_marks() {
        let doc = Doc::new(vec![
            Node::heading(2, "Title"),
            Node::Paragraph {
                text: "ab".into(),
                spans: Some(vec![
                    InlineSpan::plain("a"),
                    InlineSpan {
                        text: "b".into(),
                        style: InlineStyle {
                            bold: true,
                            ..Default::default()
                        },
                    },
                ]),
            },
        ]);
        assert_eq!(
            to_delta(&doc),
            json!({ "ops": [
                { "insert": "Title" },
                { "insert": "\n", "attributes": { "header": 2 } },
                { "insert": "a" },
                { "insert": "b", "attributes": { "bold": true } },
                { "insert": "\n" },
            ]})
        );
    }

    #[test]
    fn delta_round_trip_keeps_supported_nodes() {
        let mut img = ImageAttrs::new("a.png", "pic");
        img.align = ImageAlign::Center;
        img.width_px = Some(300);
        img.link = Some("https://x".into());
        let doc = Doc::new(vec![
            Node::heading(1, "T"),
            Node::paragraph("body"),
            Node::paragraph(""),
            Node::Image(img),
            Node::FormulaBlock { tex: "x^2".into() },
            Node::FormulaInline { tex: "y".into() },
            Node::paragraph("after"),
            Node::InfoBox {
                kind: "note".into(),
                text: "l1\nl2".into(),
            },
        ]);
        let back = from_delta(&to_delta(&doc));
        assert_eq!(back.nodes, doc.nodes);
    }

    #[test]
    fn tables_media_and_questions_are_skipped() {
        let doc = Doc::new(vec![
            Node::Table(crate::doc::Table::new(1, 1)),
            Node::Media {
                key: "k".into(),
                content_type: "video/mp4".into(),
            },
            Node::Mcq(crate::doc::McqBlock::template(false)),
        ]);
        assert_eq!(to_delta(&doc), json!({ "ops": [] }));
    }

    #[test]
    fn color_background_and_size_attributes() {
        let doc = Doc::new(vec![Node::Paragraph {
            text: "big".into(),
            spans: Some(vec![InlineSpan {
                text: "big".into(),
                style: InlineStyle {
                    color: Some("#123".into()),
                    highlight: Some("#ff0".into()),
                    font_size_px: Some(24),
                    ..Default::default()
                },
            }]),
        }]);
        let delta = to_delta(&doc);
        assert_eq!(
            delta["ops"][0],
            json!({ "insert": "big", "attributes": { "color": "#123", "background": "#ff0", "size": "24px" } })
        );
        assert_eq!(from_delta(&delta).nodes, doc.nodes);

        let named = from_delta(&json!({ "ops": [
            { "insert": "x", "attributes": { "size": "large" } },
            { "insert": "\n" },
        ]}));
        assert_eq!(named.nodes, vec![Node::paragraph("x")]);
    }

    #[test]
    fn multi_line_inserts_split_into_paragraphs() {
        let delta = json!({ "ops": [{ "insert": "one\ntwo\n" }] });
        let doc = from_delta(&delta);
        assert_eq!(doc.nodes, vec![Node::paragraph("one"), Node::paragraph("two")]);
    }

    #[test]
    fn trailing_text_without_newline_is_kept() {
        let doc = from_delta(&json!({ "ops": [{ "insert": "tail" }] }));
        assert_eq!(doc.nodes, vec![Node::paragraph("tail")]);
    }

    #[test]
    fn garbage_is_ignored() {
        assert!(from_delta(&json!({ "nope": 1 })).is_empty());
        assert!(from_delta(&json!({ "ops": [1, { "retain": 3 }] })).is_empty());
    }
}
