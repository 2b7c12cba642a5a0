//! HTML codec for documents.
//!
//! The editor page exchanges content as HTML fragments; these two functions
//! convert between that form and [`Doc`](crate::doc::Doc).

mod export;
mod import;

pub use export::to_html;
pub use import::from_html;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{
        BorderStyle, CellStyle, Doc, InlineSpan, InlineStyle, McqBlock, McqOption, Node, Table,
        TableCell,
    };
    use crate::history::History;
    use crate::image::{ImageAlign, ImageAttrs};
    use crate::ops;

    fn sample() -> Doc {
        let mut table = Table::new(2, 3);
        table.freeze_header = true;
        table.column_widths[1] = 200;
        if let Some(c) = table.cell_mut(0, 0) {
            c.text = "a & b".into();
            c.colspan = 2;
            c.style = CellStyle {
                background: Some("#eee".into()),
                border: Some(BorderStyle {
                    color: "#333".into(),
                    width_px: 1,
                }),
            };
        }
        if let Some(c) = table.cell_mut(0, 1) {
            *c = TableCell {
                placeholder: true,
                ..Default::default()
            };
        }
        if let Some(c) = table.cell_mut(1, 2) {
            c.text = "x<y".into();
            c.spans = Some(vec![
                InlineSpan::plain("x"),
                InlineSpan {
                    text: "<y".into(),
                    style: InlineStyle {
                        bold: true,
                        ..Default::default()
                    },
                },
            ]);
        }
        table.rows[1].height_px = Some(36);

        let mut img = ImageAttrs::new("pic.png", "A \"quoted\" alt");
        img.align = ImageAlign::Center;
        img.width_px = Some(320);
        img.radius_px = Some(8);
        img.link = Some("https://example.com/?a=1&b=2".into());

        Doc::new(vec![
            Node::heading(2, "Title"),
            Node::Paragraph {
                text: "plain bold link".into(),
                spans: Some(vec![
                    InlineSpan::plain("plain "),
                    InlineSpan {
                        text: "bold".into(),
                        style: InlineStyle {
                            bold: true,
                            italic: true,
                            ..Default::default()
                        },
                    },
                    InlineSpan {
                        text: " link".into(),
                        style: InlineStyle {
                            link: Some("https://a.b".into()),
                            ..Default::default()
                        },
                    },
                ]),
            },
            Node::Paragraph {
                text: "hot pink".into(),
                spans: Some(vec![
                    InlineSpan {
                        text: "hot".into(),
                        style: InlineStyle {
                            italic: true,
                            color: Some("#f0a".into()),
                            highlight: Some("yellow".into()),
                            font_size_px: Some(18),
                            ..Default::default()
                        },
                    },
                    InlineSpan::plain(" pink"),
                ]),
            },
            Node::paragraph("line one\nline two"),
            Node::paragraph(""),
            Node::Table(table),
            Node::Image(img),
            Node::FormulaInline { tex: "a<b".into() },
            Node::FormulaBlock {
                tex: "\\frac{1}{2}".into(),
            },
            Node::InfoBox {
                kind: "warning".into(),
                text: "careful".into(),
            },
            Node::CommentAnchor {
                thread_id: "t-1".into(),
            },
            Node::Media {
                key: "uploads/a&b.mp4".into(),
                content_type: "video/mp4".into(),
            },
            Node::Mcq(McqBlock {
                question: "Pick <one>".into(),
                options: vec![
                    McqOption {
                        text: "yes".into(),
                        correct: true,
                    },
                    McqOption {
                        text: "no".into(),
                        correct: false,
                    },
                ],
                multiple: false,
            }),
        ])
    }

    #[test]
    fn export_is_compact() {
        let html = to_html(&Doc::new(vec![Node::paragraph("a"), Node::heading(1, "b")]));
        assert_eq!(html, "<p>a</p><h1>b</h1>");
    }

    #[test]
    fn export_escapes_text_and_attributes() {
        let html = to_html(&Doc::new(vec![Node::paragraph("<script>&")]));
        assert_eq!(html, "<p>&lt;script&gt;&amp;</p>");
    }

    #[test]
    fn export_renders_image_menu_attributes() {
        let mut img = ImageAttrs::new("a.png", "");
        img.align = ImageAlign::Left;
        img.width_px = Some(100);
        let html = to_html(&Doc::new(vec![Node::Image(img)]));
        assert_eq!(
            html,
            "<img src=\"a.png\" alt=\"\" data-align=\"left\" \
             style=\"width:100px;float:left;margin:0 1em 1em 0\">"
        );
    }

    #[test]
    fn export_renders_new_block_kinds() {
        let doc = Doc::new(vec![
            Node::Media {
                key: "k".into(),
                content_type: "audio/ogg".into(),
            },
            Node::Mcq(McqBlock::template(true)),
        ]);
        let html = to_html(&doc);
        assert!(html.starts_with("<div data-media key=\"k\" type=\"audio/ogg\"></div>"));
        assert!(html.contains("<div class=\"mcq\" data-multiple=\"true\"><div class=\"mcq-question\">New question</div>"));
        assert!(html.contains("<div class=\"mcq-option\" data-correct=\"false\">Option C</div>"));
    }

    #[test]
    fn export_styled_span_and_row_height() {
        let mut table = Table::new(1, 1);
        table.rows[0].height_px = Some(24);
        let doc = Doc::new(vec![
            Node::Paragraph {
                text: "red".into(),
                spans: Some(vec![InlineSpan {
                    text: "red".into(),
                    style: InlineStyle {
                        bold: true,
                        color: Some("red".into()),
                        ..Default::default()
                    },
                }]),
            },
            Node::Table(table),
        ]);
        let html = to_html(&doc);
        assert!(html.starts_with("<p><strong><span style=\"color:red\">red</span></strong></p>"));
        assert!(html.contains("<tr style=\"height:24px\"><td></td></tr>"));
    }

    #[test]
    fn import_reproduces_exported_document() {
        let doc = sample();
        let back = from_html(&to_html(&doc));
        assert_eq!(back.nodes, doc.nodes);
    }

    #[test]
    fn html_round_trip_is_stable() {
        let first = to_html(&sample());
        let second = to_html(&from_html(&first));
        assert_eq!(first, second);
    }

    #[test]
    fn foreign_markup_round_trip_is_stable() {
        let foreign = "<div>Intro <b>bold</b></div>\n<ul><li>one</li><li>two</li></ul>\
                       <table><tr><th>h</th></tr><tr><td>v</td></tr></table>";
        let once = to_html(&from_html(foreign));
        let twice = to_html(&from_html(&once));
        assert_eq!(once, twice);
        assert!(once.starts_with("<p>Intro <strong>bold</strong></p>"));
    }

    fn assert_stable(doc: &Doc) {
        let first = to_html(doc);
        let second = to_html(&from_html(&first));
        assert_eq!(first, second, "unstable export for {:?}", doc.nodes);
    }

    #[test]
    fn blank_line_paragraphs_round_trip() {
        for text in ["", "\n", "\n\n", " ", "   ", "\t", "a\n", "\na"] {
            assert_stable(&Doc::new(vec![Node::paragraph(text)]));
        }
    }

    #[test]
    fn single_break_is_an_empty_line() {
        let html = to_html(&Doc::new(vec![Node::paragraph("\n"), Node::paragraph("")]));
        assert_eq!(html, "<p><br></p><p><br></p>");
        assert_eq!(
            from_html(&html).nodes,
            vec![Node::paragraph(""), Node::paragraph("")]
        );
    }

    #[test]
    fn double_break_survives_import() {
        let doc = Doc::new(vec![Node::paragraph("\n\n")]);
        let html = to_html(&doc);
        assert_eq!(html, "<p><br><br></p>");
        assert_eq!(from_html(&html).nodes, doc.nodes);
    }

    #[test]
    fn whitespace_only_paragraph_is_kept() {
        let doc = Doc::new(vec![Node::paragraph("  "), Node::paragraph("x")]);
        assert_eq!(from_html(&to_html(&doc)).nodes, doc.nodes);
    }

    #[test]
    fn styled_break_and_empty_blocks_round_trip() {
        let bold_break = Node::Paragraph {
            text: "\n".into(),
            spans: Some(vec![InlineSpan {
                text: "\n".into(),
                style: InlineStyle {
                    bold: true,
                    ..Default::default()
                },
            }]),
        };
        assert_stable(&Doc::new(vec![
            bold_break,
            Node::heading(2, ""),
            Node::heading(3, "\n"),
            Node::InfoBox {
                kind: "note".into(),
                text: String::new(),
            },
            Node::InfoBox {
                kind: "note".into(),
                text: "\n".into(),
            },
            Node::FormulaBlock { tex: "\n".into() },
            Node::FormulaBlock { tex: String::new() },
        ]));
    }

    #[test]
    fn formula_block_newline_is_not_an_empty_line() {
        let doc = Doc::new(vec![Node::FormulaBlock { tex: "\n".into() }]);
        assert_eq!(from_html(&to_html(&doc)).nodes, doc.nodes);
    }

    #[test]
    fn merged_table_round_trips() {
        let mut doc = Doc::default();
        let mut h = History::new();
        let at = ops::insert_table_at(&mut doc, None, 3, 3, &mut h);
        for (r, c, text) in [(0, 0, "a"), (0, 1, "b"), (1, 0, "c"), (2, 2, "z")] {
            ops::set_cell_text(&mut doc, at, r, c, text, &mut h).unwrap();
        }
        ops::merge_cells(&mut doc, at, (0, 0), (1, 1), &mut h).unwrap();

        let html = to_html(&doc);
        assert!(html.contains("<td colspan=\"2\" rowspan=\"2\">a b c</td>"));
        assert_eq!(from_html(&html).nodes, doc.nodes);
        assert_stable(&doc);

        ops::merge_cells(&mut doc, at, (2, 1), (2, 2), &mut h).unwrap();
        assert_eq!(from_html(&to_html(&doc)).nodes, doc.nodes);
        assert_stable(&doc);

        ops::split_cell(&mut doc, at, 0, 0, &mut h).unwrap();
        assert_eq!(from_html(&to_html(&doc)).nodes, doc.nodes);
    }

    #[test]
    fn empty_input_is_empty_doc() {
        assert!(from_html("").is_empty());
        assert!(from_html("   \n ").is_empty());
        assert_eq!(to_html(&Doc::default()), "");
    }
}
