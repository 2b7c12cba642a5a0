use rte_common::DocError;

use crate::doc::{Doc, McqBlock, McqOption, Node, Table};
use crate::history::History;
use crate::image::{ImageAttrs, ImageLimits, ImagePatch};

use super::{check_node, insertion_point};

/// Insert a paragraph at `at` (clamped to the document length).
pub fn insert_paragraph(doc: &mut Doc, at: usize, text: &str, history: &mut History) {
    history.record_before_change(doc);
    let idx = at.min(doc.nodes.len());
    doc.nodes.insert(idx, Node::paragraph(text));
}

/// Replace the text of a paragraph or heading. Inline styling is dropped.
pub fn set_paragraph_text(
    doc: &mut Doc,
    index: usize,
    new_text: &str,
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
        *text = new_text.to_string();
        *spans = None;
    }
    Ok(())
}

pub fn insert_heading(doc: &mut Doc, at: usize, level: u8, text: &str, history: &mut History) {
    history.record_before_change(doc);
    let idx = at.min(doc.nodes.len());
    doc.nodes.insert(idx, Node::heading(level, text));
}

/// Insert a `rows` x `cols` table after `after_index` (or at the end).
pub fn insert_table_at(
    doc: &mut Doc,
    after_index: Option<usize>,
    rows: usize,
    cols: usize,
    history: &mut History,
) -> usize {
    history.record_before_change(doc);
    let at = insertion_point(doc, after_index);
    doc.nodes
        .insert(at, Node::Table(Table::new(rows.max(1), cols.max(1))));
    at
}

pub fn insert_image_at(
    doc: &mut Doc,
    after_index: Option<usize>,
    src: &str,
    alt: &str,
    history: &mut History,
) -> usize {
    history.record_before_change(doc);
    let at = insertion_point(doc, after_index);
    doc.nodes.insert(at, Node::Image(ImageAttrs::new(src, alt)));
    at
}

/// Apply one image-menu interaction to the image at `index`.
pub fn set_image_attrs(
    doc: &mut Doc,
    index: usize,
    patch: &ImagePatch,
    limits: ImageLimits,
    history: &mut History,
) -> Result<(), DocError> {
    if !matches!(check_node(doc, index)?, Node::Image(_)) {
        return Err(DocError::NotAnImage(index));
    }
    history.record_before_change(doc);
    if let Some(Node::Image(img)) = doc.nodes.get_mut(index) {
        img.apply(patch, limits);
    }
    Ok(())
}

/// Swap the image source, keeping every other attribute. A blank source is
/// rejected as an invalid style.
pub fn replace_image(
    doc: &mut Doc,
    index: usize,
    src: &str,
    history: &mut History,
) -> Result<(), DocError> {
    if !matches!(check_node(doc, index)?, Node::Image(_)) {
        return Err(DocError::NotAnImage(index));
    }
    if src.trim().is_empty() {
        return Err(DocError::InvalidStyle("empty image source".into()));
    }
    history.record_before_change(doc);
    if let Some(Node::Image(img)) = doc.nodes.get_mut(index) {
        img.src = src.trim().to_string();
    }
    Ok(())
}

pub fn insert_formula_inline_at(
    doc: &mut Doc,
    after_index: Option<usize>,
    tex: &str,
    history: &mut History,
) -> usize {
    history.record_before_change(doc);
    let at = insertion_point(doc, after_index);
    doc.nodes.insert(
        at,
        Node::FormulaInline {
            tex: tex.to_string(),
        },
    );
    at
}

pub fn insert_formula_block_at(
    doc: &mut Doc,
    after_index: Option<usize>,
    tex: &str,
    history: &mut History,
) -> usize {
    history.record_before_change(doc);
    let at = insertion_point(doc, after_index);
    doc.nodes.insert(
        at,
        Node::FormulaBlock {
            tex: tex.to_string(),
        },
    );
    at
}

pub fn insert_infobox(doc: &mut Doc, kind: &str, text: &str, history: &mut History) -> usize {
    history.record_before_change(doc);
    doc.nodes.push(Node::InfoBox {
        kind: kind.to_string(),
        text: text.to_string(),
    });
    doc.nodes.len() - 1
}

pub fn update_infobox(
    doc: &mut Doc,
    index: usize,
    kind: Option<&str>,
    text: Option<&str>,
    history: &mut History,
) -> Result<(), DocError> {
    if !matches!(check_node(doc, index)?, Node::InfoBox { .. }) {
        return Err(DocError::NotAnInfoBox(index));
    }
    history.record_before_change(doc);
    if let Some(Node::InfoBox { kind: k, text: t }) = doc.nodes.get_mut(index) {
        if let Some(kind) = kind {
            *k = kind.to_string();
        }
        if let Some(text) = text {
            *t = text.to_string();
        }
    }
    Ok(())
}

/// Insert a media placeholder after `after_index` (or at the end).
pub fn insert_media_at(
    doc: &mut Doc,
    after_index: Option<usize>,
    key: &str,
    content_type: &str,
    history: &mut History,
) -> usize {
    history.record_before_change(doc);
    let at = insertion_point(doc, after_index);
    doc.nodes.insert(
        at,
        Node::Media {
            key: key.to_string(),
            content_type: content_type.to_string(),
        },
    );
    at
}

/// Append a question with four blank options; returns its index.
pub fn insert_mcq(doc: &mut Doc, multiple: bool, history: &mut History) -> usize {
    history.record_before_change(doc);
    doc.nodes.push(Node::Mcq(McqBlock::template(multiple)));
    doc.nodes.len() - 1
}

/// Replace any of the question text, the options and the multiple-answer
/// flag. A single-choice result may mark at most one option correct.
pub fn update_mcq(
    doc: &mut Doc,
    index: usize,
    question: Option<&str>,
    options: Option<Vec<McqOption>>,
    multiple: Option<bool>,
    history: &mut History,
) -> Result<(), DocError> {
    let Node::Mcq(current) = check_node(doc, index)? else {
        return Err(DocError::NotAnMcq(index));
    };
    let multiple = multiple.unwrap_or(current.multiple);
    let correct = match &options {
        Some(opts) => opts.iter().filter(|o| o.correct).count(),
        None => current.correct_count(),
    };
    if !multiple && correct > 1 {
        return Err(DocError::TooManyCorrect(correct));
    }

    history.record_before_change(doc);
    if let Some(Node::Mcq(block)) = doc.nodes.get_mut(index) {
        if let Some(q) = question {
            block.question = q.to_string();
        }
        if let Some(opts) = options {
            block.options = opts;
        }
        block.multiple = multiple;
    }
    Ok(())
}

/// Delete the node at `at`.
pub fn delete_node(doc: &mut Doc, at: usize, history: &mut History) -> Result<Node, DocError> {
    check_node(doc, at)?;
    history.record_before_change(doc);
    Ok(doc.nodes.remove(at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageAlign;

    #[test]
    fn insert_paragraph_clamps_position() {
        let mut doc = Doc::default();
        let mut h = History::new();
        insert_paragraph(&mut doc, 10, "a", &mut h);
        insert_paragraph(&mut doc, 0, "b", &mut h);
        assert_eq!(doc.plain_text(), "b\na");
        assert_eq!(h.undo_depth(), 2);
    }

    #[test]
    fn set_text_rejects_non_paragraph() {
        let mut doc = Doc::new(vec![Node::FormulaBlock { tex: "x".into() }]);
        let mut h = History::new();
        assert_eq!(
            set_paragraph_text(&mut doc, 0, "y", &mut h),
            Err(DocError::NotAParagraph(0))
        );
        assert!(!h.can_undo());
    }

    #[test]
    fn set_text_out_of_range() {
        let mut doc = Doc::default();
        let mut h = History::new();
        assert_eq!(
            set_paragraph_text(&mut doc, 3, "y", &mut h),
            Err(DocError::NodeOutOfRange { index: 3, len: 0 })
        );
    }

    #[test]
    fn insert_after_index() {
        let mut doc = Doc::new(vec![Node::paragraph("a"), Node::paragraph("b")]);
        let mut h = History::new();
        let at = insert_formula_block_at(&mut doc, Some(0), "e=mc^2", &mut h);
        assert_eq!(at, 1);
        assert!(matches!(doc.nodes[1], Node::FormulaBlock { .. }));

        let at = insert_image_at(&mut doc, Some(99), "x.png", "x", &mut h);
        assert_eq!(at, 3);
    }

    #[test]
    fn image_menu_patch_applies() {
        let mut doc = Doc::new(vec![Node::Image(ImageAttrs::new("a.png", ""))]);
        let mut h = History::new();
        let patch = ImagePatch {
            align: Some(ImageAlign::Right),
            alt: Some("diagram".into()),
            ..Default::default()
        };
        set_image_attrs(&mut doc, 0, &patch, ImageLimits::default(), &mut h).unwrap();
        match &doc.nodes[0] {
            Node::Image(img) => {
                assert_eq!(img.align, ImageAlign::Right);
                assert_eq!(img.alt, "diagram");
            }
            other => panic!("expected image, got {other:?}"),
        }
    }

    #[test]
    fn image_patch_on_paragraph_fails() {
        let mut doc = Doc::new(vec![Node::paragraph("a")]);
        let mut h = History::new();
        let err = set_image_attrs(
            &mut doc,
            0,
            &ImagePatch::default(),
            ImageLimits::default(),
            &mut h,
        )
        .unwrap_err();
        assert_eq!(err, DocError::NotAnImage(0));
    }

    #[test]
    fn infobox_update_is_partial() {
        let mut doc = Doc::default();
        let mut h = History::new();
        let idx = insert_infobox(&mut doc, "note", "hello", &mut h);
        update_infobox(&mut doc, idx, None, Some("bye"), &mut h).unwrap();
        assert_eq!(
            doc.nodes[idx],
            Node::InfoBox {
                kind: "note".into(),
                text: "bye".into()
            }
        );
    }

    fn option(text: &str, correct: bool) -> McqOption {
        McqOption {
            text: text.into(),
            correct,
        }
    }

    #[test]
    fn mcq_insert_then_update() {
        let mut doc = Doc::new(vec![Node::paragraph("intro")]);
        let mut h = History::new();
        let idx = insert_mcq(&mut doc, false, &mut h);
        assert_eq!(idx, 1);

        let opts = vec![option("4", true), option("5", false)];
        update_mcq(&mut doc, idx, Some("2 + 2?"), Some(opts), None, &mut h).unwrap();
        let Node::Mcq(block) = &doc.nodes[idx] else {
            panic!("expected mcq");
        };
        assert_eq!(block.question, "2 + 2?");
        assert_eq!(block.options.len(), 2);
        assert!(!block.multiple);
        assert_eq!(h.undo_depth(), 2);
    }

    #[test]
    fn single_choice_rejects_two_correct_options() {
        let mut doc = Doc::default();
        let mut h = History::new();
        let idx = insert_mcq(&mut doc, false, &mut h);
        let opts = vec![option("a", true), option("b", true)];
        assert_eq!(
            update_mcq(&mut doc, idx, None, Some(opts.clone()), None, &mut h),
            Err(DocError::TooManyCorrect(2))
        );
        assert_eq!(h.undo_depth(), 1);

        // Switching to multiple answers in the same update is accepted.
        update_mcq(&mut doc, idx, None, Some(opts), Some(true), &mut h).unwrap();
        // Going back to single choice with both still marked is not.
        assert_eq!(
            update_mcq(&mut doc, idx, None, None, Some(false), &mut h),
            Err(DocError::TooManyCorrect(2))
        );
    }

    #[test]
    fn update_mcq_on_paragraph_fails() {
        let mut doc = Doc::new(vec![Node::paragraph("a")]);
        let mut h = History::new();
        assert_eq!(
            update_mcq(&mut doc, 0, Some("q"), None, None, &mut h),
            Err(DocError::NotAnMcq(0))
        );
        assert!(!h.can_undo());
    }

    #[test]
    fn media_is_inserted_after_index() {
        let mut doc = Doc::new(vec![Node::paragraph("a"), Node::paragraph("b")]);
        let mut h = History::new();
        let at = insert_media_at(&mut doc, Some(0), "uploads/clip", "video/mp4", &mut h);
        assert_eq!(at, 1);
        assert_eq!(doc.nodes[1].kind(), "media");
    }

    #[test]
    fn delete_returns_removed_node() {
        let mut doc = Doc::new(vec![Node::paragraph("a"), Node::paragraph("b")]);
        let mut h = History::new();
        let removed = delete_node(&mut doc, 0, &mut h).unwrap();
        assert_eq!(removed, Node::paragraph("a"));
        assert_eq!(doc.nodes.len(), 1);
        assert!(delete_node(&mut doc, 5, &mut h).is_err());
        assert_eq!(h.undo_depth(), 1);
    }

    #[test]
    fn replace_image_keeps_other_attrs() {
        let mut doc = Doc::default();
        let mut h = History::new();
        let idx = insert_image_at(&mut doc, None, "a.png", "alt", &mut h);
        let patch = ImagePatch {
            width_px: Some(200),
            ..Default::default()
        };
        set_image_attrs(&mut doc, idx, &patch, ImageLimits::default(), &mut h).unwrap();
        replace_image(&mut doc, idx, " b.png ", &mut h).unwrap();
        match &doc.nodes[idx] {
            Node::Image(img) => {
                assert_eq!(img.src, "b.png");
                assert_eq!(img.width_px, Some(200));
            }
            other => panic!("expected image, got {other:?}"),
        }
        assert!(replace_image(&mut doc, idx, "  ", &mut h).is_err());
        assert_eq!(h.undo_depth(), 3);
    }
}
