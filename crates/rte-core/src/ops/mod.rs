//! Editing operations on a [`Doc`].
//!
//! Every operation validates its indices first, then records exactly one
//! history snapshot and mutates. Rejected operations leave both the document
//! and the history untouched.

mod nodes;
mod style;
mod table;

pub use nodes::*;
pub use style::*;
pub use table::*;

use rte_common::DocError;

use crate::doc::{Doc, Node, Table};

pub(crate) fn check_node(doc: &Doc, index: usize) -> Result<&Node, DocError> {
    doc.nodes.get(index).ok_or(DocError::NodeOutOfRange {
        index,
        len: doc.nodes.len(),
    })
}

pub(crate) fn table_ref(doc: &Doc, index: usize) -> Result<&Table, DocError> {
    match check_node(doc, index)? {
        Node::Table(t) => Ok(t),
        _ => Err(DocError::NotATable(index)),
    }
}

pub(crate) fn table_mut(doc: &mut Doc, index: usize) -> Result<&mut Table, DocError> {
    let len = doc.nodes.len();
    match doc.nodes.get_mut(index) {
        Some(Node::Table(t)) => Ok(t),
        Some(_) => Err(DocError::NotATable(index)),
        None => Err(DocError::NodeOutOfRange { index, len }),
    }
}

/// Position right after `after_index`, clamped to the end of the document.
pub(crate) fn insertion_point(doc: &Doc, after_index: Option<usize>) -> usize {
    match after_index {
        Some(i) => (i + 1).min(doc.nodes.len()),
        None => doc.nodes.len(),
    }
}
