//! Snapshot undo/redo history for the document.

use std::collections::VecDeque;

use crate::doc::Doc;

pub const DEFAULT_MAX_DEPTH: usize = 100;

#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<Doc>,
    redo_stack: Vec<Doc>,
    max_depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Record the current state before making a change. Drops the oldest
    /// snapshot once `max_depth` is reached.
    pub fn record_before_change(&mut self, current: &Doc) {
        if self.undo_stack.len() == self.max_depth {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(current.clone());
        self.redo_stack.clear();
    }

    /// Undo into the provided doc. Returns true if a change occurred.
    pub fn undo(&mut self, doc: &mut Doc) -> bool {
        match self.undo_stack.pop_back() {
            Some(prev) => {
                self.redo_stack.push(std::mem::replace(doc, prev));
                true
            }
            None => false,
        }
    }

    /// Redo into the provided doc. Returns true if a change occurred.
    pub fn redo(&mut self, doc: &mut Doc) -> bool {
        match self.redo_stack.pop() {
            Some(next) => {
                self.undo_stack.push_back(std::mem::replace(doc, next));
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::Node;

    fn doc(text: &str) -> Doc {
        Doc::new(vec![Node::paragraph(text)])
    }

    #[test]
    fn undo_then_redo_restores() {
        let mut h = History::new();
        let mut d = doc("a");
        h.record_before_change(&d);
        d = doc("b");

        assert!(h.undo(&mut d));
        assert_eq!(d, doc("a"));
        assert!(h.redo(&mut d));
        assert_eq!(d, doc("b"));
        assert!(!h.redo(&mut d));
    }

    #[test]
    fn new_change_clears_redo() {
        let mut h = History::new();
        let mut d = doc("a");
        h.record_before_change(&d);
        d = doc("b");
        h.undo(&mut d);
        assert!(h.can_redo());

        h.record_before_change(&d);
        assert!(!h.can_redo());
    }

    #[test]
    fn depth_is_bounded() {
        let mut h = History::with_max_depth(3);
        for i in 0..10 {
            h.record_before_change(&doc(&i.to_string()));
        }
        assert_eq!(h.undo_depth(), 3);

        let mut d = doc("current");
        h.undo(&mut d);
        assert_eq!(d, doc("9"));
    }

    #[test]
    fn undo_on_empty_is_noop() {
        let mut h = History::new();
        let mut d = doc("a");
        assert!(!h.undo(&mut d));
        assert_eq!(d, doc("a"));
    }
}
