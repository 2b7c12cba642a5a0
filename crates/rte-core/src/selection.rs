//! Selection anchors and how they move when table structure changes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    Text {
        node_index: usize,
        char_offset: usize,
    },
    TableCell {
        table_node_index: usize,
        row: usize,
        col: usize,
        char_offset: usize,
    },
}

impl Default for Anchor {
    fn default() -> Self {
        Anchor::Text {
            node_index: 0,
            char_offset: 0,
        }
    }
}

impl Anchor {
    fn sort_key(&self) -> (usize, usize, usize, usize) {
        match *self {
            Anchor::Text {
                node_index,
                char_offset,
            } => (node_index, 0, 0, char_offset),
            Anchor::TableCell {
                table_node_index,
                row,
                col,
                char_offset,
            } => (table_node_index, row, col, char_offset),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SelectionRange {
    pub start: Anchor,
    pub end: Anchor,
}

impl SelectionRange {
    pub fn collapsed(at: Anchor) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Order the anchors so that `start` precedes `end` in document order.
    pub fn normalize(&mut self) {
        if self.end.sort_key() < self.start.sort_key() {
            std::mem::swap(&mut self.start, &mut self.end);
        }
    }

    pub fn map_table_row_insert(&mut self, table_node_index: usize, at_row: usize) {
        for a in [&mut self.start, &mut self.end] {
            if let Anchor::TableCell {
                table_node_index: tni,
                row,
                ..
            } = a
            {
                if *tni == table_node_index && *row >= at_row {
                    *row += 1;
                }
            }
        }
    }

    pub fn map_table_col_insert(&mut self, table_node_index: usize, at_col: usize) {
        for a in [&mut self.start, &mut self.end] {
            if let Anchor::TableCell {
                table_node_index: tni,
                col,
                ..
            } = a
            {
                if *tni == table_node_index && *col >= at_col {
                    *col += 1;
                }
            }
        }
    }

    /// Anchors inside the deleted row move to the row that takes its place.
    pub fn map_table_row_delete(&mut self, table_node_index: usize, at_row: usize) {
        for a in [&mut self.start, &mut self.end] {
            if let Anchor::TableCell {
                table_node_index: tni,
                row,
                char_offset,
                ..
            } = a
            {
                if *tni != table_node_index {
                    continue;
                }
                if *row == at_row {
                    *char_offset = 0;
                } else if *row > at_row {
                    *row -= 1;
                }
            }
        }
    }

    pub fn map_table_row_move(&mut self, table_node_index: usize, from: usize, to: usize) {
        for a in [&mut self.start, &mut self.end] {
            if let Anchor::TableCell {
                table_node_index: tni,
                row,
                ..
            } = a
            {
                if *tni == table_node_index {
                    *row = map_moved_index(*row, from, to);
                }
            }
        }
    }

    pub fn map_table_col_move(&mut self, table_node_index: usize, from: usize, to: usize) {
        for a in [&mut self.start, &mut self.end] {
            if let Anchor::TableCell {
                table_node_index: tni,
                col,
                ..
            } = a
            {
                if *tni == table_node_index {
                    *col = map_moved_index(*col, from, to);
                }
            }
        }
    }

    /// Anchors inside a merged area collapse onto its top-left cell.
    pub fn map_table_merge(
        &mut self,
        table_node_index: usize,
        sr: usize,
        sc: usize,
        er: usize,
        ec: usize,
    ) {
        let (min_r, min_c, max_r, max_c) = (sr.min(er), sc.min(ec), sr.max(er), sc.max(ec));
        for a in [&mut self.start, &mut self.end] {
            if let Anchor::TableCell {
                table_node_index: tni,
                row,
                col,
                ..
            } = a
            {
                if *tni == table_node_index
                    && (min_r..=max_r).contains(row)
                    && (min_c..=max_c).contains(col)
                {
                    *row = min_r;
                    *col = min_c;
                }
            }
        }
    }
}

fn map_moved_index(idx: usize, from: usize, to: usize) -> usize {
    if idx == from {
        to
    } else if from < to && idx > from && idx <= to {
        idx - 1
    } else if to < from && idx >= to && idx < from {
        idx + 1
    } else {
        idx
    }
}
