//! Table structure and cell operations, addressed by the table's node index.

use rte_common::DocError;

use crate::doc::{
    normalize_spans, CellStyle, Doc, InlineSpan, TableCell, TableRow, DEFAULT_COLUMN_WIDTH,
    MIN_ROW_HEIGHT,
};
use crate::history::History;

use super::{table_mut, table_ref};

fn check_cell(doc: &Doc, table: usize, row: usize, col: usize) -> Result<(), DocError> {
    table_ref(doc, table)?
        .cell(row, col)
        .map(|_| ())
        .ok_or(DocError::CellOutOfRange { row, col })
}

/// Insert an empty row at `at` (clamped to the row count).
pub fn add_row(doc: &mut Doc, table: usize, at: usize, history: &mut History) -> Result<(), DocError> {
    table_ref(doc, table)?;
    history.record_before_change(doc);
    let t = table_mut(doc, table)?;
    let cols = t.column_count();
    let idx = at.min(t.rows.len());
    t.rows.insert(idx, TableRow::with_cells(cols));
    Ok(())
}

/// Insert an empty column at `at` (clamped per row).
pub fn add_col(doc: &mut Doc, table: usize, at: usize, history: &mut History) -> Result<(), DocError> {
    let cols = table_ref(doc, table)?.column_count();
    history.record_before_change(doc);
    let t = table_mut(doc, table)?;
    if t.column_widths.len() < cols {
        t.column_widths.resize(cols, DEFAULT_COLUMN_WIDTH);
    }
    for row in &mut t.rows {
        let idx = at.min(row.cells.len());
        row.cells.insert(idx, TableCell::default());
    }
    let idx = at.min(t.column_widths.len());
    t.column_widths.insert(idx, DEFAULT_COLUMN_WIDTH);
    Ok(())
}

pub fn delete_row(doc: &mut Doc, table: usize, at: usize, history: &mut History) -> Result<(), DocError> {
    if at >= table_ref(doc, table)?.rows.len() {
        return Err(DocError::CellOutOfRange { row: at, col: 0 });
    }
    history.record_before_change(doc);
    table_mut(doc, table)?.rows.remove(at);
    Ok(())
}

pub fn delete_col(doc: &mut Doc, table: usize, at: usize, history: &mut History) -> Result<(), DocError> {
    if at >= table_ref(doc, table)?.column_count() {
        return Err(DocError::CellOutOfRange { row: 0, col: at });
    }
    history.record_before_change(doc);
    let t = table_mut(doc, table)?;
    for row in &mut t.rows {
        if at < row.cells.len() {
            row.cells.remove(at);
        }
    }
    if at < t.column_widths.len() {
        t.column_widths.remove(at);
    }
    Ok(())
}

/// Move row `from` to position `to`. Both indices are clamped to the last
/// row; moving a row onto itself is a no-op that records nothing.
pub fn move_row(doc: &mut Doc, table: usize, from: usize, to: usize, history: &mut History) -> Result<(), DocError> {
    let len = table_ref(doc, table)?.rows.len();
    let last = len.saturating_sub(1);
    let (from, to) = (from.min(last), to.min(last));
    if len == 0 || from == to {
        return Ok(());
    }
    history.record_before_change(doc);
    let t = table_mut(doc, table)?;
    let row = t.rows.remove(from);
    t.rows.insert(to, row);
    Ok(())
}

/// Move column `from` to position `to`, carrying its width along.
pub fn move_col(doc: &mut Doc, table: usize, from: usize, to: usize, history: &mut History) -> Result<(), DocError> {
    let len = table_ref(doc, table)?.column_count();
    let last = len.saturating_sub(1);
    let (from, to) = (from.min(last), to.min(last));
    if len == 0 || from == to {
        return Ok(());
    }
    history.record_before_change(doc);
    let t = table_mut(doc, table)?;
    for row in &mut t.rows {
        if from < row.cells.len() {
            let cell = row.cells.remove(from);
            let idx = to.min(row.cells.len());
            row.cells.insert(idx, cell);
        }
    }
    if from < t.column_widths.len() {
        let w = t.column_widths.remove(from);
        let idx = to.min(t.column_widths.len());
        t.column_widths.insert(idx, w);
    }
    Ok(())
}

/// Merge the rectangle spanned by two corner cells into its top-left cell.
///
/// Text of covered cells is appended to the master cell, separated by
/// spaces, and the covered cells become empty placeholders. Inline styling
/// of the gathered text is kept.
pub fn merge_cells(
    doc: &mut Doc,
    table: usize,
    (sr, sc): (usize, usize),
    (er, ec): (usize, usize),
    history: &mut History,
) -> Result<(), DocError> {
    let (min_r, max_r) = (sr.min(er), sr.max(er));
    let (min_c, max_c) = (sc.min(ec), sc.max(ec));
    check_cell(doc, table, min_r, min_c)?;
    check_cell(doc, table, max_r, max_c)?;
    if min_r == max_r && min_c == max_c {
        return Ok(());
    }

    history.record_before_change(doc);
    let t = table_mut(doc, table)?;

    let mut gathered: Vec<Vec<InlineSpan>> = Vec::new();
    for r in min_r..=max_r {
        for c in min_c..=max_c {
            if r == min_r && c == min_c {
                continue;
            }
            if let Some(cell) = t.cell_mut(r, c) {
                if !cell.text.is_empty() {
                    gathered.push(cell_spans(cell));
                }
                *cell = TableCell {
                    placeholder: true,
                    ..Default::default()
                };
            }
        }
    }

    if let Some(master) = t.cell_mut(min_r, min_c) {
        if !gathered.is_empty() {
            let mut spans = cell_spans(master);
            for part in gathered {
                if !spans.is_empty() {
                    spans.push(InlineSpan::plain(" "));
                }
                spans.extend(part);
            }
            master.text = spans.iter().map(|s| s.text.as_str()).collect();
            master.spans = normalize_spans(spans);
        }
        master.rowspan = (max_r - min_r + 1) as u32;
        master.colspan = (max_c - min_c + 1) as u32;
        master.placeholder = false;
    }
    Ok(())
}

fn cell_spans(cell: &mut TableCell) -> Vec<InlineSpan> {
    match cell.spans.take() {
        Some(spans) => spans,
        None if cell.text.is_empty() => Vec::new(),
        None => vec![InlineSpan::plain(std::mem::take(&mut cell.text))],
    }
}

/// Undo a merge: the master cell gets span 1 and the covered cells become
/// regular empty cells again.
pub fn split_cell(doc: &mut Doc, table: usize, row: usize, col: usize, history: &mut History) -> Result<(), DocError> {
    check_cell(doc, table, row, col)?;
    history.record_before_change(doc);
    let t = table_mut(doc, table)?;

    let (rowspan, colspan) = match t.cell_mut(row, col) {
        Some(master) => {
            let spans = (master.rowspan.max(1) as usize, master.colspan.max(1) as usize);
            master.rowspan = 1;
            master.colspan = 1;
            spans
        }
        None => return Ok(()),
    };

    for r in row..row + rowspan {
        for c in col..col + colspan {
            if r == row && c == col {
                continue;
            }
            if let Some(cell) = t.cell_mut(r, c) {
                *cell = TableCell::default();
            }
        }
    }
    Ok(())
}

pub fn set_cell_text(
    doc: &mut Doc,
    table: usize,
    row: usize,
    col: usize,
    text: &str,
    history: &mut History,
) -> Result<(), DocError> {
    check_cell(doc, table, row, col)?;
    history.record_before_change(doc);
    if let Some(cell) = table_mut(doc, table)?.cell_mut(row, col) {
        cell.text = text.to_string();
        cell.spans = None;
    }
    Ok(())
}

/// Shallow-merge `style` into the cell's existing style.
pub fn set_cell_style(
    doc: &mut Doc,
    table: usize,
    row: usize,
    col: usize,
    style: &CellStyle,
    history: &mut History,
) -> Result<(), DocError> {
    check_cell(doc, table, row, col)?;
    history.record_before_change(doc);
    if let Some(cell) = table_mut(doc, table)?.cell_mut(row, col) {
        cell.style.merge(style);
    }
    Ok(())
}

pub fn set_column_width(
    doc: &mut Doc,
    table: usize,
    col: usize,
    px: u32,
    history: &mut History,
) -> Result<(), DocError> {
    let cols = table_ref(doc, table)?.column_count();
    if col >= cols {
        return Err(DocError::CellOutOfRange { row: 0, col });
    }
    history.record_before_change(doc);
    let t = table_mut(doc, table)?;
    if t.column_widths.len() < cols {
        t.column_widths.resize(cols, DEFAULT_COLUMN_WIDTH);
    }
    t.column_widths[col] = px.max(16);
    Ok(())
}

/// Fix the height of row `row`; values below the minimum are raised to it.
pub fn set_row_height(
    doc: &mut Doc,
    table: usize,
    row: usize,
    px: u32,
    history: &mut History,
) -> Result<(), DocError> {
    if row >= table_ref(doc, table)?.rows.len() {
        return Err(DocError::CellOutOfRange { row, col: 0 });
    }
    history.record_before_change(doc);
    if let Some(r) = table_mut(doc, table)?.rows.get_mut(row) {
        r.height_px = Some(px.max(MIN_ROW_HEIGHT));
    }
    Ok(())
}

pub fn set_freeze(
    doc: &mut Doc,
    table: usize,
    header: bool,
    first_col: bool,
    history: &mut History,
) -> Result<(), DocError> {
    table_ref(doc, table)?;
    history.record_before_change(doc);
    let t = table_mut(doc, table)?;
    t.freeze_header = header;
    t.freeze_first_col = first_col;
    Ok(())
}
