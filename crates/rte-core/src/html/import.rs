//! HTML fragment -> document.
//!
//! A tolerant reader for the markup the editor page and [`super::to_html`]
//! produce. Unknown elements are dropped but their text is kept; `script`
//! and `style` contents are discarded.

use std::sync::LazyLock;

use html_escape::decode_html_entities;
use regex::Regex;

use crate::doc::{
    normalize_spans, BorderStyle, CellStyle, Doc, InlineSpan, InlineStyle, McqBlock, McqOption,
    Node, Table, TableCell, TableRow,
};
use crate::image::{ImageAlign, ImageAttrs};

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .unwrap()
});

static BORDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)px\s+\w+\s+(.+?)\s*$").unwrap());

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Start {
        name: String,
        attrs: Vec<(String, String)>,
    },
    End {
        name: String,
    },
    Text(String),
}

fn attr<'a>(attrs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn has_class(attrs: &[(String, String)], class: &str) -> bool {
    attr(attrs, "class").is_some_and(|c| c.split_whitespace().any(|c| c == class))
}

fn tokenize(html: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = html;

    while !rest.is_empty() {
        let Some(lt) = rest.find('<') else {
            tokens.push(Token::Text(decode_html_entities(rest).into_owned()));
            break;
        };
        if lt > 0 {
            tokens.push(Token::Text(decode_html_entities(&rest[..lt]).into_owned()));
        }
        rest = &rest[lt..];

        if let Some(after) = rest.strip_prefix("<!--") {
            rest = after.find("-->").map(|i| &after[i + 3..]).unwrap_or("");
            continue;
        }
        if rest.starts_with("<!") || rest.starts_with("<?") {
            rest = rest.find('>').map(|i| &rest[i + 1..]).unwrap_or("");
            continue;
        }

        let Some(end) = tag_end(rest) else {
            // Unterminated tag: treat the remainder as text.
            tokens.push(Token::Text(decode_html_entities(rest).into_owned()));
            break;
        };
        let inner = &rest[1..end];
        rest = &rest[end + 1..];

        if let Some(name) = inner.strip_prefix('/') {
            tokens.push(Token::End {
                name: name.trim().to_ascii_lowercase(),
            });
            continue;
        }

        let inner = inner.trim_end_matches('/');
        let name_len = inner
            .find(|c: char| c.is_whitespace())
            .unwrap_or(inner.len());
        let name = inner[..name_len].to_ascii_lowercase();
        if name.is_empty() || !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
            tokens.push(Token::Text(format!("<{inner}>")));
            continue;
        }
        let attrs = ATTR_RE
            .captures_iter(&inner[name_len..])
            .map(|cap| {
                let key = cap[1].to_ascii_lowercase();
                let value = cap
                    .get(2)
                    .or_else(|| cap.get(3))
                    .or_else(|| cap.get(4))
                    .map(|m| decode_html_entities(m.as_str()).into_owned())
                    .unwrap_or_default();
                (key, value)
            })
            .collect();
        tokens.push(Token::Start { name, attrs });
    }
    tokens
}

/// Index of the `>` closing the tag at the start of `s`, skipping quoted
/// attribute values.
fn tag_end(s: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices().skip(1) {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '>') => return Some(i),
            (None, '<') => return None,
            _ => {}
        }
    }
    None
}

#[derive(Debug, Clone)]
enum BlockKind {
    Paragraph,
    Heading(u8),
    InfoBox(String),
    FormulaBlock,
}

#[derive(Debug)]
struct Block {
    kind: BlockKind,
    spans: Vec<InlineSpan>,
}

impl Block {
    fn has_content(&self) -> bool {
        self.spans.iter().any(|s| !s.text.is_empty())
    }

    fn into_node(self) -> Node {
        let mut text: String = self.spans.iter().map(|s| s.text.as_str()).collect();
        let mut spans = normalize_spans(self.spans);
        // A lone `<br>` is the placeholder for an empty line.
        if text == "\n" && !matches!(self.kind, BlockKind::FormulaBlock) {
            text.clear();
            spans = None;
        }
        match self.kind {
            BlockKind::Paragraph => Node::Paragraph { text, spans },
            BlockKind::Heading(level) => Node::Heading { level, text, spans },
            BlockKind::InfoBox(kind) => Node::InfoBox { kind, text },
            BlockKind::FormulaBlock => Node::FormulaBlock { tex: text },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Mark {
    Bold,
    Italic,
    Underline,
    Code,
    Link(String),
    /// `<span style>`; fields left `None` inherit from outer marks.
    Css {
        color: Option<String>,
        highlight: Option<String>,
        font_size_px: Option<u32>,
    },
}

#[derive(Debug, Default)]
struct RawCell {
    text: String,
    spans: Vec<InlineSpan>,
    colspan: usize,
    rowspan: usize,
    style: CellStyle,
}

#[derive(Debug, Default)]
struct RawRow {
    height_px: Option<u32>,
    cells: Vec<RawCell>,
}

#[derive(Debug, Default)]
struct TableBuilder {
    freeze_header: bool,
    freeze_first_col: bool,
    widths: Vec<u32>,
    rows: Vec<RawRow>,
    cell: Option<RawCell>,
}

impl TableBuilder {
    fn close_cell(&mut self) {
        if let Some(cell) = self.cell.take() {
            if self.rows.is_empty() {
                self.rows.push(RawRow::default());
            }
            if let Some(row) = self.rows.last_mut() {
                row.cells.push(cell);
            }
        }
    }

    /// Lay raw cells out on a grid, re-creating placeholders for the
    /// positions covered by row/col spans.
    fn finish(mut self) -> Table {
        self.close_cell();
        let row_count = self.rows.len();
        let heights: Vec<Option<u32>> = self.rows.iter().map(|r| r.height_px).collect();
        let mut grid: Vec<Vec<Option<TableCell>>> = (0..row_count).map(|_| Vec::new()).collect();

        for (r, raw_row) in self.rows.into_iter().enumerate() {
            let mut c = 0usize;
            for raw in raw_row.cells {
                while grid[r].get(c).is_some_and(|slot| slot.is_some()) {
                    c += 1;
                }
                let rowspan = raw.rowspan.max(1).min(row_count - r);
                let colspan = raw.colspan.max(1);
                for dr in 0..rowspan {
                    for dc in 0..colspan {
                        let row = &mut grid[r + dr];
                        if row.len() <= c + dc {
                            row.resize(c + dc + 1, None);
                        }
                        if dr == 0 && dc == 0 {
                            continue;
                        }
                        row[c + dc] = Some(TableCell {
                            placeholder: true,
                            ..Default::default()
                        });
                    }
                }
                grid[r][c] = Some(TableCell {
                    text: raw.text,
                    spans: normalize_spans(raw.spans),
                    colspan: colspan as u32,
                    rowspan: rowspan as u32,
                    style: raw.style,
                    placeholder: false,
                });
                c += colspan;
            }
        }

        let cols = grid.iter().map(Vec::len).max().unwrap_or(0);
        let rows = grid
            .into_iter()
            .zip(heights)
            .map(|(row, height_px)| {
                let mut cells: Vec<TableCell> =
                    row.into_iter().map(Option::unwrap_or_default).collect();
                cells.resize(cols, TableCell::default());
                TableRow { cells, height_px }
            })
            .collect();

        Table {
            rows,
            freeze_header: self.freeze_header,
            freeze_first_col: self.freeze_first_col,
            column_widths: self.widths,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum McqField {
    Question,
    Option,
}

/// An open `div.mcq`. `depth` counts nested divs still open inside it.
#[derive(Debug)]
struct McqBuilder {
    block: McqBlock,
    field: Option<McqField>,
    depth: usize,
}

impl McqBuilder {
    fn new(multiple: bool) -> Self {
        Self {
            block: McqBlock {
                question: String::new(),
                options: Vec::new(),
                multiple,
            },
            field: None,
            depth: 0,
        }
    }

    fn push_text(&mut self, text: &str) {
        match self.field {
            Some(McqField::Question) => self.block.question.push_str(text),
            Some(McqField::Option) => {
                if let Some(option) = self.block.options.last_mut() {
                    option.text.push_str(text);
                }
            }
            None => {}
        }
    }
}

#[derive(Default)]
struct Builder {
    nodes: Vec<Node>,
    block: Option<Block>,
    marks: Vec<(String, Mark)>,
    table: Option<TableBuilder>,
    mcq: Option<McqBuilder>,
    formula: Option<String>,
    skip_depth: usize,
}

impl Builder {
    fn style(&self) -> InlineStyle {
        let mut style = InlineStyle::default();
        for (_, mark) in &self.marks {
            match mark {
                Mark::Bold => style.bold = true,
                Mark::Italic => style.italic = true,
                Mark::Underline => style.underline = true,
                Mark::Code => style.code = true,
                Mark::Link(href) => style.link = Some(href.clone()),
                Mark::Css {
                    color,
                    highlight,
                    font_size_px,
                } => {
                    if color.is_some() {
                        style.color = color.clone();
                    }
                    if highlight.is_some() {
                        style.highlight = highlight.clone();
                    }
                    if font_size_px.is_some() {
                        style.font_size_px = *font_size_px;
                    }
                }
            }
        }
        style
    }

    fn current_link(&self) -> Option<String> {
        self.marks.iter().rev().find_map(|(_, m)| match m {
            Mark::Link(href) => Some(href.clone()),
            _ => None,
        })
    }

    fn open_block(&mut self, kind: BlockKind) {
        self.interrupt_block();
        self.block = Some(Block {
            kind,
            spans: Vec::new(),
        });
    }

    /// Emit the open block even when empty (an explicit `<p></p>`).
    fn close_block(&mut self) {
        if let Some(block) = self.block.take() {
            self.nodes.push(block.into_node());
        }
    }

    /// Emit the open block only if it has content; used when a block-level
    /// element appears in the middle of it.
    fn interrupt_block(&mut self) {
        if let Some(block) = self.block.take() {
            if block.has_content() {
                self.nodes.push(block.into_node());
            }
        }
    }

    fn push_text(&mut self, text: &str) {
        if self.skip_depth > 0 {
            return;
        }
        if let Some(tex) = self.formula.as_mut() {
            tex.push_str(text);
            return;
        }
        if let Some(mcq) = self.mcq.as_mut() {
            mcq.push_text(text);
            return;
        }
        if self.table.is_some() {
            let style = self.style();
            if let Some(cell) = self.table.as_mut().and_then(|t| t.cell.as_mut()) {
                cell.text.push_str(text);
                cell.spans.push(InlineSpan {
                    text: text.to_string(),
                    style,
                });
            }
            return;
        }
        if self.block.is_none() {
            if text.trim().is_empty() {
                return;
            }
            self.open_block(BlockKind::Paragraph);
        }
        let style = self.style();
        if let Some(block) = self.block.as_mut() {
            block.spans.push(InlineSpan {
                text: text.to_string(),
                style,
            });
        }
    }

    fn start(&mut self, name: &str, attrs: &[(String, String)]) {
        if matches!(name, "script" | "style") {
            self.skip_depth += 1;
            return;
        }
        if self.skip_depth > 0 {
            return;
        }

        if self.mcq.is_some() {
            self.start_in_mcq(name, attrs);
            return;
        }
        if self.table.is_some() {
            if !self.start_in_table(name, attrs) {
                self.start_mark(name, attrs);
            }
            return;
        }

        match name {
            "p" | "li" | "blockquote" | "pre" => self.open_block(BlockKind::Paragraph),
            "div" if attr(attrs, "data-media").is_some() => {
                self.interrupt_block();
                self.nodes.push(Node::Media {
                    key: attr(attrs, "key").unwrap_or_default().to_string(),
                    content_type: attr(attrs, "type").unwrap_or_default().to_string(),
                });
            }
            "div" if has_class(attrs, "mcq") => {
                self.interrupt_block();
                self.mcq = Some(McqBuilder::new(attr(attrs, "data-multiple") == Some("true")));
            }
            "div" => {
                let kind = if has_class(attrs, "formula-block") || has_class(attrs, "ql-formula-block") {
                    BlockKind::FormulaBlock
                } else if has_class(attrs, "info-box") {
                    BlockKind::InfoBox(attr(attrs, "data-kind").unwrap_or("info").to_string())
                } else {
                    BlockKind::Paragraph
                };
                self.open_block(kind);
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = name[1..].parse::<u8>().unwrap_or(1);
                self.open_block(BlockKind::Heading(level));
            }
            "span" if has_class(attrs, "formula-inline") || has_class(attrs, "ql-formula") => {
                self.interrupt_block();
                self.formula = Some(attr(attrs, "data-value").unwrap_or_default().to_string());
            }
            "br" => self.push_text("\n"),
            "img" => {
                self.interrupt_block();
                let mut img = ImageAttrs::new(
                    attr(attrs, "src").unwrap_or_default(),
                    attr(attrs, "alt").unwrap_or_default(),
                );
                img.align = attr(attrs, "data-align")
                    .and_then(ImageAlign::parse)
                    .unwrap_or_default();
                if let Some(style) = attr(attrs, "style") {
                    img.read_style(style);
                }
                img.link = self.current_link().filter(|l| !l.is_empty());
                self.nodes.push(Node::Image(img));
            }
            "sup" => {
                if let Some(id) = attr(attrs, "data-comment") {
                    self.interrupt_block();
                    self.nodes.push(Node::CommentAnchor {
                        thread_id: id.to_string(),
                    });
                }
            }
            "table" => {
                self.interrupt_block();
                self.table = Some(TableBuilder {
                    freeze_header: has_class(attrs, "freeze-header"),
                    freeze_first_col: has_class(attrs, "freeze-first-col"),
                    ..Default::default()
                });
            }
            _ => self.start_mark(name, attrs),
        }
    }

    fn start_mark(&mut self, name: &str, attrs: &[(String, String)]) {
        let mark = match name {
            "strong" | "b" => Mark::Bold,
            "em" | "i" => Mark::Italic,
            "u" => Mark::Underline,
            "code" => Mark::Code,
            "a" => Mark::Link(attr(attrs, "href").unwrap_or_default().to_string()),
            "span" => {
                let style = attr(attrs, "style").unwrap_or_default();
                Mark::Css {
                    color: css_value(style, "color"),
                    highlight: css_value(style, "background-color")
                        .or_else(|| css_value(style, "background")),
                    font_size_px: css_value(style, "font-size").and_then(|v| px(&v)),
                }
            }
            _ => return,
        };
        self.marks.push((name.to_string(), mark));
    }

    fn end_mark(&mut self, name: &str) {
        if let Some(pos) = self.marks.iter().rposition(|(tag, _)| tag == name) {
            self.marks.remove(pos);
        }
    }

    /// Structural table tags; returns false for anything else.
    fn start_in_table(&mut self, name: &str, attrs: &[(String, String)]) -> bool {
        if name == "br" {
            self.push_text("\n");
            return true;
        }
        let Some(table) = self.table.as_mut() else {
            return false;
        };
        match name {
            "col" => {
                let width = attr(attrs, "style")
                    .and_then(|s| css_value(s, "width"))
                    .or_else(|| attr(attrs, "width").map(str::to_string))
                    .and_then(|w| px(&w))
                    .unwrap_or(crate::doc::DEFAULT_COLUMN_WIDTH);
                table.widths.push(width);
            }
            "tr" => {
                table.close_cell();
                table.rows.push(RawRow {
                    height_px: attr(attrs, "style")
                        .and_then(|s| css_value(s, "height"))
                        .and_then(|h| px(&h)),
                    cells: Vec::new(),
                });
            }
            "td" | "th" => {
                table.close_cell();
                let span = |key: &str| {
                    attr(attrs, key)
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(1)
                };
                table.cell = Some(RawCell {
                    colspan: span("colspan"),
                    rowspan: span("rowspan"),
                    style: attr(attrs, "style").map(parse_cell_style).unwrap_or_default(),
                    ..Default::default()
                });
            }
            _ => return false,
        }
        true
    }

    fn start_in_mcq(&mut self, name: &str, attrs: &[(String, String)]) {
        if name == "br" {
            self.push_text("\n");
            return;
        }
        let Some(mcq) = self.mcq.as_mut() else {
            return;
        };
        if name != "div" {
            return;
        }
        mcq.depth += 1;
        if has_class(attrs, "mcq-question") {
            mcq.field = Some(McqField::Question);
        } else if has_class(attrs, "mcq-option") {
            mcq.block.options.push(McqOption {
                text: String::new(),
                correct: attr(attrs, "data-correct") == Some("true"),
            });
            mcq.field = Some(McqField::Option);
        }
    }

    fn end(&mut self, name: &str) {
        if matches!(name, "script" | "style") {
            self.skip_depth = self.skip_depth.saturating_sub(1);
            return;
        }
        if self.skip_depth > 0 {
            return;
        }

        if let Some(mcq) = self.mcq.as_mut() {
            if name == "div" {
                if mcq.depth > 0 {
                    mcq.depth -= 1;
                    mcq.field = None;
                } else if let Some(mcq) = self.mcq.take() {
                    self.nodes.push(Node::Mcq(mcq.block));
                }
            }
            return;
        }

        if self.table.is_some() {
            match name {
                "td" | "th" => {
                    if let Some(table) = self.table.as_mut() {
                        table.close_cell();
                    }
                }
                "table" => {
                    if let Some(table) = self.table.take() {
                        self.nodes.push(Node::Table(table.finish()));
                    }
                }
                _ => self.end_mark(name),
            }
            return;
        }

        match name {
            "p" | "li" | "blockquote" | "pre" | "div" | "h1" | "h2" | "h3" | "h4" | "h5"
            | "h6" => self.close_block(),
            "span" if self.formula.is_some() => {
                if let Some(tex) = self.formula.take() {
                    self.nodes.push(Node::FormulaInline { tex });
                }
            }
            _ => self.end_mark(name),
        }
    }

    fn finish(mut self) -> Doc {
        if let Some(tex) = self.formula.take() {
            self.nodes.push(Node::FormulaInline { tex });
        }
        if let Some(mcq) = self.mcq.take() {
            self.nodes.push(Node::Mcq(mcq.block));
        }
        if let Some(table) = self.table.take() {
            self.nodes.push(Node::Table(table.finish()));
        }
        self.interrupt_block();
        Doc::new(self.nodes)
    }
}

fn css_value(style: &str, prop: &str) -> Option<String> {
    style.split(';').find_map(|decl| {
        let (k, v) = decl.split_once(':')?;
        (k.trim().eq_ignore_ascii_case(prop)).then(|| v.trim().to_string())
    })
}

fn px(value: &str) -> Option<u32> {
    value.trim().trim_end_matches("px").trim().parse().ok()
}

fn parse_cell_style(style: &str) -> CellStyle {
    let background = css_value(style, "background").or_else(|| css_value(style, "background-color"));
    let border = css_value(style, "border").and_then(|b| {
        let cap = BORDER_RE.captures(&b)?;
        Some(BorderStyle {
            width_px: cap[1].parse().ok()?,
            color: cap[2].to_string(),
        })
    });
    CellStyle { background, border }
}

/// Parse an HTML fragment into a document.
pub fn from_html(html: &str) -> Doc {
    let mut builder = Builder::default();
    for token in tokenize(html) {
        match token {
            Token::Start { name, attrs } => builder.start(&name, &attrs),
            Token::End { name } => builder.end(&name),
            Token::Text(text) => builder.push_text(&text),
        }
    }
    builder.finish()
}
