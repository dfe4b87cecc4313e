//! HTML table fragment reader
//!
//! Reads the first `<table>` of a fragment (or a bare run of `<tr>`
//! elements) into [`InputRow`]s ready for the grid builder. The fragment is
//! parsed with `scraper`, so comments, raw-text elements, quoted attribute
//! values, character references and implied end tags follow the HTML parsing
//! rules. Only the table structure is interpreted: `tr`, `td`, `th`, the
//! `thead`/`tbody`/`tfoot` row groups and the `rowspan`/`colspan`
//! attributes. Everything else inside a cell is reduced to its text.
//!
//! Span attributes follow the HTML table processing rules: values that do
//! not start with digits fall back to 1, `colspan="0"` becomes 1, `colspan`
//! is capped at 1000 and `rowspan` at 65534, and `rowspan="0"` extends the
//! cell to the end of its row group.

use ego_tree::iter::Edge;
use fxhash::FxHashMap;
use lazy_static::lazy_static;
use log::debug;
use scraper::{ElementRef, Html, Node, Selector};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::core::grid::{InputCell, InputRow};
use crate::utils::diagnostics::{CheckResult, Diagnostic, DiagnosticKind};
use crate::utils::error::{GridError, GridResult};

/// Largest `colspan` an HTML table honors
pub const MAX_COLSPAN: usize = 1000;

/// Largest `rowspan` an HTML table honors
pub const MAX_ROWSPAN: usize = 65534;

lazy_static! {
    static ref TABLE_SELECTOR: Selector =
        Selector::parse("table").expect("BUG: hardcoded selector 'table' is statically valid");
    static ref SECTION_SELECTOR: Selector = Selector::parse("thead, tbody, tfoot")
        .expect("BUG: hardcoded selector 'thead, tbody, tfoot' is statically valid");
    static ref TR_SELECTOR: Selector =
        Selector::parse("tr").expect("BUG: hardcoded selector 'tr' is statically valid");
    static ref CELL_SELECTOR: Selector =
        Selector::parse("td, th").expect("BUG: hardcoded selector 'td, th' is statically valid");
}

/// Tags whose closing `>` is required before the table can be read
const STRUCTURAL_TAGS: &[&str] = &["table", "thead", "tbody", "tfoot", "tr", "td", "th"];

/// Text and kind of one table cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MarkupCell {
    /// Cell text with markup stripped and whitespace collapsed; line breaks
    /// are `\n`
    pub text: String,
    /// Whether the cell was a `<th>`
    pub is_header: bool,
}

impl MarkupCell {
    pub fn new(text: impl Into<String>) -> Self {
        MarkupCell {
            text: text.into(),
            is_header: false,
        }
    }

    pub fn header(text: impl Into<String>) -> Self {
        MarkupCell {
            text: text.into(),
            is_header: true,
        }
    }
}

/// Rows read from a fragment, with the irregularities found in its markup
#[derive(Debug, Clone, Default)]
pub struct ParsedTable {
    pub rows: Vec<InputRow<MarkupCell>>,
    pub diagnostics: CheckResult,
}

/// Read the first table of `html` into input rows
pub fn parse_table(html: &str) -> GridResult<Vec<InputRow<MarkupCell>>> {
    Ok(parse_table_with_diagnostics(html)?.rows)
}

/// Read the first table of `html`, keeping the markup diagnostics
pub fn parse_table_with_diagnostics(html: &str) -> GridResult<ParsedTable> {
    // The HTML parser drops a tag cut off by the end of input, and with it
    // a whole cell
    if let Some(offset) = unterminated_tag(html) {
        let (line, column) = line_column(html, offset);
        return Err(GridError::parse_at(
            format!("unterminated tag `{}`", truncate(&html[offset..], 24)),
            line,
            column,
        ));
    }

    let mut document = Html::parse_fragment(html);
    if document.select(&TABLE_SELECTOR).next().is_none() {
        // Row tags outside a table are ignored by the parser, so a bare run
        // of rows is read as the body of an implied table
        document = Html::parse_fragment(&format!("<table>{}</table>", html));
    }

    let mut reader = TableReader::default();
    if let Some(table) = document.select(&TABLE_SELECTOR).next() {
        reader.read(table);
    }
    Ok(reader.finish())
}

/// Span as written in the markup, before row groups are known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowSpan {
    Rows(usize),
    ToGroupEnd,
}

#[derive(Debug)]
struct RawCell {
    content: MarkupCell,
    row_span: RowSpan,
    col_span: usize,
}

#[derive(Debug)]
struct RawRow {
    group: usize,
    cells: Vec<RawCell>,
}

#[derive(Default)]
struct TableReader {
    /// Row group index, bumped at every section
    group: usize,
    rows: Vec<RawRow>,
    diagnostics: CheckResult,
}

impl TableReader {
    /// Collect the rows that belong to `table` itself, leaving nested tables
    /// to the text of the cell that holds them
    fn read(&mut self, table: ElementRef<'_>) {
        for child in table.children().filter_map(ElementRef::wrap) {
            if SECTION_SELECTOR.matches(&child) {
                self.group += 1;
                for row in child.children().filter_map(ElementRef::wrap) {
                    if TR_SELECTOR.matches(&row) {
                        self.read_row(row);
                    }
                }
            } else if TR_SELECTOR.matches(&child) {
                self.read_row(child);
            }
        }
        debug!("first table read: {} row(s)", self.rows.len());
    }

    fn read_row(&mut self, row: ElementRef<'_>) {
        let mut cells = Vec::new();
        for cell in row.children().filter_map(ElementRef::wrap) {
            if !CELL_SELECTOR.matches(&cell) {
                continue;
            }
            let element = cell.value();
            cells.push(RawCell {
                content: MarkupCell {
                    text: cell_text(cell),
                    is_header: element.name() == "th",
                },
                row_span: self.row_span(element.attr("rowspan")),
                col_span: self.col_span(element.attr("colspan")),
            });
        }
        self.rows.push(RawRow {
            group: self.group,
            cells,
        });
    }

    fn col_span(&mut self, value: Option<&str>) -> usize {
        let Some(value) = value else {
            return 1;
        };
        match parse_non_negative(value) {
            None | Some(0) => 1,
            Some(n) if n > MAX_COLSPAN => {
                self.note(format!("colspan {} clamped to {}", n, MAX_COLSPAN));
                MAX_COLSPAN
            }
            Some(n) => n,
        }
    }

    fn row_span(&mut self, value: Option<&str>) -> RowSpan {
        let Some(value) = value else {
            return RowSpan::Rows(1);
        };
        match parse_non_negative(value) {
            None => RowSpan::Rows(1),
            Some(0) => RowSpan::ToGroupEnd,
            Some(n) if n > MAX_ROWSPAN => {
                self.note(format!("rowspan {} clamped to {}", n, MAX_ROWSPAN));
                RowSpan::Rows(MAX_ROWSPAN)
            }
            Some(n) => RowSpan::Rows(n),
        }
    }

    fn note(&mut self, message: String) {
        let diag = Diagnostic::info(DiagnosticKind::Markup, message).with_row(self.rows.len());
        debug!("{}", diag);
        self.diagnostics.add(diag);
    }

    fn finish(self) -> ParsedTable {
        let mut group_ends: FxHashMap<usize, usize> = FxHashMap::default();
        for (index, row) in self.rows.iter().enumerate() {
            group_ends.insert(row.group, index + 1);
        }

        let rows = self
            .rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| {
                let group_end = group_ends.get(&row.group).copied().unwrap_or(index + 1);
                row.cells
                    .into_iter()
                    .map(|cell| {
                        let row_span = match cell.row_span {
                            RowSpan::Rows(n) => n,
                            RowSpan::ToGroupEnd => group_end - index,
                        };
                        InputCell::with_spans(cell.content, row_span, cell.col_span)
                    })
                    .collect::<InputRow<_>>()
            })
            .collect();

        ParsedTable {
            rows,
            diagnostics: self.diagnostics,
        }
    }
}

/// Leading digits of `value` after optional whitespace and a `+` sign
fn parse_non_negative(value: &str) -> Option<usize> {
    let trimmed = value.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..end];
    if digits.is_empty() {
        return None;
    }
    // Overlong digit runs saturate rather than failing
    Some(digits.parse().unwrap_or(usize::MAX))
}

/// Byte offset of a structural tag left open at the end of `html`
fn unterminated_tag(html: &str) -> Option<usize> {
    let tail_start = html.rfind('>').map_or(0, |gt| gt + 1);
    let open = tail_start + html[tail_start..].find('<')?;
    let name: String = html[open + 1..]
        .trim_start_matches('/')
        .chars()
        .take_while(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase();
    STRUCTURAL_TAGS.contains(&name.as_str()).then_some(open)
}

/// Elements that end the current line
fn is_block(name: &str) -> bool {
    matches!(
        name,
        "p" | "div"
            | "li"
            | "ul"
            | "ol"
            | "dl"
            | "dt"
            | "dd"
            | "pre"
            | "blockquote"
            | "section"
            | "article"
            | "header"
            | "footer"
            | "address"
            | "figure"
            | "figcaption"
            | "hr"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
    )
}

/// Elements that separate words when a nested table is flattened
fn is_nested_table_part(name: &str) -> bool {
    matches!(name, "table" | "caption" | "tr" | "td" | "th")
}

/// Elements whose text is never shown
fn is_hidden(name: &str) -> bool {
    matches!(name, "script" | "style" | "template")
}

/// Visible text of a cell
///
/// `<br>` becomes `\n`; block boundaries become a single `\n` between
/// non-empty lines. Other whitespace collapses to one space and is trimmed
/// at line ends.
fn cell_text(cell: ElementRef<'_>) -> String {
    let mut text = TextCollector::default();
    let mut hidden_depth = 0usize;

    for edge in cell.traverse() {
        match edge {
            Edge::Open(node) => match node.value() {
                Node::Element(element) if is_hidden(element.name()) => hidden_depth += 1,
                _ if hidden_depth > 0 => {}
                Node::Element(element) => text.open_element(element.name()),
                Node::Text(content) => text.push_str(content),
                _ => {}
            },
            Edge::Close(node) => {
                if let Some(element) = node.value().as_element() {
                    if is_hidden(element.name()) {
                        hidden_depth = hidden_depth.saturating_sub(1);
                    } else if hidden_depth == 0 {
                        text.close_element(element.name());
                    }
                }
            }
        }
    }

    text.finish()
}

/// Whitespace-collapsing text accumulator
#[derive(Default)]
struct TextCollector {
    out: String,
    pending_space: bool,
    pending_line: bool,
}

impl TextCollector {
    fn push_str(&mut self, text: &str) {
        for c in text.chars() {
            // HTML whitespace only; U+00A0 is content
            if c.is_ascii_whitespace() {
                self.pending_space = true;
            } else {
                self.flush();
                self.out.push(c);
            }
        }
    }

    fn open_element(&mut self, name: &str) {
        if name == "br" {
            self.line_break();
        } else {
            self.close_element(name);
        }
    }

    fn close_element(&mut self, name: &str) {
        if is_block(name) {
            self.pending_line = true;
        } else if is_nested_table_part(name) {
            self.pending_space = true;
        }
    }

    fn line_break(&mut self) {
        if self.pending_line && !self.at_line_start() {
            self.out.push('\n');
        }
        self.pending_line = false;
        self.pending_space = false;
        self.out.push('\n');
    }

    fn at_line_start(&self) -> bool {
        self.out.is_empty() || self.out.ends_with('\n')
    }

    fn flush(&mut self) {
        if self.pending_line && !self.at_line_start() {
            self.out.push('\n');
        } else if self.pending_space && !self.at_line_start() {
            self.out.push(' ');
        }
        self.pending_line = false;
        self.pending_space = false;
    }

    fn finish(self) -> String {
        self.out.trim_end_matches('\n').to_string()
    }
}

/// 1-based line and column of a byte offset
fn line_column(text: &str, offset: usize) -> (usize, usize) {
    let before = &text[..offset];
    let line = before.matches('\n').count() + 1;
    let column = match before.rfind('\n') {
        Some(nl) => before[nl + 1..].chars().count() + 1,
        None => before.chars().count() + 1,
    };
    (line, column)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}
