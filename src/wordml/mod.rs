//! WordprocessingML table writer
//!
//! Renders a [`NormalizedTable`] as a `w:tbl` element. The grid builder has
//! already done the hard part: every output cell maps to exactly one `w:tc`,
//! its width becomes `w:gridSpan` and its vertical role becomes `w:vMerge`.

use std::fmt::Write;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::core::grid::{NormalizedTable, OutputCell, OutputRow};
use crate::markup::MarkupCell;

/// Namespace bound to the `w` prefix
pub const WORDML_NAMESPACE: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Content that can be written into a table cell
pub trait CellText {
    /// Plain text of the cell
    fn text(&self) -> &str;

    /// Whether the cell belongs to a header row
    fn is_header(&self) -> bool {
        false
    }
}

impl CellText for String {
    fn text(&self) -> &str {
        self
    }
}

impl CellText for &str {
    fn text(&self) -> &str {
        self
    }
}

impl CellText for MarkupCell {
    fn text(&self) -> &str {
        &self.text
    }

    fn is_header(&self) -> bool {
        self.is_header
    }
}

/// Options for WordprocessingML output
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WordmlOptions {
    /// Indent nested elements, one per line
    /// Default: false
    pub pretty: bool,

    /// Style id written as `w:tblStyle`, e.g. "TableGrid"
    /// Default: None
    pub table_style: Option<String>,

    /// Width of every grid column in twentieths of a point
    /// Default: None (columns are left for the consumer to size)
    pub grid_col_width: Option<u32>,

    /// Declare the `w` namespace on the table element so the fragment
    /// stands alone as XML
    /// Default: false
    pub declare_namespace: bool,
}

impl WordmlOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indented output for reading and diffing
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::default()
        }
    }

    /// Standalone fragment with Word's default bordered table style
    pub fn standalone() -> Self {
        Self {
            table_style: Some("TableGrid".to_string()),
            declare_namespace: true,
            ..Self::default()
        }
    }
}

/// Indenting element writer
struct XmlWriter {
    out: String,
    pretty: bool,
    depth: usize,
}

impl XmlWriter {
    fn new(pretty: bool) -> Self {
        XmlWriter {
            out: String::new(),
            pretty,
            depth: 0,
        }
    }

    fn line(&mut self, markup: &str) {
        if self.pretty {
            for _ in 0..self.depth {
                self.out.push_str("  ");
            }
        }
        self.out.push_str(markup);
        if self.pretty {
            self.out.push('\n');
        }
    }

    fn open(&mut self, markup: &str) {
        self.line(markup);
        self.depth += 1;
    }

    fn close(&mut self, markup: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(markup);
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Render a normalized table as a `w:tbl` element
pub fn render_table<T: CellText>(table: &NormalizedTable<T>, options: &WordmlOptions) -> String {
    render_rows(&table.rows, table.column_count, options)
}

/// Render normalized rows over a grid of `column_count` columns
pub fn render_rows<T: CellText>(
    rows: &[OutputRow<T>],
    column_count: usize,
    options: &WordmlOptions,
) -> String {
    let mut xml = XmlWriter::new(options.pretty);

    if options.declare_namespace {
        xml.open(&format!("<w:tbl xmlns:w=\"{}\">", WORDML_NAMESPACE));
    } else {
        xml.open("<w:tbl>");
    }

    xml.open("<w:tblPr>");
    if let Some(style) = &options.table_style {
        xml.line(&format!("<w:tblStyle w:val=\"{}\"/>", escape_xml(style)));
    }
    xml.line("<w:tblW w:w=\"0\" w:type=\"auto\"/>");
    xml.close("</w:tblPr>");

    if column_count == 0 {
        xml.line("<w:tblGrid/>");
    } else {
        xml.open("<w:tblGrid>");
        for _ in 0..column_count {
            match options.grid_col_width {
                Some(width) => xml.line(&format!("<w:gridCol w:w=\"{}\"/>", width)),
                None => xml.line("<w:gridCol/>"),
            }
        }
        xml.close("</w:tblGrid>");
    }

    for row in rows {
        render_row(&mut xml, row);
    }

    xml.close("</w:tbl>");
    xml.finish()
}

fn render_row<T: CellText>(xml: &mut XmlWriter, row: &OutputRow<T>) {
    xml.open("<w:tr>");
    if is_header_row(row) {
        xml.open("<w:trPr>");
        xml.line("<w:tblHeader/>");
        xml.close("</w:trPr>");
    }
    for cell in &row.cells {
        render_cell(xml, cell);
    }
    xml.close("</w:tr>");
}

/// A row repeats as a header when it has origins and all of them are headers
fn is_header_row<T: CellText>(row: &OutputRow<T>) -> bool {
    let mut origins = row.cells.iter().filter_map(OutputCell::content).peekable();
    origins.peek().is_some() && origins.all(|content| content.is_header())
}

fn render_cell<T: CellText>(xml: &mut XmlWriter, cell: &OutputCell<T>) {
    xml.open("<w:tc>");

    let mut properties = Vec::new();
    if cell.width() > 1 {
        properties.push(format!("<w:gridSpan w:val=\"{}\"/>", cell.width()));
    }
    if let Some(merge) = cell.vertical_merge() {
        properties.push(match merge.to_wordml() {
            Some(val) => format!("<w:vMerge w:val=\"{}\"/>", val),
            None => "<w:vMerge/>".to_string(),
        });
    }
    if !properties.is_empty() {
        xml.open("<w:tcPr>");
        for property in &properties {
            xml.line(property);
        }
        xml.close("</w:tcPr>");
    }

    match cell.content().map(|content| content.text()) {
        Some(text) if !text.is_empty() => {
            xml.open("<w:p>");
            xml.line(&run_markup(text));
            xml.close("</w:p>");
        }
        // Every w:tc needs a paragraph, continuations included
        _ => xml.line("<w:p/>"),
    }

    xml.close("</w:tc>");
}

/// One `w:r` holding the text, line breaks as `w:br`
fn run_markup(text: &str) -> String {
    let mut run = String::from("<w:r>");
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            run.push_str("<w:br/>");
        }
        if !line.is_empty() {
            let _ = write!(
                run,
                "<w:t xml:space=\"preserve\">{}</w:t>",
                escape_xml(line)
            );
        }
    }
    run.push_str("</w:r>");
    run
}

/// Escape text for XML content or attribute values
///
/// Characters XML 1.0 cannot carry are dropped.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\t' | '\n' | '\r' => escaped.push(c),
            c if (c as u32) < 0x20 || c == '\u{fffe}' || c == '\u{ffff}' => {}
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::{normalize_table_with_options, GridOptions, InputCell, InputRow};
    use pretty_assertions::assert_eq;

    fn table(rows: Vec<Vec<InputCell<&'static str>>>) -> NormalizedTable<&'static str> {
        normalize_table_with_options(
            rows.into_iter().map(InputRow::from),
            &GridOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_plain_table_compact() {
        let t = table(vec![vec![InputCell::new("a"), InputCell::new("b")]]);
        let xml = render_table(&t, &WordmlOptions::default());
        assert_eq!(
            xml,
            "<w:tbl><w:tblPr><w:tblW w:w=\"0\" w:type=\"auto\"/></w:tblPr>\
             <w:tblGrid><w:gridCol/><w:gridCol/></w:tblGrid>\
             <w:tr>\
             <w:tc><w:p><w:r><w:t xml:space=\"preserve\">a</w:t></w:r></w:p></w:tc>\
             <w:tc><w:p><w:r><w:t xml:space=\"preserve\">b</w:t></w:r></w:p></w:tc>\
             </w:tr></w:tbl>"
        );
    }

    #[test]
    fn test_merge_markers() {
        let t = table(vec![
            vec![InputCell::new("X").rows(2).cols(2), InputCell::new("Y")],
            vec![InputCell::new("Z")],
        ]);
        let xml = render_table(&t, &WordmlOptions::default());
        assert!(xml.contains(
            "<w:tc><w:tcPr><w:gridSpan w:val=\"2\"/><w:vMerge w:val=\"restart\"/></w:tcPr>"
        ));
        assert!(xml.contains("<w:tc><w:tcPr><w:gridSpan w:val=\"2\"/><w:vMerge/></w:tcPr><w:p/></w:tc>"));
        assert_eq!(xml.matches("<w:tc>").count(), 4);
        assert_eq!(xml.matches("<w:gridCol/>").count(), 3);
    }

    #[test]
    fn test_pretty_output() {
        let t = table(vec![vec![InputCell::new("a")]]);
        let options = WordmlOptions {
            table_style: Some("TableGrid".to_string()),
            grid_col_width: Some(2400),
            ..WordmlOptions::pretty()
        };
        let expected = "\
<w:tbl>
  <w:tblPr>
    <w:tblStyle w:val=\"TableGrid\"/>
    <w:tblW w:w=\"0\" w:type=\"auto\"/>
  </w:tblPr>
  <w:tblGrid>
    <w:gridCol w:w=\"2400\"/>
  </w:tblGrid>
  <w:tr>
    <w:tc>
      <w:p>
        <w:r><w:t xml:space=\"preserve\">a</w:t></w:r>
      </w:p>
    </w:tc>
  </w:tr>
</w:tbl>
";
        assert_eq!(render_table(&t, &options), expected);
    }

    #[test]
    fn test_header_row() {
        let rows = vec![
            InputRow::from(vec![
                InputCell::new(MarkupCell::header("Name")).rows(2),
                InputCell::new(MarkupCell::header("Value")),
            ]),
            InputRow::from(vec![InputCell::new(MarkupCell::new("1"))]),
        ];
        let t = normalize_table_with_options(rows, &GridOptions::default()).unwrap();
        let xml = render_table(&t, &WordmlOptions::default());
        assert_eq!(xml.matches("<w:tblHeader/>").count(), 1);
    }

    #[test]
    fn test_vacant_and_empty_cells() {
        let t = normalize_table_with_options(
            vec![
                InputRow::from(vec![InputCell::new(""), InputCell::new("b")]),
                InputRow::from(vec![InputCell::new("c")]),
            ],
            &GridOptions::rectangular(),
        )
        .unwrap();
        let xml = render_table(&t, &WordmlOptions::default());
        assert_eq!(xml.matches("<w:tc><w:p/></w:tc>").count(), 2);
    }

    #[test]
    fn test_escaping_and_line_breaks() {
        let t = table(vec![vec![InputCell::new("a < b & \"c\"\nnext\u{1}")]]);
        let xml = render_table(&t, &WordmlOptions::default());
        assert!(xml.contains(
            "<w:r><w:t xml:space=\"preserve\">a &lt; b &amp; &quot;c&quot;</w:t><w:br/>\
             <w:t xml:space=\"preserve\">next</w:t></w:r>"
        ));
    }

    #[test]
    fn test_standalone_namespace() {
        let t = table(vec![]);
        let xml = render_table(&t, &WordmlOptions::standalone());
        assert!(xml.starts_with(&format!("<w:tbl xmlns:w=\"{}\">", WORDML_NAMESPACE)));
        assert!(xml.contains("<w:tblStyle w:val=\"TableGrid\"/>"));
        assert!(xml.contains("<w:tblGrid/>"));
    }
}
