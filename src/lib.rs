//! # tabspan
//!
//! Normalizes spanning table cells into the per-position merge markers of
//! WordprocessingML.
//!
//! HTML describes a merged region once, on the cell that starts it, and
//! leaves the covered positions out of later rows. WordprocessingML wants a
//! cell at every grid position: `w:gridSpan` for horizontal merges and a
//! `w:vMerge` cell in each row a vertical merge passes through. This crate
//! bridges the two.
//!
//! ## Features
//!
//! - **Grid normalization**: rowspan/colspan cells to origin and
//!   continuation cells, streaming or batch
//! - **Forgiving**: overlapping spans, short rows and runs past the last row
//!   are absorbed and reported as diagnostics
//! - **HTML reader**: the first table of a fragment, with browser span
//!   clamping
//! - **WordprocessingML writer**: `w:tbl` with `w:gridSpan`/`w:vMerge`
//! - **WASM Support**: Compiles to WebAssembly for browser usage
//!
//! ## Usage Examples
//!
//! ### Grid Normalization
//!
//! ```rust
//! use tabspan::{normalize_table, InputCell, InputRow, VerticalMerge};
//!
//! let rows = vec![
//!     InputRow::from(vec![InputCell::new("A").rows(2).cols(2), InputCell::new("B")]),
//!     InputRow::from(vec![InputCell::new("C")]),
//! ];
//! let output = normalize_table(rows).unwrap();
//!
//! // Row 1 gets a continuation for the 2x2 run, then C
//! assert_eq!(output[1].cells.len(), 2);
//! assert_eq!(output[1].cells[0].vertical_merge(), Some(VerticalMerge::Continue));
//! assert_eq!(output[1].cells[0].width(), 2);
//! ```
//!
//! ### HTML to WordprocessingML
//!
//! ```rust
//! use tabspan::{convert_html_table, GridOptions, WordmlOptions};
//!
//! let html = r#"<table>
//!     <tr><td rowspan="2">Merged</td><td>1</td></tr>
//!     <tr><td>2</td></tr>
//! </table>"#;
//!
//! let output = convert_html_table(html, &GridOptions::default(), &WordmlOptions::default()).unwrap();
//! assert!(output.content.contains(r#"<w:vMerge w:val="restart"/>"#));
//! assert!(output.content.contains("<w:vMerge/>"));
//! assert!(!output.has_warnings());
//! ```

/// Core normalization modules
pub mod core;

/// HTML table reader
pub mod markup;

/// WordprocessingML table writer
pub mod wordml;

/// Utility modules
pub mod utils;

/// WASM bindings (feature-gated)
#[cfg(feature = "wasm")]
pub mod wasm;

use log::debug;

// Re-export grid types and functions
pub use core::grid::{
    normalize_table, normalize_table_with_options, ColumnSpanTracker, GridBuilder, GridOptions,
    InputCell, InputRow, NormalizedTable, OutputCell, OutputRow, VerticalMerge,
};

pub use markup::{parse_table, MarkupCell};
pub use wordml::{render_table, CellText, WordmlOptions};

// Re-export utilities
pub use utils::diagnostics;
pub use utils::error::{ConversionOutput, GridError, GridResult};

/// Read the first table of an HTML fragment and render it as WordprocessingML
///
/// # Arguments
/// * `html` - HTML fragment containing a `<table>` or bare `<tr>` rows
/// * `grid` - Grid normalization options
/// * `wordml` - Output options
///
/// # Returns
/// The `w:tbl` element, with markup and grid diagnostics
pub fn convert_html_table(
    html: &str,
    grid: &GridOptions,
    wordml: &WordmlOptions,
) -> GridResult<ConversionOutput> {
    let parsed = markup::parse_table_with_diagnostics(html)?;
    debug!("read {} row(s) from markup", parsed.rows.len());

    let mut diagnostics = parsed.diagnostics;
    let mut table = normalize_table_with_options(parsed.rows, grid)?;
    diagnostics.extend(std::mem::take(&mut table.diagnostics));

    let content = render_table(&table, wordml);
    Ok(ConversionOutput::with_diagnostics(content, diagnostics))
}

/// Read the first table of an HTML fragment into a normalized grid
pub fn normalize_html_table(html: &str, grid: &GridOptions) -> GridResult<NormalizedTable<MarkupCell>> {
    let parsed = markup::parse_table_with_diagnostics(html)?;
    let mut table = normalize_table_with_options(parsed.rows, grid)?;

    let mut diagnostics = parsed.diagnostics;
    diagnostics.extend(std::mem::take(&mut table.diagnostics));
    table.diagnostics = diagnostics;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;

    #[test]
    fn test_convert_simple() {
        let output = convert_html_table(
            "<table><tr><td>a</td><td>b</td></tr></table>",
            &GridOptions::default(),
            &WordmlOptions::default(),
        )
        .unwrap();
        assert_eq!(output.content.matches("<w:tc>").count(), 2);
        assert_eq!(output.content.matches("<w:gridCol/>").count(), 2);
        assert!(!output.has_warnings());
    }

    #[test]
    fn test_convert_collects_markup_and_grid_diagnostics() {
        let output = convert_html_table(
            r#"<tr><td colspan="2000">wide</td></tr><tr><td rowspan="3">tall</td></tr>"#,
            &GridOptions::default(),
            &WordmlOptions::default(),
        )
        .unwrap();
        let diagnostics = &output.diagnostics;
        assert_eq!(diagnostics.of_kind(DiagnosticKind::Markup).count(), 1);
        assert_eq!(diagnostics.of_kind(DiagnosticKind::TruncatedRun).count(), 1);
    }

    #[test]
    fn test_convert_too_wide_for_strict() {
        let err = convert_html_table(
            r#"<tr><td colspan="64">x</td></tr>"#,
            &GridOptions::strict(),
            &WordmlOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, GridError::TooWide { limit: 63, .. }));
    }

    #[test]
    fn test_convert_parse_error() {
        let err = convert_html_table(
            "<table><tr><td",
            &GridOptions::default(),
            &WordmlOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, GridError::ParseError { .. }));
    }

    #[test]
    fn test_normalize_html_table() {
        let table = normalize_html_table(
            "<tr><th>h</th><th>i</th></tr><tr><td>only</td></tr>",
            &GridOptions::rectangular(),
        )
        .unwrap();
        assert_eq!(table.column_count, 2);
        assert!(table.is_rectangular());
        assert!(table.rows[1].cells[1].is_vacant());
        assert_eq!(table.diagnostics.of_kind(DiagnosticKind::ShortRow).count(), 1);
    }
}
