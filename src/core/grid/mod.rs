//! Table Grid Normalization
//!
//! Turns rows of spanning cells into a grid for formats that have no
//! spanning cell and mark merges on every occupied position instead
//! (WordprocessingML `w:gridSpan` / `w:vMerge`).
//!
//! The builder handles:
//! - Vertical runs (`rowspan`), continued by one placeholder per row
//! - Horizontal spans (`colspan`), kept on the run's origin cell
//! - Combined spans, continued by one placeholder as wide as the origin
//! - Irregular markup: short rows, runs past the table end, colliding spans
//!
//! # Architecture
//!
//! The builder keeps one slot per column recording how many more rows a
//! pending vertical run owns it:
//!
//! ```text
//! Input rows -> Column Span Tracker -> Row Emission -> Merge-marked rows
//! ```
//!
//! # Example
//!
//! ```
//! use tabspan::core::grid::{normalize_table, InputCell, InputRow, VerticalMerge};
//!
//! let rows = vec![
//!     InputRow::from(vec![InputCell::new("1"), InputCell::new("2").rows(2)]),
//!     InputRow::from(vec![InputCell::new("3")]),
//! ];
//! let output = normalize_table(rows).unwrap();
//! assert_eq!(output[1].cells.len(), 2);
//! assert_eq!(output[1].cells[1].vertical_merge(), Some(VerticalMerge::Continue));
//! ```

mod builder;
mod cell;
mod options;
mod tracker;


// Re-export public API
pub use builder::{normalize_table, normalize_table_with_options, GridBuilder};
pub use cell::{
    InputCell, InputRow, NormalizedTable, OutputCell, OutputRow, VerticalMerge,
};
pub use options::GridOptions;
pub use tracker::{ColumnSpanTracker, PendingRun};
