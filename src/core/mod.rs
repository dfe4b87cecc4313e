//! Core normalization modules
//!
//! - `grid`: spanning rows to merge-marked rows

pub mod grid;

pub use grid::{
    normalize_table, normalize_table_with_options, GridBuilder, GridOptions, NormalizedTable,
};
