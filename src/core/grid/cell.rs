//! Cell and row types for grid normalization

use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An author-declared cell with its row and column spans
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InputCell<T> {
    /// Opaque payload, moved into the emitted origin cell
    pub content: T,
    /// Number of rows this cell spans
    pub row_span: usize,
    /// Number of columns this cell spans
    pub col_span: usize,
}

impl<T> InputCell<T> {
    /// Create a cell spanning a single row and column
    pub fn new(content: T) -> Self {
        InputCell {
            content,
            row_span: 1,
            col_span: 1,
        }
    }

    /// Create a cell with explicit spans
    pub fn with_spans(content: T, row_span: usize, col_span: usize) -> Self {
        InputCell {
            content,
            row_span,
            col_span,
        }
    }

    /// Set the row span
    pub fn rows(mut self, row_span: usize) -> Self {
        self.row_span = row_span;
        self
    }

    /// Set the column span
    pub fn cols(mut self, col_span: usize) -> Self {
        self.col_span = col_span;
        self
    }
}

/// An ordered row of input cells
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InputRow<T> {
    /// Cells in declaration order
    pub cells: Vec<InputCell<T>>,
}

impl<T> InputRow<T> {
    /// Create a new empty row
    pub fn new() -> Self {
        InputRow { cells: Vec::new() }
    }

    /// Append a cell
    pub fn push(&mut self, cell: InputCell<T>) {
        self.cells.push(cell);
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<T> Default for InputRow<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<InputCell<T>>> for InputRow<T> {
    fn from(cells: Vec<InputCell<T>>) -> Self {
        InputRow { cells }
    }
}

impl<T> FromIterator<InputCell<T>> for InputRow<T> {
    fn from_iter<I: IntoIterator<Item = InputCell<T>>>(iter: I) -> Self {
        InputRow {
            cells: iter.into_iter().collect(),
        }
    }
}

/// Vertical merge marker carried by an output cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum VerticalMerge {
    /// First cell of a vertical run
    Restart,
    /// Every later cell of a vertical run
    Continue,
}

impl VerticalMerge {
    /// Value of the `w:vMerge/@w:val` attribute, `None` when it is omitted
    pub fn to_wordml(&self) -> Option<&'static str> {
        match self {
            VerticalMerge::Restart => Some("restart"),
            VerticalMerge::Continue => None,
        }
    }
}

/// One grid position of a normalized row
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "lowercase"))]
pub enum OutputCell<T> {
    /// Carries the author's content
    Origin {
        content: T,
        columns: Range<usize>,
        vertical_merge_restart: bool,
    },
    /// Empty placeholder continuing a vertical run from the row above
    Continuation { columns: Range<usize> },
    /// Empty cell with no merge markers, filling a column the row left uncovered
    Vacant { column: usize },
}

impl<T> OutputCell<T> {
    /// Columns occupied by this cell
    pub fn columns(&self) -> Range<usize> {
        match self {
            OutputCell::Origin { columns, .. } | OutputCell::Continuation { columns } => {
                columns.clone()
            }
            OutputCell::Vacant { column } => *column..*column + 1,
        }
    }

    /// Number of grid columns covered
    pub fn width(&self) -> usize {
        self.columns().len()
    }

    /// Leftmost grid column
    pub fn start_column(&self) -> usize {
        self.columns().start
    }

    /// Horizontal span count, present only on origin cells wider than one column
    pub fn horizontal_span(&self) -> Option<usize> {
        match self {
            OutputCell::Origin { columns, .. } if columns.len() > 1 => Some(columns.len()),
            _ => None,
        }
    }

    /// Vertical merge marker, if any
    pub fn vertical_merge(&self) -> Option<VerticalMerge> {
        match self {
            OutputCell::Origin {
                vertical_merge_restart: true,
                ..
            } => Some(VerticalMerge::Restart),
            OutputCell::Continuation { .. } => Some(VerticalMerge::Continue),
            _ => None,
        }
    }

    pub fn is_origin(&self) -> bool {
        matches!(self, OutputCell::Origin { .. })
    }

    pub fn is_continuation(&self) -> bool {
        matches!(self, OutputCell::Continuation { .. })
    }

    pub fn is_vacant(&self) -> bool {
        matches!(self, OutputCell::Vacant { .. })
    }

    /// Content of an origin cell
    pub fn content(&self) -> Option<&T> {
        match self {
            OutputCell::Origin { content, .. } => Some(content),
            _ => None,
        }
    }

    /// Consume the cell, returning the content of an origin cell
    pub fn into_content(self) -> Option<T> {
        match self {
            OutputCell::Origin { content, .. } => Some(content),
            _ => None,
        }
    }
}

/// A normalized row
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OutputRow<T> {
    /// Row number within the table (0-based)
    pub index: usize,
    /// Cells in left-to-right order
    pub cells: Vec<OutputCell<T>>,
}

impl<T> OutputRow<T> {
    pub fn new(index: usize) -> Self {
        OutputRow {
            index,
            cells: Vec::new(),
        }
    }

    /// Total number of grid columns covered by this row
    pub fn width(&self) -> usize {
        self.cells.iter().map(OutputCell::width).sum()
    }

    /// The cell covering grid column `col`
    pub fn cell_at(&self, col: usize) -> Option<&OutputCell<T>> {
        self.cells.iter().find(|cell| cell.columns().contains(&col))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Append vacant cells until the row covers `column_count` columns
    pub fn pad_to(&mut self, column_count: usize) {
        for column in self.width()..column_count {
            self.cells.push(OutputCell::Vacant { column });
        }
    }
}

/// The result of normalizing a whole table
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NormalizedTable<T> {
    /// Normalized rows, one per input row
    pub rows: Vec<OutputRow<T>>,
    /// Width of the widest row
    pub column_count: usize,
    /// Structural irregularities absorbed while building the grid
    #[cfg_attr(feature = "serde", serde(skip))]
    pub diagnostics: crate::utils::diagnostics::CheckResult,
}

impl<T> NormalizedTable<T> {
    /// Whether every row covers exactly `column_count` columns
    pub fn is_rectangular(&self) -> bool {
        self.rows.iter().all(|row| row.width() == self.column_count)
    }
}
