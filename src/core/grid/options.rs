//! Grid building options

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options controlling grid normalization
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridOptions {
    /// Pad rows narrower than the final column count with vacant cells
    /// Only applies to batch normalization, streamed rows are emitted as-is
    /// Default: false
    pub pad_short_rows: bool,

    /// Largest column count a table may reach before it is rejected
    /// Default: 1000 (the HTML colspan ceiling)
    pub max_columns: usize,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            pad_short_rows: false,
            max_columns: 1000,
        }
    }
}

impl GridOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Options producing a strictly rectangular grid
    pub fn rectangular() -> Self {
        Self {
            pad_short_rows: true,
            ..Self::default()
        }
    }

    /// Options matching the column limit of WordprocessingML consumers
    pub fn strict() -> Self {
        Self {
            pad_short_rows: true,
            max_columns: 63,
        }
    }
}
