//! Error handling for table normalization
//!
//! This module provides a unified error type and result type for grid
//! building, markup reading and rendering.

use std::fmt;

use thiserror::Error;

use crate::utils::diagnostics::CheckResult;

/// Which span attribute a contract violation refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanAxis {
    Row,
    Column,
}

impl fmt::Display for SpanAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpanAxis::Row => write!(f, "rowspan"),
            SpanAxis::Column => write!(f, "colspan"),
        }
    }
}

/// Grid error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// A cell declared a span below 1
    #[error("Invalid {axis} {value} on cell {cell} of row {row}: spans must be at least 1")]
    InvalidSpan {
        row: usize,
        cell: usize,
        axis: SpanAxis,
        value: usize,
    },
    /// A row would grow the table past the configured column limit
    #[error("Table too wide: row {row} needs {columns} columns (maximum allowed: {limit})")]
    TooWide {
        row: usize,
        columns: usize,
        limit: usize,
    },
    /// Markup could not be read
    #[error("Parse error{}: {message}", location_suffix(.line, .column))]
    ParseError {
        message: String,
        line: Option<usize>,
        column: Option<usize>,
    },
    /// IO error (for file operations)
    #[error("IO error: {message}")]
    IoError { message: String },
}

fn location_suffix(line: &Option<usize>, column: &Option<usize>) -> String {
    match (line, column) {
        (Some(l), Some(c)) => format!(" at line {}, column {}", l, c),
        (Some(l), None) => format!(" at line {}", l),
        _ => String::new(),
    }
}

impl From<std::io::Error> for GridError {
    fn from(err: std::io::Error) -> Self {
        GridError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type for grid operations
pub type GridResult<T> = Result<T, GridError>;

/// Rendered output with the diagnostics gathered on the way
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// The rendered content
    pub content: String,
    /// Irregularities absorbed during conversion
    pub diagnostics: CheckResult,
}

impl ConversionOutput {
    pub fn new(content: String) -> Self {
        Self {
            content,
            diagnostics: CheckResult::new(),
        }
    }

    pub fn with_diagnostics(content: String, diagnostics: CheckResult) -> Self {
        Self {
            content,
            diagnostics,
        }
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics.has_warnings()
    }
}

// Convenience constructors for errors
impl GridError {
    pub fn invalid_span(row: usize, cell: usize, axis: SpanAxis, value: usize) -> Self {
        GridError::InvalidSpan {
            row,
            cell,
            axis,
            value,
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        GridError::ParseError {
            message: message.into(),
            line: None,
            column: None,
        }
    }

    pub fn parse_at(message: impl Into<String>, line: usize, column: usize) -> Self {
        GridError::ParseError {
            message: message.into(),
            line: Some(line),
            column: Some(column),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::diagnostics::{Diagnostic, DiagnosticKind};

    #[test]
    fn test_invalid_span_display() {
        let err = GridError::invalid_span(2, 1, SpanAxis::Column, 0);
        let msg = err.to_string();
        assert!(msg.contains("colspan 0"));
        assert!(msg.contains("cell 1 of row 2"));
    }

    #[test]
    fn test_parse_error_with_location() {
        let err = GridError::parse_at("unterminated tag", 10, 5);
        let msg = err.to_string();
        assert!(msg.contains("line 10"));
        assert!(msg.contains("column 5"));
    }

    #[test]
    fn test_parse_error_without_location() {
        let err = GridError::parse("unexpected end of input");
        assert_eq!(err.to_string(), "Parse error: unexpected end of input");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.html");
        let err: GridError = io.into();
        assert!(err.to_string().starts_with("IO error"));
    }

    #[test]
    fn test_conversion_output() {
        let output = ConversionOutput::new("<w:tbl/>".to_string());
        assert!(!output.has_warnings());

        let mut diagnostics = CheckResult::new();
        diagnostics.add(Diagnostic::warning(DiagnosticKind::ShortRow, "short"));
        let output = ConversionOutput::with_diagnostics("<w:tbl/>".to_string(), diagnostics);
        assert!(output.has_warnings());

        let mut notes = CheckResult::new();
        notes.add(Diagnostic::info(DiagnosticKind::Markup, "colspan 5000 clamped to 1000"));
        let output = ConversionOutput::with_diagnostics("<w:tbl/>".to_string(), notes);
        assert!(!output.has_warnings());
    }
}
