//! Table structure diagnostics
//!
//! Grid normalization never fails on irregular tables: rows of differing
//! width, spans that run past the last row and spans colliding with a
//! pending vertical run are all absorbed. This module reports what was
//! absorbed so callers can surface it:
//!
//! - Vertical runs truncated by the end of the table
//! - Column spans clipped by a pending vertical run
//! - Rows narrower or wider than the rest of the table
//! - Interior gaps filled with vacant cells
//!
//! Warnings mark output that differs from what the markup declared. Notes
//! record adjustments the HTML table rules make anyway, such as span
//! clamping, and never fail a strict check.
//!
//! ## Example
//!
//! ```rust
//! use tabspan::core::grid::{InputCell, InputRow};
//! use tabspan::{normalize_table_with_options, GridOptions};
//!
//! let rows = vec![InputRow::from(vec![InputCell::new("a").rows(3)])];
//! let table = normalize_table_with_options(rows, &GridOptions::default()).unwrap();
//! assert_eq!(table.diagnostics.warnings, 1);
//! ```

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DiagnosticLevel {
    /// Informational note
    Info,
    /// Warning - output is valid but differs from what the markup declared
    Warning,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Info => write!(f, "info"),
            DiagnosticLevel::Warning => write!(f, "warning"),
        }
    }
}

/// What kind of irregularity was absorbed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum DiagnosticKind {
    /// A rowspan extends past the last row
    TruncatedRun,
    /// A colspan ran into a column owned by a vertical run
    ClippedSpan,
    /// A row covers fewer columns than the table
    ShortRow,
    /// A row is wider than every row before it
    WideRow,
    /// A free column before a pending run was filled with a vacant cell
    RowGap,
    /// Markup-level issue reported by the table reader
    Markup,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::TruncatedRun => "truncated-run",
            DiagnosticKind::ClippedSpan => "clipped-span",
            DiagnosticKind::ShortRow => "short-row",
            DiagnosticKind::WideRow => "wide-row",
            DiagnosticKind::RowGap => "row-gap",
            DiagnosticKind::Markup => "markup",
        };
        f.write_str(name)
    }
}

/// A single diagnostic message
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Diagnostic {
    /// Severity level
    pub level: DiagnosticLevel,
    /// Irregularity category
    pub kind: DiagnosticKind,
    /// Human-readable message
    pub message: String,
    /// Table row (0-based)
    pub row: Option<usize>,
    /// Grid column (0-based)
    pub column: Option<usize>,
    /// Suggested fix
    pub suggestion: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(level: DiagnosticLevel, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            level,
            kind,
            message: message.into(),
            row: None,
            column: None,
            suggestion: None,
        }
    }

    /// Shorthand for a warning
    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Warning, kind, message)
    }

    /// Shorthand for an informational note
    pub fn info(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Info, kind, message)
    }

    /// Add grid location information
    pub fn with_location(mut self, row: usize, column: usize) -> Self {
        self.row = Some(row);
        self.column = Some(column);
        self
    }

    /// Add row information only
    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    /// Add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: level[kind]: message
        //         --> row R, column C
        //         = help: suggestion

        write!(f, "{}[{}]: {}", self.level, self.kind, self.message)?;

        match (self.row, self.column) {
            (Some(row), Some(col)) => write!(f, "\n  --> row {}, column {}", row + 1, col + 1)?,
            (Some(row), None) => write!(f, "\n  --> row {}", row + 1)?,
            _ => {}
        }

        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\n  = help: {}", suggestion)?;
        }

        Ok(())
    }
}

/// Check result with summary
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CheckResult {
    /// All diagnostics
    pub diagnostics: Vec<Diagnostic>,
    /// Number of warnings
    pub warnings: usize,
    /// Number of info messages
    pub infos: usize,
}

impl CheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic
    pub fn add(&mut self, diag: Diagnostic) {
        match diag.level {
            DiagnosticLevel::Warning => self.warnings += 1,
            DiagnosticLevel::Info => self.infos += 1,
        }
        self.diagnostics.push(diag);
    }

    /// Move every diagnostic of `other` into this result
    pub fn extend(&mut self, other: CheckResult) {
        for diag in other.diagnostics {
            self.add(diag);
        }
    }

    /// Check if any diagnostic is a warning
    pub fn has_warnings(&self) -> bool {
        self.warnings > 0
    }

    /// Whether a check should fail: strict checks fail on any warning
    pub fn fails(&self, strict: bool) -> bool {
        strict && self.has_warnings()
    }

    /// Check if there are any issues at all
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Diagnostics of one kind
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }

    /// Get summary string
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.warnings > 0 {
            parts.push(format!(
                "{} warning{}",
                self.warnings,
                if self.warnings == 1 { "" } else { "s" }
            ));
        }
        if self.infos > 0 {
            parts.push(format!(
                "{} note{}",
                self.infos,
                if self.infos == 1 { "" } else { "s" }
            ));
        }
        if parts.is_empty() {
            "no issues found".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Format check results for terminal output
pub fn format_diagnostics(result: &CheckResult, use_color: bool) -> String {
    let mut output = String::new();

    for diag in &result.diagnostics {
        if use_color {
            let color = match diag.level {
                DiagnosticLevel::Warning => "\x1b[33m", // Yellow
                DiagnosticLevel::Info => "\x1b[34m",    // Blue
            };
            output.push_str(color);
            output.push_str(&format!("{}", diag));
            output.push_str("\x1b[0m\n\n");
        } else {
            output.push_str(&format!("{}\n\n", diag));
        }
    }

    // Summary
    if use_color {
        if result.has_warnings() {
            output.push_str("\x1b[33m");
        } else {
            output.push_str("\x1b[32m");
        }
    }

    output.push_str(&format!("Summary: {}", result.summary()));

    if use_color {
        output.push_str("\x1b[0m");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_format() {
        let mut result = CheckResult::new();
        result.add(Diagnostic::new(
            DiagnosticLevel::Info,
            DiagnosticKind::Markup,
            "test",
        ));
        result.add(Diagnostic::warning(DiagnosticKind::ShortRow, "test"));
        result.add(Diagnostic::warning(DiagnosticKind::RowGap, "test"));

        assert_eq!(result.summary(), "2 warnings, 1 note");
    }

    #[test]
    fn test_strict_check_fails_on_warnings_only() {
        let mut result = CheckResult::new();
        assert!(!result.fails(true));

        result.add(Diagnostic::info(DiagnosticKind::Markup, "colspan 5000 clamped to 1000"));
        assert!(!result.has_warnings());
        assert!(!result.fails(true));

        result.add(Diagnostic::warning(DiagnosticKind::TruncatedRun, "cut short"));
        assert!(result.fails(true));
        assert!(!result.fails(false));
    }

    #[test]
    fn test_empty_summary() {
        let result = CheckResult::new();
        assert!(result.is_empty());
        assert_eq!(result.summary(), "no issues found");
    }

    #[test]
    fn test_display_is_one_based() {
        let diag = Diagnostic::warning(DiagnosticKind::TruncatedRun, "rowspan cut short")
            .with_location(0, 2)
            .with_suggestion("reduce the rowspan");
        let text = diag.to_string();
        assert!(text.starts_with("warning[truncated-run]: rowspan cut short"));
        assert!(text.contains("row 1, column 3"));
        assert!(text.contains("= help: reduce the rowspan"));
    }

    #[test]
    fn test_format_without_color() {
        let mut result = CheckResult::new();
        result.add(Diagnostic::info(DiagnosticKind::WideRow, "wider").with_row(4));
        let text = format_diagnostics(&result, false);
        assert!(!text.contains("\x1b["));
        assert!(text.contains("--> row 5"));
        assert!(text.ends_with("Summary: 1 note"));
    }

    #[test]
    fn test_extend_keeps_counts() {
        let mut a = CheckResult::new();
        a.add(Diagnostic::warning(DiagnosticKind::RowGap, "gap"));
        let mut b = CheckResult::new();
        b.add(Diagnostic::warning(DiagnosticKind::ClippedSpan, "clip"));
        b.add(Diagnostic::info(DiagnosticKind::WideRow, "wide"));
        a.extend(b);
        assert_eq!(a.len(), 3);
        assert_eq!(a.warnings, 2);
        assert_eq!(a.infos, 1);
        assert_eq!(a.of_kind(DiagnosticKind::ClippedSpan).count(), 1);
    }
}
