//! Utility modules
//!
//! This module contains utilities and helpers:
//! - Diagnostics for absorbed structural irregularities
//! - Error types and result types

pub mod diagnostics;
pub mod error;

// Re-export commonly used items
pub use diagnostics::{format_diagnostics, CheckResult, Diagnostic, DiagnosticKind, DiagnosticLevel};
pub use error::{ConversionOutput, GridError, GridResult, SpanAxis};
