//! Utility modules
//!
//! This module contains utilities and helpers:
//! - Diagnostics and error reporting
//! - Error types and result types

pub mod diagnostics;
pub mod error;

// Re-export commonly used items
pub use diagnostics::{
    check_latex, format_diagnostics, format_parse_error, line_col, CheckResult, Diagnostic,
    DiagnosticLevel,
};
pub use error::{
    ConfigError, ConversionOutput, ConversionWarning, ParseError, ParseErrorKind, ParseResult,
};
