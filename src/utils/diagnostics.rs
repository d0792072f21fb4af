//! Diagnostics for LaTeX input
//!
//! Turns walker errors and warnings into located, printable diagnostics.
//! Offsets reported by the walker are bytes; lines and columns shown to the
//! user are 1-based and count characters.
//!
//! ## Example
//!
//! ```rust
//! use texwalk::data::default_latex_context;
//! use texwalk::utils::diagnostics::check_latex;
//!
//! let result = check_latex(r"\begin{foo}", &default_latex_context());
//! assert!(result.has_errors());
//! ```

use std::fmt;

use crate::core::walker::{ParsingDb, Walker};
use crate::utils::error::{ConversionWarning, ParseError};

/// `pos` clamped to `source` and moved back to the start of its character
fn char_floor(source: &str, pos: usize) -> usize {
    let mut pos = pos.min(source.len());
    while !source.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

/// 1-based line and column of byte offset `pos` in `source`
///
/// An offset inside a multibyte character points at that character.
pub fn line_col(source: &str, pos: usize) -> (usize, usize) {
    let before = &source[..char_floor(source, pos)];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    (line, before[line_start..].chars().count() + 1)
}

/// The full line of `source` containing byte offset `pos`, without newline
pub fn source_line(source: &str, pos: usize) -> &str {
    let pos = char_floor(source, pos);
    let start = source[..pos].rfind('\n').map_or(0, |i| i + 1);
    let end = source[pos..].find('\n').map_or(source.len(), |i| pos + i);
    source[start..end].trim_end_matches('\r')
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    /// Warning - the input was read, but some of it degraded to plain text
    Warning,
    /// Error - the input could not be parsed
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic message
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
    /// Line number (1-indexed)
    pub line: Option<usize>,
    /// Column number (1-indexed)
    pub column: Option<usize>,
    /// The source line the diagnostic points into
    pub source_text: Option<String>,
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn new(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            line: None,
            column: None,
            source_text: None,
            suggestion: None,
        }
    }

    pub fn with_location(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    pub fn with_source(mut self, text: impl Into<String>) -> Self {
        self.source_text = Some(text.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Locate `pos` in `source`, attaching the line it falls on
    pub fn at(self, source: &str, pos: usize) -> Self {
        let (line, column) = line_col(source, pos);
        self.with_location(line, column)
            .with_source(source_line(source, pos))
    }

    pub fn from_parse_error(source: &str, err: &ParseError) -> Self {
        Diagnostic::new(DiagnosticLevel::Error, err.kind.to_string()).at(source, err.position)
    }

    pub fn from_warning(source: &str, warning: &ConversionWarning) -> Self {
        let diag = Diagnostic::new(DiagnosticLevel::Warning, warning.message());
        let diag = match warning.position() {
            Some(pos) => diag.at(source, pos),
            None => diag,
        };
        match warning {
            ConversionWarning::UnknownMacro { .. }
            | ConversionWarning::UnknownEnvironment { .. } => {
                diag.with_suggestion("register a specification to read its arguments")
            }
            ConversionWarning::MissingRule { .. } => diag.with_suggestion("add a text rule"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: level: message
        //         --> line:column
        //         |
        //         | source text
        //         |    ^
        write!(f, "{}: {}", self.level, self.message)?;

        if let (Some(line), Some(col)) = (self.line, self.column) {
            write!(f, "\n  --> line {}:{}", line, col)?;
        }

        if let Some(ref source) = self.source_text {
            write!(f, "\n  |\n  | {}", source)?;
            if let Some(col) = self.column {
                write!(f, "\n  | {}^", " ".repeat(col.saturating_sub(1)))?;
            }
        }

        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\n  = help: {}", suggestion)?;
        }

        Ok(())
    }
}

/// Check result with summary
#[derive(Debug, Default)]
pub struct CheckResult {
    /// All diagnostics
    pub diagnostics: Vec<Diagnostic>,
    pub errors: usize,
    pub warnings: usize,
}

impl CheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic
    pub fn add(&mut self, diag: Diagnostic) {
        match diag.level {
            DiagnosticLevel::Error => self.errors += 1,
            DiagnosticLevel::Warning => self.warnings += 1,
        }
        self.diagnostics.push(diag);
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Check if there are any issues at all
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Get summary string
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.errors > 0 {
            parts.push(plural(self.errors, "error"));
        }
        if self.warnings > 0 {
            parts.push(plural(self.warnings, "warning"));
        }
        if parts.is_empty() {
            "no issues found".to_string()
        } else {
            parts.join(", ")
        }
    }
}

fn plural(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, if count == 1 { "" } else { "s" })
}

/// Walk `input` against `db` and report what went wrong.
///
/// Warnings are only reported when the whole input parses.
pub fn check_latex(input: &str, db: &ParsingDb) -> CheckResult {
    let mut result = CheckResult::new();
    let mut walker = Walker::new(input, db);
    match walker.parse() {
        Ok(_) => {
            for warning in walker.warnings() {
                result.add(Diagnostic::from_warning(input, warning));
            }
        }
        Err(err) => result.add(Diagnostic::from_parse_error(input, &err)),
    }
    result
}

/// A parse error with its location and a caret under the offending column
pub fn format_parse_error(source: &str, err: &ParseError) -> String {
    Diagnostic::from_parse_error(source, err).to_string()
}

/// Format check results for terminal output
pub fn format_diagnostics(result: &CheckResult, use_color: bool) -> String {
    let mut output = String::new();

    for diag in &result.diagnostics {
        if use_color {
            let color = match diag.level {
                DiagnosticLevel::Error => "\x1b[31m", // Red
                DiagnosticLevel::Warning => "\x1b[33m", // Yellow
            };
            output.push_str(color);
            output.push_str(&diag.to_string());
            output.push_str("\x1b[0m\n\n");
        } else {
            output.push_str(&format!("{}\n\n", diag));
        }
    }

    if use_color {
        if result.has_errors() {
            output.push_str("\x1b[31m");
        } else if result.warnings > 0 {
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
