//! Error handling for texwalk
//!
//! Fatal conditions are [`ParseError`] (the walker gave up on the input) and
//! [`ConfigError`] (a category, signature or template was rejected while a
//! context database was being built). Everything else is recoverable and is
//! reported as a [`ConversionWarning`].

use std::fmt;

use thiserror::Error;

use crate::core::context::SpecKind;
use crate::core::walker::nodes::Delimiter;

/// Reason a parse was aborted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A `{` or an optional `[` was never closed
    #[error("unterminated {0} group")]
    UnterminatedGroup(Delimiter),
    /// A `}` with no open group
    #[error("unexpected closing brace")]
    UnexpectedClosingBrace,
    /// `\end{found}` closed `\begin{expected}`
    #[error("environment mismatch: \\begin{{{expected}}} closed by \\end{{{found}}}")]
    EnvironmentMismatch { expected: String, found: String },
    /// End of input reached inside an environment body
    #[error("environment '{name}' is never closed")]
    UnterminatedEnvironment { name: String },
    /// `\end{name}` with no environment open at this level
    #[error("unexpected \\end{{{name}}}")]
    UnexpectedEnvironmentEnd { name: String },
    /// `\begin` or `\end` not followed by a braced name
    #[error("expected a braced environment name after \\{marker}")]
    MalformedEnvironmentName { marker: String },
    /// A mandatory argument slot had no brace group
    #[error("missing mandatory argument #{slot} for {kind} '{name}'")]
    MissingArgument {
        kind: SpecKind,
        name: String,
        slot: usize,
    },
    /// Groups and environments nested deeper than the walker allows
    #[error("maximum nesting depth ({max_depth}) exceeded")]
    MaxDepthExceeded { max_depth: usize },
    /// A start offset that is out of range or not on a character boundary
    #[error("invalid start position")]
    InvalidPosition,
}

/// A fatal parse error, located at a byte offset of the source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at offset {position}: {kind}")]
pub struct ParseError {
    pub position: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(position: usize, kind: ParseErrorKind) -> Self {
        Self { position, kind }
    }

    /// 1-based line and column of the error in `source`
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        crate::utils::diagnostics::line_col(source, self.position)
    }
}

/// Rejected configuration, reported when a database entry is built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("malformed argument signature '{signature}': unexpected '{found}' at {position}")]
    MalformedSignature {
        signature: String,
        position: usize,
        found: char,
    },
    #[error("malformed template '{template}': {reason}")]
    MalformedTemplate { template: String, reason: String },
    #[error("{0} name must not be empty")]
    EmptyName(SpecKind),
    #[error("no category named '{0}'")]
    UnknownCategory(String),
}

/// Result type for parse operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Non-fatal conditions met while walking or converting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionWarning {
    /// A macro name with no parsing specification
    UnknownMacro { name: String, position: usize },
    /// An environment name with no parsing specification
    UnknownEnvironment { name: String, position: usize },
    /// A node with no replacement rule in the text database
    MissingRule { kind: SpecKind, name: String },
}

impl ConversionWarning {
    /// Convert to a human-readable message
    pub fn message(&self) -> String {
        match self {
            ConversionWarning::UnknownMacro { name, .. } => {
                format!("no parsing specification for macro '\\{}'", name)
            }
            ConversionWarning::UnknownEnvironment { name, .. } => {
                format!("no parsing specification for environment '{}'", name)
            }
            ConversionWarning::MissingRule { kind, name } => {
                format!("no text rule for {} '{}'", kind, name)
            }
        }
    }

    /// Source offset of the condition, when the walker reported it
    pub fn position(&self) -> Option<usize> {
        match self {
            ConversionWarning::UnknownMacro { position, .. }
            | ConversionWarning::UnknownEnvironment { position, .. } => Some(*position),
            ConversionWarning::MissingRule { .. } => None,
        }
    }
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Warning: {}", self.message())
    }
}

/// Conversion output with optional warnings
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// The converted content
    pub content: String,
    /// Any warnings generated during conversion
    pub warnings: Vec<ConversionWarning>,
}

impl ConversionOutput {
    pub fn new(content: String) -> Self {
        Self {
            content,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(content: String, warnings: Vec<ConversionWarning>) -> Self {
        Self { content, warnings }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new(3, ParseErrorKind::UnexpectedClosingBrace);
        let msg = err.to_string();
        assert!(msg.contains("offset 3"));
        assert!(msg.contains("unexpected closing brace"));
    }

    #[test]
    fn test_environment_mismatch_display() {
        let err = ParseError::new(
            0,
            ParseErrorKind::EnvironmentMismatch {
                expected: "inquotes".to_string(),
                found: "outquotes".to_string(),
            },
        );
        let msg = err.to_string();
        assert!(msg.contains(r"\begin{inquotes}"));
        assert!(msg.contains(r"\end{outquotes}"));
    }

    #[test]
    fn test_parse_error_line_col() {
        let err = ParseError::new(6, ParseErrorKind::UnexpectedClosingBrace);
        assert_eq!(err.line_col("abc\nde}"), (2, 3));
    }

    #[test]
    fn test_missing_argument_display() {
        let kind = ParseErrorKind::MissingArgument {
            kind: SpecKind::Macro,
            name: "putinquotes".to_string(),
            slot: 3,
        };
        assert_eq!(
            kind.to_string(),
            "missing mandatory argument #3 for macro 'putinquotes'"
        );
    }

    #[test]
    fn test_warning_message() {
        let warn = ConversionWarning::MissingRule {
            kind: SpecKind::Environment,
            name: "tabular".to_string(),
        };
        assert!(warn.to_string().contains("environment 'tabular'"));
        assert_eq!(warn.position(), None);
    }

    #[test]
    fn test_conversion_output() {
        let output = ConversionOutput::new("hello".to_string());
        assert!(!output.has_warnings());

        let output_with_warn = ConversionOutput::with_warnings(
            "hello".to_string(),
            vec![ConversionWarning::UnknownMacro {
                name: "foobar".to_string(),
                position: 0,
            }],
        );
        assert!(output_with_warn.has_warnings());
    }
}
