//! Parse error type.
//!
//! Every error carries the 1-based line/column of the offending token so
//! callers can report it without access to the source or a line index.

use loka_ir::{Location, Span};
use loka_lexer::LexError;
use std::fmt;

/// A syntax error with its location and an optional fix hint.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    pub line: u32,
    pub column: u32,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub suggestion: Option<String>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span, loc: Location) -> Self {
        ParseError {
            message: message.into(),
            span,
            line: loc.line,
            column: loc.column,
            suggestion: None,
        }
    }

    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Convert a lex error, resolving its location.
    pub fn from_lex(error: &LexError, loc: Location) -> Self {
        ParseError {
            message: error.to_string(),
            span: error.span,
            line: loc.line,
            column: loc.column,
            suggestion: error.suggestion(),
        }
    }

    pub fn location(&self) -> Location {
        Location::new(self.line, self.column)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at line {}, column {}", self.message, self.line, self.column)
    }
}

impl std::error::Error for ParseError {}
