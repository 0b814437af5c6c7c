//! Lexer error types.
//!
//! A lex error stops tokenization; the parser converts it into a parse error
//! with a line/column so callers see a single error shape.

use loka_ir::Span;
use std::fmt;

/// A lexer error and where it happened.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LexError {
    pub span: Span,
    pub kind: LexErrorKind,
}

/// What went wrong.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum LexErrorKind {
    /// Missing closing quote for a string literal.
    UnterminatedString,
    /// Missing closing backtick for a template literal.
    UnterminatedTemplate,
    /// `<sel` without its closing `/>`.
    UnterminatedQuery,
    /// `#`, `@` or `$` not followed by a name.
    EmptyReference { sigil: char },
    /// A character that starts no token.
    InvalidCharacter { found: char },
    /// Numeric literal that does not parse as a number.
    InvalidNumber,
}

impl LexError {
    #[cold]
    pub fn unterminated_string(span: Span) -> Self {
        LexError {
            span,
            kind: LexErrorKind::UnterminatedString,
        }
    }

    #[cold]
    pub fn unterminated_template(span: Span) -> Self {
        LexError {
            span,
            kind: LexErrorKind::UnterminatedTemplate,
        }
    }

    #[cold]
    pub fn unterminated_query(span: Span) -> Self {
        LexError {
            span,
            kind: LexErrorKind::UnterminatedQuery,
        }
    }

    #[cold]
    pub fn empty_reference(span: Span, sigil: char) -> Self {
        LexError {
            span,
            kind: LexErrorKind::EmptyReference { sigil },
        }
    }

    #[cold]
    pub fn invalid_character(span: Span, found: char) -> Self {
        LexError {
            span,
            kind: LexErrorKind::InvalidCharacter { found },
        }
    }

    #[cold]
    pub fn invalid_number(span: Span) -> Self {
        LexError {
            span,
            kind: LexErrorKind::InvalidNumber,
        }
    }

    /// A short hint for fixing the error, when one applies.
    pub fn suggestion(&self) -> Option<String> {
        match &self.kind {
            LexErrorKind::UnterminatedString => Some("add the closing quote".to_string()),
            LexErrorKind::UnterminatedTemplate => Some("add the closing backtick".to_string()),
            LexErrorKind::UnterminatedQuery => {
                Some("close the query reference with `/>`, e.g. `<button/>`".to_string())
            }
            LexErrorKind::EmptyReference { sigil } => {
                Some(format!("write a name directly after `{sigil}`"))
            }
            LexErrorKind::InvalidCharacter { found: '&' } => Some("use `and` or `&&`".to_string()),
            LexErrorKind::InvalidCharacter { found: '|' } => Some("use `or` or `||`".to_string()),
            LexErrorKind::InvalidCharacter { found: ';' } => {
                Some("separate commands with a newline or `then`".to_string())
            }
            LexErrorKind::InvalidCharacter { .. } | LexErrorKind::InvalidNumber => None,
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LexErrorKind::UnterminatedString => write!(f, "Unterminated string literal"),
            LexErrorKind::UnterminatedTemplate => write!(f, "Unterminated template literal"),
            LexErrorKind::UnterminatedQuery => write!(f, "Unterminated query reference"),
            LexErrorKind::EmptyReference { sigil } => {
                write!(f, "Expected a name after `{sigil}`")
            }
            LexErrorKind::InvalidCharacter { found } => {
                write!(f, "Unexpected character `{found}`")
            }
            LexErrorKind::InvalidNumber => write!(f, "Invalid number literal"),
        }
    }
}

impl std::error::Error for LexError {}

#[cfg(test)]
mod tests;
