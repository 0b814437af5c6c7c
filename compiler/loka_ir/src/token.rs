//! Token types for the LokaScript lexer.
//!
//! Keywords are not separate token kinds: LokaScript reuses most of its
//! keywords as ordinary identifiers (`to`, `on`, `for`, ...), so the parser
//! decides by context. Only punctuation and the reference forms
//! (`.cls`, `#id`, `<sel/>`, `@attr`, `$name`) get their own kinds.

use super::Span;
use std::fmt;

/// A token with its span in the source.
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// Whether whitespace (or a comment) separated this token from the previous one.
    pub spaced: bool,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span, spaced: bool) -> Self {
        Token { kind, span, spaced }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.span)
    }
}

/// Token kinds for LokaScript.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TokenKind {
    /// Numeric literal: 42, 3.5
    Number(f64),
    /// Quoted string literal with escapes already cooked: "hi", 'hi'
    Str(String),
    /// Backtick template literal, raw body (interpolation happens at evaluation)
    Template(String),
    /// Identifier or keyword
    Ident(String),
    /// Class reference: `.active`
    ClassRef(String),
    /// Id reference: `#main`
    IdRef(String),
    /// Query reference: `<button.primary/>` (stores the inner selector)
    QueryRef(String),
    /// Attribute reference: `@disabled`
    AttrRef(String),
    /// Dollar reference: `$count`
    Dollar(String),

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Dot,
    Colon,
    Question,
    /// Possessive suffix: `'s`
    Possessive,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Assign,
    EqEq,
    NotEq,
    EqEqEq,
    NotEqEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Bang,
    AndAnd,
    OrOr,

    Eof,
}

impl TokenKind {
    /// Human-readable description used in "expected X, found Y" messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Number(n) => format!("number `{n}`"),
            TokenKind::Str(_) => "string".to_string(),
            TokenKind::Template(_) => "template literal".to_string(),
            TokenKind::Ident(name) => format!("`{name}`"),
            TokenKind::ClassRef(name) => format!("`.{name}`"),
            TokenKind::IdRef(name) => format!("`#{name}`"),
            TokenKind::QueryRef(sel) => format!("`<{sel}/>`"),
            TokenKind::AttrRef(name) => format!("`@{name}`"),
            TokenKind::Dollar(name) => format!("`${name}`"),
            TokenKind::Eof => "end of input".to_string(),
            other => format!("`{}`", other.symbol()),
        }
    }

    /// Source spelling of punctuation and operator tokens.
    pub fn symbol(&self) -> &'static str {
        match self {
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Colon => ":",
            TokenKind::Question => "?",
            TokenKind::Possessive => "'s",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Assign => "=",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::EqEqEq => "===",
            TokenKind::NotEqEq => "!==",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::LtEq => "<=",
            TokenKind::GtEq => ">=",
            TokenKind::Bang => "!",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            _ => "",
        }
    }

    /// Whether this token can end an operand, which decides if a following
    /// `.` is member access or a class reference.
    pub fn ends_operand(&self) -> bool {
        matches!(
            self,
            TokenKind::Number(_)
                | TokenKind::Str(_)
                | TokenKind::Template(_)
                | TokenKind::Ident(_)
                | TokenKind::ClassRef(_)
                | TokenKind::IdRef(_)
                | TokenKind::QueryRef(_)
                | TokenKind::AttrRef(_)
                | TokenKind::Dollar(_)
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
        )
    }
}

/// Lexer output: every token of a fragment, terminated by `Eof`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        TokenList { tokens: Vec::new() }
    }

    #[inline]
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn last(&self) -> Option<&Token> {
        self.tokens.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
