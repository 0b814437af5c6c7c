//! Recursive descent parser for LokaScript.
//!
//! `parse` is total: it always returns a `ParseOutput`, with either a root
//! node or at least one error. Parsing stops at the first error; fragments are
//! short attribute values and one precise error is more useful than a
//! cascade.

mod error;
mod grammar;

pub use error::ParseError;

use loka_ir::{LineIndex, Location, Node, NodeKind, Span, Token, TokenKind, TokenList};
use loka_stack::ensure_sufficient_stack;

/// Deepest nesting a fragment may have: parenthesised and unary
/// expressions, operator chains, and blocks each count one level.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Result of parsing one fragment.
#[derive(Clone, Debug)]
pub struct ParseOutput {
    pub node: Option<Node>,
    pub tokens: TokenList,
    pub errors: Vec<ParseError>,
}

impl ParseOutput {
    pub fn success(&self) -> bool {
        self.node.is_some() && self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn first_error(&self) -> Option<&ParseError> {
        self.errors.first()
    }
}

/// Parse a fragment of LokaScript source.
pub fn parse(source: &str) -> ParseOutput {
    let lines = LineIndex::new(source);
    let tokens = match loka_lexer::lex(source) {
        Ok(tokens) => tokens,
        Err(err) => {
            let loc = lines.location(source, err.span.start);
            return ParseOutput {
                node: None,
                tokens: TokenList::new(),
                errors: vec![ParseError::from_lex(&err, loc)],
            };
        }
    };

    let result = Parser::new(source, &lines, &tokens).parse_program();
    tracing::trace!(tokens = tokens.len(), ok = result.is_ok(), "parsed fragment");
    match result {
        Ok(node) => ParseOutput {
            node: Some(node),
            tokens,
            errors: Vec::new(),
        },
        Err(err) => ParseOutput {
            node: None,
            tokens,
            errors: vec![err],
        },
    }
}

pub(crate) type ParseResult<T> = Result<T, ParseError>;

/// Parser state: a cursor over the token list plus what is needed to
/// resolve locations.
pub(crate) struct Parser<'a> {
    source: &'a str,
    lines: &'a LineIndex,
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, lines: &'a LineIndex, tokens: &'a TokenList) -> Self {
        Parser {
            source,
            lines,
            tokens: tokens.as_slice(),
            pos: 0,
            depth: 0,
        }
    }

    /// Parse the whole fragment. A single top-level command is returned
    /// as-is; several become a `Sequence`.
    fn parse_program(&mut self) -> ParseResult<Node> {
        let start = self.current_span();
        let mut nodes = self.parse_commands(&[])?;
        if !self.at_eof() {
            return Err(self.unexpected());
        }
        match nodes.len() {
            0 => Err(self.error_here("Expected expression")),
            1 => Ok(nodes.remove(0)),
            _ => Ok(self.finish(NodeKind::Sequence(nodes), start)),
        }
    }

    // Cursor

    #[inline]
    fn current(&self) -> &'a Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.pos.min(last)]
    }

    #[inline]
    fn current_kind(&self) -> &'a TokenKind {
        &self.current().kind
    }

    #[inline]
    fn current_span(&self) -> Span {
        self.current().span
    }

    fn peek_kind(&self, n: usize) -> &'a TokenKind {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[(self.pos + n).min(last)].kind
    }

    fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(Span::DUMMY, |t| t.span)
    }

    #[inline]
    fn at_eof(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn advance(&mut self) -> &'a Token {
        let token = self.current();
        if !self.at_eof() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> ParseResult<()> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.error_here(format!(
                "Expected `{}`, found {}",
                kind.symbol(),
                self.current_kind().describe()
            )))
        }
    }

    /// The identifier text of the current token, if it is an identifier.
    fn current_ident(&self) -> Option<&'a str> {
        match self.current_kind() {
            TokenKind::Ident(name) => Some(name.as_str()),
            _ => None,
        }
    }

    fn check_keyword(&self, keyword: &str) -> bool {
        self.current_ident() == Some(keyword)
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, keyword: &str, context: &str) -> ParseResult<()> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.error_here(format!(
                "Expected `{keyword}` {context}, found {}",
                self.current_kind().describe()
            )))
        }
    }

    fn expect_ident(&mut self, what: &str) -> ParseResult<String> {
        match self.current_kind() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name.clone())
            }
            other => Err(self.error_here(format!("Expected {what}, found {}", other.describe()))),
        }
    }

    /// Whether a line break separates the current token from the previous one.
    fn after_newline(&self) -> bool {
        if self.pos == 0 {
            return false;
        }
        let gap = self.previous_span().end as usize..self.current_span().start as usize;
        self.source.get(gap).is_some_and(|text| text.contains('\n'))
    }

    // Nesting

    /// Run `f` one nesting level deeper, with room on the stack for it.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        self.deepen()?;
        let result = ensure_sufficient_stack(|| f(self));
        self.depth -= 1;
        result
    }

    /// Count one more nesting level. Callers that extend a chain in a loop
    /// restore `depth` themselves once the chain is complete.
    fn deepen(&mut self) -> ParseResult<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self
                .error_here("Expression is nested too deeply")
                .with_suggestion("split it into smaller steps with `set`"));
        }
        self.depth += 1;
        Ok(())
    }

    // Node construction and errors

    fn location(&self, span: Span) -> Location {
        self.lines.location(self.source, span.start)
    }

    /// Build a node covering `start` through the previously consumed token.
    fn finish(&self, kind: NodeKind, start: Span) -> Node {
        let span = start.merge(self.previous_span());
        Node::new(kind, span, self.location(start))
    }

    fn error_at(&self, message: impl Into<String>, span: Span) -> ParseError {
        ParseError::new(message, span, self.location(span))
    }

    fn error_here(&self, message: impl Into<String>) -> ParseError {
        self.error_at(message, self.current_span())
    }

    fn unexpected(&self) -> ParseError {
        self.error_here(format!("Unexpected {}", self.current_kind().describe()))
            .with_suggestion("separate commands with `then` or a newline")
    }
}

#[cfg(test)]
mod tests;
