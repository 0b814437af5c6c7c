//! Lexer for LokaScript.
//!
//! A hand-written single pass over the fragment. Two decisions need the
//! previous token and the whitespace before the current one:
//! - `.` is member access directly after an operand (`me.value`) and a class
//!   reference anywhere else (`add .active`).
//! - `'s` directly after an operand is the possessive (`me's value`), otherwise
//!   `'` opens a string.
//!
//! Comments run from `--` or `//` to the end of the line. Numbers take an
//! optional time suffix: `200ms` lexes as 200 and `2s` as 2000.

mod lex_error;

pub use lex_error::{LexError, LexErrorKind};

use loka_ir::{Span, Token, TokenKind, TokenList};

/// Tokenize a fragment. The returned list always ends with `Eof`.
pub fn lex(source: &str) -> Result<TokenList, LexError> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    tokens: TokenList,
    /// Trivia seen since the last token.
    spaced: bool,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Lexer {
            src,
            pos: 0,
            tokens: TokenList::new(),
            spaced: false,
        }
    }

    fn run(mut self) -> Result<TokenList, LexError> {
        loop {
            self.skip_trivia();
            let start = self.pos;
            let Some(c) = self.peek() else {
                self.push(TokenKind::Eof, start);
                return Ok(self.tokens);
            };

            let kind = match c {
                '0'..='9' => self.number(start)?,
                '.' => self.dot(start)?,
                '\'' if self.at_possessive() => {
                    self.pos += 2;
                    TokenKind::Possessive
                }
                '"' | '\'' => self.string(start, c)?,
                '`' => self.template(start)?,
                '#' => TokenKind::IdRef(self.sigil_name(start, '#')?),
                '@' => TokenKind::AttrRef(self.sigil_name(start, '@')?),
                '$' => {
                    self.pos += 1;
                    let name = self.take_while(is_ident_continue);
                    if name.is_empty() || !name.starts_with(is_ident_start) {
                        return Err(LexError::empty_reference(self.span_from(start), '$'));
                    }
                    TokenKind::Dollar(name.to_string())
                }
                '<' => self.angle(start)?,
                c if is_ident_start(c) => {
                    TokenKind::Ident(self.take_while(is_ident_continue).to_string())
                }
                _ => self.punct(start, c)?,
            };
            self.push(kind, start);
        }
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        let token = Token::new(kind, Span::from_range(start..self.pos), self.spaced);
        self.tokens.push(token);
        self.spaced = false;
    }

    #[inline]
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    #[inline]
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn span_from(&self, start: usize) -> Span {
        Span::from_range(start..self.pos)
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    /// Whether the previous token ended an operand with nothing in between.
    fn follows_operand(&self) -> bool {
        !self.spaced && self.tokens.last().is_some_and(|t| t.kind.ends_operand())
    }

    fn skip_trivia(&mut self) {
        loop {
            let rest = self.rest();
            if rest.starts_with("--") || rest.starts_with("//") {
                let len = rest.find('\n').unwrap_or(rest.len());
                self.pos += len;
                self.spaced = true;
                continue;
            }
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.pos += c.len_utf8();
                    self.spaced = true;
                }
                _ => return,
            }
        }
    }

    fn number(&mut self, start: usize) -> Result<TokenKind, LexError> {
        self.take_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
            self.take_while(|c| c.is_ascii_digit());
        }
        self.exponent();
        let src = self.src;
        self.finish_number(start, &src[start..self.pos])
    }

    fn exponent(&mut self) {
        if !matches!(self.peek(), Some('e' | 'E')) {
            return;
        }
        let digits_at = match self.peek_nth(1) {
            Some('+' | '-') => 2,
            _ => 1,
        };
        if self.peek_nth(digits_at).is_some_and(|c| c.is_ascii_digit()) {
            self.pos += digits_at;
            self.take_while(|c| c.is_ascii_digit());
        }
    }

    fn finish_number(&mut self, start: usize, text: &str) -> Result<TokenKind, LexError> {
        let value: f64 = if text.starts_with('.') {
            format!("0{text}").parse()
        } else {
            text.parse()
        }
        .map_err(|_| LexError::invalid_number(self.span_from(start)))?;

        let rest = self.rest();
        let scale = if rest.starts_with("ms") && !rest[2..].starts_with(is_ident_continue) {
            self.pos += 2;
            1.0
        } else if rest.starts_with('s') && !rest[1..].starts_with(is_ident_continue) {
            self.pos += 1;
            1000.0
        } else {
            1.0
        };
        Ok(TokenKind::Number(value * scale))
    }

    fn dot(&mut self, start: usize) -> Result<TokenKind, LexError> {
        if self.follows_operand() {
            self.pos += 1;
            return Ok(TokenKind::Dot);
        }
        match self.peek_nth(1) {
            Some(c) if is_ident_start(c) => {
                self.pos += 1;
                Ok(TokenKind::ClassRef(self.take_while(is_name_continue).to_string()))
            }
            Some(c) if c.is_ascii_digit() => {
                self.pos += 1;
                self.take_while(|c| c.is_ascii_digit());
                self.exponent();
                let src = self.src;
                self.finish_number(start, &src[start..self.pos])
            }
            _ => {
                self.pos += 1;
                Ok(TokenKind::Dot)
            }
        }
    }

    fn at_possessive(&self) -> bool {
        self.follows_operand()
            && self.peek_nth(1) == Some('s')
            && !self.peek_nth(2).is_some_and(is_ident_continue)
    }

    fn string(&mut self, start: usize, quote: char) -> Result<TokenKind, LexError> {
        self.pos += 1;
        let mut out = String::new();
        let mut chars = self.rest().char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                c if c == quote => {
                    self.pos += i + 1;
                    return Ok(TokenKind::Str(out));
                }
                '\\' => match chars.next() {
                    Some((_, 'n')) => out.push('\n'),
                    Some((_, 't')) => out.push('\t'),
                    Some((_, 'r')) => out.push('\r'),
                    Some((_, '0')) => out.push('\0'),
                    Some((_, other)) => out.push(other),
                    None => break,
                },
                c => out.push(c),
            }
        }
        self.pos = self.src.len();
        Err(LexError::unterminated_string(self.span_from(start)))
    }

    fn template(&mut self, start: usize) -> Result<TokenKind, LexError> {
        self.pos += 1;
        let mut out = String::new();
        let mut chars = self.rest().char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '`' => {
                    self.pos += i + 1;
                    return Ok(TokenKind::Template(out));
                }
                '\\' => match chars.next() {
                    Some((_, '`')) => out.push('`'),
                    Some((_, other)) => {
                        out.push('\\');
                        out.push(other);
                    }
                    None => break,
                },
                c => out.push(c),
            }
        }
        self.pos = self.src.len();
        Err(LexError::unterminated_template(self.span_from(start)))
    }

    fn sigil_name(&mut self, start: usize, sigil: char) -> Result<String, LexError> {
        self.pos += 1;
        let name = self.take_while(is_name_continue);
        if name.is_empty() {
            return Err(LexError::empty_reference(self.span_from(start), sigil));
        }
        Ok(name.to_string())
    }

    /// `<` is either a comparison or the start of a `<selector/>` query.
    ///
    /// Without a closing `/>` on the same line it is a comparison when an
    /// operand precedes it and an unterminated query anywhere else.
    fn angle(&mut self, start: usize) -> Result<TokenKind, LexError> {
        let starts_selector = self
            .peek_nth(1)
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '.' | '#' | '*' | '[' | ':'));
        if starts_selector {
            let body = &self.rest()[1..];
            let line = &body[..body.find('\n').unwrap_or(body.len())];
            if let Some(end) = line.find("/>") {
                let inner = &line[..end];
                if !inner.contains(['<', '>']) {
                    self.pos += 1 + end + 2;
                    return Ok(TokenKind::QueryRef(inner.trim().to_string()));
                }
            }
            if !self.tokens.last().is_some_and(|t| t.kind.ends_operand()) {
                self.pos += 1 + line.len();
                return Err(LexError::unterminated_query(self.span_from(start)));
            }
        }
        if self.rest().starts_with("<=") {
            self.pos += 2;
            Ok(TokenKind::LtEq)
        } else {
            self.pos += 1;
            Ok(TokenKind::Lt)
        }
    }

    fn punct(&mut self, start: usize, c: char) -> Result<TokenKind, LexError> {
        let rest = self.rest();
        let (kind, len) = if rest.starts_with("===") {
            (TokenKind::EqEqEq, 3)
        } else if rest.starts_with("!==") {
            (TokenKind::NotEqEq, 3)
        } else if rest.starts_with("==") {
            (TokenKind::EqEq, 2)
        } else if rest.starts_with("!=") {
            (TokenKind::NotEq, 2)
        } else if rest.starts_with(">=") {
            (TokenKind::GtEq, 2)
        } else if rest.starts_with("&&") {
            (TokenKind::AndAnd, 2)
        } else if rest.starts_with("||") {
            (TokenKind::OrOr, 2)
        } else {
            let kind = match c {
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                '[' => TokenKind::LBracket,
                ']' => TokenKind::RBracket,
                '{' => TokenKind::LBrace,
                '}' => TokenKind::RBrace,
                ',' => TokenKind::Comma,
                ':' => TokenKind::Colon,
                '?' => TokenKind::Question,
                '+' => TokenKind::Plus,
                '-' => TokenKind::Minus,
                '*' => TokenKind::Star,
                '/' => TokenKind::Slash,
                '%' => TokenKind::Percent,
                '=' => TokenKind::Assign,
                '>' => TokenKind::Gt,
                '!' => TokenKind::Bang,
                _ => {
                    self.pos += c.len_utf8();
                    return Err(LexError::invalid_character(self.span_from(start), c));
                }
            };
            (kind, 1)
        };
        self.pos += len;
        Ok(kind)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Class, id and attribute names also allow `-`.
fn is_name_continue(c: char) -> bool {
    is_ident_continue(c) || c == '-'
}
