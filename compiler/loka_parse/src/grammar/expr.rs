//! Expression parsing.
//!
//! Precedence, loosest first:
//! ternary, `or`, `and`, comparison (`== is in matches contains ...`),
//! additive, multiplicative, unary, postfix (`.x`, `[k]`, `(args)`, `'s x`).

use loka_ir::{
    BinaryOp, Literal, MemberProperty, Node, NodeKind, ObjectEntry, ObjectKey, Span, TokenKind,
    UnaryOp,
};

use super::{BLOCK_WORDS, NON_PROPERTY_WORDS};
use crate::{ParseResult, Parser};

impl Parser<'_> {
    pub(crate) fn parse_expression(&mut self) -> ParseResult<Node> {
        self.nested(Self::parse_conditional)
    }

    fn parse_conditional(&mut self) -> ParseResult<Node> {
        let test = self.parse_or()?;
        if !self.eat(&TokenKind::Question) {
            return Ok(test);
        }
        let consequent = self.parse_expression()?;
        self.expect(&TokenKind::Colon)?;
        let alternate = self.parse_expression()?;
        let span = test.span.merge(alternate.span);
        let loc = test.loc;
        Ok(Node::new(
            NodeKind::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
            span,
            loc,
        ))
    }

    fn parse_or(&mut self) -> ParseResult<Node> {
        let depth = self.depth;
        let mut left = self.parse_and()?;
        while self.eat_keyword("or") || self.eat(&TokenKind::OrOr) {
            self.deepen()?;
            let right = self.parse_and()?;
            left = binary(BinaryOp::Or, left, right);
        }
        self.depth = depth;
        Ok(left)
    }

    fn parse_and(&mut self) -> ParseResult<Node> {
        let depth = self.depth;
        let mut left = self.parse_comparison()?;
        while self.eat_keyword("and") || self.eat(&TokenKind::AndAnd) {
            self.deepen()?;
            let right = self.parse_comparison()?;
            left = binary(BinaryOp::And, left, right);
        }
        self.depth = depth;
        Ok(left)
    }

    fn parse_comparison(&mut self) -> ParseResult<Node> {
        let depth = self.depth;
        let mut left = self.parse_additive()?;
        while let Some((op, width)) = self.comparison_op() {
            for _ in 0..width {
                self.advance();
            }
            self.deepen()?;
            let right = self.parse_additive()?;
            left = binary(op, left, right);
        }
        self.depth = depth;
        Ok(left)
    }

    /// The comparison operator at the cursor and how many tokens it spans.
    fn comparison_op(&self) -> Option<(BinaryOp, usize)> {
        match self.current_kind() {
            TokenKind::Ident(word) => match word.as_str() {
                "is" if matches!(self.peek_kind(1), TokenKind::Ident(w) if w == "not") => {
                    BinaryOp::from_spelling("is not").map(|op| (op, 2))
                }
                "is" | "in" | "match" | "matches" | "contains" => {
                    BinaryOp::from_spelling(word).map(|op| (op, 1))
                }
                _ => None,
            },
            kind @ (TokenKind::EqEq
            | TokenKind::NotEq
            | TokenKind::EqEqEq
            | TokenKind::NotEqEq
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::LtEq
            | TokenKind::GtEq) => BinaryOp::from_spelling(kind.symbol()).map(|op| (op, 1)),
            _ => None,
        }
    }

    fn parse_additive(&mut self) -> ParseResult<Node> {
        let depth = self.depth;
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.current_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            self.deepen()?;
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }
        self.depth = depth;
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> ParseResult<Node> {
        let depth = self.depth;
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                TokenKind::Ident(word) if word == "mod" => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            self.deepen()?;
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }
        self.depth = depth;
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Node> {
        let start = self.current_span();
        let op = match self.current_kind() {
            TokenKind::Ident(word) if word == "not" || word == "no" => UnaryOp::from_spelling(word),
            kind @ (TokenKind::Bang | TokenKind::Minus | TokenKind::Plus) => {
                UnaryOp::from_spelling(kind.symbol())
            }
            _ => None,
        };
        let Some(op) = op else {
            return self.parse_postfix();
        };
        self.advance();
        let operand = self.nested(Self::parse_unary)?;
        Ok(self.finish(
            NodeKind::Unary {
                op,
                operand: Box::new(operand),
            },
            start,
        ))
    }

    fn parse_postfix(&mut self) -> ParseResult<Node> {
        let start = self.current_span();
        let depth = self.depth;
        let mut node = self.parse_primary()?;
        loop {
            let token = self.current();
            let extends = match token.kind {
                TokenKind::Dot | TokenKind::Possessive => true,
                TokenKind::LBracket | TokenKind::LParen => !token.spaced,
                _ => false,
            };
            if extends {
                self.deepen()?;
            }
            node = match &token.kind {
                TokenKind::Dot | TokenKind::Possessive => {
                    self.advance();
                    let name = self.expect_ident("a property name")?;
                    self.finish(member(node, MemberProperty::Named(name)), start)
                }
                TokenKind::LBracket if !token.spaced => {
                    self.advance();
                    let key = self.parse_expression()?;
                    self.expect(&TokenKind::RBracket)?;
                    self.finish(member(node, MemberProperty::Computed(Box::new(key))), start)
                }
                TokenKind::LParen if !token.spaced => {
                    self.advance();
                    let args = self.parse_delimited(&TokenKind::RParen)?;
                    self.finish(
                        NodeKind::Call {
                            callee: Box::new(node),
                            args,
                        },
                        start,
                    )
                }
                _ => {
                    self.depth = depth;
                    return Ok(node);
                }
            };
        }
    }

    /// Comma-separated expressions up to `close`, which is consumed.
    /// A trailing comma is allowed.
    fn parse_delimited(&mut self, close: &TokenKind) -> ParseResult<Vec<Node>> {
        let mut items = Vec::new();
        while !self.check(close) {
            items.push(self.parse_expression()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(close)?;
        Ok(items)
    }

    fn parse_primary(&mut self) -> ParseResult<Node> {
        let start = self.current_span();
        let token = self.current();
        let kind = match &token.kind {
            TokenKind::Number(n) => NodeKind::Literal(Literal::Number(*n)),
            TokenKind::Str(s) => NodeKind::Literal(Literal::Str(s.clone())),
            TokenKind::Template(body) => NodeKind::Template(body.clone()),
            TokenKind::ClassRef(name) => NodeKind::Selector(format!(".{name}")),
            TokenKind::IdRef(name) => NodeKind::Selector(format!("#{name}")),
            TokenKind::QueryRef(selector) => NodeKind::Selector(selector.clone()),
            TokenKind::AttrRef(name) => NodeKind::AttributeRef(name.clone()),
            TokenKind::Dollar(name) => NodeKind::Dollar(name.clone()),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                return Ok(inner);
            }
            TokenKind::LBracket => {
                self.advance();
                let elements = self.parse_delimited(&TokenKind::RBracket)?;
                return Ok(self.finish(NodeKind::Array(elements), start));
            }
            TokenKind::LBrace => {
                self.advance();
                return self.parse_object(start);
            }
            TokenKind::Ident(word) => match word.as_str() {
                "true" => NodeKind::Literal(Literal::Bool(true)),
                "false" => NodeKind::Literal(Literal::Bool(false)),
                "null" => NodeKind::Literal(Literal::Null),
                "undefined" => NodeKind::Literal(Literal::Undefined),
                "my" | "its" | "your" if self.possessive_follows() => {
                    return self.parse_possessive_word(word, start);
                }
                w if BLOCK_WORDS.contains(&w) => return Err(self.expected_expression()),
                w => NodeKind::Identifier(w.to_string()),
            },
            _ => return Err(self.expected_expression()),
        };
        self.advance();
        Ok(self.finish(kind, start))
    }

    fn expected_expression(&self) -> crate::ParseError {
        if self.at_eof() {
            self.error_here("Expected expression")
        } else {
            self.error_here(format!(
                "Expected expression, found {}",
                self.current_kind().describe()
            ))
        }
    }

    /// `my x` / `its x` / `your x`: the next token names a property.
    fn possessive_follows(&self) -> bool {
        matches!(self.peek_kind(1), TokenKind::Ident(w) if !NON_PROPERTY_WORDS.contains(&w.as_str()))
    }

    fn parse_possessive_word(&mut self, word: &str, start: Span) -> ParseResult<Node> {
        let owner = match word {
            "my" => "me",
            "its" => "it",
            _ => "you",
        };
        self.advance();
        let owner = Node::new(
            NodeKind::Identifier(owner.to_string()),
            start,
            self.location(start),
        );
        let name = self.expect_ident("a property name")?;
        Ok(self.finish(member(owner, MemberProperty::Named(name)), start))
    }

    fn parse_object(&mut self, start: Span) -> ParseResult<Node> {
        let mut entries = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            let key = match self.current_kind() {
                TokenKind::Ident(name) => ObjectKey::Ident(name.clone()),
                TokenKind::Str(text) => ObjectKey::Literal(text.clone()),
                TokenKind::Number(n) => ObjectKey::Literal(n.to_string()),
                TokenKind::LBracket => {
                    self.advance();
                    let key = self.parse_expression()?;
                    self.expect(&TokenKind::RBracket)?;
                    self.expect(&TokenKind::Colon)?;
                    let value = self.parse_expression()?;
                    entries.push(ObjectEntry {
                        key: ObjectKey::Computed(Box::new(key)),
                        value,
                    });
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                    continue;
                }
                other => {
                    return Err(
                        self.error_here(format!("Expected object key, found {}", other.describe()))
                    )
                }
            };
            self.advance();
            self.expect(&TokenKind::Colon)?;
            let value = self.parse_expression()?;
            entries.push(ObjectEntry { key, value });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(self.finish(NodeKind::Object(entries), start))
    }
}

fn binary(op: BinaryOp, left: Node, right: Node) -> Node {
    let span = left.span.merge(right.span);
    let loc = left.loc;
    Node::new(
        NodeKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
        loc,
    )
}

fn member(object: Node, property: MemberProperty) -> NodeKind {
    NodeKind::Member {
        object: Box::new(object),
        property,
    }
}
