//! Commands, blocks and features.

use std::sync::Arc;

use loka_ir::{
    AssignScope, BinaryOp, CommandArg, Literal, Node, NodeKind, RepeatKind, Span, TokenKind,
};

use super::{is_command_word, BLOCK_WORDS, PREPOSITIONS, REGISTRY_COMMANDS};
use crate::{ParseResult, Parser};

impl Parser<'_> {
    /// Parse commands until end of input or one of `terminators`.
    ///
    /// Commands are separated by `then`, a line break, or simply by the next
    /// command keyword.
    pub(crate) fn parse_commands(&mut self, terminators: &[&str]) -> ParseResult<Vec<Node>> {
        let mut nodes = Vec::new();
        loop {
            let mut separated = false;
            while self.eat_keyword("then") {
                separated = true;
            }
            if self.at_eof() || self.current_ident().is_some_and(|w| terminators.contains(&w)) {
                return Ok(nodes);
            }
            if !nodes.is_empty() && !separated && !self.after_newline() && !self.at_command_word()
            {
                return Err(self.unexpected());
            }
            nodes.push(self.parse_command()?);
        }
    }

    fn at_preposition(&self) -> bool {
        self.current_ident().is_some_and(|w| PREPOSITIONS.contains(&w))
    }

    fn at_command_word(&self) -> bool {
        self.current_ident().is_some_and(is_command_word)
    }

    /// Parse a block body into a `Sequence` node.
    fn parse_block(&mut self, terminators: &[&str]) -> ParseResult<Node> {
        let start = self.current_span();
        let nodes = self.nested(|p| p.parse_commands(terminators))?;
        let span = nodes
            .last()
            .map_or(Span::point(start.start), |last| start.merge(last.span));
        Ok(Node::new(NodeKind::Sequence(nodes), span, self.location(start)))
    }

    /// `end` closes a block; at the end of input it may be omitted.
    fn expect_end(&mut self, block: &str) -> ParseResult<()> {
        if self.eat_keyword("end") || self.at_eof() {
            Ok(())
        } else {
            Err(self
                .error_here(format!(
                    "Expected `end` to close {block}, found {}",
                    self.current_kind().describe()
                ))
                .with_suggestion(format!("add `end` after the {block} body")))
        }
    }

    /// Whether the next token cannot begin an optional trailing expression.
    fn at_expression_end(&self) -> bool {
        self.at_eof()
            || self.after_newline()
            || self
                .current_ident()
                .is_some_and(|w| BLOCK_WORDS.contains(&w) || is_command_word(w))
    }

    fn parse_command(&mut self) -> ParseResult<Node> {
        let start = self.current_span();
        let Some(word) = self.current_ident() else {
            return self.parse_expression_command();
        };
        match word {
            "set" => {
                self.advance();
                self.parse_set(start)
            }
            "put" => {
                self.advance();
                let value = self.parse_expression()?;
                self.expect_keyword("into", "after the value to put")?;
                let target = self.parse_expression()?;
                self.check_target(&target)?;
                Ok(self.finish(
                    NodeKind::Set {
                        target: Box::new(target),
                        value: Box::new(value),
                        scope: AssignScope::Default,
                    },
                    start,
                ))
            }
            "increment" | "decrement" => {
                let op = if word == "increment" {
                    BinaryOp::Add
                } else {
                    BinaryOp::Sub
                };
                self.advance();
                self.parse_step(op, start)
            }
            "if" => {
                self.advance();
                self.parse_if(start)
            }
            "repeat" => {
                self.advance();
                self.parse_repeat(start)
            }
            "for" => {
                self.advance();
                let kind = self.parse_for_in()?;
                self.parse_loop_body(kind, start)
            }
            "return" => {
                self.advance();
                let value = if self.at_expression_end() {
                    None
                } else {
                    Some(Box::new(self.parse_expression()?))
                };
                Ok(self.finish(NodeKind::Return(value), start))
            }
            "exit" | "halt" | "break" | "continue" => {
                let kind = match word {
                    "exit" => NodeKind::Exit,
                    "halt" => NodeKind::Halt,
                    "break" => NodeKind::Break,
                    _ => NodeKind::Continue,
                };
                self.advance();
                Ok(self.finish(kind, start))
            }
            "throw" => {
                self.advance();
                let value = self.parse_expression()?;
                Ok(self.finish(NodeKind::Throw(Box::new(value)), start))
            }
            "call" | "get" => {
                self.advance();
                let expr = self.parse_expression()?;
                Ok(self.finish(NodeKind::Get(Box::new(expr)), start))
            }
            "def" => {
                self.advance();
                self.parse_def(start)
            }
            "on" => {
                self.advance();
                let event = self.expect_ident("an event name")?;
                let body = self.parse_block(&["end"])?;
                self.expect_end("the event handler")?;
                Ok(self.finish(
                    NodeKind::On {
                        event,
                        body: Arc::new(body),
                    },
                    start,
                ))
            }
            w if REGISTRY_COMMANDS.contains(&w) => {
                let name = w.to_string();
                self.advance();
                self.parse_registry_command(name, start)
            }
            _ => self.parse_expression_command(),
        }
    }

    /// An expression used as a command, or `target = value`.
    fn parse_expression_command(&mut self) -> ParseResult<Node> {
        let start = self.current_span();
        let expr = self.parse_expression()?;
        if self.eat(&TokenKind::Assign) {
            self.check_target(&expr)?;
            let value = self.parse_expression()?;
            return Ok(self.finish(
                NodeKind::Set {
                    target: Box::new(expr),
                    value: Box::new(value),
                    scope: AssignScope::Default,
                },
                start,
            ));
        }
        Ok(expr)
    }

    fn parse_set(&mut self, start: Span) -> ParseResult<Node> {
        let scope = match self.current_ident() {
            Some("global") if self.scope_modifier_follows() => {
                self.advance();
                AssignScope::Global
            }
            Some("local") if self.scope_modifier_follows() => {
                self.advance();
                AssignScope::Local
            }
            _ => AssignScope::Default,
        };
        let target = self.parse_expression()?;
        self.check_target(&target)?;
        if scope != AssignScope::Default && !matches!(target.kind, NodeKind::Identifier(_)) {
            return Err(self.error_at(
                "Only plain variables can be declared `global` or `local`",
                target.span,
            ));
        }
        self.expect_keyword("to", "after the set target")?;
        let value = self.parse_expression()?;
        Ok(self.finish(
            NodeKind::Set {
                target: Box::new(target),
                value: Box::new(value),
                scope,
            },
            start,
        ))
    }

    /// `global`/`local` is a modifier only when a variable name follows it.
    fn scope_modifier_follows(&self) -> bool {
        matches!(self.peek_kind(1), TokenKind::Ident(name) if name != "to")
    }

    /// `increment x [by n]` desugars to `set x to x + n`.
    fn parse_step(&mut self, op: BinaryOp, start: Span) -> ParseResult<Node> {
        let target = self.parse_expression()?;
        self.check_target(&target)?;
        let amount = if self.eat_keyword("by") {
            self.parse_expression()?
        } else {
            Node::new(
                NodeKind::Literal(Literal::Number(1.0)),
                target.span,
                target.loc,
            )
        };
        let value = Node::new(
            NodeKind::Binary {
                op,
                left: Box::new(target.clone()),
                right: Box::new(amount),
            },
            target.span,
            target.loc,
        );
        Ok(self.finish(
            NodeKind::Set {
                target: Box::new(target),
                value: Box::new(value),
                scope: AssignScope::Default,
            },
            start,
        ))
    }

    fn check_target(&self, target: &Node) -> ParseResult<()> {
        match &target.kind {
            NodeKind::Identifier(name) if !matches!(name.as_str(), "me" | "my" | "I") => Ok(()),
            NodeKind::Dollar(_) | NodeKind::Member { .. } | NodeKind::AttributeRef(_) => Ok(()),
            _ => Err(self
                .error_at("Invalid assignment target", target.span)
                .with_suggestion("assign to a variable, a property, or an `@attribute`")),
        }
    }

    /// After `if`: condition, then-branch, optional else-branch.
    ///
    /// `else if` chains share the inner `if`'s `end`.
    fn parse_if(&mut self, start: Span) -> ParseResult<Node> {
        let test = self.parse_expression()?;
        self.eat_keyword("then");
        let then_branch = self.parse_block(&["else", "end"])?;

        let else_branch = if self.eat_keyword("else") {
            if self.check_keyword("if") {
                let nested_start = self.current_span();
                self.advance();
                Some(Box::new(self.nested(|p| p.parse_if(nested_start))?))
            } else {
                let body = self.parse_block(&["end"])?;
                self.expect_end("the if command")?;
                Some(Box::new(body))
            }
        } else {
            self.expect_end("the if command")?;
            None
        };

        Ok(self.finish(
            NodeKind::If {
                test: Box::new(test),
                then_branch: Box::new(then_branch),
                else_branch,
            },
            start,
        ))
    }

    fn parse_repeat(&mut self, start: Span) -> ParseResult<Node> {
        let kind = if self.eat_keyword("for") {
            self.parse_for_in()?
        } else if self.eat_keyword("while") {
            RepeatKind::While(Box::new(self.parse_expression()?))
        } else if self.eat_keyword("forever") {
            RepeatKind::Forever
        } else {
            let count = self.parse_expression()?;
            self.expect_keyword("times", "after the repeat count")?;
            RepeatKind::Times(Box::new(count))
        };
        self.parse_loop_body(kind, start)
    }

    /// `x in items`, after `for`.
    fn parse_for_in(&mut self) -> ParseResult<RepeatKind> {
        let var = self.expect_ident("a loop variable")?;
        self.expect_keyword("in", "after the loop variable")?;
        let iterable = self.parse_expression()?;
        Ok(RepeatKind::ForIn {
            var,
            iterable: Box::new(iterable),
        })
    }

    fn parse_loop_body(&mut self, kind: RepeatKind, start: Span) -> ParseResult<Node> {
        let body = self.parse_block(&["end"])?;
        self.expect_end("the loop")?;
        Ok(self.finish(
            NodeKind::Repeat {
                kind,
                body: Box::new(body),
            },
            start,
        ))
    }

    fn parse_def(&mut self, start: Span) -> ParseResult<Node> {
        let name = self.expect_ident("a function name")?;
        let mut params = Vec::new();
        if self.eat(&TokenKind::LParen) {
            if !self.check(&TokenKind::RParen) {
                loop {
                    params.push(self.expect_ident("a parameter name")?);
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
            }
            self.expect(&TokenKind::RParen)?;
        }
        let body = self.parse_block(&["end"])?;
        self.expect_end("the function definition")?;
        Ok(self.finish(
            NodeKind::Def {
                name,
                params,
                body: Arc::new(body),
            },
            start,
        ))
    }

    /// `name [arg, ...] [prep arg]...`
    fn parse_registry_command(&mut self, name: String, start: Span) -> ParseResult<Node> {
        let mut args = Vec::new();
        if !self.at_expression_end() && !self.at_preposition() {
            loop {
                args.push(CommandArg {
                    preposition: None,
                    value: self.parse_expression()?,
                });
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        while self.at_preposition() && !self.after_newline() {
            let preposition = self.expect_ident("a preposition")?;
            args.push(CommandArg {
                preposition: Some(preposition),
                value: self.parse_expression()?,
            });
        }
        Ok(self.finish(NodeKind::Command { name, args }, start))
    }
}
