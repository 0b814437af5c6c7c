//! Template literal interpolation.
//!
//! Each `${...}` span resolves first by exact name against the context
//! (`locals`, then `variables`, then `globals`). Otherwise the span is read
//! with a deliberately small grammar:
//!
//! ```text
//! span    := operand | binary | operand '?' operand ':' operand
//!          | binary '?' operand ':' operand
//! binary  := operand op operand
//! operand := number | identifier ('.' identifier)*
//! op      := + - * / % == != === !== < > <= >= && ||
//! ```
//!
//! Anything else renders as an empty string, as does `undefined`.

use crate::methods::get_property;
use crate::operators::evaluate_binary;
use crate::{ExecutionContext, Value};
use loka_ir::BinaryOp;

/// Render `template`, substituting every `${...}` span.
pub fn interpolate(template: &str, ctx: &ExecutionContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let inner = rest[start + 2..start + 2 + len].trim();
        let value = resolve_span(inner, ctx);
        if !matches!(value, Value::Undefined) {
            out.push_str(&value.to_string());
        }
        rest = &rest[start + 3 + len..];
    }
    out.push_str(rest);
    out
}

fn resolve_span(inner: &str, ctx: &ExecutionContext) -> Value {
    if let Some(value) = ctx.lookup_for_template(inner) {
        return value;
    }
    let tokens = tokenize(inner);
    evaluate(&tokens, ctx).unwrap_or_default()
}

#[derive(Clone, Debug, PartialEq)]
enum Tok<'a> {
    Number(f64),
    Path(&'a str),
    Op(&'a str),
    Question,
    Colon,
    Invalid,
}

const OPERATORS: [&str; 15] = [
    "===", "!==", "==", "!=", "<=", ">=", "&&", "||", "+", "-", "*", "/", "%", "<", ">",
];

fn tokenize(text: &str) -> Vec<Tok<'_>> {
    let mut tokens = Vec::new();
    let mut rest = text.trim_start();
    while let Some(c) = rest.chars().next() {
        let len = if c.is_ascii_digit() {
            let len = rest
                .find(|c: char| !(c.is_ascii_digit() || c == '.'))
                .unwrap_or(rest.len());
            tokens.push(rest[..len].parse().map_or(Tok::Invalid, Tok::Number));
            len
        } else if c.is_alphabetic() || c == '_' || c == '$' {
            let len = rest
                .find(|c: char| !(c.is_alphanumeric() || matches!(c, '_' | '$' | '.')))
                .unwrap_or(rest.len());
            tokens.push(Tok::Path(&rest[..len]));
            len
        } else if c == '?' {
            tokens.push(Tok::Question);
            1
        } else if c == ':' {
            tokens.push(Tok::Colon);
            1
        } else if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) {
            tokens.push(Tok::Op(op));
            op.len()
        } else {
            tokens.push(Tok::Invalid);
            c.len_utf8()
        };
        rest = rest[len..].trim_start();
    }
    tokens
}

fn evaluate(tokens: &[Tok<'_>], ctx: &ExecutionContext) -> Option<Value> {
    if let Some(q) = tokens.iter().position(|t| *t == Tok::Question) {
        let [a, Tok::Colon, b] = &tokens[q + 1..] else {
            return None;
        };
        let test = evaluate_simple(&tokens[..q], ctx)?;
        return if test.is_truthy() {
            operand(a, ctx)
        } else {
            operand(b, ctx)
        };
    }
    evaluate_simple(tokens, ctx)
}

fn evaluate_simple(tokens: &[Tok<'_>], ctx: &ExecutionContext) -> Option<Value> {
    match tokens {
        [single] => operand(single, ctx),
        [left, Tok::Op(op), right] => {
            let op = BinaryOp::from_spelling(op)?;
            Some(evaluate_binary(op, operand(left, ctx)?, operand(right, ctx)?))
        }
        _ => None,
    }
}

fn operand(tok: &Tok<'_>, ctx: &ExecutionContext) -> Option<Value> {
    match tok {
        Tok::Number(n) => Some(Value::Number(*n)),
        Tok::Path(path) => {
            let mut segments = path.split('.');
            let head = segments.next()?;
            let mut value = ctx
                .reserved(head)
                .or_else(|| ctx.lookup_for_template(head))
                .unwrap_or_default();
            for segment in segments {
                if segment.is_empty() {
                    return None;
                }
                value = get_property(&value, segment);
            }
            Some(value)
        }
        _ => None,
    }
}
