//! Unary operator semantics.

use loka_ir::UnaryOp;

use crate::Value;

pub fn evaluate_unary(op: UnaryOp, operand: &Value) -> Value {
    match op {
        UnaryOp::Not => Value::Bool(!operand.is_truthy()),
        UnaryOp::No => Value::Bool(is_empty(operand)),
        UnaryOp::Neg => Value::Number(-operand.to_number()),
        UnaryOp::Plus => Value::Number(operand.to_number()),
    }
}

/// Falsy, or an empty array or collection.
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.borrow().is_empty(),
        Value::Collection(items) => items.is_empty(),
        other => !other.is_truthy(),
    }
}
