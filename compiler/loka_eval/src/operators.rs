//! Binary operator semantics over already-evaluated operands.
//!
//! The one operator form that is not value-level, `<selector> in <element>`,
//! is handled by the evaluator before operands are evaluated.

use loka_ir::BinaryOp;

use crate::host::Selector;
use crate::methods::property_key;
use crate::Value;

/// Apply `op` to two values.
pub fn evaluate_binary(op: BinaryOp, left: Value, right: Value) -> Value {
    match op {
        BinaryOp::Add => add(&left, &right),
        BinaryOp::Sub => Value::Number(left.to_number() - right.to_number()),
        BinaryOp::Mul => Value::Number(left.to_number() * right.to_number()),
        BinaryOp::Div => Value::Number(left.to_number() / right.to_number()),
        BinaryOp::Mod => Value::Number(left.to_number() % right.to_number()),
        BinaryOp::Eq => Value::Bool(left.loose_eq(&right)),
        BinaryOp::NotEq => Value::Bool(!left.loose_eq(&right)),
        BinaryOp::StrictEq => Value::Bool(left.strict_eq(&right)),
        BinaryOp::StrictNotEq => Value::Bool(!left.strict_eq(&right)),
        BinaryOp::Lt => compare(&left, &right, |o| o.is_lt()),
        BinaryOp::Gt => compare(&left, &right, |o| o.is_gt()),
        BinaryOp::LtEq => compare(&left, &right, |o| o.is_le()),
        BinaryOp::GtEq => compare(&left, &right, |o| o.is_ge()),
        BinaryOp::And => {
            if left.is_truthy() {
                right
            } else {
                left
            }
        }
        BinaryOp::Or => {
            if left.is_truthy() {
                left
            } else {
                right
            }
        }
        BinaryOp::In => Value::Bool(contains(&right, &left)),
        BinaryOp::Contains => Value::Bool(contains(&left, &right)),
        BinaryOp::Matches => Value::Bool(matches_selector(&left, &right)),
    }
}

/// Numeric addition, or concatenation when either side is not a primitive
/// number-like value.
fn add(left: &Value, right: &Value) -> Value {
    let numeric = |v: &Value| {
        matches!(
            v,
            Value::Number(_) | Value::Bool(_) | Value::Null | Value::Undefined
        )
    };
    if numeric(left) && numeric(right) {
        Value::Number(left.to_number() + right.to_number())
    } else {
        Value::string(format!("{left}{right}"))
    }
}

/// Strings compare lexicographically, everything else numerically.
/// Comparisons involving `NaN` are false.
fn compare(left: &Value, right: &Value, test: fn(std::cmp::Ordering) -> bool) -> Value {
    let ordering = match (left, right) {
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => left.to_number().partial_cmp(&right.to_number()),
    };
    Value::Bool(ordering.is_some_and(test))
}

/// Membership by the container's shape: array/collection members, substring,
/// object key, or element descendant.
fn contains(container: &Value, item: &Value) -> bool {
    match container {
        Value::Array(items) => items.borrow().iter().any(|v| v.strict_eq(item)),
        Value::Collection(items) => match item {
            Value::Element(el) => items.iter().any(|x| x.ptr_eq(el)),
            _ => false,
        },
        Value::Str(haystack) => !item.is_nullish() && haystack.contains(&item.to_string()),
        Value::Object(entries) => entries.borrow().contains_key(&property_key(item)),
        Value::Element(parent) => match item {
            Value::Element(el) => el.is_descendant_of(parent),
            _ => false,
        },
        _ => false,
    }
}

/// `value matches selector`. Never fails: an invalid selector, or a left
/// side that is not an element, is simply no match.
fn matches_selector(value: &Value, selector: &Value) -> bool {
    let Some(text) = selector.as_str() else {
        return false;
    };
    let Ok(selector) = Selector::parse(text) else {
        return false;
    };
    let elements = value.elements();
    !elements.is_empty() && elements.iter().all(|el| selector.matches(el))
}
