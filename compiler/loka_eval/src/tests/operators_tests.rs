//! Tests for binary operator semantics.

use crate::host::Element;
use crate::operators::evaluate_binary;
use crate::Value;
use indexmap::IndexMap;
use loka_ir::BinaryOp;
use pretty_assertions::assert_eq;

fn num(n: f64) -> Value {
    Value::from(n)
}

#[test]
fn test_arithmetic() {
    assert_eq!(evaluate_binary(BinaryOp::Add, num(2.0), num(3.0)), num(5.0));
    assert_eq!(evaluate_binary(BinaryOp::Sub, num(5.0), num(3.0)), num(2.0));
    assert_eq!(evaluate_binary(BinaryOp::Mul, num(2.0), num(3.0)), num(6.0));
    assert_eq!(evaluate_binary(BinaryOp::Div, num(7.0), num(2.0)), num(3.5));
    assert_eq!(evaluate_binary(BinaryOp::Mod, num(7.0), num(2.0)), num(1.0));
}

#[test]
fn test_division_by_zero_is_infinite() {
    let value = evaluate_binary(BinaryOp::Div, num(1.0), num(0.0));
    assert_eq!(value.to_string(), "Infinity");
    let value = evaluate_binary(BinaryOp::Mod, num(1.0), num(0.0));
    assert_eq!(value.to_string(), "NaN");
}

#[test]
fn test_add_concatenates_strings() {
    assert_eq!(
        evaluate_binary(BinaryOp::Add, Value::from("a"), num(1.0)),
        Value::from("a1")
    );
    assert_eq!(
        evaluate_binary(BinaryOp::Add, num(1.0), Value::from("2")),
        Value::from("12")
    );
    assert_eq!(evaluate_binary(BinaryOp::Add, Value::from(true), num(1.0)), num(2.0));
}

#[test]
fn test_equality() {
    assert_eq!(evaluate_binary(BinaryOp::Eq, num(1.0), Value::from("1")), Value::from(true));
    assert_eq!(
        evaluate_binary(BinaryOp::StrictEq, num(1.0), Value::from("1")),
        Value::from(false)
    );
    assert_eq!(
        evaluate_binary(BinaryOp::NotEq, Value::Null, Value::Undefined),
        Value::from(false)
    );
    assert_eq!(
        evaluate_binary(BinaryOp::StrictNotEq, Value::Null, Value::Undefined),
        Value::from(true)
    );
}

#[test]
fn test_comparisons() {
    assert_eq!(evaluate_binary(BinaryOp::Lt, num(1.0), num(2.0)), Value::from(true));
    assert_eq!(evaluate_binary(BinaryOp::GtEq, num(2.0), num(2.0)), Value::from(true));
    assert_eq!(
        evaluate_binary(BinaryOp::Lt, Value::from("10"), Value::from("9")),
        Value::from(true)
    );
    assert_eq!(
        evaluate_binary(BinaryOp::Lt, Value::from("10"), num(9.0)),
        Value::from(false)
    );
    assert_eq!(
        evaluate_binary(BinaryOp::Gt, Value::Undefined, num(0.0)),
        Value::from(false)
    );
}

#[test]
fn test_logical_operators_return_an_operand() {
    assert_eq!(evaluate_binary(BinaryOp::And, num(0.0), Value::from("x")), num(0.0));
    assert_eq!(
        evaluate_binary(BinaryOp::And, num(1.0), Value::from("x")),
        Value::from("x")
    );
    assert_eq!(
        evaluate_binary(BinaryOp::Or, Value::from(""), Value::from("fallback")),
        Value::from("fallback")
    );
}

#[test]
fn test_membership() {
    let arr = Value::array(vec![num(1.0), num(2.0)]);
    assert_eq!(evaluate_binary(BinaryOp::In, num(2.0), arr.clone()), Value::from(true));
    assert_eq!(evaluate_binary(BinaryOp::Contains, arr, num(3.0)), Value::from(false));
    assert_eq!(
        evaluate_binary(BinaryOp::Contains, Value::from("hello"), Value::from("ell")),
        Value::from(true)
    );
    let mut entries = IndexMap::new();
    entries.insert("k".to_string(), Value::Null);
    assert_eq!(
        evaluate_binary(BinaryOp::In, Value::from("k"), Value::object(entries)),
        Value::from(true)
    );
}

#[test]
fn test_element_containment() {
    let parent = Element::new("div");
    let child = Element::new("span");
    parent.append_child(&child);
    assert_eq!(
        evaluate_binary(BinaryOp::Contains, Value::from(parent.clone()), Value::from(child.clone())),
        Value::from(true)
    );
    assert_eq!(
        evaluate_binary(BinaryOp::Contains, Value::from(child), Value::from(parent)),
        Value::from(false)
    );
}

#[test]
fn test_matches_never_fails() {
    let el = Element::new("button").with_class("primary");
    assert_eq!(
        evaluate_binary(BinaryOp::Matches, Value::from(el.clone()), Value::from("button.primary")),
        Value::from(true)
    );
    assert_eq!(
        evaluate_binary(BinaryOp::Matches, Value::from(el), Value::from("a >")),
        Value::from(false)
    );
    assert_eq!(
        evaluate_binary(BinaryOp::Matches, num(1.0), Value::from("div")),
        Value::from(false)
    );
}
