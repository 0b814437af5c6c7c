//! Core parser tests: literals, expressions, operators and errors.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::{parse, ParseOutput};
use loka_ir::{BinaryOp, Literal, MemberProperty, Node, NodeKind, ObjectKey, UnaryOp};
use pretty_assertions::assert_eq;

fn parse_ok(source: &str) -> Node {
    let output = parse(source);
    assert!(output.success(), "{source:?} failed: {:?}", output.errors);
    output.node.unwrap()
}

fn parse_err(source: &str) -> ParseOutput {
    let output = parse(source);
    assert!(output.has_errors(), "{source:?} should fail");
    assert!(output.node.is_none());
    output
}

#[test]
fn test_parse_number_literal() {
    let node = parse_ok("42");
    assert_eq!(node.kind, NodeKind::Literal(Literal::Number(42.0)));
    assert_eq!(node.type_name(), "literal");
    assert_eq!((node.loc.line, node.loc.column), (1, 1));
}

#[test]
fn test_parse_keyword_literals() {
    assert_eq!(parse_ok("true").kind, NodeKind::Literal(Literal::Bool(true)));
    assert_eq!(parse_ok("null").kind, NodeKind::Literal(Literal::Null));
    assert_eq!(
        parse_ok("'hi'").kind,
        NodeKind::Literal(Literal::Str("hi".to_string()))
    );
}

#[test]
fn test_parse_binary_precedence() {
    let node = parse_ok("1 + 2 * 3");
    let NodeKind::Binary { op, left, right } = &node.kind else {
        panic!("expected binary, got {node:?}");
    };
    assert_eq!(*op, BinaryOp::Add);
    assert_eq!(left.kind, NodeKind::Literal(Literal::Number(1.0)));
    assert!(matches!(
        right.kind,
        NodeKind::Binary {
            op: BinaryOp::Mul,
            ..
        }
    ));
}

#[test]
fn test_parse_parenthesized() {
    let node = parse_ok("(5 + 3) * 2 - 1");
    let NodeKind::Binary { op, left, .. } = &node.kind else {
        panic!("expected binary");
    };
    assert_eq!(*op, BinaryOp::Sub);
    assert!(matches!(
        left.kind,
        NodeKind::Binary {
            op: BinaryOp::Mul,
            ..
        }
    ));
}

#[test]
fn test_parse_comparison_spellings() {
    let cases = [
        ("a is b", BinaryOp::Eq),
        ("a == b", BinaryOp::Eq),
        ("a is not b", BinaryOp::NotEq),
        ("a != b", BinaryOp::NotEq),
        ("a === b", BinaryOp::StrictEq),
        ("a >= b", BinaryOp::GtEq),
        ("a matches b", BinaryOp::Matches),
        ("a match b", BinaryOp::Matches),
        ("a contains b", BinaryOp::Contains),
        ("a and b", BinaryOp::And),
        ("a || b", BinaryOp::Or),
        ("a mod b", BinaryOp::Mod),
    ];
    for (source, expected) in cases {
        match parse_ok(source).kind {
            NodeKind::Binary { op, .. } => assert_eq!(op, expected, "{source}"),
            other => panic!("{source}: expected binary, got {other:?}"),
        }
    }
}

#[test]
fn test_parse_selector_in_element() {
    let node = parse_ok(".active in el");
    let NodeKind::Binary { op, left, right } = &node.kind else {
        panic!("expected binary");
    };
    assert_eq!(*op, BinaryOp::In);
    assert_eq!(left.kind, NodeKind::Selector(".active".to_string()));
    assert_eq!(right.kind, NodeKind::Identifier("el".to_string()));
}

#[test]
fn test_parse_reference_forms() {
    assert_eq!(
        parse_ok("#main").kind,
        NodeKind::Selector("#main".to_string())
    );
    assert_eq!(
        parse_ok("<button.primary/>").kind,
        NodeKind::Selector("button.primary".to_string())
    );
    assert_eq!(
        parse_ok("@disabled").kind,
        NodeKind::AttributeRef("disabled".to_string())
    );
    assert_eq!(
        parse_ok("$count").kind,
        NodeKind::Dollar("count".to_string())
    );
    assert_eq!(
        parse_ok("`Hi ${name}`").kind,
        NodeKind::Template("Hi ${name}".to_string())
    );
}

#[test]
fn test_parse_possessive_forms_agree() {
    let expected = |node: &Node| match &node.kind {
        NodeKind::Member {
            object,
            property: MemberProperty::Named(name),
        } => {
            assert_eq!(object.kind, NodeKind::Identifier("me".to_string()));
            assert_eq!(name, "value");
        }
        other => panic!("expected member, got {other:?}"),
    };
    expected(&parse_ok("my value"));
    expected(&parse_ok("me.value"));
    expected(&parse_ok("me's value"));
}

#[test]
fn test_parse_computed_member_and_calls() {
    let node = parse_ok("items[0]");
    assert!(matches!(
        node.kind,
        NodeKind::Member {
            property: MemberProperty::Computed(_),
            ..
        }
    ));

    let node = parse_ok("el.getAttribute('x')");
    let NodeKind::Call { callee, args } = &node.kind else {
        panic!("expected call");
    };
    assert_eq!(args.len(), 1);
    assert!(matches!(callee.kind, NodeKind::Member { .. }));

    let node = parse_ok("max(1, 2,)");
    let NodeKind::Call { callee, args } = &node.kind else {
        panic!("expected call");
    };
    assert_eq!(callee.kind, NodeKind::Identifier("max".to_string()));
    assert_eq!(args.len(), 2);
}

#[test]
fn test_parse_unary() {
    assert!(matches!(
        parse_ok("not x").kind,
        NodeKind::Unary {
            op: UnaryOp::Not,
            ..
        }
    ));
    assert!(matches!(
        parse_ok("no x").kind,
        NodeKind::Unary { op: UnaryOp::No, .. }
    ));
    assert!(matches!(
        parse_ok("-x").kind,
        NodeKind::Unary {
            op: UnaryOp::Neg,
            ..
        }
    ));
}

#[test]
fn test_parse_conditional() {
    let node = parse_ok("x > 1 ? 'big' : 'small'");
    let NodeKind::Conditional { test, .. } = &node.kind else {
        panic!("expected conditional");
    };
    assert!(matches!(
        test.kind,
        NodeKind::Binary {
            op: BinaryOp::Gt,
            ..
        }
    ));
}

#[test]
fn test_parse_array_and_object_literals() {
    let NodeKind::Array(items) = parse_ok("[1, 'two', x]").kind else {
        panic!("expected array");
    };
    assert_eq!(items.len(), 3);

    let NodeKind::Object(entries) = parse_ok("{a: 1, 'b c': 2, 3: 4, [k]: 5}").kind else {
        panic!("expected object");
    };
    let keys: Vec<_> = entries.iter().map(|e| &e.key).collect();
    assert_eq!(keys[0], &ObjectKey::Ident("a".to_string()));
    assert_eq!(keys[1], &ObjectKey::Literal("b c".to_string()));
    assert_eq!(keys[2], &ObjectKey::Literal("3".to_string()));
    assert!(matches!(keys[3], ObjectKey::Computed(_)));
}

#[test]
fn test_parse_incomplete_expression_reports_location() {
    let output = parse_err("5 +");
    let error = output.first_error().unwrap();
    assert!(error.message.contains("Expected expression"));
    assert_eq!((error.line, error.column), (1, 4));
}

#[test]
fn test_parse_error_on_second_line() {
    let output = parse_err("set x to 1\nset y to");
    let error = output.first_error().unwrap();
    assert_eq!(error.message, "Expected expression");
    assert_eq!((error.line, error.column), (2, 9));
}

#[test]
fn test_parse_juxtaposed_expressions_are_rejected() {
    let output = parse_err("5 5");
    let error = output.first_error().unwrap();
    assert_eq!(error.message, "Unexpected number `5`");
    assert_eq!(error.column, 3);
    assert!(error.suggestion.is_some());
}

#[test]
fn test_parse_lex_error_surfaces_as_parse_error() {
    let output = parse_err("x + 'abc");
    let error = output.first_error().unwrap();
    assert_eq!(error.message, "Unterminated string literal");
    assert_eq!((error.line, error.column), (1, 5));
    assert!(output.tokens.is_empty());
}

#[test]
fn test_parse_empty_source_is_an_error() {
    let output = parse_err("   -- just a comment");
    assert_eq!(output.first_error().unwrap().message, "Expected expression");
}

#[test]
fn test_parse_keeps_tokens() {
    let output = parse("x + 1");
    assert!(output.success());
    assert_eq!(output.tokens.len(), 4);
}

#[test]
fn test_parse_deep_parentheses_are_an_error_not_a_crash() {
    let deep = format!("{}1{}", "(".repeat(20_000), ")".repeat(20_000));
    let output = parse_err(&deep);
    let error = output.first_error().unwrap();
    assert_eq!(error.message, "Expression is nested too deeply");
    assert_eq!(error.line, 1);
    assert!(error.suggestion.is_some());
}

#[test]
fn test_parse_long_chains_count_toward_nesting() {
    let chain = format!("1{}", " + 1".repeat(10_000));
    assert_eq!(
        parse_err(&chain).first_error().unwrap().message,
        "Expression is nested too deeply"
    );

    let negations = format!("{}x", "not ".repeat(10_000));
    assert_eq!(
        parse_err(&negations).first_error().unwrap().message,
        "Expression is nested too deeply"
    );

    let members = format!("x{}", ".y".repeat(10_000));
    assert_eq!(
        parse_err(&members).first_error().unwrap().message,
        "Expression is nested too deeply"
    );
}

#[test]
fn test_parse_nesting_below_the_limit() {
    let parens = format!("{}1{}", "(".repeat(100), ")".repeat(100));
    assert!(matches!(
        parse_ok(&parens).kind,
        NodeKind::Literal(Literal::Number(n)) if (n - 1.0).abs() < f64::EPSILON
    ));

    let chain = format!("1{}", " + 1".repeat(100));
    assert!(matches!(parse_ok(&chain).kind, NodeKind::Binary { op: BinaryOp::Add, .. }));
}
