#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::errors::{thrown, undefined_function};
use pretty_assertions::assert_eq;

fn all_actions() -> Vec<ControlAction> {
    vec![
        ControlAction::Halt,
        ControlAction::Break,
        ControlAction::Continue,
        ControlAction::Return(Value::Number(1.0)),
        ControlAction::Exit(Value::Undefined),
        ControlAction::from(undefined_function("nope")),
    ]
}

#[test]
fn test_control_action_is_error() {
    assert!(ControlAction::from(undefined_function("f")).is_error());
    assert!(!ControlAction::Break.is_error());
    assert!(!ControlAction::Return(Value::Null).is_error());
}

#[test]
fn test_control_action_return_carries_value() {
    let action = ControlAction::Return(Value::Number(42.0));
    let err = action.into_eval_error();
    assert_eq!(err.signal, Some(ExecutionSignal::Return(Value::Number(42.0))));
    assert!(err.is_control_flow());
    assert_eq!(err.message, "return");
}

#[test]
fn test_control_action_round_trips_through_eval_error() {
    for action in all_actions() {
        let kind = action.signal_kind();
        let back = ControlAction::from(action.into_eval_error());
        assert_eq!(back.signal_kind(), kind);
    }
}

#[test]
fn test_control_action_into_eval_error_keeps_genuine_error() {
    let err = ControlAction::from(undefined_function("f")).into_eval_error();
    assert!(!err.is_control_flow());
    assert_eq!(err.message, "Unknown function: f");
}

#[test]
fn test_control_action_at_node_if_error_ignores_signals() {
    let node = Node::new(
        loka_ir::NodeKind::Break,
        loka_ir::Span::new(4, 9),
        loka_ir::Location::new(1, 5),
    );
    let action = ControlAction::Break.at_node_if_error(&node);
    assert!(matches!(action, ControlAction::Break));

    let ControlAction::Error(err) = ControlAction::from(thrown(Value::string("x"))).at_node_if_error(&node)
    else {
        panic!("expected error");
    };
    assert_eq!(err.location, Some(loka_ir::Location::new(1, 5)));
    assert_eq!(err.to_string(), "x at line 1, column 5");
}

#[test]
fn test_boundary_decision_table() {
    let expected = [
        (Boundary::Loop, [false, true, true, false, false, false]),
        (Boundary::Sequence, [false, true, true, false, false, false]),
        (Boundary::Handler, [false, false, false, true, true, false]),
        (Boundary::Program, [true, false, false, false, false, false]),
    ];
    for (boundary, row) in expected {
        let got: Vec<bool> = all_actions().iter().map(|a| boundary.catches(a)).collect();
        assert_eq!(got, row.to_vec(), "{boundary:?}");
    }
}

#[test]
fn test_boundary_catch_yields_return_value() {
    let caught = Boundary::Handler.catch(Err(ControlAction::Return(Value::Number(7.0))));
    assert_eq!(caught.unwrap(), Value::Number(7.0));
    let caught = Boundary::Handler.catch(Err(ControlAction::Exit(Value::Undefined)));
    assert_eq!(caught.unwrap(), Value::Undefined);
    let passed = Boundary::Handler.catch(Err(ControlAction::Halt));
    assert!(matches!(passed, Err(ControlAction::Halt)));
}

#[test]
fn test_boundary_forms_agree() {
    for boundary in [
        Boundary::Loop,
        Boundary::Sequence,
        Boundary::Handler,
        Boundary::Program,
    ] {
        for action in all_actions() {
            let result_form = boundary.catch(Err(action.clone()));
            let exceptional = boundary.catch_error(Err(action.into_eval_error()));
            match (result_form, exceptional) {
                (Ok(a), Ok(b)) => assert_eq!(a, b),
                (Err(a), Err(b)) => {
                    assert_eq!(a.signal_kind(), b.signal.as_ref().map(ExecutionSignal::kind));
                }
                (a, b) => panic!("{boundary:?}: forms disagree: {a:?} vs {b:?}"),
            }
        }
    }
}

#[test]
fn test_boundary_never_catches_errors() {
    let err = thrown(Value::Number(1.0));
    for boundary in [
        Boundary::Loop,
        Boundary::Sequence,
        Boundary::Handler,
        Boundary::Program,
    ] {
        assert!(boundary.catch_error(Err(err.clone())).is_err());
        assert!(boundary.catch(Err(ControlAction::from(err.clone()))).is_err());
    }
}
