//! Event handlers registered by `on` and run by `Runtime::dispatch_event`.

use futures::executor::block_on;
use loka_eval::{Element, ExecutionContext, Value};
use lokac::{EvalTarget, Runtime, RuntimeError};
use pretty_assertions::assert_eq;

use crate::common::en;

#[test]
fn test_dispatch_runs_registered_handlers() {
    let runtime = Runtime::new();
    let button = Element::new("button");
    let mut ctx = ExecutionContext::new(Some(button.clone()));
    block_on(runtime.eval(
        "on click toggle .pressed end\non click set $last to event end",
        EvalTarget::Context(&mut ctx),
        &en(),
    ))
    .unwrap();

    let ran = block_on(runtime.dispatch_event(&button, "click", Value::from("first"), &ctx)).unwrap();
    assert_eq!(ran, 2);
    assert!(button.has_class("pressed"));
    assert_eq!(ctx.global("last"), Some(Value::from("first")));

    block_on(runtime.dispatch_event(&button, "click", Value::from("second"), &ctx)).unwrap();
    assert!(!button.has_class("pressed"));
    assert_eq!(ctx.global("last"), Some(Value::from("second")));
}

#[test]
fn test_handler_locals_stay_in_the_handler() {
    let runtime = Runtime::new();
    let el = Element::new("div");
    let mut ctx = ExecutionContext::new(Some(el.clone()));
    block_on(runtime.eval(
        "on ping set seen to event end",
        EvalTarget::Context(&mut ctx),
        &en(),
    ))
    .unwrap();
    block_on(runtime.dispatch_event(&el, "ping", Value::from(1.0), &ctx)).unwrap();
    assert!(!ctx.has_local("seen"));
}

#[test]
fn test_failing_handler_is_reported() {
    let runtime = Runtime::new();
    let el = Element::new("div");
    let mut ctx = ExecutionContext::new(Some(el.clone()));
    block_on(runtime.eval(
        "on go throw 'broken' end",
        EvalTarget::Context(&mut ctx),
        &en(),
    ))
    .unwrap();
    let err = block_on(runtime.dispatch_event(&el, "go", Value::Null, &ctx)).unwrap_err();
    let RuntimeError::Eval(err) = err else {
        panic!("expected an evaluation error");
    };
    assert_eq!(err.thrown, Some(Value::from("broken")));
}

#[test]
fn test_event_without_handlers() {
    let runtime = Runtime::new();
    let el = Element::new("div");
    let ctx = ExecutionContext::default();
    assert_eq!(
        block_on(runtime.dispatch_event(&el, "nothing", Value::Null, &ctx)).unwrap(),
        0
    );
}
