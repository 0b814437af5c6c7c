//! Sequences, conditionals, loops and the signal-raising commands.

use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use loka_ir::{Node, NodeKind, RepeatKind};

use super::mismatch;
use crate::errors::{not_iterable, thrown};
use crate::loader::EvalOutcome;
use crate::{Boundary, ControlAction, ExecutionContext, Interpreter, Value};

/// Evaluates children in order; the last value is the sequence's value.
pub(super) fn sequence<'a>(
    interp: &'a Interpreter,
    node: &'a Node,
    ctx: &'a mut ExecutionContext,
) -> LocalBoxFuture<'a, EvalOutcome> {
    async move {
        let NodeKind::Sequence(children) = &node.kind else {
            return Err(mismatch(node));
        };
        let mut last = Value::Undefined;
        for child in children {
            last = interp.eval_node(child, ctx).await?;
        }
        Ok(last)
    }
    .boxed_local()
}

pub(super) fn if_command<'a>(
    interp: &'a Interpreter,
    node: &'a Node,
    ctx: &'a mut ExecutionContext,
) -> LocalBoxFuture<'a, EvalOutcome> {
    async move {
        let NodeKind::If {
            test,
            then_branch,
            else_branch,
        } = &node.kind
        else {
            return Err(mismatch(node));
        };
        if interp.eval_node(test, ctx).await?.is_truthy() {
            interp.eval_node(then_branch, ctx).await
        } else if let Some(else_branch) = else_branch {
            interp.eval_node(else_branch, ctx).await
        } else {
            Ok(Value::Undefined)
        }
    }
    .boxed_local()
}

/// What a loop does after one pass of its body.
enum LoopAction {
    Next,
    Stop,
    Propagate(ControlAction),
}

fn to_loop_action(outcome: EvalOutcome) -> LoopAction {
    match outcome {
        Ok(_) => LoopAction::Next,
        Err(ControlAction::Break) => LoopAction::Stop,
        Err(action) if Boundary::Loop.catches(&action) => LoopAction::Next,
        Err(action) => LoopAction::Propagate(action),
    }
}

/// Run the body once and decide whether to keep looping.
async fn pass(
    interp: &Interpreter,
    body: &Node,
    ctx: &mut ExecutionContext,
) -> Result<bool, ControlAction> {
    match to_loop_action(interp.eval_node(body, ctx).await) {
        LoopAction::Next => Ok(true),
        LoopAction::Stop => Ok(false),
        LoopAction::Propagate(action) => Err(action),
    }
}

/// `repeat ... end`. Evaluates to `undefined`.
pub(super) fn repeat<'a>(
    interp: &'a Interpreter,
    node: &'a Node,
    ctx: &'a mut ExecutionContext,
) -> LocalBoxFuture<'a, EvalOutcome> {
    async move {
        let NodeKind::Repeat { kind, body } = &node.kind else {
            return Err(mismatch(node));
        };
        match kind {
            RepeatKind::ForIn { var, iterable } => {
                let items = iteration_items(interp.eval_node(iterable, ctx).await?)?;
                for item in items {
                    ctx.set_local(var, item);
                    if !pass(interp, body, ctx).await? {
                        break;
                    }
                }
            }
            RepeatKind::Times(count) => {
                let count = times(&interp.eval_node(count, ctx).await?);
                for _ in 0..count {
                    if !pass(interp, body, ctx).await? {
                        break;
                    }
                }
            }
            RepeatKind::While(test) => {
                while interp.eval_node(test, ctx).await?.is_truthy() {
                    if !pass(interp, body, ctx).await? {
                        break;
                    }
                }
            }
            RepeatKind::Forever => while pass(interp, body, ctx).await? {},
        }
        Ok(Value::Undefined)
    }
    .boxed_local()
}

/// The values a `for x in v` loop binds, in order. `null` and `undefined`
/// iterate zero times.
fn iteration_items(value: Value) -> Result<Vec<Value>, ControlAction> {
    Ok(match value {
        Value::Array(items) => items.borrow().clone(),
        Value::Collection(elements) => elements.iter().cloned().map(Value::Element).collect(),
        Value::Object(entries) => entries.borrow().keys().map(Value::string).collect(),
        Value::Str(text) => text
            .chars()
            .map(|c| Value::string(c.to_string()))
            .collect(),
        Value::Null | Value::Undefined => Vec::new(),
        other => return Err(not_iterable(other.type_name()).into()),
    })
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the count is floored and clamped to zero first"
)]
fn times(count: &Value) -> u64 {
    let n = count.to_number().floor();
    if n.is_nan() || n <= 0.0 {
        0
    } else {
        n as u64
    }
}

pub(super) fn return_command<'a>(
    interp: &'a Interpreter,
    node: &'a Node,
    ctx: &'a mut ExecutionContext,
) -> LocalBoxFuture<'a, EvalOutcome> {
    async move {
        let NodeKind::Return(value) = &node.kind else {
            return Err(mismatch(node));
        };
        let value = match value {
            Some(expr) => interp.eval_node(expr, ctx).await?,
            None => Value::Undefined,
        };
        Err(ControlAction::Return(value))
    }
    .boxed_local()
}

/// `exit`, `halt`, `break` and `continue`.
pub(super) fn signal<'a>(
    _: &'a Interpreter,
    node: &'a Node,
    _: &'a mut ExecutionContext,
) -> LocalBoxFuture<'a, EvalOutcome> {
    let action = match node.kind {
        NodeKind::Exit => ControlAction::Exit(Value::Undefined),
        NodeKind::Halt => ControlAction::Halt,
        NodeKind::Break => ControlAction::Break,
        NodeKind::Continue => ControlAction::Continue,
        _ => mismatch(node),
    };
    future::ready(Err(action)).boxed_local()
}

/// `throw expr`: a genuine error carrying the thrown value.
pub(super) fn throw<'a>(
    interp: &'a Interpreter,
    node: &'a Node,
    ctx: &'a mut ExecutionContext,
) -> LocalBoxFuture<'a, EvalOutcome> {
    async move {
        let NodeKind::Throw(expr) = &node.kind else {
            return Err(mismatch(node));
        };
        let value = interp.eval_node(expr, ctx).await?;
        Err(thrown(value).into())
    }
    .boxed_local()
}
