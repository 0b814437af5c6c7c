//! Function and method calls.

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use loka_ir::{MemberProperty, Node, NodeKind};

use super::mismatch;
use crate::errors::{cannot_call_method, not_callable, undefined_function};
use crate::loader::EvalOutcome;
use crate::methods::{call_method, get_property, property_key};
use crate::{ControlAction, ExecutionContext, Interpreter, Value};

pub(super) fn call<'a>(
    interp: &'a Interpreter,
    node: &'a Node,
    ctx: &'a mut ExecutionContext,
) -> LocalBoxFuture<'a, EvalOutcome> {
    async move {
        let NodeKind::Call { callee, args } = &node.kind else {
            return Err(mismatch(node));
        };
        match &callee.kind {
            NodeKind::Identifier(name) if ctx.reserved(name).is_none() => {
                let args = eval_args(interp, args, ctx).await?;
                call_named(interp, name, args, ctx).await
            }
            NodeKind::Member { object, property } => {
                let receiver = interp.eval_node(object, ctx).await?;
                let method = match property {
                    MemberProperty::Named(name) => name.clone(),
                    MemberProperty::Computed(key) => property_key(&interp.eval_node(key, ctx).await?),
                };
                let args = eval_args(interp, args, ctx).await?;
                call_on(interp, receiver, &method, args, ctx).await
            }
            _ => {
                let target = interp.eval_node(callee, ctx).await?;
                let args = eval_args(interp, args, ctx).await?;
                match &target {
                    Value::Function(func) => interp.call_function(func, args, ctx).await,
                    other => Err(not_callable(other.type_name()).into()),
                }
            }
        }
    }
    .boxed_local()
}

async fn eval_args(
    interp: &Interpreter,
    args: &[Node],
    ctx: &mut ExecutionContext,
) -> Result<Vec<Value>, ControlAction> {
    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        values.push(interp.eval_node(arg, ctx).await?);
    }
    Ok(values)
}

/// A bare-name call: registered functions first, then context bindings and
/// host globals.
async fn call_named(
    interp: &Interpreter,
    name: &str,
    args: Vec<Value>,
    ctx: &ExecutionContext,
) -> EvalOutcome {
    if let Some(native) = interp.registry().function(name) {
        return native.call(&args).map_err(ControlAction::from);
    }
    match ctx.lookup(name).or_else(|| interp.host_global(name)) {
        Some(Value::Function(func)) => interp.call_function(&func, args, ctx).await,
        Some(other) => Err(not_callable(other.type_name()).into()),
        None => Err(undefined_function(name).into()),
    }
}

/// A method call. A collection receiver stands for its first element;
/// function-valued properties of objects and elements take precedence over
/// built-in methods.
async fn call_on(
    interp: &Interpreter,
    receiver: Value,
    method: &str,
    args: Vec<Value>,
    ctx: &ExecutionContext,
) -> EvalOutcome {
    let receiver = match receiver {
        Value::Collection(elements) => elements
            .first()
            .cloned()
            .map_or(Value::Undefined, Value::Element),
        other => other,
    };
    if receiver.is_nullish() {
        return Err(cannot_call_method(method, receiver.type_name()).into());
    }
    if matches!(receiver, Value::Object(_) | Value::Element(_)) {
        if let Value::Function(func) = get_property(&receiver, method) {
            return interp.call_function(&func, args, ctx).await;
        }
    }
    call_method(&receiver, method, &args).map_err(ControlAction::from)
}
