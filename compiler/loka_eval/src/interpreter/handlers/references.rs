//! Identifiers, `$name`, `@attr`, selectors and member access.

use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use loka_ir::{MemberProperty, Node, NodeKind};

use super::mismatch;
use crate::loader::EvalOutcome;
use crate::methods::{get_computed, get_property};
use crate::{ExecutionContext, FunctionValue, Interpreter, Value};

/// Reserved words, then registered functions, `locals`, `globals`,
/// `variables` and host globals. An unresolved name evaluates to its own text.
pub(super) fn identifier<'a>(
    interp: &'a Interpreter,
    node: &'a Node,
    ctx: &'a mut ExecutionContext,
) -> LocalBoxFuture<'a, EvalOutcome> {
    let NodeKind::Identifier(name) = &node.kind else {
        return future::ready(Err(mismatch(node))).boxed_local();
    };
    future::ready(Ok(resolve_identifier(interp, ctx, name))).boxed_local()
}

pub(super) fn resolve_identifier(interp: &Interpreter, ctx: &ExecutionContext, name: &str) -> Value {
    if let Some(value) = ctx.reserved(name) {
        return value;
    }
    if let Some(func) = interp.registry().function(name) {
        return Value::Function(FunctionValue::Native(func.clone()));
    }
    ctx.lookup(name)
        .or_else(|| interp.host_global(name))
        .unwrap_or_else(|| Value::string(name))
}

/// `$name` reads context bindings directly, globals first, and falls back to
/// an empty string.
pub(super) fn dollar<'a>(
    interp: &'a Interpreter,
    node: &'a Node,
    ctx: &'a mut ExecutionContext,
) -> LocalBoxFuture<'a, EvalOutcome> {
    let NodeKind::Dollar(name) = &node.kind else {
        return future::ready(Err(mismatch(node))).boxed_local();
    };
    let value = ctx
        .reserved(name)
        .or_else(|| ctx.global(name))
        .or_else(|| ctx.local(name))
        .or_else(|| ctx.variable(name))
        .or_else(|| interp.host_global(name))
        .unwrap_or_else(|| Value::string(""));
    future::ready(Ok(value)).boxed_local()
}

/// `@name`: attribute of `me`, `null` when absent.
pub(super) fn attribute<'a>(
    _: &'a Interpreter,
    node: &'a Node,
    ctx: &'a mut ExecutionContext,
) -> LocalBoxFuture<'a, EvalOutcome> {
    let NodeKind::AttributeRef(name) = &node.kind else {
        return future::ready(Err(mismatch(node))).boxed_local();
    };
    let value = match ctx.me_element() {
        Some(el) => el.get_attribute(name).map_or(Value::Null, Value::string),
        None => Value::Undefined,
    };
    future::ready(Ok(value)).boxed_local()
}

/// Query the document (or `me` when there is no document). Always a
/// collection, empty when nothing matches.
pub(super) fn selector<'a>(
    interp: &'a Interpreter,
    node: &'a Node,
    ctx: &'a mut ExecutionContext,
) -> LocalBoxFuture<'a, EvalOutcome> {
    let NodeKind::Selector(css) = &node.kind else {
        return future::ready(Err(mismatch(node))).boxed_local();
    };
    let scope = interp.document().or_else(|| ctx.me_element());
    let outcome = match scope {
        Some(scope) => interp
            .query(css, scope)
            .map(Value::collection)
            .map_err(Into::into),
        None => Ok(Value::collection(Vec::new())),
    };
    future::ready(outcome).boxed_local()
}

pub(super) fn member<'a>(
    interp: &'a Interpreter,
    node: &'a Node,
    ctx: &'a mut ExecutionContext,
) -> LocalBoxFuture<'a, EvalOutcome> {
    async move {
        let NodeKind::Member { object, property } = &node.kind else {
            return Err(mismatch(node));
        };
        let receiver = interp.eval_node(object, ctx).await?;
        Ok(match property {
            MemberProperty::Named(name) => get_property(&receiver, name),
            MemberProperty::Computed(key) => {
                let key = interp.eval_node(key, ctx).await?;
                get_computed(&receiver, &key)
            }
        })
    }
    .boxed_local()
}
