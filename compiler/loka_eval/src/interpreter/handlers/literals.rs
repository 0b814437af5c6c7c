//! Literals, templates, arrays and objects.

use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use indexmap::IndexMap;
use loka_ir::{Literal, Node, NodeKind, ObjectKey};

use super::mismatch;
use crate::loader::EvalOutcome;
use crate::methods::property_key;
use crate::template::interpolate;
use crate::{ExecutionContext, Interpreter, Value};

pub(super) fn literal<'a>(
    _: &'a Interpreter,
    node: &'a Node,
    _: &'a mut ExecutionContext,
) -> LocalBoxFuture<'a, EvalOutcome> {
    let NodeKind::Literal(lit) = &node.kind else {
        return future::ready(Err(mismatch(node))).boxed_local();
    };
    let value = match lit {
        Literal::Number(n) => Value::Number(*n),
        Literal::Str(s) => Value::string(s),
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Null => Value::Null,
        Literal::Undefined => Value::Undefined,
    };
    future::ready(Ok(value)).boxed_local()
}

pub(super) fn template<'a>(
    _: &'a Interpreter,
    node: &'a Node,
    ctx: &'a mut ExecutionContext,
) -> LocalBoxFuture<'a, EvalOutcome> {
    let outcome = match &node.kind {
        NodeKind::Template(body) => Ok(Value::string(interpolate(body, ctx))),
        _ => Err(mismatch(node)),
    };
    future::ready(outcome).boxed_local()
}

/// Elements are evaluated strictly in order.
pub(super) fn array<'a>(
    interp: &'a Interpreter,
    node: &'a Node,
    ctx: &'a mut ExecutionContext,
) -> LocalBoxFuture<'a, EvalOutcome> {
    async move {
        let NodeKind::Array(elements) = &node.kind else {
            return Err(mismatch(node));
        };
        let mut items = Vec::with_capacity(elements.len());
        for element in elements {
            items.push(interp.eval_node(element, ctx).await?);
        }
        Ok(Value::array(items))
    }
    .boxed_local()
}

/// Entries are evaluated in declaration order; computed keys are coerced to
/// strings.
pub(super) fn object<'a>(
    interp: &'a Interpreter,
    node: &'a Node,
    ctx: &'a mut ExecutionContext,
) -> LocalBoxFuture<'a, EvalOutcome> {
    async move {
        let NodeKind::Object(entries) = &node.kind else {
            return Err(mismatch(node));
        };
        let mut map = IndexMap::with_capacity(entries.len());
        for entry in entries {
            let key = match &entry.key {
                ObjectKey::Ident(name) | ObjectKey::Literal(name) => name.clone(),
                ObjectKey::Computed(expr) => property_key(&interp.eval_node(expr, ctx).await?),
            };
            let value = interp.eval_node(&entry.value, ctx).await?;
            map.insert(key, value);
        }
        Ok(Value::object(map))
    }
    .boxed_local()
}
