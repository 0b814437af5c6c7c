//! `set`, `get`, registry commands, `def` and `on`.

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use loka_ir::{AssignScope, MemberProperty, Node, NodeKind};

use super::mismatch;
use crate::errors::{element_required, invalid_assignment_target, unknown_command};
use crate::loader::EvalOutcome;
use crate::methods::set_property;
use crate::registry::CommandInput;
use crate::{ControlAction, ExecutionContext, Interpreter, Value};

/// `set target to value`. Evaluates to the assigned value.
pub(super) fn set<'a>(
    interp: &'a Interpreter,
    node: &'a Node,
    ctx: &'a mut ExecutionContext,
) -> LocalBoxFuture<'a, EvalOutcome> {
    async move {
        let NodeKind::Set {
            target,
            value,
            scope,
        } = &node.kind
        else {
            return Err(mismatch(node));
        };
        let value = interp.eval_node(value, ctx).await?;
        match &target.kind {
            NodeKind::Identifier(name) => assign_name(ctx, name, *scope, value.clone())?,
            NodeKind::Dollar(name) => ctx.set_global(name, value.clone()),
            NodeKind::AttributeRef(name) => {
                let Some(el) = ctx.me_element() else {
                    return Err(element_required(&format!("`set @{name}`")).into());
                };
                el.set_attribute(name, &value.to_string());
            }
            NodeKind::Member { object, property } => {
                let receiver = interp.eval_node(object, ctx).await?;
                let key = match property {
                    MemberProperty::Named(name) => Value::string(name),
                    MemberProperty::Computed(key) => interp.eval_node(key, ctx).await?,
                };
                set_property(&receiver, &key, value.clone())?;
            }
            _ => return Err(invalid_assignment_target(target.type_name()).into()),
        }
        Ok(value)
    }
    .boxed_local()
}

fn assign_name(
    ctx: &mut ExecutionContext,
    name: &str,
    scope: AssignScope,
    value: Value,
) -> Result<(), ControlAction> {
    match name {
        "it" | "its" => ctx.it = value,
        "result" => ctx.result = value,
        "you" | "your" => ctx.you = value,
        "me" | "my" | "I" => return Err(invalid_assignment_target(&format!("`{name}`")).into()),
        _ => match scope {
            AssignScope::Global => ctx.set_global(name, value),
            AssignScope::Local => ctx.set_local(name, value),
            AssignScope::Default => {
                if !ctx.has_local(name) && ctx.has_global(name) {
                    ctx.set_global(name, value);
                } else {
                    ctx.set_local(name, value);
                }
            }
        },
    }
    Ok(())
}

/// `get expr` / `call expr`: the value lands in both `it` and `result`.
pub(super) fn get<'a>(
    interp: &'a Interpreter,
    node: &'a Node,
    ctx: &'a mut ExecutionContext,
) -> LocalBoxFuture<'a, EvalOutcome> {
    async move {
        let NodeKind::Get(expr) = &node.kind else {
            return Err(mismatch(node));
        };
        let value = interp.eval_node(expr, ctx).await?;
        ctx.it = value.clone();
        ctx.result = value.clone();
        Ok(value)
    }
    .boxed_local()
}

/// A registry command. Arguments are evaluated in order; prepositional ones
/// become modifiers keyed by their preposition.
pub(super) fn command<'a>(
    interp: &'a Interpreter,
    node: &'a Node,
    ctx: &'a mut ExecutionContext,
) -> LocalBoxFuture<'a, EvalOutcome> {
    async move {
        let NodeKind::Command { name, args } = &node.kind else {
            return Err(mismatch(node));
        };
        let Some(definition) = interp.registry().command(name) else {
            return Err(unknown_command(name).into());
        };
        let mut input = CommandInput::default();
        for arg in args {
            let value = match (&arg.value.kind, &arg.preposition) {
                (NodeKind::Selector(css), None) if definition.selector_args_as_text() => {
                    Value::string(css)
                }
                _ => interp.eval_node(&arg.value, ctx).await?,
            };
            match &arg.preposition {
                Some(prep) => {
                    input.modifiers.insert(prep.clone(), value);
                }
                None => input.args.push(value),
            }
        }
        definition
            .execute(input, ctx)
            .await
            .map_err(ControlAction::from)
    }
    .boxed_local()
}

/// `def name(params) ... end` binds a function value in `globals`.
pub(super) fn def<'a>(
    _: &'a Interpreter,
    node: &'a Node,
    ctx: &'a mut ExecutionContext,
) -> LocalBoxFuture<'a, EvalOutcome> {
    async move {
        let NodeKind::Def { name, params, body } = &node.kind else {
            return Err(mismatch(node));
        };
        let func = Value::user_function(name.clone(), params.clone(), body.clone());
        ctx.set_global(name, func.clone());
        Ok(func)
    }
    .boxed_local()
}

/// `on event ... end` registers the body on `me`.
pub(super) fn on<'a>(
    _: &'a Interpreter,
    node: &'a Node,
    ctx: &'a mut ExecutionContext,
) -> LocalBoxFuture<'a, EvalOutcome> {
    async move {
        let NodeKind::On { event, body } = &node.kind else {
            return Err(mismatch(node));
        };
        let Some(el) = ctx.me_element() else {
            return Err(element_required("`on`").into());
        };
        el.add_handler(event, body.clone());
        Ok(Value::Undefined)
    }
    .boxed_local()
}
