//! Binary, unary and conditional expressions.

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use loka_ir::{BinaryOp, Node, NodeKind};

use super::mismatch;
use crate::loader::EvalOutcome;
use crate::operators::evaluate_binary;
use crate::unary_operators::evaluate_unary;
use crate::{ExecutionContext, Interpreter, Value};

/// Both operands are evaluated left to right before the operator applies,
/// `and`/`or` included.
///
/// Two forms look at the syntax first: `<selector> in <target>` queries the
/// selector under each target element, and `x matches <selector>` tests
/// against the selector text instead of a query result.
pub(super) fn binary<'a>(
    interp: &'a Interpreter,
    node: &'a Node,
    ctx: &'a mut ExecutionContext,
) -> LocalBoxFuture<'a, EvalOutcome> {
    async move {
        let NodeKind::Binary { op, left, right } = &node.kind else {
            return Err(mismatch(node));
        };
        match (op, &left.kind, &right.kind) {
            (BinaryOp::In, NodeKind::Selector(css), _) => {
                let scope = interp.eval_node(right, ctx).await?;
                let mut found = Vec::new();
                for element in scope.elements() {
                    found.extend(interp.query(css, &element)?);
                }
                Ok(Value::collection(found))
            }
            (BinaryOp::Matches, _, NodeKind::Selector(css)) => {
                let subject = interp.eval_node(left, ctx).await?;
                Ok(evaluate_binary(*op, subject, Value::string(css)))
            }
            _ => {
                let lhs = interp.eval_node(left, ctx).await?;
                let rhs = interp.eval_node(right, ctx).await?;
                Ok(evaluate_binary(*op, lhs, rhs))
            }
        }
    }
    .boxed_local()
}

pub(super) fn unary<'a>(
    interp: &'a Interpreter,
    node: &'a Node,
    ctx: &'a mut ExecutionContext,
) -> LocalBoxFuture<'a, EvalOutcome> {
    async move {
        let NodeKind::Unary { op, operand } = &node.kind else {
            return Err(mismatch(node));
        };
        let value = interp.eval_node(operand, ctx).await?;
        Ok(evaluate_unary(*op, &value))
    }
    .boxed_local()
}

/// Only the chosen branch is evaluated.
pub(super) fn conditional<'a>(
    interp: &'a Interpreter,
    node: &'a Node,
    ctx: &'a mut ExecutionContext,
) -> LocalBoxFuture<'a, EvalOutcome> {
    async move {
        let NodeKind::Conditional {
            test,
            consequent,
            alternate,
        } = &node.kind
        else {
            return Err(mismatch(node));
        };
        let branch = if interp.eval_node(test, ctx).await?.is_truthy() {
            consequent
        } else {
            alternate
        };
        interp.eval_node(branch, ctx).await
    }
    .boxed_local()
}
