//! The tree-walking interpreter.
//!
//! `eval_node` is the single dispatch point: it looks up the node's category
//! table through the `CategoryLoader` (loading it on first use) and runs the
//! handler registered for the node's tag. Handlers recurse through
//! `eval_node` again, so evaluation is a chain of boxed local futures.
//!
//! Outcomes use the Result-typed signal form (`ControlAction`). `evaluate`
//! converts to the exceptional form for callers that want a plain
//! `Result<Value, EvalError>`.

mod builder;
pub(crate) mod handlers;

use std::sync::Arc;

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use loka_ir::Node;
use loka_stack::grow_on_poll;
use rustc_hash::FxHashMap;
use tracing::{trace, warn};

pub use builder::InterpreterBuilder;

use crate::errors::{
    category_load_failed, invalid_selector, recursion_limit_exceeded, unsupported_node_type,
};
use crate::host::{Element, HostQuery};
use crate::loader::EvalOutcome;
use crate::{
    Boundary, CategoryLoader, ControlAction, EvalError, ExecutionContext, FunctionValue,
    ImplementationRegistry, Value,
};

/// Deepest chain of nested user-function calls before evaluation fails.
pub const MAX_CALL_DEPTH: usize = 500;

/// Evaluates AST nodes against an `ExecutionContext`.
pub struct Interpreter {
    loader: Arc<CategoryLoader>,
    registry: Arc<ImplementationRegistry>,
    host: Arc<dyn HostQuery>,
    document: Option<Element>,
    host_globals: FxHashMap<String, Value>,
}

impl Interpreter {
    /// An interpreter with the built-in categories and default commands.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    pub fn loader(&self) -> &Arc<CategoryLoader> {
        &self.loader
    }

    pub fn registry(&self) -> &ImplementationRegistry {
        &self.registry
    }

    /// The document root selectors are queried against.
    pub fn document(&self) -> Option<&Element> {
        self.document.as_ref()
    }

    pub fn host_global(&self, name: &str) -> Option<Value> {
        self.host_globals.get(name).cloned()
    }

    /// Evaluate one node. Signals come back as `Err(ControlAction::..)`.
    pub fn eval_node<'a>(
        &'a self,
        node: &'a Node,
        ctx: &'a mut ExecutionContext,
    ) -> LocalBoxFuture<'a, EvalOutcome> {
        let dispatch = async move {
            let tag = node.tag();
            let category = tag.category();
            let table = self
                .loader
                .ensure(category)
                .await
                .map_err(|err| category_load_failed(category, &err.reason).at_node(node))?;
            let Some(handler) = table.handler(tag) else {
                return Err(unsupported_node_type(tag.as_str()).at_node(node).into());
            };
            trace!(node = %tag, line = node.loc.line, column = node.loc.column, "dispatch");
            handler(self, node, ctx)
                .await
                .map_err(|action| action.at_node_if_error(node))
        };
        grow_on_poll(dispatch.boxed_local()).boxed_local()
    }

    /// Result-typed evaluation: signals are returned, not caught.
    pub async fn evaluate_with_result(
        &self,
        node: &Node,
        ctx: &mut ExecutionContext,
    ) -> EvalOutcome {
        self.eval_node(node, ctx).await
    }

    /// Exceptional evaluation: signals ride on the error, in `EvalError::signal`.
    pub async fn evaluate(&self, node: &Node, ctx: &mut ExecutionContext) -> Result<Value, EvalError> {
        self.eval_node(node, ctx)
            .await
            .map_err(ControlAction::into_eval_error)
    }

    /// Evaluate `node` as a program root.
    ///
    /// The root is a sequence, handler and program boundary at once, so no
    /// signal escapes; only genuine errors do.
    pub async fn execute(&self, node: &Node, ctx: &mut ExecutionContext) -> Result<Value, EvalError> {
        let outcome = self.eval_node(node, ctx).await;
        let outcome = Boundary::Sequence.catch(outcome);
        let outcome = Boundary::Handler.catch(outcome);
        Boundary::Program
            .catch(outcome)
            .map_err(ControlAction::into_eval_error)
    }

    /// Call a function value with evaluated arguments.
    ///
    /// A user function runs in a child of `ctx` behind sequence and handler
    /// boundaries: `return v` yields `v`, falling off the end yields
    /// `undefined`.
    pub async fn call_function(
        &self,
        func: &FunctionValue,
        args: Vec<Value>,
        ctx: &ExecutionContext,
    ) -> EvalOutcome {
        match func {
            FunctionValue::Native(native) => native.call(&args).map_err(ControlAction::from),
            FunctionValue::User(user) => {
                if ctx.depth() >= MAX_CALL_DEPTH {
                    return Err(recursion_limit_exceeded(MAX_CALL_DEPTH).into());
                }
                let mut scope = ctx.child(ctx.me_element().cloned());
                let mut args = args.into_iter();
                for param in &user.params {
                    scope.set_local(param, args.next().unwrap_or_default());
                }
                let outcome = self
                    .eval_node(&user.body, &mut scope)
                    .await
                    .map(|_| Value::Undefined);
                Boundary::Handler.catch(Boundary::Sequence.catch(outcome))
            }
        }
    }

    /// Run every handler registered on `element` for `event`, in
    /// registration order.
    ///
    /// Each handler runs in a fresh child of `parent` with `me` bound to the
    /// element and the local `event` bound to `detail`. A failing handler is
    /// logged and does not stop the others; the first failure is returned
    /// once all have run. Returns the number of handlers run.
    pub async fn dispatch_event(
        &self,
        element: &Element,
        event: &str,
        detail: Value,
        parent: &ExecutionContext,
    ) -> Result<usize, EvalError> {
        let handlers = element.handlers(event);
        let mut first_error = None;
        for body in &handlers {
            let mut ctx = parent.child(Some(element.clone()));
            ctx.set_local("event", detail.clone());
            if let Err(err) = self.execute(body, &mut ctx).await {
                warn!(event, error = %err, "event handler failed");
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(handlers.len()),
        }
    }

    /// Query `selector` under `scope` through the registered query
    /// implementation, or the host primitive.
    pub(crate) fn query(&self, selector: &str, scope: &Element) -> Result<Vec<Element>, EvalError> {
        let query = self.registry.query().unwrap_or(&self.host);
        query
            .query_all(selector, scope)
            .map_err(|err| invalid_selector(&err))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("loader", &self.loader)
            .field("registry", &self.registry)
            .field("document", &self.document)
            .finish_non_exhaustive()
    }
}
