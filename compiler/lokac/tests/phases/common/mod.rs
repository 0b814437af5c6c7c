//! Shared test utilities for phase tests.

use std::sync::Arc;

use futures::executor::block_on;
use loka_eval::{EvalError, ExecutionContext, Value};
use lokac::{CompileOptions, CompileResult, Compiler, EvalTarget, Runtime};

/// Default (English) options.
pub fn en() -> CompileOptions {
    CompileOptions::new()
}

/// Compile with a fresh default compiler, asserting success.
pub fn compile_ok(source: &str) -> Arc<CompileResult> {
    let result = Compiler::new().compile_sync(source, &en());
    assert!(result.ok, "{source:?} failed: {:?}", result.errors);
    result
}

/// Evaluate in a fresh context on a fresh runtime.
pub fn eval(source: &str) -> Value {
    block_on(Runtime::new().eval(source, EvalTarget::Fresh, &en()))
        .unwrap_or_else(|err| panic!("{source:?} failed: {err}"))
}

/// Evaluate against a caller-owned context.
pub fn eval_in(runtime: &Runtime, ctx: &mut ExecutionContext, source: &str) -> Value {
    block_on(runtime.eval(source, EvalTarget::Context(ctx), &en()))
        .unwrap_or_else(|err| panic!("{source:?} failed: {err}"))
}

/// The evaluation error of a fragment that compiles but fails at runtime.
pub fn eval_err(source: &str) -> EvalError {
    match block_on(Runtime::new().eval(source, EvalTarget::Fresh, &en())) {
        Err(lokac::RuntimeError::Eval(err)) => err,
        other => panic!("{source:?}: expected an evaluation error, got {other:?}"),
    }
}
