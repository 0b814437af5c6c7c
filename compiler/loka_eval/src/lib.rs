//! Loka Eval - tree-walking evaluator for LokaScript.
//!
//! # Architecture
//!
//! - `Interpreter::eval_node`: the single dispatch point. Node handlers are
//!   grouped into categories that the `CategoryLoader` loads lazily, once,
//!   on first use.
//! - `ExecutionContext`: the `me`/`you`/`it`/`result` bindings plus
//!   `locals`, shared `globals` and `variables`.
//! - `ControlAction` / `ExecutionSignal`: the two forms of `halt`, `break`,
//!   `continue`, `return` and `exit`. `Boundary` decides which construct
//!   stops which signal, for both forms.
//! - `ImplementationRegistry`: native functions, commands and an optional
//!   selector query override.
//! - `host`: an in-memory element tree with a small CSS selector engine,
//!   standing in for a browser document.

mod context;
pub mod errors;
pub mod host;
mod interpreter;
pub mod loader;
mod methods;
mod operators;
pub mod registry;
mod signal;
mod template;
mod unary_operators;
mod value;

pub use context::ExecutionContext;
pub use errors::{EvalError, EvalErrorKind};
pub use host::{DomQuery, Element, HostQuery, Selector, SelectorError};
pub use interpreter::{Interpreter, InterpreterBuilder, MAX_CALL_DEPTH};
pub use loader::{
    BuiltinCategories, CategoryLoader, CategorySource, CategoryTable, EvalOutcome, LoadError,
    LoadState, NodeHandler,
};
pub use registry::{CommandDefinition, CommandInput, ImplementationRegistry};
pub use signal::{Boundary, ControlAction, ExecutionSignal, SignalKind};
pub use template::interpolate;
pub use value::{format_number, FunctionValue, NativeFunction, UserFunction, Value};

#[cfg(test)]
mod tests;
