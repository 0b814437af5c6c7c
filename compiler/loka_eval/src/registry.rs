//! Implementation registry: native functions, commands and an optional
//! query override, consulted by call and command evaluation.

use std::fmt;
use std::sync::Arc;

use futures::future::LocalBoxFuture;
use rustc_hash::FxHashMap;

use crate::host::HostQuery;
use crate::{EvalError, ExecutionContext, NativeFunction, Value};

mod commands;

pub use commands::{AddCommand, LogCommand, RemoveCommand, ToggleCommand, WaitCommand};

/// Evaluated arguments of a command.
#[derive(Clone, Debug, Default)]
pub struct CommandInput {
    /// Positional arguments, in source order.
    pub args: Vec<Value>,
    /// Arguments introduced by a preposition (`to`, `from`, `by`, ...).
    pub modifiers: FxHashMap<String, Value>,
}

impl CommandInput {
    pub fn modifier(&self, preposition: &str) -> Option<&Value> {
        self.modifiers.get(preposition)
    }
}

/// A command callable from source as `name arg, ... prep arg`.
///
/// Commands report failures and signals in the exceptional form; the
/// evaluator lifts them into `ControlAction`.
pub trait CommandDefinition: Send + Sync {
    fn name(&self) -> &str;

    /// Whether positional selector arguments (`.active`) are passed as their
    /// text rather than queried.
    fn selector_args_as_text(&self) -> bool {
        false
    }

    fn execute<'a>(
        &'a self,
        input: CommandInput,
        ctx: &'a mut ExecutionContext,
    ) -> LocalBoxFuture<'a, Result<Value, EvalError>>;
}

/// Name-keyed implementations available to evaluated code.
#[derive(Default)]
pub struct ImplementationRegistry {
    functions: FxHashMap<String, NativeFunction>,
    commands: FxHashMap<String, Arc<dyn CommandDefinition>>,
    query: Option<Arc<dyn HostQuery>>,
}

impl ImplementationRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the default commands (`log`, `add`, `remove`,
    /// `toggle`, `wait`).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_command(LogCommand);
        registry.register_command(AddCommand);
        registry.register_command(RemoveCommand);
        registry.register_command(ToggleCommand);
        registry.register_command(WaitCommand);
        registry
    }

    pub fn register_function<F>(&mut self, name: &str, func: F)
    where
        F: Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        self.functions
            .insert(name.to_string(), NativeFunction::new(name, func));
    }

    pub fn register_command(&mut self, command: impl CommandDefinition + 'static) {
        self.commands
            .insert(command.name().to_string(), Arc::new(command));
    }

    /// Route selector evaluation through `query` instead of the host.
    pub fn register_query(&mut self, query: impl HostQuery + 'static) {
        self.query = Some(Arc::new(query));
    }

    pub fn function(&self, name: &str) -> Option<&NativeFunction> {
        self.functions.get(name)
    }

    pub fn command(&self, name: &str) -> Option<Arc<dyn CommandDefinition>> {
        self.commands.get(name).cloned()
    }

    pub fn query(&self) -> Option<&Arc<dyn HostQuery>> {
        self.query.as_ref()
    }
}

impl fmt::Debug for ImplementationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut functions: Vec<_> = self.functions.keys().collect();
        functions.sort_unstable();
        let mut commands: Vec<_> = self.commands.keys().collect();
        commands.sort_unstable();
        f.debug_struct("ImplementationRegistry")
            .field("functions", &functions)
            .field("commands", &commands)
            .field("query", &self.query.is_some())
            .finish()
    }
}
