//! The default engine: compile front door plus interpreter.
//!
//! A `Runtime` is constructed once per host and owns the compile cache and
//! the category loader. `reset` returns both to a cold state for test
//! isolation.

use std::sync::Arc;

use loka_eval::host::Element;
use loka_eval::{
    CategoryLoader, CategorySource, CommandDefinition, EvalError, ExecutionContext,
    ImplementationRegistry, Interpreter, Value,
};
use loka_ir::{Category, Node};
use tracing::debug;

use crate::analyzer::SemanticAnalyzer;
use crate::bridge::GrammarBridge;
use crate::cache::CacheStats;
use crate::compile::{CompileResult, Compiler, ValidateResult};
use crate::errors::RuntimeError;
use crate::options::{CompileOptions, CompilerConfig};

/// What `eval` runs against.
pub enum EvalTarget<'a> {
    /// A fresh context with no `me`.
    Fresh,
    /// A fresh context bound to this element as `me`.
    Element(Element),
    /// A caller-owned context; bindings made by the program persist in it.
    Context(&'a mut ExecutionContext),
}

impl From<Element> for EvalTarget<'_> {
    fn from(element: Element) -> Self {
        EvalTarget::Element(element)
    }
}

impl<'a> From<&'a mut ExecutionContext> for EvalTarget<'a> {
    fn from(ctx: &'a mut ExecutionContext) -> Self {
        EvalTarget::Context(ctx)
    }
}

/// Compiles and runs LokaScript fragments.
pub struct Runtime {
    compiler: Compiler,
    interpreter: Interpreter,
}

impl Runtime {
    /// A runtime with default cache size, collaborators and commands.
    pub fn new() -> Self {
        RuntimeBuilder::new().build()
    }

    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Synchronous compile; see `Compiler::compile_sync`.
    pub fn compile(&self, source: &str, options: &CompileOptions) -> Arc<CompileResult> {
        self.compiler.compile_sync(source, options)
    }

    pub async fn compile_async(&self, source: &str, options: &CompileOptions) -> Arc<CompileResult> {
        self.compiler.compile_async(source, options).await
    }

    pub async fn validate(&self, source: &str, options: &CompileOptions) -> ValidateResult {
        self.compiler.validate(source, options).await
    }

    /// Compile `source` and run it against `target`.
    ///
    /// A compile failure is `RuntimeError::Compilation` carrying the first
    /// error message.
    #[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
    pub async fn eval(
        &self,
        source: &str,
        target: EvalTarget<'_>,
        options: &CompileOptions,
    ) -> Result<Value, RuntimeError> {
        let compiled = self.compiler.compile_async(source, options).await;
        let ast = program(&compiled)?;
        match target {
            EvalTarget::Fresh => {
                self.execute(&ast, &mut ExecutionContext::default())
                    .await
            }
            EvalTarget::Element(element) => {
                self.execute(&ast, &mut ExecutionContext::new(Some(element)))
                    .await
            }
            EvalTarget::Context(ctx) => self.execute(&ast, ctx).await,
        }
    }

    /// Run a compiled program as a program root.
    #[tracing::instrument(level = "debug", skip_all, fields(node = ast.type_name()))]
    pub async fn execute(&self, ast: &Node, ctx: &mut ExecutionContext) -> Result<Value, RuntimeError> {
        let value = self.interpreter.execute(ast, ctx).await?;
        debug!(result = value.type_name(), "executed");
        Ok(value)
    }

    /// Run the handlers `element` registered for `event`; see
    /// `Interpreter::dispatch_event`.
    pub async fn dispatch_event(
        &self,
        element: &Element,
        event: &str,
        detail: Value,
        ctx: &ExecutionContext,
    ) -> Result<usize, RuntimeError> {
        Ok(self
            .interpreter
            .dispatch_event(element, event, detail, ctx)
            .await?)
    }

    /// Load `categories` ahead of the first evaluation that needs them.
    pub async fn warmup(&self, categories: &[Category]) -> Result<(), RuntimeError> {
        Ok(self.interpreter.loader().warmup(categories).await?)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.compiler.cache_stats()
    }

    pub fn clear_cache(&self) {
        self.compiler.clear_cache();
    }

    /// Empty the compile cache and unload every category.
    pub fn reset(&self) {
        self.compiler.clear_cache();
        self.interpreter.loader().reset();
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("compiler", &self.compiler)
            .field("interpreter", &self.interpreter)
            .finish()
    }
}

fn program(compiled: &CompileResult) -> Result<Arc<Node>, RuntimeError> {
    match (&compiled.ast, compiled.ok) {
        (Some(ast), true) => Ok(Arc::clone(ast)),
        _ => {
            let message = compiled
                .first_error()
                .map_or_else(|| "no program".to_string(), |err| err.message.clone());
            Err(RuntimeError::Compilation(message))
        }
    }
}

/// Builder for `Runtime`.
#[derive(Default)]
pub struct RuntimeBuilder {
    config: CompilerConfig,
    bridge: Option<Arc<dyn GrammarBridge>>,
    analyzer: Option<Option<Arc<dyn SemanticAnalyzer>>>,
    categories: Option<Arc<dyn CategorySource>>,
    registry: Option<ImplementationRegistry>,
    document: Option<Element>,
    host_globals: Vec<(String, Value)>,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    #[must_use]
    pub fn bridge(mut self, bridge: Arc<dyn GrammarBridge>) -> Self {
        self.bridge = Some(bridge);
        self
    }

    /// Replace the semantic analyzer; `None` disables it.
    #[must_use]
    pub fn analyzer(mut self, analyzer: Option<Arc<dyn SemanticAnalyzer>>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// Where node-type implementation tables are loaded from.
    #[must_use]
    pub fn category_source(mut self, source: Arc<dyn CategorySource>) -> Self {
        self.categories = Some(source);
        self
    }

    /// Start from `registry` instead of the default commands.
    #[must_use]
    pub fn registry(mut self, registry: ImplementationRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    #[must_use]
    pub fn function<F>(mut self, name: &str, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        self.registry
            .get_or_insert_with(ImplementationRegistry::with_defaults)
            .register_function(name, func);
        self
    }

    #[must_use]
    pub fn command(mut self, command: impl CommandDefinition + 'static) -> Self {
        self.registry
            .get_or_insert_with(ImplementationRegistry::with_defaults)
            .register_command(command);
        self
    }

    #[must_use]
    pub fn document(mut self, root: Element) -> Self {
        self.document = Some(root);
        self
    }

    #[must_use]
    pub fn host_global(mut self, name: &str, value: Value) -> Self {
        self.host_globals.push((name.to_string(), value));
        self
    }

    pub fn build(self) -> Runtime {
        let mut compiler = Compiler::with_config(self.config);
        if let Some(bridge) = self.bridge {
            compiler = compiler.bridge(bridge);
        }
        if let Some(analyzer) = self.analyzer {
            compiler = compiler.analyzer(analyzer);
        }

        let mut interpreter = Interpreter::builder();
        if let Some(source) = self.categories {
            interpreter = interpreter.loader(Arc::new(CategoryLoader::new(source)));
        }
        if let Some(registry) = self.registry {
            interpreter = interpreter.registry(registry);
        }
        if let Some(root) = self.document {
            interpreter = interpreter.document(root);
        }
        for (name, value) in self.host_globals {
            interpreter = interpreter.host_global(&name, value);
        }

        Runtime {
            compiler,
            interpreter: interpreter.build(),
        }
    }
}
