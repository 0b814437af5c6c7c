//! `InterpreterBuilder` for creating `Interpreter` instances.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::Interpreter;
use crate::host::{DomQuery, Element, HostQuery};
use crate::{CategoryLoader, ImplementationRegistry, Value};

/// Builder for `Interpreter`.
///
/// Unset parts default to the built-in category tables, the default command
/// registry and the built-in selector engine.
#[derive(Default)]
pub struct InterpreterBuilder {
    loader: Option<Arc<CategoryLoader>>,
    registry: Option<ImplementationRegistry>,
    host: Option<Arc<dyn HostQuery>>,
    document: Option<Element>,
    host_globals: FxHashMap<String, Value>,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share a category loader, e.g. one already warmed up.
    #[must_use]
    pub fn loader(mut self, loader: Arc<CategoryLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Functions, commands and query override to use instead of the defaults.
    #[must_use]
    pub fn registry(mut self, registry: ImplementationRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Replace the host query primitive.
    #[must_use]
    pub fn host_query(mut self, host: Arc<dyn HostQuery>) -> Self {
        self.host = Some(host);
        self
    }

    /// The document root that bare selectors are queried against.
    #[must_use]
    pub fn document(mut self, root: Element) -> Self {
        self.document = Some(root);
        self
    }

    /// A name visible to identifier resolution after every context scope.
    #[must_use]
    pub fn host_global(mut self, name: &str, value: Value) -> Self {
        self.host_globals.insert(name.to_string(), value);
        self
    }

    pub fn build(self) -> Interpreter {
        Interpreter {
            loader: self.loader.unwrap_or_default(),
            registry: Arc::new(
                self.registry
                    .unwrap_or_else(ImplementationRegistry::with_defaults),
            ),
            host: self.host.unwrap_or_else(|| Arc::new(DomQuery)),
            document: self.document,
            host_globals: self.host_globals,
        }
    }
}
