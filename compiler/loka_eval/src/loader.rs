//! On-demand loading of node-handler categories.
//!
//! Every node tag belongs to one `Category`. The first evaluation of a node
//! whose category is not loaded yet triggers a load from the `CategorySource`.
//! Concurrent requests for the same category await one shared in-flight load.
//! A failed load leaves the category unloaded so the next request retries.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::{self, BoxFuture, LocalBoxFuture, Shared};
use futures::FutureExt;
use loka_ir::{Category, Node, NodeTag};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::{ControlAction, ExecutionContext, Interpreter, Value};

/// Result of evaluating one node.
pub type EvalOutcome = Result<Value, ControlAction>;

/// Semantics of one node tag.
pub type NodeHandler = for<'a> fn(
    &'a Interpreter,
    &'a Node,
    &'a mut ExecutionContext,
) -> LocalBoxFuture<'a, EvalOutcome>;

/// The handlers of one category.
pub struct CategoryTable {
    category: Category,
    handlers: FxHashMap<NodeTag, NodeHandler>,
}

impl CategoryTable {
    pub fn new(category: Category) -> Self {
        CategoryTable {
            category,
            handlers: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn with(mut self, tag: NodeTag, handler: NodeHandler) -> Self {
        self.handlers.insert(tag, handler);
        self
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn handler(&self, tag: NodeTag) -> Option<NodeHandler> {
        self.handlers.get(&tag).copied()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for CategoryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.handlers.keys().map(|t| t.as_str()).collect();
        tags.sort_unstable();
        f.debug_struct("CategoryTable")
            .field("category", &self.category)
            .field("tags", &tags)
            .finish()
    }
}

/// A category that could not be loaded.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{category} category failed to load: {reason}")]
pub struct LoadError {
    pub category: Category,
    pub reason: String,
}

/// Where category tables come from.
pub trait CategorySource: Send + Sync {
    fn load(&self, category: Category) -> BoxFuture<'static, Result<CategoryTable, LoadError>>;
}

/// The built-in handler tables, available immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinCategories;

impl CategorySource for BuiltinCategories {
    fn load(&self, category: Category) -> BoxFuture<'static, Result<CategoryTable, LoadError>> {
        future::ready(Ok(crate::interpreter::handlers::table(category))).boxed()
    }
}

/// Observable load state of a category.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
}

type SharedLoad = Shared<BoxFuture<'static, Result<Arc<CategoryTable>, LoadError>>>;

enum CategoryState {
    Loading { generation: u64, load: SharedLoad },
    Loaded(Arc<CategoryTable>),
}

/// Per-category single-flight loader.
pub struct CategoryLoader {
    source: Arc<dyn CategorySource>,
    states: Mutex<FxHashMap<Category, CategoryState>>,
    next_generation: AtomicU64,
}

impl CategoryLoader {
    pub fn new(source: Arc<dyn CategorySource>) -> Self {
        CategoryLoader {
            source,
            states: Mutex::new(FxHashMap::default()),
            next_generation: AtomicU64::new(0),
        }
    }

    /// A loader over the built-in tables.
    pub fn builtin() -> Self {
        Self::new(Arc::new(BuiltinCategories))
    }

    pub fn state(&self, category: Category) -> LoadState {
        match self.states.lock().get(&category) {
            None => LoadState::Unloaded,
            Some(CategoryState::Loading { .. }) => LoadState::Loading,
            Some(CategoryState::Loaded(_)) => LoadState::Loaded,
        }
    }

    pub fn is_loaded(&self, category: Category) -> bool {
        self.state(category) == LoadState::Loaded
    }

    /// The table for `category`, loading it first if needed.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn ensure(&self, category: Category) -> Result<Arc<CategoryTable>, LoadError> {
        let (generation, load) = {
            let mut states = self.states.lock();
            match states.get(&category) {
                Some(CategoryState::Loaded(table)) => return Ok(Arc::clone(table)),
                Some(CategoryState::Loading { generation, load }) => (*generation, load.clone()),
                None => {
                    let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
                    debug!(%category, "loading category");
                    let load = self
                        .source
                        .load(category)
                        .map(|result| result.map(Arc::new))
                        .boxed()
                        .shared();
                    states.insert(
                        category,
                        CategoryState::Loading {
                            generation,
                            load: load.clone(),
                        },
                    );
                    (generation, load)
                }
            }
        };

        let result = load.await;

        let mut states = self.states.lock();
        // Only the load that is still current may settle the state; a reset
        // in between leaves the newer state alone.
        let current = matches!(
            states.get(&category),
            Some(CategoryState::Loading { generation: g, .. }) if *g == generation
        );
        if current {
            match &result {
                Ok(table) => {
                    debug!(%category, handlers = table.len(), "category loaded");
                    states.insert(category, CategoryState::Loaded(Arc::clone(table)));
                }
                Err(err) => {
                    warn!(%category, error = %err, "category load failed");
                    states.remove(&category);
                }
            }
        }
        result
    }

    /// Load every category in `categories` ahead of evaluation.
    pub async fn warmup(&self, categories: &[Category]) -> Result<(), LoadError> {
        let loads = categories.iter().map(|&category| self.ensure(category));
        for result in future::join_all(loads).await {
            result?;
        }
        Ok(())
    }

    /// Forget every loaded category. In-flight loads finish without
    /// touching the new state.
    pub fn reset(&self) {
        self.states.lock().clear();
    }
}

impl Default for CategoryLoader {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for CategoryLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let states = self.states.lock();
        let mut loaded: Vec<_> = states
            .iter()
            .filter(|(_, s)| matches!(s, CategoryState::Loaded(_)))
            .map(|(c, _)| c.as_str())
            .collect();
        loaded.sort_unstable();
        f.debug_struct("CategoryLoader")
            .field("loaded", &loaded)
            .finish_non_exhaustive()
    }
}
