//! Lazy category loading through the runtime.

use std::sync::Arc;

use futures::future::{self, BoxFuture};
use futures::FutureExt;
use loka_eval::{BuiltinCategories, CategorySource, CategoryTable, LoadError, Value};
use loka_ir::Category;
use lokac::{EvalTarget, Runtime, RuntimeError};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;

use crate::common::en;

/// Built-in tables, recording every load and yielding once before it
/// completes so concurrent requests overlap.
#[derive(Default)]
struct RecordingSource {
    loads: Arc<Mutex<Vec<Category>>>,
}

impl CategorySource for RecordingSource {
    fn load(&self, category: Category) -> BoxFuture<'static, Result<CategoryTable, LoadError>> {
        let loads = Arc::clone(&self.loads);
        async move {
            loads.lock().push(category);
            tokio::task::yield_now().await;
            BuiltinCategories.load(category).await
        }
        .boxed()
    }
}

struct OfflineSource;

impl CategorySource for OfflineSource {
    fn load(&self, category: Category) -> BoxFuture<'static, Result<CategoryTable, LoadError>> {
        future::ready(Err(LoadError {
            category,
            reason: "offline".to_string(),
        }))
        .boxed()
    }
}

#[tokio::test]
async fn test_categories_load_once_under_concurrency() {
    let source = RecordingSource::default();
    let loads = Arc::clone(&source.loads);
    let runtime = Runtime::builder().category_source(Arc::new(source)).build();

    let options = en();
    let (a, b) = futures::join!(
        runtime.eval("1 + 2", EvalTarget::Fresh, &options),
        runtime.eval("3 * 4", EvalTarget::Fresh, &options),
    );
    assert_eq!(a.unwrap(), Value::from(3.0));
    assert_eq!(b.unwrap(), Value::from(12.0));

    let mut loaded = loads.lock().clone();
    loaded.sort();
    assert_eq!(loaded, vec![Category::Literals, Category::Operators]);
}

#[tokio::test]
async fn test_only_needed_categories_load() {
    let runtime = Runtime::new();
    runtime
        .eval("1 + 2", EvalTarget::Fresh, &en())
        .await
        .unwrap();
    let loader = runtime.interpreter().loader();
    assert!(loader.is_loaded(Category::Operators));
    assert!(!loader.is_loaded(Category::Control));
    assert!(!loader.is_loaded(Category::Commands));
}

#[tokio::test]
async fn test_warmup_and_reset() {
    let runtime = Runtime::new();
    runtime
        .warmup(&[Category::Control, Category::Commands])
        .await
        .unwrap();
    let loader = runtime.interpreter().loader();
    assert!(loader.is_loaded(Category::Control));
    assert!(loader.is_loaded(Category::Commands));

    runtime.compile("1", &en());
    runtime.reset();
    assert!(!loader.is_loaded(Category::Control));
    assert_eq!(runtime.cache_stats().size, 0);
}

#[tokio::test]
async fn test_failed_warmup_is_reported() {
    let runtime = Runtime::builder()
        .category_source(Arc::new(OfflineSource))
        .build();
    let err = runtime.warmup(&[Category::Control]).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Load(_)));
    assert_eq!(err.to_string(), "control category failed to load: offline");
    assert!(!runtime.interpreter().loader().is_loaded(Category::Control));
}
