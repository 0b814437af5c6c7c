//! FIFO compile cache.
//!
//! Entries are keyed on `(source, NormalizedOptions, CompilePath)` and hold
//! the shared `Arc<CompileResult>`; a hit hands back the very same `Arc`. Eviction is
//! strict insertion order: a hit never promotes an entry. Only successful
//! results are ever inserted.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::debug;

use crate::compile::CompileResult;
use crate::options::NormalizedOptions;

/// Which front-door path produced an entry.
///
/// Parsing non-English text as written and translating it first can yield
/// different programs for the same source, so the two never share a slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CompilePath {
    /// Parsed as written.
    Parsed,
    /// Translated by the grammar bridge first.
    Bridged,
}

type CacheKey = (String, NormalizedOptions, CompilePath);

/// Snapshot of cache counters.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
    /// `hits / (hits + misses)`, `0` before any lookup.
    pub hit_rate: f64,
}

struct CacheInner {
    entries: FxHashMap<CacheKey, Arc<CompileResult>>,
    order: VecDeque<CacheKey>,
    hits: u64,
    misses: u64,
}

/// Thread-safe FIFO cache of successful compile results.
pub struct CompileCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

impl CompileCache {
    pub fn new(capacity: usize) -> Self {
        CompileCache {
            capacity,
            inner: Mutex::new(CacheInner {
                entries: FxHashMap::default(),
                order: VecDeque::new(),
                hits: 0,
                misses: 0,
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Look up a result, counting the hit or miss.
    pub fn get(
        &self,
        source: &str,
        options: &NormalizedOptions,
        path: CompilePath,
    ) -> Option<Arc<CompileResult>> {
        let mut inner = self.inner.lock();
        // The key owns its source text, so a lookup has to build one.
        let key = (source.to_string(), options.clone(), path);
        if let Some(found) = inner.entries.get(&key).cloned() {
            inner.hits += 1;
            debug!(len = source.len(), "compile cache hit");
            Some(found)
        } else {
            inner.misses += 1;
            debug!(len = source.len(), "compile cache miss");
            None
        }
    }

    /// Store a successful result and return the cached `Arc`.
    ///
    /// If another caller stored the same key first, theirs is kept and
    /// returned so every caller observes one shared result. Failed results
    /// are returned unchanged and never stored.
    pub fn insert(
        &self,
        source: &str,
        options: &NormalizedOptions,
        path: CompilePath,
        result: Arc<CompileResult>,
    ) -> Arc<CompileResult> {
        if !result.ok || self.capacity == 0 {
            return result;
        }
        let mut inner = self.inner.lock();
        let key = (source.to_string(), options.clone(), path);
        if let Some(existing) = inner.entries.get(&key) {
            return Arc::clone(existing);
        }
        while inner.entries.len() >= self.capacity {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            inner.entries.remove(&oldest);
            debug!(len = oldest.0.len(), "compile cache evicted oldest entry");
        }
        inner.order.push_back(key.clone());
        inner.entries.insert(key, Arc::clone(&result));
        result
    }

    /// Whether `(source, options, path)` is currently cached. Does not count.
    pub fn contains(&self, source: &str, options: &NormalizedOptions, path: CompilePath) -> bool {
        let key = (source.to_string(), options.clone(), path);
        self.inner.lock().entries.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry and zero the counters.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
        inner.hits = 0;
        inner.misses = 0;
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let total = inner.hits + inner.misses;
        #[expect(
            clippy::cast_precision_loss,
            reason = "counters stay far below 2^52 in practice"
        )]
        let hit_rate = if total == 0 {
            0.0
        } else {
            inner.hits as f64 / total as f64
        };
        CacheStats {
            size: inner.entries.len(),
            hits: inner.hits,
            misses: inner.misses,
            hit_rate,
        }
    }
}

impl std::fmt::Debug for CompileCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompileCache")
            .field("capacity", &self.capacity)
            .field("stats", &self.stats())
            .finish()
    }
}
