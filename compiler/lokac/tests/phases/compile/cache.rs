//! Cache identity, counters and eviction through `compile_sync`.

use std::sync::Arc;

use lokac::{CompileOptions, CompilePath, Compiler, CompilerConfig};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::common::en;

#[test]
fn test_repeated_compiles_share_one_result() {
    let compiler = Compiler::new();
    let first = compiler.compile_sync("set x to 5", &en());
    let results: Vec<_> = (0..113)
        .map(|_| compiler.compile_sync("set x to 5", &en()))
        .collect();
    assert!(results.iter().all(|r| Arc::ptr_eq(r, &first)));

    let stats = compiler.cache_stats();
    assert_eq!(stats.hits, 113);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.size, 1);
    assert!((stats.hit_rate - 113.0 / 114.0).abs() < 1e-12);
}

#[test]
fn test_option_change_is_a_different_result() {
    let compiler = Compiler::new();
    let a = compiler.compile_sync("42", &en());
    let b = compiler.compile_sync("42", &en().traditional(true));
    let c = compiler.compile_sync("42", &en().confidence_threshold(0.9));
    assert!(!Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &c));
    assert!(!Arc::ptr_eq(&b, &c));
    assert_eq!(compiler.cache_stats().size, 3);
}

#[test]
fn test_absent_and_explicit_english_share_a_key() {
    let compiler = Compiler::new();
    let a = compiler.compile_sync("42", &CompileOptions::default());
    let b = compiler.compile_sync("42", &en().language("EN"));
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn test_failed_compiles_are_never_cached() {
    let compiler = Compiler::new();
    let first = compiler.compile_sync("5 +", &en());
    let second = compiler.compile_sync("5 +", &en());
    assert!(!first.ok);
    assert!(!Arc::ptr_eq(&first, &second));
    let stats = compiler.cache_stats();
    assert_eq!(stats.size, 0);
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.hits, 0);
}

#[test]
fn test_clear_resets_counters_and_identity() {
    let compiler = Compiler::new();
    let before = compiler.compile_sync("1 + 1", &en());
    compiler.compile_sync("1 + 1", &en());
    compiler.clear_cache();

    let stats = compiler.cache_stats();
    assert_eq!((stats.size, stats.hits, stats.misses), (0, 0, 0));
    assert_eq!(stats.hit_rate, 0.0);

    let after = compiler.compile_sync("1 + 1", &en());
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(before.ast, after.ast);
}

#[test]
fn test_eviction_is_fifo_without_promotion() {
    let compiler = Compiler::with_config(CompilerConfig { cache_capacity: 2 });
    let one = compiler.compile_sync("1", &en());
    compiler.compile_sync("2", &en());
    // Hitting `1` again does not protect it.
    assert!(Arc::ptr_eq(&one, &compiler.compile_sync("1", &en())));
    compiler.compile_sync("3", &en());

    let cache = compiler.cache();
    let key = en().normalize();
    assert!(!cache.contains("1", &key, CompilePath::Parsed));
    assert!(cache.contains("2", &key, CompilePath::Parsed));
    assert!(cache.contains("3", &key, CompilePath::Parsed));
    assert!(!Arc::ptr_eq(&one, &compiler.compile_sync("1", &en())));
}

proptest! {
    #[test]
    fn prop_counters_track_lookups(picks in proptest::collection::vec(0usize..4, 1..40)) {
        let sources = ["1", "2 + 2", "set x to 3", "5 +"];
        let compiler = Compiler::new();
        let mut seen = std::collections::HashSet::new();
        let mut expected_hits = 0u64;
        for &pick in &picks {
            let source = sources[pick];
            let ok = compiler.compile_sync(source, &en()).ok;
            if ok && !seen.insert(source) {
                expected_hits += 1;
            }
        }
        let stats = compiler.cache_stats();
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.hits + stats.misses, picks.len() as u64);
        prop_assert_eq!(stats.size, seen.len());
        prop_assert!(stats.hit_rate >= 0.0 && stats.hit_rate <= 1.0);
    }
}
