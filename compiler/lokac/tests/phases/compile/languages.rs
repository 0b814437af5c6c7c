//! The asynchronous, multi-language path.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::executor::block_on;
use futures::future::{self, BoxFuture};
use futures::FutureExt;
use lokac::{
    BridgeError, BridgeOutput, CompileOptions, Compiler, GrammarBridge, ParserKind,
};
use pretty_assertions::assert_eq;

use crate::common::en;

fn es() -> CompileOptions {
    CompileOptions::new().language("es")
}

#[test]
fn test_english_delegates_to_the_sync_path() {
    let compiler = Compiler::new();
    let sync = compiler.compile_sync("42", &en());
    let delegated = block_on(compiler.compile_async("42", &en()));
    assert!(Arc::ptr_eq(&sync, &delegated));
    assert_eq!(delegated.meta.direct_path, None);
}

#[test]
fn test_traditional_skips_the_bridge() {
    let compiler = Compiler::new();
    let result = block_on(compiler.compile_async("42", &es().traditional(true)));
    assert!(result.ok);
    assert_eq!(result.meta.language, "es");
    assert_eq!(result.meta.direct_path, None);
    assert!(Arc::ptr_eq(
        &result,
        &compiler.compile_sync("42", &es().traditional(true))
    ));
}

#[test]
fn test_spanish_falls_back_to_canonical_text() {
    let compiler = Compiler::new();
    let result = block_on(compiler.compile_async("establecer x a 5", &es()));
    assert!(result.ok, "{:?}", result.errors);
    assert_eq!(result.root_type(), Some("setCommand"));
    assert_eq!(result.meta.language, "es");
    assert_eq!(result.meta.direct_path, Some(false));
    assert_eq!(result.meta.parser, ParserKind::Hybrid);

    let again = block_on(compiler.compile_async("establecer x a 5", &es()));
    assert!(Arc::ptr_eq(&result, &again));
    let stats = compiler.cache_stats();
    assert_eq!((stats.hits, stats.misses, stats.size), (1, 1, 1));
}

#[test]
fn test_sync_entry_does_not_shadow_the_translation() {
    let compiler = Compiler::new();
    let parsed = compiler.compile_sync("falso", &es());
    assert_eq!(parsed.root_type(), Some("identifier"));

    let bridged = block_on(compiler.compile_async("falso", &es()));
    assert!(!Arc::ptr_eq(&parsed, &bridged));
    assert_eq!(bridged.root_type(), Some("literal"));
    assert_eq!(bridged.meta.direct_path, Some(false));
    assert_eq!(compiler.cache_stats().size, 2);

    // Each path keeps hitting its own entry.
    assert!(Arc::ptr_eq(&parsed, &compiler.compile_sync("falso", &es())));
    assert!(Arc::ptr_eq(
        &bridged,
        &block_on(compiler.compile_async("falso", &es()))
    ));
}

#[test]
fn test_unknown_language_parses_the_original() {
    let compiler = Compiler::new();
    let result = block_on(compiler.compile_async("1 + 2", &en().language("ja")));
    assert!(result.ok);
    assert_eq!(result.meta.language, "ja");
    assert_eq!(result.meta.direct_path, Some(false));
}

#[test]
fn test_fallback_failure_is_reported_and_not_cached() {
    let compiler = Compiler::new();
    let result = block_on(compiler.compile_async("establecer x a", &es()));
    assert!(!result.ok);
    assert!(result.first_error().unwrap().message.contains("Expected expression"));
    assert_eq!(compiler.cache_stats().size, 0);
}

/// Compiles canonical text itself and reports it as a direct AST.
struct DirectBridge {
    calls: AtomicUsize,
}

impl GrammarBridge for DirectBridge {
    fn translate<'a>(
        &'a self,
        source: &'a str,
        _language: &'a str,
    ) -> BoxFuture<'a, Result<BridgeOutput, BridgeError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let output = loka_parse::parse(source);
        let result = match output.node {
            Some(ast) => Ok(BridgeOutput {
                ast: Some(ast),
                used_direct_path: true,
                confidence: 0.8,
                fallback_text: None,
            }),
            None => Err(BridgeError::Failed("no parse".to_string())),
        };
        future::ready(result).boxed()
    }
}

#[test]
fn test_direct_path_result() {
    let bridge = Arc::new(DirectBridge {
        calls: AtomicUsize::new(0),
    });
    let compiler = Compiler::new().bridge(bridge.clone());
    let options = en().language("xx");

    let result = block_on(compiler.compile_async("1 + 2", &options));
    assert!(result.ok);
    assert_eq!(result.meta.parser, ParserKind::Semantic);
    assert_eq!(result.meta.direct_path, Some(true));
    assert_eq!(result.meta.confidence, Some(0.8));
    assert_eq!(result.meta.language, "xx");
    assert_eq!(result.root_type(), Some("binaryExpression"));

    let again = block_on(compiler.compile_async("1 + 2", &options));
    assert!(Arc::ptr_eq(&result, &again));
    assert_eq!(bridge.calls.load(Ordering::SeqCst), 1);

    // The sync path parses as written and keeps its own entry.
    let parsed = compiler.compile_sync("1 + 2", &options);
    assert!(!Arc::ptr_eq(&result, &parsed));
    assert_eq!(parsed.meta.parser, ParserKind::Traditional);
    assert_eq!(bridge.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_declining_direct_bridge_falls_back_to_the_source() {
    let compiler = Compiler::new().bridge(Arc::new(DirectBridge {
        calls: AtomicUsize::new(0),
    }));
    let result = block_on(compiler.compile_async("5 +", &en().language("xx")));
    assert!(!result.ok);
    assert_eq!(result.meta.direct_path, Some(false));
    assert_eq!(result.meta.language, "xx");
}

#[test]
fn test_validate() {
    let compiler = Compiler::new();
    let valid = block_on(compiler.validate("set x to 1", &en()));
    assert!(valid.valid);
    assert!(valid.errors.is_empty());

    let invalid = block_on(compiler.validate("set x to", &en()));
    assert!(!invalid.valid);
    assert_eq!(invalid.errors.len(), 1);

    let spanish = block_on(compiler.validate("si verdadero entonces registrar 1 fin", &es()));
    assert!(spanish.valid, "{:?}", spanish.errors);
}
