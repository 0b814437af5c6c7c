//! lokac - the LokaScript compile front door and runtime.
//!
//! # Architecture
//!
//! ```text
//! source + CompileOptions
//!   -> Compiler (FIFO cache, analyzer, grammar bridge)   compile.rs, cache.rs
//!   -> Arc<CompileResult> { ok, ast, errors, meta }
//!   -> Runtime::execute -> loka_eval::Interpreter        runtime.rs
//!   -> Value | RuntimeError
//! ```
//!
//! `Runtime` is the usual entry point. `Compiler` can be used on its own
//! when only compile results are needed (validation, tooling).

mod analyzer;
mod bridge;
mod cache;
pub mod commands;
mod compile;
mod errors;
mod options;
mod runtime;

pub use analyzer::{Analysis, CommandAnalyzer, SemanticAnalyzer};
pub use bridge::{BridgeError, BridgeOutput, GrammarBridge, KeywordBridge};
pub use cache::{CacheStats, CompileCache, CompilePath};
pub use compile::{
    CompileError, CompileMeta, CompileResult, Compiler, ParserKind, ValidateResult,
};
pub use errors::{FrontDoorError, RuntimeError};
pub use options::{
    CompileOptions, CompilerConfig, NormalizedOptions, DEFAULT_CACHE_CAPACITY,
    DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_LANGUAGE,
};
pub use runtime::{EvalTarget, Runtime, RuntimeBuilder};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call more than once. Enable with `RUST_LOG=lokac=debug`,
/// `RUST_LOG=loka_eval=trace`, or `RUST_LOG=loka::log=info` for the output
/// of the `log` command.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true),
                )
                .with(filter)
                .init();
        }
    });
}
