//! The compile front door.
//!
//! `Compiler` turns source text into a shared `CompileResult`:
//!
//! - `compile_sync` parses canonical (English) input, consulting the
//!   semantic analyzer unless `traditional` is set.
//! - `compile_async` routes other languages through the grammar bridge,
//!   taking its direct AST when it offers one and otherwise re-parsing the
//!   bridge's canonical fallback text.
//!
//! Both paths share one cache, but bridged results are tagged apart from
//! parsed ones so a fragment that also parses as English never shadows its
//! translation. Failures are reported in the result, never raised, and never cached.

use std::sync::Arc;
use std::time::Instant;

use loka_ir::Node;
use loka_parse::ParseError;
use serde::Serialize;
use tracing::{debug, warn};

use crate::analyzer::{CommandAnalyzer, SemanticAnalyzer};
use crate::bridge::{GrammarBridge, KeywordBridge};
use crate::cache::{CacheStats, CompileCache, CompilePath};
use crate::errors::FrontDoorError;
use crate::options::{CompileOptions, CompilerConfig, NormalizedOptions};

/// Which path produced a result.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    /// The parser alone.
    Traditional,
    /// The parser, with an accepted semantic analysis.
    Hybrid,
    /// A direct AST from the grammar bridge.
    Semantic,
}

impl ParserKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ParserKind::Traditional => "traditional",
            ParserKind::Hybrid => "hybrid",
            ParserKind::Semantic => "semantic",
        }
    }
}

/// One compile diagnostic. `line` and `column` are 1-based.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CompileError {
    pub message: String,
    pub line: u32,
    pub column: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl From<&ParseError> for CompileError {
    fn from(err: &ParseError) -> Self {
        CompileError {
            message: err.message.clone(),
            line: err.line.max(1),
            column: err.column.max(1),
            suggestion: err.suggestion.clone(),
        }
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at line {}, column {}", self.message, self.line, self.column)
    }
}

/// How a result was produced. Always populated, success or failure.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileMeta {
    pub parser: ParserKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// The language the caller asked for.
    pub language: String,
    pub time_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct_path: Option<bool>,
}

/// Outcome of one compile.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompileResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ast: Option<Arc<Node>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<CompileError>,
    pub meta: CompileMeta,
}

impl CompileResult {
    pub fn first_error(&self) -> Option<&CompileError> {
        self.errors.first()
    }

    /// The `"literal"`-style type name of the root node.
    pub fn root_type(&self) -> Option<&'static str> {
        self.ast.as_deref().map(Node::type_name)
    }
}

/// `{valid, errors?}` as returned by `validate`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidateResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<CompileError>,
}

/// Cached compiler with pluggable analyzer and bridge.
pub struct Compiler {
    cache: CompileCache,
    analyzer: Option<Arc<dyn SemanticAnalyzer>>,
    bridge: Arc<dyn GrammarBridge>,
}

impl Compiler {
    /// A compiler with the default cache size, the command analyzer and the
    /// keyword bridge.
    pub fn new() -> Self {
        Self::with_config(CompilerConfig::default())
    }

    pub fn with_config(config: CompilerConfig) -> Self {
        Compiler {
            cache: CompileCache::new(config.cache_capacity),
            analyzer: Some(Arc::new(CommandAnalyzer)),
            bridge: Arc::new(KeywordBridge::new()),
        }
    }

    /// Replace (or with `None`, disable) the semantic analyzer.
    #[must_use]
    pub fn analyzer(mut self, analyzer: Option<Arc<dyn SemanticAnalyzer>>) -> Self {
        self.analyzer = analyzer;
        self
    }

    #[must_use]
    pub fn bridge(mut self, bridge: Arc<dyn GrammarBridge>) -> Self {
        self.bridge = bridge;
        self
    }

    pub fn cache(&self) -> &CompileCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Compile `source` on the synchronous path.
    ///
    /// Identical `(source, options)` pairs return the same `Arc` for as long
    /// as the entry stays cached.
    pub fn compile_sync(&self, source: &str, options: &CompileOptions) -> Arc<CompileResult> {
        let options = options.normalize();
        if let Some(cached) = self.cache.get(source, &options, CompilePath::Parsed) {
            return cached;
        }
        let result = self.parse_fresh(source, &options, Instant::now());
        self.cache
            .insert(source, &options, CompilePath::Parsed, Arc::new(result))
    }

    /// `compile_sync` for input that arrives as a JSON value.
    ///
    /// Anything but a string is a type error, raised before any lookup.
    pub fn compile_json(
        &self,
        input: &serde_json::Value,
        options: &CompileOptions,
    ) -> Result<Arc<CompileResult>, FrontDoorError> {
        let serde_json::Value::String(source) = input else {
            return Err(FrontDoorError::NotText {
                found: json_type_name(input),
            });
        };
        Ok(self.compile_sync(source, options))
    }

    /// Compile `source`, translating non-canonical languages first.
    ///
    /// English or `traditional` input is exactly `compile_sync`. Otherwise
    /// the grammar bridge is asked; a direct AST is returned as a
    /// `semantic` result, and anything else falls back to parsing the
    /// bridge's canonical text (or the original text if it has none). The
    /// result is cached under the original source on the bridged path, and its
    /// `meta.language` is the language that was asked for.
    pub async fn compile_async(&self, source: &str, options: &CompileOptions) -> Arc<CompileResult> {
        let normalized = options.normalize();
        if normalized.is_canonical() {
            return self.compile_sync(source, options);
        }
        if let Some(cached) = self.cache.get(source, &normalized, CompilePath::Bridged) {
            return cached;
        }

        let start = Instant::now();
        let language = normalized.language();
        let result = match self.bridge.translate(source, language).await {
            Ok(output) if output.used_direct_path && output.ast.is_some() => {
                debug!(language, confidence = output.confidence, "direct path");
                CompileResult {
                    ok: true,
                    ast: output.ast.map(Arc::new),
                    errors: Vec::new(),
                    meta: CompileMeta {
                        parser: ParserKind::Semantic,
                        confidence: Some(output.confidence),
                        language: language.to_string(),
                        time_ms: elapsed_ms(start),
                        direct_path: Some(true),
                    },
                }
            }
            Ok(output) => {
                let text = output.fallback_text.as_deref().unwrap_or(source);
                debug!(language, confidence = output.confidence, "bridge fallback");
                let mut result = self.parse_fresh(text, &normalized, start);
                result.meta.direct_path = Some(false);
                result.meta.confidence.get_or_insert(output.confidence);
                result
            }
            Err(err) => {
                warn!(language, error = %err, "grammar bridge declined, parsing source as-is");
                let mut result = self.parse_fresh(source, &normalized, start);
                result.meta.direct_path = Some(false);
                result
            }
        };
        self.cache
            .insert(source, &normalized, CompilePath::Bridged, Arc::new(result))
    }

    /// Compile and report only validity.
    pub async fn validate(&self, source: &str, options: &CompileOptions) -> ValidateResult {
        let result = self.compile_async(source, options).await;
        ValidateResult {
            valid: result.ok,
            errors: result.errors.clone(),
        }
    }

    /// Parse without touching the cache.
    fn parse_fresh(&self, source: &str, options: &NormalizedOptions, start: Instant) -> CompileResult {
        let output = loka_parse::parse(source);
        let language = options.language().to_string();

        let (parser, confidence) = match (&self.analyzer, options.traditional()) {
            (Some(analyzer), false) if output.success() => {
                match analyzer.analyze(source, options.language()) {
                    Some(analysis) if analysis.confidence >= options.confidence_threshold() => {
                        (ParserKind::Hybrid, Some(analysis.confidence))
                    }
                    _ => (ParserKind::Traditional, None),
                }
            }
            _ => (ParserKind::Traditional, None),
        };

        let ok = output.success();
        if !ok {
            if let Some(err) = output.first_error() {
                debug!(error = %err, "compile failed");
            }
        }
        CompileResult {
            ok,
            ast: output.node.map(Arc::new),
            errors: output.errors.iter().map(CompileError::from).collect(),
            meta: CompileMeta {
                parser,
                confidence,
                language,
                time_ms: elapsed_ms(start),
                direct_path: None,
            },
        }
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compiler")
            .field("cache", &self.cache)
            .field("analyzer", &self.analyzer.is_some())
            .finish_non_exhaustive()
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
