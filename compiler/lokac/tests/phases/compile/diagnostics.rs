//! Compile results, errors and metadata.

use futures::executor::block_on;
use lokac::{CompileOptions, Compiler, FrontDoorError, ParserKind};
use pretty_assertions::assert_eq;

use crate::common::{compile_ok, en};

#[test]
fn test_number_compiles_to_a_literal() {
    let result = compile_ok("42");
    assert_eq!(result.root_type(), Some("literal"));
    assert!(result.errors.is_empty());
    assert_eq!(result.meta.language, "en");
}

#[test]
fn test_incomplete_expression_reports_location() {
    let result = Compiler::new().compile_sync("5 +", &en());
    assert!(!result.ok);
    assert!(result.ast.is_none());
    let error = result.first_error().unwrap();
    assert!(error.message.contains("Expected expression"), "{}", error.message);
    assert!(error.line >= 1);
    assert!(error.column >= 1);
    // Metadata is filled in on failure too.
    assert_eq!(result.meta.parser, ParserKind::Traditional);
    assert_eq!(result.meta.language, "en");
    assert!(result.meta.time_ms >= 0.0);
}

#[test]
fn test_error_on_a_later_line() {
    let result = Compiler::new().compile_sync("set x to 1\nset y to", &en());
    let error = result.first_error().unwrap();
    assert_eq!(error.line, 2);
}

#[test]
fn test_analyzer_marks_commands_as_hybrid() {
    let compiler = Compiler::new();
    let command = compiler.compile_sync("set x to 1", &en());
    assert_eq!(command.meta.parser, ParserKind::Hybrid);
    assert_eq!(command.meta.confidence, Some(0.9));

    let expression = compiler.compile_sync("1 + 2", &en());
    assert_eq!(expression.meta.parser, ParserKind::Traditional);
    assert_eq!(expression.meta.confidence, None);
}

#[test]
fn test_threshold_and_traditional_bypass_the_analyzer() {
    let compiler = Compiler::new();
    let strict = compiler.compile_sync("set x to 1", &en().confidence_threshold(0.95));
    assert_eq!(strict.meta.parser, ParserKind::Traditional);
    let traditional = compiler.compile_sync("set x to 1", &en().traditional(true));
    assert_eq!(traditional.meta.parser, ParserKind::Traditional);
    let without = Compiler::new()
        .analyzer(None)
        .compile_sync("set x to 1", &en());
    assert_eq!(without.meta.parser, ParserKind::Traditional);
}

#[test]
fn test_non_text_input_is_a_type_error() {
    let compiler = Compiler::new();
    let err = compiler
        .compile_json(&serde_json::json!(42), &en())
        .unwrap_err();
    assert_eq!(err, FrontDoorError::NotText { found: "number" });
    assert_eq!(err.to_string(), "compile input must be a string, found number");
    assert_eq!(compiler.cache_stats().misses, 0);

    let ok = compiler
        .compile_json(&serde_json::json!("1 + 1"), &en())
        .unwrap();
    assert!(ok.ok);
}

#[test]
fn test_result_serializes_to_json() {
    let result = Compiler::new().compile_sync("5 +", &en());
    let json = serde_json::to_value(&*result).unwrap();
    assert_eq!(json["ok"], serde_json::json!(false));
    assert_eq!(json["meta"]["parser"], serde_json::json!("traditional"));
    assert_eq!(json["meta"]["language"], serde_json::json!("en"));
    assert!(json.get("ast").is_none());
    assert!(json["errors"][0]["message"]
        .as_str()
        .unwrap()
        .contains("Expected expression"));
    assert!(json["meta"].get("timeMs").is_some());
}

#[test]
fn test_check_reports_each_failing_fragment() {
    use lokac::commands::check_source;

    let source = "-- behaviors\nset x to 1\n\n  add .on to\nlog 'ok'\n5 +\n";
    let (checked, failures) = block_on(check_source(&Compiler::new(), source, &en()));
    assert_eq!(checked, 4);
    assert_eq!(failures.len(), 2);

    let first = &failures[0];
    assert_eq!(first.line, 4);
    // Indentation is added back to the fragment's column.
    assert_eq!(first.column, 13);
    assert_eq!(first.snippet(), "  add .on to\n            ^");

    assert_eq!(failures[1].line, 6);
    assert_eq!(failures[1].error.message, "Expected expression");
}

#[test]
fn test_check_uses_the_requested_language() {
    use lokac::commands::check_source;

    let compiler = Compiler::new();
    let source = "establecer x a 5\nsi verdadero entonces registrar 1 fin\nestablecer y a\n";
    let es = CompileOptions::new().language("es");
    let (checked, failures) = block_on(check_source(&compiler, source, &es));
    assert_eq!(checked, 3);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].line, 3);
    assert_eq!(failures[0].error.message, "Expected expression");

    // The same lines are not English.
    let (_, failures) = block_on(check_source(&compiler, source, &en()));
    assert_eq!(failures.len(), 3);
}
