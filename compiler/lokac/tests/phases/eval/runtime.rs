//! `Runtime::eval` and `Runtime::execute`.

use futures::executor::block_on;
use loka_eval::{Element, EvalErrorKind, ExecutionContext, Value};
use lokac::{CompileOptions, EvalTarget, Runtime, RuntimeError};
use pretty_assertions::assert_eq;

use crate::common::{en, eval, eval_err, eval_in};

#[test]
fn test_arithmetic() {
    assert_eq!(eval("5 + 3"), Value::from(8.0));
    assert_eq!(eval("(5 + 3) * 2 - 1"), Value::from(15.0));
}

#[test]
fn test_context_persists_between_evals() {
    let runtime = Runtime::new();
    let mut ctx = ExecutionContext::default();
    eval_in(&runtime, &mut ctx, "x = 42");
    assert_eq!(eval_in(&runtime, &mut ctx, "x + 8"), Value::from(50.0));
}

#[test]
fn test_fresh_targets_do_not_share_locals() {
    let runtime = Runtime::new();
    block_on(runtime.eval("set y to 1", EvalTarget::Fresh, &en())).unwrap();
    let y = block_on(runtime.eval("y", EvalTarget::Fresh, &en())).unwrap();
    // An unresolved identifier evaluates to its own name.
    assert_eq!(y, Value::from("y"));
}

#[test]
fn test_element_target_binds_me() {
    let runtime = Runtime::new();
    let button = Element::new("button").with_id("go");
    let id = block_on(runtime.eval("add .busy then my id", button.clone().into(), &en())).unwrap();
    assert_eq!(id, Value::from("go"));
    assert!(button.has_class("busy"));
}

#[test]
fn test_compile_failure_is_reported() {
    let err = block_on(Runtime::new().eval("5 +", EvalTarget::Fresh, &en())).unwrap_err();
    assert!(matches!(err, RuntimeError::Compilation(_)));
    assert_eq!(err.to_string(), "Compilation failed: Expected expression");
}

#[test]
fn test_runtime_errors_propagate() {
    let err = eval_err("nope(1)");
    assert!(matches!(err.kind, EvalErrorKind::UndefinedFunction { .. }));
    let err = eval_err("throw 'stop'");
    assert_eq!(err.thrown, Some(Value::from("stop")));
}

#[test]
fn test_signals_never_escape_the_program() {
    assert_eq!(eval("return 5"), Value::from(5.0));
    assert_eq!(eval("set a to 1 then halt then set a to 2"), Value::Undefined);
    assert_eq!(eval("break"), Value::Undefined);
}

#[test]
fn test_execute_a_compiled_program() {
    let runtime = Runtime::new();
    let compiled = runtime.compile("def sq(n) return n * n end\nsq(7)", &en());
    assert!(compiled.ok);
    let ast = compiled.ast.clone().unwrap();
    let mut ctx = ExecutionContext::default();
    assert_eq!(block_on(runtime.execute(&ast, &mut ctx)).unwrap(), Value::from(49.0));
    // The same tree runs again unchanged.
    let mut other = ExecutionContext::default();
    assert_eq!(block_on(runtime.execute(&ast, &mut other)).unwrap(), Value::from(49.0));
}

#[test]
fn test_eval_uses_the_cache() {
    let runtime = Runtime::new();
    for _ in 0..3 {
        block_on(runtime.eval("1 + 1", EvalTarget::Fresh, &en())).unwrap();
    }
    let stats = runtime.cache_stats();
    assert_eq!((stats.hits, stats.misses), (2, 1));
    runtime.clear_cache();
    assert_eq!(runtime.cache_stats().size, 0);
}

#[test]
fn test_spanish_source() {
    let runtime = Runtime::new();
    let options = CompileOptions::new().language("es");
    let value = block_on(runtime.eval(
        "establecer x a 5 entonces x * 2",
        EvalTarget::Fresh,
        &options,
    ))
    .unwrap();
    assert_eq!(value, Value::from(10.0));
}

#[test]
fn test_registered_functions_and_globals() {
    let runtime = Runtime::builder()
        .function("double", |args| {
            Ok(Value::Number(args.first().map_or(0.0, Value::to_number) * 2.0))
        })
        .host_global("limit", Value::from(10.0))
        .build();
    let value = block_on(runtime.eval("double(limit) + 1", EvalTarget::Fresh, &en())).unwrap();
    assert_eq!(value, Value::from(21.0));
}

#[test]
fn test_document_backs_selectors() {
    let root = Element::new("main");
    root.append_child(&Element::new("p").with_class("note"));
    root.append_child(&Element::new("p").with_class("note"));
    let runtime = Runtime::builder().document(root).build();
    assert_eq!(
        block_on(runtime.eval("set n to .note\nn.length", EvalTarget::Fresh, &en())).unwrap(),
        Value::from(2.0)
    );
}

#[test]
fn test_sync_compile_does_not_shadow_translation() {
    let es = CompileOptions::new().language("es");
    let runtime = Runtime::new();
    runtime.compile("falso", &es);
    let value = block_on(runtime.eval("falso", EvalTarget::Fresh, &es)).unwrap();
    assert_eq!(value, Value::from(false));
}

#[test]
fn test_deeply_nested_source_fails_to_compile() {
    let runtime = Runtime::new();
    let deep = format!("{}1{}", "(".repeat(20_000), ")".repeat(20_000));
    let compiled = runtime.compile(&deep, &en());
    assert!(!compiled.ok);
    assert_eq!(
        compiled.first_error().unwrap().message,
        "Expression is nested too deeply"
    );

    let err = block_on(runtime.eval(&deep, EvalTarget::Fresh, &en())).unwrap_err();
    assert!(matches!(err, RuntimeError::Compilation(_)));
}
