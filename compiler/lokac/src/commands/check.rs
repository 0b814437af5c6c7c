//! The `check` command: compile every fragment in a file.
//!
//! Each non-empty line that is not a comment is an independent fragment, as
//! an attribute value would be. Fragments are validated in the requested
//! language, through the grammar bridge when it is not English. A failing
//! fragment is reported in full and checking continues with the next one.

use futures::executor::block_on;
use tracing::warn;

use super::read_file;
use crate::{CompileError, CompileOptions, Compiler};

/// A fragment that failed to compile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FragmentFailure {
    /// 1-based line of the fragment in the file.
    pub line: usize,
    /// The line as written.
    pub text: String,
    /// Column of the error within `text`, 1-based.
    pub column: usize,
    pub error: CompileError,
}

impl FragmentFailure {
    /// The offending line followed by a caret under the error column.
    pub fn snippet(&self) -> String {
        let pad = " ".repeat(self.column.saturating_sub(1));
        format!("{}\n{pad}^", self.text)
    }
}

/// Validate each fragment of `source`, returning the number checked and the
/// failures.
pub async fn check_source(
    compiler: &Compiler,
    source: &str,
    options: &CompileOptions,
) -> (usize, Vec<FragmentFailure>) {
    let mut checked = 0;
    let mut failures = Vec::new();
    for (index, text) in source.lines().enumerate() {
        let fragment = text.trim();
        if fragment.is_empty() || fragment.starts_with("--") || fragment.starts_with("//") {
            continue;
        }
        checked += 1;
        let result = compiler.validate(fragment, options).await;
        let Some(error) = result.errors.first() else {
            continue;
        };
        let indent = text.chars().count() - text.trim_start().chars().count();
        let failure = FragmentFailure {
            line: index + 1,
            text: text.to_string(),
            column: indent + error.column as usize,
            error: error.clone(),
        };
        warn!(line = failure.line, error = %error.message, "fragment failed to compile");
        failures.push(failure);
    }
    (checked, failures)
}

/// Check a file, printing every failure. Exits non-zero if any failed.
pub fn check_file(path: &str, options: &CompileOptions) {
    let content = read_file(path);
    let compiler = Compiler::new();
    let (checked, failures) = block_on(check_source(&compiler, &content, options));

    for failure in &failures {
        eprintln!(
            "{path}:{}:{}: error: {}",
            failure.line, failure.column, failure.error.message
        );
        eprintln!("{}", failure.snippet());
        if let Some(suggestion) = &failure.error.suggestion {
            eprintln!("  help: {suggestion}");
        }
        eprintln!();
    }

    if failures.is_empty() {
        println!("OK: {path} ({checked} fragments)");
    } else {
        eprintln!("{} of {checked} fragments failed in {path}", failures.len());
        std::process::exit(1);
    }
}
