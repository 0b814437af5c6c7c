//! Command handlers for the `lokac` CLI.
//!
//! Each submodule implements one CLI command. Shared helpers (`read_file`,
//! option parsing, the blocking executor) live here in the module root.

mod check;
mod eval;
mod parse;

pub use check::{check_file, check_source, FragmentFailure};
pub use eval::eval_code;
pub use parse::parse_code;

use crate::CompileOptions;

/// Read a source file, exiting with a message if it cannot be read.
pub(super) fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}

/// Split `args` into positional arguments and compile options.
///
/// Recognizes `--lang=<code>`, `--threshold=<0..1>` and `--traditional`.
pub fn parse_compile_options(args: &[String]) -> (Vec<String>, CompileOptions) {
    let mut options = CompileOptions::new();
    let mut positional = Vec::new();
    for arg in args {
        if let Some(lang) = arg.strip_prefix("--lang=") {
            options = options.language(lang);
        } else if let Some(threshold) = arg.strip_prefix("--threshold=") {
            match threshold.parse::<f64>() {
                Ok(t) => options = options.confidence_threshold(t),
                Err(_) => eprintln!("warning: ignoring invalid threshold '{threshold}'"),
            }
        } else if arg == "--traditional" {
            options = options.traditional(true);
        } else {
            positional.push(arg.clone());
        }
    }
    (positional, options)
}
