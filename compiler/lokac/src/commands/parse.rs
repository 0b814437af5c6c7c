//! The `parse` command: print a compile result as JSON.

use futures::executor::block_on;

use crate::{CompileOptions, Compiler};

pub fn parse_code(code: &str, options: &CompileOptions) {
    let compiler = Compiler::new();
    let result = block_on(compiler.compile_async(code, options));
    match serde_json::to_string_pretty(&*result) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("error: cannot serialize compile result: {e}");
            std::process::exit(1);
        }
    }
    if !result.ok {
        std::process::exit(1);
    }
}
