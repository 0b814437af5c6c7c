//! The `eval` command: compile and run one fragment, printing its value.

use crate::{CompileOptions, EvalTarget, Runtime};

pub fn eval_code(code: &str, options: &CompileOptions) {
    // `wait` needs a timer, so this runs on a tokio runtime.
    let executor = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(executor) => executor,
        Err(e) => {
            eprintln!("error: cannot start runtime: {e}");
            std::process::exit(1);
        }
    };

    let runtime = Runtime::new();
    match executor.block_on(runtime.eval(code, EvalTarget::Fresh, options)) {
        Ok(value) => println!("{value}"),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
