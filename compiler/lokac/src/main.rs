//! LokaScript CLI
//!
//! Compile, check and run LokaScript fragments.

use lokac::commands::{check_file, eval_code, parse_code, parse_compile_options};

fn main() {
    lokac::init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];
    let (positional, options) = parse_compile_options(&args[2..]);

    match command.as_str() {
        "check" => {
            let Some(path) = positional.first() else {
                eprintln!("Usage: lokac check <file> [--lang=<code>] [--traditional]");
                std::process::exit(1);
            };
            check_file(path, &options);
        }
        "eval" => {
            if positional.is_empty() {
                eprintln!("Usage: lokac eval <code> [--lang=<code>]");
                eprintln!("Example: lokac eval \"(5 + 3) * 2 - 1\"");
                std::process::exit(1);
            }
            eval_code(&positional.join(" "), &options);
        }
        "parse" => {
            if positional.is_empty() {
                eprintln!("Usage: lokac parse <code> [--lang=<code>]");
                std::process::exit(1);
            }
            parse_code(&positional.join(" "), &options);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("lokac {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("LokaScript compiler");
    println!();
    println!("Usage: lokac <command> [options]");
    println!();
    println!("Commands:");
    println!("  check <file>         Compile every line of a file as a fragment");
    println!("  eval <code>          Compile and run a fragment, print its value");
    println!("  parse <code>         Print the compile result as JSON");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Options:");
    println!("  --lang=<code>        Source language (default: en)");
    println!("  --threshold=<0..1>   Minimum analyzer confidence (default: 0.5)");
    println!("  --traditional        Parser only: no analyzer, no grammar bridge");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=loka::log=info) to see tracing output.");
}
