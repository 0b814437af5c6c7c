//! Parser tests.
//!
//! - `parser`: literals, expressions, operators and error reporting
//! - `commands`: commands, blocks and features

mod parser;
