//! Crate-level tests.
//!
//! - `operators_tests`, `unary_operators_tests`: operator semantics on values
//! - `interpreter_tests`: parsed programs run through the interpreter
//! - `dom_tests`: selectors, class commands and event handlers against a
//!   document

mod operators_tests;
