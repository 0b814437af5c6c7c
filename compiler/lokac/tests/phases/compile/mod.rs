//! Compile front door tests.

mod cache;
mod diagnostics;
mod languages;
