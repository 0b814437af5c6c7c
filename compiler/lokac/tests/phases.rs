// Test code uses unwrap/expect for clarity - panics provide good test failure messages
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Phase-based front door and runtime tests.
//!
//! # Organization
//!
//! - `compile/` - Compile front door: cache identity, eviction, diagnostics,
//!   the multi-language path
//! - `eval/` - `Runtime`: eval targets, validation, event dispatch, lazy
//!   category loading
//! - `common/` - Shared test utilities
//!
//! # Running Phase Tests
//!
//! ```bash
//! cargo test -p lokac --test phases
//! cargo test -p lokac --test phases compile
//! ```

#[path = "phases/common/mod.rs"]
mod common;

#[path = "phases/compile/mod.rs"]
mod compile;

#[path = "phases/eval/mod.rs"]
mod eval;
