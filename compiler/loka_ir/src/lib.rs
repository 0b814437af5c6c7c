//! Loka IR - tokens, spans and AST types for the LokaScript compiler.
//!
//! This crate contains the data structures shared by every phase:
//! - `Span`/`Location`/`LineIndex` for source locations
//! - `Token`/`TokenList` for lexer output
//! - `Node`/`NodeKind` for the AST, plus the fieldless `NodeTag` used for dispatch
//! - `Category`, the static grouping of node tags into lazily loaded buckets
//!
//! AST nodes are plain owned trees. They are `Send + Sync` so a compiled
//! program can sit in a process-wide cache and be shared across evaluations.

mod ast;
mod category;
mod span;
mod token;

pub use ast::{
    AssignScope, BinaryOp, CommandArg, Literal, MemberProperty, Node, NodeKind, NodeTag,
    ObjectEntry, ObjectKey, RepeatKind, UnaryOp,
};
pub use category::{Category, UnknownCategory};
pub use span::{LineIndex, Location, Span};
pub use token::{Token, TokenKind, TokenList};
