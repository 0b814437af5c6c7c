//! Stack growth for recursive descent and tree-walking evaluation.
//!
//! The parser recurses once per nesting level and evaluation polls one boxed
//! future per AST node, so both can run out of native stack on input that is
//! deep but well within the parser's nesting limit. `ensure_sufficient_stack`
//! moves the rest of the recursion onto a freshly allocated segment when the
//! current one runs low; `GrowOnPoll` does the same for every poll of a
//! future.
//!
//! On `wasm32` both are plain passthroughs.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Grow when less than this much stack remains (128 KiB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (1 MiB).
const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run `f`, first switching to a new stack segment if the current one is
/// nearly exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// A future whose every poll runs under `ensure_sufficient_stack`.
///
/// Nested boxed futures recurse on the native stack when polled, one level
/// per node, so this is the async counterpart of wrapping a recursive call.
#[derive(Debug)]
#[must_use = "futures do nothing unless polled"]
pub struct GrowOnPoll<F>(F);

/// Wrap `future` so that polling it never overflows the stack.
pub fn grow_on_poll<F: Future + Unpin>(future: F) -> GrowOnPoll<F> {
    GrowOnPoll(future)
}

impl<F: Future + Unpin> Future for GrowOnPoll<F> {
    type Output = F::Output;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<F::Output> {
        let inner = &mut self.0;
        ensure_sufficient_stack(|| Pin::new(inner).poll(cx))
    }
}
