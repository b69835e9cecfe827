//! Stack safety for deep recursion.
//!
//! Type graphs coming out of large extern files can nest thousands of levels
//! deep without ever forming a cycle (long record chains, deeply nested
//! unions). Recursive visitors wrap each step in [`ensure_sufficient_stack`]
//! so they grow the stack on demand instead of overflowing it.

use crate::limits::{STACK_GROWTH_SIZE, STACK_RED_ZONE};

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH_SIZE, f)
}

/// WASM manages its own stack; call straight through.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
#[path = "../tests/stack_tests.rs"]
mod tests;
