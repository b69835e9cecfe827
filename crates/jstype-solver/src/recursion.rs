//! Cycle detection for recursive traversals of the type graph.
//!
//! # Design
//!
//! `CycleGuard` is the visiting set shared by every recursive walk over
//! types: the template replacer, the formatter and the visitor queries.
//! Type graphs may be cyclic (records that reach themselves through a
//! property, proxies resolved to an enclosing type) and bindings may be
//! self-referential (`T` bound to `Array<T>`); a walk enters a key before
//! descending into it and leaves it afterwards, and a key that is already
//! entered is a cycle.
//!
//! There is no depth or iteration limit. The visiting set alone bounds the
//! walk by the size of the graph, and deep acyclic graphs are handled by
//! growing the stack (see `jstype_common::stack`).
//!
//! # Safety
//!
//! - **Debug leak detection**: In debug builds, dropping a guard with active
//!   entries panics, catching a forgotten `leave()`.
//! - **Debug double-leave detection**: In debug builds, leaving a key that
//!   is not in the visiting set panics.
//! - **Lazy allocation**: An empty `FxHashSet` does not allocate, so walks
//!   that never enter a key pay nothing.

use rustc_hash::FxHashSet;
use std::hash::Hash;

/// Result of trying to enter a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleResult {
    /// The key was entered; the caller must `leave` it.
    Entered,
    /// The key is already being visited.
    Cycle,
}

impl CycleResult {
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }

    #[inline]
    pub fn is_cycle(self) -> bool {
        matches!(self, Self::Cycle)
    }
}

/// Identity set of the keys currently being visited.
///
/// ```ignore
/// let mut guard = CycleGuard::new();
/// match guard.enter(type_id) {
///     CycleResult::Entered => {
///         let result = walk_children(type_id);
///         guard.leave(type_id);
///         result
///     }
///     CycleResult::Cycle => type_id,
/// }
/// ```
pub struct CycleGuard<K: Hash + Eq + Copy> {
    visiting: FxHashSet<K>,
    max_depth_reached: usize,
}

impl<K: Hash + Eq + Copy> CycleGuard<K> {
    pub fn new() -> Self {
        Self {
            visiting: FxHashSet::default(),
            max_depth_reached: 0,
        }
    }

    /// Enter `key`, or report that it is already being visited.
    pub fn enter(&mut self, key: K) -> CycleResult {
        if !self.visiting.insert(key) {
            return CycleResult::Cycle;
        }
        self.max_depth_reached = self.max_depth_reached.max(self.visiting.len());
        CycleResult::Entered
    }

    /// Leave `key`. Must follow exactly one successful [`enter`](Self::enter).
    pub fn leave(&mut self, key: K) {
        let was_present = self.visiting.remove(&key);

        debug_assert!(
            was_present,
            "CycleGuard::leave() called with a key that is not being visited. \
             This indicates a double-leave or a leave without a matching enter()."
        );
    }

    /// Run `f` with `key` entered. Returns `None` on a cycle.
    ///
    /// Use this when `f` does not need the guard itself; walks that keep
    /// the guard in `self` call `enter`/`leave` directly.
    pub fn scope<T>(&mut self, key: K, f: impl FnOnce() -> T) -> Option<T> {
        match self.enter(key) {
            CycleResult::Entered => {
                let result = f();
                self.leave(key);
                Some(result)
            }
            CycleResult::Cycle => None,
        }
    }

    #[inline]
    pub fn is_visiting(&self, key: &K) -> bool {
        self.visiting.contains(key)
    }

    /// Number of keys currently entered.
    #[inline]
    pub fn depth(&self) -> usize {
        self.visiting.len()
    }

    /// Deepest nesting seen since construction or the last reset.
    #[inline]
    pub fn max_depth_reached(&self) -> usize {
        self.max_depth_reached
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        !self.visiting.is_empty()
    }

    /// Forget all state, as if freshly constructed.
    pub fn reset(&mut self) {
        self.visiting.clear();
        self.max_depth_reached = 0;
    }
}

impl<K: Hash + Eq + Copy> Default for CycleGuard<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(debug_assertions)]
impl<K: Hash + Eq + Copy> Drop for CycleGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.visiting.is_empty() {
            panic!(
                "CycleGuard dropped with {} keys still being visited. \
                 This indicates enter() calls without matching leave() calls.",
                self.visiting.len(),
            );
        }
    }
}

#[cfg(test)]
#[path = "../tests/recursion_tests.rs"]
mod tests;
