//! Common types and utilities for the jstype type system.
//!
//! This crate provides foundational types used across all jstype crates:
//! - String interning (`Atom`, `ShardedInterner`)
//! - Declaration-site metadata (`Span`, `PropertyDecl`)
//! - Capacity limits and stack-growth thresholds
//! - Stack safety for deep recursion (`ensure_sufficient_stack`)

// String interning for property and type names
pub mod interner;
pub use interner::{Atom, ShardedInterner};

// Span - Declaration-site tracking (byte offsets)
pub mod span;
pub use span::{PropertyDecl, Span};

// Centralized limits and thresholds
pub mod limits;

// Stack growth for recursive traversals
pub mod stack;
pub use stack::ensure_sufficient_stack;
