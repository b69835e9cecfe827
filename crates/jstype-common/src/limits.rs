//! Centralized limits and thresholds for the type system.
//!
//! Template substitution has no depth or iteration limits: its cycle guards
//! bound the work by the size of the type graph. The constants here only
//! size inline buffers and control native stack growth.

/// Inline capacity for per-node child buffers (function parameters,
/// template arguments, union alternatives).
///
/// Buffers backed by `SmallVec<[TypeId; 8]>` hold up to 8 entries without
/// heap allocation. Almost every function signature and every templatized
/// type in real externs stays below that.
///
/// ```javascript
/// /** @type {function(string, number=, ...boolean): void} */ // 3 params
/// /** @type {!Map<string, !Array<number>>} */               // 2 args
/// ```
pub const TYPE_LIST_INLINE: usize = 8;

/// Stack space that must remain before a recursive step runs without growing
/// the stack first (128 KiB).
///
/// One substitution step (dispatch, guard, variant handler) uses a few
/// hundred bytes; the red zone leaves room for several hundred nested steps
/// between checks.
pub const STACK_RED_ZONE: usize = 128 * 1024;

/// Size of each additional stack segment allocated when the red zone is hit
/// (2 MiB).
pub const STACK_GROWTH_SIZE: usize = 2 * 1024 * 1024;
