//! String interning for property names and type names.
//!
//! Record properties, nominal type names and template type names are all
//! compared constantly during substitution. Interning them turns every such
//! comparison into a `u32` comparison and stores each distinct name once.

use rustc_hash::{FxHashMap, FxHasher};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

/// An interned string handle.
///
/// Cheap to copy and compare. Resolve it with [`ShardedInterner::resolve`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Atom(pub u32);

impl Atom {
    /// The empty string.
    pub const NONE: Atom = Atom(0);

    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

const SHARD_BITS: u32 = 4;
const SHARD_COUNT: usize = 1 << SHARD_BITS;
const SHARD_MASK: u32 = (SHARD_COUNT as u32) - 1;

/// Names that show up in almost every program's externs.
const COMMON_NAMES: &[&str] = &[
    "Object",
    "Function",
    "Array",
    "IArrayLike",
    "Iterable",
    "Iterator",
    "Promise",
    "IThenable",
    "Map",
    "Set",
    "String",
    "Number",
    "Boolean",
    "Symbol",
    "RegExp",
    "Date",
    "Error",
    "T",
    "U",
    "V",
    "K",
    "KEY",
    "VALUE",
    "TYPE",
    "this",
    "length",
    "prototype",
    "constructor",
    "value",
    "next",
    "done",
    "then",
];

#[derive(Default)]
struct ShardState {
    map: FxHashMap<Arc<str>, Atom>,
    strings: Vec<Arc<str>>,
}

/// Sharded string interner for concurrent use.
///
/// Each string hashes to one of a fixed set of shards, so interning from
/// several threads only contends when two names land in the same shard.
/// The shard index lives in the low bits of the returned [`Atom`].
pub struct ShardedInterner {
    shards: [RwLock<ShardState>; SHARD_COUNT],
}

impl ShardedInterner {
    /// Create an interner with the empty string pre-interned as [`Atom::NONE`].
    pub fn new() -> Self {
        let shards: [RwLock<ShardState>; SHARD_COUNT] =
            std::array::from_fn(|_| RwLock::new(ShardState::default()));

        if let Ok(mut state) = shards[0].write() {
            let empty: Arc<str> = Arc::from("");
            state.strings.push(empty.clone());
            state.map.insert(empty, Atom::NONE);
        }

        ShardedInterner { shards }
    }

    /// Intern `s`, returning the existing atom if it was seen before.
    pub fn intern(&self, s: &str) -> Atom {
        if s.is_empty() {
            return Atom::NONE;
        }

        let shard_idx = Self::shard_for(s);
        // A poisoned shard still holds consistent data: every write below
        // finishes both inserts before it can panic.
        let mut state = match self.shards[shard_idx].write() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(&atom) = state.map.get(s) {
            return atom;
        }

        let local_index = state.strings.len() as u32;
        if local_index > (u32::MAX >> SHARD_BITS) {
            return Atom::NONE;
        }

        let atom = Atom((local_index << SHARD_BITS) | (shard_idx as u32 & SHARD_MASK));
        let owned: Arc<str> = Arc::from(s);
        state.strings.push(owned.clone());
        state.map.insert(owned, atom);
        atom
    }

    /// Resolve an atom, or the empty string if it was never handed out.
    pub fn resolve(&self, atom: Atom) -> Arc<str> {
        self.try_resolve(atom).unwrap_or_else(|| Arc::from(""))
    }

    pub fn try_resolve(&self, atom: Atom) -> Option<Arc<str>> {
        let shard_idx = (atom.0 & SHARD_MASK) as usize;
        let local_index = (atom.0 >> SHARD_BITS) as usize;
        let state = match self.shards.get(shard_idx)?.read() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.strings.get(local_index).cloned()
    }

    /// Number of interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.read().map(|state| state.strings.len()).unwrap_or(0))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Pre-intern the names listed in `COMMON_NAMES`.
    pub fn intern_common(&self) {
        for name in COMMON_NAMES {
            self.intern(name);
        }
    }

    #[inline]
    fn shard_for(s: &str) -> usize {
        let mut hasher = FxHasher::default();
        s.hash(&mut hasher);
        (hasher.finish() as usize) & (SHARD_COUNT - 1)
    }
}

impl Default for ShardedInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShardedInterner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardedInterner")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/interner_tests.rs"]
mod tests;
