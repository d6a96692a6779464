//! dense-hashmap: open-addressing hash sets and maps with sentinel slots
//! and heterogeneous key lookup.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: look keys up by any type that hashes and compares like the key
//!   without ever building the key, and build it at most once on insert.
//! - Layers:
//!   - RawTable<T>: flat slot vector (Empty / Deleted / Occupied), quadratic
//!     probing over a power-of-two capacity, tombstones, grow/shrink.
//!   - KeyHash / KeyEq: hash and equality policies over a set of
//!     key-equivalent types (the key equivalence set).
//!   - KeyArg: per-argument-type construction plan (PassThrough, Direct,
//!     ViaExtractor) selected at compile time.
//!   - DenseTable: binds the above with the empty/deleted sentinel keys;
//!     shared by the set and map adaptors.
//!   - DenseHashSet / DenseHashMap: public containers with explicit
//!     sentinel configuration.
//!   - WrappedDenseHashSet / WrappedDenseHashMap: same surface, sentinels
//!     derived internally so the containers are ready on construction.
//!
//! Constraints
//! - Single-threaded; every mutation takes `&mut self`.
//! - `set_empty_key` before any lookup or insertion and `set_deleted_key`
//!   before any erase, on the explicit containers. Violations panic.
//! - Sentinel keys are never stored as live keys.
//! - Lookups (`find`, `count`, `erase`, `equal_range`, `at`) construct no
//!   key; inserting operations construct one only after a probe misses.
//!
//! Hasher and rehashing invariants
//! - Each occupied slot stores the hash it was inserted with and rehashing
//!   always reuses it; the hash policy is never called on a stored key.
//! - Hash/equality agreement across the key equivalence set is a caller
//!   contract: if `key_eq(q, k)` then `hash_key(q) == hash_key(k)`.
//!
//! Handles
//! - `find` and `emplace` return a `Handle` naming a slot. Handles are
//!   invalidated by any rehash (growth, shrink, `reserve`, `clear`) and
//!   then resolve to `None`.
//!
//! ```
//! use dense_hashmap::DenseHashMap;
//!
//! let mut m: DenseHashMap<String, u32> = DenseHashMap::new();
//! m.set_empty_key("<empty>".to_string());
//! m.set_deleted_key("<deleted>".to_string());
//!
//! // &str probes a String-keyed map; the String is built once, on insert.
//! assert!(m.emplace("Hello", 1).1);
//! assert_eq!(m.count("Hello"), 1);
//! assert_eq!(*m.get_or_insert_default("missing"), 0);
//! assert_eq!(m.erase("Hello"), 1);
//! assert_eq!(m.len(), 1);
//! ```

pub mod dense_hash_map;
pub mod dense_hash_set;
mod dense_table;
mod equivalence;
mod error;
mod materialize;
mod raw_table;
mod sentinel;
mod settings;
pub mod wrapped;

#[cfg(test)]
mod dense_hash_map_proptest;

pub use dense_hash_map::DenseHashMap;
pub use dense_hash_set::DenseHashSet;
pub use dense_table::{EqualRange, Handle};
pub use equivalence::{DefaultEq, DefaultHash, KeyEq, KeyHash};
pub use equivalent::Equivalent;
pub use error::{Error, Result};
pub use materialize::{ConstructionPlan, Extract, KeyArg, NoExtractor};
pub use settings::Settings;
pub use wrapped::{WrappedDenseHashMap, WrappedDenseHashSet};
