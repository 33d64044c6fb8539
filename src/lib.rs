//! ordered-map-set: a hash-backed set of naturally ordered elements that
//! hands out sorted snapshots, plus a reader/writer-locked variant for use
//! across threads.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: one small set contract, two implementations composed by
//!   delegation, chosen once at construction.
//! - Layers:
//!   - OrderedMapSet<T, S>: unsynchronized presence map (`T -> ()`) over
//!     `hashbrown`. Expected O(1) add/remove/contains; `slice`/`reset`
//!     sort on demand in O(n log n).
//!   - SynchronizedSet<T, S>: exclusively owns one OrderedMapSet behind a
//!     `std::sync::RwLock`. Writes take the write lock, queries share the
//!     read lock, one acquisition per call.
//!   - Set<T>: object-safe trait both implement; `new_set` returns a
//!     `Box<dyn Set<T>>` and never exposes the concrete variant.
//!
//! Constraints
//! - `T: Ord + Hash + Clone`. Order comes from `Ord` only; the hasher never
//!   influences snapshot order.
//! - Snapshots are owned `Vec<T>`s; no accessor leaks a reference into
//!   storage, so nothing can observe the map while it is being mutated.
//! - Multi-element `add`/`remove` on SynchronizedSet is one critical
//!   section, as is `reset` (snapshot then clear).
//! - No operation fails. Duplicate adds, removing absent elements and
//!   querying an empty set are silent no-ops.
//!
//! Logging
//! - Events go through `tracing`; the crate never installs a subscriber.
//!   Poisoned-lock recovery logs at `warn`, resets and factory construction
//!   at `trace`. Hot paths do not log.
//!
//! Notes and non-goals
//! - No custom comparators, no persistence, no iteration while mutating
//!   beyond snapshotting.
//! - Primitive floats are not `Ord`; wrap them in a totally ordered newtype.

pub mod ordered_map_set;
mod ordered_map_set_proptest;
mod set;
pub mod synchronized_set;

// Public surface
pub use ordered_map_set::OrderedMapSet;
pub use set::{new_set, Set};
pub use synchronized_set::SynchronizedSet;
