//! SynchronizedSet: an OrderedMapSet owned by a reader/writer lock.
//!
//! Every public method takes the lock exactly once and delegates to the
//! inner set. Mutations (`add`, `remove`, `reset`, ...) hold the write lock
//! for the whole call, so a multi-element batch is applied atomically and
//! `reset` snapshots and clears in one critical section. Queries (`contains`,
//! `slice`, ...) share the read lock. No method calls another locking method
//! while the lock is held.
//!
//! Poisoning: a poisoned lock can only come from a panicking user
//! `Hash`/`Eq`/`Ord`/`Clone` impl. The backing map stays structurally valid
//! across such a panic, so the guard is recovered and the call proceeds.

use crate::ordered_map_set::OrderedMapSet;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe ordered set. Share it with `Arc<SynchronizedSet<T>>`; all
/// methods take `&self`.
pub struct SynchronizedSet<T, S = RandomState> {
    inner: RwLock<OrderedMapSet<T, S>>,
}

impl<T> SynchronizedSet<T>
where
    T: Ord + Hash,
{
    pub fn new() -> Self {
        Self::from_set(OrderedMapSet::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_set(OrderedMapSet::with_capacity(capacity))
    }
}

impl<T> Default for SynchronizedSet<T>
where
    T: Ord + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> SynchronizedSet<T, S> {
    fn from_set(set: OrderedMapSet<T, S>) -> Self {
        Self {
            inner: RwLock::new(set),
        }
    }

    fn read(&self, op: &'static str) -> RwLockReadGuard<'_, OrderedMapSet<T, S>> {
        self.inner.read().unwrap_or_else(|poisoned| {
            tracing::warn!(op, "recovering poisoned set lock");
            PoisonError::into_inner(poisoned)
        })
    }

    fn write(&self, op: &'static str) -> RwLockWriteGuard<'_, OrderedMapSet<T, S>> {
        self.inner.write().unwrap_or_else(|poisoned| {
            tracing::warn!(op, "recovering poisoned set lock");
            PoisonError::into_inner(poisoned)
        })
    }

    /// Unwrap the inner set. Needs unique ownership, so no lock is held.
    pub fn into_inner(self) -> OrderedMapSet<T, S> {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T, S> SynchronizedSet<T, S>
where
    T: Ord + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_set(OrderedMapSet::with_hasher(hasher))
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self::from_set(OrderedMapSet::with_capacity_and_hasher(capacity, hasher))
    }

    pub fn len(&self) -> usize {
        self.read("len").len()
    }
    pub fn is_empty(&self) -> bool {
        self.read("is_empty").is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.read("capacity").capacity()
    }

    pub fn reserve(&self, additional: usize) {
        self.write("reserve").reserve(additional);
    }

    pub fn insert(&self, element: T) -> bool {
        self.write("insert").insert(element)
    }

    pub fn remove_one<Q>(&self, q: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.write("remove_one").remove_one(q)
    }

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.read("contains").contains(q)
    }

    /// Insert all elements under a single write-lock hold.
    pub fn add(&self, elements: &[T])
    where
        T: Clone,
    {
        self.write("add").add(elements);
    }

    /// Remove all elements under a single write-lock hold.
    pub fn remove(&self, elements: &[T]) {
        self.write("remove").remove(elements);
    }

    pub fn slice(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.read("slice").slice()
    }

    /// Snapshot and clear in one critical section.
    pub fn reset(&self) -> Vec<T> {
        self.write("reset").reset()
    }
}

impl<T, S> From<OrderedMapSet<T, S>> for SynchronizedSet<T, S> {
    fn from(set: OrderedMapSet<T, S>) -> Self {
        Self::from_set(set)
    }
}

impl<T, S> FromIterator<T> for SynchronizedSet<T, S>
where
    T: Ord + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_set(iter.into_iter().collect())
    }
}

impl<T, S> fmt::Debug for SynchronizedSet<T, S>
where
    T: fmt::Debug + Ord,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.read("fmt");
        f.debug_tuple("SynchronizedSet").field(&*guard).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    /// Invariant: single-threaded behaviour matches the unsynchronized set.
    #[test]
    fn mirrors_ordered_map_set() {
        let s = SynchronizedSet::new();
        let mut plain = OrderedMapSet::new();
        for batch in [&[4, 2, 9][..], &[2, 2, 7][..], &[][..]] {
            s.add(batch);
            plain.add(batch);
            assert_eq!(s.slice(), plain.slice());
        }
        s.remove(&[9, 100]);
        plain.remove(&[9, 100]);
        assert_eq!(s.slice(), plain.slice());
        assert_eq!(s.reset(), plain.reset());
        assert!(s.is_empty());
    }

    /// Invariant: a reader never observes half of a concurrent batch add.
    #[test]
    fn batch_add_is_atomic() {
        let s = Arc::new(SynchronizedSet::new());
        let batch: Vec<u32> = (0..256).collect();
        let writer = {
            let s = Arc::clone(&s);
            let batch = batch.clone();
            thread::spawn(move || {
                for _ in 0..50 {
                    s.add(&batch);
                    s.remove(&batch);
                }
            })
        };
        for _ in 0..200 {
            let n = s.slice().len();
            assert!(n == 0 || n == batch.len(), "observed partial batch of {}", n);
        }
        writer.join().unwrap();
        assert!(s.is_empty());
    }

    /// Invariant: concurrent resets partition the elements; nothing is seen twice.
    #[test]
    fn concurrent_reset_never_duplicates() {
        let s = SynchronizedSet::new();
        let total = 2_000u32;
        let drained: Vec<Vec<u32>> = thread::scope(|scope| {
            let s = &s;
            scope.spawn(move || {
                for i in 0..total {
                    s.insert(i);
                }
            });
            let resetters: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(move || (0..50).flat_map(|_| s.reset()).collect::<Vec<u32>>())
                })
                .collect();
            resetters.into_iter().map(|h| h.join().unwrap()).collect()
        });
        let mut all: Vec<u32> = drained.into_iter().flatten().collect();
        all.extend(s.reset());
        all.sort_unstable();
        assert_eq!(all, (0..total).collect::<Vec<_>>());
    }

    /// Invariant: a poisoned lock is recovered rather than propagated.
    #[test]
    fn poisoned_lock_is_recovered() {
        let s = SynchronizedSet::new();
        s.add(&[1, 2, 3]);
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _g = s.inner.write().unwrap();
            panic!("poison the lock");
        }));
        assert!(res.is_err());
        assert!(s.inner.is_poisoned());
        assert!(s.contains(&2));
        s.add(&[4]);
        assert_eq!(s.reset(), vec![1, 2, 3, 4]);
        assert!(s.into_inner().is_empty());
    }

    /// Invariant: conversions keep the members.
    #[test]
    fn from_and_into_inner() {
        let plain: OrderedMapSet<&str> = ["b", "a"].into_iter().collect();
        let s = SynchronizedSet::from(plain.clone());
        assert!(s.contains("a"));
        assert_eq!(format!("{:?}", s), "SynchronizedSet({\"a\", \"b\"})");
        assert_eq!(s.into_inner(), plain);
    }
}
