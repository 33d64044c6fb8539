//! The `Set` capability and the factory that picks a variant.

use crate::ordered_map_set::OrderedMapSet;
use crate::synchronized_set::SynchronizedSet;
use core::hash::{BuildHasher, Hash};

/// Common contract of both set variants.
///
/// Object safe, so callers can hold a `Box<dyn Set<T>>` without knowing
/// which variant backs it. `slice` and `reset` always return owned,
/// ascending, duplicate-free vectors.
pub trait Set<T> {
    /// Insert each element; already-present elements are a no-op.
    fn add(&mut self, elements: &[T]);
    /// Remove each element that is present; absent elements are a no-op.
    fn remove(&mut self, elements: &[T]);
    fn contains(&self, element: &T) -> bool;
    /// Sorted copy of the current members.
    fn slice(&self) -> Vec<T>;
    /// What `slice` would have returned, after which the set is empty.
    fn reset(&mut self) -> Vec<T>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Whether this set guards its storage with a lock.
    fn is_synchronized(&self) -> bool;
}

/// Build an empty set. `None` or `false` gives the unsynchronized variant,
/// `true` the lock-guarded one. The choice is fixed for the set's lifetime.
pub fn new_set<T>(threadsafe: impl Into<Option<bool>>) -> Box<dyn Set<T> + Send + Sync>
where
    T: Ord + Hash + Clone + Send + Sync + 'static,
{
    let threadsafe = threadsafe.into().unwrap_or(false);
    tracing::trace!(threadsafe, "constructing set");
    if threadsafe {
        Box::new(SynchronizedSet::new())
    } else {
        Box::new(OrderedMapSet::new())
    }
}

impl<T, S> Set<T> for OrderedMapSet<T, S>
where
    T: Ord + Hash + Clone,
    S: BuildHasher,
{
    fn add(&mut self, elements: &[T]) {
        OrderedMapSet::add(self, elements)
    }
    fn remove(&mut self, elements: &[T]) {
        OrderedMapSet::remove(self, elements)
    }
    fn contains(&self, element: &T) -> bool {
        OrderedMapSet::contains(self, element)
    }
    fn slice(&self) -> Vec<T> {
        OrderedMapSet::slice(self)
    }
    fn reset(&mut self) -> Vec<T> {
        OrderedMapSet::reset(self)
    }
    fn len(&self) -> usize {
        OrderedMapSet::len(self)
    }
    fn is_synchronized(&self) -> bool {
        false
    }
}

impl<T, S> Set<T> for SynchronizedSet<T, S>
where
    T: Ord + Hash + Clone,
    S: BuildHasher,
{
    fn add(&mut self, elements: &[T]) {
        SynchronizedSet::add(self, elements)
    }
    fn remove(&mut self, elements: &[T]) {
        SynchronizedSet::remove(self, elements)
    }
    fn contains(&self, element: &T) -> bool {
        SynchronizedSet::contains(self, element)
    }
    fn slice(&self) -> Vec<T> {
        SynchronizedSet::slice(self)
    }
    fn reset(&mut self) -> Vec<T> {
        SynchronizedSet::reset(self)
    }
    fn len(&self) -> usize {
        SynchronizedSet::len(self)
    }
    fn is_synchronized(&self) -> bool {
        true
    }
}

// Shared references mutate through `&self` on the set, so the capability
// can be driven from every thread holding one (including via `&*arc`).
impl<T, S> Set<T> for &SynchronizedSet<T, S>
where
    T: Ord + Hash + Clone,
    S: BuildHasher,
{
    fn add(&mut self, elements: &[T]) {
        SynchronizedSet::add(*self, elements)
    }
    fn remove(&mut self, elements: &[T]) {
        SynchronizedSet::remove(*self, elements)
    }
    fn contains(&self, element: &T) -> bool {
        SynchronizedSet::contains(*self, element)
    }
    fn slice(&self) -> Vec<T> {
        SynchronizedSet::slice(*self)
    }
    fn reset(&mut self) -> Vec<T> {
        SynchronizedSet::reset(*self)
    }
    fn len(&self) -> usize {
        SynchronizedSet::len(*self)
    }
    fn is_synchronized(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn exercise(set: &mut dyn Set<i32>) {
        set.add(&[0, 1, 2, 3, 4]);
        assert_eq!(set.slice(), vec![0, 1, 2, 3, 4]);
        set.add(&[0, 1, 2, 3, 4]);
        assert_eq!(set.slice(), vec![0, 1, 2, 3, 4]);
        set.remove(&[0, 1, 2, 3, 4]);
        assert!(set.slice().is_empty());
        assert!(!set.contains(&5));
        set.add(&[5]);
        assert!(set.contains(&5));
        assert_eq!(set.len(), 1);
        assert_eq!(set.reset(), vec![5]);
        assert!(set.is_empty());
    }

    /// Invariant: the flag alone picks the variant.
    #[test]
    fn factory_selects_variant() {
        assert!(!new_set::<i32>(None).is_synchronized());
        assert!(!new_set::<i32>(false).is_synchronized());
        assert!(!new_set::<i32>(Some(false)).is_synchronized());
        assert!(new_set::<i32>(true).is_synchronized());
        assert!(new_set::<i32>(Some(true)).is_synchronized());
    }

    /// Invariant: both factory variants behave identically single-threaded.
    #[test]
    fn factory_variants_agree() {
        for flag in [None, Some(false), Some(true)] {
            let mut set = new_set::<i32>(flag);
            exercise(set.as_mut());
        }
    }

    /// Invariant: shared handles implement the same capability.
    #[test]
    fn shared_handles_are_sets() {
        let owned: SynchronizedSet<i32> = SynchronizedSet::new();
        let mut by_ref = &owned;
        exercise(&mut by_ref);

        let shared = Arc::new(SynchronizedSet::<i32>::new());
        let mut by_arc: &SynchronizedSet<i32> = &shared;
        exercise(&mut by_arc);
        assert!(by_arc.is_synchronized());
    }
}
