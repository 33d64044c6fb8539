//! OrderedMapSet: unsynchronized presence map with sorted snapshots.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::HashMap;
use std::collections::hash_map::RandomState;

/// A set of unique, naturally ordered elements backed by a hash map.
///
/// Membership operations are expected O(1). Order is not tracked; `slice`
/// and `reset` sort on demand and hand back an owned `Vec`.
pub struct OrderedMapSet<T, S = RandomState> {
    contents: HashMap<T, (), S>,
}

impl<T> OrderedMapSet<T>
where
    T: Ord + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, Default::default())
    }
}

impl<T> Default for OrderedMapSet<T>
where
    T: Ord + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> OrderedMapSet<T, S>
where
    T: Ord + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            contents: HashMap::with_hasher(hasher),
        }
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            contents: HashMap::with_capacity_and_hasher(capacity, hasher),
        }
    }

    pub fn hasher(&self) -> &S {
        self.contents.hasher()
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.contents.capacity()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.contents.reserve(additional);
    }

    /// Insert a single element. Returns `false` if it was already present.
    pub fn insert(&mut self, element: T) -> bool {
        self.contents.insert(element, ()).is_none()
    }

    /// Remove a single element. Returns `false` if it was absent.
    pub fn remove_one<Q>(&mut self, q: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.contents.remove(q).is_some()
    }

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.contents.contains_key(q)
    }

    /// Insert every element; already-present elements are left alone.
    pub fn add(&mut self, elements: &[T])
    where
        T: Clone,
    {
        self.extend(elements);
    }

    /// Remove every element that is present; absent ones are skipped.
    pub fn remove(&mut self, elements: &[T]) {
        for e in elements {
            self.contents.remove(e);
        }
    }

    /// Sorted copy of the current members. Empty set yields an empty `Vec`.
    pub fn slice(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut out: Vec<T> = self.contents.keys().cloned().collect();
        // Keys are unique, so stability does not matter.
        out.sort_unstable();
        out
    }

    /// Sorted members, moved out; the set is left empty.
    pub fn reset(&mut self) -> Vec<T> {
        let mut out: Vec<T> = self.contents.drain().map(|(k, ())| k).collect();
        out.sort_unstable();
        tracing::trace!(len = out.len(), "ordered map set reset");
        out
    }
}

impl<T, S> Clone for OrderedMapSet<T, S>
where
    T: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            contents: self.contents.clone(),
        }
    }
}

impl<T, S> PartialEq for OrderedMapSet<T, S>
where
    T: Ord + Hash,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.contents.keys().all(|k| other.contains(k))
    }
}

impl<T, S> Eq for OrderedMapSet<T, S>
where
    T: Ord + Hash,
    S: BuildHasher,
{
}

impl<T, S> fmt::Debug for OrderedMapSet<T, S>
where
    T: fmt::Debug + Ord,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&T> = self.contents.keys().collect();
        keys.sort_unstable();
        f.debug_set().entries(keys).finish()
    }
}

impl<T, S> Extend<T> for OrderedMapSet<T, S>
where
    T: Ord + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.contents.extend(iter.into_iter().map(|k| (k, ())));
    }
}

impl<'a, T, S> Extend<&'a T> for OrderedMapSet<T, S>
where
    T: 'a + Ord + Hash + Clone,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().cloned());
    }
}

impl<T, S> FromIterator<T> for OrderedMapSet<T, S>
where
    T: Ord + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::with_hasher(S::default());
        set.extend(iter);
        set
    }
}
