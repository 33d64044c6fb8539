#![cfg(test)]

// State-machine property tests for OrderedMapSet against BTreeSet, kept in
// the crate so they can use non-default hashers freely.

use crate::ordered_map_set::OrderedMapSet;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations so shrinking moves toward earlier keys and
// shorter batches.
#[derive(Clone, Debug)]
enum OpI {
    Add(Vec<usize>),
    Remove(Vec<usize>),
    Insert(usize),
    RemoveOne(usize),
    Contains(String),
    Slice,
    Reset,
}

fn keys_from(pool: &[String], idxs: &[usize]) -> Vec<Key> {
    idxs.iter().map(|&i| Key(pool[i].clone())).collect()
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let batch = proptest::collection::vec(idx.clone(), 0..6);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            batch.clone().prop_map(OpI::Add),
            batch.prop_map(OpI::Remove),
            idx.clone().prop_map(OpI::Insert),
            idx.prop_map(OpI::RemoveOne),
            prop_oneof![contains_pool, "[a-z]{0,4}"].prop_map(OpI::Contains),
            Just(OpI::Slice),
            Just(OpI::Reset),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Invariants checked after every operation:
// - `slice` equals the model in ascending order (no duplicates, sorted).
// - `reset` returns the prior `slice` and leaves the set empty.
// - `insert`/`remove_one` report novelty/presence like the model.
// - `contains` (borrowed `&str`) agrees with the model.
// - `len`/`is_empty` parity.
fn run_state_machine<S: BuildHasher>(
    mut sut: OrderedMapSet<Key, S>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: BTreeSet<Key> = BTreeSet::new();
    for op in ops {
        match op {
            OpI::Add(idxs) => {
                let ks = keys_from(pool, &idxs);
                sut.add(&ks);
                model.extend(ks);
            }
            OpI::Remove(idxs) => {
                let ks = keys_from(pool, &idxs);
                sut.remove(&ks);
                for k in &ks {
                    model.remove(k);
                }
            }
            OpI::Insert(i) => {
                let k = Key(pool[i].clone());
                prop_assert_eq!(sut.insert(k.clone()), model.insert(k));
            }
            OpI::RemoveOne(i) => {
                let k = pool[i].as_str();
                let had = model.remove(k);
                prop_assert_eq!(sut.remove_one(k), had);
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains(s.as_str()), model.contains(s.as_str()));
            }
            OpI::Slice => {
                let snap = sut.slice();
                prop_assert!(snap.windows(2).all(|w| w[0] < w[1]), "not strictly ascending");
            }
            OpI::Reset => {
                let before = sut.slice();
                let taken = sut.reset();
                prop_assert_eq!(&taken, &before);
                prop_assert!(sut.is_empty());
                for k in &taken {
                    prop_assert!(!sut.contains(k));
                }
                model.clear();
            }
        }

        let expected: Vec<Key> = model.iter().cloned().collect();
        prop_assert_eq!(sut.slice(), expected);
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_state_machine(OrderedMapSet::new(), &pool, ops)?;
    }
}

// Constant hasher: every key collides, so only `Eq` resolves membership.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_state_machine(OrderedMapSet::with_hasher(ConstBuildHasher), &pool, ops)?;
    }
}
