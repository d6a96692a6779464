#![cfg(test)]

// State-machine property tests for DenseHashMap, kept inside the crate so
// they can check slot accounting through crate-private settings.

use crate::dense_hash_map::DenseHashMap;
use crate::equivalence::{DefaultEq, DefaultHash};
use crate::key_substitute;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::borrow::Borrow;
use std::cell::Cell;
use std::collections::{BTreeSet, HashMap};
use std::hash::{BuildHasher, Hasher};

// Key newtype probed by &str and &String.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Borrow<String> for Key {
    fn borrow(&self) -> &String {
        &self.0
    }
}

thread_local! {
    static KEYS_BUILT: Cell<usize> = const { Cell::new(0) };
}

fn keys_built() -> usize {
    KEYS_BUILT.with(Cell::get)
}

impl From<String> for Key {
    fn from(s: String) -> Key {
        KEYS_BUILT.with(|c| c.set(c.get() + 1));
        Key(s)
    }
}

impl From<&String> for Key {
    fn from(s: &String) -> Key {
        KEYS_BUILT.with(|c| c.set(c.get() + 1));
        Key(s.clone())
    }
}

key_substitute!(Key: String => direct);

#[derive(Clone, Debug)]
enum Op {
    Emplace(usize, i32, bool),
    EmplaceWith(usize, i32),
    GetOrInsertDefault(usize, i32),
    Erase(usize),
    EraseHandle(usize),
    Find(usize),
    Count(String),
    Mutate(usize, i32),
    Reserve(usize),
    ShrinkToFit,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let count_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            (idx.clone(), any::<i32>(), any::<bool>()).prop_map(|(i, v, b)| Op::Emplace(i, v, b)),
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::EmplaceWith(i, v)),
            (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::GetOrInsertDefault(i, d)),
            idx.clone().prop_map(Op::Erase),
            idx.clone().prop_map(Op::EraseHandle),
            idx.clone().prop_map(Op::Find),
            prop_oneof![count_pool, "[a-z]{0,5}"].prop_map(Op::Count),
            (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
            (0usize..64).prop_map(Op::Reserve),
            Just(Op::ShrinkToFit),
            Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Invariants checked after every operation:
// - contents, len and lookups agree with std::collections::HashMap;
// - a Key is built exactly when an insertion happens, never on a hit;
// - capacity is zero or a power of two and occupied + deleted stays within
//   the growth threshold;
// - handles either resolve to a live entry matching the model or are stale.
fn run<H>(
    mut sut: DenseHashMap<Key, i32, DefaultHash<H>, DefaultEq>,
    pool: &[String],
    ops: Vec<Op>,
) -> Result<(), TestCaseError>
where
    H: BuildHasher,
{
    sut.set_empty_key(Key("<empty>".into()));
    sut.set_deleted_key(Key("<deleted>".into()));
    let mut model: HashMap<Key, i32> = HashMap::new();
    let mut handles = Vec::new();
    let value_calls = Cell::new(0usize);

    for op in ops {
        let built_before = keys_built();
        let mut expect_built = 0;
        match op {
            Op::Emplace(i, v, borrowed) => {
                let present = model.contains_key(pool[i].as_str());
                let (h, inserted) = if borrowed {
                    sut.emplace(&pool[i], v)
                } else {
                    sut.emplace(pool[i].clone(), v)
                };
                prop_assert_eq!(inserted, !present);
                if inserted {
                    expect_built = 1;
                    model.insert(Key(pool[i].clone()), v);
                }
                handles.push(h);
            }
            Op::EmplaceWith(i, v) => {
                let present = model.contains_key(pool[i].as_str());
                let before = value_calls.get();
                let (h, inserted) = sut.emplace_with(&pool[i], || {
                    value_calls.set(value_calls.get() + 1);
                    v
                });
                prop_assert_eq!(inserted, !present);
                prop_assert_eq!(value_calls.get(), before + usize::from(inserted));
                if inserted {
                    expect_built = 1;
                    model.insert(Key(pool[i].clone()), v);
                }
                handles.push(h);
            }
            Op::GetOrInsertDefault(i, d) => {
                if !model.contains_key(pool[i].as_str()) {
                    expect_built = 1;
                }
                let slot = sut.get_or_insert_default(&pool[i]);
                *slot = slot.wrapping_add(d);
                let m = model.entry(Key(pool[i].clone())).or_default();
                *m = m.wrapping_add(d);
            }
            Op::Erase(i) => {
                let removed = sut.erase(pool[i].as_str());
                let expected = model.remove(pool[i].as_str());
                prop_assert_eq!(removed, usize::from(expected.is_some()));
                prop_assert!(!sut.contains_key(pool[i].as_str()));
            }
            Op::EraseHandle(i) => match sut.find(pool[i].as_str()) {
                Some(h) => {
                    let (k, v) = sut.erase_handle(h).expect("fresh handle resolves");
                    prop_assert_eq!(model.remove(&k), Some(v));
                    prop_assert!(sut.by_handle(h).is_none());
                }
                None => prop_assert!(!model.contains_key(pool[i].as_str())),
            },
            Op::Find(i) => {
                let found = sut.find(pool[i].as_str());
                prop_assert_eq!(found.is_some(), model.contains_key(pool[i].as_str()));
                if let Some(h) = found {
                    let (k, v) = sut.by_handle(h).expect("fresh handle resolves");
                    prop_assert_eq!(k.0.as_str(), pool[i].as_str());
                    prop_assert_eq!(Some(v), model.get(k));
                }
            }
            Op::Count(s) => {
                prop_assert_eq!(sut.count(s.as_str()), usize::from(model.contains_key(s.as_str())));
                prop_assert_eq!(sut.count(&s), sut.count(s.as_str()));
            }
            Op::Mutate(i, d) => {
                if let Some(v) = sut.get_mut(pool[i].as_str()) {
                    *v = v.wrapping_add(d);
                    let m = model.get_mut(pool[i].as_str()).expect("model agrees");
                    *m = m.wrapping_add(d);
                } else {
                    prop_assert!(!model.contains_key(pool[i].as_str()));
                }
            }
            Op::Reserve(n) => {
                sut.reserve(n);
                let cap = sut.capacity();
                prop_assert!(sut.settings().grow_threshold(cap) >= sut.len() + n);
            }
            Op::ShrinkToFit => sut.shrink_to_fit(),
            Op::Iterate => {
                let s_keys: BTreeSet<_> = sut.keys().cloned().collect();
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
                for (k, v) in sut.iter() {
                    prop_assert_eq!(Some(v), model.get(k));
                }
            }
        }

        prop_assert_eq!(keys_built() - built_before, expect_built);
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        let cap = sut.capacity();
        prop_assert!(cap == 0 || cap.is_power_of_two());
        if cap > 0 {
            prop_assert!(sut.len() + sut.tombstones() <= sut.settings().grow_threshold(cap));
        }
        for &h in &handles {
            if let Some((k, v)) = sut.by_handle(h) {
                prop_assert_eq!(Some(v), model.get(k));
            }
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run(DenseHashMap::new(), &pool, ops)?;
    }
}

// Every key hashes to the same bucket: probing must resolve purely by
// equality, and tombstones end up on every probe path.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;

impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> ConstHasher {
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
        let sut = DenseHashMap::with_hasher_and_eq(
            DefaultHash::with_build_hasher(ConstBuildHasher),
            DefaultEq,
        );
        run(sut, &pool, ops)?;
    }
}
