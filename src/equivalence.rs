//! Hash and equality policies spanning a key type and its substitutes.
//!
//! A table stores keys of type `K`. Lookups accept any `Q` for which the
//! table's hash policy implements [`KeyHash<Q>`] and its equality policy
//! implements [`KeyEq<Q, K>`]. The set of such `Q` is the table's key
//! equivalence set; `K` itself must be in it for insertion by value.
//!
//! Contract: for every `q: Q` and stored `k: K`, `key_eq(q, k)` implies
//! `hash_key(q) == hash_key(k)`. Violations are not detected; they make
//! lookups miss.

use core::hash::{BuildHasher, Hash};
use equivalent::Equivalent;

/// Hash function object for argument type `Q`.
pub trait KeyHash<Q: ?Sized> {
    fn hash_key(&self, key: &Q) -> u64;
}

/// Equality function object comparing a probe of type `Q` against a
/// stored key of type `K`.
pub trait KeyEq<Q: ?Sized, K: ?Sized> {
    fn key_eq(&self, probe: &Q, stored: &K) -> bool;
}

/// Hashes any `Q: Hash` with a `BuildHasher`.
///
/// Two types share hashes under this policy when their `Hash` impls feed
/// the hasher the same data, e.g. `String` and `str`, or a newtype that
/// hashes only its inner `String`.
#[derive(Clone, Debug, Default)]
pub struct DefaultHash<S = hashbrown::hash_map::DefaultHashBuilder> {
    build: S,
}

impl<S> DefaultHash<S> {
    pub fn with_build_hasher(build: S) -> Self {
        Self { build }
    }

    pub fn build_hasher(&self) -> &S {
        &self.build
    }
}

impl<Q, S> KeyHash<Q> for DefaultHash<S>
where
    Q: ?Sized + Hash,
    S: BuildHasher,
{
    #[inline]
    fn hash_key(&self, key: &Q) -> u64 {
        self.build.hash_one(key)
    }
}

/// Compares through [`Equivalent`], which covers every `Q` that `K`
/// borrows as, plus any hand-written `Equivalent<K>` impls.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultEq;

impl<Q, K> KeyEq<Q, K> for DefaultEq
where
    Q: ?Sized + Equivalent<K>,
    K: ?Sized,
{
    #[inline]
    fn key_eq(&self, probe: &Q, stored: &K) -> bool {
        probe.equivalent(stored)
    }
}

impl<Q: ?Sized, F> KeyHash<Q> for &F
where
    F: KeyHash<Q> + ?Sized,
{
    #[inline]
    fn hash_key(&self, key: &Q) -> u64 {
        (**self).hash_key(key)
    }
}

impl<Q: ?Sized, K: ?Sized, F> KeyEq<Q, K> for &F
where
    F: KeyEq<Q, K> + ?Sized,
{
    #[inline]
    fn key_eq(&self, probe: &Q, stored: &K) -> bool {
        (**self).key_eq(probe, stored)
    }
}
