//! Wrapped containers: dense tables that need no sentinel configuration.
//!
//! The inner table stores `WrappedKey<K>`, whose `Empty` and `Deleted`
//! variants serve as the sentinels. They are installed at construction,
//! can never collide with a user key, and are never seen by the user's
//! hash or equality policies: `WrapHash` forwards to `H` and `WrapEq`
//! forwards to `E` for live keys only.

use crate::dense_hash_map::{self, DenseHashMap};
use crate::dense_hash_set::{self, DenseHashSet};
use crate::dense_table::{DenseTable, EqualRange, Handle};
use crate::equivalence::{DefaultEq, DefaultHash, KeyEq, KeyHash};
use crate::error::{Error, Result};
use crate::materialize::{ConstructionPlan, KeyArg, NoExtractor};
use crate::sentinel::Sentinels;
use crate::settings::Settings;
use core::fmt;
use core::iter::FusedIterator;

/// Stored key of a wrapped table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WrappedKey<K> {
    Empty,
    Deleted,
    Live(K),
}

impl<K> WrappedKey<K> {
    #[inline]
    pub fn live(&self) -> Option<&K> {
        match self {
            WrappedKey::Live(k) => Some(k),
            _ => None,
        }
    }

    #[inline]
    pub fn into_live(self) -> Option<K> {
        match self {
            WrappedKey::Live(k) => Some(k),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct WrapHash<H>(H);

impl<Q, H> KeyHash<Q> for WrapHash<H>
where
    Q: ?Sized,
    H: KeyHash<Q>,
{
    #[inline]
    fn hash_key(&self, key: &Q) -> u64 {
        self.0.hash_key(key)
    }
}

#[derive(Clone, Debug, Default)]
pub struct WrapEq<E>(E);

impl<Q, K, E> KeyEq<Q, WrappedKey<K>> for WrapEq<E>
where
    Q: ?Sized,
    E: KeyEq<Q, K>,
{
    #[inline]
    fn key_eq(&self, probe: &Q, stored: &WrappedKey<K>) -> bool {
        match stored {
            WrappedKey::Live(k) => self.0.key_eq(probe, k),
            WrappedKey::Empty | WrappedKey::Deleted => false,
        }
    }
}

/// Insertion argument for a wrapped table: probes as `A` does and stores
/// `WrappedKey::Live` of whatever `A` materializes.
pub struct Live<A>(A);

impl<K, X, A> KeyArg<WrappedKey<K>, X> for Live<A>
where
    A: KeyArg<K, X>,
{
    type Probe = A::Probe;
    const PLAN: ConstructionPlan = A::PLAN;

    #[inline]
    fn probe(&self) -> &A::Probe {
        self.0.probe()
    }

    #[inline]
    fn materialize(self, extractor: &X) -> WrappedKey<K> {
        WrappedKey::Live(self.0.materialize(extractor))
    }
}

fn wrapped_table<K, V, H, E, X>(
    settings: Settings,
    hasher: H,
    key_eq: E,
    extractor: X,
) -> DenseTable<WrappedKey<K>, V, WrapHash<H>, WrapEq<E>, X> {
    DenseTable::with_sentinels(
        settings,
        WrapHash(hasher),
        WrapEq(key_eq),
        extractor,
        Sentinels::preset(WrappedKey::Empty, WrappedKey::Deleted),
    )
}

/// A [`DenseHashSet`] whose sentinels are managed internally.
///
/// Same lookup and insertion guarantees, ready for use as soon as it is
/// constructed.
#[derive(Clone)]
pub struct WrappedDenseHashSet<K, H = DefaultHash, E = DefaultEq, X = NoExtractor> {
    inner: DenseHashSet<WrappedKey<K>, WrapHash<H>, WrapEq<E>, X>,
}

impl<K> WrappedDenseHashSet<K> {
    pub fn new() -> Self {
        Self::with_policies(DefaultHash::default(), DefaultEq, NoExtractor)
    }
}

impl<K, H, E> WrappedDenseHashSet<K, H, E> {
    pub fn with_hasher_and_eq(hasher: H, key_eq: E) -> Self {
        Self::with_policies(hasher, key_eq, NoExtractor)
    }
}

impl<K, H, E, X> WrappedDenseHashSet<K, H, E, X> {
    pub fn with_policies(hasher: H, key_eq: E, extractor: X) -> Self {
        Self::with_settings(Settings::default(), hasher, key_eq, extractor)
    }

    pub fn with_settings(settings: Settings, hasher: H, key_eq: E, extractor: X) -> Self {
        Self {
            inner: DenseHashSet::from_table(wrapped_table(settings, hasher, key_eq, extractor)),
        }
    }

    pub fn hasher(&self) -> &H {
        &self.inner.hasher().0
    }

    pub fn key_eq(&self) -> &E {
        &self.inner.key_eq().0
    }

    pub fn extractor(&self) -> &X {
        self.inner.extractor()
    }

    pub fn settings(&self) -> &Settings {
        self.inner.settings()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    pub fn tombstones(&self) -> usize {
        self.inner.tombstones()
    }

    pub fn find<Q>(&self, key: &Q) -> Option<Handle>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        self.inner.find(key)
    }

    pub fn count<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        self.inner.count(key)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        self.inner.contains(key)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        self.inner.get(key).and_then(WrappedKey::live)
    }

    pub fn by_handle(&self, handle: Handle) -> Option<&K> {
        self.inner.by_handle(handle).and_then(WrappedKey::live)
    }

    pub fn equal_range<Q>(&self, key: &Q) -> EqualRange<&K>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        let mut range = self.inner.equal_range(key);
        let handle = range.handle();
        EqualRange::new(handle.zip(range.next().and_then(WrappedKey::live)))
    }

    pub fn erase<Q>(&mut self, key: &Q) -> usize
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        self.inner.erase(key)
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<K>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        self.inner.remove(key).and_then(WrappedKey::into_live)
    }

    pub fn erase_handle(&mut self, handle: Handle) -> Option<K> {
        self.inner
            .erase_handle(handle)
            .and_then(WrappedKey::into_live)
    }

    /// See [`DenseHashSet::emplace`].
    pub fn emplace<A>(&mut self, key: A) -> (Handle, bool)
    where
        A: KeyArg<K, X>,
        H: KeyHash<A::Probe>,
        E: KeyEq<A::Probe, K>,
    {
        self.inner.emplace(Live(key))
    }

    pub fn emplace_converted<Q>(&mut self, key: Q) -> (Handle, bool)
    where
        Q: Into<K>,
        H: KeyHash<K>,
        E: KeyEq<K, K>,
    {
        let key: K = key.into();
        self.inner.emplace(Live(key))
    }

    pub fn reserve(&mut self, additional: usize) {
        self.inner.reserve(additional);
    }

    pub fn shrink_to_fit(&mut self) {
        self.inner.shrink_to_fit();
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn clear_no_resize(&mut self) {
        self.inner.clear_no_resize();
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&K) -> bool) {
        self.inner
            .retain(|k| k.live().map_or(true, |k| keep(k)));
    }

    pub fn iter(&self) -> SetIter<'_, K> {
        SetIter {
            inner: self.inner.iter(),
        }
    }
}

impl<K, H: Default, E: Default, X: Default> Default for WrappedDenseHashSet<K, H, E, X> {
    fn default() -> Self {
        Self::with_policies(H::default(), E::default(), X::default())
    }
}

impl<K: fmt::Debug, H, E, X> fmt::Debug for WrappedDenseHashSet<K, H, E, X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, H, E, X> PartialEq for WrappedDenseHashSet<K, H, E, X>
where
    H: KeyHash<K>,
    E: KeyEq<K, K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|k| other.contains(k))
    }
}

impl<K, H, E, X> Eq for WrappedDenseHashSet<K, H, E, X>
where
    H: KeyHash<K>,
    E: KeyEq<K, K>,
{
}

impl<K, H, E, X, A> Extend<A> for WrappedDenseHashSet<K, H, E, X>
where
    A: KeyArg<K, X>,
    H: KeyHash<A::Probe>,
    E: KeyEq<A::Probe, K>,
{
    fn extend<I: IntoIterator<Item = A>>(&mut self, iter: I) {
        for key in iter {
            self.emplace(key);
        }
    }
}

impl<K, H, E, X, A> FromIterator<A> for WrappedDenseHashSet<K, H, E, X>
where
    A: KeyArg<K, X>,
    H: KeyHash<A::Probe> + Default,
    E: KeyEq<A::Probe, K> + Default,
    X: Default,
{
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

pub struct SetIter<'a, K> {
    inner: dense_hash_set::Iter<'a, WrappedKey<K>>,
}

impl<'a, K> Iterator for SetIter<'a, K> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<&'a K> {
        self.inner.find_map(WrappedKey::live)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

// Only live keys are ever stored, so the inner count is exact.
impl<K> ExactSizeIterator for SetIter<'_, K> {}
impl<K> FusedIterator for SetIter<'_, K> {}

pub struct SetIntoIter<K> {
    inner: dense_hash_set::IntoIter<WrappedKey<K>>,
}

impl<K> Iterator for SetIntoIter<K> {
    type Item = K;

    #[inline]
    fn next(&mut self) -> Option<K> {
        self.inner.find_map(WrappedKey::into_live)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> ExactSizeIterator for SetIntoIter<K> {}

impl<K, H, E, X> IntoIterator for WrappedDenseHashSet<K, H, E, X> {
    type Item = K;
    type IntoIter = SetIntoIter<K>;

    fn into_iter(self) -> SetIntoIter<K> {
        SetIntoIter {
            inner: self.inner.into_iter(),
        }
    }
}

impl<'a, K, H, E, X> IntoIterator for &'a WrappedDenseHashSet<K, H, E, X> {
    type Item = &'a K;
    type IntoIter = SetIter<'a, K>;

    fn into_iter(self) -> SetIter<'a, K> {
        self.iter()
    }
}

/// A [`DenseHashMap`] whose sentinels are managed internally.
#[derive(Clone)]
pub struct WrappedDenseHashMap<K, V, H = DefaultHash, E = DefaultEq, X = NoExtractor> {
    inner: DenseHashMap<WrappedKey<K>, V, WrapHash<H>, WrapEq<E>, X>,
}

impl<K, V> WrappedDenseHashMap<K, V> {
    pub fn new() -> Self {
        Self::with_policies(DefaultHash::default(), DefaultEq, NoExtractor)
    }
}

impl<K, V, H, E> WrappedDenseHashMap<K, V, H, E> {
    pub fn with_hasher_and_eq(hasher: H, key_eq: E) -> Self {
        Self::with_policies(hasher, key_eq, NoExtractor)
    }
}

impl<K, V, H, E, X> WrappedDenseHashMap<K, V, H, E, X> {
    pub fn with_policies(hasher: H, key_eq: E, extractor: X) -> Self {
        Self::with_settings(Settings::default(), hasher, key_eq, extractor)
    }

    pub fn with_settings(settings: Settings, hasher: H, key_eq: E, extractor: X) -> Self {
        Self {
            inner: DenseHashMap::from_table(wrapped_table(settings, hasher, key_eq, extractor)),
        }
    }

    pub fn hasher(&self) -> &H {
        &self.inner.hasher().0
    }

    pub fn key_eq(&self) -> &E {
        &self.inner.key_eq().0
    }

    pub fn extractor(&self) -> &X {
        self.inner.extractor()
    }

    pub fn settings(&self) -> &Settings {
        self.inner.settings()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    pub fn tombstones(&self) -> usize {
        self.inner.tombstones()
    }

    pub fn find<Q>(&self, key: &Q) -> Option<Handle>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        self.inner.find(key)
    }

    pub fn count<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        self.inner.count(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        self.inner.contains_key(key)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        self.inner.get(key)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        self.inner.get_mut(key)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        let (k, v) = self.inner.get_key_value(key)?;
        Some((k.live()?, v))
    }

    pub fn at<Q>(&self, key: &Q) -> Result<&V>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        self.get(key).ok_or(Error::NotFound)
    }

    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        self.get_mut(key).ok_or(Error::NotFound)
    }

    pub fn by_handle(&self, handle: Handle) -> Option<(&K, &V)> {
        let (k, v) = self.inner.by_handle(handle)?;
        Some((k.live()?, v))
    }

    pub fn by_handle_mut(&mut self, handle: Handle) -> Option<(&K, &mut V)> {
        let (k, v) = self.inner.by_handle_mut(handle)?;
        Some((k.live()?, v))
    }

    pub fn equal_range<Q>(&self, key: &Q) -> EqualRange<(&K, &V)>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        let mut range = self.inner.equal_range(key);
        let handle = range.handle();
        let item = range.next().and_then(|(k, v)| Some((k.live()?, v)));
        EqualRange::new(handle.zip(item))
    }

    pub fn erase<Q>(&mut self, key: &Q) -> usize
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        self.inner.erase(key)
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        let (k, v) = self.inner.remove(key)?;
        Some((k.into_live()?, v))
    }

    pub fn erase_handle(&mut self, handle: Handle) -> Option<(K, V)> {
        let (k, v) = self.inner.erase_handle(handle)?;
        Some((k.into_live()?, v))
    }

    /// See [`DenseHashMap::emplace`].
    pub fn emplace<A>(&mut self, key: A, value: V) -> (Handle, bool)
    where
        A: KeyArg<K, X>,
        H: KeyHash<A::Probe>,
        E: KeyEq<A::Probe, K>,
    {
        self.inner.emplace(Live(key), value)
    }

    pub fn emplace_with<A, F>(&mut self, key: A, value: F) -> (Handle, bool)
    where
        A: KeyArg<K, X>,
        H: KeyHash<A::Probe>,
        E: KeyEq<A::Probe, K>,
        F: FnOnce() -> V,
    {
        self.inner.emplace_with(Live(key), value)
    }

    pub fn emplace_converted<Q>(&mut self, key: Q, value: V) -> (Handle, bool)
    where
        Q: Into<K>,
        H: KeyHash<K>,
        E: KeyEq<K, K>,
    {
        let key: K = key.into();
        self.inner.emplace(Live(key), value)
    }

    pub fn get_or_insert_default<A>(&mut self, key: A) -> &mut V
    where
        A: KeyArg<K, X>,
        H: KeyHash<A::Probe>,
        E: KeyEq<A::Probe, K>,
        V: Default,
    {
        self.inner.get_or_insert_default(Live(key))
    }

    pub fn get_or_insert_with<A, F>(&mut self, key: A, value: F) -> &mut V
    where
        A: KeyArg<K, X>,
        H: KeyHash<A::Probe>,
        E: KeyEq<A::Probe, K>,
        F: FnOnce() -> V,
    {
        self.inner.get_or_insert_with(Live(key), value)
    }

    pub fn reserve(&mut self, additional: usize) {
        self.inner.reserve(additional);
    }

    pub fn shrink_to_fit(&mut self) {
        self.inner.shrink_to_fit();
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn clear_no_resize(&mut self) {
        self.inner.clear_no_resize();
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&K, &mut V) -> bool) {
        self.inner
            .retain(|k, v| k.live().map_or(true, |k| keep(k, v)));
    }

    pub fn iter(&self) -> MapIter<'_, K, V> {
        MapIter {
            inner: self.inner.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> MapIterMut<'_, K, V> {
        MapIterMut {
            inner: self.inner.iter_mut(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> + '_ {
        self.iter_mut().map(|(_, v)| v)
    }
}

impl<K, V, H: Default, E: Default, X: Default> Default for WrappedDenseHashMap<K, V, H, E, X> {
    fn default() -> Self {
        Self::with_policies(H::default(), E::default(), X::default())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, H, E, X> fmt::Debug for WrappedDenseHashMap<K, V, H, E, X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, H, E, X> PartialEq for WrappedDenseHashMap<K, V, H, E, X>
where
    V: PartialEq,
    H: KeyHash<K>,
    E: KeyEq<K, K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, H, E, X> Eq for WrappedDenseHashMap<K, V, H, E, X>
where
    V: Eq,
    H: KeyHash<K>,
    E: KeyEq<K, K>,
{
}

impl<K, V, H, E, X, A> Extend<(A, V)> for WrappedDenseHashMap<K, V, H, E, X>
where
    A: KeyArg<K, X>,
    H: KeyHash<A::Probe>,
    E: KeyEq<A::Probe, K>,
{
    fn extend<I: IntoIterator<Item = (A, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.emplace(key, value);
        }
    }
}

impl<K, V, H, E, X, A> FromIterator<(A, V)> for WrappedDenseHashMap<K, V, H, E, X>
where
    A: KeyArg<K, X>,
    H: KeyHash<A::Probe> + Default,
    E: KeyEq<A::Probe, K> + Default,
    X: Default,
{
    fn from_iter<I: IntoIterator<Item = (A, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

pub struct MapIter<'a, K, V> {
    inner: dense_hash_map::Iter<'a, WrappedKey<K>, V>,
}

impl<'a, K, V> Iterator for MapIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(|(k, v)| Some((k.live()?, v)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for MapIter<'_, K, V> {}
impl<K, V> FusedIterator for MapIter<'_, K, V> {}

pub struct MapIterMut<'a, K, V> {
    inner: dense_hash_map::IterMut<'a, WrappedKey<K>, V>,
}

impl<'a, K, V> Iterator for MapIterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(|(k, v)| Some((k.live()?, v)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for MapIterMut<'_, K, V> {}
impl<K, V> FusedIterator for MapIterMut<'_, K, V> {}

pub struct MapIntoIter<K, V> {
    inner: dense_hash_map::IntoIter<WrappedKey<K>, V>,
}

impl<K, V> Iterator for MapIntoIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<(K, V)> {
        self.inner.find_map(|(k, v)| Some((k.into_live()?, v)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for MapIntoIter<K, V> {}

impl<K, V, H, E, X> IntoIterator for WrappedDenseHashMap<K, V, H, E, X> {
    type Item = (K, V);
    type IntoIter = MapIntoIter<K, V>;

    fn into_iter(self) -> MapIntoIter<K, V> {
        MapIntoIter {
            inner: self.inner.into_iter(),
        }
    }
}

impl<'a, K, V, H, E, X> IntoIterator for &'a WrappedDenseHashMap<K, V, H, E, X> {
    type Item = (&'a K, &'a V);
    type IntoIter = MapIter<'a, K, V>;

    fn into_iter(self) -> MapIter<'a, K, V> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_variants_never_match_a_probe() {
        let eq = WrapEq(DefaultEq);
        assert!(!eq.key_eq("x", &WrappedKey::<String>::Empty));
        assert!(!eq.key_eq("x", &WrappedKey::<String>::Deleted));
        assert!(eq.key_eq("x", &WrappedKey::Live("x".to_string())));
    }

    #[test]
    fn live_forwards_plan_and_probe() {
        let arg = Live("abc");
        assert_eq!(
            <Live<&str> as KeyArg<WrappedKey<String>>>::PLAN,
            ConstructionPlan::Direct
        );
        assert_eq!(KeyArg::<WrappedKey<String>>::probe(&arg), "abc");
        let stored: WrappedKey<String> = KeyArg::materialize(arg, &NoExtractor);
        assert_eq!(stored, WrappedKey::Live("abc".to_string()));
    }

    #[test]
    fn usable_without_configuration() {
        let mut m: WrappedDenseHashMap<String, u32> = WrappedDenseHashMap::new();
        assert_eq!(m.count("x"), 0);
        *m.get_or_insert_default("x") += 1;
        assert_eq!(m.erase("x"), 1);
        assert_eq!(m.erase("x"), 0);
        assert!(m.is_empty());
        assert_eq!(m.tombstones(), 1);
    }

    #[test]
    fn from_iter_and_equality() {
        let a: WrappedDenseHashSet<String> = ["a", "b", "c"].into_iter().collect();
        let b: WrappedDenseHashSet<String> = ["c", "b", "a", "a"].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(a.iter().len(), 3);
        let mut keys: Vec<String> = b.into_iter().collect();
        keys.sort();
        assert_eq!(keys, ["a", "b", "c"]);
    }
}
