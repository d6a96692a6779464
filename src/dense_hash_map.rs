//! DenseHashMap: unique keys with associated values over the dense table
//! engine.

use crate::dense_table::{DenseTable, EqualRange, Handle};
use crate::equivalence::{DefaultEq, DefaultHash, KeyEq, KeyHash};
use crate::error::{Error, Result};
use crate::materialize::{KeyArg, NoExtractor};
use crate::raw_table::{RawIntoIter, RawIter, RawIterMut};
use crate::settings::Settings;
use core::fmt;
use core::iter::FusedIterator;

/// Open-addressing hash map with explicitly configured sentinel keys.
///
/// Call [`set_empty_key`](Self::set_empty_key) before any lookup or
/// insertion and [`set_deleted_key`](Self::set_deleted_key) before any
/// erase. Lookups accept any `Q` the policies `H` and `E` cover and never
/// build a `K`. Inserting operations probe with the argument they were
/// given and build the key only on a miss, exactly once, with the plan the
/// argument type declares (see [`KeyArg`]).
#[derive(Clone)]
pub struct DenseHashMap<K, V, H = DefaultHash, E = DefaultEq, X = NoExtractor> {
    table: DenseTable<K, V, H, E, X>,
}

impl<K, V> DenseHashMap<K, V> {
    pub fn new() -> Self {
        Self::with_policies(DefaultHash::default(), DefaultEq, NoExtractor)
    }
}

impl<K, V, H, E> DenseHashMap<K, V, H, E> {
    pub fn with_hasher_and_eq(hasher: H, key_eq: E) -> Self {
        Self::with_policies(hasher, key_eq, NoExtractor)
    }
}

impl<K, V, H, E, X> DenseHashMap<K, V, H, E, X> {
    pub fn with_policies(hasher: H, key_eq: E, extractor: X) -> Self {
        Self::with_settings(Settings::default(), hasher, key_eq, extractor)
    }

    pub fn with_settings(settings: Settings, hasher: H, key_eq: E, extractor: X) -> Self {
        Self {
            table: DenseTable::new(settings, hasher, key_eq, extractor),
        }
    }

    pub(crate) fn from_table(table: DenseTable<K, V, H, E, X>) -> Self {
        Self { table }
    }

    pub fn hasher(&self) -> &H {
        self.table.hasher()
    }

    pub fn key_eq(&self) -> &E {
        self.table.key_eq()
    }

    pub fn extractor(&self) -> &X {
        self.table.extractor()
    }

    pub fn settings(&self) -> &Settings {
        self.table.settings()
    }

    /// Set the key marking never-used slots. Must be called exactly once,
    /// before any lookup or insertion.
    #[track_caller]
    pub fn set_empty_key(&mut self, key: K)
    where
        E: KeyEq<K, K>,
    {
        self.table.set_empty_key(key);
    }

    /// Set the key marking erased slots. Required before any erase; must
    /// differ from the empty key and from every live key.
    #[track_caller]
    pub fn set_deleted_key(&mut self, key: K)
    where
        H: KeyHash<K>,
        E: KeyEq<K, K>,
    {
        self.table.set_deleted_key(key);
    }

    pub fn clear_deleted_key(&mut self) -> Option<K> {
        self.table.clear_deleted_key()
    }

    pub fn empty_key(&self) -> Option<&K> {
        self.table.empty_key()
    }

    pub fn deleted_key(&self) -> Option<&K> {
        self.table.deleted_key()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn tombstones(&self) -> usize {
        self.table.tombstones()
    }

    #[track_caller]
    pub fn find<Q>(&self, key: &Q) -> Option<Handle>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        self.table.find(key)
    }

    #[track_caller]
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        usize::from(self.table.find_index(key).is_some())
    }

    #[track_caller]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        self.table.find_index(key).is_some()
    }

    #[track_caller]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        self.table.get(key).map(|(_, v)| v)
    }

    #[track_caller]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        self.table.get_mut(key).map(|(_, v)| v)
    }

    #[track_caller]
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        self.table.get(key).map(|(k, v)| (k, v))
    }

    /// Checked access: `Err(Error::NotFound)` when no key equals `key`.
    #[track_caller]
    pub fn at<Q>(&self, key: &Q) -> Result<&V>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        self.get(key).ok_or(Error::NotFound)
    }

    #[track_caller]
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        self.get_mut(key).ok_or(Error::NotFound)
    }

    pub fn by_handle(&self, handle: Handle) -> Option<(&K, &V)> {
        self.table.by_handle(handle).map(|(k, v)| (k, v))
    }

    pub fn by_handle_mut(&mut self, handle: Handle) -> Option<(&K, &mut V)> {
        self.table.by_handle_mut(handle).map(|(k, v)| (&*k, v))
    }

    #[track_caller]
    pub fn equal_range<Q>(&self, key: &Q) -> EqualRange<(&K, &V)>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        EqualRange::new(self.table.equal_range(key).map(|(h, (k, v))| (h, (k, v))))
    }

    /// Number of entries removed (0 or 1).
    #[track_caller]
    pub fn erase<Q>(&mut self, key: &Q) -> usize
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        usize::from(self.table.erase(key).is_some())
    }

    #[track_caller]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        self.table.erase(key)
    }

    #[track_caller]
    pub fn erase_handle(&mut self, handle: Handle) -> Option<(K, V)> {
        self.table.erase_handle(handle)
    }

    /// Insert `key -> value` unless the key is present, in which case both
    /// arguments are dropped and the existing entry is left untouched.
    #[track_caller]
    pub fn emplace<A>(&mut self, key: A, value: V) -> (Handle, bool)
    where
        A: KeyArg<K, X>,
        H: KeyHash<A::Probe>,
        E: KeyEq<A::Probe, K>,
    {
        self.table.emplace(key, || value)
    }

    /// Like [`emplace`](Self::emplace), but the value is only built when
    /// the key is inserted.
    #[track_caller]
    pub fn emplace_with<A, F>(&mut self, key: A, value: F) -> (Handle, bool)
    where
        A: KeyArg<K, X>,
        H: KeyHash<A::Probe>,
        E: KeyEq<A::Probe, K>,
        F: FnOnce() -> V,
    {
        self.table.emplace(key, value)
    }

    /// Insert with a key that converts into `K` but cannot be probed
    /// as-is. The key is built before the lookup and dropped on a hit.
    #[track_caller]
    pub fn emplace_converted<Q>(&mut self, key: Q, value: V) -> (Handle, bool)
    where
        Q: Into<K>,
        H: KeyHash<K>,
        E: KeyEq<K, K>,
    {
        let key: K = key.into();
        self.table.emplace(key, || value)
    }

    /// The value for `key`, inserting `V::default()` first when absent.
    #[track_caller]
    pub fn get_or_insert_default<A>(&mut self, key: A) -> &mut V
    where
        A: KeyArg<K, X>,
        H: KeyHash<A::Probe>,
        E: KeyEq<A::Probe, K>,
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    #[track_caller]
    pub fn get_or_insert_with<A, F>(&mut self, key: A, value: F) -> &mut V
    where
        A: KeyArg<K, X>,
        H: KeyHash<A::Probe>,
        E: KeyEq<A::Probe, K>,
        F: FnOnce() -> V,
    {
        let (index, _) = self.table.emplace_index(key, value);
        &mut self.table.slot_mut(index).1
    }

    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    pub fn shrink_to_fit(&mut self) {
        self.table.shrink_to_fit();
    }

    /// Remove every entry and release the bucket storage.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn clear_no_resize(&mut self) {
        self.table.clear_no_resize();
    }

    #[track_caller]
    pub fn retain(&mut self, keep: impl FnMut(&K, &mut V) -> bool) {
        self.table.retain(keep);
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.table.iter_mut(),
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }
}

impl<K, V, H: Default, E: Default, X: Default> Default for DenseHashMap<K, V, H, E, X> {
    fn default() -> Self {
        Self::with_policies(H::default(), E::default(), X::default())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, H, E, X> fmt::Debug for DenseHashMap<K, V, H, E, X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, H, E, X> PartialEq for DenseHashMap<K, V, H, E, X>
where
    V: PartialEq,
    H: KeyHash<K>,
    E: KeyEq<K, K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.table.same_entries(&other.table)
    }
}

impl<K, V, H, E, X> Eq for DenseHashMap<K, V, H, E, X>
where
    V: Eq,
    H: KeyHash<K>,
    E: KeyEq<K, K>,
{
}

/// Inserts with [`DenseHashMap::emplace`] semantics: keys already present
/// keep their value.
impl<K, V, H, E, X, A> Extend<(A, V)> for DenseHashMap<K, V, H, E, X>
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

pub struct Iter<'a, K, V> {
    inner: RawIter<'a, (K, V)>,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, (k, v))| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

pub struct IterMut<'a, K, V> {
    inner: RawIterMut<'a, (K, V)>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, (k, v))| (&*k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    #[inline]
    fn next(&mut self) -> Option<&'a mut V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

pub struct IntoIter<K, V> {
    inner: RawIntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V, H, E, X> IntoIterator for DenseHashMap<K, V, H, E, X> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.table.into_raw().into_iter(),
        }
    }
}

impl<'a, K, V, H, E, X> IntoIterator for &'a DenseHashMap<K, V, H, E, X> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, H, E, X> IntoIterator for &'a mut DenseHashMap<K, V, H, E, X> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> DenseHashMap<String, i32> {
        let mut m = DenseHashMap::new();
        m.set_empty_key("<empty>".to_string());
        m.set_deleted_key("<deleted>".to_string());
        m
    }

    #[test]
    fn emplace_keeps_existing_value() {
        let mut m = map();
        assert!(m.emplace("a", 1).1);
        assert!(!m.emplace("a", 2).1);
        assert_eq!(m.get("a"), Some(&1));
        assert!(!m.emplace_with("a", || panic!("value built for a present key")).1);
    }

    #[test]
    fn get_or_insert_default_then_assign() {
        let mut m = map();
        assert_eq!(*m.get_or_insert_default("missing"), 0);
        *m.get_or_insert_default("missing") += 5;
        assert_eq!(m.at("missing"), Ok(&5));
        assert_eq!(m.at("absent"), Err(Error::NotFound));
        *m.at_mut("missing").expect("present") = 9;
        assert_eq!(m.get_key_value("missing").map(|(k, v)| (k.as_str(), *v)), Some(("missing", 9)));
    }

    #[test]
    fn iterators_cover_live_entries() {
        let mut m = map();
        m.extend([("a", 1), ("b", 2), ("c", 3)]);
        m.erase("b");
        for v in m.values_mut() {
            *v *= 10;
        }
        let mut keys: Vec<&str> = m.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["a", "c"]);
        assert_eq!(m.values().sum::<i32>(), 40);
        assert_eq!(m.iter().len(), 2);
        let mut owned: Vec<(String, i32)> = m.into_iter().collect();
        owned.sort();
        assert_eq!(owned, [("a".to_string(), 10), ("c".to_string(), 30)]);
    }

    #[test]
    fn handles_and_equal_range() {
        let mut m = map();
        let (h, _) = m.emplace("k", 1);
        if let Some((_, v)) = m.by_handle_mut(h) {
            *v = 2;
        }
        let range = m.equal_range("k");
        assert_eq!(range.handle(), Some(h));
        assert_eq!(range.collect::<Vec<_>>().len(), 1);
        assert_eq!(m.erase_handle(h), Some(("k".to_string(), 2)));
        assert_eq!(m.by_handle(h), None);
    }

    #[test]
    fn equality_ignores_layout() {
        let mut a = map();
        let mut b = map();
        a.extend((0..50).map(|i| (format!("k{i}"), i)));
        b.extend((0..50).rev().map(|i| (format!("k{i}"), i)));
        b.reserve(500);
        assert_eq!(a, b);
        *b.get_mut("k7").expect("present") = -1;
        assert_ne!(a, b);
    }
}
