//! DenseHashSet: a set of unique keys over the dense table engine.

use crate::dense_table::{DenseTable, EqualRange, Handle};
use crate::equivalence::{DefaultEq, DefaultHash, KeyEq, KeyHash};
use crate::materialize::{KeyArg, NoExtractor};
use crate::raw_table::{RawIntoIter, RawIter};
use crate::settings::Settings;
use core::fmt;
use core::iter::FusedIterator;

/// Open-addressing hash set with explicitly configured sentinel keys.
///
/// Call [`set_empty_key`](Self::set_empty_key) before any lookup or
/// insertion and [`set_deleted_key`](Self::set_deleted_key) before any
/// erase. Lookups accept any `Q` in the key equivalence set of `H`/`E`
/// and never build a `K`; insertions build one only on a miss.
#[derive(Clone)]
pub struct DenseHashSet<K, H = DefaultHash, E = DefaultEq, X = NoExtractor> {
    table: DenseTable<K, (), H, E, X>,
}

impl<K> DenseHashSet<K> {
    pub fn new() -> Self {
        Self::with_policies(DefaultHash::default(), DefaultEq, NoExtractor)
    }
}

impl<K, H, E> DenseHashSet<K, H, E> {
    pub fn with_hasher_and_eq(hasher: H, key_eq: E) -> Self {
        Self::with_policies(hasher, key_eq, NoExtractor)
    }
}

impl<K, H, E, X> DenseHashSet<K, H, E, X> {
    pub fn with_policies(hasher: H, key_eq: E, extractor: X) -> Self {
        Self::with_settings(Settings::default(), hasher, key_eq, extractor)
    }

    pub fn with_settings(settings: Settings, hasher: H, key_eq: E, extractor: X) -> Self {
        Self {
            table: DenseTable::new(settings, hasher, key_eq, extractor),
        }
    }

    pub(crate) fn from_table(table: DenseTable<K, (), H, E, X>) -> Self {
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
    /// differ from the empty key and from every element.
    #[track_caller]
    pub fn set_deleted_key(&mut self, key: K)
    where
        H: KeyHash<K>,
        E: KeyEq<K, K>,
    {
        self.table.set_deleted_key(key);
    }

    /// Forget the deleted key, disabling erasure until a new one is set.
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

    /// Number of buckets; zero until the first insertion.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Number of erased slots not yet reclaimed.
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

    /// `1` if an element equals `key`, else `0`.
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
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        self.table.find_index(key).is_some()
    }

    /// The stored element equal to `key`.
    #[track_caller]
    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        self.table.get(key).map(|(k, _)| k)
    }

    pub fn by_handle(&self, handle: Handle) -> Option<&K> {
        self.table.by_handle(handle).map(|(k, _)| k)
    }

    #[track_caller]
    pub fn equal_range<Q>(&self, key: &Q) -> EqualRange<&K>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        EqualRange::new(self.table.equal_range(key).map(|(h, (k, _))| (h, k)))
    }

    /// Number of elements removed (0 or 1).
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
    pub fn remove<Q>(&mut self, key: &Q) -> Option<K>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        self.table.erase(key).map(|(k, _)| k)
    }

    #[track_caller]
    pub fn erase_handle(&mut self, handle: Handle) -> Option<K> {
        self.table.erase_handle(handle).map(|(k, _)| k)
    }

    /// Insert `key` unless an equal element is present.
    ///
    /// Returns the element's handle and whether it was inserted. `key` is
    /// probed as-is; a `K` is built from it exactly once, and only when
    /// the set did not contain it.
    #[track_caller]
    pub fn emplace<A>(&mut self, key: A) -> (Handle, bool)
    where
        A: KeyArg<K, X>,
        H: KeyHash<A::Probe>,
        E: KeyEq<A::Probe, K>,
    {
        self.table.emplace(key, || ())
    }

    /// Insert a value that converts into `K` but cannot be probed as-is.
    /// The key is built before the lookup and dropped again on a hit.
    #[track_caller]
    pub fn emplace_converted<Q>(&mut self, key: Q) -> (Handle, bool)
    where
        Q: Into<K>,
        H: KeyHash<K>,
        E: KeyEq<K, K>,
    {
        let key: K = key.into();
        self.table.emplace(key, || ())
    }

    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    pub fn shrink_to_fit(&mut self) {
        self.table.shrink_to_fit();
    }

    /// Remove every element and release the bucket storage.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn clear_no_resize(&mut self) {
        self.table.clear_no_resize();
    }

    #[track_caller]
    pub fn retain(&mut self, mut keep: impl FnMut(&K) -> bool) {
        self.table.retain(|k, _| keep(k));
    }

    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            inner: self.table.iter(),
        }
    }
}

impl<K, H: Default, E: Default, X: Default> Default for DenseHashSet<K, H, E, X> {
    fn default() -> Self {
        Self::with_policies(H::default(), E::default(), X::default())
    }
}

impl<K: fmt::Debug, H, E, X> fmt::Debug for DenseHashSet<K, H, E, X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, H, E, X> PartialEq for DenseHashSet<K, H, E, X>
where
    H: KeyHash<K>,
    E: KeyEq<K, K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.table.same_entries(&other.table)
    }
}

impl<K, H, E, X> Eq for DenseHashSet<K, H, E, X>
where
    H: KeyHash<K>,
    E: KeyEq<K, K>,
{
}

/// Inserts with [`DenseHashSet::emplace`] semantics.
impl<K, H, E, X, A> Extend<A> for DenseHashSet<K, H, E, X>
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

pub struct Iter<'a, K> {
    inner: RawIter<'a, (K, ())>,
}

impl<K> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(_, (k, _))| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}
impl<K> FusedIterator for Iter<'_, K> {}

pub struct IntoIter<K> {
    inner: RawIntoIter<(K, ())>,
}

impl<K> Iterator for IntoIter<K> {
    type Item = K;

    #[inline]
    fn next(&mut self) -> Option<K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> ExactSizeIterator for IntoIter<K> {}
impl<K> FusedIterator for IntoIter<K> {}

impl<K, H, E, X> IntoIterator for DenseHashSet<K, H, E, X> {
    type Item = K;
    type IntoIter = IntoIter<K>;

    fn into_iter(self) -> IntoIter<K> {
        IntoIter {
            inner: self.table.into_raw().into_iter(),
        }
    }
}

impl<'a, K, H, E, X> IntoIterator for &'a DenseHashSet<K, H, E, X> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}
