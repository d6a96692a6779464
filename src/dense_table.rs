//! DenseTable: the engine shared by the set and map adaptors.
//!
//! Binds a [`RawTable`] of `(K, V)` pairs to the hash and equality
//! policies, the key extractor and the sentinel configuration. Every
//! lookup hashes and compares the caller's argument directly; a `K` is
//! only ever built by [`KeyArg::materialize`], after a probe has missed.

use crate::equivalence::{KeyEq, KeyHash};
use crate::materialize::KeyArg;
use crate::raw_table::{Probe, RawIter, RawIterMut, RawTable};
use crate::sentinel::Sentinels;
use crate::settings::Settings;
use core::iter::FusedIterator;
use log::debug;

/// Position of an element inside a table.
///
/// A handle stays valid until the element is erased or the table is
/// rehashed (growth, shrink, `reserve`, `shrink_to_fit`, `clear`). Stale
/// handles resolve to `None`; a handle to an erased element may resolve to
/// a later insertion that reused its slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle {
    slot: usize,
    epoch: u64,
}

/// Elements equal to a probe: at most one, since keys are unique.
///
/// [`EqualRange::handle`] is the start of the range, or `None` when the
/// range is empty (the end position).
#[derive(Clone, Debug)]
pub struct EqualRange<T> {
    handle: Option<Handle>,
    item: Option<T>,
}

impl<T> EqualRange<T> {
    pub(crate) fn new(found: Option<(Handle, T)>) -> Self {
        match found {
            Some((handle, item)) => Self {
                handle: Some(handle),
                item: Some(item),
            },
            None => Self {
                handle: None,
                item: None,
            },
        }
    }

    pub fn handle(&self) -> Option<Handle> {
        self.handle
    }

    pub fn is_empty(&self) -> bool {
        self.item.is_none()
    }
}

impl<T> Iterator for EqualRange<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.item.take()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::from(self.item.is_some());
        (n, Some(n))
    }
}

impl<T> ExactSizeIterator for EqualRange<T> {}
impl<T> FusedIterator for EqualRange<T> {}

#[derive(Clone, Debug)]
pub(crate) struct DenseTable<K, V, H, E, X> {
    raw: RawTable<(K, V)>,
    hasher: H,
    key_eq: E,
    extractor: X,
    sentinels: Sentinels<K>,
}

impl<K, V, H, E, X> DenseTable<K, V, H, E, X> {
    pub(crate) fn new(settings: Settings, hasher: H, key_eq: E, extractor: X) -> Self {
        Self::with_sentinels(settings, hasher, key_eq, extractor, Sentinels::unset())
    }

    pub(crate) fn with_sentinels(
        settings: Settings,
        hasher: H,
        key_eq: E,
        extractor: X,
        sentinels: Sentinels<K>,
    ) -> Self {
        Self {
            raw: RawTable::new(settings),
            hasher,
            key_eq,
            extractor,
            sentinels,
        }
    }

    pub(crate) fn hasher(&self) -> &H {
        &self.hasher
    }

    pub(crate) fn key_eq(&self) -> &E {
        &self.key_eq
    }

    pub(crate) fn extractor(&self) -> &X {
        &self.extractor
    }

    pub(crate) fn settings(&self) -> &Settings {
        self.raw.settings()
    }

    pub(crate) fn empty_key(&self) -> Option<&K> {
        self.sentinels.empty()
    }

    pub(crate) fn deleted_key(&self) -> Option<&K> {
        self.sentinels.deleted()
    }

    #[track_caller]
    pub(crate) fn set_empty_key(&mut self, key: K)
    where
        E: KeyEq<K, K>,
    {
        self.sentinels.set_empty(&self.key_eq, key);
        debug!("dense table empty key configured");
    }

    /// Panics if a live element equals `key`. Existing tombstones are
    /// purged so the new deleted key starts from a clean table.
    #[track_caller]
    pub(crate) fn set_deleted_key(&mut self, key: K)
    where
        H: KeyHash<K>,
        E: KeyEq<K, K>,
    {
        assert!(
            self.raw.len() == 0 || self.find_index(&key).is_none(),
            "deleted key equals a live element"
        );
        self.raw.purge_tombstones();
        self.sentinels.set_deleted(&self.key_eq, key);
        debug!(
            "dense table deleted key configured ({} live, capacity {})",
            self.raw.len(),
            self.raw.capacity()
        );
    }

    pub(crate) fn clear_deleted_key(&mut self) -> Option<K> {
        self.raw.purge_tombstones();
        let old = self.sentinels.clear_deleted();
        if old.is_some() {
            debug!("dense table deleted key cleared");
        }
        old
    }

    pub(crate) fn len(&self) -> usize {
        self.raw.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    pub(crate) fn tombstones(&self) -> usize {
        self.raw.tombstones()
    }

    #[inline]
    fn handle(&self, slot: usize) -> Handle {
        Handle {
            slot,
            epoch: self.raw.epoch(),
        }
    }

    #[inline]
    fn resolve(&self, handle: Handle) -> Option<usize> {
        (handle.epoch == self.raw.epoch()).then_some(handle.slot)
    }

    /// Slot index of the element equal to `q`. Never builds a `K`.
    #[track_caller]
    pub(crate) fn find_index<Q>(&self, q: &Q) -> Option<usize>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        self.sentinels.assert_ready();
        if self.raw.len() == 0 {
            return None;
        }
        let hash = self.hasher.hash_key(q);
        self.raw.find(hash, |(k, _)| self.key_eq.key_eq(q, k))
    }

    #[track_caller]
    pub(crate) fn find<Q>(&self, q: &Q) -> Option<Handle>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        self.find_index(q).map(|slot| self.handle(slot))
    }

    #[track_caller]
    pub(crate) fn get<Q>(&self, q: &Q) -> Option<&(K, V)>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        let index = self.find_index(q)?;
        self.raw.get(index)
    }

    #[track_caller]
    pub(crate) fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut (K, V)>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        let index = self.find_index(q)?;
        self.raw.get_mut(index)
    }

    #[track_caller]
    pub(crate) fn equal_range<Q>(&self, q: &Q) -> Option<(Handle, &(K, V))>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        let index = self.find_index(q)?;
        Some((self.handle(index), self.raw.get(index)?))
    }

    pub(crate) fn by_handle(&self, handle: Handle) -> Option<&(K, V)> {
        self.raw.get(self.resolve(handle)?)
    }

    pub(crate) fn by_handle_mut(&mut self, handle: Handle) -> Option<&mut (K, V)> {
        let index = self.resolve(handle)?;
        self.raw.get_mut(index)
    }

    /// Remove the element equal to `q`, handing it back.
    #[track_caller]
    pub(crate) fn erase<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        Q: ?Sized,
        H: KeyHash<Q>,
        E: KeyEq<Q, K>,
    {
        self.sentinels.assert_erasable();
        let index = self.find_index(q)?;
        self.raw.erase(index)
    }

    #[track_caller]
    pub(crate) fn erase_handle(&mut self, handle: Handle) -> Option<(K, V)> {
        self.sentinels.assert_erasable();
        let index = self.resolve(handle)?;
        self.raw.erase(index)
    }

    /// Insert unless an equal key is present.
    ///
    /// The argument is probed first; on a hit it is dropped unused and
    /// `value` is never called. On a miss the key is materialized exactly
    /// once. Returns the slot index and whether an insertion happened.
    #[track_caller]
    pub(crate) fn emplace_index<A, F>(&mut self, arg: A, value: F) -> (usize, bool)
    where
        A: KeyArg<K, X>,
        H: KeyHash<A::Probe>,
        E: KeyEq<A::Probe, K>,
        F: FnOnce() -> V,
    {
        self.sentinels.assert_ready();
        let (hash, hint) = {
            let probe = arg.probe();
            let hash = self.hasher.hash_key(probe);
            match self
                .raw
                .find_or_vacant(hash, |(k, _)| self.key_eq.key_eq(probe, k))
            {
                Probe::Found(index) => return (index, false),
                Probe::Vacant(index) => {
                    self.sentinels.assert_not_sentinel(&self.key_eq, probe);
                    (hash, Some(index))
                }
                Probe::Exhausted => {
                    self.sentinels.assert_not_sentinel(&self.key_eq, probe);
                    (hash, None)
                }
            }
        };
        let key = arg.materialize(&self.extractor);
        let index = self.raw.insert(hash, hint, (key, value()));
        (index, true)
    }

    #[track_caller]
    pub(crate) fn emplace<A, F>(&mut self, arg: A, value: F) -> (Handle, bool)
    where
        A: KeyArg<K, X>,
        H: KeyHash<A::Probe>,
        E: KeyEq<A::Probe, K>,
        F: FnOnce() -> V,
    {
        let (index, inserted) = self.emplace_index(arg, value);
        (self.handle(index), inserted)
    }

    /// Mutable access to the pair at a slot index returned by
    /// `emplace_index`, before any other mutation.
    pub(crate) fn slot_mut(&mut self, index: usize) -> &mut (K, V) {
        self.raw
            .get_mut(index)
            .expect("emplace_index returns an occupied slot")
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.raw.reserve(additional);
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.raw.shrink_to_fit();
    }

    pub(crate) fn clear(&mut self) {
        self.raw.clear();
    }

    pub(crate) fn clear_no_resize(&mut self) {
        self.raw.clear_no_resize();
    }

    #[track_caller]
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&K, &mut V) -> bool) {
        if self.raw.len() == 0 {
            return;
        }
        self.sentinels.assert_erasable();
        self.raw.retain(|(k, v)| keep(k, v));
    }

    pub(crate) fn iter(&self) -> RawIter<'_, (K, V)> {
        self.raw.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> RawIterMut<'_, (K, V)> {
        self.raw.iter_mut()
    }

    pub(crate) fn into_raw(self) -> RawTable<(K, V)> {
        self.raw
    }

    /// Same live contents, compared by lookup in `other`.
    pub(crate) fn same_entries(&self, other: &Self) -> bool
    where
        V: PartialEq,
        H: KeyHash<K>,
        E: KeyEq<K, K>,
    {
        if self.len() != other.len() {
            return false;
        }
        if self.len() == 0 {
            return true;
        }
        self.iter()
            .all(|(_, (k, v))| other.get(k).is_some_and(|(_, ov)| ov == v))
    }
}
