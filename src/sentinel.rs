//! Empty-key and Deleted-key configuration of an explicit dense table.
//!
//! Slot state is tracked by the slots themselves; the sentinel keys are
//! the table's contract with its caller. The empty key must be set before
//! any lookup or insertion and the deleted key before any erase, the two
//! must differ, and neither may ever be stored as a live key.

use crate::equivalence::KeyEq;

#[derive(Clone, Debug)]
pub(crate) struct Sentinels<K> {
    empty: Option<K>,
    deleted: Option<K>,
}

impl<K> Sentinels<K> {
    pub(crate) const fn unset() -> Self {
        Self {
            empty: None,
            deleted: None,
        }
    }

    /// Both sentinels preset, skipping the distinctness check. The caller
    /// guarantees the two keys differ under its equality policy.
    pub(crate) const fn preset(empty: K, deleted: K) -> Self {
        Self {
            empty: Some(empty),
            deleted: Some(deleted),
        }
    }

    pub(crate) fn empty(&self) -> Option<&K> {
        self.empty.as_ref()
    }

    pub(crate) fn deleted(&self) -> Option<&K> {
        self.deleted.as_ref()
    }

    #[inline]
    #[track_caller]
    pub(crate) fn assert_ready(&self) {
        assert!(
            self.empty.is_some(),
            "dense table used before set_empty_key"
        );
    }

    #[inline]
    #[track_caller]
    pub(crate) fn assert_erasable(&self) {
        self.assert_ready();
        assert!(
            self.deleted.is_some(),
            "dense table erase before set_deleted_key"
        );
    }

    /// Panics if `probe` equals a configured sentinel.
    #[track_caller]
    pub(crate) fn assert_not_sentinel<Q, E>(&self, eq: &E, probe: &Q)
    where
        Q: ?Sized,
        E: KeyEq<Q, K>,
    {
        assert!(
            !self.empty.as_ref().is_some_and(|s| eq.key_eq(probe, s)),
            "inserting the empty key into a dense table"
        );
        assert!(
            !self.deleted.as_ref().is_some_and(|s| eq.key_eq(probe, s)),
            "inserting the deleted key into a dense table"
        );
    }

    #[track_caller]
    pub(crate) fn set_empty<E>(&mut self, eq: &E, key: K)
    where
        E: KeyEq<K, K>,
    {
        assert!(self.empty.is_none(), "set_empty_key called twice");
        assert!(
            !self.deleted.as_ref().is_some_and(|d| eq.key_eq(&key, d)),
            "empty key must differ from the deleted key"
        );
        self.empty = Some(key);
    }

    #[track_caller]
    pub(crate) fn set_deleted<E>(&mut self, eq: &E, key: K)
    where
        E: KeyEq<K, K>,
    {
        assert!(
            !self.empty.as_ref().is_some_and(|e| eq.key_eq(&key, e)),
            "deleted key must differ from the empty key"
        );
        self.deleted = Some(key);
    }

    pub(crate) fn clear_deleted(&mut self) -> Option<K> {
        self.deleted.take()
    }
}
