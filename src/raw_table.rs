//! RawTable: flat open-addressing storage with Empty/Deleted/Occupied slots.
//!
//! The table knows nothing about keys. Callers pass a precomputed hash and
//! an equality closure; each occupied slot caches the hash it was inserted
//! with, so a rehash never calls back into user code.

use crate::settings::Settings;
use core::iter::{Enumerate, FusedIterator};
use core::mem;

#[derive(Clone, Debug)]
pub(crate) enum Slot<T> {
    Empty,
    Deleted,
    Occupied { hash: u64, elem: T },
}

impl<T> Slot<T> {
    #[inline]
    fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied { .. })
    }
}

/// Outcome of a probe that may be followed by an insertion.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Probe {
    /// An occupied slot matched.
    Found(usize),
    /// No match; the first Deleted-or-Empty slot on the probe path.
    Vacant(usize),
    /// No match and no free slot (unallocated table).
    Exhausted,
}

/// Triangular probe sequence over a power-of-two capacity. Visits every
/// slot exactly once.
struct ProbeSeq {
    pos: usize,
    stride: usize,
    mask: usize,
    remaining: usize,
}

impl Iterator for ProbeSeq {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let pos = self.pos;
        self.remaining -= 1;
        self.stride += 1;
        self.pos = (self.pos + self.stride) & self.mask;
        Some(pos)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct RawTable<T> {
    slots: Vec<Slot<T>>,
    len: usize,
    deleted: usize,
    epoch: u64,
    consider_shrink: bool,
    settings: Settings,
}

impl<T> RawTable<T> {
    pub(crate) fn new(settings: Settings) -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
            deleted: 0,
            epoch: 0,
            consider_shrink: false,
            settings,
        }
    }

    fn empty_slots(capacity: usize) -> Vec<Slot<T>> {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || Slot::Empty);
        slots
    }

    #[inline]
    fn probe_seq(&self, hash: u64) -> ProbeSeq {
        let capacity = self.slots.len();
        ProbeSeq {
            pos: (hash as usize) & capacity.wrapping_sub(1),
            stride: 0,
            mask: capacity.wrapping_sub(1),
            remaining: capacity,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn tombstones(&self) -> usize {
        self.deleted
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.epoch
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn find(&self, hash: u64, mut eq: impl FnMut(&T) -> bool) -> Option<usize> {
        for index in self.probe_seq(hash) {
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Deleted => {}
                Slot::Occupied { hash: h, elem } => {
                    if *h == hash && eq(elem) {
                        return Some(index);
                    }
                }
            }
        }
        None
    }

    pub(crate) fn find_or_vacant(&self, hash: u64, mut eq: impl FnMut(&T) -> bool) -> Probe {
        let mut first_tombstone = None;
        for index in self.probe_seq(hash) {
            match &self.slots[index] {
                Slot::Empty => return Probe::Vacant(first_tombstone.unwrap_or(index)),
                Slot::Deleted => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some(index);
                    }
                }
                Slot::Occupied { hash: h, elem } => {
                    if *h == hash && eq(elem) {
                        return Probe::Found(index);
                    }
                }
            }
        }
        first_tombstone.map_or(Probe::Exhausted, Probe::Vacant)
    }

    fn first_vacant(&self, hash: u64) -> Option<usize> {
        self.probe_seq(hash)
            .find(|&index| !self.slots[index].is_occupied())
    }

    fn needs_maintenance(&self, additional: usize) -> bool {
        let capacity = self.capacity();
        if capacity == 0 {
            return true;
        }
        let needed = self.len + additional;
        if self.len + self.deleted + additional > self.settings.grow_threshold(capacity) {
            return true;
        }
        self.consider_shrink
            && capacity > self.settings.get_starting_buckets()
            && needed < self.settings.shrink_threshold(capacity)
    }

    fn maintain(&mut self, additional: usize) {
        let target = self.settings.resize_target(
            self.capacity(),
            self.len + additional,
            self.consider_shrink,
        );
        self.consider_shrink = false;
        self.rehash(target);
    }

    /// Write `elem` into the vacancy `hint` (as returned by
    /// `find_or_vacant`) or, when maintenance is due, rehash first and
    /// probe again. Returns the slot index written.
    pub(crate) fn insert(&mut self, hash: u64, hint: Option<usize>, elem: T) -> usize {
        let index = match hint {
            Some(index) if !self.needs_maintenance(1) => index,
            _ => {
                self.maintain(1);
                self.first_vacant(hash)
                    .expect("rehash must leave a vacant slot on every probe path")
            }
        };
        debug_assert!(!self.slots[index].is_occupied());
        if matches!(self.slots[index], Slot::Deleted) {
            self.deleted -= 1;
        }
        self.slots[index] = Slot::Occupied { hash, elem };
        self.len += 1;
        index
    }

    /// Turn an occupied slot into a tombstone and hand back its element.
    pub(crate) fn erase(&mut self, index: usize) -> Option<T> {
        match mem::replace(&mut self.slots[index], Slot::Deleted) {
            Slot::Occupied { elem, .. } => {
                self.len -= 1;
                self.deleted += 1;
                self.consider_shrink = true;
                Some(elem)
            }
            other => {
                self.slots[index] = other;
                None
            }
        }
    }

    /// Move every live element into a fresh slot vector of `capacity`
    /// buckets, dropping all tombstones.
    pub(crate) fn rehash(&mut self, capacity: usize) {
        assert!(
            capacity.is_power_of_two() && self.len < capacity,
            "rehash target {capacity} cannot hold {} elements",
            self.len
        );
        let old = mem::replace(&mut self.slots, Self::empty_slots(capacity));
        let old_capacity = old.len();
        let dropped = mem::replace(&mut self.deleted, 0);
        self.consider_shrink = false;
        for slot in old {
            if let Slot::Occupied { hash, elem } = slot {
                let index = self
                    .first_vacant(hash)
                    .expect("rehash target has room for every live element");
                self.slots[index] = Slot::Occupied { hash, elem };
            }
        }
        self.epoch = self.epoch.wrapping_add(1);
        log::trace!(
            "dense table rehash: {old_capacity} -> {capacity} buckets, {} live, {dropped} tombstones dropped",
            self.len
        );
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        let needed = self.len + additional;
        if self.capacity() != 0
            && self.len + self.deleted + additional <= self.settings.grow_threshold(self.capacity())
        {
            return;
        }
        let target = self
            .settings
            .buckets_for(needed)
            .max(self.capacity())
            .max(self.settings.get_starting_buckets());
        self.rehash(target);
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        if self.len == 0 {
            self.clear();
            return;
        }
        let target = self.settings.buckets_for(self.len);
        if target < self.capacity() || self.deleted > 0 {
            self.rehash(target.min(self.capacity()));
        }
    }

    pub(crate) fn purge_tombstones(&mut self) {
        if self.deleted > 0 {
            self.rehash(self.capacity());
        }
    }

    /// Drop every element and release the slot storage.
    pub(crate) fn clear(&mut self) {
        self.slots = Vec::new();
        self.len = 0;
        self.deleted = 0;
        self.consider_shrink = false;
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Drop every element, keeping the current capacity.
    pub(crate) fn clear_no_resize(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Empty;
        }
        self.len = 0;
        self.deleted = 0;
        self.consider_shrink = false;
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Tombstone every element for which `keep` returns false.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&mut T) -> bool) {
        for index in 0..self.slots.len() {
            let drop_it = match &mut self.slots[index] {
                Slot::Occupied { elem, .. } => !keep(elem),
                _ => false,
            };
            if drop_it {
                let _ = self.erase(index);
            }
        }
    }

    #[inline]
    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        match self.slots.get(index)? {
            Slot::Occupied { elem, .. } => Some(elem),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        match self.slots.get_mut(index)? {
            Slot::Occupied { elem, .. } => Some(elem),
            _ => None,
        }
    }

    pub(crate) fn iter(&self) -> RawIter<'_, T> {
        RawIter {
            slots: self.slots.iter().enumerate(),
            remaining: self.len,
        }
    }

    pub(crate) fn iter_mut(&mut self) -> RawIterMut<'_, T> {
        RawIterMut {
            slots: self.slots.iter_mut().enumerate(),
            remaining: self.len,
        }
    }

    /// Count slots by state: `(occupied, deleted, empty)`.
    #[cfg(test)]
    pub(crate) fn slot_census(&self) -> (usize, usize, usize) {
        self.slots
            .iter()
            .fold((0, 0, 0), |(o, d, e), slot| match slot {
                Slot::Occupied { .. } => (o + 1, d, e),
                Slot::Deleted => (o, d + 1, e),
                Slot::Empty => (o, d, e + 1),
            })
    }
}

/// Iterator over `(slot index, element)` for occupied slots.
pub(crate) struct RawIter<'a, T> {
    slots: Enumerate<core::slice::Iter<'a, Slot<T>>>,
    remaining: usize,
}

impl<'a, T> Clone for RawIter<'a, T> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for RawIter<'a, T> {
    type Item = (usize, &'a T);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for (index, slot) in self.slots.by_ref() {
            if let Slot::Occupied { elem, .. } = slot {
                self.remaining -= 1;
                return Some((index, elem));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for RawIter<'_, T> {}
impl<T> FusedIterator for RawIter<'_, T> {}

pub(crate) struct RawIterMut<'a, T> {
    slots: Enumerate<core::slice::IterMut<'a, Slot<T>>>,
    remaining: usize,
}

impl<'a, T> Iterator for RawIterMut<'a, T> {
    type Item = (usize, &'a mut T);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for (index, slot) in self.slots.by_ref() {
            if let Slot::Occupied { elem, .. } = slot {
                self.remaining -= 1;
                return Some((index, elem));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for RawIterMut<'_, T> {}
impl<T> FusedIterator for RawIterMut<'_, T> {}

/// Owning iterator over the live elements.
pub(crate) struct RawIntoIter<T> {
    slots: std::vec::IntoIter<Slot<T>>,
    remaining: usize,
}

impl<T> Iterator for RawIntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        for slot in self.slots.by_ref() {
            if let Slot::Occupied { elem, .. } = slot {
                self.remaining -= 1;
                return Some(elem);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for RawIntoIter<T> {}
impl<T> FusedIterator for RawIntoIter<T> {}

impl<T> IntoIterator for RawTable<T> {
    type Item = T;
    type IntoIter = RawIntoIter<T>;

    fn into_iter(self) -> RawIntoIter<T> {
        RawIntoIter {
            remaining: self.len,
            slots: self.slots.into_iter(),
        }
    }
}
