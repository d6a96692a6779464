//! Resizing parameters for the dense tables.

/// Load-factor and bucket-count configuration.
///
/// A table grows when `occupied + deleted` would exceed
/// `max_load_factor * capacity` and, after erasures, shrinks on the next
/// insertion that finds the live count below `min_load_factor * capacity`.
/// Capacities are always powers of two.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settings {
    max_load: f32,
    min_load: f32,
    min_buckets: usize,
    starting_buckets: usize,
}

impl Settings {
    pub const DEFAULT_MAX_LOAD: f32 = 0.5;
    pub const DEFAULT_MIN_LOAD: f32 = 0.2;
    pub const MIN_BUCKETS: usize = 4;
    pub const DEFAULT_STARTING_BUCKETS: usize = 32;

    pub const fn new() -> Self {
        Self {
            max_load: Self::DEFAULT_MAX_LOAD,
            min_load: Self::DEFAULT_MIN_LOAD,
            min_buckets: Self::MIN_BUCKETS,
            starting_buckets: Self::DEFAULT_STARTING_BUCKETS,
        }
    }

    /// Set the growth threshold. Panics unless `0 < factor < 1` and
    /// `factor` is above the current shrink threshold.
    pub fn max_load_factor(mut self, factor: f32) -> Self {
        assert!(
            factor > 0.0 && factor < 1.0,
            "max_load_factor must be in (0, 1), got {factor}"
        );
        assert!(
            factor > self.min_load,
            "max_load_factor ({factor}) must exceed min_load_factor ({})",
            self.min_load
        );
        self.max_load = factor;
        self
    }

    /// Set the shrink threshold. `0.0` disables shrinking.
    pub fn min_load_factor(mut self, factor: f32) -> Self {
        assert!(
            factor >= 0.0 && factor < self.max_load,
            "min_load_factor must be in [0, max_load_factor), got {factor}"
        );
        self.min_load = factor;
        self
    }

    /// Bucket count of the first allocation; also the floor for shrinking.
    pub fn starting_buckets(mut self, buckets: usize) -> Self {
        assert!(buckets > 0, "starting_buckets must be non-zero");
        self.starting_buckets = buckets.next_power_of_two().max(self.min_buckets);
        self
    }

    pub fn get_max_load_factor(&self) -> f32 {
        self.max_load
    }

    pub fn get_min_load_factor(&self) -> f32 {
        self.min_load
    }

    pub fn get_starting_buckets(&self) -> usize {
        self.starting_buckets
    }

    /// Number of occupied-or-deleted slots `capacity` buckets may hold.
    #[inline]
    pub(crate) fn grow_threshold(&self, capacity: usize) -> usize {
        (capacity as f64 * self.max_load as f64) as usize
    }

    #[inline]
    pub(crate) fn shrink_threshold(&self, capacity: usize) -> usize {
        (capacity as f64 * self.min_load as f64) as usize
    }

    /// Smallest power-of-two capacity whose growth threshold admits `n`
    /// elements.
    pub(crate) fn buckets_for(&self, n: usize) -> usize {
        let mut buckets = self.min_buckets;
        while self.grow_threshold(buckets) < n {
            buckets = buckets
                .checked_mul(2)
                .expect("dense table capacity overflow");
        }
        buckets
    }

    /// Capacity for a maintenance rehash that must make room for `needed`
    /// live elements, starting from `current` buckets.
    pub(crate) fn resize_target(&self, current: usize, needed: usize, shrink: bool) -> usize {
        let mut target = if current == 0 {
            self.starting_buckets
        } else {
            current
        };
        if shrink && self.min_load > 0.0 {
            while target > self.starting_buckets && needed < self.shrink_threshold(target) {
                target /= 2;
            }
        }
        target.max(self.buckets_for(needed))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Settings;

    #[test]
    fn defaults_match_documented_values() {
        let s = Settings::default();
        assert_eq!(s.get_max_load_factor(), 0.5);
        assert_eq!(s.get_min_load_factor(), 0.2);
        assert_eq!(s.get_starting_buckets(), 32);
    }

    #[test]
    fn buckets_for_keeps_an_empty_slot() {
        let s = Settings::default();
        assert_eq!(s.buckets_for(0), 4);
        assert_eq!(s.buckets_for(2), 4);
        assert_eq!(s.buckets_for(3), 8);
        for n in 1..1000 {
            let b = s.buckets_for(n);
            assert!(b.is_power_of_two());
            assert!(s.grow_threshold(b) >= n);
            assert!(s.grow_threshold(b) < b);
        }
    }

    #[test]
    fn resize_target_grows_purges_and_shrinks() {
        let s = Settings::default();
        // First allocation uses the starting bucket count.
        assert_eq!(s.resize_target(0, 1, false), 32);
        // Over the high-water mark: double.
        assert_eq!(s.resize_target(32, 17, false), 64);
        // Tombstone-driven maintenance keeps the capacity.
        assert_eq!(s.resize_target(64, 10, false), 64);
        // Shrink halves while the live count stays under min_load.
        assert_eq!(s.resize_target(256, 3, true), 32);
        // Shrink disabled by flag.
        assert_eq!(s.resize_target(256, 3, false), 256);
    }

    #[test]
    fn zero_min_load_disables_shrink() {
        let s = Settings::new().min_load_factor(0.0);
        assert_eq!(s.resize_target(256, 1, true), 256);
    }

    #[test]
    fn starting_buckets_round_up() {
        let s = Settings::new().starting_buckets(100);
        assert_eq!(s.get_starting_buckets(), 128);
        let s = Settings::new().starting_buckets(1);
        assert_eq!(s.get_starting_buckets(), 4);
    }

    #[test]
    #[should_panic(expected = "max_load_factor")]
    fn rejects_full_load_factor() {
        let _ = Settings::new().max_load_factor(1.0);
    }

    #[test]
    #[should_panic(expected = "min_load_factor")]
    fn rejects_min_above_max() {
        let _ = Settings::new().min_load_factor(0.6);
    }
}
