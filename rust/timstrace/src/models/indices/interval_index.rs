use ordered_float::OrderedFloat;
use serde::{
    Deserialize,
    Serialize,
};
use std::collections::BTreeMap;
use std::ops::Bound::{
    Excluded,
    Unbounded,
};

/// Open m/z interval `(lower, upper)`.
///
/// Both bounds are excluded, so two intervals sharing a bound do not
/// overlap, and a value sitting exactly on a shared bound belongs to neither.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MzInterval {
    pub lower: f64,
    pub upper: f64,
}

impl MzInterval {
    pub fn contains(&self, mz: f64) -> bool {
        self.lower < mz && mz < self.upper
    }

    pub fn overlaps(&self, other: &MzInterval) -> bool {
        self.lower < other.upper && other.lower < self.upper
    }
}

/// Set of pairwise disjoint open intervals, each mapped to a value.
///
/// Intervals are keyed by their lower bound, which is unique since
/// non-empty disjoint open intervals cannot start at the same value.
/// All lookups are a single range query on the underlying tree.
#[derive(Debug, Clone)]
pub struct IntervalIndex<V> {
    intervals: BTreeMap<OrderedFloat<f64>, (f64, V)>,
}

impl<V> Default for IntervalIndex<V> {
    fn default() -> Self {
        Self {
            intervals: BTreeMap::new(),
        }
    }
}

impl<V: Copy> IntervalIndex<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// The interval strictly containing `mz`, if any.
    pub fn containing(&self, mz: f64) -> Option<(MzInterval, V)> {
        self.nearest_below(mz)
            .filter(|(interval, _)| interval.contains(mz))
    }

    /// Interval with the largest lower bound strictly below `mz`.
    ///
    /// If `mz` is not contained in any interval, the returned interval
    /// lies entirely at or below `mz`.
    pub fn nearest_below(&self, mz: f64) -> Option<(MzInterval, V)> {
        self.intervals
            .range((Unbounded, Excluded(OrderedFloat(mz))))
            .next_back()
            .map(Self::unpack)
    }

    /// Interval with the smallest lower bound at or above `mz`.
    pub fn nearest_above(&self, mz: f64) -> Option<(MzInterval, V)> {
        self.intervals
            .range(OrderedFloat(mz)..)
            .next()
            .map(Self::unpack)
    }

    /// Registers a new interval.
    ///
    /// Callers are responsible for disjointness, it is only checked in
    /// debug builds.
    pub fn insert(&mut self, interval: MzInterval, value: V) {
        debug_assert!(interval.lower < interval.upper, "{interval:?} is empty");
        debug_assert!(
            self.nearest_below(interval.upper)
                .is_none_or(|(other, _)| !other.overlaps(&interval)),
            "{interval:?} overlaps an existing interval"
        );
        self.intervals
            .insert(OrderedFloat(interval.lower), (interval.upper, value));
    }

    /// Intervals in ascending m/z order.
    pub fn iter(&self) -> impl Iterator<Item = (MzInterval, V)> + '_ {
        self.intervals.iter().map(Self::unpack)
    }

    fn unpack((lower, (upper, value)): (&OrderedFloat<f64>, &(f64, V))) -> (MzInterval, V) {
        (
            MzInterval {
                lower: lower.0,
                upper: *upper,
            },
            *value,
        )
    }
}
