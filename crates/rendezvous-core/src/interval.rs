//! Time-range interval algebra.
//!
//! All comparisons use closed-interval semantics: a range `[start, end]`
//! includes both endpoints. Two ranges that merely touch (`a.end == b.start`)
//! therefore overlap, and their intersection is the zero-length range at the
//! shared instant. This is intentional: it lets a meeting ending at 10:00 fit
//! inside availability that ends at 10:00.
//!
//! Nothing here validates `start < end`. Degenerate ranges flow through every
//! operation and produce degenerate results; rejecting them is the job of
//! whoever builds ranges from caller input (see [`crate::service`]).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A span on the UTC timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// True iff the two closed ranges share at least one instant.
    ///
    /// `a.start <= b.end && a.end >= b.start`. Touching endpoints count.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// True iff `other` lies entirely inside `self`, endpoints inclusive.
    pub fn contains(&self, other: &TimeRange) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    /// `end - start`. Zero or negative for degenerate ranges.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// The shared portion of two ranges, or `None` when they do not overlap.
    pub fn intersect(&self, other: &TimeRange) -> Option<TimeRange> {
        if !self.overlaps(other) {
            return None;
        }
        Some(TimeRange {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }
}

/// Multi-way intersection of `ranges`, folded left to right.
///
/// The accumulator starts as `[ranges[0]]`. Each later range replaces it with
/// every successful pairwise [`TimeRange::intersect`] against the current
/// accumulator, dropping pairs that do not overlap. Once the accumulator is
/// empty the fold stops.
///
/// - `[]` returns `[]`.
/// - `[r]` returns `[r]` untouched.
pub fn intersect_all(ranges: &[TimeRange]) -> Vec<TimeRange> {
    let (first, rest) = match ranges.split_first() {
        Some(split) => split,
        None => return Vec::new(),
    };
    if rest.is_empty() {
        return ranges.to_vec();
    }

    let mut common = vec![*first];
    for next in rest {
        common = common.iter().filter_map(|c| c.intersect(next)).collect();
        if common.is_empty() {
            break;
        }
    }
    common
}

/// Keep only ranges whose duration is at least `min_duration`.
///
/// Order is preserved and duplicates are kept.
pub fn filter_by_min_duration(ranges: &[TimeRange], min_duration: Duration) -> Vec<TimeRange> {
    ranges
        .iter()
        .filter(|r| r.duration() >= min_duration)
        .copied()
        .collect()
}

/// Common availability across all `ranges` that is long enough to hold a
/// meeting of `min_duration`.
pub fn common_slots(ranges: &[TimeRange], min_duration: Duration) -> Vec<TimeRange> {
    if ranges.is_empty() {
        return Vec::new();
    }
    filter_by_min_duration(&intersect_all(ranges), min_duration)
}
