//! Tests for the time-range interval algebra.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rendezvous_core::interval::{common_slots, filter_by_min_duration, intersect_all, TimeRange};

/// Helper to build an instant on 2026-03-02 from hour/minute.
fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, hour, min, 0).unwrap()
}

fn range(start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> TimeRange {
    TimeRange::new(at(start_hour, start_min), at(end_hour, end_min))
}

// ── overlaps ────────────────────────────────────────────────────────────────

#[test]
fn overlapping_ranges_detected() {
    let a = range(9, 0, 10, 0);
    let b = range(9, 30, 10, 30);
    assert!(a.overlaps(&b));
    assert!(b.overlaps(&a));
}

#[test]
fn disjoint_ranges_do_not_overlap() {
    let a = range(9, 0, 10, 0);
    let b = range(11, 0, 12, 0);
    assert!(!a.overlaps(&b));
    assert!(!b.overlaps(&a));
}

#[test]
fn touching_endpoints_count_as_overlap() {
    // Closed intervals: 09:00-10:00 and 10:00-11:00 share the instant 10:00.
    let a = range(9, 0, 10, 0);
    let b = range(10, 0, 11, 0);
    assert!(a.overlaps(&b));
    assert!(b.overlaps(&a));
}

#[test]
fn one_minute_gap_is_not_overlap() {
    let a = range(9, 0, 10, 0);
    let b = range(10, 1, 11, 0);
    assert!(!a.overlaps(&b));
}

// ── contains ────────────────────────────────────────────────────────────────

#[test]
fn contains_is_inclusive_on_both_ends() {
    let outer = range(9, 0, 12, 0);
    assert!(outer.contains(&range(9, 0, 12, 0)));
    assert!(outer.contains(&range(9, 0, 10, 0)));
    assert!(outer.contains(&range(11, 0, 12, 0)));
    assert!(outer.contains(&range(10, 0, 11, 0)));
}

#[test]
fn contains_rejects_partial_coverage() {
    let outer = range(9, 0, 12, 0);
    assert!(!outer.contains(&range(8, 59, 10, 0)));
    assert!(!outer.contains(&range(11, 0, 12, 1)));
    assert!(!range(10, 0, 11, 0).contains(&outer));
}

// ── duration ────────────────────────────────────────────────────────────────

#[test]
fn duration_of_normal_range() {
    assert_eq!(range(9, 0, 10, 30).duration(), Duration::minutes(90));
}

#[test]
fn duration_of_empty_and_inverted_ranges() {
    assert_eq!(range(9, 0, 9, 0).duration(), Duration::zero());
    assert_eq!(range(10, 0, 9, 0).duration(), Duration::minutes(-60));
}

// ── intersect ───────────────────────────────────────────────────────────────

#[test]
fn intersect_returns_shared_portion() {
    let a = range(9, 0, 11, 0);
    let b = range(10, 0, 12, 0);
    assert_eq!(a.intersect(&b), Some(range(10, 0, 11, 0)));
    assert_eq!(b.intersect(&a), Some(range(10, 0, 11, 0)));
}

#[test]
fn intersect_of_nested_ranges_is_inner_range() {
    let outer = range(8, 0, 17, 0);
    let inner = range(12, 0, 13, 0);
    assert_eq!(outer.intersect(&inner), Some(inner));
}

#[test]
fn intersect_of_disjoint_ranges_is_none() {
    assert_eq!(range(9, 0, 10, 0).intersect(&range(14, 0, 15, 0)), None);
}

#[test]
fn intersect_is_contained_by_both_inputs() {
    let a = range(9, 15, 11, 45);
    let b = range(10, 30, 13, 0);
    let shared = a.intersect(&b).unwrap();
    assert!(a.contains(&shared));
    assert!(b.contains(&shared));
}

// ── intersect_all ───────────────────────────────────────────────────────────

#[test]
fn intersect_all_of_nothing_is_empty() {
    assert!(intersect_all(&[]).is_empty());
}

#[test]
fn intersect_all_of_one_range_returns_it_unchanged() {
    let r = range(9, 0, 17, 0);
    assert_eq!(intersect_all(&[r]), vec![r]);
}

#[test]
fn intersect_all_of_one_degenerate_range_returns_it_unchanged() {
    let r = range(17, 0, 9, 0);
    assert_eq!(intersect_all(&[r]), vec![r]);
}

#[test]
fn intersect_all_narrows_across_three_ranges() {
    let ranges = [range(8, 0, 14, 0), range(10, 0, 16, 0), range(9, 0, 12, 0)];
    assert_eq!(intersect_all(&ranges), vec![range(10, 0, 12, 0)]);
}

#[test]
fn intersect_all_matches_pairwise_left_fold() {
    let r1 = range(8, 0, 14, 0);
    let r2 = range(10, 0, 16, 0);
    let r3 = range(9, 0, 12, 0);
    let folded = r1.intersect(&r2).and_then(|x| x.intersect(&r3)).unwrap();
    assert_eq!(intersect_all(&[r1, r2, r3]), vec![folded]);
}

#[test]
fn intersect_all_empty_when_any_pair_is_disjoint() {
    let ranges = [range(8, 0, 10, 0), range(11, 0, 12, 0), range(8, 0, 12, 0)];
    assert!(intersect_all(&ranges).is_empty());
}

#[test]
fn intersect_all_keeps_touching_instant() {
    let ranges = [range(8, 0, 10, 0), range(10, 0, 12, 0)];
    assert_eq!(intersect_all(&ranges), vec![range(10, 0, 10, 0)]);
}

// ── filter_by_min_duration ──────────────────────────────────────────────────

#[test]
fn filter_keeps_only_long_enough_ranges() {
    let short = range(9, 0, 9, 30);
    let long = range(10, 0, 11, 30);
    assert_eq!(
        filter_by_min_duration(&[short, long], Duration::minutes(60)),
        vec![long]
    );
}

#[test]
fn filter_threshold_is_inclusive() {
    let exact = range(9, 0, 10, 0);
    assert_eq!(
        filter_by_min_duration(&[exact], Duration::minutes(60)),
        vec![exact]
    );
}

#[test]
fn filter_preserves_order_and_duplicates() {
    let a = range(13, 0, 15, 0);
    let b = range(8, 0, 10, 0);
    let result = filter_by_min_duration(&[a, b, a], Duration::minutes(30));
    assert_eq!(result, vec![a, b, a]);
}

// ── common_slots ────────────────────────────────────────────────────────────

#[test]
fn common_slots_of_nothing_is_empty() {
    assert!(common_slots(&[], Duration::minutes(30)).is_empty());
}

#[test]
fn common_slots_drops_intersection_shorter_than_meeting() {
    // Shared window 10:00-10:45 cannot hold a one-hour meeting.
    let ranges = [range(9, 0, 10, 45), range(10, 0, 12, 0)];
    assert!(common_slots(&ranges, Duration::minutes(60)).is_empty());
    assert_eq!(
        common_slots(&ranges, Duration::minutes(45)),
        vec![range(10, 0, 10, 45)]
    );
}
