//! Tests for overlap, containment, and conflict detection.

use chrono::{DateTime, Duration, TimeZone, Utc};
use slot_engine::busy::BusyInterval;
use slot_engine::interval::{contained_in, find_conflicts, overlaps, Interval};
use slot_engine::SlotError;

/// Helper to create an Interval from hour/minute ranges on 2026-03-16.
fn iv(start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> Interval {
    Interval::new(
        Utc.with_ymd_and_hms(2026, 3, 16, start_hour, start_min, 0)
            .unwrap(),
        Utc.with_ymd_and_hms(2026, 3, 16, end_hour, end_min, 0)
            .unwrap(),
    )
}

fn busy(start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> BusyInterval {
    let i = iv(start_hour, start_min, end_hour, end_min);
    BusyInterval::new(i.start, i.end)
}

// ── overlaps ────────────────────────────────────────────────────────────────

#[test]
fn touching_intervals_do_not_overlap() {
    // 09:00-10:00 and 10:00-11:00 share only the boundary instant.
    assert!(!overlaps(&iv(9, 0, 10, 0), &iv(10, 0, 11, 0)));
    assert!(!overlaps(&iv(10, 0, 11, 0), &iv(9, 0, 10, 0)));
}

#[test]
fn partial_overlap_detected_both_ways() {
    assert!(overlaps(&iv(9, 0, 10, 30), &iv(10, 0, 11, 0)));
    assert!(overlaps(&iv(10, 0, 11, 0), &iv(9, 0, 10, 30)));
}

#[test]
fn nested_interval_overlaps() {
    assert!(overlaps(&iv(9, 0, 12, 0), &iv(10, 0, 11, 0)));
    assert!(overlaps(&iv(10, 0, 11, 0), &iv(9, 0, 12, 0)));
}

#[test]
fn identical_intervals_overlap() {
    assert!(overlaps(&iv(9, 0, 10, 0), &iv(9, 0, 10, 0)));
}

#[test]
fn disjoint_intervals_do_not_overlap() {
    assert!(!overlaps(&iv(9, 0, 10, 0), &iv(11, 0, 12, 0)));
}

// ── contained_in ────────────────────────────────────────────────────────────

#[test]
fn containment_is_reflexive() {
    let a = iv(9, 0, 17, 0);
    assert!(contained_in(&a, &a));
}

#[test]
fn containment_accepts_touching_boundaries() {
    let outer = iv(9, 0, 17, 0);
    assert!(contained_in(&iv(9, 0, 9, 30), &outer));
    assert!(contained_in(&iv(16, 30, 17, 0), &outer));
}

#[test]
fn containment_rejects_extension_on_either_side() {
    let outer = iv(9, 0, 17, 0);
    assert!(!contained_in(&iv(8, 45, 9, 15), &outer), "starts before outer");
    assert!(!contained_in(&iv(16, 45, 17, 15), &outer), "ends after outer");
    assert!(!contained_in(&iv(8, 0, 18, 0), &outer), "wraps outer");
}

#[test]
fn interval_methods_delegate_to_predicates() {
    let meeting =
        Interval::starting_at(Utc.with_ymd_and_hms(2026, 3, 16, 9, 0, 0).unwrap(), 30).unwrap();
    assert_eq!(meeting, iv(9, 0, 9, 30));
    assert_eq!(meeting.duration_minutes(), 30);
    assert!(meeting.contained_in(&iv(9, 0, 10, 0)));
    assert!(meeting.overlaps(&iv(9, 15, 9, 45)));
}

#[test]
fn meeting_past_the_last_instant_is_rejected() {
    let late = DateTime::<Utc>::MAX_UTC - Duration::minutes(10);
    assert!(Interval::starting_at(late, 5).is_ok());

    let err = Interval::starting_at(late, 15).unwrap_err();
    assert!(matches!(err, SlotError::InvalidDuration(_)));
    assert!(matches!(
        Interval::starting_at(late, i64::MAX).unwrap_err(),
        SlotError::InvalidDuration(_)
    ));
}

// ── find_conflicts ──────────────────────────────────────────────────────────

#[test]
fn conflicts_report_overlap_minutes() {
    let meeting = iv(9, 0, 10, 0);
    let busy = vec![busy(9, 30, 10, 30), busy(10, 0, 11, 0), busy(8, 0, 12, 0)];

    let conflicts = find_conflicts(&meeting, &busy);

    assert_eq!(conflicts.len(), 2, "adjacent busy interval is not a conflict");
    assert_eq!(conflicts[0].busy, busy[0]);
    assert_eq!(conflicts[0].overlap_minutes, 30);
    assert_eq!(conflicts[1].busy, busy[2]);
    assert_eq!(conflicts[1].overlap_minutes, 60);
}

#[test]
fn no_busy_intervals_no_conflicts() {
    assert!(find_conflicts(&iv(9, 0, 10, 0), &[]).is_empty());
}
