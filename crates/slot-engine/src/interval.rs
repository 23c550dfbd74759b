//! Absolute-time intervals and the overlap/containment predicates.
//!
//! Intervals are half-open in spirit: two intervals that merely touch (one
//! ends exactly when the other starts) do NOT overlap, while containment
//! accepts touching boundaries on both sides.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::busy::BusyInterval;
use crate::error::{Result, SlotError};

/// A span between two absolute instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// The interval covered by a meeting of `duration_minutes` starting at `start`.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::InvalidDuration`] if the meeting would end past the
    /// last representable instant.
    pub fn starting_at(start: DateTime<Utc>, duration_minutes: i64) -> Result<Self> {
        let end = Duration::try_minutes(duration_minutes)
            .and_then(|length| start.checked_add_signed(length))
            .ok_or_else(|| {
                SlotError::InvalidDuration(format!(
                    "a {} minute meeting starting at {} is out of range",
                    duration_minutes,
                    start.to_rfc3339()
                ))
            })?;
        Ok(Self { start, end })
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        overlaps(self, other)
    }

    pub fn contained_in(&self, outer: &Interval) -> bool {
        contained_in(self, outer)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// True iff `a` and `b` share at least one instant beyond a touching boundary.
///
/// `a.start < b.end && a.end > b.start`. Symmetric in its arguments.
pub fn overlaps(a: &Interval, b: &Interval) -> bool {
    a.start < b.end && a.end > b.start
}

/// True iff `inner` lies entirely within `outer`, boundaries included.
pub fn contained_in(inner: &Interval, outer: &Interval) -> bool {
    outer.start <= inner.start && inner.end <= outer.end
}

/// A busy interval that conflicts with a proposed meeting.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub busy: BusyInterval,
    pub overlap_minutes: i64,
}

/// Find every busy interval that overlaps `meeting`, in input order.
///
/// The overlap duration is `min(a.end, b.end) - max(a.start, b.start)`.
/// Adjacent intervals are NOT conflicts.
pub fn find_conflicts(meeting: &Interval, busy: &[BusyInterval]) -> Vec<Conflict> {
    busy.iter()
        .filter(|b| overlaps(meeting, &b.interval()))
        .map(|b| {
            let overlap_start = meeting.start.max(b.start);
            let overlap_end = meeting.end.min(b.end);
            Conflict {
                busy: *b,
                overlap_minutes: (overlap_end - overlap_start).num_minutes(),
            }
        })
        .collect()
}
