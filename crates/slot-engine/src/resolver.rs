//! Filter candidate start instants down to the bookable ones.
//!
//! A candidate is bookable when the meeting it would start:
//! 1. overlaps no busy interval (touching is fine), and
//! 2. fits entirely inside a single availability window localized onto the
//!    candidate's own calendar date in the schedule's timezone.
//!
//! Two contiguous windows (09:00–12:00, 12:00–17:00) are still two windows; a
//! meeting spanning noon is rejected.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{debug, warn};

use crate::busy::BusyInterval;
use crate::dst::DstPolicy;
use crate::error::{Result, SlotError};
use crate::interval::Interval;
use crate::localize::localize_all;
use crate::schedule::{AvailabilityWindow, DayOfWeek, Schedule};
use crate::validate::validate_availability;
use crate::weekday::{day_of_week_at, local_date};

/// A proposed meeting: a start instant plus a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeetingRequest {
    pub start: DateTime<Utc>,
    pub duration_minutes: i64,
}

impl MeetingRequest {
    pub fn new(start: DateTime<Utc>, duration_minutes: i64) -> Self {
        Self {
            start,
            duration_minutes,
        }
    }

    pub fn interval(&self) -> Result<Interval> {
        Interval::starting_at(self.start, self.duration_minutes)
    }
}

/// Decide whether `meeting` is bookable against already-localized availability.
///
/// The busy check is a full conflict test (any overlap rejects); the
/// availability check is containment in at least one interval.
pub fn is_bookable(meeting: &Interval, availability: &[Interval], busy: &[BusyInterval]) -> bool {
    !busy.iter().any(|b| meeting.overlaps(&b.interval()))
        && availability.iter().any(|a| meeting.contained_in(a))
}

/// Resolve which candidates can start a meeting of `duration_minutes`.
///
/// Output preserves input order. An absent schedule, a schedule with no
/// windows, or an empty candidate list all yield `Ok(vec![])`.
///
/// # Errors
///
/// Returns [`SlotError::InvalidDuration`] if `duration_minutes <= 0` or a
/// meeting would run past the last representable instant, or
/// [`SlotError::InvalidTimezone`] if the schedule's timezone is not IANA.
pub fn resolve(
    candidates: &[DateTime<Utc>],
    duration_minutes: i64,
    schedule: Option<&Schedule>,
    busy: &[BusyInterval],
) -> Result<Vec<DateTime<Utc>>> {
    resolve_with_policy(
        candidates,
        duration_minutes,
        schedule,
        busy,
        DstPolicy::default(),
    )
}

/// [`resolve`] with an explicit policy for window boundaries in DST gaps.
pub fn resolve_with_policy(
    candidates: &[DateTime<Utc>],
    duration_minutes: i64,
    schedule: Option<&Schedule>,
    busy: &[BusyInterval],
    dst_policy: DstPolicy,
) -> Result<Vec<DateTime<Utc>>> {
    if duration_minutes <= 0 {
        return Err(SlotError::InvalidDuration(format!(
            "duration must be greater than 0, got {}",
            duration_minutes
        )));
    }
    if Duration::try_minutes(duration_minutes).is_none() {
        return Err(SlotError::InvalidDuration(format!(
            "duration of {} minutes is out of range",
            duration_minutes
        )));
    }

    let Some(schedule) = schedule else {
        debug!(candidates = candidates.len(), "no schedule; nothing is bookable");
        return Ok(Vec::new());
    };

    if candidates.is_empty() || schedule.windows.is_empty() {
        return Ok(Vec::new());
    }

    let tz = schedule.tz()?;

    // Stored windows may have been written without going through validation.
    let violations = validate_availability(&schedule.windows);
    if !violations.is_empty() {
        warn!(
            owner_id = %schedule.owner_id,
            violations = violations.len(),
            "stored availability violates window invariants"
        );
    }

    let by_day: [Vec<&AvailabilityWindow>; 7] =
        DayOfWeek::ALL.map(|day| schedule.windows_on(day).collect());

    // Localized availability per local date, built lazily for this call only.
    let mut localized: HashMap<NaiveDate, Vec<Interval>> = HashMap::new();

    let mut valid = Vec::new();
    for &candidate in candidates {
        let meeting = MeetingRequest::new(candidate, duration_minutes).interval()?;

        let windows = &by_day[day_of_week_at(candidate, tz).index()];
        if windows.is_empty() {
            continue;
        }

        let date = local_date(candidate, tz);
        let availability = localized
            .entry(date)
            .or_insert_with(|| localize_all(windows.iter().copied(), date, tz, dst_policy));

        if is_bookable(&meeting, availability, busy) {
            valid.push(candidate);
        }
    }

    debug!(
        owner_id = %schedule.owner_id,
        candidates = candidates.len(),
        busy = busy.len(),
        valid = valid.len(),
        "resolved candidate slots"
    );

    Ok(valid)
}
