//! Expand local time-of-day windows into absolute intervals for one date.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;

use crate::dst::{resolve_local, DstPolicy};
use crate::interval::Interval;
use crate::schedule::AvailabilityWindow;

/// Combine `date` with each wall-clock time and interpret the result in `tz`.
///
/// Returns `None` when the policy drops a boundary that falls in a DST gap, or
/// when DST folding leaves the interval empty.
pub fn localize_window(
    start_time: NaiveTime,
    end_time: NaiveTime,
    date: NaiveDate,
    tz: Tz,
    policy: DstPolicy,
) -> Option<Interval> {
    let start = resolve_local(date.and_time(start_time), tz, policy)?;
    let end = resolve_local(date.and_time(end_time), tz, policy)?;
    (start < end).then(|| Interval::new(start, end))
}

/// Like [`localize_window`], but takes a datetime whose time component is
/// discarded: only its calendar date is used.
pub fn localize_window_on(
    start_time: NaiveTime,
    end_time: NaiveTime,
    day: NaiveDateTime,
    tz: Tz,
    policy: DstPolicy,
) -> Option<Interval> {
    localize_window(start_time, end_time, day.date(), tz, policy)
}

/// Localize every window in `windows` onto `date`, dropping any the policy skips.
pub fn localize_all<'a>(
    windows: impl IntoIterator<Item = &'a AvailabilityWindow>,
    date: NaiveDate,
    tz: Tz,
    policy: DstPolicy,
) -> Vec<Interval> {
    windows
        .into_iter()
        .filter_map(|w| localize_window(w.start_time, w.end_time, date, tz, policy))
        .collect()
}
