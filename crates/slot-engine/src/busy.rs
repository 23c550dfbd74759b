//! Busy intervals observed on the owner's external calendar.
//!
//! Calendar providers report two kinds of entries: timed events with absolute
//! start/end instants, and all-day events that carry only dates. The engine
//! only ever sees [`BusyInterval`]s; [`normalize_entries`] turns raw entries
//! into that shape before resolution.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::interval::Interval;

/// An absolute-time range during which the owner is already committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn interval(&self) -> Interval {
        Interval::new(self.start, self.end)
    }
}

/// A raw calendar entry as reported by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CalendarEntry {
    /// An event with explicit start and end instants.
    Timed {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// An all-day event. `end_date` is exclusive, as in iCalendar `DTEND;VALUE=DATE`.
    AllDay {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
}

/// Convert raw calendar entries into busy intervals.
///
/// All-day entries become `[start_date 00:00, end_date 00:00)` in the owner's
/// timezone; an `end_date` that is not after `start_date` blocks just the start
/// date. Timed entries with `end <= start` carry no busy time and are dropped.
pub fn normalize_entries(entries: &[CalendarEntry], tz: Tz) -> Vec<BusyInterval> {
    entries
        .iter()
        .filter_map(|entry| match *entry {
            CalendarEntry::Timed { start, end } => {
                (start < end).then(|| BusyInterval::new(start, end))
            }
            CalendarEntry::AllDay {
                start_date,
                end_date,
            } => {
                let end_date = if end_date > start_date {
                    end_date
                } else {
                    start_date + Duration::days(1)
                };
                Some(BusyInterval::new(
                    start_of_day(start_date, tz),
                    start_of_day(end_date, tz),
                ))
            }
        })
        .collect()
}

/// Keep only the busy intervals that intersect `[range_start, range_end]`.
///
/// Intervals are returned unclipped; a partially-overlapping interval still
/// blocks every meeting it touches.
pub fn clip_to_range(
    busy: &[BusyInterval],
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
) -> Vec<BusyInterval> {
    busy.iter()
        .filter(|b| b.start < range_end && b.end > range_start)
        .copied()
        .collect()
}

/// The first instant of `date` in `tz`.
///
/// Midnight can fall inside a DST gap in a handful of zones; the earliest
/// valid instant on or after midnight is used in that case.
pub(crate) fn start_of_day(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let midnight = date.and_time(chrono::NaiveTime::MIN);
    if let Some(dt) = tz.from_local_datetime(&midnight).earliest() {
        return dt.with_timezone(&Utc);
    }
    crate::dst::first_valid_after_gap(midnight, tz)
        .unwrap_or_else(|| midnight.and_utc())
}
