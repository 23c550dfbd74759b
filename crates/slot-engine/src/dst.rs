//! DST transition policies for localized availability windows.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Upper bound on how far a gap can push a wall-clock time forward.
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// Policy for window boundaries whose wall-clock time does not exist on a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DstPolicy {
    /// Drop the window for that date (e.g., 02:30 during spring forward)
    Skip,
    /// Move the boundary to the first valid instant after the gap
    #[default]
    ShiftForward,
}

/// Interpret a wall-clock datetime in `tz` according to `policy`.
///
/// Ambiguous readings (fall back) take the earlier of the two instants.
/// Returns `None` only under [`DstPolicy::Skip`] when `local` is in a gap.
pub fn resolve_local(local: NaiveDateTime, tz: Tz, policy: DstPolicy) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => match policy {
            DstPolicy::Skip => None,
            DstPolicy::ShiftForward => first_valid_after_gap(local, tz),
        },
    }
}

/// The first instant whose wall-clock reading in `tz` is at or after `local`.
pub(crate) fn first_valid_after_gap(local: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    (1..=MAX_GAP_MINUTES).find_map(|minutes| {
        tz.from_local_datetime(&(local + Duration::minutes(minutes)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    })
}
