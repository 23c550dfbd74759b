//! Human-readable formatting for durations and timezone offsets.

use chrono::{DateTime, Offset, Utc};
use chrono_tz::Tz;

/// Format a duration in minutes as e.g. `"1 hr 30 mins"`, `"2 hrs"`, `"1 min"`.
pub fn format_duration(duration_minutes: u32) -> String {
    let hrs = duration_minutes / 60;
    let mins = duration_minutes % 60;

    let hrs_str = format!("{} {}", hrs, if hrs == 1 { "hr" } else { "hrs" });
    let mins_str = format!("{} {}", mins, if mins == 1 { "min" } else { "mins" });

    match (hrs, mins) {
        (0, _) => mins_str,
        (_, 0) => hrs_str,
        _ => format!("{} {}", hrs_str, mins_str),
    }
}

/// The UTC offset of `tz` at instant `at`, formatted as `"+HH:MM"` / `"-HH:MM"`.
pub fn format_utc_offset(tz: Tz, at: DateTime<Utc>) -> String {
    let secs = at.with_timezone(&tz).offset().fix().local_minus_utc();
    let sign = if secs < 0 { '-' } else { '+' };
    let abs = secs.unsigned_abs();
    format!("{}{:02}:{:02}", sign, abs / 3600, (abs % 3600) / 60)
}
