//! Candidate start instants for a booking horizon.
//!
//! The caller supplies "now" explicitly; nothing here reads the system clock.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

use crate::busy::start_of_day;
use crate::config::BookingPolicy;
use crate::error::{Result, SlotError};
use crate::weekday::local_date;

/// Every `slot_step_minutes` from `now` (rounded up to the step) through the
/// end of the local day, in `tz`, that lies `horizon_days` after the start.
///
/// Steps are aligned to the Unix epoch, so with a 15-minute step every
/// candidate falls on :00, :15, :30 or :45 UTC.
pub fn generate_candidates(
    now: DateTime<Utc>,
    policy: &BookingPolicy,
    tz: Tz,
) -> Result<Vec<DateTime<Utc>>> {
    policy.validate()?;

    let step_secs = i64::from(policy.slot_step_minutes) * 60;
    let start = ceil_to_step(now, step_secs)?;

    let out_of_range =
        || SlotError::InvalidDatetime(format!("horizon from {} is out of range", now.to_rfc3339()));
    let horizon_end = Duration::try_days(i64::from(policy.horizon_days))
        .and_then(|horizon| start.checked_add_signed(horizon))
        .ok_or_else(out_of_range)?;
    let next_day = local_date(horizon_end, tz)
        .succ_opt()
        .ok_or_else(out_of_range)?;
    let end = start_of_day(next_day, tz);

    let step = Duration::seconds(step_secs);
    let mut candidates = Vec::new();
    let mut cursor = start;
    while cursor < end {
        candidates.push(cursor);
        cursor += step;
    }

    Ok(candidates)
}

/// The first and last candidate, which bound the busy-interval query.
pub fn candidate_bounds(candidates: &[DateTime<Utc>]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    Some((*candidates.first()?, *candidates.last()?))
}

fn ceil_to_step(now: DateTime<Utc>, step_secs: i64) -> Result<DateTime<Utc>> {
    let mut secs = now.timestamp();
    if now.timestamp_subsec_nanos() > 0 {
        secs += 1;
    }
    let rounded = (secs + step_secs - 1).div_euclid(step_secs) * step_secs;
    DateTime::from_timestamp(rounded, 0)
        .ok_or_else(|| SlotError::InvalidDatetime(format!("{} is out of range", now)))
}
