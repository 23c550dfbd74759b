//! Booking policy: the tunable knobs around resolution.

use serde::{Deserialize, Serialize};

use crate::dst::DstPolicy;
use crate::error::{Result, SlotError};

/// Largest accepted `slot_step_minutes`: one step per day.
pub const MAX_SLOT_STEP_MINUTES: u32 = 24 * 60;
/// Largest accepted `horizon_days`: ten years.
pub const MAX_HORIZON_DAYS: u32 = 3650;
/// Largest accepted `max_duration_minutes`: one week.
pub const MAX_MEETING_MINUTES: u32 = 7 * 24 * 60;

/// Granularity and bounds for generating and resolving booking slots.
///
/// Every field has a default, so a partial JSON document such as
/// `{"slot_step_minutes": 30}` is a valid policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingPolicy {
    /// Spacing between generated candidate starts.
    pub slot_step_minutes: u32,
    /// How far ahead of "now" candidates are generated.
    pub horizon_days: u32,
    /// Longest meeting that may be booked.
    pub max_duration_minutes: u32,
    /// How window boundaries inside a DST gap are handled.
    pub dst_policy: DstPolicy,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            slot_step_minutes: 15,
            horizon_days: 365,
            max_duration_minutes: 12 * 60,
            dst_policy: DstPolicy::default(),
        }
    }
}

impl BookingPolicy {
    /// Parse a policy from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let policy: BookingPolicy =
            serde_json::from_str(json).map_err(|e| SlotError::InvalidConfig(e.to_string()))?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<()> {
        check_range("slot_step_minutes", self.slot_step_minutes, MAX_SLOT_STEP_MINUTES)?;
        check_range("horizon_days", self.horizon_days, MAX_HORIZON_DAYS)?;
        check_range(
            "max_duration_minutes",
            self.max_duration_minutes,
            MAX_MEETING_MINUTES,
        )
    }

    /// Reject meeting durations outside `1..=max_duration_minutes`.
    pub fn check_duration(&self, duration_minutes: i64) -> Result<()> {
        if duration_minutes <= 0 {
            return Err(SlotError::InvalidDuration(format!(
                "duration must be greater than 0, got {}",
                duration_minutes
            )));
        }
        if duration_minutes > i64::from(self.max_duration_minutes) {
            return Err(SlotError::InvalidDuration(format!(
                "duration must be at most {} minutes, got {}",
                self.max_duration_minutes, duration_minutes
            )));
        }
        Ok(())
    }
}

fn check_range(field: &str, value: u32, max: u32) -> Result<()> {
    if value == 0 {
        return Err(SlotError::InvalidConfig(format!(
            "{} must be greater than 0",
            field
        )));
    }
    if value > max {
        return Err(SlotError::InvalidConfig(format!(
            "{} must be at most {}, got {}",
            field, max, value
        )));
    }
    Ok(())
}
