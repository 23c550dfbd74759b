//! Error types for slot-engine operations.

use thiserror::Error;

use crate::validate::Violations;

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Invalid day of week: {0}")]
    InvalidDay(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid availability: {0}")]
    InvalidAvailability(Violations),

    #[error("Invalid event: {0}")]
    InvalidEvent(Violations),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Schedule source failed: {0}")]
    ScheduleSource(String),

    #[error("Calendar source failed: {0}")]
    CalendarSource(String),

    #[error("Event source failed: {0}")]
    EventSource(String),
}

impl SlotError {
    /// True for failures of an external collaborator (schedule store, event
    /// store or calendar). The caller may retry these; "no valid times" is
    /// never one.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            SlotError::ScheduleSource(_) | SlotError::CalendarSource(_) | SlotError::EventSource(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SlotError>;
