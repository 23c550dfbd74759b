//! Structural validation of submitted forms before they are saved.
//!
//! Every problem is reported as a [`Violation`] tied to one window index and
//! one field, so a form can surface it inline next to the offending input.
//! Validation never stops at the first problem.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schedule::{parse_time_of_day, parse_timezone, AvailabilityWindow, DayOfWeek};

/// The form field a violation is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationField {
    Timezone,
    StartTime,
    EndTime,
    Name,
    DurationMinutes,
}

impl ViolationField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationField::Timezone => "timezone",
            ViolationField::StartTime => "start_time",
            ViolationField::EndTime => "end_time",
            ViolationField::Name => "name",
            ViolationField::DurationMinutes => "duration_minutes",
        }
    }
}

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A required value is missing.
    Required,
    /// The value is not in the accepted format.
    Format,
    /// The window shares time with another window on the same day.
    Overlap,
    /// The window ends at or before its start.
    NotIncreasing,
    /// A duration is zero or negative.
    NotPositive,
    /// A duration exceeds the longest bookable event.
    TooLong,
}

impl ViolationKind {
    pub fn message(&self) -> &'static str {
        match self {
            ViolationKind::Required => "Required",
            ViolationKind::Format => "Time must be in the format HH:MM",
            ViolationKind::Overlap => "Availability overlaps with another",
            ViolationKind::NotIncreasing => "End time must come after start time",
            ViolationKind::NotPositive => "Duration must be greater than 0",
            ViolationKind::TooLong => "Duration must be less than 12 hours (720 minutes)",
        }
    }
}

/// A single field-scoped validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Index of the window in the submitted list; `None` for schedule-level fields.
    pub index: Option<usize>,
    pub field: ViolationField,
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    pub(crate) fn new(index: Option<usize>, field: ViolationField, kind: ViolationKind) -> Self {
        Self {
            index,
            field,
            kind,
            message: kind.message().to_string(),
        }
    }

    pub(crate) fn at(index: usize, field: ViolationField, kind: ViolationKind) -> Self {
        Self::new(Some(index), field, kind)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = self.field.as_str();
        match self.index {
            Some(i) => write!(f, "[{}].{}: {}", i, field, self.message),
            None => write!(f, "{}: {}", field, self.message),
        }
    }
}

/// A non-empty list of violations, carried by
/// [`SlotError::InvalidAvailability`](crate::SlotError::InvalidAvailability) and
/// [`SlotError::InvalidEvent`](crate::SlotError::InvalidEvent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Violations(pub Vec<Violation>);

impl Violations {
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|v| v.to_string()).collect();
        f.write_str(&parts.join("; "))
    }
}

/// Check a full set of windows for overlaps and inverted ranges.
///
/// For each window W compared against every other window W' on the same day:
/// - `W.start < W'.end && W.end > W'.start` reports an overlap on W's start time;
/// - `W.start >= W.end` reports a non-increasing range on W's end time.
///
/// Windows that only touch (09:00–10:00 and 10:00–11:00) are valid.
/// Returns an empty list when the set is valid.
pub fn validate_availability(windows: &[AvailabilityWindow]) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (index, window) in windows.iter().enumerate() {
        let overlaps = windows.iter().enumerate().any(|(other_index, other)| {
            other_index != index
                && other.day_of_week == window.day_of_week
                && other.start_time < window.end_time
                && other.end_time > window.start_time
        });

        if overlaps {
            violations.push(Violation::at(
                index,
                ViolationField::StartTime,
                ViolationKind::Overlap,
            ));
        }

        if window.start_time >= window.end_time {
            violations.push(Violation::at(
                index,
                ViolationField::EndTime,
                ViolationKind::NotIncreasing,
            ));
        }
    }

    violations
}

/// One window as submitted from a form, times still unparsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowForm {
    pub day_of_week: DayOfWeek,
    pub start_time: String,
    pub end_time: String,
}

/// A schedule as submitted from a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleForm {
    pub timezone: String,
    #[serde(default)]
    pub availabilities: Vec<WindowForm>,
}

impl ScheduleForm {
    /// Parse and validate the form.
    ///
    /// Format problems are reported first; structural checks only run once
    /// every time parses, since overlap is meaningless for unparsed values.
    pub fn validate(&self) -> std::result::Result<Vec<AvailabilityWindow>, Vec<Violation>> {
        let mut violations = Vec::new();

        if self.timezone.trim().is_empty() {
            violations.push(Violation::new(
                None,
                ViolationField::Timezone,
                ViolationKind::Required,
            ));
        } else if let Err(e) = parse_timezone(&self.timezone) {
            violations.push(Violation {
                index: None,
                field: ViolationField::Timezone,
                kind: ViolationKind::Format,
                message: e.to_string(),
            });
        }

        let mut windows = Vec::with_capacity(self.availabilities.len());
        for (index, form) in self.availabilities.iter().enumerate() {
            let start = parse_time_of_day(&form.start_time);
            let end = parse_time_of_day(&form.end_time);
            if start.is_err() {
                violations.push(Violation::at(
                    index,
                    ViolationField::StartTime,
                    ViolationKind::Format,
                ));
            }
            if end.is_err() {
                violations.push(Violation::at(
                    index,
                    ViolationField::EndTime,
                    ViolationKind::Format,
                ));
            }
            if let (Ok(start), Ok(end)) = (start, end) {
                windows.push(AvailabilityWindow::new(form.day_of_week, start, end));
            }
        }

        if windows.len() == self.availabilities.len() {
            violations.extend(validate_availability(&windows));
        }

        if violations.is_empty() {
            Ok(windows)
        } else {
            Err(violations)
        }
    }
}
