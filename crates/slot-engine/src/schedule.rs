//! Weekly availability data model.
//!
//! A [`Schedule`] belongs to exactly one owner and holds an IANA timezone plus
//! a set of [`AvailabilityWindow`]s. Window times are wall-clock values with no
//! zone of their own; they only become absolute instants once combined with
//! the schedule's timezone (see [`crate::localize`]).

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// One of the seven canonical weekdays, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// All weekdays in canonical order.
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }

    /// Zero-based position in the canonical order (Monday = 0).
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayOfWeek {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        DayOfWeek::ALL
            .into_iter()
            .find(|day| day.as_str() == lower)
            .ok_or_else(|| SlotError::InvalidDay(format!("unknown day of week '{}'", s)))
    }
}

/// A recurring local time-of-day range on one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub day_of_week: DayOfWeek,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}

impl AvailabilityWindow {
    pub fn new(day_of_week: DayOfWeek, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            day_of_week,
            start_time,
            end_time,
        }
    }

    /// Build a window from `HH:MM` strings.
    ///
    /// Only the time format is checked here; ordering and overlap are the job of
    /// [`crate::validate::validate_availability`].
    pub fn parse(day_of_week: DayOfWeek, start: &str, end: &str) -> Result<Self> {
        Ok(Self::new(
            day_of_week,
            parse_time_of_day(start)?,
            parse_time_of_day(end)?,
        ))
    }
}

/// An owner's weekly availability template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub owner_id: String,
    /// IANA timezone name (e.g., "America/New_York").
    pub timezone: String,
    #[serde(default)]
    pub windows: Vec<AvailabilityWindow>,
}

impl Schedule {
    pub fn new(
        owner_id: impl Into<String>,
        timezone: impl Into<String>,
        windows: Vec<AvailabilityWindow>,
    ) -> Self {
        Self {
            owner_id: owner_id.into(),
            timezone: timezone.into(),
            windows,
        }
    }

    /// Parse the schedule's timezone.
    pub fn tz(&self) -> Result<Tz> {
        parse_timezone(&self.timezone)
    }

    /// Windows that apply to the given weekday, in stored order.
    pub fn windows_on(&self, day: DayOfWeek) -> impl Iterator<Item = &AvailabilityWindow> {
        self.windows.iter().filter(move |w| w.day_of_week == day)
    }
}

/// Parse an IANA timezone string.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| SlotError::InvalidTimezone(s.to_string()))
}

/// Parse a wall-clock time of day in `H:MM` or `HH:MM` form (00:00 through 23:59).
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime> {
    let invalid = || SlotError::InvalidTime(format!("'{}' is not in the format HH:MM", s));

    let (hours, minutes) = s.split_once(':').ok_or_else(invalid)?;
    if hours.is_empty()
        || hours.len() > 2
        || minutes.len() != 2
        || !hours.bytes().all(|b| b.is_ascii_digit())
        || !minutes.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let h: u32 = hours.parse().map_err(|_| invalid())?;
    let m: u32 = minutes.parse().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(h, m, 0).ok_or_else(invalid)
}

/// Format a time of day as zero-padded `HH:MM`.
pub fn format_time_of_day(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Serde adapter for `HH:MM` time-of-day fields.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_time_of_day(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time_of_day(&raw).map_err(de::Error::custom)
    }
}
