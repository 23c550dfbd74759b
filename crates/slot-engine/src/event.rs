//! Bookable event types.
//!
//! An [`Event`] is what an invitee actually books: a named meeting of fixed
//! length offered by one owner. Only public events can be booked; private
//! ones stay visible to their owner but are treated as missing by every
//! booking path.

use serde::{Deserialize, Serialize};

use crate::validate::{Violation, ViolationField, ViolationKind};

/// Longest event an owner may offer.
pub const MAX_EVENT_DURATION_MINUTES: u32 = 12 * 60;

/// A stored event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub duration_minutes: u32,
    #[serde(default = "default_public")]
    pub is_public: bool,
}

impl Event {
    /// A public event with no description.
    pub fn new(
        id: impl Into<String>,
        owner_id: impl Into<String>,
        name: impl Into<String>,
        duration_minutes: u32,
    ) -> Self {
        Self {
            id: id.into(),
            owner_id: owner_id.into(),
            name: name.into(),
            description: None,
            duration_minutes,
            is_public: true,
        }
    }

    pub fn duration(&self) -> i64 {
        i64::from(self.duration_minutes)
    }
}

fn default_public() -> bool {
    true
}

/// An event as submitted from a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventForm {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_public")]
    pub is_public: bool,
    pub duration_minutes: i64,
}

impl EventForm {
    /// Validate the form and build the event it describes.
    ///
    /// Every problem is reported; a blank description is stored as `None`.
    pub fn validate(
        &self,
        id: &str,
        owner_id: &str,
    ) -> std::result::Result<Event, Vec<Violation>> {
        let mut violations = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            violations.push(Violation::new(
                None,
                ViolationField::Name,
                ViolationKind::Required,
            ));
        }

        let duration = if self.duration_minutes <= 0 {
            violations.push(Violation::new(
                None,
                ViolationField::DurationMinutes,
                ViolationKind::NotPositive,
            ));
            None
        } else {
            match u32::try_from(self.duration_minutes) {
                Ok(minutes) if minutes <= MAX_EVENT_DURATION_MINUTES => Some(minutes),
                _ => {
                    violations.push(Violation::new(
                        None,
                        ViolationField::DurationMinutes,
                        ViolationKind::TooLong,
                    ));
                    None
                }
            }
        };

        match duration {
            Some(duration_minutes) if violations.is_empty() => Ok(Event {
                id: id.to_string(),
                owner_id: owner_id.to_string(),
                name: name.to_string(),
                description: self
                    .description
                    .as_deref()
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(str::to_string),
                duration_minutes,
                is_public: self.is_public,
            }),
            _ => Err(violations),
        }
    }
}
