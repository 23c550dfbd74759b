//! # slot-engine
//!
//! Timezone-correct availability resolution for booking meetings.
//!
//! An owner publishes a recurring weekly template of local time windows; the
//! engine decides which proposed start instants can host a meeting of a given
//! length without leaving a window or colliding with an existing commitment.
//! Resolution is pure: schedules and busy intervals come in as arguments, and
//! identical inputs always produce identical, identically-ordered output.
//!
//! ## Modules
//!
//! - [`schedule`] — Weekdays, availability windows, schedules, `HH:MM` parsing
//! - [`validate`] — Field-scoped validation of availability before it is saved
//! - [`weekday`] — Instant + timezone → local weekday
//! - [`localize`] — Local windows → absolute intervals on one date
//! - [`dst`] — DST gap and fold policies for localized windows
//! - [`interval`] — Overlap and containment predicates, conflict detection
//! - [`busy`] — Busy intervals and calendar-entry normalization
//! - [`resolver`] — Filter candidates down to bookable starts
//! - [`candidates`] — Generate candidate starts across a booking horizon
//! - [`event`] — Bookable event types and their form validation
//! - [`booking`] — Source traits and fetch-once orchestration
//! - [`config`] — Booking policy
//! - [`format`] — Duration and UTC-offset formatting
//! - [`error`] — Error types

pub mod booking;
pub mod busy;
pub mod candidates;
pub mod config;
pub mod dst;
pub mod error;
pub mod event;
pub mod format;
pub mod interval;
pub mod localize;
pub mod resolver;
pub mod schedule;
pub mod validate;
pub mod weekday;

pub use booking::{
    confirm_slot, delete_event, fetch_bookable_event, find_valid_times, public_events,
    save_event, save_schedule, BusySource, EventSource, EventStore, InMemoryStore,
    ScheduleSource, ScheduleStore,
};
pub use busy::{normalize_entries, BusyInterval, CalendarEntry};
pub use candidates::generate_candidates;
pub use config::BookingPolicy;
pub use dst::DstPolicy;
pub use error::{Result, SlotError};
pub use event::{Event, EventForm};
pub use interval::{contained_in, find_conflicts, overlaps, Interval};
pub use localize::localize_window;
pub use resolver::{resolve, resolve_with_policy, MeetingRequest};
pub use schedule::{AvailabilityWindow, DayOfWeek, Schedule};
pub use validate::{validate_availability, ScheduleForm, Violation, ViolationField, WindowForm};
pub use weekday::day_of_week_at;
