//! Booking orchestration over injected schedule, event and calendar sources.
//!
//! The engine itself ([`crate::resolver`]) is pure. This module is the thin
//! layer that fetches its inputs exactly once per request and turns schedule
//! and event form submissions into validated, stored records.
//!
//! Source failures surface as [`SlotError::ScheduleSource`],
//! [`SlotError::EventSource`] or [`SlotError::CalendarSource`] and are never
//! folded into an empty result.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::busy::{clip_to_range, BusyInterval};
use crate::candidates::candidate_bounds;
use crate::config::BookingPolicy;
use crate::error::{Result, SlotError};
use crate::event::{Event, EventForm};
use crate::interval::Interval;
use crate::resolver::resolve_with_policy;
use crate::schedule::Schedule;
use crate::validate::{ScheduleForm, Violations};

/// Read access to stored schedules.
pub trait ScheduleSource {
    /// Fetch the owner's schedule. `Ok(None)` means the owner has none yet.
    ///
    /// Implementations report their own failures as [`SlotError::ScheduleSource`].
    fn fetch_schedule(&self, owner_id: &str) -> Result<Option<Schedule>>;
}

/// Write access to stored schedules.
pub trait ScheduleStore: ScheduleSource {
    /// Create or replace the owner's schedule, including all of its windows.
    fn save_schedule(&self, schedule: Schedule) -> Result<()>;
}

/// Read access to stored event types.
pub trait EventSource {
    /// Every event the owner has, public or not, in any order.
    ///
    /// Implementations report their own failures as [`SlotError::EventSource`].
    fn fetch_events(&self, owner_id: &str) -> Result<Vec<Event>>;

    /// One of the owner's events, public or not.
    fn fetch_event(&self, owner_id: &str, event_id: &str) -> Result<Option<Event>> {
        Ok(self
            .fetch_events(owner_id)?
            .into_iter()
            .find(|event| event.id == event_id))
    }
}

/// Write access to stored event types.
pub trait EventStore: EventSource {
    /// Create or replace an event, keyed by owner and event id.
    fn save_event(&self, event: Event) -> Result<()>;

    /// Remove an event. Returns `false` when the owner has no such event.
    fn delete_event(&self, owner_id: &str, event_id: &str) -> Result<bool>;
}

/// Read access to the owner's external calendar.
pub trait BusySource {
    /// Busy intervals relevant to `[range_start, range_end]`.
    ///
    /// All-day entries must already be normalized (see
    /// [`crate::busy::normalize_entries`]). Implementations report their own
    /// failures as [`SlotError::CalendarSource`].
    fn fetch_busy_intervals(
        &self,
        owner_id: &str,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>>;
}

/// The owner's public events, ordered by name without regard to case.
pub fn public_events<E>(events: &E, owner_id: &str) -> Result<Vec<Event>>
where
    E: EventSource + ?Sized,
{
    let mut public: Vec<Event> = events
        .fetch_events(owner_id)?
        .into_iter()
        .filter(|event| event.is_public)
        .collect();
    public.sort_by_cached_key(|event| event.name.to_lowercase());
    Ok(public)
}

/// Look up an event an invitee may book.
///
/// # Errors
///
/// Returns [`SlotError::EventNotFound`] when the owner has no such event or
/// the event is private.
pub fn fetch_bookable_event<E>(events: &E, owner_id: &str, event_id: &str) -> Result<Event>
where
    E: EventSource + ?Sized,
{
    events
        .fetch_event(owner_id, event_id)?
        .filter(|event| event.is_public)
        .ok_or_else(|| SlotError::EventNotFound(event_id.to_string()))
}

/// Which candidates can start a meeting of `event`.
///
/// The event's owner and duration drive the lookup. The schedule is fetched
/// once; the calendar is queried once over
/// `[first candidate, last candidate + duration]` and only when a schedule
/// exists.
///
/// # Errors
///
/// Returns [`SlotError::EventNotFound`] for a private event and
/// [`SlotError::InvalidDuration`] when the event's duration is outside the
/// policy, both before anything is fetched.
#[instrument(skip_all, fields(owner_id = %event.owner_id, event_id = %event.id, candidates = candidates.len()))]
pub fn find_valid_times<S, B>(
    schedules: &S,
    calendar: &B,
    event: &Event,
    candidates: &[DateTime<Utc>],
    policy: &BookingPolicy,
) -> Result<Vec<DateTime<Utc>>>
where
    S: ScheduleSource + ?Sized,
    B: BusySource + ?Sized,
{
    if !event.is_public {
        return Err(SlotError::EventNotFound(event.id.clone()));
    }
    let duration_minutes = event.duration();
    policy.check_duration(duration_minutes)?;

    let Some((first, last)) = candidate_bounds(candidates) else {
        return Ok(Vec::new());
    };

    let Some(schedule) = schedules.fetch_schedule(&event.owner_id)? else {
        debug!("owner has no schedule");
        return Ok(Vec::new());
    };

    let range_end = Interval::starting_at(last, duration_minutes)?.end;
    let busy = calendar.fetch_busy_intervals(&event.owner_id, first, range_end)?;
    let busy = clip_to_range(&busy, first, range_end);

    resolve_with_policy(
        candidates,
        duration_minutes,
        Some(&schedule),
        &busy,
        policy.dst_policy,
    )
}

/// Re-check a single start for `event` right before booking it.
///
/// Returns `Ok(false)` when the slot is outside availability or already taken.
///
/// # Errors
///
/// Returns [`SlotError::InvalidDatetime`] if `start` is not after `now`, and
/// everything [`find_valid_times`] returns.
#[instrument(skip_all, fields(owner_id = %event.owner_id, event_id = %event.id, start = %start))]
pub fn confirm_slot<S, B>(
    schedules: &S,
    calendar: &B,
    event: &Event,
    start: DateTime<Utc>,
    now: DateTime<Utc>,
    policy: &BookingPolicy,
) -> Result<bool>
where
    S: ScheduleSource + ?Sized,
    B: BusySource + ?Sized,
{
    if start <= now {
        return Err(SlotError::InvalidDatetime(format!(
            "start {} must be in the future",
            start.to_rfc3339()
        )));
    }

    let valid = find_valid_times(schedules, calendar, event, &[start], policy)?;
    Ok(!valid.is_empty())
}

/// Validate a submitted schedule form and store it, replacing every window
/// the owner had before.
///
/// # Errors
///
/// Returns [`SlotError::InvalidAvailability`] with every field-scoped problem
/// when the form is rejected; nothing is written in that case.
#[instrument(skip_all, fields(owner_id = %owner_id))]
pub fn save_schedule<T>(store: &T, owner_id: &str, form: &ScheduleForm) -> Result<Schedule>
where
    T: ScheduleStore + ?Sized,
{
    let windows = form
        .validate()
        .map_err(|violations| SlotError::InvalidAvailability(Violations(violations)))?;

    let schedule = Schedule::new(owner_id, form.timezone.trim(), windows);
    store.save_schedule(schedule.clone())?;

    info!(windows = schedule.windows.len(), "schedule saved");
    Ok(schedule)
}

/// Validate a submitted event form and store it under `event_id`, replacing
/// any event the owner already had with that id.
///
/// # Errors
///
/// Returns [`SlotError::InvalidEvent`] with every field-scoped problem when
/// the form is rejected; nothing is written in that case.
#[instrument(skip_all, fields(owner_id = %owner_id, event_id = %event_id))]
pub fn save_event<T>(store: &T, owner_id: &str, event_id: &str, form: &EventForm) -> Result<Event>
where
    T: EventStore + ?Sized,
{
    let event = form
        .validate(event_id, owner_id)
        .map_err(|violations| SlotError::InvalidEvent(Violations(violations)))?;

    store.save_event(event.clone())?;

    info!(duration_minutes = event.duration_minutes, public = event.is_public, "event saved");
    Ok(event)
}

/// Delete one of the owner's events.
///
/// # Errors
///
/// Returns [`SlotError::EventNotFound`] when the owner has no such event.
#[instrument(skip_all, fields(owner_id = %owner_id, event_id = %event_id))]
pub fn delete_event<T>(store: &T, owner_id: &str, event_id: &str) -> Result<()>
where
    T: EventStore + ?Sized,
{
    if !store.delete_event(owner_id, event_id)? {
        return Err(SlotError::EventNotFound(event_id.to_string()));
    }
    info!("event deleted");
    Ok(())
}

/// Process-local schedules, events and busy intervals, keyed by owner.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    schedules: RwLock<HashMap<String, Schedule>>,
    events: RwLock<HashMap<String, Vec<Event>>>,
    busy: RwLock<HashMap<String, Vec<BusyInterval>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the owner's busy intervals.
    pub fn set_busy(&self, owner_id: &str, busy: Vec<BusyInterval>) -> Result<()> {
        self.busy
            .write()
            .map_err(|e| SlotError::CalendarSource(e.to_string()))?
            .insert(owner_id.to_string(), busy);
        Ok(())
    }
}

impl ScheduleSource for InMemoryStore {
    fn fetch_schedule(&self, owner_id: &str) -> Result<Option<Schedule>> {
        let schedules = self
            .schedules
            .read()
            .map_err(|e| SlotError::ScheduleSource(e.to_string()))?;
        Ok(schedules.get(owner_id).cloned())
    }
}

impl ScheduleStore for InMemoryStore {
    fn save_schedule(&self, schedule: Schedule) -> Result<()> {
        self.schedules
            .write()
            .map_err(|e| SlotError::ScheduleSource(e.to_string()))?
            .insert(schedule.owner_id.clone(), schedule);
        Ok(())
    }
}

impl EventSource for InMemoryStore {
    fn fetch_events(&self, owner_id: &str) -> Result<Vec<Event>> {
        let events = self
            .events
            .read()
            .map_err(|e| SlotError::EventSource(e.to_string()))?;
        Ok(events.get(owner_id).cloned().unwrap_or_default())
    }
}

impl EventStore for InMemoryStore {
    fn save_event(&self, event: Event) -> Result<()> {
        let mut events = self
            .events
            .write()
            .map_err(|e| SlotError::EventSource(e.to_string()))?;
        let owned = events.entry(event.owner_id.clone()).or_default();
        match owned.iter().position(|existing| existing.id == event.id) {
            Some(i) => owned[i] = event,
            None => owned.push(event),
        }
        Ok(())
    }

    fn delete_event(&self, owner_id: &str, event_id: &str) -> Result<bool> {
        let mut events = self
            .events
            .write()
            .map_err(|e| SlotError::EventSource(e.to_string()))?;
        let Some(owned) = events.get_mut(owner_id) else {
            return Ok(false);
        };
        let before = owned.len();
        owned.retain(|event| event.id != event_id);
        Ok(owned.len() != before)
    }
}

impl BusySource for InMemoryStore {
    fn fetch_busy_intervals(
        &self,
        owner_id: &str,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>> {
        let busy = self
            .busy
            .read()
            .map_err(|e| SlotError::CalendarSource(e.to_string()))?;
        Ok(busy
            .get(owner_id)
            .map(|intervals| clip_to_range(intervals, range_start, range_end))
            .unwrap_or_default())
    }
}
