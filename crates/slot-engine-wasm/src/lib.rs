//! WASM bindings for slot-engine.
//!
//! Exposes availability and event validation, slot resolution, and candidate
//! generation to JavaScript via `wasm-bindgen`. All complex types are passed as JSON
//! strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/slot-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use slot_engine::{BookingPolicy, CalendarEntry, EventForm, Schedule, ScheduleForm, Violation};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Input for [`resolve_slots`].
#[derive(Deserialize)]
struct ResolveInput {
    schedule: Option<Schedule>,
    #[serde(default)]
    busy: Vec<CalendarEntry>,
    duration_minutes: i64,
    candidates: Vec<String>,
}

#[derive(Serialize)]
struct ValidationDto {
    valid: bool,
    violations: Vec<Violation>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts both RFC 3339 (with offset, e.g., "2026-03-16T09:00:00-04:00") and
/// naive time (e.g., "2026-03-16T09:00:00"), which is interpreted as UTC.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, JsValue> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| JsValue::from_str(&format!("Invalid datetime '{}': {}", s, e)))
}

fn parse_policy(policy_json: Option<&str>) -> Result<BookingPolicy, JsValue> {
    match policy_json {
        Some(json) => BookingPolicy::from_json(json).map_err(to_js_error),
        None => Ok(BookingPolicy::default()),
    }
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn instants_to_json(instants: &[DateTime<Utc>]) -> Result<String, JsValue> {
    let strings: Vec<String> = instants.iter().map(|dt| dt.to_rfc3339()).collect();
    to_json(&strings)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Validate a schedule form before saving it.
///
/// `form_json` is `{timezone, availabilities: [{day_of_week, start_time, end_time}]}`.
/// Returns `{valid, violations}`; each violation carries `index`, `field`,
/// `kind`, and `message` so the caller can show it next to the input.
#[wasm_bindgen(js_name = "validateAvailability")]
pub fn validate_availability(form_json: &str) -> Result<String, JsValue> {
    let form: ScheduleForm = serde_json::from_str(form_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid schedule JSON: {}", e)))?;

    let violations = form.validate().err().unwrap_or_default();

    to_json(&ValidationDto {
        valid: violations.is_empty(),
        violations,
    })
}

/// Validate an event form before saving it.
///
/// `form_json` is `{name, description?, is_public?, duration_minutes}`.
/// Returns `{valid, violations}` in the same shape as [`validate_availability`].
#[wasm_bindgen(js_name = "validateEvent")]
pub fn validate_event(form_json: &str) -> Result<String, JsValue> {
    let form: EventForm = serde_json::from_str(form_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid event JSON: {}", e)))?;

    let violations = form.validate("", "").err().unwrap_or_default();

    to_json(&ValidationDto {
        valid: violations.is_empty(),
        violations,
    })
}

/// Resolve which candidate starts are bookable.
///
/// `input_json` is `{schedule, busy, duration_minutes, candidates}` where
/// `schedule` may be `null`, `busy` holds timed (`{start, end}`) or all-day
/// (`{start_date, end_date}`) entries, and `candidates` are ISO 8601 strings.
/// `policy_json` is an optional partial [`BookingPolicy`]; it bounds the
/// duration and picks the DST policy.
/// Returns a JSON array of RFC 3339 strings in candidate order.
#[wasm_bindgen(js_name = "resolveSlots")]
pub fn resolve_slots(input_json: &str, policy_json: Option<String>) -> Result<String, JsValue> {
    let input: ResolveInput = serde_json::from_str(input_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid resolve JSON: {}", e)))?;
    let policy = parse_policy(policy_json.as_deref())?;
    policy
        .check_duration(input.duration_minutes)
        .map_err(to_js_error)?;

    let candidates = input
        .candidates
        .iter()
        .map(|s| parse_datetime(s))
        .collect::<Result<Vec<_>, _>>()?;

    let busy = match &input.schedule {
        Some(schedule) => {
            let tz = schedule.tz().map_err(to_js_error)?;
            slot_engine::normalize_entries(&input.busy, tz)
        }
        None => Vec::new(),
    };

    let valid = slot_engine::resolve_with_policy(
        &candidates,
        input.duration_minutes,
        input.schedule.as_ref(),
        &busy,
        policy.dst_policy,
    )
    .map_err(to_js_error)?;

    instants_to_json(&valid)
}

/// Generate candidate starts from `now` across the booking horizon.
///
/// `policy_json` is an optional partial [`BookingPolicy`]; omitted fields take
/// their defaults. `timezone` decides where the final day ends.
#[wasm_bindgen(js_name = "generateCandidates")]
pub fn generate_candidates(
    now: &str,
    timezone: &str,
    policy_json: Option<String>,
) -> Result<String, JsValue> {
    let now = parse_datetime(now)?;
    let tz = slot_engine::schedule::parse_timezone(timezone).map_err(to_js_error)?;
    let policy = parse_policy(policy_json.as_deref())?;

    let candidates = slot_engine::generate_candidates(now, &policy, tz).map_err(to_js_error)?;

    instants_to_json(&candidates)
}
