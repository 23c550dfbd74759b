//! Tests for booking policy parsing and bounds.

use slot_engine::config::{BookingPolicy, MAX_HORIZON_DAYS, MAX_SLOT_STEP_MINUTES};
use slot_engine::dst::DstPolicy;
use slot_engine::SlotError;

#[test]
fn partial_json_keeps_defaults() {
    let policy = BookingPolicy::from_json(r#"{"slot_step_minutes": 30}"#).unwrap();
    assert_eq!(policy.slot_step_minutes, 30);
    assert_eq!(policy.horizon_days, 365);
    assert_eq!(policy.max_duration_minutes, 720);
    assert_eq!(policy.dst_policy, DstPolicy::ShiftForward);
}

#[test]
fn dst_policy_parses_snake_case() {
    let policy = BookingPolicy::from_json(r#"{"dst_policy": "skip"}"#).unwrap();
    assert_eq!(policy.dst_policy, DstPolicy::Skip);
}

#[test]
fn malformed_json_is_a_config_error() {
    let err = BookingPolicy::from_json(r#"{"horizon_days": "soon"}"#).unwrap_err();
    assert!(matches!(err, SlotError::InvalidConfig(_)));
}

#[test]
fn zero_values_are_rejected() {
    for json in [
        r#"{"slot_step_minutes": 0}"#,
        r#"{"horizon_days": 0}"#,
        r#"{"max_duration_minutes": 0}"#,
    ] {
        let err = BookingPolicy::from_json(json).unwrap_err();
        assert!(matches!(err, SlotError::InvalidConfig(_)), "{json}");
    }
}

#[test]
fn oversized_values_are_rejected() {
    for json in [
        r#"{"horizon_days": 4000000000}"#,
        r#"{"slot_step_minutes": 1441}"#,
        r#"{"max_duration_minutes": 4000000000}"#,
    ] {
        let err = BookingPolicy::from_json(json).unwrap_err();
        assert!(matches!(err, SlotError::InvalidConfig(_)), "{json}");
    }
}

#[test]
fn upper_bounds_are_inclusive() {
    let policy = BookingPolicy {
        slot_step_minutes: MAX_SLOT_STEP_MINUTES,
        horizon_days: MAX_HORIZON_DAYS,
        ..BookingPolicy::default()
    };
    assert!(policy.validate().is_ok());
}

#[test]
fn duration_bounds() {
    let policy = BookingPolicy::default();
    assert!(policy.check_duration(30).is_ok());
    assert!(policy.check_duration(720).is_ok());
    assert!(policy.check_duration(0).is_err());
    assert!(policy.check_duration(-15).is_err());
    assert!(policy.check_duration(721).is_err());
}
