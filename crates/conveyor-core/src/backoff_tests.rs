//! Tests for the backoff scheduler

use super::*;

#[test]
fn test_default_delay_constants() {
    let policy = DelayPolicy::default();

    assert_eq!(policy.empty_delay_ms, 20_000);
    assert_eq!(policy.drained_delay_ms, 100);
    assert_eq!(policy.error_delay_ms, 10_000);
}

#[test]
fn test_empty_receive_maps_to_long_delay() {
    let policy = DelayPolicy::default();
    assert_eq!(
        policy.delay_for(CycleOutcome::Empty),
        Duration::from_secs(20)
    );
}

#[test]
fn test_clean_drain_maps_to_short_delay() {
    let policy = DelayPolicy::default();
    assert_eq!(
        policy.delay_for(CycleOutcome::Drained { clean: true }),
        Duration::from_millis(100)
    );
}

#[test]
fn test_receive_error_maps_to_medium_delay() {
    let policy = DelayPolicy::default();
    assert_eq!(
        policy.delay_for(CycleOutcome::ReceiveError),
        Duration::from_secs(10)
    );
}

#[test]
fn test_unclean_drain_maps_to_medium_delay() {
    let policy = DelayPolicy::default();
    assert_eq!(
        policy.delay_for(CycleOutcome::Drained { clean: false }),
        Duration::from_secs(10)
    );
}

#[test]
fn test_custom_constants_are_honored() {
    let policy = DelayPolicy {
        empty_delay_ms: 5_000,
        drained_delay_ms: 10,
        error_delay_ms: 2_500,
    };

    assert_eq!(policy.delay_for(CycleOutcome::Empty), Duration::from_secs(5));
    assert_eq!(
        policy.delay_for(CycleOutcome::Drained { clean: true }),
        Duration::from_millis(10)
    );
    assert_eq!(
        policy.delay_for(CycleOutcome::ReceiveError),
        Duration::from_millis(2_500)
    );
}

#[test]
fn test_policy_deserializes_with_defaults() {
    let policy: DelayPolicy = serde_json::from_str("{}").unwrap();
    assert_eq!(policy, DelayPolicy::default());

    let policy: DelayPolicy = serde_json::from_str(r#"{"drained_delay_ms": 250}"#).unwrap();
    assert_eq!(policy.drained_delay_ms, 250);
    assert_eq!(policy.empty_delay_ms, 20_000);
}
