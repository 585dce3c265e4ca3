//! Tests for engine configuration

use super::*;

fn valid_config() -> EngineConfig {
    EngineConfig {
        queue_url: "https://sqs.us-east-1.amazonaws.com/123456789012/statements".to_string(),
        dead_letter_queue: "statements-dead-letter".to_string(),
        function_name: "statement-ingest".to_string(),
        ..EngineConfig::default()
    }
}

#[test]
fn test_defaults() {
    let config = EngineConfig::default();

    assert_eq!(config.concurrency, 4);
    assert_eq!(config.visibility_timeout_secs, 10);
    assert_eq!(config.wait_time_secs, 5);
    assert_eq!(config.max_batch_size, 10);
    assert_eq!(config.delays, DelayPolicy::default());
}

#[test]
fn test_valid_config_passes() {
    assert!(valid_config().validate().is_ok());
}

#[test]
fn test_missing_queue_url_rejected() {
    let config = EngineConfig {
        queue_url: String::new(),
        ..valid_config()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Missing { key }) if key == "queue_url"
    ));
}

#[test]
fn test_unparseable_queue_url_rejected() {
    let config = EngineConfig {
        queue_url: "not a url".to_string(),
        ..valid_config()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { key, .. }) if key == "queue_url"
    ));
}

#[test]
fn test_missing_dead_letter_queue_rejected() {
    let config = EngineConfig {
        dead_letter_queue: String::new(),
        ..valid_config()
    };
    assert!(matches!(config.validate(), Err(ConfigError::Missing { .. })));
}

#[test]
fn test_invalid_dead_letter_queue_name_rejected() {
    let config = EngineConfig {
        dead_letter_queue: "bad queue name".to_string(),
        ..valid_config()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { key, .. }) if key == "dead_letter_queue"
    ));
}

#[test]
fn test_missing_function_name_rejected() {
    let config = EngineConfig {
        function_name: String::new(),
        ..valid_config()
    };
    assert!(matches!(config.validate(), Err(ConfigError::Missing { .. })));
}

#[test]
fn test_zero_concurrency_rejected() {
    let config = EngineConfig {
        concurrency: 0,
        ..valid_config()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { key, .. }) if key == "concurrency"
    ));
}

#[test]
fn test_batch_size_bounds() {
    let too_big = EngineConfig {
        max_batch_size: 11,
        ..valid_config()
    };
    assert!(too_big.validate().is_err());

    let zero = EngineConfig {
        max_batch_size: 0,
        ..valid_config()
    };
    assert!(zero.validate().is_err());

    let edge = EngineConfig {
        max_batch_size: 10,
        ..valid_config()
    };
    assert!(edge.validate().is_ok());
}

#[test]
fn test_wait_time_capped() {
    let config = EngineConfig {
        wait_time_secs: 21,
        ..valid_config()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { key, .. }) if key == "wait_time_secs"
    ));

    let edge = EngineConfig {
        wait_time_secs: 20,
        ..valid_config()
    };
    assert!(edge.validate().is_ok());
}

#[test]
fn test_receive_parameters_derivation() {
    let config = valid_config();
    let params = config.receive_parameters();

    assert_eq!(params.max_messages, 10);
    assert_eq!(params.visibility_timeout, Duration::from_secs(10));
    assert_eq!(params.wait_time, Duration::from_secs(5));
}

#[test]
fn test_poller_settings_carry_delays() {
    let config = EngineConfig {
        delays: DelayPolicy {
            empty_delay_ms: 1_000,
            drained_delay_ms: 50,
            error_delay_ms: 500,
        },
        ..valid_config()
    };

    let settings = config.poller_settings();
    assert_eq!(settings.delays.drained_delay_ms, 50);
    assert_eq!(settings.receive.max_messages, 10);
}

#[test]
fn test_config_deserializes_with_defaults() {
    let config: EngineConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config.concurrency, 4);

    let config: EngineConfig =
        serde_json::from_str(r#"{"concurrency": 8, "delays": {"error_delay_ms": 3000}}"#).unwrap();
    assert_eq!(config.concurrency, 8);
    assert_eq!(config.delays.error_delay_ms, 3_000);
    assert_eq!(config.delays.empty_delay_ms, 20_000);
}
