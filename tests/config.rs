use std::time::Duration;

use token_guard_core::{BackoffConfig, ConfigError, RateLimiter, RateLimiterConfig};

#[test]
fn test_valid_config_constructs() {
    let config = RateLimiterConfig::new(100, 10, Duration::from_millis(100));
    assert!(RateLimiter::new(config).is_ok());
}

#[test]
fn test_zero_capacity_rejected() {
    let config = RateLimiterConfig::new(0, 10, Duration::from_millis(100));
    assert_eq!(RateLimiter::new(config).err(), Some(ConfigError::ZeroCapacity));
}

#[test]
fn test_zero_refill_amount_rejected() {
    let config = RateLimiterConfig::new(100, 0, Duration::from_millis(100));
    assert_eq!(
        RateLimiter::new(config).err(),
        Some(ConfigError::ZeroRefillAmount)
    );
}

#[test]
fn test_zero_refill_interval_rejected() {
    let config = RateLimiterConfig::new(100, 10, Duration::ZERO);
    assert_eq!(
        RateLimiter::new(config).err(),
        Some(ConfigError::ZeroRefillInterval)
    );
}

#[test]
fn test_refill_amount_above_capacity_is_warn_only() {
    // A refill round larger than the bucket overshoots and wastes credit,
    // but it is an advisory anomaly, not a construction failure.
    let config = RateLimiterConfig::new(3, 10, Duration::from_millis(100));
    let limiter = RateLimiter::new(config).unwrap();
    assert_eq!(limiter.snapshot().available_tokens, 3);
}

#[test]
fn test_rate_per_second_derivation() {
    // 5 tokens per 100ms = 50 tokens per second.
    let config = RateLimiterConfig::new(50, 5, Duration::from_millis(100));
    assert!((config.rate_per_second() - 50.0).abs() < 1e-9);

    // 1 token per 2s = 0.5 tokens per second.
    let config = RateLimiterConfig::new(10, 1, Duration::from_secs(2));
    assert!((config.rate_per_second() - 0.5).abs() < 1e-9);
}

#[test]
fn test_config_accessor() {
    let config = RateLimiterConfig::new(7, 2, Duration::from_millis(250));
    let limiter = RateLimiter::new(config).unwrap();
    assert_eq!(*limiter.config(), config);
}

#[test]
fn test_custom_backoff_accepted() {
    let config = RateLimiterConfig::new(10, 1, Duration::from_millis(50));
    let backoff = BackoffConfig {
        spin_limit: 0,
        yield_limit: 0,
        sleep_slice: Duration::from_micros(200),
    };
    let limiter = RateLimiter::with_backoff(config, backoff).unwrap();
    assert!(limiter.try_acquire());
}

#[test]
fn test_config_serde_roundtrip() {
    let config = RateLimiterConfig::new(100, 10, Duration::from_millis(100));
    let json = serde_json::to_string(&config).unwrap();
    let back: RateLimiterConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(config, back);
}
