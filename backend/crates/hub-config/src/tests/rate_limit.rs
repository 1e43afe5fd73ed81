use crate::Config;
use crate::RateLimitConfig;
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, contains_substring, eq, err, ok};
use serial_test::serial;

// =========================================================================
// Validation Tests - Rate Limit
// =========================================================================

#[test]
fn given_zero_global_refill_when_validate_then_ok() {
    // Given - a bucket that never refills is a legal (if harsh) setup
    let config = RateLimitConfig {
        global_capacity: 1,
        global_refill: 0,
        ..Default::default()
    };

    // When
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
}

#[test]
fn given_zero_client_capacity_when_validate_then_error() {
    let config = RateLimitConfig {
        client_capacity: 0,
        ..Default::default()
    };

    let result = config.validate();

    assert_that!(result, err(anything()));
    let err_msg = format!("{}", result.unwrap_err());
    assert_that!(err_msg, contains_substring("client_capacity"));
}

#[test]
fn given_zero_global_tick_when_validate_then_error() {
    let config = RateLimitConfig {
        global_tick_ms: 0,
        ..Default::default()
    };

    assert_that!(config.validate(), err(anything()));
}

#[test]
#[serial]
fn given_env_overrides_when_load_then_rate_limits_applied() {
    // Given
    let _temp = setup_config_dir();
    let _capacity = EnvGuard::set("HUB_RATE_LIMIT_GLOBAL_CAPACITY", "50");
    let _refill = EnvGuard::set("HUB_RATE_LIMIT_GLOBAL_REFILL", "5");
    let _client = EnvGuard::set("HUB_RATE_LIMIT_CLIENT_REFILL_PER_SEC", "3");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.rate_limit.global_capacity, eq(50));
    assert_that!(config.rate_limit.global_refill, eq(5));
    assert_that!(config.rate_limit.client_refill_per_sec, eq(3));
    assert_that!(config.validate(), ok(anything()));
}
