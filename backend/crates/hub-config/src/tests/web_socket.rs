use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, contains_substring, err, ok};
use serial_test::serial;

// =========================================================================
// Validation Tests - WebSocket
// =========================================================================

#[test]
#[serial]
fn given_read_timeout_less_than_ping_interval_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _interval = EnvGuard::set("HUB_WS_PING_INTERVAL_SECS", "60");
    let _timeout = EnvGuard::set("HUB_WS_READ_TIMEOUT_SECS", "30");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_zero_send_buffer_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _guard = EnvGuard::set("HUB_WS_SEND_BUFFER_SIZE", "0");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
    let err_msg = format!("{}", result.unwrap_err());
    assert_that!(err_msg, contains_substring("send_buffer_size"));
}

#[test]
#[serial]
fn given_zero_coalesce_when_validate_then_ok() {
    // Given
    let _temp = setup_config_dir();
    let _guard = EnvGuard::set("HUB_WS_MAX_COALESCE", "0");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
}

#[test]
#[serial]
fn given_huge_write_timeout_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _guard = EnvGuard::set("HUB_WS_WRITE_TIMEOUT_SECS", "100000");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}
