//! Tests for the full validation pipeline.

use super::*;

#[test]
fn default_config_validates() {
    let config = RteConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_debounce_too_large() {
    let mut config = RteConfig::default();
    config.bridge.change_debounce_ms = 60_000;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("bridge.change_debounce_ms"));
}

#[test]
fn zero_debounce_is_allowed() {
    let mut config = RteConfig::default();
    config.bridge.change_debounce_ms = 0;
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_tiny_message_limit() {
    let mut config = RteConfig::default();
    config.bridge.max_message_bytes = 10;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("bridge.max_message_bytes"));
}

#[test]
fn catches_zero_history_depth() {
    let mut config = RteConfig::default();
    config.history.max_depth = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("history.max_depth"));
}

#[test]
fn catches_bad_page_scheme() {
    let mut config = RteConfig::default();
    config.editor.page_url = "file:///tmp/editor.html".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("editor.page_url"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = RteConfig::default();
    config.history.max_depth = 0;
    config.image_menu.max_width_px = 1;
    config.image_menu.max_radius_px = 5000;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("history.max_depth"));
    assert!(err.contains("image_menu.max_width_px"));
    assert!(err.contains("image_menu.max_radius_px"));
    assert_eq!(err.matches(';').count(), 2);
}
