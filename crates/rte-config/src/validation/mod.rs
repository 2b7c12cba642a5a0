//! Full configuration validation.
//!
//! Validates numeric ranges and the editor page URL, collecting every
//! problem into a single `ConfigError`.

mod helpers;

#[cfg(test)]
mod tests;

use crate::schema::RteConfig;
use helpers::validate_range;
use rte_common::ConfigError;

/// Schemes the editor page may be loaded from.
const PAGE_SCHEMES: &[&str] = &["rte://", "http://rte.localhost", "https://"];

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &RteConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_editor(&mut errors, config);
    validate_bridge(&mut errors, config);
    validate_document(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_editor(errors: &mut Vec<String>, config: &RteConfig) {
    let url = config.editor.page_url.trim();
    if !PAGE_SCHEMES.iter().any(|scheme| url.starts_with(scheme)) {
        errors.push(format!(
            "editor.page_url = {url:?} must start with one of {PAGE_SCHEMES:?}"
        ));
    }
}

fn validate_bridge(errors: &mut Vec<String>, config: &RteConfig) {
    validate_range(
        errors,
        "bridge.change_debounce_ms",
        config.bridge.change_debounce_ms,
        0,
        5000,
    );
    validate_range(
        errors,
        "bridge.max_message_bytes",
        config.bridge.max_message_bytes,
        1024,
        64 * 1024 * 1024,
    );
}

fn validate_document(errors: &mut Vec<String>, config: &RteConfig) {
    validate_range(errors, "history.max_depth", config.history.max_depth, 1, 10_000);
    validate_range(
        errors,
        "image_menu.max_width_px",
        config.image_menu.max_width_px,
        16,
        16_384,
    );
    validate_range(
        errors,
        "image_menu.max_radius_px",
        config.image_menu.max_radius_px,
        0,
        1024,
    );
}
