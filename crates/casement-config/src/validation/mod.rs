//! Full configuration validation.
//!
//! Validates numeric ranges per section and collects all errors into a
//! single `ConfigError`.

mod helpers;

#[cfg(test)]
mod tests;

use crate::schema::CasementConfig;
use casement_common::ConfigError;

use helpers::{validate_range_f64, validate_range_u64, validate_range_usize};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &CasementConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_logging(&mut errors, config);
    validate_bus(&mut errors, config);
    validate_chrome(&mut errors, config);
    validate_windows(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_logging(errors: &mut Vec<String>, config: &CasementConfig) {
    let logging = &config.logging;
    validate_range_usize(errors, "logging.max_entries", logging.max_entries, 1, 100_000);
    validate_range_usize(
        errors,
        "logging.max_string_length",
        logging.max_string_length,
        16,
        65_536,
    );
    validate_range_usize(errors, "logging.max_depth", logging.max_depth, 1, 32);
    if logging.redact_keys.iter().any(|k| k.trim().is_empty()) {
        errors.push("logging.redact_keys must not contain empty entries".into());
    }
    validate_range_u64(
        errors,
        "logging.max_file_size",
        logging.max_file_size,
        1024,
        1024 * 1024 * 1024,
    );
    validate_range_usize(errors, "logging.max_backups", logging.max_backups, 0, 100);
    if logging.file.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
        errors.push("logging.file must not be empty when set".into());
    }
}

fn validate_bus(errors: &mut Vec<String>, config: &CasementConfig) {
    validate_range_usize(
        errors,
        "bus.replay_capacity",
        config.bus.replay_capacity,
        1,
        1024,
    );
}

fn validate_chrome(errors: &mut Vec<String>, config: &CasementConfig) {
    let chrome = &config.chrome;
    validate_range_f64(errors, "chrome.viewport_width", chrome.viewport_width, 320.0, 16384.0);
    validate_range_f64(
        errors,
        "chrome.viewport_height",
        chrome.viewport_height,
        240.0,
        16384.0,
    );
    validate_range_f64(
        errors,
        "chrome.top_panel_height",
        chrome.top_panel_height,
        0.0,
        400.0,
    );
    validate_range_f64(
        errors,
        "chrome.bottom_panel_height",
        chrome.bottom_panel_height,
        0.0,
        400.0,
    );
    if chrome.top_panel_height + chrome.bottom_panel_height >= chrome.viewport_height {
        errors.push("chrome panels leave no room for content windows".into());
    }
}

fn validate_windows(errors: &mut Vec<String>, config: &CasementConfig) {
    let windows = &config.windows;
    validate_range_f64(errors, "windows.default_width", windows.default_width, 120.0, 8192.0);
    validate_range_f64(
        errors,
        "windows.default_height",
        windows.default_height,
        80.0,
        8192.0,
    );
    validate_range_f64(errors, "windows.cascade_offset", windows.cascade_offset, 0.0, 200.0);
    if windows.cascade_offset > 0.0 && windows.cascade_offset < 1.0 {
        errors.push(format!(
            "windows.cascade_offset = {} must be 0 (no cascade) or at least 1",
            windows.cascade_offset
        ));
    }
}
