use super::*;
use crate::schema::CasementConfig;

#[test]
fn default_config_is_valid() {
    assert!(validate(&CasementConfig::default()).is_ok());
}

#[test]
fn zero_max_entries_rejected() {
    let mut config = CasementConfig::default();
    config.logging.max_entries = 0;
    let err = validate(&config).unwrap_err();
    assert!(err.to_string().contains("logging.max_entries"));
}

#[test]
fn depth_out_of_range_rejected() {
    let mut config = CasementConfig::default();
    config.logging.max_depth = 64;
    let err = validate(&config).unwrap_err();
    assert!(err.to_string().contains("logging.max_depth"));
}

#[test]
fn empty_redact_key_rejected() {
    let mut config = CasementConfig::default();
    config.logging.redact_keys.push("  ".into());
    let err = validate(&config).unwrap_err();
    assert!(err.to_string().contains("redact_keys"));
}

#[test]
fn panels_taller_than_viewport_rejected() {
    let mut config = CasementConfig::default();
    config.chrome.viewport_height = 300.0;
    config.chrome.top_panel_height = 200.0;
    config.chrome.bottom_panel_height = 150.0;
    let err = validate(&config).unwrap_err();
    assert!(err.to_string().contains("no room"));
}

#[test]
fn nan_geometry_rejected() {
    let mut config = CasementConfig::default();
    config.windows.default_width = f64::NAN;
    assert!(validate(&config).is_err());
}

#[test]
fn multiple_errors_are_joined() {
    let mut config = CasementConfig::default();
    config.bus.replay_capacity = 0;
    config.windows.cascade_offset = 500.0;
    let msg = validate(&config).unwrap_err().to_string();
    assert!(msg.contains("bus.replay_capacity"));
    assert!(msg.contains("windows.cascade_offset"));
    assert!(msg.contains("; "));
}

#[test]
fn sub_pixel_cascade_offset_rejected() {
    let mut config = CasementConfig::default();
    config.windows.cascade_offset = 1e-300;
    let msg = validate(&config).unwrap_err().to_string();
    assert!(msg.contains("windows.cascade_offset"));

    config.windows.cascade_offset = 0.0;
    assert!(validate(&config).is_ok());
    config.windows.cascade_offset = 1.0;
    assert!(validate(&config).is_ok());
}

#[test]
fn log_file_limits_validated() {
    let mut config = CasementConfig::default();
    config.logging.max_file_size = 10;
    config.logging.max_backups = 1000;
    let msg = validate(&config).unwrap_err().to_string();
    assert!(msg.contains("logging.max_file_size"));
    assert!(msg.contains("logging.max_backups"));

    let mut config = CasementConfig::default();
    config.logging.file = Some(std::path::PathBuf::new());
    assert!(validate(&config).is_err());
    config.logging.file = Some("casement.log".into());
    config.logging.max_backups = 0;
    assert!(validate(&config).is_ok());
}
