//! Casement configuration system.
//!
//! TOML-based configuration for the shell: logger limits and redaction,
//! bus replay depth, chrome (panel) geometry and window placement defaults.
//! All sections use serde defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use casement_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! let json = config_to_json(&config);
//! println!("{json}");
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{CasementConfig, CONFIG_SCHEMA_VERSION};

use casement_common::ConfigError;
use std::path::Path;

/// Load config from the platform default path, creating it if missing.
pub fn load_config() -> Result<CasementConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path (the `--config` override).
pub fn load_config_from(path: &Path) -> Result<CasementConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &CasementConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let config = CasementConfig::default();
        let json = config_to_json(&config);
        assert!(json.contains("\"logging\""));
        assert!(json.contains("\"bus\""));
        assert!(json.contains("\"chrome\""));
        assert!(json.contains("\"windows\""));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let config = CasementConfig::default();
        let json = config_to_json(&config);
        let parsed: CasementConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.logging.max_entries, 500);
        assert_eq!(parsed.bus.replay_capacity, 16);
        assert!((parsed.chrome.top_panel_height - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn load_config_from_missing_path_fails() {
        let err = load_config_from(Path::new("/tmp/definitely_missing_casement.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }
}
