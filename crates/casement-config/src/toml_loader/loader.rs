//! Config loading from disk.

use crate::schema::CasementConfig;
use crate::validation;
use casement_common::ConfigError;
use std::path::Path;
use tracing::{info, warn};

use super::paths::{create_default_config, default_config_path};

/// Load config from a specific TOML file path.
///
/// Missing fields take their serde defaults. If validation fails, a warning
/// is logged and the default config is returned instead.
pub fn load_from_path(path: &Path) -> Result<CasementConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: CasementConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    if let Err(e) = validation::validate(&config) {
        warn!("config validation warning: {e}");
        warn!("falling back to default config");
        return Ok(CasementConfig::default());
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from `$CASEMENT_CONFIG`, or the platform-specific default path.
///
/// On Linux: `~/.config/casement/config.toml`
/// On macOS: `~/Library/Application Support/casement/config.toml`
///
/// If the file does not exist, a commented default is written and the
/// defaults are returned.
pub fn load_default() -> Result<CasementConfig, ConfigError> {
    let path = default_config_path()?;

    if !path.exists() {
        info!("no config found at {}, creating default", path.display());
        create_default_config(&path)?;
        return Ok(CasementConfig::default());
    }

    load_from_path(&path)
}
