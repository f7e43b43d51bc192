//! Where the config file lives, and seeding it on first run.

use casement_common::ConfigError;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::template::default_config_toml;

/// Environment variable that points at a config file, bypassing the
/// platform config directory.
pub const CONFIG_PATH_ENV: &str = "CASEMENT_CONFIG";

/// `$CASEMENT_CONFIG` if set and non-empty, else
/// `<platform config dir>/casement/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    resolve_config_path(std::env::var_os(CONFIG_PATH_ENV), dirs::config_dir())
}

fn resolve_config_path(
    env_override: Option<OsString>,
    config_dir: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = env_override.filter(|p| !p.is_empty()) {
        debug!("config path taken from ${CONFIG_PATH_ENV}");
        return Ok(PathBuf::from(path));
    }
    config_dir
        .map(|dir| dir.join("casement").join("config.toml"))
        .ok_or_else(|| {
            ConfigError::ParseError(format!(
                "no platform config directory; set ${CONFIG_PATH_ENV}"
            ))
        })
}

/// Write the commented template to `path` unless a file is already there.
///
/// The template goes to a sibling `.partial` file first and is renamed into
/// place, so a crash never leaves a truncated config behind. Returns whether
/// a new file was written.
pub fn create_default_config(path: &Path) -> Result<bool, ConfigError> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }

    let mut partial = OsString::from(path.as_os_str());
    partial.push(".partial");
    let partial = PathBuf::from(partial);

    let mut file = fs::File::create(&partial).map_err(io_error(&partial))?;
    file.write_all(default_config_toml().as_bytes())
        .and_then(|()| file.sync_all())
        .map_err(io_error(&partial))?;
    drop(file);
    fs::rename(&partial, path).map_err(io_error(path))?;

    info!(path = %path.display(), "wrote default config");
    Ok(true)
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> ConfigError {
    let path = path.to_path_buf();
    move |source| ConfigError::Io { path, source }
}
