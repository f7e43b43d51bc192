//! Configuration schema types for Casement.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod bus;
mod chrome;
mod logging;
mod windows;

pub use bus::*;
pub use chrome::*;
pub use logging::*;
pub use windows::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Casement.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CasementConfig {
    pub logging: LoggingConfig,
    pub bus: BusConfig,
    pub chrome: ChromeConfig,
    pub windows: WindowsConfig,
}
