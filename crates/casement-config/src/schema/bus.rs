//! Event bus configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Events retained per topic for late subscribers (valid range: 1-1024).
    pub replay_capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            replay_capacity: 16,
        }
    }
}
