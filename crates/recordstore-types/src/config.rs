//! Gateway configuration types.
//!
//! `GatewayConfig` represents the optional `config.toml` in the data
//! directory. Every field has a default, so an empty file is valid.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the record store gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Default database file. Relative paths resolve against the data directory.
    #[serde(default = "default_database")]
    pub database: String,

    /// Create the database file on first open when it does not exist.
    #[serde(default = "default_create_if_missing")]
    pub create_if_missing: bool,

    /// How long the engine waits on a locked file before failing with SQLITE_BUSY.
    #[serde(default = "default_busy_timeout_secs")]
    pub busy_timeout_secs: u64,
}

fn default_database() -> String {
    "records.db".to_string()
}

fn default_create_if_missing() -> bool {
    true
}

fn default_busy_timeout_secs() -> u64 {
    5
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            create_if_missing: default_create_if_missing(),
            busy_timeout_secs: default_busy_timeout_secs(),
        }
    }
}
