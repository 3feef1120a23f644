//! Configuration loading and data directory resolution.
//!
//! Reads `config.toml` from the data directory (`~/.recordstore/` by default)
//! and deserializes it into [`GatewayConfig`]. Falls back to defaults when
//! the file is missing or malformed.

use std::path::{Path, PathBuf};

use recordstore_types::config::GatewayConfig;

/// Resolve the data directory.
///
/// Uses `RECORDSTORE_DATA_DIR` if set, otherwise `~/.recordstore`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("RECORDSTORE_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".recordstore");
    }

    // Last resort: current directory
    PathBuf::from(".recordstore")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GatewayConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_gateway_config(data_dir: &Path) -> GatewayConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GatewayConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GatewayConfig::default();
        }
    };

    match toml::from_str::<GatewayConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GatewayConfig::default()
        }
    }
}

/// Resolve the database file to operate on.
///
/// Priority:
/// 1. Explicit override (e.g. `--db`), used as given
/// 2. `database` from config; relative paths are joined onto `data_dir`
pub fn resolve_database_path(
    data_dir: &Path,
    config: &GatewayConfig,
    explicit: Option<&Path>,
) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    let configured = Path::new(&config.database);
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        data_dir.join(configured)
    }
}
