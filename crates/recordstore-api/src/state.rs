//! Application state wiring the gateway to its configuration.
//!
//! The gateway itself is stateless; AppState only pins it to the concrete
//! SQLite implementation and remembers which database file to target.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use recordstore_infra::config::{load_gateway_config, resolve_data_dir, resolve_database_path};
use recordstore_infra::sqlite::gateway::SqliteGateway;
use recordstore_types::config::GatewayConfig;

/// Shared application state used by every CLI command.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<SqliteGateway>,
    pub config: GatewayConfig,
    pub data_dir: PathBuf,
    pub database: PathBuf,
}

impl AppState {
    /// Load configuration and resolve the target database file.
    pub async fn init(db_override: Option<&Path>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let config = load_gateway_config(&data_dir).await;
        let database = resolve_database_path(&data_dir, &config, db_override);

        // The database may live under the data dir; make sure its parent exists.
        if let Some(parent) = database.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        tracing::debug!(database = %database.display(), "resolved database");

        Ok(Self {
            gateway: Arc::new(SqliteGateway::new(&config)),
            config,
            data_dir,
            database,
        })
    }
}
