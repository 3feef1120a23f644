//! Per-call SQLite connections.
//!
//! Every gateway operation opens a fresh `SqliteConnection` to the target file
//! and closes it on both the success and the failure path. A failure while
//! closing is logged and never replaces the operation's own result.

use std::path::Path;
use std::time::Duration;

use recordstore_types::config::GatewayConfig;
use recordstore_types::error::{GatewayError, StatementErrorKind};
use sqlx::Connection;
use sqlx::error::ErrorKind;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};

const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// Connection settings shared by every call of a gateway.
#[derive(Debug, Clone)]
pub struct ConnectSettings {
    create_if_missing: bool,
    busy_timeout: Duration,
}

impl ConnectSettings {
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            create_if_missing: config.create_if_missing,
            busy_timeout: Duration::from_secs(config.busy_timeout_secs),
        }
    }

    fn options(&self, path: &Path) -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(self.create_if_missing)
            .busy_timeout(self.busy_timeout)
    }

    /// Open a new connection to the database file at `path`.
    pub async fn open(&self, path: &Path) -> Result<SqliteConnection, GatewayError> {
        SqliteConnection::connect_with(&self.options(path))
            .await
            .map_err(|e| GatewayError::Connection(format!("{}: {e}", path.display())))
    }
}

impl Default for ConnectSettings {
    fn default() -> Self {
        Self::from_config(&GatewayConfig::default())
    }
}

/// Close a connection, logging (not returning) any failure.
pub async fn close(conn: SqliteConnection) {
    tracing::debug!("closing connection");
    if let Err(e) = conn.close().await {
        tracing::warn!(error = %e, "failed to close database connection");
    }
}

/// Map an engine error raised while preparing or running a statement.
pub fn statement_error(err: sqlx::Error) -> GatewayError {
    match &err {
        sqlx::Error::Database(db) => {
            let kind = match db.kind() {
                ErrorKind::UniqueViolation => StatementErrorKind::UniqueViolation,
                ErrorKind::NotNullViolation => StatementErrorKind::NotNullViolation,
                ErrorKind::ForeignKeyViolation => StatementErrorKind::ForeignKeyViolation,
                ErrorKind::CheckViolation => StatementErrorKind::CheckViolation,
                _ if is_busy(db.code().as_deref()) => StatementErrorKind::Busy,
                _ => StatementErrorKind::Other,
            };
            GatewayError::statement(kind, db.message())
        }
        _ => GatewayError::statement(StatementErrorKind::Other, err.to_string()),
    }
}

/// Extended result codes carry the primary code in their low byte.
fn is_busy(code: Option<&str>) -> bool {
    code.and_then(|c| c.parse::<i32>().ok())
        .map(|c| matches!(c & 0xff, SQLITE_BUSY | SQLITE_LOCKED))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_busy() {
        assert!(is_busy(Some("5")));
        assert!(is_busy(Some("6")));
        // SQLITE_BUSY_SNAPSHOT
        assert!(is_busy(Some("517")));
        assert!(!is_busy(Some("19")));
        assert!(!is_busy(Some("not a code")));
        assert!(!is_busy(None));
    }

    #[tokio::test]
    async fn test_open_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.db");

        let conn = ConnectSettings::default().open(&path).await.unwrap();
        close(conn).await;

        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_open_missing_file_without_create() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");
        let settings = ConnectSettings::from_config(&GatewayConfig {
            create_if_missing: false,
            ..GatewayConfig::default()
        });

        let err = settings.open(&path).await.unwrap_err();
        assert!(matches!(err, GatewayError::Connection(_)));
        assert!(!path.exists());
    }
}
