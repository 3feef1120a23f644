//! SQLite gateway implementation.
//!
//! Implements `RecordGateway` from `recordstore-core` using sqlx. Each call
//! moves through `connecting -> executing -> closing` and resolves with the
//! statement's outcome; the connection is closed on every exit path.

use std::path::Path;

use recordstore_core::gateway::RecordGateway;
use recordstore_core::statement::Statement;
use recordstore_types::config::GatewayConfig;
use recordstore_types::error::GatewayError;
use recordstore_types::record::{Predicate, Record, Row};
use recordstore_types::schema::{DeleteFilter, TableSchema};
use recordstore_types::value::Value;
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteConnection, SqliteQueryResult, SqliteRow};
use sqlx::{Column as _, Row as _, TypeInfo as _, ValueRef as _};
use tracing::{debug, info, warn};

use super::connection::{ConnectSettings, close, statement_error};

/// SQLite-backed implementation of `RecordGateway`.
///
/// Holds only immutable connection settings, so a single instance can be
/// shared freely across tasks.
#[derive(Debug, Clone, Default)]
pub struct SqliteGateway {
    settings: ConnectSettings,
}

impl SqliteGateway {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            settings: ConnectSettings::from_config(config),
        }
    }

    /// Open, run one write statement, close.
    async fn run(&self, path: &Path, statement: &Statement) -> Result<SqliteQueryResult, GatewayError> {
        debug!("connecting");
        let mut conn = self.settings.open(path).await?;

        debug!(sql = %statement.sql, "executing");
        let result = bind_params(sqlx::query(&statement.sql), &statement.params)
            .execute(&mut conn)
            .await
            .map_err(statement_error);

        close(conn).await;
        result
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn bind_params<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &'q [Value],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for value in params {
        query = match value {
            Value::Null => query.bind(None::<i64>),
            Value::Integer(i) => query.bind(*i),
            Value::Real(r) => query.bind(*r),
            Value::Text(s) => query.bind(s.as_str()),
            Value::Blob(b) => query.bind(b.as_slice()),
        };
    }
    query
}

/// Decode a result row by each value's runtime storage class.
fn decode_row(row: &SqliteRow) -> Result<Row, sqlx::Error> {
    let mut out = Row::new();
    for column in row.columns() {
        let ordinal = column.ordinal();
        let raw = row.try_get_raw(ordinal)?;
        let value = if raw.is_null() {
            Value::Null
        } else {
            match raw.type_info().name() {
                "INTEGER" | "BOOLEAN" => Value::Integer(row.try_get_unchecked(ordinal)?),
                "REAL" => Value::Real(row.try_get_unchecked(ordinal)?),
                "BLOB" => Value::Blob(row.try_get_unchecked(ordinal)?),
                _ => Value::Text(row.try_get_unchecked(ordinal)?),
            }
        };
        out.insert(column.name(), value);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// RecordGateway implementation
// ---------------------------------------------------------------------------

impl RecordGateway for SqliteGateway {
    #[tracing::instrument(
        name = "gateway",
        skip(self, path, schema),
        fields(op = "define_table", path = %path.display())
    )]
    async fn define_table(
        &self,
        path: &Path,
        table: &str,
        schema: &TableSchema,
    ) -> Result<(), GatewayError> {
        let statement = Statement::create_table(table, schema)?;
        self.run(path, &statement).await?;
        info!(columns = schema.len(), "table defined");
        Ok(())
    }

    #[tracing::instrument(
        name = "gateway",
        skip(self, path, record),
        fields(op = "write", path = %path.display())
    )]
    async fn write(&self, path: &Path, table: &str, record: &Record) -> Result<i64, GatewayError> {
        let statement = Statement::insert(table, record)?;
        let id = self.run(path, &statement).await?.last_insert_rowid();
        info!(id, "record written");
        Ok(id)
    }

    #[tracing::instrument(
        name = "gateway",
        skip(self, path, query),
        fields(op = "read", path = %path.display())
    )]
    async fn read(&self, path: &Path, query: &str) -> Result<Vec<Row>, GatewayError> {
        let statement = Statement::query(query)?;

        debug!("connecting");
        let mut conn = self.settings.open(path).await?;

        debug!(sql = %statement.sql, "executing");
        let result = match sqlx::query(&statement.sql).fetch_all(&mut conn).await {
            Ok(rows) => rows
                .iter()
                .map(decode_row)
                .collect::<Result<Vec<_>, _>>()
                .map_err(statement_error),
            Err(e) => Err(statement_error(e)),
        };

        close(conn).await;
        let rows = result?;
        debug!(rows = rows.len(), "query returned");
        Ok(rows)
    }

    #[tracing::instrument(
        name = "gateway",
        skip(self, path, set, predicate),
        fields(op = "update", path = %path.display())
    )]
    async fn update(
        &self,
        path: &Path,
        table: &str,
        set: &Record,
        predicate: &Predicate,
    ) -> Result<u64, GatewayError> {
        let statement = Statement::update(table, set, predicate)?;
        let changes = self.run(path, &statement).await?.rows_affected();
        info!(changes, "rows updated");
        Ok(changes)
    }

    #[tracing::instrument(
        name = "gateway",
        skip(self, path, filter),
        fields(op = "delete", path = %path.display())
    )]
    async fn delete(
        &self,
        path: &Path,
        table: &str,
        filter: &DeleteFilter,
    ) -> Result<u64, GatewayError> {
        let statement = Statement::delete(table, filter)?;
        if matches!(filter, DeleteFilter::AllRows) {
            warn!("deleting every row");
        }
        let changes = self.run(path, &statement).await?.rows_affected();
        info!(changes, "rows deleted");
        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recordstore_types::error::{ContractViolation, StatementErrorKind};
    use std::path::PathBuf;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn test_db() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        (dir, path)
    }

    fn users_schema() -> TableSchema {
        TableSchema::new()
            .column("name", ["TEXT", "NOT NULL"])
            .column("email", ["TEXT", "UNIQUE", "NOT NULL"])
    }

    fn user(name: &str, email: &str) -> Record {
        Record::new().with("name", name).with("email", email)
    }

    async fn users_table(gateway: &SqliteGateway, path: &Path) {
        gateway.define_table(path, "users", &users_schema()).await.unwrap();
    }

    #[tokio::test]
    async fn test_define_table_is_idempotent() {
        let (_dir, path) = test_db();
        let gateway = SqliteGateway::default();

        gateway.define_table(&path, "users", &users_schema()).await.unwrap();
        gateway.define_table(&path, "users", &users_schema()).await.unwrap();

        let tables = gateway
            .read(&path, "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'users'")
            .await
            .unwrap();
        assert_eq!(tables.len(), 1);
    }

    #[tokio::test]
    async fn test_write_returns_increasing_ids() {
        let (_dir, path) = test_db();
        let gateway = SqliteGateway::default();
        users_table(&gateway, &path).await;

        let mut last = 0;
        for i in 0..5 {
            let id = gateway
                .write(&path, "users", &user("User", &format!("user{i}@example.com")))
                .await
                .unwrap();
            assert!(id > last, "id {id} should exceed {last}");
            last = id;
        }
        assert_eq!(last, 5);
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let (_dir, path) = test_db();
        let gateway = SqliteGateway::default();
        users_table(&gateway, &path).await;

        let first = gateway.write(&path, "users", &user("A", "a@example.com")).await.unwrap();
        gateway
            .delete(&path, "users", &DeleteFilter::Matching(Predicate::new().with("idx", first)))
            .await
            .unwrap();
        let second = gateway.write(&path, "users", &user("B", "b@example.com")).await.unwrap();

        assert!(second > first);
    }

    #[tokio::test]
    async fn test_read_all_rows_with_all_columns() {
        let (_dir, path) = test_db();
        let gateway = SqliteGateway::default();
        users_table(&gateway, &path).await;

        for i in 0..3 {
            gateway
                .write(&path, "users", &user(&format!("User {i}"), &format!("u{i}@example.com")))
                .await
                .unwrap();
        }

        let rows = gateway.read(&path, "SELECT * FROM users").await.unwrap();
        assert_eq!(rows.len(), 3);
        for row in &rows {
            assert_eq!(row.columns().collect::<Vec<_>>(), vec!["idx", "name", "email"]);
        }
    }

    #[tokio::test]
    async fn test_read_respects_query_ordering() {
        let (_dir, path) = test_db();
        let gateway = SqliteGateway::default();
        users_table(&gateway, &path).await;

        for i in 0..3 {
            gateway
                .write(&path, "users", &user("U", &format!("u{i}@example.com")))
                .await
                .unwrap();
        }

        let rows = gateway
            .read(&path, "SELECT idx, email FROM users ORDER BY idx DESC LIMIT 2")
            .await
            .unwrap();
        let ids: Vec<i64> = rows
            .iter()
            .map(|r| r.get("idx").and_then(Value::as_integer).unwrap())
            .collect();
        assert_eq!(ids, vec![3, 2]);
        assert_eq!(rows[0].columns().collect::<Vec<_>>(), vec!["idx", "email"]);
    }

    #[tokio::test]
    async fn test_write_read_roundtrip_by_identity() {
        let (_dir, path) = test_db();
        let gateway = SqliteGateway::default();
        gateway
            .define_table(
                &path,
                "samples",
                &TableSchema::new()
                    .column("label", ["TEXT"])
                    .column("count", ["INTEGER"])
                    .column("ratio", ["REAL"])
                    .column("note", ["TEXT"])
                    .column("payload", ["BLOB"]),
            )
            .await
            .unwrap();

        let record = Record::new()
            .with("label", "alpha")
            .with("count", 42)
            .with("ratio", 0.25)
            .with("note", Value::Null)
            .with("payload", vec![0u8, 1, 2, 255]);
        let id = gateway.write(&path, "samples", &record).await.unwrap();

        let rows = gateway
            .read(&path, &format!("SELECT * FROM samples WHERE idx = {id}"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.get("idx"), Some(&Value::Integer(id)));
        for (column, value) in record.iter() {
            assert_eq!(row.get(column), Some(value), "column {column}");
        }
    }

    #[tokio::test]
    async fn test_duplicate_unique_value_rejected() {
        let (_dir, path) = test_db();
        let gateway = SqliteGateway::default();
        users_table(&gateway, &path).await;

        gateway.write(&path, "users", &user("A", "same@example.com")).await.unwrap();
        let err = gateway
            .write(&path, "users", &user("B", "same@example.com"))
            .await
            .unwrap_err();

        assert!(err.is_unique_violation(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_not_null_violation() {
        let (_dir, path) = test_db();
        let gateway = SqliteGateway::default();
        users_table(&gateway, &path).await;

        let err = gateway
            .write(&path, "users", &Record::new().with("name", "no email"))
            .await
            .unwrap_err();
        assert_eq!(err.statement_kind(), Some(StatementErrorKind::NotNullViolation));
    }

    #[tokio::test]
    async fn test_update_no_match_returns_zero() {
        let (_dir, path) = test_db();
        let gateway = SqliteGateway::default();
        users_table(&gateway, &path).await;
        gateway.write(&path, "users", &user("A", "a@example.com")).await.unwrap();

        let changes = gateway
            .update(
                &path,
                "users",
                &Record::new().with("name", "Z"),
                &Predicate::new().with("idx", 999),
            )
            .await
            .unwrap();
        assert_eq!(changes, 0);
    }

    #[tokio::test]
    async fn test_update_conjunctive_predicate() {
        let (_dir, path) = test_db();
        let gateway = SqliteGateway::default();
        users_table(&gateway, &path).await;
        gateway.write(&path, "users", &user("Same", "a@example.com")).await.unwrap();
        gateway.write(&path, "users", &user("Same", "b@example.com")).await.unwrap();

        let changes = gateway
            .update(
                &path,
                "users",
                &Record::new().with("name", "Changed"),
                &Predicate::new().with("name", "Same").with("email", "b@example.com"),
            )
            .await
            .unwrap();
        assert_eq!(changes, 1);

        let changed = gateway
            .read(&path, "SELECT email FROM users WHERE name = 'Changed'")
            .await
            .unwrap();
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].get("email"), Some(&Value::from("b@example.com")));
    }

    #[tokio::test]
    async fn test_update_empty_set_rejected_before_connecting() {
        let (_dir, path) = test_db();
        let gateway = SqliteGateway::default();

        let err = gateway
            .update(&path, "users", &Record::new(), &Predicate::new().with("idx", 1))
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::Contract(ContractViolation::EmptySetClause)));
        assert!(!path.exists(), "no connection should have been opened");
    }

    #[tokio::test]
    async fn test_delete_one_leaves_others() {
        let (_dir, path) = test_db();
        let gateway = SqliteGateway::default();
        users_table(&gateway, &path).await;
        let a = gateway.write(&path, "users", &user("A", "a@example.com")).await.unwrap();
        gateway.write(&path, "users", &user("B", "b@example.com")).await.unwrap();
        gateway.write(&path, "users", &user("C", "c@example.com")).await.unwrap();

        let deleted = gateway
            .delete(&path, "users", &DeleteFilter::Matching(Predicate::new().with("idx", a)))
            .await
            .unwrap();
        assert_eq!(deleted, 1);

        let rows = gateway.read(&path, "SELECT * FROM users").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.get("idx") != Some(&Value::Integer(a))));
    }

    #[tokio::test]
    async fn test_delete_all_rows() {
        let (_dir, path) = test_db();
        let gateway = SqliteGateway::default();
        users_table(&gateway, &path).await;
        for i in 0..4 {
            gateway
                .write(&path, "users", &user("U", &format!("u{i}@example.com")))
                .await
                .unwrap();
        }

        let deleted = gateway.delete(&path, "users", &DeleteFilter::AllRows).await.unwrap();
        assert_eq!(deleted, 4);
        assert!(gateway.read(&path, "SELECT * FROM users").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_empty_predicate_refused() {
        let (_dir, path) = test_db();
        let gateway = SqliteGateway::default();
        users_table(&gateway, &path).await;
        gateway.write(&path, "users", &user("A", "a@example.com")).await.unwrap();

        let err = gateway
            .delete(&path, "users", &DeleteFilter::Matching(Predicate::new()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Contract(ContractViolation::UnconfirmedDeleteAll(_))
        ));

        let rows = gateway.read(&path, "SELECT * FROM users").await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_read_is_statement_error() {
        let (_dir, path) = test_db();
        let gateway = SqliteGateway::default();

        let err = gateway.read(&path, "SELEKT nothing").await.unwrap_err();
        assert_eq!(err.statement_kind(), Some(StatementErrorKind::Other));
    }

    #[tokio::test]
    async fn test_read_never_runs_trailing_statement() {
        let (_dir, path) = test_db();
        let gateway = SqliteGateway::default();
        users_table(&gateway, &path).await;
        gateway.write(&path, "users", &user("A", "a@example.com")).await.unwrap();
        gateway.write(&path, "users", &user("B", "b@example.com")).await.unwrap();

        let err = gateway
            .read(&path, "SELECT * FROM users; DELETE FROM users")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Contract(ContractViolation::MultipleStatements)
        ));

        let rows = gateway.read(&path, "SELECT * FROM users;").await.unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_non_finite_real_rejected_before_connecting() {
        let (_dir, path) = test_db();
        let gateway = SqliteGateway::default();

        let err = gateway
            .write(&path, "samples", &Record::new().with("ratio", f64::NAN))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Contract(ContractViolation::NonFiniteReal(ref column)) if column == "ratio"
        ));
        assert!(!path.exists(), "no connection should have been opened");
    }

    #[tokio::test]
    async fn test_constraint_cannot_smuggle_extra_column() {
        let (_dir, path) = test_db();
        let gateway = SqliteGateway::default();

        let err = gateway
            .define_table(&path, "users", &TableSchema::new().column("name", ["TEXT, extra TEXT"]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Contract(ContractViolation::InvalidConstraint { .. })
        ));

        gateway
            .define_table(
                &path,
                "users",
                &TableSchema::new().column("kind", ["INTEGER", "CHECK (kind IN (1, 2))"]),
            )
            .await
            .unwrap();
        let rows = gateway
            .read(&path, "SELECT name FROM pragma_table_info('users') ORDER BY cid")
            .await
            .unwrap();
        let columns: Vec<&str> = rows
            .iter()
            .filter_map(|r| r.get("name").and_then(Value::as_text))
            .collect();
        assert_eq!(columns, vec!["idx", "kind"]);
    }

    #[tokio::test]
    async fn test_unopenable_path_is_connection_error() {
        let (dir, _path) = test_db();
        let path = dir.path().join("missing-dir").join("test.db");
        let gateway = SqliteGateway::default();

        let err = gateway.define_table(&path, "users", &users_schema()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Connection(_)), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_unsafe_table_name_rejected() {
        let (_dir, path) = test_db();
        let gateway = SqliteGateway::default();

        let err = gateway
            .write(&path, "users; DROP TABLE users", &user("A", "a@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Contract(ContractViolation::InvalidIdentifier(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_writes_to_same_file() {
        let (_dir, path) = test_db();
        let gateway = Arc::new(SqliteGateway::default());
        users_table(&gateway, &path).await;

        let mut handles = Vec::new();
        for i in 0..8 {
            let gateway = Arc::clone(&gateway);
            let path = path.clone();
            handles.push(tokio::spawn(async move {
                gateway
                    .write(&path, "users", &user("U", &format!("c{i}@example.com")))
                    .await
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap());
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 8);

        let rows = gateway.read(&path, "SELECT idx FROM users").await.unwrap();
        assert_eq!(rows.len(), 8);
    }

    #[tokio::test]
    async fn test_users_scenario() {
        let (_dir, path) = test_db();
        let gateway = SqliteGateway::default();

        users_table(&gateway, &path).await;

        let id = gateway
            .write(&path, "users", &user("John Doe2", "joh42n@example.com"))
            .await
            .unwrap();
        assert_eq!(id, 1);

        let err = gateway
            .write(&path, "users", &user("John Doe2", "joh42n@example.com"))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());

        let updated = gateway
            .update(
                &path,
                "users",
                &user("Jane Doe1", "jane@example.com"),
                &Predicate::new().with("idx", 1),
            )
            .await
            .unwrap();
        assert_eq!(updated, 1);

        let deleted = gateway
            .delete(&path, "users", &DeleteFilter::Matching(Predicate::new().with("idx", 1)))
            .await
            .unwrap();
        assert_eq!(deleted, 1);

        let rows = gateway.read(&path, "SELECT * FROM users").await.unwrap();
        assert!(rows.is_empty());
    }
}
