//! Record store gateway trait.
//!
//! Defines the five operations of the gateway. Every call is independent:
//! it opens its own connection to the database file at `path`, runs a single
//! statement, and closes the connection before resolving.
//! Implementations live in recordstore-infra.

use std::path::Path;

use recordstore_types::error::GatewayError;
use recordstore_types::record::{Predicate, Record, Row};
use recordstore_types::schema::{DeleteFilter, TableSchema};

/// Trait for single-statement CRUD access to an embedded database file.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait RecordGateway: Send + Sync {
    /// Create `table` with the identity column plus the schema's columns.
    /// Succeeds without change when the table already exists.
    fn define_table(
        &self,
        path: &Path,
        table: &str,
        schema: &TableSchema,
    ) -> impl std::future::Future<Output = Result<(), GatewayError>> + Send;

    /// Insert a record. Returns the identity assigned by the engine.
    fn write(
        &self,
        path: &Path,
        table: &str,
        record: &Record,
    ) -> impl std::future::Future<Output = Result<i64, GatewayError>> + Send;

    /// Run a caller-supplied SELECT as-is and collect every row in engine order.
    ///
    /// The query text is neither parameterized nor validated.
    fn read(
        &self,
        path: &Path,
        query: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Row>, GatewayError>> + Send;

    /// Set columns on every row matching the predicate. Returns the affected count.
    fn update(
        &self,
        path: &Path,
        table: &str,
        set: &Record,
        predicate: &Predicate,
    ) -> impl std::future::Future<Output = Result<u64, GatewayError>> + Send;

    /// Delete rows selected by the filter. Returns the deleted count.
    fn delete(
        &self,
        path: &Path,
        table: &str,
        filter: &DeleteFilter,
    ) -> impl std::future::Future<Output = Result<u64, GatewayError>> + Send;
}
