//! Infrastructure layer for the record store.
//!
//! Contains the implementation of the `RecordGateway` trait defined in
//! `recordstore-core` (SQLite via sqlx, one connection per call) and the
//! loader for the optional `config.toml`.

pub mod config;
pub mod sqlite;
