//! SQLite storage layer.
//!
//! Gateway implementation backed by SQLite. Connections are opened per
//! operation and closed before the operation resolves; nothing is pooled.

pub mod connection;
pub mod gateway;
