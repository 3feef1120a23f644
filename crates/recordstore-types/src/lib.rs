//! Shared domain types for the record store gateway.
//!
//! This crate contains the data contract used across the workspace:
//! scalar values, ordered column/value mappings (records, predicates, rows),
//! table schema descriptors, gateway errors, and configuration.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod error;
pub mod record;
pub mod schema;
pub mod value;

/// Name of the reserved auto-increment primary key present in every gateway table.
pub const IDENTITY_COLUMN: &str = "idx";
