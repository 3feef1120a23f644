//! Gateway trait and statement construction for the record store.
//!
//! This crate defines the "port" (`RecordGateway`) that the infrastructure
//! layer implements, plus the pure SQL builders every implementation shares.
//! It depends only on `recordstore-types` -- never on `recordstore-infra` or
//! any database/IO crate.

pub mod gateway;
pub mod ident;
pub mod scan;
pub mod statement;
