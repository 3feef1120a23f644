//! Observability setup for the record store: structured logging with an
//! optional OpenTelemetry bridge.

pub mod tracing_setup;
