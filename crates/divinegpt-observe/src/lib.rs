//! Observability setup for DivineGPT: structured logging with optional
//! OpenTelemetry span export.

pub mod tracing_setup;
