//! Observability for Solace.
//!
//! Tracing subscriber setup (structured logs, optional OpenTelemetry
//! export) and the GenAI semantic convention attribute names used to
//! instrument model calls.

pub mod genai_attrs;
pub mod tracing_setup;
