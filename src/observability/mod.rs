//! Structured logging and OpenTelemetry span export.
//!
//! ```text
//! tracing macros ─┬─ fmt layer ─────────────────────────▶ stderr
//!                 └─ tracing-opentelemetry ─▶ SDK ─▶ JsonLinesExporter ─▶ trace_file
//! ```
//!
//! Fetch tasks run on other tokio tasks than the session loop. Each
//! [`FetchRequest`](crate::fetch::FetchRequest) carries a
//! [`TraceContext`](crate::fetch::TraceContext) captured where it was issued,
//! and the fetch span is parented to it, so one query's spans share a trace id.
//!
//! # Configuration
//!
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` in [`Config`](crate::Config)
//! 3. Default: `"info"`
//!
//! Span export is enabled only when `trace_file` is set.

mod exporter;
mod init;

pub use init::init_tracing;
