//! Page request and response messages.
//!
//! A [`FetchRequest`] is produced by the state machine, executed by the
//! runtime on a spawned task, and answered with a [`FetchResponse`] fed back
//! into the state machine as an event. Both carry the epoch that was current
//! when the request was issued, which is how stale responses are recognised.
//!
//! Requests also capture the active tracing context so the span of the
//! spawned fetch task links back to the span of the event that issued it.

use crate::app::modes::SearchMode;
use crate::domain::{FetchError, Page};
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-task span propagation.
///
/// Captures the OpenTelemetry trace and span ids of the current span so a
/// fetch running on another task can be recorded as its child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across tasks.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Creates a trace context from the current tracing span.
    ///
    /// Returns `None` when no OpenTelemetry layer is installed or the current
    /// span context is invalid.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }

    /// Rebuilds a remote OpenTelemetry context from the captured ids.
    ///
    /// Returns `None` if either id is not valid hex.
    #[must_use]
    pub fn to_otel_context(&self) -> Option<opentelemetry::Context> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_id = TraceId::from_hex(&self.trace_id).ok()?;
        let span_id = SpanId::from_hex(&self.parent_span_id).ok()?;

        let span_context = SpanContext::new(trace_id, span_id, TraceFlags::SAMPLED, true, TraceState::default());

        Some(opentelemetry::Context::new().with_remote_span_context(span_context))
    }
}

/// One page request issued by the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Session epoch at issue time.
    pub epoch: u64,

    /// Endpoint selector.
    pub mode: SearchMode,

    /// Search term; empty for trending.
    pub query: String,

    /// Pagination cursor.
    pub offset: u32,

    /// Page size.
    pub limit: u32,

    /// Trace context for linking spans across tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_context: Option<TraceContext>,
}

impl FetchRequest {
    /// Creates a request tagged with `epoch` and the current trace context.
    #[must_use]
    pub fn new(epoch: u64, mode: SearchMode, query: impl Into<String>, offset: u32, limit: u32) -> Self {
        Self {
            epoch,
            mode,
            query: query.into(),
            offset,
            limit,
            trace_context: TraceContext::from_current(),
        }
    }

    /// Wraps an outcome into the matching response.
    #[must_use]
    pub fn respond(&self, outcome: FetchOutcome) -> FetchResponse {
        FetchResponse {
            epoch: self.epoch,
            offset: self.offset,
            limit: self.limit,
            outcome,
        }
    }
}

/// Coarse classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Transport rejected, non-2xx status or timeout.
    Network,
    /// Envelope missing or malformed.
    Decode,
}

/// A failed request, reduced to plain data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchFailure {
    /// Failure class.
    pub kind: FailureKind,
    /// Human-readable reason, for logs.
    pub reason: String,
}

impl From<&FetchError> for FetchFailure {
    fn from(error: &FetchError) -> Self {
        let kind = if error.is_network() {
            FailureKind::Network
        } else {
            FailureKind::Decode
        };
        Self {
            kind,
            reason: error.to_string(),
        }
    }
}

impl From<FetchError> for FetchFailure {
    fn from(error: FetchError) -> Self {
        Self::from(&error)
    }
}

/// Result of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchOutcome {
    /// Decoded page; items may be empty.
    Success(Page),
    /// Request failed; see [`FetchFailure`].
    Failure(FetchFailure),
}

impl From<std::result::Result<Page, FetchError>> for FetchOutcome {
    fn from(result: std::result::Result<Page, FetchError>) -> Self {
        match result {
            Ok(page) => Self::Success(page),
            Err(e) => Self::Failure(FetchFailure::from(e)),
        }
    }
}

/// Response to a [`FetchRequest`], echoing its epoch and offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResponse {
    /// Epoch the request was tagged with.
    pub epoch: u64,
    /// Offset the request was made at.
    pub offset: u32,
    /// Page size the request asked for.
    pub limit: u32,
    /// What happened.
    pub outcome: FetchOutcome,
}

impl FetchResponse {
    /// Returns `true` if this answers a request for a page after the first.
    #[must_use]
    pub const fn is_continuation(&self) -> bool {
        self.offset > 0
    }
}
