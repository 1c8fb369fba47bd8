//! Error types for gifscout.
//!
//! Two layers of errors live here. [`FetchError`] classifies a single failed
//! page request and is carried back into the session state machine as data.
//! [`GifscoutError`] is the crate-level error for configuration loading and
//! setup, with a [`Result`] alias used throughout.

use thiserror::Error;

/// Failure of a single page request.
///
/// The session never retries: a failure on the first page of a query epoch
/// surfaces as the `Error` status, a failure on a continuation page ends
/// pagination. Which variant occurred only matters for logging.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The transport rejected the request (DNS, connect, TLS, body read).
    #[error("network failure: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("unexpected status {status}: {body}")]
    Status {
        /// HTTP status code received.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// The body was not a well-formed result envelope.
    ///
    /// Raised when the JSON does not parse or the `data` array is missing or
    /// not an array.
    #[error("malformed envelope: {0}")]
    Decode(String),

    /// No response arrived within the configured request timeout.
    #[error("request timed out after {0} ms")]
    Timeout(u64),
}

impl FetchError {
    /// Returns `true` for transport-level failures, including synthesized
    /// timeouts and non-2xx statuses.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Status { .. } | Self::Timeout(_))
    }

    /// Short label used as a structured tracing field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Status { .. } => "status",
            Self::Decode(_) => "decode",
            Self::Timeout(_) => "timeout",
        }
    }
}

/// The main error type for gifscout setup and configuration.
#[derive(Debug, Error)]
pub enum GifscoutError {
    /// Configuration is invalid or missing a required value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML for [`crate::Config`].
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A page request failed outside the session (e.g. a one-shot fetch).
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// The session runtime has shut down and can no longer accept events.
    #[error("Session closed")]
    SessionClosed,
}

/// A specialized `Result` type for gifscout operations.
pub type Result<T> = std::result::Result<T, GifscoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_and_status_count_as_network_failures() {
        assert!(FetchError::Timeout(10_000).is_network());
        assert!(FetchError::Status { status: 404, body: String::new() }.is_network());
        assert!(!FetchError::Decode("missing data".to_string()).is_network());
    }

    #[test]
    fn display_includes_status_code() {
        let err = FetchError::Status { status: 429, body: "slow down".to_string() };
        assert_eq!(err.to_string(), "unexpected status 429: slow down");
        assert_eq!(err.kind(), "status");
    }
}
