//! Mode and status enums for the search session state machine.
//!
//! [`SearchMode`] decides which endpoint a page request targets.
//! [`SearchStatus`] is the observable lifecycle state rendered by the host:
//!
//! ```text
//! Idle ──Mount──▶ Loading ──▶ Ready ◀──▶ LoadingMore
//!                    │  └───▶ Empty
//!                    └──────▶ Error
//! (any) ──settled query change──▶ Loading
//! ```

use serde::{Deserialize, Serialize};

/// Which result set the session is browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Trending results, shown when the query is empty.
    #[default]
    Trending,

    /// Results for a non-empty search term.
    Searching,
}

impl SearchMode {
    /// Mode implied by a settled query text.
    #[must_use]
    pub fn for_query(text: &str) -> Self {
        if text.is_empty() {
            Self::Trending
        } else {
            Self::Searching
        }
    }

    /// Endpoint path segment for this mode.
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Trending => "trending",
            Self::Searching => "search",
        }
    }
}

/// Observable lifecycle state of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// Created but not yet mounted.
    #[default]
    Idle,

    /// First page of the current epoch is in flight.
    Loading,

    /// A continuation page is in flight; existing items stay visible.
    LoadingMore,

    /// The first page of the current epoch failed.
    Error,

    /// The first page arrived and held no results.
    Empty,

    /// Results are visible.
    Ready,
}
