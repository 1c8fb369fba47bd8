//! Page fetching against the media-search API.
//!
//! # Architecture
//!
//! - `messages`: request/response types with epoch tags and trace context
//! - `envelope`: decoding of the JSON result envelope into a [`Page`](crate::domain::Page)
//! - `client`: the [`ResultFetcher`] trait and the `reqwest`-backed [`GiphyFetcher`]

pub mod client;
pub mod envelope;
pub mod messages;

pub use client::{GiphyFetcher, ResultFetcher};
pub use envelope::decode_page;
pub use messages::{FailureKind, FetchFailure, FetchOutcome, FetchRequest, FetchResponse, TraceContext};
