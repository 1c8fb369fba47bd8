//! Domain layer for gifscout.
//!
//! Core types shared by the state machine, the fetcher and the layout engine,
//! independent of the HTTP transport and the async runtime.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`media`]: Media item and page models
//!
//! # Examples
//!
//! ```
//! use gifscout::domain::{MediaItem, Page};
//!
//! let page = Page {
//!     items: vec![MediaItem {
//!         id: "xT9IgG50Fb7Mi0prBC".to_string(),
//!         preview_width: 200,
//!         preview_height: 113,
//!         preview_url: "https://media.giphy.com/preview.gif".to_string(),
//!         full_url: "https://media.giphy.com/original.gif".to_string(),
//!         title: "cat typing".to_string(),
//!     }],
//!     offset: 0,
//!     total_available: 1,
//!     reported_count: 1,
//! };
//! assert_eq!(page.len(), 1);
//! ```

pub mod error;
pub mod media;

pub use error::{FetchError, GifscoutError, Result};
pub use media::{MediaItem, Page};
