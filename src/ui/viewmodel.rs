//! View model types representing renderable grid state.
//!
//! View models are computed on demand via
//! [`SearchState::compute_viewmodel`](crate::app::SearchState::compute_viewmodel)
//! and hold display-ready data only: laid-out columns with pixel sizes, the
//! status message to show, and the flags a shell needs to draw spinners and
//! the attribution badge.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use gifscout::{Config, SearchState};
//!
//! let state = SearchState::new(Arc::new(Config::default()));
//! let vm = state.compute_viewmodel(480);
//! assert_eq!(vm.displayed_count, 0);
//! assert_eq!(vm.columns.len(), 2);
//! ```

use serde::Serialize;

use crate::app::modes::SearchStatus;

/// Complete grid view model for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridViewModel {
    /// Session status the view reflects.
    pub status: SearchStatus,

    /// Status text to show instead of (or above) the grid, if any.
    pub message: Option<String>,

    /// Laid-out columns, left to right.
    pub columns: Vec<ColumnView>,

    /// Number of tiles across all columns.
    pub displayed_count: usize,

    /// Whether scrolling to the bottom may load more.
    pub has_more: bool,

    /// Whether a continuation page is in flight.
    pub is_loading_more: bool,

    /// Current settled query.
    pub query: String,

    /// Placeholder text for the search field.
    pub placeholder: String,

    /// Whether to show the "Powered by GIPHY" attribution.
    pub powered_by: bool,
}

/// One rendered column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnView {
    /// Tiles top to bottom.
    pub tiles: Vec<Tile>,
    /// Accumulated column height in pixels, gutters included.
    pub height: f64,
}

/// One rendered image tile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    /// Item id, passed back on selection.
    pub id: String,
    /// Preview image URL.
    pub preview_url: String,
    /// Title, used as alt text.
    pub title: String,
    /// Rendered width in pixels.
    pub width: f64,
    /// Rendered height in pixels.
    pub height: f64,
}
