//! Renderable projections of the session state.
//!
//! The crate does not draw anything itself; a host shell turns these view
//! models into markup, pixels or terminal output.
//!
//! ```text
//! SearchState → compute_viewmodel(viewport) → GridViewModel → host shell
//! ```

pub mod viewmodel;

pub use viewmodel::{ColumnView, GridViewModel, Tile};
