//! Masonry layout engine.
//!
//! - [`masonry`]: the stateless greedy shortest-column packer
//! - [`breakpoints`]: selection of column count, image width and gutter for a
//!   viewport width

pub mod breakpoints;
pub mod masonry;

pub use breakpoints::{Breakpoint, MasonryConfig};
pub use masonry::{layout, Column, MasonryLayout, PlacedItem};
