//! Responsive masonry tuning.
//!
//! The grid is configured with an ordered list of breakpoints, each carrying
//! the column count, image width and gutter to use from a minimum viewport
//! width upwards. One entry without a minimum acts as the base.

use serde::{Deserialize, Serialize};

/// Masonry tuning for one viewport range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    /// Minimum viewport width (px) at which this entry applies. `None` for
    /// the base entry.
    #[serde(default)]
    pub min_width: Option<u32>,
    /// Number of columns.
    pub columns: usize,
    /// Rendered width of every image (px).
    pub image_width: f64,
    /// Vertical space added below every image (px).
    pub gutter: f64,
}

impl Default for Breakpoint {
    fn default() -> Self {
        Self {
            min_width: None,
            columns: 2,
            image_width: 120.0,
            gutter: 5.0,
        }
    }
}

/// Ordered set of breakpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MasonryConfig {
    breakpoints: Vec<Breakpoint>,
}

impl Default for MasonryConfig {
    fn default() -> Self {
        Self {
            breakpoints: vec![Breakpoint::default()],
        }
    }
}

impl MasonryConfig {
    /// Builds a config from breakpoints in any order.
    #[must_use]
    pub fn new(breakpoints: Vec<Breakpoint>) -> Self {
        Self { breakpoints }
    }

    /// Selects the tuning for a viewport of `viewport_width` pixels.
    ///
    /// Picks the entry with the largest `min_width` not exceeding the
    /// viewport; the base entry counts as `min_width = 0`. When no entry
    /// applies (every entry has a minimum above the viewport) the narrowest
    /// entry is used, and an empty config falls back to the default.
    #[must_use]
    pub fn for_viewport(&self, viewport_width: u32) -> Breakpoint {
        let applicable = self
            .breakpoints
            .iter()
            .filter(|bp| bp.min_width.unwrap_or(0) <= viewport_width)
            .max_by_key(|bp| bp.min_width.unwrap_or(0));

        applicable
            .or_else(|| self.breakpoints.iter().min_by_key(|bp| bp.min_width.unwrap_or(0)))
            .copied()
            .unwrap_or_default()
    }

    /// Checks every breakpoint for a usable geometry.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid entry.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.breakpoints.is_empty() {
            return Err("masonry config needs at least one breakpoint".to_string());
        }
        for bp in &self.breakpoints {
            if bp.columns == 0 {
                return Err(format!("breakpoint {:?} has zero columns", bp.min_width));
            }
            if !(bp.image_width.is_finite() && bp.image_width > 0.0) {
                return Err(format!("breakpoint {:?} has invalid image width", bp.min_width));
            }
            if !(bp.gutter.is_finite() && bp.gutter >= 0.0) {
                return Err(format!("breakpoint {:?} has invalid gutter", bp.min_width));
            }
        }
        Ok(())
    }
}
