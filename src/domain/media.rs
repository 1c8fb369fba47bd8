//! Media item and page domain models.
//!
//! A [`MediaItem`] is one decoded search result; a [`Page`] is the bounded
//! slice of results returned by a single request. Both are immutable once
//! decoded from the API envelope.

use serde::{Deserialize, Serialize};

/// One animated image returned by the media-search API.
///
/// The preview dimensions are the intrinsic aspect ratio source for the
/// masonry layout. The API occasionally omits them; such items decode with a
/// zero dimension and are skipped by the packer rather than rejected here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaItem {
    /// Opaque identifier, unique within a session.
    pub id: String,
    /// Intrinsic width of the preview rendition in pixels.
    pub preview_width: u32,
    /// Intrinsic height of the preview rendition in pixels.
    pub preview_height: u32,
    /// URL of the downsampled preview rendition shown in the grid.
    pub preview_url: String,
    /// URL of the full-size rendition handed to the host on selection.
    pub full_url: String,
    /// Human title, may be empty.
    pub title: String,
}

impl MediaItem {
    /// Returns `true` when both preview dimensions are positive.
    ///
    /// Items failing this check cannot be given an aspect ratio and are
    /// excluded from layout and from the displayed count.
    #[must_use]
    pub const fn has_valid_dimensions(&self) -> bool {
        self.preview_width > 0 && self.preview_height > 0
    }

    /// Height of this item when rendered at `display_width`, preserving its
    /// aspect ratio. Returns `None` for items without valid dimensions.
    #[must_use]
    pub fn scaled_height(&self, display_width: f64) -> Option<f64> {
        if !self.has_valid_dimensions() {
            return None;
        }
        Some(display_width * (f64::from(self.preview_height) / f64::from(self.preview_width)))
    }
}

/// One fetch's worth of results.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Page {
    /// Results in API order. Never longer than the requested limit.
    pub items: Vec<MediaItem>,
    /// Pagination cursor that was used to request this page.
    pub offset: u32,
    /// Total result count reported by the API; `0` when unknown.
    pub total_available: u32,
    /// Number of records the API says it returned, including any dropped
    /// while decoding; `0` when unknown.
    #[serde(default)]
    pub reported_count: u32,
}

impl Page {
    /// Number of decoded items in the page.
    #[must_use]
    pub fn len(&self) -> u32 {
        u32::try_from(self.items.len()).unwrap_or(u32::MAX)
    }

    /// How far this page moves the pagination cursor.
    ///
    /// Records the decoder skipped still occupy positions in the API's
    /// result set, so the reported count wins over the decoded length.
    #[must_use]
    pub fn cursor_advance(&self) -> u32 {
        self.reported_count.max(self.len())
    }

    /// Returns `true` if the page carries no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(width: u32, height: u32) -> MediaItem {
        MediaItem {
            id: "abc".to_string(),
            preview_width: width,
            preview_height: height,
            preview_url: String::new(),
            full_url: String::new(),
            title: String::new(),
        }
    }

    #[test]
    fn scaled_height_preserves_aspect_ratio() {
        assert_eq!(item(200, 100).scaled_height(120.0), Some(60.0));
        assert_eq!(item(100, 150).scaled_height(120.0), Some(180.0));
    }

    #[test]
    fn cursor_advance_counts_skipped_records() {
        let page = Page {
            items: vec![item(1, 1), item(1, 1)],
            offset: 0,
            total_available: 0,
            reported_count: 3,
        };
        assert_eq!(page.len(), 2);
        assert_eq!(page.cursor_advance(), 3);

        let unknown = Page {
            reported_count: 0,
            ..page
        };
        assert_eq!(unknown.cursor_advance(), 2);
    }

    #[test]
    fn zero_dimensions_have_no_height() {
        assert_eq!(item(0, 100).scaled_height(120.0), None);
        assert_eq!(item(100, 0).scaled_height(120.0), None);
        assert!(!item(0, 0).has_valid_dimensions());
    }
}
