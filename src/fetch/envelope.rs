//! Decoding of the Giphy result envelope.
//!
//! Trending and search endpoints share one envelope shape:
//!
//! ```json
//! {
//!   "data": [
//!     {
//!       "id": "xT9IgG50Fb7Mi0prBC",
//!       "title": "cat typing GIF",
//!       "images": {
//!         "fixed_width_downsampled": { "url": "...", "width": "200", "height": "113" },
//!         "fixed_width": { "url": "...", "width": "200", "height": "113" },
//!         "original": { "url": "...", "width": "480", "height": "270" }
//!       }
//!     }
//!   ],
//!   "pagination": { "total_count": 1843, "count": 25, "offset": 0 },
//!   "meta": { "status": 200, "msg": "OK" }
//! }
//! ```
//!
//! Dimensions arrive as decimal strings. A missing or non-array `data` field
//! is a decode failure; individual records without an `id` are skipped.

use crate::domain::{FetchError, MediaItem, Page};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Option<serde_json::Value>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Debug, Default, Deserialize)]
struct Pagination {
    #[serde(default)]
    total_count: Option<u64>,
    #[serde(default)]
    count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Record {
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    images: Images,
}

#[derive(Debug, Default, Deserialize)]
struct Images {
    fixed_width_downsampled: Option<Rendition>,
    fixed_width: Option<Rendition>,
    original: Option<Rendition>,
}

#[derive(Debug, Default, Deserialize)]
struct Rendition {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    width: Option<Dimension>,
    #[serde(default)]
    height: Option<Dimension>,
}

/// A pixel dimension, sent either as a number or as a decimal string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Dimension {
    Number(u64),
    Text(String),
}

impl Dimension {
    fn pixels(&self) -> u32 {
        let raw = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<u64>().unwrap_or(0),
        };
        u32::try_from(raw).unwrap_or(0)
    }
}

impl Rendition {
    fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }

    fn size(&self) -> (u32, u32) {
        let width = self.width.as_ref().map_or(0, Dimension::pixels);
        let height = self.height.as_ref().map_or(0, Dimension::pixels);
        (width, height)
    }
}

impl Record {
    fn into_media_item(self) -> Option<MediaItem> {
        let id = self.id.filter(|id| !id.is_empty())?;

        let preview = self
            .images
            .fixed_width_downsampled
            .as_ref()
            .filter(|r| r.url().is_some())
            .or(self.images.fixed_width.as_ref());

        let (preview_width, preview_height) = preview.map_or((0, 0), Rendition::size);
        let preview_url = preview.and_then(Rendition::url).unwrap_or_default().to_string();
        let full_url = self
            .images
            .original
            .as_ref()
            .and_then(Rendition::url)
            .map_or_else(|| preview_url.clone(), ToString::to_string);

        Some(MediaItem {
            id,
            preview_width,
            preview_height,
            preview_url,
            full_url,
            title: self.title.unwrap_or_default(),
        })
    }
}

/// Decodes a response body into a [`Page`].
///
/// `offset` is the cursor the request was made with and becomes the page's
/// offset. At most `limit` items are kept, and the reported record count is
/// capped at `limit` too.
///
/// # Errors
///
/// Returns [`FetchError::Decode`] if the body is not JSON or `data` is missing
/// or not an array.
pub fn decode_page(body: &[u8], offset: u32, limit: u32) -> Result<Page, FetchError> {
    let envelope: Envelope =
        serde_json::from_slice(body).map_err(|e| FetchError::Decode(format!("invalid JSON: {e}")))?;

    let records = match envelope.data {
        Some(serde_json::Value::Array(records)) => records,
        Some(_) => return Err(FetchError::Decode("`data` is not an array".to_string())),
        None => return Err(FetchError::Decode("missing `data` array".to_string())),
    };

    let record_count = records.len();
    let mut items: Vec<MediaItem> = records
        .into_iter()
        .filter_map(|value| serde_json::from_value::<Record>(value).ok())
        .filter_map(Record::into_media_item)
        .collect();

    if items.len() < record_count {
        tracing::debug!(
            skipped = record_count - items.len(),
            "skipped records without an id"
        );
    }

    items.truncate(usize::try_from(limit).unwrap_or(usize::MAX));

    let pagination = envelope.pagination.unwrap_or_default();
    let total_available = pagination
        .total_count
        .map_or(0, |t| u32::try_from(t).unwrap_or(u32::MAX));
    let reported_count = pagination
        .count
        .unwrap_or_else(|| u64::try_from(record_count).unwrap_or(u64::MAX))
        .min(u64::from(limit));

    Ok(Page {
        items,
        offset,
        total_available,
        reported_count: u32::try_from(reported_count).unwrap_or(limit),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRENDING: &str = r#"{
        "data": [
            {
                "id": "a1",
                "title": "dancing cat",
                "images": {
                    "fixed_width_downsampled": { "url": "https://media.giphy.com/a1/200w_d.gif", "width": "200", "height": "150" },
                    "original": { "url": "https://media.giphy.com/a1/giphy.gif", "width": "480", "height": "360" }
                }
            },
            {
                "id": "b2",
                "images": {
                    "fixed_width": { "url": "https://media.giphy.com/b2/200w.gif", "width": 200, "height": 300 }
                }
            },
            { "title": "no id here" }
        ],
        "pagination": { "total_count": 120, "count": 3, "offset": 50 },
        "meta": { "status": 200, "msg": "OK" }
    }"#;

    #[test]
    fn decodes_records_and_pagination() {
        let page = decode_page(TRENDING.as_bytes(), 50, 25).expect("valid envelope");
        assert_eq!(page.offset, 50);
        assert_eq!(page.total_available, 120);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.reported_count, 3);

        let first = &page.items[0];
        assert_eq!(first.id, "a1");
        assert_eq!((first.preview_width, first.preview_height), (200, 150));
        assert_eq!(first.full_url, "https://media.giphy.com/a1/giphy.gif");
        assert_eq!(first.title, "dancing cat");
    }

    #[test]
    fn falls_back_to_fixed_width_and_preview_url() {
        let page = decode_page(TRENDING.as_bytes(), 0, 25).expect("valid envelope");
        let second = &page.items[1];
        assert_eq!(second.preview_url, "https://media.giphy.com/b2/200w.gif");
        assert_eq!(second.full_url, second.preview_url);
        assert_eq!((second.preview_width, second.preview_height), (200, 300));
        assert!(second.title.is_empty());
    }

    #[test]
    fn truncates_to_limit() {
        let page = decode_page(TRENDING.as_bytes(), 0, 1).expect("valid envelope");
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.reported_count, 1);
    }

    #[test]
    fn request_offset_wins_over_envelope_offset() {
        let page = decode_page(TRENDING.as_bytes(), 4, 25).expect("valid envelope");
        assert_eq!(page.offset, 4);
    }

    #[test]
    fn full_page_with_skipped_record_advances_by_reported_count() {
        let page = decode_page(TRENDING.as_bytes(), 0, 3).expect("valid envelope");
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.reported_count, 3);
        assert_eq!(page.cursor_advance(), 3);
    }

    #[test]
    fn missing_count_falls_back_to_record_count() {
        let body = br#"{"data": [{"id": "x"}, {"title": "no id"}], "pagination": {"total_count": 9}}"#;
        let page = decode_page(body, 0, 25).expect("valid envelope");
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.reported_count, 2);
    }

    #[test]
    fn missing_data_is_a_decode_error() {
        let err = decode_page(br#"{"meta": {"status": 404}}"#, 0, 25).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        let err = decode_page(br#"{"data": {"id": "x"}}"#, 0, 25).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        let err = decode_page(b"<html>", 0, 25).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn unparseable_dimensions_decode_as_zero() {
        let body = br#"{"data": [{"id": "z", "images": {"fixed_width": {"url": "u", "width": "wide", "height": "10"}}}]}"#;
        let page = decode_page(body, 0, 25).expect("valid envelope");
        assert_eq!(page.items[0].preview_width, 0);
        assert!(!page.items[0].has_valid_dimensions());
        assert_eq!(page.total_available, 0);
        assert_eq!(page.reported_count, 1);
    }
}
