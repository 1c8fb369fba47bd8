//! Greedy shortest-column masonry packing.
//!
//! Items of variable aspect ratio are distributed across a fixed number of
//! equal-width columns. Each item, in input order, goes to the column whose
//! accumulated height is currently smallest (ties go to the lowest column
//! index), and that column grows by the item's display height plus the
//! gutter.
//!
//! The packer keeps no state between calls. The session re-runs it over the
//! full accumulated item list every time a page arrives, which is only
//! correct because placement of item `k` depends solely on items `0..k`:
//! laying out a prefix and laying out the extended list assign identical
//! columns to the prefix.
//!
//! # Example
//!
//! ```
//! use gifscout::domain::MediaItem;
//! use gifscout::layout::layout;
//!
//! let items: Vec<MediaItem> = (0..3)
//!     .map(|i| MediaItem {
//!         id: i.to_string(),
//!         preview_width: 100,
//!         preview_height: 100,
//!         preview_url: String::new(),
//!         full_url: String::new(),
//!         title: String::new(),
//!     })
//!     .collect();
//!
//! let grid = layout(&items, 2, 120.0, 5.0);
//! assert_eq!(grid.columns[0].len(), 2);
//! assert_eq!(grid.columns[1].len(), 1);
//! ```

use crate::domain::MediaItem;

/// One item placed in a column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedItem<'a> {
    /// The placed item.
    pub item: &'a MediaItem,
    /// Position of the item in the input sequence.
    pub index: usize,
    /// Rendered width, always the configured image width.
    pub display_width: f64,
    /// Rendered height, preserving the preview aspect ratio.
    pub display_height: f64,
}

/// A single column of the grid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Column<'a> {
    /// Items in top-to-bottom order.
    pub items: Vec<PlacedItem<'a>>,
    /// Sum of `display_height + gutter` over the column's items.
    pub height: f64,
}

impl Column<'_> {
    /// Number of items in the column.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no item was placed in the column.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Result of a layout pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MasonryLayout<'a> {
    /// Columns left to right. Always `max(columns, 1)` entries.
    pub columns: Vec<Column<'a>>,
}

impl<'a> MasonryLayout<'a> {
    /// Number of items actually placed (malformed items are not counted).
    #[must_use]
    pub fn placed_count(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }

    /// Height of the tallest column, i.e. the height of the whole grid.
    #[must_use]
    pub fn total_height(&self) -> f64 {
        self.columns.iter().map(|c| c.height).fold(0.0, f64::max)
    }

    /// Column index each placed item landed in, keyed by input position.
    ///
    /// Returned in input order; malformed items are absent.
    #[must_use]
    pub fn assignments(&self) -> Vec<(usize, usize)> {
        let mut out: Vec<(usize, usize)> = self
            .columns
            .iter()
            .enumerate()
            .flat_map(|(col, column)| column.items.iter().map(move |p| (p.index, col)))
            .collect();
        out.sort_unstable_by_key(|&(index, _)| index);
        out
    }

    /// Looks up the placement of the item with the given id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<(usize, &PlacedItem<'a>)> {
        self.columns.iter().enumerate().find_map(|(col, column)| {
            column.items.iter().find(|p| p.item.id == id).map(|p| (col, p))
        })
    }
}

/// Lays `items` out into `columns` columns of width `image_width`.
///
/// `columns == 0` is treated as a single column. Items without valid preview
/// dimensions are skipped.
#[must_use]
pub fn layout(items: &[MediaItem], columns: usize, image_width: f64, gutter: f64) -> MasonryLayout<'_> {
    let column_count = columns.max(1);
    let mut grid = MasonryLayout {
        columns: vec![Column::default(); column_count],
    };

    let mut skipped = 0usize;
    for (index, item) in items.iter().enumerate() {
        let Some(display_height) = item.scaled_height(image_width) else {
            skipped += 1;
            continue;
        };

        let target = shortest_column(&grid.columns);
        let column = &mut grid.columns[target];
        column.items.push(PlacedItem {
            item,
            index,
            display_width: image_width,
            display_height,
        });
        column.height += display_height + gutter;
    }

    if skipped > 0 {
        tracing::trace!(skipped, total = items.len(), "skipped items without dimensions");
    }

    grid
}

/// Index of the column with the smallest accumulated height, lowest index
/// first on ties.
fn shortest_column(columns: &[Column<'_>]) -> usize {
    let mut best = 0;
    for (i, column) in columns.iter().enumerate().skip(1) {
        if column.height < columns[best].height {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, width: u32, height: u32) -> MediaItem {
        MediaItem {
            id: id.to_string(),
            preview_width: width,
            preview_height: height,
            preview_url: format!("https://media.example/{id}.gif"),
            full_url: String::new(),
            title: String::new(),
        }
    }

    fn ids<'a>(column: &'a Column<'a>) -> Vec<&'a str> {
        column.items.iter().map(|p| p.item.id.as_str()).collect()
    }

    #[test]
    fn equal_items_alternate_columns() {
        let items: Vec<_> = (0..4).map(|i| item(&i.to_string(), 100, 100)).collect();
        let grid = layout(&items, 2, 100.0, 0.0);
        assert_eq!(ids(&grid.columns[0]), vec!["0", "2"]);
        assert_eq!(ids(&grid.columns[1]), vec!["1", "3"]);
    }

    #[test]
    fn tall_item_pushes_followers_to_other_column() {
        let items = vec![
            item("tall", 100, 300),
            item("a", 100, 100),
            item("b", 100, 100),
            item("c", 100, 100),
        ];
        let grid = layout(&items, 2, 100.0, 5.0);
        assert_eq!(ids(&grid.columns[0]), vec!["tall"]);
        assert_eq!(ids(&grid.columns[1]), vec!["a", "b", "c"]);
        assert!((grid.columns[0].height - 305.0).abs() < f64::EPSILON);
        assert!((grid.columns[1].height - 315.0).abs() < f64::EPSILON);
    }

    #[test]
    fn display_height_scales_with_image_width() {
        let items = vec![item("wide", 400, 200)];
        let grid = layout(&items, 3, 120.0, 5.0);
        let placed = &grid.columns[0].items[0];
        assert!((placed.display_height - 60.0).abs() < f64::EPSILON);
        assert!((placed.display_width - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn malformed_items_are_excluded() {
        let items = vec![item("a", 100, 100), item("broken", 0, 100), item("b", 100, 100)];
        let grid = layout(&items, 2, 100.0, 0.0);
        assert_eq!(grid.placed_count(), 2);
        assert!(grid.find("broken").is_none());
        assert_eq!(grid.assignments(), vec![(0, 0), (2, 1)]);
    }

    #[test]
    fn zero_columns_is_one_column() {
        let items = vec![item("a", 100, 100), item("b", 100, 100)];
        let grid = layout(&items, 0, 100.0, 0.0);
        assert_eq!(grid.columns.len(), 1);
        assert_eq!(grid.columns[0].len(), 2);
    }

    #[test]
    fn empty_input_yields_empty_columns() {
        let grid = layout(&[], 3, 100.0, 5.0);
        assert_eq!(grid.columns.len(), 3);
        assert_eq!(grid.placed_count(), 0);
        assert!(grid.total_height().abs() < f64::EPSILON);
    }

    #[test]
    fn prefix_placement_is_stable() {
        let dims = [(100, 80), (100, 240), (120, 90), (90, 200), (200, 100), (100, 100), (80, 160)];
        let items: Vec<_> = dims
            .iter()
            .enumerate()
            .map(|(i, &(w, h))| item(&i.to_string(), w, h))
            .collect();

        let full = layout(&items, 3, 120.0, 5.0).assignments();
        for k in 0..=items.len() {
            let prefix = layout(&items[..k], 3, 120.0, 5.0).assignments();
            assert_eq!(prefix, full[..k].to_vec(), "prefix of length {k} diverged");
        }
    }
}
