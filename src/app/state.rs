//! Search session state and view model computation.
//!
//! [`SearchState`] is the single source of truth for one mounted search box:
//! the current mode and query, the accumulated result list of the current
//! epoch, the pagination cursor and the observable status. It is mutated
//! only by [`handle_event`](crate::app::handle_event) and cloned as the
//! snapshot published to the host.

use std::collections::HashSet;
use std::sync::Arc;

use super::modes::{SearchMode, SearchStatus};
use crate::domain::{MediaItem, Page};
use crate::fetch::FetchFailure;
use crate::layout::{layout, MasonryLayout};
use crate::ui::viewmodel::{ColumnView, GridViewModel, Tile};
use crate::Config;

/// State of one search session.
#[derive(Debug, Clone)]
pub struct SearchState {
    /// Endpoint currently browsed.
    pub mode: SearchMode,

    /// Current settled search term. Empty only in [`SearchMode::Trending`].
    pub query: String,

    /// Results of the current epoch, deduplicated by id, in arrival order.
    pub items: Vec<MediaItem>,

    /// Cursor for the next page request.
    pub next_offset: u32,

    /// Whether another page may exist for the current query.
    pub has_more: bool,

    /// Observable lifecycle state.
    pub status: SearchStatus,

    /// Query generation. Bumped on every mode/query change and on unmount.
    pub epoch: u64,

    /// Set once the session is torn down; every later event is ignored.
    pub unmounted: bool,

    /// Last failure of the current epoch, kept for diagnostics.
    pub last_failure: Option<FetchFailure>,

    /// Ids present in `items`.
    seen_ids: HashSet<String>,

    /// Immutable session configuration.
    config: Arc<Config>,
}

impl SearchState {
    /// Creates an unmounted-yet state: trending mode, no items, `Idle`.
    #[must_use]
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            mode: SearchMode::Trending,
            query: String::new(),
            items: Vec::new(),
            next_offset: 0,
            has_more: true,
            status: SearchStatus::Idle,
            epoch: 0,
            unmounted: false,
            last_failure: None,
            seen_ids: HashSet::new(),
            config,
        }
    }

    /// Session configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Configured page size.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.config.page_size
    }

    /// `true` when the first page of the current epoch failed.
    #[must_use]
    pub fn error_flag(&self) -> bool {
        self.status == SearchStatus::Error
    }

    /// Returns `true` if a response tagged with `epoch` may still be applied.
    #[must_use]
    pub fn is_current(&self, epoch: u64) -> bool {
        !self.unmounted && epoch == self.epoch
    }

    /// Returns `true` if `(mode, query)` is what the session already shows.
    #[must_use]
    pub fn is_same_query(&self, mode: SearchMode, query: &str) -> bool {
        self.mode == mode && self.query == query
    }

    /// Looks up an item of the current result list by id.
    #[must_use]
    pub fn find_item(&self, id: &str) -> Option<&MediaItem> {
        if !self.seen_ids.contains(id) {
            return None;
        }
        self.items.iter().find(|item| item.id == id)
    }

    /// Starts a new query epoch for `(mode, query)`.
    ///
    /// Clears the result list and resets pagination. The caller issues the
    /// first page request.
    pub fn begin_epoch(&mut self, mode: SearchMode, query: String) {
        self.epoch += 1;
        self.mode = mode;
        self.query = query;
        self.reset_results();
        self.status = SearchStatus::Loading;

        tracing::debug!(
            epoch = self.epoch,
            mode = ?self.mode,
            query = %self.query,
            "query epoch started"
        );
    }

    /// Drops every result and the pagination cursor.
    pub fn reset_results(&mut self) {
        self.items.clear();
        self.seen_ids.clear();
        self.next_offset = 0;
        self.has_more = true;
        self.last_failure = None;
    }

    /// Appends a page fetched with `limit` to the current epoch.
    ///
    /// Items whose id is already present are skipped. The cursor advances by
    /// [`Page::cursor_advance`], since it addresses the API's result set
    /// rather than the deduplicated list. A page that filled `limit` leaves
    /// `has_more` set unless the reported total has been reached. Returns the
    /// number of items appended.
    pub fn append_page(&mut self, page: Page, limit: u32) -> usize {
        let page_len = page.len();
        let advance = page.cursor_advance();
        let before = self.items.len();

        for item in page.items {
            if self.seen_ids.insert(item.id.clone()) {
                self.items.push(item);
            }
        }

        self.next_offset = self.next_offset.saturating_add(advance);
        self.has_more = advance >= limit
            && (page.total_available == 0 || self.next_offset < page.total_available);

        let appended = self.items.len() - before;
        if appended < page_len as usize {
            tracing::debug!(
                duplicates = page_len as usize - appended,
                "dropped duplicate items"
            );
        }
        appended
    }

    /// Lays out the current items with the breakpoint for `viewport_width`.
    #[must_use]
    pub fn layout(&self, viewport_width: u32) -> MasonryLayout<'_> {
        let bp = self.config.masonry.for_viewport(viewport_width);
        layout(&self.items, bp.columns, bp.image_width, bp.gutter)
    }

    /// Computes a renderable view model for a viewport `viewport_width`
    /// pixels wide.
    #[must_use]
    pub fn compute_viewmodel(&self, viewport_width: u32) -> GridViewModel {
        let grid = self.layout(viewport_width);
        let messages = &self.config.messages;

        let message = match self.status {
            SearchStatus::Loading => Some(messages.loading.clone()),
            SearchStatus::Empty => Some(messages.no_matches.clone()),
            SearchStatus::Error => Some(messages.error.clone()),
            SearchStatus::Idle | SearchStatus::LoadingMore | SearchStatus::Ready => None,
        };

        let columns = grid
            .columns
            .iter()
            .map(|column| ColumnView {
                tiles: column
                    .items
                    .iter()
                    .map(|placed| Tile {
                        id: placed.item.id.clone(),
                        preview_url: placed.item.preview_url.clone(),
                        title: placed.item.title.clone(),
                        width: placed.display_width,
                        height: placed.display_height,
                    })
                    .collect(),
                height: column.height,
            })
            .collect();

        GridViewModel {
            status: self.status,
            message,
            displayed_count: grid.placed_count(),
            columns,
            has_more: self.has_more,
            is_loading_more: self.status == SearchStatus::LoadingMore,
            query: self.query.clone(),
            placeholder: self.config.placeholder.clone(),
            powered_by: self.config.powered_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> MediaItem {
        MediaItem {
            id: id.to_string(),
            preview_width: 100,
            preview_height: 100,
            preview_url: String::new(),
            full_url: String::new(),
            title: String::new(),
        }
    }

    fn state(page_size: u32) -> SearchState {
        SearchState::new(Arc::new(Config {
            page_size,
            ..Config::default()
        }))
    }

    fn page(ids: &[&str], total: u32) -> Page {
        Page {
            items: ids.iter().map(|id| item(id)).collect(),
            offset: 0,
            total_available: total,
            reported_count: 0,
        }
    }

    #[test]
    fn new_state_is_idle_trending() {
        let s = state(5);
        assert_eq!(s.status, SearchStatus::Idle);
        assert_eq!(s.mode, SearchMode::Trending);
        assert!(s.query.is_empty());
        assert_eq!(s.epoch, 0);
    }

    #[test]
    fn append_deduplicates_but_advances_full_page() {
        let mut s = state(3);
        assert_eq!(s.append_page(page(&["a", "b", "c"], 0), 3), 3);
        assert_eq!(s.append_page(page(&["c", "d", "e"], 0), 3), 2);
        assert_eq!(s.next_offset, 6);
        let ids: Vec<_> = s.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
        assert!(s.has_more);
    }

    #[test]
    fn skipped_record_does_not_shorten_a_full_page() {
        let mut s = state(3);
        let full = Page {
            reported_count: 3,
            ..page(&["a", "b"], 500)
        };
        s.append_page(full, 3);
        assert_eq!(s.items.len(), 2);
        assert_eq!(s.next_offset, 3);
        assert!(s.has_more);
    }

    #[test]
    fn short_page_exhausts() {
        let mut s = state(3);
        s.append_page(page(&["a", "b"], 0), 3);
        assert!(!s.has_more);
    }

    #[test]
    fn reaching_total_exhausts_even_on_full_page() {
        let mut s = state(3);
        s.append_page(page(&["a", "b", "c"], 6), 3);
        assert!(s.has_more);
        s.append_page(page(&["d", "e", "f"], 6), 3);
        assert!(!s.has_more);
    }

    #[test]
    fn begin_epoch_clears_results() {
        let mut s = state(3);
        s.append_page(page(&["a", "b", "c"], 0), 3);
        s.begin_epoch(SearchMode::Searching, "dog".to_string());
        assert_eq!(s.epoch, 1);
        assert!(s.items.is_empty());
        assert!(s.find_item("a").is_none());
        assert_eq!(s.next_offset, 0);
        assert!(s.has_more);
        assert_eq!(s.status, SearchStatus::Loading);
        assert!(!s.is_current(0));
        assert!(s.is_current(1));
    }

    #[test]
    fn viewmodel_reports_messages_per_status() {
        let mut s = state(3);
        s.status = SearchStatus::Empty;
        let vm = s.compute_viewmodel(400);
        assert_eq!(vm.message.as_deref(), Some("No matches found."));

        s.status = SearchStatus::Error;
        let vm = s.compute_viewmodel(400);
        assert_eq!(vm.message.as_deref(), Some("Oops! Something went wrong. Please, try again."));

        s.status = SearchStatus::Ready;
        s.append_page(page(&["a", "b", "c"], 0), 3);
        let vm = s.compute_viewmodel(400);
        assert!(vm.message.is_none());
        assert_eq!(vm.displayed_count, 3);
        assert_eq!(vm.columns.len(), 2);
    }
}
