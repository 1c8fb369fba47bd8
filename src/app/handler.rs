//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only place [`SearchState`] changes. It is
//! synchronous and free of I/O: every side effect leaves as an [`Action`].
//!
//! # Event Types
//!
//! - **Lifecycle**: `Mount`, `Unmount`
//! - **Input**: `QuerySettled` (already debounced), `ScrollNearBottom`, `SelectItem`
//! - **Fetch**: `FetchCompleted` carrying an epoch-tagged [`FetchResponse`]
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use gifscout::app::{handle_event, Action, Event, SearchState};
//! use gifscout::Config;
//!
//! let mut state = SearchState::new(Arc::new(Config::default()));
//! let (changed, actions) = handle_event(&mut state, &Event::Mount);
//! assert!(changed);
//! assert!(matches!(actions.as_slice(), [Action::Fetch(_)]));
//! ```

use crate::app::modes::{SearchMode, SearchStatus};
use crate::app::{Action, SearchState};
use crate::fetch::{FetchOutcome, FetchRequest, FetchResponse};

/// Inputs to the search session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The search box became visible. Loads the first page of the initial
    /// query (trending when empty).
    Mount,

    /// The debouncer settled on a query text.
    QuerySettled(String),

    /// A fetch task finished, successfully or not.
    FetchCompleted(FetchResponse),

    /// The host's scroll position came within its threshold of the bottom.
    ScrollNearBottom,

    /// The host activated the item with this id.
    SelectItem(String),

    /// The search box is being torn down.
    Unmount,
}

/// Processes an event, mutates session state, and returns actions to execute.
///
/// Returns `(changed, actions)`. `changed` is `true` when observable state
/// moved and the runtime should publish a new snapshot.
///
/// Once the state is unmounted every event is ignored.
pub fn handle_event(state: &mut SearchState, event: &Event) -> (bool, Vec<Action>) {
    let _span = tracing::debug_span!("handle_event", event_type = event_name(event), epoch = state.epoch)
        .entered();

    if state.unmounted {
        tracing::trace!("event after unmount ignored");
        return (false, vec![]);
    }

    match event {
        Event::Mount => handle_mount(state),
        Event::QuerySettled(text) => handle_query_settled(state, text),
        Event::FetchCompleted(response) => handle_fetch_completed(state, response),
        Event::ScrollNearBottom => handle_scroll_near_bottom(state),
        Event::SelectItem(id) => {
            let Some(item) = state.find_item(id) else {
                tracing::debug!(id = %id, "selected id not in current results");
                return (false, vec![]);
            };
            (false, vec![Action::NotifySelect(item.clone())])
        }
        Event::Unmount => {
            state.epoch += 1;
            state.unmounted = true;
            tracing::debug!("session unmounted");
            (true, vec![Action::CancelDebounce])
        }
    }
}

fn handle_mount(state: &mut SearchState) -> (bool, Vec<Action>) {
    if state.status != SearchStatus::Idle {
        tracing::debug!(status = ?state.status, "already mounted");
        return (false, vec![]);
    }

    let query = state.config().initial_query.trim().to_string();
    state.mode = SearchMode::for_query(&query);
    state.query = query;
    state.reset_results();
    state.status = SearchStatus::Loading;

    tracing::info!(mode = ?state.mode, query = %state.query, "mounted");
    (true, vec![Action::Fetch(first_page(state))])
}

fn handle_query_settled(state: &mut SearchState, text: &str) -> (bool, Vec<Action>) {
    let text = text.trim();
    let mode = SearchMode::for_query(text);
    let query = match mode {
        SearchMode::Trending => String::new(),
        SearchMode::Searching => text.to_string(),
    };

    if state.is_same_query(mode, &query) {
        tracing::debug!(query = %query, "settled query unchanged");
        return (false, vec![]);
    }

    state.begin_epoch(mode, query);
    let actions = vec![
        Action::Fetch(first_page(state)),
        Action::NotifySearch(state.query.clone()),
    ];
    (true, actions)
}

fn handle_fetch_completed(state: &mut SearchState, response: &FetchResponse) -> (bool, Vec<Action>) {
    if !state.is_current(response.epoch) {
        tracing::trace!(
            response_epoch = response.epoch,
            current_epoch = state.epoch,
            "stale response discarded"
        );
        return (false, vec![]);
    }

    match &response.outcome {
        FetchOutcome::Success(page) => {
            let appended = state.append_page(page.clone(), response.limit);
            state.status = if state.items.is_empty() {
                SearchStatus::Empty
            } else {
                SearchStatus::Ready
            };
            tracing::debug!(
                appended,
                total = state.items.len(),
                next_offset = state.next_offset,
                has_more = state.has_more,
                "page applied"
            );
        }
        FetchOutcome::Failure(failure) if !response.is_continuation() => {
            tracing::warn!(kind = ?failure.kind, reason = %failure.reason, "initial page failed");
            state.reset_results();
            state.has_more = false;
            state.status = SearchStatus::Error;
            state.last_failure = Some(failure.clone());
        }
        FetchOutcome::Failure(failure) => {
            tracing::debug!(
                kind = ?failure.kind,
                reason = %failure.reason,
                offset = response.offset,
                "continuation page failed, pagination stopped"
            );
            state.has_more = false;
            state.status = SearchStatus::Ready;
            state.last_failure = Some(failure.clone());
        }
    }

    (true, vec![])
}

fn handle_scroll_near_bottom(state: &mut SearchState) -> (bool, Vec<Action>) {
    if state.status != SearchStatus::Ready || !state.has_more {
        tracing::trace!(status = ?state.status, has_more = state.has_more, "scroll ignored");
        return (false, vec![]);
    }

    state.status = SearchStatus::LoadingMore;
    let request = FetchRequest::new(
        state.epoch,
        state.mode,
        state.query.clone(),
        state.next_offset,
        state.page_size(),
    );
    tracing::debug!(offset = request.offset, "loading next page");
    (true, vec![Action::Fetch(request)])
}

fn first_page(state: &SearchState) -> FetchRequest {
    FetchRequest::new(state.epoch, state.mode, state.query.clone(), 0, state.page_size())
}

const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::Mount => "mount",
        Event::QuerySettled(_) => "query_settled",
        Event::FetchCompleted(_) => "fetch_completed",
        Event::ScrollNearBottom => "scroll_near_bottom",
        Event::SelectItem(_) => "select_item",
        Event::Unmount => "unmount",
    }
}
