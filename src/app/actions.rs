//! Side effects requested by the event handler.
//!
//! [`handle_event`](crate::app::handle_event) never performs I/O. It returns
//! a `Vec<Action>` and the session runtime executes them in order: spawning
//! fetch tasks, invoking host hooks and cancelling the debounce timer.
//!
//! # Example
//!
//! ```rust
//! use gifscout::app::Action;
//! use gifscout::app::modes::SearchMode;
//! use gifscout::fetch::FetchRequest;
//!
//! let actions = vec![
//!     Action::Fetch(FetchRequest::new(1, SearchMode::Searching, "cat", 0, 25)),
//!     Action::NotifySearch("cat".into()),
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use crate::domain::MediaItem;
use crate::fetch::FetchRequest;

/// Commands executed by the session runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Issues one page request. The response comes back as
    /// [`Event::FetchCompleted`](crate::app::Event::FetchCompleted) with the
    /// same epoch tag.
    Fetch(FetchRequest),

    /// Invokes the host's `on_search` hook with the settled term.
    NotifySearch(String),

    /// Invokes the host's `on_select` hook with the activated item.
    NotifySelect(MediaItem),

    /// Aborts a pending debounce timer so no settled query arrives later.
    CancelDebounce,
}
