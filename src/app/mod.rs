//! Search session core: state, events and actions.
//!
//! This layer sits between the async runtime ([`crate::runtime`]) and the
//! fetch/layout layers. It holds no I/O.
//!
//! # Architecture
//!
//! ```text
//! Input/Scroll → Events → handle_event → State Mutations → Actions → Side Effects
//!                             ↑                                 ↓
//!                             └────── epoch-tagged responses ───┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: side effect commands emitted by the event handler
//! - [`handler`]: event processing and state transitions
//! - [`modes`]: search mode and status enums
//! - [`state`]: session state container and view model computation

pub mod actions;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::{SearchMode, SearchStatus};
pub use state::SearchState;
