//! Tokio runtime around the synchronous session core.
//!
//! - [`debounce`]: [`QueryDebouncer`], the trailing-edge input timer
//! - [`session`]: [`spawn_session`] and the [`SessionHandle`] a host drives

pub mod debounce;
pub mod session;

pub use debounce::QueryDebouncer;
pub use session::{spawn_session, SearchSnapshot, SessionHandle, SessionHooks};
