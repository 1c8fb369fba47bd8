//! Async driver for one search session.
//!
//! The session task owns the [`SearchState`], the [`QueryDebouncer`] and the
//! host hooks. It processes one message at a time, feeds events through
//! [`handle_event`], executes the returned actions and publishes a fresh
//! [`SearchSnapshot`] whenever observable state changed.
//!
//! ```text
//! SessionHandle ──Command──▶ ┌──────────────┐ ──spawn──▶ fetch task
//!                            │ session loop │              │
//! QueryDebouncer ─settled──▶ │ handle_event │ ◀─response───┘
//!                            └──────────────┘ ──watch──▶ SearchSnapshot
//! ```

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use super::debounce::QueryDebouncer;
use crate::app::{handle_event, Action, Event, SearchState};
use crate::domain::{FetchError, GifscoutError, MediaItem, Result};
use crate::fetch::{FetchOutcome, FetchRequest, ResultFetcher};
use crate::ui::GridViewModel;
use crate::Config;

type SearchHook = Box<dyn Fn(&str) + Send + Sync>;
type SelectHook = Box<dyn Fn(&MediaItem) + Send + Sync>;

/// Host callbacks invoked from the session task.
#[derive(Default)]
pub struct SessionHooks {
    on_search: Option<SearchHook>,
    on_select: Option<SelectHook>,
}

impl SessionHooks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Called once per settled, non-redundant query change with the new term.
    #[must_use]
    pub fn on_search(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_search = Some(Box::new(hook));
        self
    }

    /// Called when the host selects an item of the current results.
    #[must_use]
    pub fn on_select(mut self, hook: impl Fn(&MediaItem) + Send + Sync + 'static) -> Self {
        self.on_select = Some(Box::new(hook));
        self
    }
}

impl fmt::Debug for SessionHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHooks")
            .field("on_search", &self.on_search.is_some())
            .field("on_select", &self.on_select.is_some())
            .finish()
    }
}

/// Read-only copy of the session state published after every change.
#[derive(Debug, Clone)]
pub struct SearchSnapshot(SearchState);

impl SearchSnapshot {
    /// Computes the view model for a viewport `viewport_width` pixels wide.
    #[must_use]
    pub fn viewmodel(&self, viewport_width: u32) -> GridViewModel {
        self.0.compute_viewmodel(viewport_width)
    }
}

impl Deref for SearchSnapshot {
    type Target = SearchState;

    fn deref(&self) -> &SearchState {
        &self.0
    }
}

#[derive(Debug)]
enum Command {
    Input(String),
    Event(Event),
}

/// Host-side handle to a running session.
///
/// Dropping the handle unmounts the session.
#[derive(Debug)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<SearchSnapshot>,
    task: Option<JoinHandle<()>>,
}

impl SessionHandle {
    /// Forwards raw text from the search field. Debounced before use.
    ///
    /// # Errors
    ///
    /// Returns [`GifscoutError::SessionClosed`] after unmount.
    pub fn input(&self, text: impl Into<String>) -> Result<()> {
        self.send(Command::Input(text.into()))
    }

    /// Signals that the host scrolled near the bottom of the grid.
    ///
    /// # Errors
    ///
    /// Returns [`GifscoutError::SessionClosed`] after unmount.
    pub fn scroll_near_bottom(&self) -> Result<()> {
        self.send(Command::Event(Event::ScrollNearBottom))
    }

    /// Activates the item with `id`, invoking the `on_select` hook.
    ///
    /// # Errors
    ///
    /// Returns [`GifscoutError::SessionClosed`] after unmount.
    pub fn select(&self, id: impl Into<String>) -> Result<()> {
        self.send(Command::Event(Event::SelectItem(id.into())))
    }

    /// A receiver observing every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.snapshots.clone()
    }

    /// The latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SearchSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Tears the session down and waits for its task to finish.
    ///
    /// Pending debounce timers are cancelled and in-flight responses are
    /// discarded when they arrive.
    pub async fn unmount(mut self) {
        let _ = self.commands.send(Command::Event(Event::Unmount));
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "session task ended abnormally");
            }
        }
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| GifscoutError::SessionClosed)
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        if self.task.is_some() {
            let _ = self.commands.send(Command::Event(Event::Unmount));
        }
    }
}

/// Spawns a mounted session on the current tokio runtime.
///
/// The first page (trending, or `config.initial_query`) is requested
/// immediately.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use gifscout::{spawn_session, Config, GiphyFetcher, SessionHooks};
///
/// # async fn demo() -> gifscout::Result<()> {
/// let config = Config::load("gifscout.toml")?;
/// let fetcher = Arc::new(GiphyFetcher::new(&config)?);
/// let hooks = SessionHooks::new().on_search(|term| println!("searching {term}"));
///
/// let session = spawn_session(config, fetcher, hooks);
/// session.input("otters")?;
/// let mut updates = session.subscribe();
/// updates.changed().await.ok();
/// println!("{:?}", updates.borrow().status);
/// session.unmount().await;
/// # Ok(())
/// # }
/// ```
pub fn spawn_session(
    config: Config,
    fetcher: Arc<dyn ResultFetcher>,
    hooks: SessionHooks,
) -> SessionHandle {
    let config = Arc::new(config);
    let state = SearchState::new(Arc::clone(&config));
    let (snapshot_tx, snapshot_rx) = watch::channel(SearchSnapshot(state.clone()));
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let session = Session {
        timeout: Duration::from_millis(config.request_timeout_ms),
        debounce_wait: Duration::from_millis(config.debounce_wait_ms),
        state,
        fetcher,
        hooks,
        commands: command_tx.clone(),
        snapshots: snapshot_tx,
    };

    let span = tracing::info_span!("search_session");
    let task = tokio::spawn(session.run(command_rx).instrument(span));

    SessionHandle {
        commands: command_tx,
        snapshots: snapshot_rx,
        task: Some(task),
    }
}

struct Session {
    state: SearchState,
    fetcher: Arc<dyn ResultFetcher>,
    hooks: SessionHooks,
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Sender<SearchSnapshot>,
    timeout: Duration,
    debounce_wait: Duration,
}

impl Session {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        let (settled_tx, mut settled_rx) = mpsc::unbounded_channel();
        let mut debouncer = QueryDebouncer::new(self.debounce_wait, settled_tx);

        self.dispatch(&Event::Mount, &mut debouncer);

        while !self.state.unmounted {
            let event = tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Input(text)) => {
                        debouncer.push(text);
                        continue;
                    }
                    Some(Command::Event(event)) => event,
                    None => Event::Unmount,
                },
                Some(text) = settled_rx.recv() => Event::QuerySettled(text),
            };
            self.dispatch(&event, &mut debouncer);
        }

        tracing::debug!("session loop finished");
    }

    fn dispatch(&mut self, event: &Event, debouncer: &mut QueryDebouncer) {
        let (changed, actions) = handle_event(&mut self.state, event);

        if changed {
            self.snapshots.send_replace(SearchSnapshot(self.state.clone()));
        }

        for action in actions {
            match action {
                Action::Fetch(request) => self.spawn_fetch(request),
                Action::NotifySearch(term) => {
                    if let Some(hook) = &self.hooks.on_search {
                        hook(&term);
                    }
                }
                Action::NotifySelect(item) => {
                    if let Some(hook) = &self.hooks.on_select {
                        hook(&item);
                    }
                }
                Action::CancelDebounce => debouncer.cancel(),
            }
        }
    }

    fn spawn_fetch(&self, request: FetchRequest) {
        let fetcher = Arc::clone(&self.fetcher);
        let commands = self.commands.clone();
        let timeout = self.timeout;

        let span = tracing::debug_span!(
            "fetch_page",
            epoch = request.epoch,
            mode = ?request.mode,
            query = %request.query,
            offset = request.offset,
        );
        if let Some(parent) = request
            .trace_context
            .as_ref()
            .and_then(|ctx| ctx.to_otel_context())
        {
            span.set_parent(parent);
        }

        tokio::spawn(
            async move {
                let result = match tokio::time::timeout(timeout, fetcher.fetch(&request)).await {
                    Ok(result) => result,
                    Err(_) => Err(FetchError::Timeout(
                        u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                    )),
                };

                if let Err(e) = &result {
                    tracing::debug!(error = %e, kind = e.kind(), "fetch failed");
                }

                let response = request.respond(FetchOutcome::from(result));
                let _ = commands.send(Command::Event(Event::FetchCompleted(response)));
            }
            .instrument(span),
        );
    }
}
