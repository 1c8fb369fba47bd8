//! Trailing-edge debouncer for raw query text.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Coalesces rapid text input into one settled value.
///
/// Every [`push`](Self::push) restarts the quiet-period timer. When the timer
/// elapses uninterrupted, the latest text is sent on the settled channel.
/// Pending timers are aborted by [`cancel`](Self::cancel) and on drop.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct QueryDebouncer {
    wait: Duration,
    settled: mpsc::UnboundedSender<String>,
    pending: Option<JoinHandle<()>>,
}

impl QueryDebouncer {
    /// Creates a debouncer emitting on `settled` after `wait` of quiet.
    #[must_use]
    pub const fn new(wait: Duration, settled: mpsc::UnboundedSender<String>) -> Self {
        Self {
            wait,
            settled,
            pending: None,
        }
    }

    /// Records a new input and restarts the timer.
    pub fn push(&mut self, text: impl Into<String>) {
        self.cancel();

        let text = text.into();
        let deadline = Instant::now() + self.wait;
        let settled = self.settled.clone();

        tracing::trace!(text = %text, "debounce timer restarted");
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            tracing::debug!(text = %text, "query settled");
            let _ = settled.send(text);
        }));
    }

    /// Aborts the pending timer, if any. Nothing is emitted for it.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Returns `true` while a timer is armed and has not fired.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for QueryDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn emits_once_after_quiet_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = QueryDebouncer::new(Duration::from_millis(500), tx);

        let start = Instant::now();
        debouncer.push("cat");
        assert!(debouncer.is_pending());

        assert_eq!(rx.recv().await.as_deref(), Some("cat"));
        assert!(start.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn drop_aborts_pending_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = QueryDebouncer::new(Duration::from_millis(500), tx);
        debouncer.push("cat");
        drop(debouncer);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(rx.try_recv().is_err());
    }
}
