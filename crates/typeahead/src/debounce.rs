use std::time::Duration;
use tokio::task::JoinHandle;

/// Last-call-wins timer: at most one pending action per instance.
///
/// Scheduling spawns a sleeping task on the current tokio runtime, so it must
/// be called from within one. Dropping the debouncer cancels whatever is pending.
#[derive(Debug, Default)]
pub struct Debouncer {
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any pending action and run `action` once after `delay` of quiet.
    pub fn schedule<F>(&mut self, delay: Duration, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        }));
    }

    /// Drop the pending action without running it. Returns whether one was live.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let live = !handle.is_finished();
                handle.abort();
                live
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn only_the_last_action_runs() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new();

        for word in ["b", "ba", "bat"] {
            let tx = tx.clone();
            debouncer.schedule(Duration::from_millis(300), move || {
                let _ = tx.send(word);
            });
            tokio::time::advance(Duration::from_millis(100)).await;
        }

        assert_eq!(rx.recv().await, Some("bat"));
        drop(tx);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_the_action() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new();

        let counter = Arc::clone(&fired);
        debouncer.schedule(Duration::from_millis(300), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(debouncer.is_pending());
        assert!(debouncer.cancel());
        assert!(!debouncer.is_pending());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(!debouncer.cancel());
    }

    #[tokio::test(start_paused = true)]
    async fn action_waits_for_the_full_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new();
        let started = tokio::time::Instant::now();

        debouncer.schedule(Duration::from_millis(300), move || {
            let _ = tx.send(tokio::time::Instant::now());
        });

        let fired_at = rx.recv().await.unwrap();
        assert!(fired_at - started >= Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_cancels_pending_action() {
        let fired = Arc::new(AtomicUsize::new(0));
        {
            let mut debouncer = Debouncer::new();
            let counter = Arc::clone(&fired);
            debouncer.schedule(Duration::from_millis(50), move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
