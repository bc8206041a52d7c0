//! "Last request wins" guard for consumers that re-fetch while the user
//! navigates.
//!
//! Every fetch takes a [`Ticket`] before it starts. Only the result carrying
//! the most recently issued ticket is published; anything older is dropped
//! no matter when it resolves. In-flight requests are not cancelled.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

/// Sequence number handed out by [`LatestOnly::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
pub struct LatestOnly<T> {
    issued: AtomicU64,
    tx: watch::Sender<Option<T>>,
}

impl<T> Default for LatestOnly<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LatestOnly<T> {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            issued: AtomicU64::new(0),
            tx,
        }
    }

    /// Start a new request. Any ticket issued earlier becomes stale.
    pub fn begin(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }

    /// Store `value` if `ticket` is still the latest. Returns whether it was
    /// stored.
    pub fn publish(&self, ticket: Ticket, value: T) -> bool {
        let mut value = Some(value);
        let stored = self.tx.send_if_modified(|slot| {
            if self.is_current(ticket) {
                *slot = value.take();
                true
            } else {
                false
            }
        });

        if !stored {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.issued.load(Ordering::SeqCst),
                "Discarding stale response"
            );
        }
        stored
    }

    /// Run `fut` under a fresh ticket and publish its output if still latest.
    /// The ticket is taken when the returned future is first polled. Errors
    /// are returned to the caller and never published.
    pub async fn track<F, E>(&self, fut: F) -> Result<bool, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        let ticket = self.begin();
        let value = fut.await?;
        Ok(self.publish(ticket, value))
    }

    /// Watch published values.
    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.tx.subscribe()
    }
}

impl<T: Clone> LatestOnly<T> {
    pub fn latest(&self) -> Option<T> {
        self.tx.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::oneshot;

    #[test]
    fn only_latest_ticket_publishes() {
        let slot = LatestOnly::new();
        let a = slot.begin();
        let b = slot.begin();
        assert!(a < b);
        assert!(!slot.is_current(a));

        assert!(slot.publish(b, "b"));
        assert!(!slot.publish(a, "a"));
        assert_eq!(slot.latest(), Some("b"));
    }

    #[test]
    fn earlier_result_dropped_even_if_it_arrives_first() {
        let slot = LatestOnly::new();
        let a = slot.begin();
        let _b = slot.begin();
        assert!(!slot.publish(a, 1));
        assert_eq!(slot.latest(), None);
    }

    #[tokio::test]
    async fn out_of_order_resolution_keeps_newest() {
        let slot = Arc::new(LatestOnly::<&'static str>::new());
        let mut rx = slot.subscribe();

        let (release_a, wait_a) = oneshot::channel::<()>();
        let (release_b, wait_b) = oneshot::channel::<()>();

        let run_a = {
            let slot = slot.clone();
            let ticket = slot.begin();
            tokio::spawn(async move {
                wait_a.await.ok();
                slot.publish(ticket, "page 1")
            })
        };
        let run_b = {
            let slot = slot.clone();
            let ticket = slot.begin();
            tokio::spawn(async move {
                wait_b.await.ok();
                slot.publish(ticket, "page 2")
            })
        };

        release_b.send(()).unwrap();
        assert!(run_b.await.unwrap());
        release_a.send(()).unwrap();
        assert!(!run_a.await.unwrap());

        assert_eq!(slot.latest(), Some("page 2"));
        assert_eq!(*rx.borrow_and_update(), Some("page 2"));
    }

    #[tokio::test]
    async fn track_propagates_errors_without_publishing() {
        let slot = LatestOnly::<u32>::new();
        let result: Result<bool, &str> = slot.track(async { Err("boom") }).await;
        assert_eq!(result, Err("boom"));
        assert_eq!(slot.latest(), None);

        let result: Result<bool, &str> = slot.track(async { Ok(7) }).await;
        assert_eq!(result, Ok(true));
        assert_eq!(slot.latest(), Some(7));
    }
}
