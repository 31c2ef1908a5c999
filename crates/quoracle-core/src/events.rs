//! Broadcast of committed oracle notifications.
//!
//! Every subscriber gets its own bounded buffer. A subscriber that falls more
//! than the buffer size behind observes `RecvError::Lagged` instead of slowing
//! down the oracle.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;

use quoracle_types::OracleEvent;

/// Per-subscriber buffer used by [`EventBus::default`].
pub const DEFAULT_CAPACITY: usize = 1000;

/// Fan-out of [`OracleEvent`]s with a running count of everything published.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<OracleEvent>,
    published: Arc<AtomicU64>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            published: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Publish `event` and return its 1-based sequence number.
    ///
    /// Publishing with nobody listening is not an error; the event is counted
    /// and dropped.
    pub fn emit(&self, event: OracleEvent) -> u64 {
        let seq = self.published.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(seq, event = event.name(), "event published");
        if self.sender.send(event).is_err() {
            tracing::trace!(seq, "no subscribers");
        }
        seq
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OracleEvent> {
        self.sender.subscribe()
    }

    /// Number of events published so far.
    pub fn sequence(&self) -> u64 {
        self.published.load(Ordering::SeqCst)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
