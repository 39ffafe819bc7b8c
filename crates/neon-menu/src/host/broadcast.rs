//! In-process event fan-out over `tokio::sync::broadcast`.
//!
//! The host keeps the [`InteractionPublisher`] and pushes every
//! interaction-created event into it. Each menu waits through a
//! [`BroadcastEventSource`], which subscribes afresh for every wait, so events
//! published while no wait is active are not seen by that menu.
//!
//! A host replaying events one at a time can pair
//! [`InteractionPublisher::delivered`] with
//! [`InteractionPublisher::active_waits`]: once the delivered count has caught
//! up with what was published, any active wait is a new one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{trace, warn};

use super::{EventPredicate, EventSource, InteractionCreateEvent, WaitError};

/// Publishing side of the fan-out, owned by the host
#[derive(Debug, Clone)]
pub struct InteractionPublisher {
    sender: broadcast::Sender<InteractionCreateEvent>,
    delivered: Arc<AtomicU64>,
}

impl InteractionPublisher {
    /// Publish an event to every active wait.
    ///
    /// Returns how many waits received it.
    pub fn publish(&self, event: InteractionCreateEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Number of waits currently subscribed
    pub fn active_waits(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Number of events handed out by a wait so far.
    ///
    /// Counted after the wait has unsubscribed.
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::SeqCst)
    }

    /// Another event source over this channel
    pub fn event_source(&self) -> BroadcastEventSource {
        BroadcastEventSource {
            sender: self.sender.downgrade(),
            delivered: Arc::clone(&self.delivered),
        }
    }
}

/// [`EventSource`] reading from an [`InteractionPublisher`].
///
/// Holds only a weak handle: once every publisher is dropped, pending and
/// future waits end with [`WaitError::Closed`].
#[derive(Debug, Clone)]
pub struct BroadcastEventSource {
    sender: broadcast::WeakSender<InteractionCreateEvent>,
    delivered: Arc<AtomicU64>,
}

impl BroadcastEventSource {
    /// Create a connected publisher/source pair.
    ///
    /// `capacity` bounds how many events a slow wait may fall behind before
    /// it starts skipping.
    pub fn channel(capacity: usize) -> (InteractionPublisher, Self) {
        let publisher = InteractionPublisher {
            sender: broadcast::channel(capacity).0,
            delivered: Arc::new(AtomicU64::new(0)),
        };
        let source = publisher.event_source();
        (publisher, source)
    }
}

#[async_trait]
impl EventSource for BroadcastEventSource {
    async fn wait_for(
        &self,
        timeout: Duration,
        predicate: EventPredicate<'_>,
    ) -> Result<InteractionCreateEvent, WaitError> {
        let mut receiver = match self.sender.upgrade() {
            Some(sender) => sender.subscribe(),
            None => return Err(WaitError::Closed),
        };

        let wait = async move {
            loop {
                match receiver.recv().await {
                    Ok(event) if predicate(&event) => return Ok(event),
                    Ok(_) => trace!("Skipping event that does not match the wait predicate"),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Interaction wait lagged behind the event stream");
                    }
                    Err(RecvError::Closed) => return Err(WaitError::Closed),
                }
            }
        };

        // The receiver lives in `wait` and is gone once this returns
        let outcome = tokio::time::timeout(timeout, wait).await;
        match outcome {
            Ok(Ok(event)) => {
                self.delivered.fetch_add(1, Ordering::SeqCst);
                Ok(event)
            }
            Ok(Err(err)) => Err(err),
            Err(_) => Err(WaitError::Timeout(timeout)),
        }
    }
}
