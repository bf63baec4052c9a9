//! Fan-out of feed messages to live subscribers.

use tokio::sync::broadcast;
use tracing::warn;

use crate::FeedMessage;

/// Publishes each message to every current [`Subscription`].
///
/// Publishing never waits on a subscriber.  Each one reads from its own
/// position in a bounded ring; one that falls a full ring behind is cut off
/// without affecting the others.
#[derive(Clone, Debug)]
pub struct Broadcaster {
    tx: broadcast::Sender<FeedMessage>,
}

impl Broadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription { rx: self.tx.subscribe() }
    }

    /// Returns the number of subscribers the message was queued for.
    pub fn publish(&self, message: FeedMessage) -> usize {
        self.tx.send(message).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// One subscriber's view of the feed.
#[derive(Debug)]
pub struct Subscription {
    rx: broadcast::Receiver<FeedMessage>,
}

impl Subscription {
    /// The next message, or `None` once this subscriber is finished: the
    /// feed closed, or it lagged and was dropped.
    pub async fn next(&mut self) -> Option<FeedMessage> {
        match self.rx.recv().await {
            Ok(message) => Some(message),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "subscriber fell behind; dropping it");
                None
            }
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }
}
