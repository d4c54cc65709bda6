use log::{debug, warn};
use std::sync::{Mutex, PoisonError};
use tokio::sync::mpsc;

use crate::models::events::{PushUpdate, Topic};

/// Updates buffered per subscriber before new ones are dropped.
const SUBSCRIPTION_BUFFER: usize = 32;

struct Subscriber {
    invitation_id: String,
    topic: Topic,
    tx: mpsc::Sender<PushUpdate>,
}

/// Fan-out of push updates to subscribers keyed by invitation and topic.
///
/// Subscribers whose receiver has been dropped are pruned on the next publish.
#[derive(Default)]
pub struct PushRegistry {
    subscribers: Mutex<Vec<Subscriber>>,
}

impl PushRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, invitation_id: &str, topic: Topic) -> mpsc::Receiver<PushUpdate> {
        let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.push(Subscriber {
            invitation_id: invitation_id.to_string(),
            topic,
            tx,
        });
        debug!(
            "New {:?} subscription for invitation_id={}, total subscribers={}",
            topic,
            invitation_id,
            subscribers.len()
        );
        rx
    }

    /// Delivers `update` to every live subscriber of its invitation and topic.
    /// Returns how many subscribers received it.
    pub fn publish(&self, update: PushUpdate) -> usize {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|s| !s.tx.is_closed());

        let mut delivered = 0;
        for subscriber in subscribers.iter().filter(|s| {
            s.topic == update.topic() && s.invitation_id == update.invitation_id()
        }) {
            match subscriber.tx.try_send(update.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => warn!(
                    "Subscriber for invitation_id={} is lagging, dropping {:?} update",
                    subscriber.invitation_id, subscriber.topic
                ),
                Err(mpsc::error::TrySendError::Closed(_)) => {}
            }
        }
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|s| !s.tx.is_closed());
        subscribers.len()
    }
}
