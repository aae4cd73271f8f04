//! In-process event hub
//!
//! Fans live events out to every connected push-channel client. Delivery is
//! best effort at the moment of publishing: there is no replay for clients
//! that connect later and no acknowledgement.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Default number of events a subscriber may fall behind before losing the oldest
pub const DEFAULT_HUB_CAPACITY: usize = 256;

/// Events pushed to clients
///
/// Serialized as `{"event": "<name>", "data": <payload>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum LiveEvent {
    /// Current number of viewers
    ViewerCount(u64),

    /// A non-empty batch of chat messages in upstream order, relayed verbatim
    NewMessages(Vec<serde_json::Value>),
}

impl LiveEvent {
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::ViewerCount(_) => "viewerCount",
            Self::NewMessages(_) => "newMessages",
        }
    }

    /// Encode as a JSON text frame
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Publish side of the relay, cheap to clone
#[derive(Debug, Clone)]
pub struct EventHub {
    sender: broadcast::Sender<LiveEvent>,
}

impl EventHub {
    /// Create a hub where each subscriber buffers at most `capacity` pending events
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish to everybody subscribed right now.
    ///
    /// Returns the number of subscribers the event was handed to; 0 when
    /// nobody is connected.
    pub fn publish(&self, event: LiveEvent) -> usize {
        let event_type = event.event_type();
        match self.sender.send(event) {
            Ok(sent_count) => {
                debug!(event_type, sent_count, "Event published");
                sent_count
            }
            Err(_) => {
                debug!(event_type, "No subscribers, event dropped");
                0
            }
        }
    }

    /// Subscribe to events published from now on
    #[must_use]
    pub fn subscribe(&self) -> EventSubscription {
        EventSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new(DEFAULT_HUB_CAPACITY)
    }
}

/// Receive side held by one client connection
#[derive(Debug)]
pub struct EventSubscription {
    receiver: broadcast::Receiver<LiveEvent>,
}

impl EventSubscription {
    /// Wait for the next event.
    ///
    /// A subscriber that fell behind skips the events it missed and keeps
    /// going. Returns `None` once the hub is gone.
    pub async fn recv(&mut self) -> Option<LiveEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Subscriber lagged, dropping missed events");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
