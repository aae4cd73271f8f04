// Module: poller
// Viewer-details and live chat polling loops

pub mod chat;
pub mod viewer;

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::PollingConfig;
use crate::hub::EventHub;
use crate::provider::LiveApi;
use crate::state::LiveState;

pub use chat::{ChatPoller, StaleSessionPolicy};
pub use viewer::{ViewerCycle, ViewerPoller};

/// Timing and policy knobs for both pollers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerOptions {
    /// Period of the viewer-details poller
    pub viewer_interval: Duration,
    /// Chat poller delay while no session handle is known
    pub idle_delay: Duration,
    /// Chat poller delay after failures or when the upstream suggests none
    pub default_chat_delay: Duration,
    pub stale_session_policy: StaleSessionPolicy,
}

impl Default for PollerOptions {
    fn default() -> Self {
        Self {
            viewer_interval: Duration::from_secs(60),
            idle_delay: Duration::from_secs(5),
            default_chat_delay: Duration::from_secs(10),
            stale_session_policy: StaleSessionPolicy::Retain,
        }
    }
}

impl From<&PollingConfig> for PollerOptions {
    fn from(config: &PollingConfig) -> Self {
        Self {
            viewer_interval: Duration::from_secs(config.viewer_interval_seconds),
            idle_delay: Duration::from_secs(config.idle_delay_seconds),
            default_chat_delay: Duration::from_secs(config.default_chat_delay_seconds),
            stale_session_policy: config.stale_session_policy,
        }
    }
}

/// Both pollers wired to the same state and hub
pub struct LivePollers {
    viewer: ViewerPoller,
    chat: ChatPoller,
    viewer_interval: Duration,
}

impl LivePollers {
    #[must_use]
    pub fn new(
        api: Arc<dyn LiveApi>,
        state: Arc<LiveState>,
        hub: EventHub,
        options: PollerOptions,
    ) -> Self {
        Self {
            viewer: ViewerPoller::new(api.clone(), state.clone(), hub.clone()),
            chat: ChatPoller::new(api, state, hub, &options),
            viewer_interval: options.viewer_interval,
        }
    }

    /// Start polling.
    ///
    /// One viewer cycle runs first; the chat poller starts once it has
    /// finished. The viewer interval counts from the moment this is called.
    /// The returned task ends only after `cancel` fires.
    pub fn start(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let first_tick = Instant::now() + self.viewer_interval;

            tokio::select! {
                () = cancel.cancelled() => return,
                cycle = self.viewer.poll_once() => {
                    info!(?cycle, "Initial viewer cycle complete");
                }
            }

            let chat = tokio::spawn(self.chat.run(cancel.clone()));
            self.viewer
                .run(first_tick, self.viewer_interval, cancel)
                .await;

            if let Err(e) = chat.await {
                tracing::error!("Chat poller task failed: {}", e);
            }
        })
    }
}
