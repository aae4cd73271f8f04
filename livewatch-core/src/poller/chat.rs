//! Live chat poller
//!
//! Two states: Idle (no session handle, checks again after a short fixed
//! delay) and Active (fetches pages at the cadence the upstream asks for).
//! The viewer poller moves it from Idle to Active by publishing a handle.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use super::PollerOptions;
use crate::hub::{EventHub, LiveEvent};
use crate::provider::{FailureKind, LiveApi, ProviderError};
use crate::state::LiveState;

/// What to do when the chat behind the current handle has ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleSessionPolicy {
    /// Keep polling the handle until the viewer poller replaces it
    #[default]
    Retain,
    /// Drop the handle and go idle when the upstream reports the chat ended
    ClearOnChatEnded,
}

pub struct ChatPoller {
    api: Arc<dyn LiveApi>,
    state: Arc<LiveState>,
    hub: EventHub,
    idle_delay: Duration,
    default_delay: Duration,
    policy: StaleSessionPolicy,
    /// Handle the current cursor belongs to
    session: Option<String>,
    page_token: Option<String>,
}

impl ChatPoller {
    #[must_use]
    pub fn new(
        api: Arc<dyn LiveApi>,
        state: Arc<LiveState>,
        hub: EventHub,
        options: &PollerOptions,
    ) -> Self {
        Self {
            api,
            state,
            hub,
            idle_delay: options.idle_delay,
            default_delay: options.default_chat_delay,
            policy: options.stale_session_policy,
            session: None,
            page_token: None,
        }
    }

    /// Cursor that the next fetch will send
    #[must_use]
    pub fn page_token(&self) -> Option<&str> {
        self.page_token.as_deref()
    }

    /// Run one cycle and return how long to wait before the next one.
    pub async fn poll_once(&mut self) -> Duration {
        let Some(live_chat_id) = self.state.live_chat_id() else {
            trace!("No active live chat, waiting");
            return self.idle_delay;
        };

        if self.session.as_deref() != Some(live_chat_id.as_str()) {
            if self.session.is_some() {
                info!(live_chat_id = %live_chat_id, "Live chat session switched, restarting from the live edge");
            }
            self.session = Some(live_chat_id.clone());
            self.page_token = None;
        }

        match self
            .api
            .chat_messages(&live_chat_id, self.page_token.as_deref())
            .await
        {
            Ok(page) => {
                self.page_token = page.next_page_token;

                if !page.messages.is_empty() {
                    let count = page.messages.len();
                    let sent_count = self.hub.publish(LiveEvent::NewMessages(page.messages));
                    debug!(live_chat_id = %live_chat_id, count, sent_count, "Chat messages published");
                }

                // A zero interval counts as missing
                page.polling_interval
                    .filter(|delay| !delay.is_zero())
                    .unwrap_or(self.default_delay)
            }
            Err(e) => {
                self.on_failure(&live_chat_id, &e);
                self.default_delay
            }
        }
    }

    fn on_failure(&mut self, live_chat_id: &str, err: &ProviderError) {
        let kind = err.kind();
        match kind {
            FailureKind::Fatal => {
                error!(live_chat_id, provider = self.api.name(), kind = %kind, "Chat poll error: {}", err);
            }
            FailureKind::Retryable | FailureKind::ChatEnded => {
                warn!(live_chat_id, provider = self.api.name(), kind = %kind, "Chat poll error: {}", err);
            }
        }

        if kind == FailureKind::ChatEnded && self.policy == StaleSessionPolicy::ClearOnChatEnded {
            self.state.clear_live_chat_id_if(live_chat_id);
            self.session = None;
            self.page_token = None;
        }
    }

    /// Poll until cancelled, waiting the delay each cycle returns.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!(policy = ?self.policy, "Chat poller started");

        loop {
            let delay = tokio::select! {
                () = cancel.cancelled() => break,
                delay = self.poll_once() => delay,
            };

            tokio::select! {
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(delay) => {}
            }
        }

        info!("Chat poller stopped");
    }
}
