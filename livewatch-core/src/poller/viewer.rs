//! Viewer-details poller
//!
//! Keeps the viewer count and the chat session handle current.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::hub::{EventHub, LiveEvent};
use crate::provider::{FailureKind, LiveApi};
use crate::state::LiveState;

/// Outcome of one viewer-details cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerCycle {
    /// Metadata fetched, handle updated, count published
    Updated {
        viewers: u64,
        live_chat_id: Option<String>,
    },
    /// The platform returned no item for the stream; nothing changed
    NotFound,
    /// The call failed; nothing changed
    Failed(FailureKind),
}

pub struct ViewerPoller {
    api: Arc<dyn LiveApi>,
    state: Arc<LiveState>,
    hub: EventHub,
}

impl ViewerPoller {
    #[must_use]
    pub fn new(api: Arc<dyn LiveApi>, state: Arc<LiveState>, hub: EventHub) -> Self {
        Self { api, state, hub }
    }

    /// Run one cycle: fetch metadata, update the handle, publish the count.
    pub async fn poll_once(&self) -> ViewerCycle {
        let video_id = self.state.video_id();

        let metadata = match self.api.stream_metadata(video_id).await {
            Ok(Some(metadata)) => metadata,
            Ok(None) => {
                debug!(video_id, "No stream item returned, skipping cycle");
                return ViewerCycle::NotFound;
            }
            Err(e) => {
                let kind = e.kind();
                if kind == FailureKind::Fatal {
                    error!(video_id, provider = self.api.name(), kind = %kind, "Error fetching live details: {}", e);
                } else {
                    warn!(video_id, provider = self.api.name(), kind = %kind, "Error fetching live details: {}", e);
                }
                return ViewerCycle::Failed(kind);
            }
        };

        let viewers = metadata.viewer_count();
        let live_chat_id = metadata.active_live_chat_id;
        self.state.set_live_chat_id(live_chat_id.clone());

        let sent_count = self.hub.publish(LiveEvent::ViewerCount(viewers));
        debug!(video_id, viewers, sent_count, "Viewer count published");

        ViewerCycle::Updated {
            viewers,
            live_chat_id,
        }
    }

    /// Poll on a fixed period with the first tick at `start`, until cancelled.
    ///
    /// Late ticks are delayed rather than bunched together.
    pub async fn run(self, start: Instant, period: Duration, cancel: CancellationToken) {
        let mut ticker = interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(video_id = self.state.video_id(), period_secs = period.as_secs(), "Viewer poller started");

        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    tokio::select! {
                        () = cancel.cancelled() => break,
                        _ = self.poll_once() => {}
                    }
                }
            }
        }

        info!("Viewer poller stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;
    use crate::test_helpers::{live_context, metadata, FakeLiveApi};

    fn poller(api: &FakeLiveApi, state: &Arc<LiveState>, hub: &EventHub) -> ViewerPoller {
        ViewerPoller::new(Arc::new(api.clone()), state.clone(), hub.clone())
    }

    #[tokio::test]
    async fn test_zero_concurrent_falls_back_and_sets_handle() {
        let api = FakeLiveApi::new();
        api.push_metadata(Ok(Some(metadata(Some(0), Some(452), Some("abc")))));
        let (state, hub) = live_context("vid");
        let mut sub = hub.subscribe();

        let cycle = poller(&api, &state, &hub).poll_once().await;

        assert_eq!(
            cycle,
            ViewerCycle::Updated {
                viewers: 452,
                live_chat_id: Some("abc".to_string())
            }
        );
        assert_eq!(state.live_chat_id().as_deref(), Some("abc"));
        assert_eq!(sub.recv().await, Some(LiveEvent::ViewerCount(452)));
        assert_eq!(api.metadata_calls(), vec!["vid".to_string()]);
    }

    #[tokio::test]
    async fn test_positive_concurrent_is_published() {
        let api = FakeLiveApi::new();
        api.push_metadata(Ok(Some(metadata(Some(31), Some(9000), None))));
        let (state, hub) = live_context("vid");
        let mut sub = hub.subscribe();

        poller(&api, &state, &hub).poll_once().await;

        assert_eq!(sub.recv().await, Some(LiveEvent::ViewerCount(31)));
    }

    #[tokio::test]
    async fn test_no_metrics_publishes_zero() {
        let api = FakeLiveApi::new();
        api.push_metadata(Ok(Some(metadata(None, None, None))));
        let (state, hub) = live_context("vid");
        let mut sub = hub.subscribe();

        poller(&api, &state, &hub).poll_once().await;

        assert_eq!(sub.recv().await, Some(LiveEvent::ViewerCount(0)));
    }

    #[tokio::test]
    async fn test_unchanged_count_is_published_again() {
        let api = FakeLiveApi::new();
        api.push_metadata(Ok(Some(metadata(Some(5), None, Some("abc")))));
        api.push_metadata(Ok(Some(metadata(Some(5), None, Some("abc")))));
        let (state, hub) = live_context("vid");
        let mut sub = hub.subscribe();
        let poller = poller(&api, &state, &hub);

        poller.poll_once().await;
        poller.poll_once().await;

        assert_eq!(sub.recv().await, Some(LiveEvent::ViewerCount(5)));
        assert_eq!(sub.recv().await, Some(LiveEvent::ViewerCount(5)));
    }

    #[tokio::test]
    async fn test_missing_item_changes_nothing() {
        let api = FakeLiveApi::new();
        api.push_metadata(Ok(None));
        let (state, hub) = live_context("vid");
        state.set_live_chat_id(Some("abc".to_string()));
        let mut sub = hub.subscribe();

        let cycle = poller(&api, &state, &hub).poll_once().await;

        assert_eq!(cycle, ViewerCycle::NotFound);
        assert_eq!(state.live_chat_id().as_deref(), Some("abc"));
        hub.publish(LiveEvent::ViewerCount(999));
        assert_eq!(sub.recv().await, Some(LiveEvent::ViewerCount(999)));
    }

    #[tokio::test]
    async fn test_failure_changes_nothing() {
        let api = FakeLiveApi::new();
        api.push_metadata(Err(ProviderError::Api {
            status: 403,
            reason: "quotaExceeded".to_string(),
            message: "quota".to_string(),
        }));
        let (state, hub) = live_context("vid");
        state.set_live_chat_id(Some("abc".to_string()));
        let mut sub = hub.subscribe();

        let cycle = poller(&api, &state, &hub).poll_once().await;

        assert_eq!(cycle, ViewerCycle::Failed(FailureKind::Fatal));
        assert_eq!(state.live_chat_id().as_deref(), Some("abc"));
        hub.publish(LiveEvent::ViewerCount(999));
        assert_eq!(sub.recv().await, Some(LiveEvent::ViewerCount(999)));
    }

    #[tokio::test]
    async fn test_absent_chat_id_clears_handle() {
        let api = FakeLiveApi::new();
        api.push_metadata(Ok(Some(metadata(Some(3), None, None))));
        let (state, hub) = live_context("vid");
        state.set_live_chat_id(Some("abc".to_string()));

        poller(&api, &state, &hub).poll_once().await;

        assert_eq!(state.live_chat_id(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_polls_on_fixed_period() {
        let api = FakeLiveApi::new();
        for n in 0..3 {
            api.push_metadata(Ok(Some(metadata(Some(n + 1), None, None))));
        }
        let (state, hub) = live_context("vid");
        let cancel = CancellationToken::new();
        let period = Duration::from_secs(60);

        let handle = tokio::spawn(poller(&api, &state, &hub).run(
            Instant::now() + period,
            period,
            cancel.clone(),
        ));

        tokio::time::sleep(Duration::from_secs(59)).await;
        assert_eq!(api.metadata_calls().len(), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(api.metadata_calls().len(), 1);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(api.metadata_calls().len(), 2);

        cancel.cancel();
        handle.await.unwrap();
    }
}
