//! Upstream live API abstraction
//!
//! The pollers talk to the platform only through [`LiveApi`], so they can be
//! driven by a scripted fake in tests.

use std::time::Duration;

use async_trait::async_trait;

use super::error::Result;

/// Metadata of the monitored stream, as far as livewatch cares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamMetadata {
    /// Live concurrent-viewer metric; often missing or zero right after going live
    pub concurrent_viewers: Option<u64>,
    /// Lifetime view statistic
    pub total_views: Option<u64>,
    /// Chat session handle for the live broadcast, if it has one
    pub active_live_chat_id: Option<String>,
}

impl StreamMetadata {
    /// Viewer count shown to clients.
    ///
    /// A missing or zero concurrent metric falls back to total views, then to 0.
    #[must_use]
    pub fn viewer_count(&self) -> u64 {
        match self.concurrent_viewers {
            Some(viewers) if viewers > 0 => viewers,
            _ => self.total_views.unwrap_or(0),
        }
    }
}

/// One page of chat messages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatPage {
    /// Message resources in upstream order, untouched
    pub messages: Vec<serde_json::Value>,
    pub next_page_token: Option<String>,
    /// Delay the upstream asks clients to wait before the next request
    pub polling_interval: Option<Duration>,
}

/// Live streaming platform operations used by the pollers
#[async_trait]
pub trait LiveApi: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Fetch metadata for `video_id`; `Ok(None)` when the platform has no such item.
    async fn stream_metadata(&self, video_id: &str) -> Result<Option<StreamMetadata>>;

    /// Fetch the chat page following `page_token` (or the start when `None`).
    async fn chat_messages(&self, live_chat_id: &str, page_token: Option<&str>) -> Result<ChatPage>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(concurrent: Option<u64>, total: Option<u64>) -> StreamMetadata {
        StreamMetadata {
            concurrent_viewers: concurrent,
            total_views: total,
            active_live_chat_id: None,
        }
    }

    #[test]
    fn test_positive_concurrent_wins() {
        assert_eq!(meta(Some(17), Some(900)).viewer_count(), 17);
        assert_eq!(meta(Some(1), None).viewer_count(), 1);
    }

    #[test]
    fn test_zero_concurrent_falls_back_to_total() {
        assert_eq!(meta(Some(0), Some(452)).viewer_count(), 452);
    }

    #[test]
    fn test_missing_concurrent_falls_back_to_total() {
        assert_eq!(meta(None, Some(452)).viewer_count(), 452);
    }

    #[test]
    fn test_nothing_available_is_zero() {
        assert_eq!(meta(None, None).viewer_count(), 0);
        assert_eq!(meta(Some(0), None).viewer_count(), 0);
    }
}
