//! YouTube implementation of [`LiveApi`]

use std::time::Duration;

use async_trait::async_trait;
use livewatch_providers::youtube::{LiveChatMessageListResponse, Video, VideoPart, YoutubeClient};

use super::error::Result;
use super::traits::{ChatPage, LiveApi, StreamMetadata};

const METADATA_PARTS: &[VideoPart] = &[VideoPart::LiveStreamingDetails, VideoPart::Statistics];

/// Adapter from [`YoutubeClient`] to the poller-facing [`LiveApi`]
#[derive(Debug, Clone)]
pub struct YoutubeLiveApi {
    client: YoutubeClient,
}

impl YoutubeLiveApi {
    #[must_use]
    pub const fn new(client: YoutubeClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LiveApi for YoutubeLiveApi {
    fn name(&self) -> &'static str {
        "youtube"
    }

    async fn stream_metadata(&self, video_id: &str) -> Result<Option<StreamMetadata>> {
        let resp = self.client.list_videos(video_id, METADATA_PARTS).await?;
        Ok(resp.items.into_iter().next().map(metadata_from_video))
    }

    async fn chat_messages(&self, live_chat_id: &str, page_token: Option<&str>) -> Result<ChatPage> {
        let resp = self
            .client
            .list_live_chat_messages(live_chat_id, page_token)
            .await?;
        Ok(page_from_response(resp))
    }
}

fn metadata_from_video(video: Video) -> StreamMetadata {
    let details = video.live_streaming_details.unwrap_or_default();
    StreamMetadata {
        concurrent_viewers: details.concurrent_viewers,
        total_views: video.statistics.and_then(|s| s.view_count),
        active_live_chat_id: details.active_live_chat_id.filter(|id| !id.is_empty()),
    }
}

fn page_from_response(resp: LiveChatMessageListResponse) -> ChatPage {
    ChatPage {
        messages: resp.items,
        next_page_token: resp.next_page_token,
        polling_interval: resp.polling_interval_millis.map(Duration::from_millis),
    }
}
