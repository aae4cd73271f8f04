//! YouTube HTTP Client

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use super::types::{LiveChatMessageListResponse, VideoListResponse, VideoPart};
use crate::error::{check_response, json_with_limit, YoutubeError};

/// Public endpoint of the YouTube Data API.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";

const USER_AGENT: &str = concat!("livewatch/", env!("CARGO_PKG_VERSION"));

/// Parts requested for every chat page.
const CHAT_PARTS: &str = "snippet,authorDetails";

/// Shared HTTP client for all YouTube requests (connection pooling).
/// No overall request timeout: a caller that wants one builds its own client
/// through [`YoutubeClient::with_timeout`].
static SHARED_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    base_builder()
        .build()
        .expect("Failed to build YouTube shared HTTP client")
});

fn base_builder() -> reqwest::ClientBuilder {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(4)
        .redirect(reqwest::redirect::Policy::none())
}

/// YouTube Data API v3 client
#[derive(Clone)]
pub struct YoutubeClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl std::fmt::Debug for YoutubeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoutubeClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl YoutubeClient {
    /// Create a client for the public API (reuses shared connection pool)
    pub fn new(api_key: impl Into<String>) -> Result<Self, YoutubeError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom API root (proxies, test servers)
    pub fn with_base_url(api_key: impl Into<String>, base_url: &str) -> Result<Self, YoutubeError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(YoutubeError::InvalidConfig("API key is empty".to_string()));
        }

        Ok(Self {
            client: SHARED_CLIENT.clone(),
            base_url: parse_base_url(base_url)?,
            api_key,
        })
    }

    /// Replace the shared pool with a dedicated client enforcing `timeout` per request
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, YoutubeError> {
        self.client = base_builder()
            .timeout(timeout)
            .build()
            .map_err(|e| YoutubeError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;
        Ok(self)
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, YoutubeError> {
        self.base_url
            .join(path)
            .map_err(|e| YoutubeError::InvalidConfig(format!("invalid endpoint {path}: {e}")))
    }

    /// `videos.list` for a single video id
    pub async fn list_videos(
        &self,
        video_id: &str,
        parts: &[VideoPart],
    ) -> Result<VideoListResponse, YoutubeError> {
        let url = self.endpoint("youtube/v3/videos")?;
        let part = VideoPart::join(parts);

        tracing::debug!(video_id, part = %part, "Requesting video details");

        let req = self.client.get(url).query(&[
            ("part", part.as_str()),
            ("id", video_id),
            ("key", self.api_key.as_str()),
        ]);

        let resp = check_response(req.send().await?).await?;
        json_with_limit(resp).await
    }

    /// `liveChatMessages.list`, continuing from `page_token` when given
    pub async fn list_live_chat_messages(
        &self,
        live_chat_id: &str,
        page_token: Option<&str>,
    ) -> Result<LiveChatMessageListResponse, YoutubeError> {
        let url = self.endpoint("youtube/v3/liveChat/messages")?;

        tracing::debug!(live_chat_id, has_page_token = page_token.is_some(), "Requesting chat messages");

        let mut req = self.client.get(url).query(&[
            ("liveChatId", live_chat_id),
            ("part", CHAT_PARTS),
            ("key", self.api_key.as_str()),
        ]);
        if let Some(token) = page_token {
            req = req.query(&[("pageToken", token)]);
        }

        let resp = check_response(req.send().await?).await?;
        json_with_limit(resp).await
    }
}

/// Parse the API root, forcing a trailing slash so relative joins keep any path prefix.
fn parse_base_url(raw: &str) -> Result<Url, YoutubeError> {
    let mut url = Url::parse(raw)
        .map_err(|e| YoutubeError::InvalidConfig(format!("invalid base URL {raw}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(YoutubeError::InvalidConfig(format!(
            "unsupported base URL scheme: {}",
            url.scheme()
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
