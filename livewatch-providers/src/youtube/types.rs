//! YouTube Data API v3 data structures
//!
//! Only the fields livewatch reads are modelled. Chat messages stay raw JSON
//! so they can be relayed to clients exactly as received.

use serde::{Deserialize, Deserializer};

/// `part` values accepted by `videos.list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoPart {
    LiveStreamingDetails,
    Statistics,
}

impl VideoPart {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LiveStreamingDetails => "liveStreamingDetails",
            Self::Statistics => "statistics",
        }
    }

    /// Join parts into the comma separated form the API expects.
    #[must_use]
    pub fn join(parts: &[Self]) -> String {
        parts.iter().map(Self::as_str).collect::<Vec<_>>().join(",")
    }
}

/// Response of `GET /youtube/v3/videos`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<Video>,
}

/// A single video resource
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[serde(default)]
    pub id: String,
    pub live_streaming_details: Option<LiveStreamingDetails>,
    pub statistics: Option<VideoStatistics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStreamingDetails {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub concurrent_viewers: Option<u64>,
    pub active_live_chat_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub view_count: Option<u64>,
}

/// Response of `GET /youtube/v3/liveChat/messages`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveChatMessageListResponse {
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
    pub next_page_token: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub polling_interval_millis: Option<u64>,
}

/// Accept a JSON number, a numeric string, `null` or an empty string.
///
/// The API encodes 64-bit counters as strings.
fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrString {
        Num(u64),
        Str(String),
    }

    match Option::<NumOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumOrString::Num(n)) => Ok(Some(n)),
        Some(NumOrString::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(NumOrString::Str(s)) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
