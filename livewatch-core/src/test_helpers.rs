//! Test helpers and fixtures for livewatch-core tests
//!
//! `FakeLiveApi` replays scripted upstream results and records every call,
//! so poller tests can assert exactly what was requested.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::hub::EventHub;
use crate::provider::error::Result;
use crate::provider::{ChatPage, LiveApi, ProviderError, StreamMetadata};
use crate::state::LiveState;

/// A chat call as seen by the fake: `(live_chat_id, page_token)`
pub type ChatCall = (String, Option<String>);

#[derive(Default)]
struct Script {
    metadata: VecDeque<Result<Option<StreamMetadata>>>,
    chat: VecDeque<Result<ChatPage>>,
    metadata_calls: Vec<String>,
    chat_calls: Vec<ChatCall>,
}

/// Scripted [`LiveApi`]; an exhausted script answers with a network error
#[derive(Clone, Default)]
pub struct FakeLiveApi {
    script: Arc<Mutex<Script>>,
}

impl FakeLiveApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_metadata(&self, result: Result<Option<StreamMetadata>>) -> &Self {
        self.script.lock().unwrap().metadata.push_back(result);
        self
    }

    pub fn push_chat(&self, result: Result<ChatPage>) -> &Self {
        self.script.lock().unwrap().chat.push_back(result);
        self
    }

    pub fn metadata_calls(&self) -> Vec<String> {
        self.script.lock().unwrap().metadata_calls.clone()
    }

    pub fn chat_calls(&self) -> Vec<ChatCall> {
        self.script.lock().unwrap().chat_calls.clone()
    }
}

#[async_trait]
impl LiveApi for FakeLiveApi {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn stream_metadata(&self, video_id: &str) -> Result<Option<StreamMetadata>> {
        let mut script = self.script.lock().unwrap();
        script.metadata_calls.push(video_id.to_string());
        script
            .metadata
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Network("script exhausted".to_string())))
    }

    async fn chat_messages(&self, live_chat_id: &str, page_token: Option<&str>) -> Result<ChatPage> {
        let mut script = self.script.lock().unwrap();
        script
            .chat_calls
            .push((live_chat_id.to_string(), page_token.map(str::to_string)));
        script
            .chat
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Network("script exhausted".to_string())))
    }
}

/// Metadata fixture
pub fn metadata(concurrent: Option<u64>, total: Option<u64>, chat: Option<&str>) -> StreamMetadata {
    StreamMetadata {
        concurrent_viewers: concurrent,
        total_views: total,
        active_live_chat_id: chat.map(str::to_string),
    }
}

/// Chat message fixture shaped like an upstream `liveChatMessage`
pub fn message(id: &str, text: &str) -> serde_json::Value {
    json!({
        "id": id,
        "snippet": { "displayMessage": text },
        "authorDetails": { "displayName": "viewer" }
    })
}

/// Chat page fixture
pub fn page(messages: Vec<serde_json::Value>, next: Option<&str>, interval_ms: Option<u64>) -> ChatPage {
    ChatPage {
        messages,
        next_page_token: next.map(str::to_string),
        polling_interval: interval_ms.map(Duration::from_millis),
    }
}

/// Fresh state and hub for `video_id`
pub fn live_context(video_id: &str) -> (Arc<LiveState>, EventHub) {
    (Arc::new(LiveState::new(video_id)), EventHub::new(16))
}
