//! Service construction

use std::sync::Arc;
use std::time::Duration;

use livewatch_providers::YoutubeClient;
use tracing::info;

use crate::error::Result;
use crate::hub::EventHub;
use crate::poller::{LivePollers, PollerOptions};
use crate::provider::{LiveApi, ProviderError, YoutubeLiveApi};
use crate::state::LiveState;
use crate::Config;

/// Everything the server needs, wired together
#[derive(Clone)]
pub struct Services {
    pub api: Arc<dyn LiveApi>,
    pub state: Arc<LiveState>,
    pub hub: EventHub,
    pub poller_options: PollerOptions,
}

impl Services {
    /// Pollers bound to this service set; call `start` to run them
    #[must_use]
    pub fn pollers(&self) -> LivePollers {
        LivePollers::new(
            self.api.clone(),
            self.state.clone(),
            self.hub.clone(),
            self.poller_options,
        )
    }
}

/// Build the upstream client, shared state and event hub from `config`
pub fn init_services(config: &Config) -> Result<Services> {
    let mut client = YoutubeClient::with_base_url(&config.youtube.api_key, &config.youtube.base_url)
        .map_err(ProviderError::from)?;
    if let Some(secs) = config.youtube.request_timeout_seconds {
        client = client
            .with_timeout(Duration::from_secs(secs))
            .map_err(ProviderError::from)?;
    }

    let api: Arc<dyn LiveApi> = Arc::new(YoutubeLiveApi::new(client));
    let state = Arc::new(LiveState::new(config.youtube.video_id.clone()));
    let hub = EventHub::new(config.hub.capacity);
    let poller_options = PollerOptions::from(&config.polling);

    info!(
        video_id = %config.youtube.video_id,
        base_url = %config.youtube.base_url,
        "Services initialized"
    );

    Ok(Services {
        api,
        state,
        hub,
        poller_options,
    })
}
