pub mod bootstrap;
pub mod config;
pub mod error;
pub mod hub;
pub mod logging;
pub mod poller;
pub mod provider;
pub mod state;

#[cfg(test)]
pub mod test_helpers;

pub use config::Config;
pub use error::{Error, Result};
pub use hub::{EventHub, EventSubscription, LiveEvent};
pub use poller::{ChatPoller, LivePollers, PollerOptions, StaleSessionPolicy, ViewerCycle, ViewerPoller};
pub use provider::{ChatPage, LiveApi, ProviderError, StreamMetadata};
pub use state::LiveState;
