// Module: provider
// Upstream platform abstraction used by the pollers

pub mod error;
pub mod traits;
pub mod youtube;

pub use error::{FailureKind, ProviderError};
pub use traits::{ChatPage, LiveApi, StreamMetadata};
pub use youtube::YoutubeLiveApi;
