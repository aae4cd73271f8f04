//! YouTube Data API client
//!
//! Pure HTTP client for the two endpoints livewatch polls:
//! `videos.list` (viewer statistics, live chat id) and
//! `liveChatMessages.list` (chat pages).
//!
//! # Example
//!
//! ```no_run
//! use livewatch_providers::youtube::{VideoPart, YoutubeClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = YoutubeClient::new("api-key")?;
//! let videos = client
//!     .list_videos("5H0CKe-FVD8", &[VideoPart::LiveStreamingDetails, VideoPart::Statistics])
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod client;
pub mod types;

pub use client::{YoutubeClient, DEFAULT_BASE_URL};
pub use types::*;
