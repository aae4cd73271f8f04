// livewatch provider clients
//
// Pure HTTP clients for the upstream live-streaming platform APIs.
// They know nothing about polling or broadcasting; livewatch-core adapts
// them behind its `LiveApi` trait.

// Shared error types
pub mod error;

// HTTP clients
pub mod youtube;

// Re-export client types for convenience
pub use error::YoutubeError;
pub use youtube::YoutubeClient;
