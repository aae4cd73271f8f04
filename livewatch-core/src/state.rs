//! Shared live-stream state
//!
//! The viewer poller is the only writer of the chat session handle; the
//! chat poller reads it once at the start of every cycle. The pagination
//! cursor is not here: it belongs to the chat poller alone.

use tokio::sync::watch;
use tracing::info;

/// Process-wide state shared by both pollers and the HTTP layer
#[derive(Debug)]
pub struct LiveState {
    video_id: String,
    live_chat_id: watch::Sender<Option<String>>,
}

impl LiveState {
    #[must_use]
    pub fn new(video_id: impl Into<String>) -> Self {
        let (live_chat_id, _) = watch::channel(None);
        Self {
            video_id: video_id.into(),
            live_chat_id,
        }
    }

    /// The monitored stream
    #[must_use]
    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    /// Current chat session handle, if any
    #[must_use]
    pub fn live_chat_id(&self) -> Option<String> {
        self.live_chat_id.borrow().clone()
    }

    /// Replace the chat session handle. Returns `true` when the value changed.
    pub fn set_live_chat_id(&self, live_chat_id: Option<String>) -> bool {
        self.live_chat_id.send_if_modified(|current| {
            if *current == live_chat_id {
                return false;
            }
            info!(
                previous = ?current,
                current = ?live_chat_id,
                "Live chat session changed"
            );
            *current = live_chat_id;
            true
        })
    }

    /// Clear the handle only if it still equals `expected`.
    ///
    /// Used by the chat poller so it never wipes a handle the viewer poller
    /// installed in the meantime.
    pub fn clear_live_chat_id_if(&self, expected: &str) -> bool {
        self.live_chat_id.send_if_modified(|current| {
            if current.as_deref() != Some(expected) {
                return false;
            }
            info!(live_chat_id = expected, "Live chat session cleared");
            *current = None;
            true
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_without_session() {
        let state = LiveState::new("vid");
        assert_eq!(state.video_id(), "vid");
        assert_eq!(state.live_chat_id(), None);
    }

    #[test]
    fn test_set_reports_changes() {
        let state = LiveState::new("vid");
        assert!(state.set_live_chat_id(Some("abc".to_string())));
        assert!(!state.set_live_chat_id(Some("abc".to_string())));
        assert_eq!(state.live_chat_id().as_deref(), Some("abc"));
        assert!(state.set_live_chat_id(None));
        assert_eq!(state.live_chat_id(), None);
    }

    #[test]
    fn test_conditional_clear() {
        let state = LiveState::new("vid");
        state.set_live_chat_id(Some("new".to_string()));

        assert!(!state.clear_live_chat_id_if("old"));
        assert_eq!(state.live_chat_id().as_deref(), Some("new"));

        assert!(state.clear_live_chat_id_if("new"));
        assert_eq!(state.live_chat_id(), None);
    }
}
