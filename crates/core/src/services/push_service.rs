use tokio::sync::broadcast;

use crate::models::push::PushMessage;

/// Capacity of the foreground fan-out channel. Push traffic is sparse;
/// a slow subscriber past this depth starts losing the oldest messages.
const CHANNEL_CAPACITY: usize = 16;

/// Fan-out for push messages received while the app is foregrounded.
///
/// The platform shell hands raw payloads to `deliver`; every subscriber
/// (typically the in-app alert presenter) receives the parsed title/body.
/// The push transport itself lives outside the core.
pub struct PushService {
    tx: broadcast::Sender<PushMessage>,
}

impl PushService {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PushMessage> {
        self.tx.subscribe()
    }

    /// Parse and publish one payload. Malformed payloads (missing title or
    /// body) are ignored; having no subscribers is not an error.
    pub fn deliver(&self, payload: &serde_json::Value) -> Option<PushMessage> {
        let message = PushMessage::from_payload(payload)?;
        let _ = self.tx.send(message.clone());
        Some(message)
    }
}

impl Default for PushService {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PushService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushService")
            .field("subscribers", &self.tx.receiver_count())
            .finish()
    }
}
