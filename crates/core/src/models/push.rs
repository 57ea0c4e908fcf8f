use serde::{Deserialize, Serialize};

/// An inbound push notification surfaced while the app is foregrounded.
///
/// Only `title` and `body` are interpreted; the rest of the payload is
/// opaque to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
}

impl PushMessage {
    /// Extract title/body from a raw push payload. Messaging platforms nest
    /// them under a `notification` object; a bare `{title, body}` object is
    /// accepted too. A payload missing either field yields `None` and is
    /// ignored by the caller.
    pub fn from_payload(payload: &serde_json::Value) -> Option<Self> {
        let source = payload.get("notification").unwrap_or(payload);
        let title = source.get("title")?.as_str()?;
        let body = source.get("body")?.as_str()?;
        Some(Self {
            title: title.to_string(),
            body: body.to_string(),
        })
    }
}
