use thiserror::Error;

/// Unified error type for the entire crypto-alerts-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration ───────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Config(String),

    // ── Identity ────────────────────────────────────────────────────
    #[error("Identity is not available yet")]
    IdentityUnavailable,

    #[error("Identity store error: {0}")]
    Storage(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("Request failed with status {status}: {path}")]
    RequestFailed { status: u16, path: String },

    #[error("Network error: {0}")]
    NetworkUnreachable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Invalid {field}: {message}")]
    ValidationFailed { field: String, message: String },
}

impl CoreError {
    /// Shorthand for a pre-submission validation failure.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Sanitize error message: strip query parameters from URLs so
        // nothing embedded in a configured endpoint leaks into logs.
        // reqwest errors often contain full URLs.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::NetworkUnreachable(sanitized)
    }
}
