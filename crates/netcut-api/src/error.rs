use thiserror::Error;

/// Top-level error type for the `netcut-api` crate.
///
/// Keeps the three failure families of the backend contract apart
/// (transport, HTTP status, payload decoding) so that logs and CLI
/// diagnostics can say what went wrong. `netcut-core` collapses them
/// into a single "disconnected" signal.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, reset, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Request exceeded its configured timeout.
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    // ── Protocol ────────────────────────────────────────────────────
    /// Backend answered with a non-2xx status.
    #[error("Backend returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error that the next poll
    /// cycle may not hit again.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// HTTP status code, if the backend answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Backend-provided detail message (FastAPI `{"detail": "..."}`), if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }
}
