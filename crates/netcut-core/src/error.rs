// ── Core error types ──
//
// User-facing errors from netcut-core. The reconciliation engine never
// distinguishes transport, status, and decode failures: they all become
// `Disconnected` or `Api`. The `From<netcut_api::Error>` impl does the
// collapsing.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Backend unreachable at {url}: {reason}")]
    Disconnected { url: String, reason: String },

    #[error("Backend request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    // ── Backend errors ───────────────────────────────────────────────
    #[error("Backend rejected the request: {message}")]
    Api {
        message: String,
        /// HTTP status code (if the backend answered).
        status: Option<u16>,
    },

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` if the backend could not be reached at all.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Disconnected { .. } | Self::Timeout { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<netcut_api::Error> for CoreError {
    fn from(err: netcut_api::Error) -> Self {
        match err {
            netcut_api::Error::Transport(ref e) => CoreError::Disconnected {
                url: e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string),
                reason: e.to_string(),
            },
            netcut_api::Error::Timeout { timeout_ms } => CoreError::Timeout { timeout_ms },
            netcut_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            netcut_api::Error::Client(message) => CoreError::Config { message },
            netcut_api::Error::Status { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            netcut_api::Error::Deserialization { message, body: _ } => CoreError::Api {
                message: format!("malformed response: {message}"),
                status: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_keep_their_code() {
        let err = CoreError::from(netcut_api::Error::Status {
            status: 400,
            message: "Unknown preset: Brunch".into(),
        });
        assert!(matches!(
            err,
            CoreError::Api {
                status: Some(400),
                ..
            }
        ));
        assert!(!err.is_connectivity());
    }

    #[test]
    fn timeouts_are_connectivity_failures() {
        let err = CoreError::from(netcut_api::Error::Timeout { timeout_ms: 3000 });
        assert!(err.is_connectivity());
        assert_eq!(err.to_string(), "Backend request timed out after 3000ms");
    }
}
