// Transport configuration for building the reqwest::Client.
//
// The backend is a plain-HTTP service on the local network, so the only
// tuning knobs are the two request timeouts.

use std::time::Duration;

use crate::error::Error;

/// Default bound on every request except device scans.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Default bound on `GET /devices`. The backend's ARP sweep alone waits
/// three seconds before it starts answering.
pub const DEFAULT_SCAN_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub scan_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            scan_timeout: DEFAULT_SCAN_TIMEOUT,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    ///
    /// A zero timeout is rejected: every request must be bounded.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        if self.timeout.is_zero() || self.scan_timeout.is_zero() {
            return Err(Error::Client("request timeouts must be non-zero".into()));
        }

        reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.timeout)
            .user_agent(concat!("netcut/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Client(e.to_string()))
    }
}
