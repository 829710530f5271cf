// ── Runtime connection configuration ──
//
// These types describe *how* to reach the NetCut backend. They never touch
// disk: the CLI builds a `ControllerConfig` (usually via netcut-config) and
// hands it in. `validate()` is where a malformed base address fails fast.

use std::time::Duration;

use url::Url;

use netcut_api::TransportConfig;

use crate::error::CoreError;

/// Default period of the status poll loop.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Configuration for talking to a single backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Backend base URL (e.g., `http://192.168.1.5:8000`).
    pub url: Url,
    /// Bound on every request except device scans.
    pub timeout: Duration,
    /// Bound on `GET /devices`.
    pub scan_timeout: Duration,
    /// Period of the background status poll. Zero disables the loop.
    pub poll_interval: Duration,
}

impl ControllerConfig {
    /// Build a config for `url` with default timings.
    pub fn new(url: Url) -> Self {
        let transport = TransportConfig::default();
        Self {
            url,
            timeout: transport.timeout,
            scan_timeout: transport.scan_timeout,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Parse and validate a base URL string.
    pub fn from_url_str(raw: &str) -> Result<Self, CoreError> {
        let url = Url::parse(raw).map_err(|e| CoreError::Config {
            message: format!("invalid backend URL '{raw}': {e}"),
        })?;
        let cfg = Self::new(url);
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations that can only fail at poll time.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !matches!(self.url.scheme(), "http" | "https") {
            return Err(CoreError::Config {
                message: format!(
                    "backend URL must use http or https, got '{}'",
                    self.url.scheme()
                ),
            });
        }
        if self.url.host_str().is_none_or(str::is_empty) {
            return Err(CoreError::Config {
                message: format!("backend URL '{}' has no host", self.url),
            });
        }
        if self.url.query().is_some() || self.url.fragment().is_some() {
            return Err(CoreError::Config {
                message: format!("backend URL '{}' must not carry a query or fragment", self.url),
            });
        }
        if self.timeout.is_zero() || self.scan_timeout.is_zero() {
            return Err(CoreError::Config {
                message: "request timeouts must be non-zero".into(),
            });
        }
        Ok(())
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout,
            scan_timeout: self.scan_timeout,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_poll_every_two_seconds() {
        let cfg = ControllerConfig::from_url_str("http://127.0.0.1:8000").unwrap();
        assert_eq!(cfg.poll_interval, Duration::from_secs(2));
        assert_eq!(cfg.timeout, Duration::from_secs(3));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = ControllerConfig::from_url_str("ftp://10.0.0.1").unwrap_err();
        assert!(matches!(err, CoreError::Config { .. }));
    }

    #[test]
    fn rejects_unparseable_url() {
        assert!(ControllerConfig::from_url_str("192.168.1.5:8000:oops").is_err());
        assert!(ControllerConfig::from_url_str("not a url").is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let mut cfg = ControllerConfig::from_url_str("http://10.0.0.1:8000").unwrap();
        cfg.timeout = Duration::ZERO;
        assert!(cfg.validate().is_err());
    }
}
