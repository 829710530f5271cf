// NetCut backend HTTP client
//
// Wraps `reqwest::Client` with base-URL path construction, status
// checking, and schema decoding. One method per backend endpoint; no
// retries and no caching happen here.

use std::time::Duration;

use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{
    Ack, DeviceEntry, Health, PresetWindow, ScheduleUpdateRequest, SetModeRequest,
    StatusResponse, TargetRequest, ToggleBlockRequest,
};
use crate::transport::TransportConfig;

/// Raw HTTP client for the NetCut backend.
///
/// Every call targets the same base URL. Transport failures, non-2xx
/// statuses, and undecodable bodies all come back as [`Error`].
#[derive(Debug, Clone)]
pub struct NetcutClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    scan_timeout: Duration,
}

impl NetcutClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// The `base_url` is the backend root (e.g. `http://127.0.0.1:8000`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, transport))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// The transport's timeouts are applied to every request, so they hold
    /// even when `http` has no client-level timeout of its own.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        transport: &TransportConfig,
    ) -> Self {
        Self {
            http,
            base_url,
            timeout: transport.timeout,
            scan_timeout: transport.scan_timeout,
        }
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET /status`: the full blocking state snapshot.
    pub async fn fetch_status(&self) -> Result<StatusResponse, Error> {
        let url = self.url("status")?;
        self.get(url, self.timeout).await
    }

    /// `POST /toggle_block`: manual override, block or unblock the target.
    pub async fn set_blocking(&self, block: bool) -> Result<Ack, Error> {
        let url = self.url("toggle_block")?;
        self.post(url, &ToggleBlockRequest { block }).await
    }

    /// `POST /set_mode`: activate a preset, or `"Manual"`.
    pub async fn activate_mode(&self, mode: &str) -> Result<Ack, Error> {
        let url = self.url("set_mode")?;
        self.post(url, &SetModeRequest { mode }).await
    }

    /// `POST /update_schedule`: replace one preset's window.
    pub async fn update_schedule(
        &self,
        preset: &str,
        start: &str,
        end: &str,
        enabled: bool,
    ) -> Result<Ack, Error> {
        let url = self.url("update_schedule")?;
        let body = ScheduleUpdateRequest {
            preset,
            start,
            end,
            enabled,
        };
        self.post(url, &body).await
    }

    /// `GET /devices`: run an ARP scan on the backend's subnet.
    ///
    /// Uses the longer scan timeout.
    pub async fn scan_devices(&self) -> Result<Vec<DeviceEntry>, Error> {
        let url = self.url("devices")?;
        self.get(url, self.scan_timeout).await
    }

    /// `POST /target`: choose the device that blocking applies to.
    pub async fn select_target(&self, mac: &str, name: Option<&str>) -> Result<Ack, Error> {
        let url = self.url("target")?;
        self.post(url, &TargetRequest { mac, name }).await
    }

    /// `DELETE /target`: stop blocking and forget the target.
    pub async fn clear_target(&self) -> Result<Ack, Error> {
        let url = self.url("target")?;
        debug!("DELETE {}", url);
        let resp = self
            .http
            .delete(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.classify(e, self.timeout))?;
        let body = self.read_body(resp, self.timeout).await?;
        parse_ack(&body)
    }

    /// `GET /presets`: the preset table on its own.
    pub async fn list_presets(&self) -> Result<IndexMap<String, PresetWindow>, Error> {
        let url = self.url("presets")?;
        self.get(url, self.timeout).await
    }

    /// `GET /`: liveness probe.
    pub async fn health(&self) -> Result<Health, Error> {
        let url = self.url("")?;
        self.get(url, self.timeout).await
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build `{base}/{path}`, tolerating a trailing slash on the base.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}/{path}");
        Ok(Url::parse(&full)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: Url, timeout: Duration) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| self.classify(e, timeout))?;

        let body = self.read_body(resp, timeout).await?;
        decode(&body)
    }

    async fn post(&self, url: Url, body: &(impl Serialize + Sync)) -> Result<Ack, Error> {
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.classify(e, self.timeout))?;

        let body = self.read_body(resp, self.timeout).await?;
        parse_ack(&body)
    }

    /// Check the status and pull the body text.
    ///
    /// `timeout` is the bound the request was sent with.
    async fn read_body(
        &self,
        resp: reqwest::Response,
        timeout: Duration,
    ) -> Result<String, Error> {
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                message: status_message(&body),
            });
        }

        resp.text().await.map_err(|e| self.classify(e, timeout))
    }

    fn classify(&self, err: reqwest::Error, timeout: Duration) -> Error {
        if err.is_timeout() {
            trace!(url = %self.base_url, "request timed out");
            Error::Timeout {
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else {
            Error::Transport(err)
        }
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })
}

/// Ack bodies are opaque: empty is fine, any valid JSON is fine.
fn parse_ack(body: &str) -> Result<Ack, Error> {
    if body.trim().is_empty() {
        return Ok(Ack::default());
    }
    decode::<serde_json::Value>(body).map(Ack::from_value)
}

/// Extract FastAPI's `{"detail": "..."}` if present, else a body preview.
fn status_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct Detail {
        detail: serde_json::Value,
    }

    match serde_json::from_str::<Detail>(body) {
        Ok(Detail {
            detail: serde_json::Value::String(s),
        }) => s,
        Ok(Detail { detail }) => detail.to_string(),
        Err(_) => body.chars().take(200).collect(),
    }
}
