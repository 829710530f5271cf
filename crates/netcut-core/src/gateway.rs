// ── Backend gateway seam ──
//
// The store, coordinator, and catalog talk to the backend only through
// this trait. `NetcutClient` is the production implementation; tests drive
// the engine with scripted gateways that control completion order.

use std::future::Future;

use netcut_api::{Ack, NetcutClient};

use crate::error::CoreError;
use crate::model::{DeviceInfo, MacAddress, NetCutStatus};

/// Typed request/response boundary to the backend.
///
/// One operation per backend capability. Implementations must not retry
/// and must bound every call with a finite timeout.
pub trait Gateway: Send + Sync + 'static {
    fn fetch_status(&self) -> impl Future<Output = Result<NetCutStatus, CoreError>> + Send;

    fn set_blocking(&self, block: bool) -> impl Future<Output = Result<Ack, CoreError>> + Send;

    fn activate_mode(&self, mode: &str) -> impl Future<Output = Result<Ack, CoreError>> + Send;

    fn update_schedule(
        &self,
        preset: &str,
        start: &str,
        end: &str,
        enabled: bool,
    ) -> impl Future<Output = Result<Ack, CoreError>> + Send;

    fn scan_devices(&self) -> impl Future<Output = Result<Vec<DeviceInfo>, CoreError>> + Send;

    fn select_target(
        &self,
        mac: &MacAddress,
        name: Option<&str>,
    ) -> impl Future<Output = Result<Ack, CoreError>> + Send;

    fn clear_target(&self) -> impl Future<Output = Result<Ack, CoreError>> + Send;
}

impl Gateway for NetcutClient {
    async fn fetch_status(&self) -> Result<NetCutStatus, CoreError> {
        Ok(NetcutClient::fetch_status(self).await?.into())
    }

    async fn set_blocking(&self, block: bool) -> Result<Ack, CoreError> {
        Ok(NetcutClient::set_blocking(self, block).await?)
    }

    async fn activate_mode(&self, mode: &str) -> Result<Ack, CoreError> {
        Ok(NetcutClient::activate_mode(self, mode).await?)
    }

    async fn update_schedule(
        &self,
        preset: &str,
        start: &str,
        end: &str,
        enabled: bool,
    ) -> Result<Ack, CoreError> {
        Ok(NetcutClient::update_schedule(self, preset, start, end, enabled).await?)
    }

    async fn scan_devices(&self) -> Result<Vec<DeviceInfo>, CoreError> {
        let entries = NetcutClient::scan_devices(self).await?;
        Ok(entries.into_iter().map(DeviceInfo::from).collect())
    }

    async fn select_target(&self, mac: &MacAddress, name: Option<&str>) -> Result<Ack, CoreError> {
        Ok(NetcutClient::select_target(self, mac.as_str(), name).await?)
    }

    async fn clear_target(&self) -> Result<Ack, CoreError> {
        Ok(NetcutClient::clear_target(self).await?)
    }
}
