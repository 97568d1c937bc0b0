//! DCIM API adapters (devices, interfaces, platforms, device roles)

use crate::common::query::{query_resources, DeviceFilter, InterfaceFilter, NameFilter, ToQuery};
use crate::common::HttpClient;
use crate::error::NetBoxError;
use crate::models::*;
use std::sync::Arc;
use tracing::debug;

/// Adapter for `/api/dcim/devices/`
#[derive(Debug, Clone)]
pub struct DeviceClient {
    http: Arc<HttpClient>,
}

impl DeviceClient {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Query devices matching the filter
    pub async fn list(&self, filter: &DeviceFilter) -> Result<Vec<Device>, NetBoxError> {
        let params = filter.to_query();
        debug!("Querying devices [{}]", params);
        query_resources(&self.http, "dcim/devices", &params).await
    }

    /// Get a device by ID
    pub async fn get(&self, id: u64) -> Result<Device, NetBoxError> {
        debug!("Fetching device {} from NetBox", id);
        self.http.get(&format!("/api/dcim/devices/{}/", id)).await
    }

    /// Patch the writable fields of a device
    pub async fn update(&self, id: u64, device: &WritableDevice) -> Result<Device, NetBoxError> {
        self.http
            .patch(&format!("/api/dcim/devices/{}/", id), device)
            .await
            .map_err(|e| NetBoxError::operation("update", "device", id, e))
    }
}

/// Adapter for `/api/dcim/interfaces/`
#[derive(Debug, Clone)]
pub struct InterfaceClient {
    http: Arc<HttpClient>,
}

impl InterfaceClient {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Query interfaces matching the filter
    pub async fn list(&self, filter: &InterfaceFilter) -> Result<Vec<Interface>, NetBoxError> {
        let params = filter.to_query();
        debug!("Querying interfaces [{}]", params);
        query_resources(&self.http, "dcim/interfaces", &params).await
    }

    /// Patch the writable fields of an interface
    pub async fn update(&self, id: u64, interface: &WritableInterface) -> Result<Interface, NetBoxError> {
        self.http
            .patch(&format!("/api/dcim/interfaces/{}/", id), interface)
            .await
            .map_err(|e| NetBoxError::operation("update", "interface", id, e))
    }

    /// Delete an interface by ID
    pub async fn delete(&self, id: u64) -> Result<(), NetBoxError> {
        self.http
            .delete(&format!("/api/dcim/interfaces/{}/", id))
            .await
            .map_err(|e| NetBoxError::operation("delete", "interface", id, e))
    }
}

/// Adapter for `/api/dcim/platforms/` and `/api/dcim/device-roles/`
#[derive(Debug, Clone)]
pub struct PlatformClient {
    http: Arc<HttpClient>,
}

impl PlatformClient {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list_platforms(&self, filter: &NameFilter) -> Result<Vec<Platform>, NetBoxError> {
        query_resources(&self.http, "dcim/platforms", &filter.to_query()).await
    }

    pub async fn list_device_roles(&self, filter: &NameFilter) -> Result<Vec<DeviceRole>, NetBoxError> {
        query_resources(&self.http, "dcim/device-roles", &filter.to_query()).await
    }
}
