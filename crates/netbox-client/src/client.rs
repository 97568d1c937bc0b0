//! NetBox API client
//!
//! Bundles one adapter per NetBox sub-resource behind a shared authenticated
//! HTTP client, and implements every inventory capability trait by
//! delegating to the matching adapter.

use crate::common::query::{AddressFilter, ClusterFilter, DeviceFilter, InterfaceFilter, NameFilter};
use crate::common::HttpClient;
use crate::dcim::{DeviceClient, InterfaceClient, PlatformClient};
use crate::error::NetBoxError;
use crate::ipam::AddressClient;
use crate::models::*;
use crate::netbox_trait::{
    AddressDirectory, ClusterLookup, DeviceDirectory, InterfaceDirectory, PlatformDirectory,
};
use crate::virtualization::ClusterClient;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// NetBox API client
#[derive(Debug, Clone)]
pub struct NetBoxClient {
    http: Arc<HttpClient>,
    clusters: ClusterClient,
    devices: DeviceClient,
    interfaces: InterfaceClient,
    addresses: AddressClient,
    platforms: PlatformClient,
}

impl NetBoxClient {
    /// Create a new NetBox client
    ///
    /// # Arguments
    /// * `base_url` - NetBox base URL (e.g., "http://netbox:80")
    /// * `token` - API token for authentication
    pub fn new(base_url: String, token: String) -> Result<Self, NetBoxError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(NetBoxError::Http)?;

        let http = Arc::new(HttpClient::new(client, base_url, token));
        Ok(Self {
            clusters: ClusterClient::new(Arc::clone(&http)),
            devices: DeviceClient::new(Arc::clone(&http)),
            interfaces: InterfaceClient::new(Arc::clone(&http)),
            addresses: AddressClient::new(Arc::clone(&http)),
            platforms: PlatformClient::new(Arc::clone(&http)),
            http,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Validate the API token by making a simple authenticated request.
    ///
    /// # Returns
    /// * `Ok(())` - Token is valid and NetBox is reachable
    /// * `Err(NetBoxError)` - Token is invalid or NetBox is unreachable
    pub async fn validate_token(&self) -> Result<(), NetBoxError> {
        debug!("Validating NetBox token and connectivity");
        let _status: serde_json::Value = self.http.get("/api/status/").await?;
        debug!("Token validated successfully");
        Ok(())
    }

    pub fn clusters(&self) -> &ClusterClient {
        &self.clusters
    }

    pub fn devices(&self) -> &DeviceClient {
        &self.devices
    }

    pub fn interfaces(&self) -> &InterfaceClient {
        &self.interfaces
    }

    pub fn addresses(&self) -> &AddressClient {
        &self.addresses
    }

    pub fn platforms(&self) -> &PlatformClient {
        &self.platforms
    }
}

#[async_trait::async_trait]
impl ClusterLookup for NetBoxClient {
    async fn list_clusters(&self, filter: &ClusterFilter) -> Result<Vec<Cluster>, NetBoxError> {
        self.clusters.list(filter).await
    }
}

#[async_trait::async_trait]
impl DeviceDirectory for NetBoxClient {
    async fn list_devices(&self, filter: &DeviceFilter) -> Result<Vec<Device>, NetBoxError> {
        self.devices.list(filter).await
    }

    async fn get_device(&self, id: u64) -> Result<Device, NetBoxError> {
        self.devices.get(id).await
    }

    async fn update_device(&self, id: u64, device: &WritableDevice) -> Result<Device, NetBoxError> {
        self.devices.update(id, device).await
    }
}

#[async_trait::async_trait]
impl InterfaceDirectory for NetBoxClient {
    async fn list_interfaces(&self, filter: &InterfaceFilter) -> Result<Vec<Interface>, NetBoxError> {
        self.interfaces.list(filter).await
    }

    async fn update_interface(&self, id: u64, interface: &WritableInterface) -> Result<Interface, NetBoxError> {
        self.interfaces.update(id, interface).await
    }

    async fn delete_interface(&self, id: u64) -> Result<(), NetBoxError> {
        self.interfaces.delete(id).await
    }
}

#[async_trait::async_trait]
impl AddressDirectory for NetBoxClient {
    async fn list_addresses(&self, filter: &AddressFilter) -> Result<Vec<IPAddress>, NetBoxError> {
        self.addresses.list(filter).await
    }

    async fn delete_address(&self, id: u64) -> Result<(), NetBoxError> {
        self.addresses.delete(id).await
    }
}

#[async_trait::async_trait]
impl PlatformDirectory for NetBoxClient {
    async fn list_platforms(&self, filter: &NameFilter) -> Result<Vec<Platform>, NetBoxError> {
        self.platforms.list_platforms(filter).await
    }

    async fn list_device_roles(&self, filter: &NameFilter) -> Result<Vec<DeviceRole>, NetBoxError> {
        self.platforms.list_device_roles(filter).await
    }
}
