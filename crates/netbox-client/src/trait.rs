//! Inventory capability traits
//!
//! Each trait covers one NetBox sub-resource. The concrete `NetBoxClient`
//! implements all of them by delegating to its per-resource adapters, and
//! tests substitute `MockNetBoxClient`.
//!
//! Listings return possibly-empty sequences. Identity lookups (`find_*`,
//! `get_*`) require exactly one match and fail with
//! [`NetBoxError::NotFoundCount`] otherwise; they are provided methods built
//! on the listings so every implementation shares the same contract.

use crate::common::query::{
    exactly_one, AddressFilter, ClusterFilter, DeviceFilter, InterfaceFilter, NameFilter, ToQuery,
};
use crate::error::NetBoxError;
use crate::models::*;

/// Cluster lookup (virtualization clusters)
#[async_trait::async_trait]
pub trait ClusterLookup: Send + Sync {
    async fn list_clusters(&self, filter: &ClusterFilter) -> Result<Vec<Cluster>, NetBoxError>;

    /// Resolve the single cluster matching `filter`
    async fn find_cluster(&self, filter: &ClusterFilter) -> Result<Cluster, NetBoxError> {
        let clusters = self.list_clusters(filter).await?;
        exactly_one("cluster", &filter.to_query(), clusters)
    }
}

/// Device directory
#[async_trait::async_trait]
pub trait DeviceDirectory: Send + Sync {
    async fn list_devices(&self, filter: &DeviceFilter) -> Result<Vec<Device>, NetBoxError>;
    async fn get_device(&self, id: u64) -> Result<Device, NetBoxError>;
    async fn update_device(&self, id: u64, device: &WritableDevice) -> Result<Device, NetBoxError>;
}

/// Interface directory
#[async_trait::async_trait]
pub trait InterfaceDirectory: Send + Sync {
    async fn list_interfaces(&self, filter: &InterfaceFilter) -> Result<Vec<Interface>, NetBoxError>;
    async fn update_interface(&self, id: u64, interface: &WritableInterface) -> Result<Interface, NetBoxError>;
    async fn delete_interface(&self, id: u64) -> Result<(), NetBoxError>;

    /// Resolve the single interface named `name` on device `device_id`
    async fn find_interface(&self, device_id: u64, name: &str) -> Result<Interface, NetBoxError> {
        let filter = InterfaceFilter {
            device_id,
            name: name.to_string(),
            ..Default::default()
        };
        let interfaces = self.list_interfaces(&filter).await?;
        exactly_one("interface", &filter.to_query(), interfaces)
    }
}

/// IP address directory
#[async_trait::async_trait]
pub trait AddressDirectory: Send + Sync {
    async fn list_addresses(&self, filter: &AddressFilter) -> Result<Vec<IPAddress>, NetBoxError>;
    async fn delete_address(&self, id: u64) -> Result<(), NetBoxError>;
}

/// Platform and device role directory
#[async_trait::async_trait]
pub trait PlatformDirectory: Send + Sync {
    async fn list_platforms(&self, filter: &NameFilter) -> Result<Vec<Platform>, NetBoxError>;
    async fn list_device_roles(&self, filter: &NameFilter) -> Result<Vec<DeviceRole>, NetBoxError>;

    /// Resolve the single platform named `name`
    async fn find_platform(&self, name: &str) -> Result<Platform, NetBoxError> {
        let filter = NameFilter::new(name);
        let platforms = self.list_platforms(&filter).await?;
        exactly_one("platform", &filter.to_query(), platforms)
    }

    /// Resolve the single device role named `name`
    async fn find_device_role(&self, name: &str) -> Result<DeviceRole, NetBoxError> {
        let filter = NameFilter::new(name);
        let roles = self.list_device_roles(&filter).await?;
        exactly_one("device role", &filter.to_query(), roles)
    }
}

/// Every capability the reconciler needs, as one object-safe bound
pub trait Inventory:
    ClusterLookup + DeviceDirectory + InterfaceDirectory + AddressDirectory + PlatformDirectory
{
}

impl<T> Inventory for T where
    T: ClusterLookup + DeviceDirectory + InterfaceDirectory + AddressDirectory + PlatformDirectory
{
}
