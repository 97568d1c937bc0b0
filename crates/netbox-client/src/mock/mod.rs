//! Mock NetBoxClient for unit testing
//!
//! This module provides an in-memory implementation of every inventory
//! capability trait so reconcilers can be tested without a running NetBox
//! instance. Every call is recorded in order, writes mutate the in-memory
//! state, and any operation can be made to fail.
//!
//! The mock is organized into domain-specific modules:
//! - `virtualization.rs` - clusters
//! - `dcim.rs` - devices, interfaces, platforms, device roles
//! - `ipam.rs` - IP addresses
//! - `helpers.rs` - fixture builders

mod dcim;
mod helpers;
mod ipam;
mod virtualization;

pub use helpers::Helpers;

use crate::common::query::{AddressFilter, ClusterFilter, DeviceFilter, InterfaceFilter, NameFilter, ToQuery};
use crate::error::NetBoxError;
use crate::models::*;
use crate::netbox_trait::{
    AddressDirectory, ClusterLookup, DeviceDirectory, InterfaceDirectory, PlatformDirectory,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

/// Operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    ListClusters,
    ListDevices,
    GetDevice,
    UpdateDevice,
    ListInterfaces,
    UpdateInterface,
    DeleteInterface,
    ListAddresses,
    DeleteAddress,
    ListPlatforms,
    ListDeviceRoles,
}

/// A recorded call against the mock, with its rendered filter or arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    ListClusters(String),
    ListDevices(String),
    GetDevice(u64),
    UpdateDevice { id: u64, device: WritableDevice },
    ListInterfaces(String),
    UpdateInterface { id: u64, interface: WritableInterface },
    DeleteInterface(u64),
    ListAddresses(String),
    DeleteAddress(u64),
    ListPlatforms(String),
    ListDeviceRoles(String),
}

impl MockCall {
    /// True for calls that change inventory state
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Self::UpdateDevice { .. }
                | Self::UpdateInterface { .. }
                | Self::DeleteInterface(_)
                | Self::DeleteAddress(_)
        )
    }
}

/// Mock NetBoxClient for testing
#[derive(Debug, Clone)]
pub struct MockNetBoxClient {
    pub(crate) base_url: String,
    // In-memory storage for resources, keyed by ID so listings come back ordered
    pub(crate) clusters: Arc<Mutex<BTreeMap<u64, Cluster>>>,
    pub(crate) cluster_regions: Arc<Mutex<HashMap<u64, String>>>,
    pub(crate) devices: Arc<Mutex<BTreeMap<u64, Device>>>,
    pub(crate) interfaces: Arc<Mutex<BTreeMap<u64, Interface>>>,
    pub(crate) ip_addresses: Arc<Mutex<BTreeMap<u64, IPAddress>>>,
    pub(crate) platforms: Arc<Mutex<BTreeMap<u64, Platform>>>,
    pub(crate) device_roles: Arc<Mutex<BTreeMap<u64, DeviceRole>>>,
    pub(crate) calls: Arc<Mutex<Vec<MockCall>>>,
    pub(crate) failures: Arc<Mutex<HashMap<MockOperation, String>>>,
}

impl MockNetBoxClient {
    /// Create a new mock client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            clusters: Arc::new(Mutex::new(BTreeMap::new())),
            cluster_regions: Arc::new(Mutex::new(HashMap::new())),
            devices: Arc::new(Mutex::new(BTreeMap::new())),
            interfaces: Arc::new(Mutex::new(BTreeMap::new())),
            ip_addresses: Arc::new(Mutex::new(BTreeMap::new())),
            platforms: Arc::new(Mutex::new(BTreeMap::new())),
            device_roles: Arc::new(Mutex::new(BTreeMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Fixture builder sharing this mock's base URL
    pub fn helpers(&self) -> Helpers {
        Helpers::new(self.base_url.clone())
    }

    /// Add a cluster located in `region` (region slug) to the mock store
    pub fn add_cluster(&self, cluster: Cluster, region: &str) {
        self.cluster_regions.lock().unwrap().insert(cluster.id, region.to_string());
        self.clusters.lock().unwrap().insert(cluster.id, cluster);
    }

    /// Add a device to the mock store
    pub fn add_device(&self, device: Device) {
        self.devices.lock().unwrap().insert(device.id, device);
    }

    /// Add an interface to the mock store
    pub fn add_interface(&self, interface: Interface) {
        self.interfaces.lock().unwrap().insert(interface.id, interface);
    }

    /// Add an IP address to the mock store
    pub fn add_ip_address(&self, ip: IPAddress) {
        self.ip_addresses.lock().unwrap().insert(ip.id, ip);
    }

    /// Add a platform to the mock store
    pub fn add_platform(&self, platform: Platform) {
        self.platforms.lock().unwrap().insert(platform.id, platform);
    }

    /// Add a device role to the mock store
    pub fn add_device_role(&self, role: DeviceRole) {
        self.device_roles.lock().unwrap().insert(role.id, role);
    }

    /// Make `operation` fail with `message` until cleared
    pub fn fail(&self, operation: MockOperation, message: impl Into<String>) {
        self.failures.lock().unwrap().insert(operation, message.into());
    }

    /// Remove every injected failure
    pub fn clear_failures(&self) {
        self.failures.lock().unwrap().clear();
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Only the state-changing calls made so far, in order
    pub fn writes(&self) -> Vec<MockCall> {
        self.calls().into_iter().filter(MockCall::is_write).collect()
    }

    /// Forget recorded calls (state is kept)
    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn device(&self, id: u64) -> Option<Device> {
        self.devices.lock().unwrap().get(&id).cloned()
    }

    pub fn interface(&self, id: u64) -> Option<Interface> {
        self.interfaces.lock().unwrap().get(&id).cloned()
    }

    pub fn ip_address(&self, id: u64) -> Option<IPAddress> {
        self.ip_addresses.lock().unwrap().get(&id).cloned()
    }

    pub(crate) fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    /// Returns the injected failure for `operation`, if any
    pub(crate) fn check(&self, operation: MockOperation) -> Result<(), NetBoxError> {
        match self.failures.lock().unwrap().get(&operation) {
            Some(message) => Err(NetBoxError::Api(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl ClusterLookup for MockNetBoxClient {
    async fn list_clusters(&self, filter: &ClusterFilter) -> Result<Vec<Cluster>, NetBoxError> {
        self.record(MockCall::ListClusters(filter.to_query().to_string()));
        virtualization::list_clusters(self, filter)
    }
}

#[async_trait::async_trait]
impl DeviceDirectory for MockNetBoxClient {
    async fn list_devices(&self, filter: &DeviceFilter) -> Result<Vec<Device>, NetBoxError> {
        self.record(MockCall::ListDevices(filter.to_query().to_string()));
        dcim::list_devices(self, filter)
    }

    async fn get_device(&self, id: u64) -> Result<Device, NetBoxError> {
        self.record(MockCall::GetDevice(id));
        dcim::get_device(self, id)
    }

    async fn update_device(&self, id: u64, device: &WritableDevice) -> Result<Device, NetBoxError> {
        self.record(MockCall::UpdateDevice { id, device: device.clone() });
        dcim::update_device(self, id, device)
    }
}

#[async_trait::async_trait]
impl InterfaceDirectory for MockNetBoxClient {
    async fn list_interfaces(&self, filter: &InterfaceFilter) -> Result<Vec<Interface>, NetBoxError> {
        self.record(MockCall::ListInterfaces(filter.to_query().to_string()));
        dcim::list_interfaces(self, filter)
    }

    async fn update_interface(&self, id: u64, interface: &WritableInterface) -> Result<Interface, NetBoxError> {
        self.record(MockCall::UpdateInterface { id, interface: interface.clone() });
        dcim::update_interface(self, id, interface)
    }

    async fn delete_interface(&self, id: u64) -> Result<(), NetBoxError> {
        self.record(MockCall::DeleteInterface(id));
        dcim::delete_interface(self, id)
    }
}

#[async_trait::async_trait]
impl AddressDirectory for MockNetBoxClient {
    async fn list_addresses(&self, filter: &AddressFilter) -> Result<Vec<IPAddress>, NetBoxError> {
        self.record(MockCall::ListAddresses(filter.to_query().to_string()));
        ipam::list_addresses(self, filter)
    }

    async fn delete_address(&self, id: u64) -> Result<(), NetBoxError> {
        self.record(MockCall::DeleteAddress(id));
        ipam::delete_address(self, id)
    }
}

#[async_trait::async_trait]
impl PlatformDirectory for MockNetBoxClient {
    async fn list_platforms(&self, filter: &NameFilter) -> Result<Vec<Platform>, NetBoxError> {
        self.record(MockCall::ListPlatforms(filter.to_query().to_string()));
        dcim::list_platforms(self, filter)
    }

    async fn list_device_roles(&self, filter: &NameFilter) -> Result<Vec<DeviceRole>, NetBoxError> {
        self.record(MockCall::ListDeviceRoles(filter.to_query().to_string()));
        dcim::list_device_roles(self, filter)
    }
}
