//! Helper functions for creating NetBox model fixtures

use crate::models::*;

/// Builds NetBox records and nested references with consistent URLs
#[derive(Debug, Clone)]
pub struct Helpers {
    base_url: String,
}

impl Helpers {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }

    fn url(&self, endpoint: &str, id: u64) -> String {
        format!("{}/api/{}/{}/", self.base_url, endpoint, id)
    }

    fn slug(name: &str) -> String {
        name.to_lowercase().replace(' ', "-")
    }

    /// Cluster of the given type
    pub fn cluster(&self, id: u64, name: &str, cluster_type: &str) -> Cluster {
        Cluster {
            id,
            url: self.url("virtualization/clusters", id),
            display: name.to_string(),
            name: name.to_string(),
            cluster_type: Some(NestedClusterType {
                id,
                url: self.url("virtualization/cluster-types", id),
                display: cluster_type.to_string(),
                name: cluster_type.to_string(),
                slug: Self::slug(cluster_type),
            }),
            site: None,
            device_count: None,
        }
    }

    /// Device in a cluster; platform / OOB IP set only when the ID is non-zero
    pub fn device(
        &self,
        id: u64,
        name: &str,
        status: DeviceStatus,
        cluster_id: u64,
        platform_id: u64,
        oob_ip_id: u64,
    ) -> Device {
        let label = serde_json::to_value(status)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        Device {
            id,
            url: self.url("dcim/devices", id),
            display: name.to_string(),
            name: Some(name.to_string()),
            status: ChoiceField::new(status, label),
            role: None,
            platform: (platform_id != 0).then(|| self.nested_platform(platform_id, None)),
            oob_ip: (oob_ip_id != 0).then(|| self.nested_ip_address(oob_ip_id, None)),
            site: None,
            cluster: (cluster_id != 0).then(|| NestedCluster {
                id: cluster_id,
                url: self.url("virtualization/clusters", cluster_id),
                display: format!("Cluster {}", cluster_id),
                name: format!("Cluster {}", cluster_id),
            }),
        }
    }

    /// Interface on a device
    pub fn interface(&self, id: u64, name: &str, device_id: u64) -> Interface {
        Interface {
            id,
            url: self.url("dcim/interfaces", id),
            display: name.to_string(),
            name: name.to_string(),
            device: NestedDevice {
                id: device_id,
                url: self.url("dcim/devices", device_id),
                display: format!("Device {}", device_id),
                name: None,
            },
            lag: None,
            mgmt_only: false,
            mac_address: None,
        }
    }

    /// IP address bound to an interface (unbound when `interface_id` is 0)
    pub fn ip_address(&self, id: u64, address: &str, interface_id: u64) -> IPAddress {
        IPAddress {
            id,
            url: self.url("ipam/ip-addresses", id),
            display: address.to_string(),
            address: address.to_string(),
            assigned_object_type: (interface_id != 0).then(|| "dcim.interface".to_string()),
            assigned_object_id: (interface_id != 0).then_some(interface_id),
            dns_name: String::new(),
        }
    }

    pub fn platform(&self, id: u64, name: &str) -> Platform {
        Platform {
            id,
            url: self.url("dcim/platforms", id),
            display: name.to_string(),
            name: name.to_string(),
            slug: Self::slug(name),
        }
    }

    pub fn device_role(&self, id: u64, name: &str) -> DeviceRole {
        DeviceRole {
            id,
            url: self.url("dcim/device-roles", id),
            display: name.to_string(),
            name: name.to_string(),
            slug: Self::slug(name),
        }
    }

    /// Helper to create NestedPlatform
    pub fn nested_platform(&self, id: u64, name: Option<String>) -> NestedPlatform {
        let name_str = name.unwrap_or_else(|| format!("Platform {}", id));
        NestedPlatform {
            id,
            url: self.url("dcim/platforms", id),
            display: name_str.clone(),
            slug: Self::slug(&name_str),
            name: name_str,
        }
    }

    /// Helper to create NestedIPAddress
    pub fn nested_ip_address(&self, id: u64, address: Option<String>) -> NestedIPAddress {
        let address = address.unwrap_or_else(|| format!("192.0.2.{}/24", id % 255));
        NestedIPAddress {
            id,
            url: self.url("ipam/ip-addresses", id),
            display: address.clone(),
            address,
        }
    }

    /// Helper to create NestedDeviceRole
    pub fn nested_device_role(&self, id: u64, name: &str) -> NestedDeviceRole {
        NestedDeviceRole {
            id,
            url: self.url("dcim/device-roles", id),
            display: name.to_string(),
            name: name.to_string(),
            slug: Self::slug(name),
        }
    }
}
