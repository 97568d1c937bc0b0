//! NetBox API models
//!
//! These models cover the subset of the NetBox REST API serializers the
//! cluster sync controller reads and writes: clusters, devices, interfaces,
//! IP addresses, platforms and device roles.
//! See: netbox/netbox/dcim/api/serializers_/devices.py

use serde::{Deserialize, Serialize};

/// Choice field as rendered by NetBox (`{"value": "active", "label": "Active"}`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChoiceField<T> {
    pub value: T,
    pub label: String,
}

impl<T> ChoiceField<T> {
    pub fn new(value: T, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// Cluster model (from virtualization API)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Cluster {
    pub id: u64,
    pub url: String,
    pub display: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub cluster_type: Option<NestedClusterType>,
    #[serde(default)]
    pub site: Option<NestedSite>,
    #[serde(default)]
    pub device_count: Option<u64>,
}

/// Device model (from DCIM API)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Device {
    pub id: u64,
    pub url: String,
    pub display: String,
    /// NetBox allows unnamed devices
    #[serde(default)]
    pub name: Option<String>,
    pub status: ChoiceField<DeviceStatus>,
    #[serde(default, alias = "device_role")]
    pub role: Option<NestedDeviceRole>,
    #[serde(default)]
    pub platform: Option<NestedPlatform>,
    #[serde(default)]
    pub oob_ip: Option<NestedIPAddress>,
    #[serde(default)]
    pub site: Option<NestedSite>,
    #[serde(default)]
    pub cluster: Option<NestedCluster>,
}

impl Device {
    /// Device name, falling back to the display string for unnamed devices
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.display)
    }

    pub fn is_active(&self) -> bool {
        self.status.value == DeviceStatus::Active
    }

    /// Assigned platform ID, 0 when unset
    pub fn platform_id(&self) -> u64 {
        self.platform.as_ref().map_or(0, |p| p.id)
    }

    /// Assigned out-of-band IP ID, 0 when unset
    pub fn oob_ip_id(&self) -> u64 {
        self.oob_ip.as_ref().map_or(0, |ip| ip.id)
    }

    /// Site ID, 0 when unset
    pub fn site_id(&self) -> u64 {
        self.site.as_ref().map_or(0, |s| s.id)
    }
}

/// Device status choices
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceStatus {
    Offline,
    Active,
    Planned,
    Staged,
    Failed,
    Inventory,
    Decommissioning,
    /// Custom statuses configured in NetBox
    #[serde(other)]
    Other,
}

/// Interface model (from DCIM API)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Interface {
    pub id: u64,
    pub url: String,
    pub display: String,
    pub name: String,
    pub device: NestedDevice,
    /// Parent LAG interface, if this interface is a LAG member
    #[serde(default)]
    pub lag: Option<NestedInterface>,
    #[serde(default)]
    pub mgmt_only: bool,
    #[serde(default)]
    pub mac_address: Option<String>,
}

/// IP Address model (from IPAM API)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IPAddress {
    pub id: u64,
    pub url: String,
    pub display: String,
    pub address: String, // e.g., "10.0.0.10/24"
    #[serde(default)]
    pub assigned_object_type: Option<String>,
    #[serde(default)]
    pub assigned_object_id: Option<u64>,
    #[serde(default)]
    pub dns_name: String,
}

/// Platform model (from DCIM API)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Platform {
    pub id: u64,
    pub url: String,
    pub display: String,
    pub name: String,
    pub slug: String,
}

/// Device role model (from DCIM API)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DeviceRole {
    pub id: u64,
    pub url: String,
    pub display: String,
    pub name: String,
    pub slug: String,
}

/// Writable device fields the controller is allowed to change
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WritableDevice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oob_ip: Option<u64>,
}

/// Writable interface fields the controller is allowed to change
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WritableInterface {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// Nested serializers (simplified versions for references)

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NestedClusterType {
    pub id: u64,
    pub url: String,
    pub display: String,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NestedCluster {
    pub id: u64,
    pub url: String,
    pub display: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NestedSite {
    pub id: u64,
    pub url: String,
    pub display: String,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NestedDevice {
    pub id: u64,
    pub url: String,
    pub display: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NestedDeviceRole {
    pub id: u64,
    pub url: String,
    pub display: String,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NestedPlatform {
    pub id: u64,
    pub url: String,
    pub display: String,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NestedInterface {
    pub id: u64,
    pub url: String,
    pub display: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NestedIPAddress {
    pub id: u64,
    pub url: String,
    pub display: String,
    pub address: String,
}
