//! Drift resolution for a single device
//!
//! Pure decision logic: given everything NetBox holds about one device,
//! compute the writes that bring it in line with policy. No I/O happens here;
//! the reconciler gathers the [`DeviceSnapshot`] and executes the actions.
//!
//! Actions come out in execution order: interface rename, device update,
//! then ephemeral cleanup (addresses before their interface).

use netbox_client::{Device, IPAddress, Interface, Platform};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Canonical out-of-band management interface name
pub const OOB_INTERFACE: &str = "remoteboard";
/// Legacy name of the OOB interface, renamed on sight
pub const LEGACY_OOB_INTERFACE: &str = "iDRAC";
/// Prefix of ephemeral hypervisor (VMkernel) interfaces
pub const EPHEMERAL_PREFIX: &str = "vmk";

/// What a compliant device looks like
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriftPolicy {
    pub expected_platform: String,
    pub oob_interface: String,
    pub legacy_oob_interface: String,
    pub ephemeral_prefix: String,
}

impl DriftPolicy {
    pub fn new(expected_platform: impl Into<String>) -> Self {
        Self {
            expected_platform: expected_platform.into(),
            oob_interface: OOB_INTERFACE.to_string(),
            legacy_oob_interface: LEGACY_OOB_INTERFACE.to_string(),
            ephemeral_prefix: EPHEMERAL_PREFIX.to_string(),
        }
    }

    pub fn is_ephemeral(&self, interface_name: &str) -> bool {
        interface_name.starts_with(&self.ephemeral_prefix)
    }

    /// Interfaces whose bound addresses the resolver needs
    pub fn reads_addresses(&self, interface_name: &str) -> bool {
        interface_name == self.oob_interface
            || interface_name == self.legacy_oob_interface
            || self.is_ephemeral(interface_name)
    }
}

/// Everything NetBox holds about one device that drift resolution depends on
#[derive(Debug, Clone)]
pub struct DeviceSnapshot {
    pub device: Device,
    /// Interfaces on the device, ascending ID
    pub interfaces: Vec<Interface>,
    /// Bound addresses keyed by interface ID (OOB and ephemeral interfaces only)
    pub addresses: HashMap<u64, Vec<IPAddress>>,
    /// Platforms matching the expected platform name
    pub platforms: Vec<Platform>,
}

impl DeviceSnapshot {
    fn addresses_on(&self, interface_id: u64) -> &[IPAddress] {
        self.addresses.get(&interface_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A corrective write against NetBox
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    RenameInterface { id: u64, name: String },
    /// Carries both fields; the unchanged one keeps its current value
    UpdateDevice { id: u64, platform: u64, oob_ip: u64 },
    DeleteAddress(u64),
    DeleteInterface(u64),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RenameInterface { id, name } => write!(f, "rename interface {} to {}", id, name),
            Self::UpdateDevice { id, platform, oob_ip } => {
                write!(f, "update device {} (platform {}, oob ip {})", id, platform, oob_ip)
            }
            Self::DeleteAddress(id) => write!(f, "delete ip address {}", id),
            Self::DeleteInterface(id) => write!(f, "delete interface {}", id),
        }
    }
}

/// Device data that cannot be resolved to a single answer
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DriftError {
    #[error("no remoteboard or iDRAC interface found")]
    MissingOobInterface,

    #[error("ambiguous OOB interface: found {legacy} iDRAC and {canonical} remoteboard interfaces")]
    AmbiguousOobInterface { legacy: usize, canonical: usize },

    #[error("expected exactly one ip address on interface {interface} ({interface_id}), found {count}")]
    OobAddress {
        interface: String,
        interface_id: u64,
        count: usize,
    },

    #[error("expected exactly one platform named {name}, found {count}")]
    Platform { name: String, count: usize },
}

/// Compute the actions that bring the snapshot's device in line with `policy`
pub fn resolve(snapshot: &DeviceSnapshot, policy: &DriftPolicy) -> Result<Vec<Action>, DriftError> {
    let mut actions = Vec::new();

    let legacy: Vec<&Interface> = snapshot
        .interfaces
        .iter()
        .filter(|i| i.name == policy.legacy_oob_interface)
        .collect();
    let canonical: Vec<&Interface> = snapshot
        .interfaces
        .iter()
        .filter(|i| i.name == policy.oob_interface)
        .collect();

    let oob = match (legacy.as_slice(), canonical.as_slice()) {
        ([], []) => return Err(DriftError::MissingOobInterface),
        ([legacy], []) => {
            actions.push(Action::RenameInterface {
                id: legacy.id,
                name: policy.oob_interface.clone(),
            });
            *legacy
        }
        ([], [canonical]) => *canonical,
        _ => {
            return Err(DriftError::AmbiguousOobInterface {
                legacy: legacy.len(),
                canonical: canonical.len(),
            });
        }
    };

    let oob_ip = match snapshot.addresses_on(oob.id) {
        [ip] => ip.id,
        bound => {
            return Err(DriftError::OobAddress {
                interface: oob.name.clone(),
                interface_id: oob.id,
                count: bound.len(),
            });
        }
    };

    let platform = match snapshot.platforms.as_slice() {
        [platform] => platform.id,
        found => {
            return Err(DriftError::Platform {
                name: policy.expected_platform.clone(),
                count: found.len(),
            });
        }
    };

    let device = &snapshot.device;
    if device.platform_id() != platform || device.oob_ip_id() != oob_ip {
        actions.push(Action::UpdateDevice {
            id: device.id,
            platform,
            oob_ip,
        });
    }

    for interface in snapshot.interfaces.iter().filter(|i| policy.is_ephemeral(&i.name)) {
        actions.extend(snapshot.addresses_on(interface.id).iter().map(|ip| Action::DeleteAddress(ip.id)));
        actions.push(Action::DeleteInterface(interface.id));
    }

    Ok(actions)
}
