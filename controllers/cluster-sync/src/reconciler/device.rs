//! Per-device reconciliation

use super::drift::{resolve, Action, DeviceSnapshot};
use super::Reconciler;
use crate::error::DeviceError;
use netbox_client::{
    AddressDirectory, AddressFilter, Device, DeviceDirectory, InterfaceDirectory, InterfaceFilter, NameFilter,
    NetBoxError, PlatformDirectory, WritableDevice, WritableInterface,
};
use std::collections::HashMap;
use tracing::{debug, info, warn};

impl Reconciler {
    /// Read everything drift resolution needs for `device`
    pub(crate) async fn snapshot_device(&self, device: &Device) -> Result<DeviceSnapshot, NetBoxError> {
        let interfaces = self
            .inventory
            .list_interfaces(&InterfaceFilter::by_device(device.id))
            .await?;

        let mut addresses = HashMap::new();
        for interface in interfaces.iter().filter(|i| self.policy.reads_addresses(&i.name)) {
            let bound = self
                .inventory
                .list_addresses(&AddressFilter::by_interface(interface.id))
                .await?;
            addresses.insert(interface.id, bound);
        }

        let platforms = self
            .inventory
            .list_platforms(&NameFilter::new(self.policy.expected_platform.clone()))
            .await?;

        Ok(DeviceSnapshot {
            device: device.clone(),
            interfaces,
            addresses,
            platforms,
        })
    }

    /// Resolve and execute the corrective actions for one active device.
    ///
    /// Returns the number of actions taken. Stops at the first failed write.
    pub(crate) async fn reconcile_device(&self, device: &Device) -> Result<usize, DeviceError> {
        let snapshot = self.snapshot_device(device).await?;
        let actions = resolve(&snapshot, &self.policy)?;

        if actions.is_empty() {
            debug!("Device {} ({}) matches policy", device.label(), device.id);
            return Ok(0);
        }

        for action in &actions {
            if self.dry_run {
                warn!("Dry run: would {} for device {} ({})", action, device.label(), device.id);
                continue;
            }
            self.apply(action).await?;
            info!("Applied {} for device {} ({})", action, device.label(), device.id);
        }

        Ok(actions.len())
    }

    async fn apply(&self, action: &Action) -> Result<(), NetBoxError> {
        match action {
            Action::RenameInterface { id, name } => {
                let patch = WritableInterface {
                    name: Some(name.clone()),
                };
                self.inventory.update_interface(*id, &patch).await?;
            }
            Action::UpdateDevice { id, platform, oob_ip } => {
                let patch = WritableDevice {
                    platform: Some(*platform),
                    oob_ip: Some(*oob_ip),
                };
                self.inventory.update_device(*id, &patch).await?;
            }
            Action::DeleteAddress(id) => self.inventory.delete_address(*id).await?,
            Action::DeleteInterface(id) => self.inventory.delete_interface(*id).await?,
        }
        Ok(())
    }
}
