//! Reconciliation logic for ClusterSync resources.
//!
//! One pass walks every cluster descriptor in order:
//! cluster lookup → device listing → per-device snapshot → drift resolution
//! → corrective writes. The first failure stops the pass; writes already
//! made stay in place.
//!
//! - `drift`: pure drift resolution for one device
//! - `device`: snapshot gathering and action execution for one device
//! - `status`: mapping a pass result onto the ClusterSync status

pub mod device;
pub mod drift;
pub mod status;

#[cfg(test)]
mod reconcile_test;

use crate::config::Config;
use crate::error::ReconcileError;
use crds::ClusterDescriptor;
use drift::DriftPolicy;
use netbox_client::{ClusterFilter, ClusterLookup, DeviceDirectory, DeviceFilter, Inventory, PlatformDirectory};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Counters for one successful pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    pub clusters: usize,
    pub devices: usize,
    pub skipped: usize,
    pub actions: usize,
    pub dry_run: bool,
}

impl PassReport {
    fn merge(&mut self, other: PassReport) {
        self.clusters += other.clusters;
        self.devices += other.devices;
        self.skipped += other.skipped;
        self.actions += other.actions;
    }

    /// Ready description for the status; device and action counts stay in
    /// the logs so a corrective pass does not rewrite the status
    pub fn summary(&self) -> String {
        let suffix = if self.dry_run { " (dry run)" } else { "" };
        format!("{} in sync{}", counted(self.clusters, "cluster"), suffix)
    }
}

fn counted(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {} ({} skipped), {} {}",
            counted(self.clusters, "cluster"),
            counted(self.devices, "device"),
            self.skipped,
            counted(self.actions, "action"),
            if self.dry_run { "planned (dry run)" } else { "applied" }
        )
    }
}

/// Brings NetBox device metadata in line with policy, one cluster at a time.
pub struct Reconciler {
    pub(crate) inventory: Arc<dyn Inventory>,
    pub(crate) policy: DriftPolicy,
    device_role: Option<String>,
    pub(crate) dry_run: bool,
}

impl fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("policy", &self.policy)
            .field("device_role", &self.device_role)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    pub fn new(inventory: Arc<dyn Inventory>, policy: DriftPolicy) -> Self {
        Self {
            inventory,
            policy,
            device_role: None,
            dry_run: false,
        }
    }

    pub fn from_config(inventory: Arc<dyn Inventory>, config: &Config) -> Self {
        Self::new(inventory, DriftPolicy::new(config.expected_platform.clone()))
            .with_device_role(config.device_role.clone())
            .with_dry_run(config.dry_run)
    }

    /// Only devices with this role are listed
    #[must_use]
    pub fn with_device_role(mut self, role: Option<String>) -> Self {
        self.device_role = role;
        self
    }

    /// Log actions instead of executing them
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Reconcile every descriptor in order, stopping at the first failure
    pub async fn reconcile_clusters(&self, descriptors: &[ClusterDescriptor]) -> Result<PassReport, ReconcileError> {
        let mut report = PassReport {
            dry_run: self.dry_run,
            ..Default::default()
        };
        for descriptor in descriptors {
            report.merge(self.reconcile_cluster(descriptor).await?);
        }
        Ok(report)
    }

    /// Reconcile every active device of the cluster matching `descriptor`
    pub async fn reconcile_cluster(&self, descriptor: &ClusterDescriptor) -> Result<PassReport, ReconcileError> {
        let filter = ClusterFilter {
            name: descriptor.name.clone(),
            region: descriptor.region.clone(),
            cluster_type: descriptor.cluster_type.clone(),
        };
        let cluster = self
            .inventory
            .find_cluster(&filter)
            .await
            .map_err(|source| ReconcileError::Cluster {
                descriptor: descriptor.clone(),
                source,
            })?;
        debug!("Resolved cluster {} to {} ({})", descriptor, cluster.name, cluster.id);

        let role_id = match &self.device_role {
            Some(role) => {
                self.inventory
                    .find_device_role(role)
                    .await
                    .map_err(|source| ReconcileError::DeviceRole {
                        role: role.clone(),
                        source,
                    })?
                    .id
            }
            None => 0,
        };

        let devices = self
            .inventory
            .list_devices(&DeviceFilter {
                cluster_id: cluster.id,
                role_id,
                ..Default::default()
            })
            .await
            .map_err(|source| ReconcileError::Devices {
                cluster: cluster.name.clone(),
                cluster_id: cluster.id,
                source,
            })?;

        let mut report = PassReport {
            clusters: 1,
            dry_run: self.dry_run,
            ..Default::default()
        };
        for device in &devices {
            report.devices += 1;
            if !device.is_active() {
                debug!(
                    "Skipping device {} ({}) with status {}",
                    device.label(),
                    device.id,
                    device.status.label
                );
                report.skipped += 1;
                continue;
            }

            report.actions += self
                .reconcile_device(device)
                .await
                .map_err(|source| ReconcileError::Device {
                    device: device.label().to_string(),
                    device_id: device.id,
                    cluster: cluster.name.clone(),
                    cluster_id: cluster.id,
                    source,
                })?;
        }

        info!(
            "Reconciled cluster {} ({}): {} devices, {} skipped, {} actions",
            cluster.name, cluster.id, report.devices, report.skipped, report.actions
        );
        Ok(report)
    }
}
