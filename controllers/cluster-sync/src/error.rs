//! Controller-specific error types.
//!
//! `ReconcileError` chains the context of a failed pass into one message
//! that ends up in the `ClusterSync` status. `ControllerError` covers
//! process-level failures.

use crate::reconciler::drift::DriftError;
use crds::ClusterDescriptor;
use kube::Error as KubeError;
use netbox_client::NetBoxError;
use thiserror::Error;

/// Errors that can occur in the Cluster Sync Controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// NetBox API error
    #[error("NetBox error: {0}")]
    NetBox(#[from] NetBoxError),

    /// A reconcile pass failed
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Resource watch failed
    #[error("Resource watch failed: {0}")]
    Watch(String),
}

/// First failure of a reconcile pass, with the cluster and device it stopped at
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("unable to find cluster {descriptor}: {source}")]
    Cluster {
        descriptor: ClusterDescriptor,
        source: NetBoxError,
    },

    #[error("unable to find device role {role}: {source}")]
    DeviceRole { role: String, source: NetBoxError },

    #[error("unable to reconcile devices on cluster {cluster} ({cluster_id}): {source}")]
    Devices {
        cluster: String,
        cluster_id: u64,
        source: NetBoxError,
    },

    #[error("unable to reconcile device {device} ({device_id}) on cluster {cluster} ({cluster_id}): {source}")]
    Device {
        device: String,
        device_id: u64,
        cluster: String,
        cluster_id: u64,
        source: DeviceError,
    },
}

/// Why a single device could not be brought in line
#[derive(Debug, Error)]
pub enum DeviceError {
    /// A read or write against NetBox failed; writes name the action
    #[error(transparent)]
    Inventory(#[from] NetBoxError),

    /// The device's inventory data cannot be resolved to a single answer
    #[error(transparent)]
    Drift(#[from] DriftError),
}
