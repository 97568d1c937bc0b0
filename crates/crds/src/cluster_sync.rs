//! ClusterSync CRD
//!
//! Lists the clusters whose NetBox device metadata the cluster sync
//! controller keeps in line with policy.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "dcops.microscaler.io",
    version = "v1alpha1",
    kind = "ClusterSync",
    namespaced,
    status = "ClusterSyncStatus",
    shortname = "csync",
    printcolumn = r#"{"name":"State","type":"string","jsonPath":".status.state"}"#,
    printcolumn = r#"{"name":"Description","type":"string","jsonPath":".status.description"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSyncSpec {
    /// Clusters to reconcile, processed in order
    #[serde(default)]
    pub clusters: Vec<ClusterDescriptor>,
}

/// One reconcile target, matched against NetBox virtualization clusters
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClusterDescriptor {
    /// Cluster name (empty matches any name)
    #[serde(default)]
    pub name: String,

    /// Region slug
    pub region: String,

    /// Cluster type slug
    #[serde(rename = "type")]
    pub cluster_type: String,
}

impl fmt::Display for ClusterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.name, self.region, self.cluster_type)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSyncStatus {
    /// Outcome of the latest pass
    pub state: SyncState,

    /// Human-readable outcome; the chained error message on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Last reconciliation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reconciled: Option<chrono::DateTime<chrono::Utc>>,

    /// Generation of the spec the latest pass ran against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
/// Sync state
///
/// Serializes as PascalCase ("Ready", "Error") but also accepts lowercase.
#[serde(rename_all = "PascalCase")]
pub enum SyncState {
    /// Not reconciled yet
    #[default]
    #[serde(alias = "pending")]
    Pending,

    /// Every device on every listed cluster matches policy
    #[serde(alias = "ready")]
    Ready,

    /// The latest pass stopped on a failure
    #[serde(alias = "error")]
    Error,
}
