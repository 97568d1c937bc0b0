//! Test utilities for unit testing the reconciler
//!
//! This module provides helpers for creating test data and setting up test scenarios.

use crate::reconciler::drift::DriftPolicy;
use crate::reconciler::Reconciler;
use crds::{ClusterDescriptor, ClusterSync, ClusterSyncSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use netbox_client::{DeviceStatus, MockNetBoxClient};
use std::sync::Arc;

pub const EXPECTED_PLATFORM: &str = "vmware-esxi";

/// Helper to create a cluster descriptor
pub fn descriptor(name: &str, region: &str, cluster_type: &str) -> ClusterDescriptor {
    ClusterDescriptor {
        name: name.to_string(),
        region: region.to_string(),
        cluster_type: cluster_type.to_string(),
    }
}

/// Compliant inventory:
/// - cluster1 (1) in region1, type1
/// - esx-01 (1), active, platform 1, OOB IP 1
/// - remoteboard (1) on esx-01, bound to IP 1
/// - platform vmware-esxi (1)
pub fn baseline_inventory() -> MockNetBoxClient {
    let mock = MockNetBoxClient::new("http://test-netbox");
    let h = mock.helpers();
    mock.add_cluster(h.cluster(1, "cluster1", "type1"), "region1");
    mock.add_device(h.device(1, "esx-01", DeviceStatus::Active, 1, 1, 1));
    mock.add_interface(h.interface(1, "remoteboard", 1));
    mock.add_ip_address(h.ip_address(1, "10.0.0.1/24", 1));
    mock.add_platform(h.platform(1, EXPECTED_PLATFORM));
    mock
}

/// Helper to create a reconciler backed by `mock`
pub fn reconciler(mock: &MockNetBoxClient) -> Reconciler {
    Reconciler::new(Arc::new(mock.clone()), DriftPolicy::new(EXPECTED_PLATFORM))
}

/// Helper to create test ClusterSync CRD
pub fn create_test_cluster_sync(name: &str, namespace: &str, clusters: Vec<ClusterDescriptor>) -> ClusterSync {
    ClusterSync {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            generation: Some(1),
            ..Default::default()
        },
        spec: ClusterSyncSpec { clusters },
        status: None,
    }
}
