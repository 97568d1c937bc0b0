//! Unit tests for the reconcile pass, run against MockNetBoxClient

use crate::error::ReconcileError;
use crate::reconciler::status::ReconcileOutcome;
use crate::reconciler::PassReport;
use crate::test_utils::*;
use crds::SyncState;
use netbox_client::{DeviceStatus, MockCall, MockNetBoxClient, MockOperation, WritableDevice, WritableInterface};
use pretty_assertions::assert_eq;

fn writes_for(mock: &MockNetBoxClient) -> Vec<MockCall> {
    mock.writes()
}

fn listed_devices(mock: &MockNetBoxClient) -> Vec<String> {
    mock.calls()
        .into_iter()
        .filter_map(|c| match c {
            MockCall::ListDevices(filter) => Some(filter),
            _ => None,
        })
        .collect()
}

fn touched_device(mock: &MockNetBoxClient, device_id: u64) -> bool {
    let filter = format!("device_id={}", device_id);
    mock.calls().iter().any(|c| match c {
        MockCall::ListInterfaces(f) => *f == filter,
        MockCall::GetDevice(id) => *id == device_id,
        MockCall::UpdateDevice { id, .. } => *id == device_id,
        _ => false,
    })
}

#[tokio::test]
async fn test_compliant_inventory_is_ready_without_writes() {
    let mock = baseline_inventory();
    let result = reconciler(&mock)
        .reconcile_clusters(&[descriptor("", "region1", "type1")])
        .await;

    let report = result.as_ref().unwrap();
    assert_eq!(report.clusters, 1);
    assert_eq!(report.devices, 1);
    assert_eq!(report.actions, 0);
    assert_eq!(ReconcileOutcome::from_result(&result).state, SyncState::Ready);
    assert!(writes_for(&mock).is_empty());
    assert_eq!(listed_devices(&mock), vec!["cluster_id=1".to_string()]);
}

#[tokio::test]
async fn test_legacy_interface_renamed() {
    let mock = MockNetBoxClient::new("http://test-netbox");
    let h = mock.helpers();
    mock.add_cluster(h.cluster(1, "cluster1", "type1"), "region1");
    mock.add_device(h.device(1, "esx-01", DeviceStatus::Active, 1, 1, 1));
    mock.add_interface(h.interface(1, "iDRAC", 1));
    mock.add_ip_address(h.ip_address(1, "10.0.0.1/24", 1));
    mock.add_platform(h.platform(1, EXPECTED_PLATFORM));

    let report = reconciler(&mock)
        .reconcile_clusters(&[descriptor("", "region1", "type1")])
        .await
        .unwrap();

    assert_eq!(report.actions, 1);
    assert_eq!(
        writes_for(&mock),
        vec![MockCall::UpdateInterface {
            id: 1,
            interface: WritableInterface {
                name: Some("remoteboard".to_string())
            },
        }]
    );
    assert_eq!(mock.interface(1).unwrap().name, "remoteboard");
}

#[tokio::test]
async fn test_platform_drift_updates_device() {
    let mock = baseline_inventory();
    let h = mock.helpers();
    // The expected platform now resolves to ID 2; the device still carries 1
    mock.add_platform(h.platform(1, "legacy-esxi"));
    mock.add_platform(h.platform(2, EXPECTED_PLATFORM));

    let report = reconciler(&mock)
        .reconcile_clusters(&[descriptor("", "region1", "type1")])
        .await
        .unwrap();

    assert_eq!(report.actions, 1);
    assert_eq!(
        writes_for(&mock),
        vec![MockCall::UpdateDevice {
            id: 1,
            device: WritableDevice {
                platform: Some(2),
                oob_ip: Some(1),
            },
        }]
    );
    assert_eq!(mock.device(1).unwrap().platform_id(), 2);
}

#[tokio::test]
async fn test_ephemeral_interface_cleaned_up() {
    let mock = baseline_inventory();
    let h = mock.helpers();
    mock.add_interface(h.interface(2, "vmk0", 1));
    mock.add_ip_address(h.ip_address(2, "10.0.1.1/24", 2));

    reconciler(&mock)
        .reconcile_clusters(&[descriptor("", "region1", "type1")])
        .await
        .unwrap();

    assert_eq!(
        writes_for(&mock),
        vec![MockCall::DeleteAddress(2), MockCall::DeleteInterface(2)]
    );
    assert!(mock.interface(2).is_none());
    assert!(mock.ip_address(2).is_none());
}

#[tokio::test]
async fn test_device_listing_failure() {
    let mock = baseline_inventory();
    mock.fail(MockOperation::ListDevices, "unable to find devices");

    let result = reconciler(&mock)
        .reconcile_clusters(&[descriptor("", "region1", "type1")])
        .await;
    let outcome = ReconcileOutcome::from_result(&result);

    assert_eq!(outcome.state, SyncState::Error);
    assert_eq!(
        outcome.description,
        "unable to reconcile devices on cluster cluster1 (1): unable to find devices"
    );
}

#[tokio::test]
async fn test_unresolved_cluster_issues_no_device_calls() {
    // No match
    let mock = baseline_inventory();
    let err = reconciler(&mock)
        .reconcile_clusters(&[descriptor("", "region9", "type1")])
        .await
        .unwrap_err();
    assert!(matches!(err, ReconcileError::Cluster { .. }));
    assert_eq!(
        err.to_string(),
        "unable to find cluster /region9/type1: expected exactly one cluster matching [region=region9, type=type1], found 0"
    );
    assert!(listed_devices(&mock).is_empty());

    // Two matches
    let mock = baseline_inventory();
    mock.add_cluster(mock.helpers().cluster(2, "cluster2", "type1"), "region1");
    let err = reconciler(&mock)
        .reconcile_clusters(&[descriptor("", "region1", "type1")])
        .await
        .unwrap_err();
    assert!(err.to_string().ends_with("found 2"));
    assert!(listed_devices(&mock).is_empty());
    assert!(writes_for(&mock).is_empty());
}

#[tokio::test]
async fn test_named_descriptor_narrows_match() {
    let mock = baseline_inventory();
    mock.add_cluster(mock.helpers().cluster(2, "cluster2", "type1"), "region1");

    let report = reconciler(&mock)
        .reconcile_clusters(&[descriptor("cluster1", "region1", "type1")])
        .await
        .unwrap();

    assert_eq!(report.devices, 1);
    assert_eq!(listed_devices(&mock), vec!["cluster_id=1".to_string()]);
}

#[tokio::test]
async fn test_inactive_devices_are_skipped() {
    let mock = baseline_inventory();
    let h = mock.helpers();
    // Offline device with plenty of drift that must not be touched
    mock.add_device(h.device(2, "esx-02", DeviceStatus::Offline, 1, 0, 0));
    mock.add_interface(h.interface(3, "iDRAC", 2));
    mock.add_interface(h.interface(4, "vmk0", 2));
    mock.add_device(h.device(3, "esx-03", DeviceStatus::Planned, 1, 0, 0));

    let report = reconciler(&mock)
        .reconcile_clusters(&[descriptor("", "region1", "type1")])
        .await
        .unwrap();

    assert_eq!(report.devices, 3);
    assert_eq!(report.skipped, 2);
    assert_eq!(report.actions, 0);
    assert!(!touched_device(&mock, 2));
    assert!(!touched_device(&mock, 3));
    assert!(writes_for(&mock).is_empty());
}

#[tokio::test]
async fn test_second_pass_is_idempotent() {
    let mock = baseline_inventory();
    let h = mock.helpers();
    mock.add_platform(h.platform(1, "legacy-esxi"));
    mock.add_platform(h.platform(2, EXPECTED_PLATFORM));
    mock.add_interface(h.interface(2, "vmk0", 1));
    mock.add_ip_address(h.ip_address(2, "10.0.1.1/24", 2));
    mock.add_device(h.device(2, "esx-02", DeviceStatus::Active, 1, 0, 0));
    mock.add_interface(h.interface(3, "iDRAC", 2));
    mock.add_ip_address(h.ip_address(3, "10.0.0.2/24", 3));

    let reconciler = reconciler(&mock);
    let descriptors = [descriptor("", "region1", "type1")];

    let first = reconciler.reconcile_clusters(&descriptors).await.unwrap();
    // esx-01: platform update + vmk0 cleanup; esx-02: rename + update
    assert_eq!(first.actions, 5);

    mock.reset_calls();
    let second = reconciler.reconcile_clusters(&descriptors).await.unwrap();
    assert_eq!(second.actions, 0);
    assert!(writes_for(&mock).is_empty());
}

#[tokio::test]
async fn test_cleanup_deletes_addresses_before_interface() {
    let mock = baseline_inventory();
    let h = mock.helpers();
    mock.add_interface(h.interface(2, "vmk0", 1));
    mock.add_interface(h.interface(3, "vmk1", 1));
    mock.add_ip_address(h.ip_address(2, "10.0.1.1/24", 2));
    mock.add_ip_address(h.ip_address(3, "10.0.2.1/24", 2));
    mock.add_ip_address(h.ip_address(4, "10.0.3.1/24", 3));

    reconciler(&mock)
        .reconcile_clusters(&[descriptor("", "region1", "type1")])
        .await
        .unwrap();

    let writes = writes_for(&mock);
    let position = |call: MockCall| writes.iter().position(|w| *w == call).unwrap();
    assert!(position(MockCall::DeleteAddress(2)) < position(MockCall::DeleteInterface(2)));
    assert!(position(MockCall::DeleteAddress(3)) < position(MockCall::DeleteInterface(2)));
    assert!(position(MockCall::DeleteAddress(4)) < position(MockCall::DeleteInterface(3)));
    assert_eq!(writes.len(), 5);
}

#[tokio::test]
async fn test_devices_are_processed_in_order() {
    let mock = baseline_inventory();
    let h = mock.helpers();
    mock.add_interface(h.interface(2, "vmk0", 1));
    mock.add_device(h.device(2, "esx-02", DeviceStatus::Active, 1, 1, 3));
    mock.add_interface(h.interface(3, "iDRAC", 2));
    mock.add_ip_address(h.ip_address(3, "10.0.0.2/24", 3));

    reconciler(&mock)
        .reconcile_clusters(&[descriptor("", "region1", "type1")])
        .await
        .unwrap();

    assert_eq!(
        writes_for(&mock),
        vec![
            MockCall::DeleteInterface(2),
            MockCall::UpdateInterface {
                id: 3,
                interface: WritableInterface {
                    name: Some("remoteboard".to_string())
                },
            },
        ]
    );
}

#[tokio::test]
async fn test_failed_write_stops_pass() {
    let mock = baseline_inventory();
    let h = mock.helpers();
    mock.add_interface(h.interface(2, "vmk0", 1));
    mock.add_ip_address(h.ip_address(2, "10.0.1.1/24", 2));
    // Second device would need a rename, but the pass never gets there
    mock.add_device(h.device(2, "esx-02", DeviceStatus::Active, 1, 1, 3));
    mock.add_interface(h.interface(3, "iDRAC", 2));
    mock.add_ip_address(h.ip_address(3, "10.0.0.2/24", 3));
    mock.fail(MockOperation::DeleteAddress, "address is locked");

    let err = reconciler(&mock)
        .reconcile_clusters(&[descriptor("", "region1", "type1")])
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "unable to reconcile device esx-01 (1) on cluster cluster1 (1): unable to delete ip address 2: address is locked"
    );
    // The failed delete was attempted, nothing after it
    assert_eq!(writes_for(&mock), vec![MockCall::DeleteAddress(2)]);
    assert!(mock.interface(2).is_some());
    assert!(!touched_device(&mock, 2));
}

#[tokio::test]
async fn test_applied_changes_are_not_rolled_back() {
    let mock = baseline_inventory();
    let h = mock.helpers();
    mock.add_platform(h.platform(1, "legacy-esxi"));
    mock.add_platform(h.platform(2, EXPECTED_PLATFORM));
    mock.add_interface(h.interface(2, "vmk0", 1));
    mock.fail(MockOperation::DeleteInterface, "in use");

    let err = reconciler(&mock)
        .reconcile_clusters(&[descriptor("", "region1", "type1")])
        .await
        .unwrap_err();

    assert!(err.to_string().ends_with("unable to delete interface 2: in use"));
    assert_eq!(mock.device(1).unwrap().platform_id(), 2);
}

#[tokio::test]
async fn test_unresolvable_device_is_an_error() {
    let mock = baseline_inventory();
    let h = mock.helpers();
    mock.add_interface(h.interface(2, "iDRAC", 1));

    let err = reconciler(&mock)
        .reconcile_clusters(&[descriptor("", "region1", "type1")])
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "unable to reconcile device esx-01 (1) on cluster cluster1 (1): ambiguous OOB interface: found 1 iDRAC and 1 remoteboard interfaces"
    );
    assert!(writes_for(&mock).is_empty());
}

#[tokio::test]
async fn test_descriptors_fail_fast_in_order() {
    let mock = baseline_inventory();
    let h = mock.helpers();
    mock.add_cluster(h.cluster(2, "cluster2", "type2"), "region2");
    mock.add_interface(h.interface(2, "vmk0", 1));

    let err = reconciler(&mock)
        .reconcile_clusters(&[
            descriptor("", "region1", "type1"),
            descriptor("", "region9", "type1"),
            descriptor("", "region2", "type2"),
        ])
        .await
        .unwrap_err();

    assert!(matches!(err, ReconcileError::Cluster { .. }));
    // First descriptor completed, the third never ran
    assert_eq!(writes_for(&mock), vec![MockCall::DeleteInterface(2)]);
    assert_eq!(listed_devices(&mock), vec!["cluster_id=1".to_string()]);
}

#[tokio::test]
async fn test_multiple_descriptors_merge_reports() {
    let mock = baseline_inventory();
    let h = mock.helpers();
    mock.add_cluster(h.cluster(2, "cluster2", "type2"), "region2");
    mock.add_device(h.device(2, "esx-02", DeviceStatus::Offline, 2, 0, 0));

    let report = reconciler(&mock)
        .reconcile_clusters(&[descriptor("", "region1", "type1"), descriptor("", "region2", "type2")])
        .await
        .unwrap();

    assert_eq!(report.clusters, 2);
    assert_eq!(report.devices, 2);
    assert_eq!(report.skipped, 1);
}

#[tokio::test]
async fn test_empty_descriptor_list_is_ready() {
    let mock = baseline_inventory();
    let result = reconciler(&mock).reconcile_clusters(&[]).await;

    assert_eq!(ReconcileOutcome::from_result(&result).state, SyncState::Ready);
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_dry_run_plans_without_writing() {
    let mock = baseline_inventory();
    let h = mock.helpers();
    mock.add_interface(h.interface(2, "vmk0", 1));
    mock.add_ip_address(h.ip_address(2, "10.0.1.1/24", 2));

    let report = reconciler(&mock)
        .with_dry_run(true)
        .reconcile_clusters(&[descriptor("", "region1", "type1")])
        .await
        .unwrap();

    assert_eq!(report.actions, 2);
    assert!(report.dry_run);
    assert!(report.to_string().ends_with("2 actions planned (dry run)"));
    assert!(writes_for(&mock).is_empty());
    assert!(mock.interface(2).is_some());
}

#[tokio::test]
async fn test_device_role_restricts_listing() {
    let mock = baseline_inventory();
    let h = mock.helpers();
    mock.add_device_role(h.device_role(7, "hypervisor"));
    let mut device = mock.device(1).unwrap();
    device.role = Some(h.nested_device_role(7, "hypervisor"));
    mock.add_device(device);
    // Same cluster, different role, drifted: must not be listed
    mock.add_device(h.device(2, "esx-02", DeviceStatus::Active, 1, 0, 0));

    let report = reconciler(&mock)
        .with_device_role(Some("hypervisor".to_string()))
        .reconcile_clusters(&[descriptor("", "region1", "type1")])
        .await
        .unwrap();

    assert_eq!(report.devices, 1);
    assert_eq!(listed_devices(&mock), vec!["cluster_id=1, role_id=7".to_string()]);
}

#[tokio::test]
async fn test_unknown_device_role_fails_before_listing() {
    let mock = baseline_inventory();

    let err = reconciler(&mock)
        .with_device_role(Some("hypervisor".to_string()))
        .reconcile_clusters(&[descriptor("", "region1", "type1")])
        .await
        .unwrap_err();

    assert!(matches!(err, ReconcileError::DeviceRole { .. }));
    assert!(listed_devices(&mock).is_empty());
}

#[test]
fn test_pass_report_display() {
    let report = PassReport {
        clusters: 1,
        devices: 1,
        skipped: 0,
        actions: 1,
        dry_run: false,
    };
    assert_eq!(report.to_string(), "1 cluster, 1 device (0 skipped), 1 action applied");

    let report = PassReport {
        clusters: 2,
        devices: 5,
        skipped: 1,
        actions: 0,
        dry_run: true,
    };
    assert_eq!(report.to_string(), "2 clusters, 5 devices (1 skipped), 0 actions planned (dry run)");
}
