//! DCIM operations for MockNetBoxClient
//!
//! Handles devices, interfaces, platforms and device roles

use super::{MockNetBoxClient, MockOperation};
use crate::common::query::{DeviceFilter, InterfaceFilter, NameFilter};
use crate::error::NetBoxError;
use crate::models::*;

fn not_found(kind: &str, id: u64) -> NetBoxError {
    NetBoxError::NotFound(format!("{} {} not found", kind, id))
}

pub(super) fn list_devices(mock: &MockNetBoxClient, filter: &DeviceFilter) -> Result<Vec<Device>, NetBoxError> {
    mock.check(MockOperation::ListDevices)?;
    let devices = mock.devices.lock().unwrap();
    Ok(devices
        .values()
        .filter(|d| filter.cluster_id == 0 || d.cluster.as_ref().map(|c| c.id) == Some(filter.cluster_id))
        .filter(|d| filter.role_id == 0 || d.role.as_ref().map(|r| r.id) == Some(filter.role_id))
        .filter(|d| filter.site_id == 0 || d.site_id() == filter.site_id)
        .filter(|d| filter.name.is_empty() || d.name.as_deref() == Some(filter.name.as_str()))
        .cloned()
        .collect())
}

pub(super) fn get_device(mock: &MockNetBoxClient, id: u64) -> Result<Device, NetBoxError> {
    mock.check(MockOperation::GetDevice)?;
    mock.devices
        .lock()
        .unwrap()
        .get(&id)
        .cloned()
        .ok_or_else(|| not_found("Device", id))
}

pub(super) fn update_device(mock: &MockNetBoxClient, id: u64, patch: &WritableDevice) -> Result<Device, NetBoxError> {
    mock.check(MockOperation::UpdateDevice)
        .map_err(|e| NetBoxError::operation("update", "device", id, e))?;

    let helpers = mock.helpers();
    let platform = patch.platform.map(|pid| {
        let name = mock.platforms.lock().unwrap().get(&pid).map(|p| p.name.clone());
        helpers.nested_platform(pid, name)
    });
    let oob_ip = patch.oob_ip.map(|ip_id| {
        let address = mock.ip_addresses.lock().unwrap().get(&ip_id).map(|ip| ip.address.clone());
        helpers.nested_ip_address(ip_id, address)
    });

    let mut devices = mock.devices.lock().unwrap();
    let device = devices
        .get_mut(&id)
        .ok_or_else(|| NetBoxError::operation("update", "device", id, not_found("Device", id)))?;
    if platform.is_some() {
        device.platform = platform;
    }
    if oob_ip.is_some() {
        device.oob_ip = oob_ip;
    }
    Ok(device.clone())
}

pub(super) fn list_interfaces(mock: &MockNetBoxClient, filter: &InterfaceFilter) -> Result<Vec<Interface>, NetBoxError> {
    mock.check(MockOperation::ListInterfaces)?;
    let interfaces = mock.interfaces.lock().unwrap();
    Ok(interfaces
        .values()
        .filter(|i| filter.device_id == 0 || i.device.id == filter.device_id)
        .filter(|i| filter.lag_id == 0 || i.lag.as_ref().map(|l| l.id) == Some(filter.lag_id))
        .filter(|i| filter.name.is_empty() || i.name == filter.name)
        .cloned()
        .collect())
}

pub(super) fn update_interface(
    mock: &MockNetBoxClient,
    id: u64,
    patch: &WritableInterface,
) -> Result<Interface, NetBoxError> {
    mock.check(MockOperation::UpdateInterface)
        .map_err(|e| NetBoxError::operation("update", "interface", id, e))?;
    let mut interfaces = mock.interfaces.lock().unwrap();
    let interface = interfaces
        .get_mut(&id)
        .ok_or_else(|| NetBoxError::operation("update", "interface", id, not_found("Interface", id)))?;
    if let Some(name) = &patch.name {
        interface.name = name.clone();
        interface.display = name.clone();
    }
    Ok(interface.clone())
}

pub(super) fn delete_interface(mock: &MockNetBoxClient, id: u64) -> Result<(), NetBoxError> {
    mock.check(MockOperation::DeleteInterface)
        .map_err(|e| NetBoxError::operation("delete", "interface", id, e))?;
    match mock.interfaces.lock().unwrap().remove(&id) {
        Some(_) => Ok(()),
        None => Err(NetBoxError::operation("delete", "interface", id, not_found("Interface", id))),
    }
}

pub(super) fn list_platforms(mock: &MockNetBoxClient, filter: &NameFilter) -> Result<Vec<Platform>, NetBoxError> {
    mock.check(MockOperation::ListPlatforms)?;
    let platforms = mock.platforms.lock().unwrap();
    Ok(platforms
        .values()
        .filter(|p| filter.name.is_empty() || p.name == filter.name)
        .cloned()
        .collect())
}

pub(super) fn list_device_roles(mock: &MockNetBoxClient, filter: &NameFilter) -> Result<Vec<DeviceRole>, NetBoxError> {
    mock.check(MockOperation::ListDeviceRoles)?;
    let roles = mock.device_roles.lock().unwrap();
    Ok(roles
        .values()
        .filter(|r| filter.name.is_empty() || r.name == filter.name)
        .cloned()
        .collect())
}
