//! IPAM mock operations (IP addresses)

use super::{MockNetBoxClient, MockOperation};
use crate::common::query::AddressFilter;
use crate::error::NetBoxError;
use crate::models::IPAddress;

pub(super) fn list_addresses(mock: &MockNetBoxClient, filter: &AddressFilter) -> Result<Vec<IPAddress>, NetBoxError> {
    mock.check(MockOperation::ListAddresses)?;
    // Addresses only know their interface; resolve device ownership through it
    let interfaces = mock.interfaces.lock().unwrap();
    let addresses = mock.ip_addresses.lock().unwrap();
    Ok(addresses
        .values()
        .filter(|ip| filter.interface_id == 0 || ip.assigned_object_id == Some(filter.interface_id))
        .filter(|ip| {
            filter.device_id == 0
                || ip
                    .assigned_object_id
                    .and_then(|iface| interfaces.get(&iface))
                    .map(|iface| iface.device.id == filter.device_id)
                    .unwrap_or(false)
        })
        .cloned()
        .collect())
}

pub(super) fn delete_address(mock: &MockNetBoxClient, id: u64) -> Result<(), NetBoxError> {
    mock.check(MockOperation::DeleteAddress)
        .map_err(|e| NetBoxError::operation("delete", "ip address", id, e))?;
    match mock.ip_addresses.lock().unwrap().remove(&id) {
        Some(_) => Ok(()),
        None => Err(NetBoxError::operation(
            "delete",
            "ip address",
            id,
            NetBoxError::NotFound(format!("IP address {} not found", id)),
        )),
    }
}
