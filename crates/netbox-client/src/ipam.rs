//! IPAM API adapter (IP addresses)

use crate::common::query::{query_resources, AddressFilter, ToQuery};
use crate::common::HttpClient;
use crate::error::NetBoxError;
use crate::models::IPAddress;
use std::sync::Arc;
use tracing::debug;

/// Adapter for `/api/ipam/ip-addresses/`
#[derive(Debug, Clone)]
pub struct AddressClient {
    http: Arc<HttpClient>,
}

impl AddressClient {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Query IP addresses matching the filter
    pub async fn list(&self, filter: &AddressFilter) -> Result<Vec<IPAddress>, NetBoxError> {
        let params = filter.to_query();
        debug!("Querying IP addresses [{}]", params);
        query_resources(&self.http, "ipam/ip-addresses", &params).await
    }

    /// Delete an IP address by ID
    pub async fn delete(&self, id: u64) -> Result<(), NetBoxError> {
        self.http
            .delete(&format!("/api/ipam/ip-addresses/{}/", id))
            .await
            .map_err(|e| NetBoxError::operation("delete", "ip address", id, e))
    }
}
