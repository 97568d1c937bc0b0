//! Virtualization API adapter (clusters)

use crate::common::query::{query_resources, ClusterFilter, ToQuery};
use crate::common::HttpClient;
use crate::error::NetBoxError;
use crate::models::Cluster;
use std::sync::Arc;
use tracing::debug;

/// Adapter for `/api/virtualization/clusters/`
#[derive(Debug, Clone)]
pub struct ClusterClient {
    http: Arc<HttpClient>,
}

impl ClusterClient {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Query clusters matching the filter
    pub async fn list(&self, filter: &ClusterFilter) -> Result<Vec<Cluster>, NetBoxError> {
        let params = filter.to_query();
        debug!("Querying clusters [{}]", params);
        query_resources(&self.http, "virtualization/clusters", &params).await
    }
}
