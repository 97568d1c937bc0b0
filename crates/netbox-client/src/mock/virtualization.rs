//! Virtualization mock operations (clusters)

use super::{MockNetBoxClient, MockOperation};
use crate::common::query::ClusterFilter;
use crate::error::NetBoxError;
use crate::models::Cluster;

pub(super) fn list_clusters(mock: &MockNetBoxClient, filter: &ClusterFilter) -> Result<Vec<Cluster>, NetBoxError> {
    mock.check(MockOperation::ListClusters)?;
    let clusters = mock.clusters.lock().unwrap();
    let regions = mock.cluster_regions.lock().unwrap();
    Ok(clusters
        .values()
        .filter(|c| filter.name.is_empty() || c.name == filter.name)
        .filter(|c| {
            filter.region.is_empty() || regions.get(&c.id).map(|r| r == &filter.region).unwrap_or(false)
        })
        .filter(|c| {
            filter.cluster_type.is_empty()
                || c.cluster_type
                    .as_ref()
                    .map(|t| t.slug == filter.cluster_type || t.name == filter.cluster_type)
                    .unwrap_or(false)
        })
        .cloned()
        .collect())
}
