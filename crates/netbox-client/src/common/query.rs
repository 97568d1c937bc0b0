//! Query utilities for NetBox API
//!
//! Filters are plain structs with optional fields. Only non-empty strings and
//! non-zero IDs become query parameters, so a zero-valued filter field means
//! "do not filter on this" rather than "match zero".

use crate::common::HttpClient;
use crate::error::NetBoxError;
use serde::Deserialize;
use std::fmt;

/// Rendered query parameters for a list call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(&'static str, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a text filter, skipped when `value` is empty
    #[must_use]
    pub fn text(mut self, key: &'static str, value: &str) -> Self {
        if !value.is_empty() {
            self.0.push((key, value.to_string()));
        }
        self
    }

    /// Adds an ID filter, skipped when `value` is zero
    #[must_use]
    pub fn id(mut self, key: &'static str, value: u64) -> Self {
        if value != 0 {
            self.0.push((key, value.to_string()));
        }
        self
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Looks up a filter value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self.0
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&rendered)
    }
}

/// Converts a filter struct into query parameters
pub trait ToQuery {
    fn to_query(&self) -> QueryParams;
}

/// Cluster filter; matches clusters by name, region slug and cluster type slug
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterFilter {
    pub name: String,
    pub region: String,
    pub cluster_type: String,
}

impl ToQuery for ClusterFilter {
    fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .text("name", &self.name)
            .text("region", &self.region)
            .text("type", &self.cluster_type)
    }
}

/// Device filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceFilter {
    pub cluster_id: u64,
    pub role_id: u64,
    pub site_id: u64,
    pub name: String,
}

impl DeviceFilter {
    pub fn by_cluster(cluster_id: u64) -> Self {
        Self {
            cluster_id,
            ..Default::default()
        }
    }
}

impl ToQuery for DeviceFilter {
    fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .id("cluster_id", self.cluster_id)
            .id("role_id", self.role_id)
            .id("site_id", self.site_id)
            .text("name", &self.name)
    }
}

/// Interface filter; by owning device and/or parent LAG
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceFilter {
    pub device_id: u64,
    pub lag_id: u64,
    pub name: String,
}

impl InterfaceFilter {
    pub fn by_device(device_id: u64) -> Self {
        Self {
            device_id,
            ..Default::default()
        }
    }

    pub fn by_lag(lag_id: u64) -> Self {
        Self {
            lag_id,
            ..Default::default()
        }
    }
}

impl ToQuery for InterfaceFilter {
    fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .id("device_id", self.device_id)
            .id("lag_id", self.lag_id)
            .text("name", &self.name)
    }
}

/// IP address filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressFilter {
    pub interface_id: u64,
    pub device_id: u64,
}

impl AddressFilter {
    pub fn by_interface(interface_id: u64) -> Self {
        Self {
            interface_id,
            ..Default::default()
        }
    }
}

impl ToQuery for AddressFilter {
    fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .id("interface_id", self.interface_id)
            .id("device_id", self.device_id)
    }
}

/// Name-only filter (platforms, device roles)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameFilter {
    pub name: String,
}

impl NameFilter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ToQuery for NameFilter {
    fn to_query(&self) -> QueryParams {
        QueryParams::new().text("name", &self.name)
    }
}

/// Query resources with optional filtering, fetching every page
pub async fn query_resources<T: for<'de> Deserialize<'de>>(
    http: &HttpClient,
    endpoint: &str,
    params: &QueryParams,
) -> Result<Vec<T>, NetBoxError> {
    let mut url = format!("/api/{}/", endpoint);

    if !params.is_empty() {
        let query_string = http.build_query_string(params.pairs());
        url = format!("{}?{}", url, query_string);
    }

    http.fetch_all_pages(http.build_url(&url)).await
}

/// Enforces the exactly-one contract of identity lookups
pub fn exactly_one<T>(kind: &'static str, params: &QueryParams, mut results: Vec<T>) -> Result<T, NetBoxError> {
    if results.len() == 1 {
        if let Some(only) = results.pop() {
            return Ok(only);
        }
    }
    Err(NetBoxError::NotFoundCount {
        kind,
        filters: params.to_string(),
        count: results.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_zero_fields_are_not_filters() {
        let filter = ClusterFilter {
            name: String::new(),
            region: "region1".to_string(),
            cluster_type: "type1".to_string(),
        };
        let query = filter.to_query();
        assert_eq!(
            query.pairs(),
            &[("region", "region1".to_string()), ("type", "type1".to_string())]
        );
        assert_eq!(query.get("name"), None);

        assert!(DeviceFilter::default().to_query().is_empty());
        assert_eq!(DeviceFilter::by_cluster(4).to_query().to_string(), "cluster_id=4");
        assert_eq!(InterfaceFilter::by_lag(9).to_query().to_string(), "lag_id=9");
    }

    #[test]
    fn test_display_joins_pairs() {
        let query = DeviceFilter {
            cluster_id: 1,
            role_id: 2,
            ..Default::default()
        }
        .to_query();
        assert_eq!(query.to_string(), "cluster_id=1, role_id=2");
    }

    #[test]
    fn test_exactly_one() {
        let params = NameFilter::new("esxi").to_query();
        assert_eq!(exactly_one("platform", &params, vec![5]).unwrap(), 5);

        let none = exactly_one::<u8>("platform", &params, vec![]).unwrap_err();
        assert!(matches!(none, NetBoxError::NotFoundCount { count: 0, .. }));

        let many = exactly_one("platform", &params, vec![1, 2]).unwrap_err();
        assert_eq!(many.to_string(), "expected exactly one platform matching [name=esxi], found 2");
    }
}
