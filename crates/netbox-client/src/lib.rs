//! NetBox REST API Client
//!
//! A Rust client library for the parts of the NetBox REST API the cluster
//! sync controller needs: virtualization clusters, DCIM devices, interfaces,
//! platforms and device roles, and IPAM addresses.
//!
//! Each NetBox sub-resource is exposed as a small capability trait
//! ([`ClusterLookup`], [`DeviceDirectory`], [`InterfaceDirectory`],
//! [`AddressDirectory`], [`PlatformDirectory`]). [`NetBoxClient`] implements
//! all of them; consumers that need everything can bound on [`Inventory`].
//!
//! # Example
//!
//! ```no_run
//! use netbox_client::{ClusterFilter, ClusterLookup, DeviceDirectory, DeviceFilter, NetBoxClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = NetBoxClient::new(
//!     "http://netbox:80".to_string(),
//!     "your-api-token".to_string(),
//! )?;
//!
//! // Resolve a cluster by region and type; the name is left as a wildcard
//! let cluster = client
//!     .find_cluster(&ClusterFilter {
//!         region: "eu-west".to_string(),
//!         cluster_type: "vsphere".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! let devices = client.list_devices(&DeviceFilter::by_cluster(cluster.id)).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Filters**: empty strings and zero IDs are never sent as query parameters
//! - **Identity lookups**: `find_*` fail unless exactly one record matches
//! - **Pagination**: listings always follow `next` links to the last page
//! - **Mocking**: `MockNetBoxClient` behind the `test-util` feature

pub mod client;
pub mod common;
pub mod dcim;
pub mod error;
pub mod ipam;
pub mod models;
#[path = "trait.rs"]
pub mod netbox_trait;
pub mod virtualization;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use client::NetBoxClient;
pub use common::query::{
    AddressFilter, ClusterFilter, DeviceFilter, InterfaceFilter, NameFilter, QueryParams, ToQuery,
};
pub use common::{HttpClient, PaginatedResponse};
pub use error::NetBoxError;
pub use models::*;
pub use netbox_trait::{
    AddressDirectory, ClusterLookup, DeviceDirectory, InterfaceDirectory, Inventory, PlatformDirectory,
};
#[cfg(any(test, feature = "test-util"))]
pub use mock::{Helpers, MockCall, MockNetBoxClient, MockOperation};
