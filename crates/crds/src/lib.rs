//! DCops CRD Definitions
//!
//! Kubernetes Custom Resource Definitions for DCops controllers.

pub mod cluster_sync;

pub use cluster_sync::*;
