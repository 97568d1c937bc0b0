//! Cluster Sync Controller
//!
//! Keeps NetBox device metadata in line with the clusters listed in
//! ClusterSync resources. For every active device of every listed cluster it
//! enforces:
//! - the OOB management interface is named `remoteboard` (legacy `iDRAC` is renamed)
//! - the device carries the expected platform and its OOB IP
//! - ephemeral `vmk*` interfaces and their addresses are removed

mod backoff;
mod config;
mod controller;
mod error;
mod reconciler;
mod trigger;
mod watcher;
#[cfg(test)]
mod test_utils;

use crate::config::Config;
use crate::error::ControllerError;
use controller::Controller;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Cluster Sync Controller");

    let config = Config::from_env()?;

    info!("Configuration:");
    info!("  NetBox URL: {}", config.netbox_url);
    info!("  Namespace: {}", config.namespace.as_deref().unwrap_or("all namespaces"));
    info!("  Expected platform: {}", config.expected_platform);
    info!("  Device role: {}", config.device_role.as_deref().unwrap_or("any"));
    info!("  Resync interval: {:?}", config.reconcile_interval);
    info!(
        "  Requeue: burst {}, {} qps, backoff {:?}..{:?}",
        config.rate_limit_burst, config.rate_limit_qps, config.backoff_base, config.backoff_max
    );
    if config.dry_run {
        info!("  Dry run: actions are logged, not applied");
    }

    let controller = Controller::new(config).await?;
    controller.run().await?;

    Ok(())
}
