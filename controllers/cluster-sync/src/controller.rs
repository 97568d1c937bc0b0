//! Main controller implementation.
//!
//! Validates NetBox connectivity, then runs the ClusterSync watcher together
//! with the periodic resync trigger until shutdown.

use crate::config::Config;
use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use crate::trigger::{resync_stream, PeriodicTrigger};
use crate::watcher::{watch_cluster_syncs, Context};
use crds::ClusterSync;
use kube::{Api, Client};
use netbox_client::{NetBoxClient, PlatformDirectory};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Main controller for ClusterSync resources.
pub struct Controller {
    watcher: JoinHandle<Result<(), ControllerError>>,
    shutdown: watch::Sender<bool>,
}

impl Controller {
    /// Creates a new controller instance.
    pub async fn new(config: Config) -> Result<Self, ControllerError> {
        info!("Initializing Cluster Sync Controller");

        let kube_client = Client::try_default().await?;
        let netbox_client = NetBoxClient::new(config.netbox_url.clone(), config.netbox_token.clone())?;

        // Validate token and connectivity before proceeding
        info!("Validating NetBox token and connectivity...");
        netbox_client.validate_token().await.map_err(|e| {
            error!("Failed to validate NetBox token: {}", e);
            error!("Please ensure:");
            error!("  1. NETBOX_TOKEN environment variable is set correctly");
            error!("  2. The token is valid in NetBox");
            error!("  3. NetBox is reachable at {}", config.netbox_url);
            ControllerError::NetBox(e)
        })?;
        info!("NetBox token validated and connectivity established");

        let platform = netbox_client
            .find_platform(&config.expected_platform)
            .await
            .map_err(|e| {
                ControllerError::InvalidConfig(format!(
                    "expected platform '{}' cannot be resolved: {}",
                    config.expected_platform, e
                ))
            })?;
        info!("Expected platform {} is NetBox platform {}", platform.name, platform.id);

        let reconciler = Arc::new(Reconciler::from_config(Arc::new(netbox_client), &config));

        let api: Api<ClusterSync> = match config.namespace.as_deref() {
            Some(ns) => Api::namespaced(kube_client.clone(), ns),
            None => Api::all(kube_client.clone()),
        };

        let (shutdown, shutdown_rx) = watch::channel(false);
        let ticks = PeriodicTrigger::spawn(config.reconcile_interval, 1, shutdown_rx);

        let context = Arc::new(Context {
            reconciler,
            client: kube_client,
            requeue: config.requeue_policy(),
        });
        let watcher = tokio::spawn(watch_cluster_syncs(api, context, resync_stream(ticks)));

        Ok(Self { watcher, shutdown })
    }

    /// Runs until the watcher exits (on SIGINT/SIGTERM), then stops the resync trigger.
    pub async fn run(self) -> Result<(), ControllerError> {
        info!("Cluster Sync Controller running");

        let result = self.watcher.await;

        if self.shutdown.send(true).is_err() {
            debug!("Periodic resync already stopped");
        }
        info!("Cluster Sync Controller stopped");

        result.map_err(|e| ControllerError::Watch(format!("ClusterSync watcher panicked: {}", e)))?
    }
}
