//! ClusterSync watcher.
//!
//! Runs a kube_runtime::Controller over ClusterSync resources. Besides watch
//! events, every object is re-reconciled on each periodic resync tick. Failed
//! passes are requeued through the [`RequeuePolicy`].

use crate::backoff::RequeuePolicy;
use crate::error::ControllerError;
use crate::reconciler::status::ReconcileOutcome;
use crate::reconciler::Reconciler;
use crds::ClusterSync;
use futures::{Stream, StreamExt};
use kube::api::{Patch, PatchParams};
use kube::{Api, Client, ResourceExt};
use kube_runtime::{controller::{Action, Config as ControllerConfig}, watcher, Controller};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Shared state for every reconcile call
pub struct Context {
    pub reconciler: Arc<Reconciler>,
    pub client: Client,
    pub requeue: RequeuePolicy,
}

/// Requeue key of a ClusterSync (`namespace/name`)
pub(crate) fn object_key(obj: &ClusterSync) -> String {
    format!("{}/{}", obj.namespace().unwrap_or_default(), obj.name_any())
}

async fn reconcile(obj: Arc<ClusterSync>, ctx: Arc<Context>) -> Result<Action, ControllerError> {
    let name = obj.metadata.name.as_deref()
        .ok_or_else(|| ControllerError::InvalidConfig("ClusterSync missing name".to_string()))?;
    let namespace = obj.metadata.namespace.as_deref().unwrap_or("default");
    let key = object_key(&obj);
    let span = info_span!("reconcile", pass = %Uuid::new_v4(), cluster_sync = %key);

    async {
        info!("Reconciling ClusterSync {} ({} clusters)", key, obj.spec.clusters.len());
        let result = ctx.reconciler.reconcile_clusters(&obj.spec.clusters).await;

        let outcome = ReconcileOutcome::from_result(&result);
        let generation = obj.metadata.generation;
        if outcome.needs_update(obj.status.as_ref(), generation) {
            let api: Api<ClusterSync> = Api::namespaced(ctx.client.clone(), namespace);
            let patch = outcome.status_patch(generation);
            api.patch_status(name, &PatchParams::default(), &Patch::Merge(&patch)).await?;
            debug!("Updated ClusterSync {} status to {:?}", key, outcome.state);
        } else {
            debug!("ClusterSync {} status unchanged, skipping update", key);
        }

        match result {
            Ok(report) => {
                ctx.requeue.forget(&key);
                info!("ClusterSync {} ready: {}", key, report);
                Ok(Action::await_change())
            }
            Err(e) => Err(e.into()),
        }
    }
    .instrument(span)
    .await
}

fn error_policy(obj: Arc<ClusterSync>, error: &ControllerError, ctx: Arc<Context>) -> Action {
    let key = object_key(&obj);
    let delay = ctx.requeue.when(&key);
    error!(
        "Reconciliation failed for ClusterSync {} (failure {}), retrying in {:?}: {}",
        key,
        ctx.requeue.failures(&key),
        delay,
        error
    );
    Action::requeue(delay)
}

/// Watch ClusterSync resources until the process receives a shutdown signal.
///
/// `resync` forces a pass over every known object on each item.
pub async fn watch_cluster_syncs<S>(api: Api<ClusterSync>, ctx: Arc<Context>, resync: S) -> Result<(), ControllerError>
where
    S: Stream<Item = ()> + Send + Sync + 'static,
{
    info!("Starting ClusterSync watcher");

    // Debounce batches bursts of events for the same object
    let controller_config = ControllerConfig::default()
        .debounce(Duration::from_secs(5))
        .concurrency(3);

    Controller::new(api, watcher::Config::default())
        .with_config(controller_config)
        .reconcile_all_on(resync)
        .shutdown_on_signal()
        .run(reconcile, error_policy, ctx)
        .for_each(|res| async move {
            match res {
                Ok((obj, _)) => debug!("Reconciled {}", obj),
                Err(e) => warn!("Controller error for ClusterSync: {}", e),
            }
        })
        .await;

    info!("ClusterSync watcher stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_cluster_sync, descriptor};

    #[test]
    fn test_object_key() {
        let obj = create_test_cluster_sync("esx-fleet", "infra", vec![descriptor("", "region1", "type1")]);
        assert_eq!(object_key(&obj), "infra/esx-fleet");
    }
}
