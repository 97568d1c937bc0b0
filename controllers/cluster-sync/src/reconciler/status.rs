//! ClusterSync status handling
//!
//! The status only reflects the latest pass. It is patched only when the
//! state, description or observed generation change, so a steady-state
//! resync does not write to the API server (and does not retrigger a watch
//! event on its own status).

use super::PassReport;
use crate::error::ReconcileError;
use crds::{ClusterSyncStatus, SyncState};

/// Ready/Error result and description of one pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub state: SyncState,
    pub description: String,
}

impl ReconcileOutcome {
    pub fn from_result(result: &Result<PassReport, ReconcileError>) -> Self {
        match result {
            Ok(report) => Self {
                state: SyncState::Ready,
                description: report.summary(),
            },
            Err(e) => Self {
                state: SyncState::Error,
                description: e.to_string(),
            },
        }
    }

    /// True when `current` differs from this outcome for `generation`
    pub fn needs_update(&self, current: Option<&ClusterSyncStatus>, generation: Option<i64>) -> bool {
        match current {
            None => true,
            Some(status) => {
                status.state != self.state
                    || status.description.as_deref() != Some(self.description.as_str())
                    || status.observed_generation != generation
            }
        }
    }

    /// Merge patch body for the status subresource, with PascalCase state values
    pub fn status_patch(&self, generation: Option<i64>) -> serde_json::Value {
        let state_str = match self.state {
            SyncState::Pending => "Pending",
            SyncState::Ready => "Ready",
            SyncState::Error => "Error",
        };

        serde_json::json!({
            "status": {
                "state": state_str,
                "description": self.description,
                "lastReconciled": chrono::Utc::now().to_rfc3339(),
                "observedGeneration": generation,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netbox_client::NetBoxError;

    fn ready() -> ReconcileOutcome {
        ReconcileOutcome::from_result(&Ok(PassReport {
            clusters: 1,
            devices: 3,
            skipped: 1,
            actions: 2,
            dry_run: false,
        }))
    }

    #[test]
    fn test_outcome_from_success() {
        let outcome = ready();
        assert_eq!(outcome.state, SyncState::Ready);
        assert_eq!(outcome.description, "1 cluster in sync");
    }

    #[test]
    fn test_corrective_pass_keeps_status() {
        let corrected = ready();
        let steady = ReconcileOutcome::from_result(&Ok(PassReport {
            clusters: 1,
            devices: 3,
            skipped: 1,
            actions: 0,
            dry_run: false,
        }));
        assert_eq!(corrected, steady);

        let status = ClusterSyncStatus {
            state: SyncState::Ready,
            description: Some(corrected.description.clone()),
            last_reconciled: None,
            observed_generation: Some(1),
        };
        assert!(!steady.needs_update(Some(&status), Some(1)));
    }

    #[test]
    fn test_dry_run_summary() {
        let outcome = ReconcileOutcome::from_result(&Ok(PassReport {
            clusters: 2,
            dry_run: true,
            ..Default::default()
        }));
        assert_eq!(outcome.description, "2 clusters in sync (dry run)");
    }

    #[test]
    fn test_outcome_from_failure() {
        let err = ReconcileError::Devices {
            cluster: "cluster1".to_string(),
            cluster_id: 1,
            source: NetBoxError::Api("unable to find devices".to_string()),
        };
        let outcome = ReconcileOutcome::from_result(&Err(err));
        assert_eq!(outcome.state, SyncState::Error);
        assert_eq!(
            outcome.description,
            "unable to reconcile devices on cluster cluster1 (1): unable to find devices"
        );
    }

    #[test]
    fn test_needs_update() {
        let outcome = ready();
        assert!(outcome.needs_update(None, Some(1)));

        let mut status = ClusterSyncStatus {
            state: SyncState::Ready,
            description: Some(outcome.description.clone()),
            last_reconciled: None,
            observed_generation: Some(1),
        };
        assert!(!outcome.needs_update(Some(&status), Some(1)));
        assert!(outcome.needs_update(Some(&status), Some(2)));

        status.state = SyncState::Error;
        assert!(outcome.needs_update(Some(&status), Some(1)));
    }

    #[test]
    fn test_status_patch_shape() {
        let patch = ready().status_patch(Some(4));
        assert_eq!(patch["status"]["state"], "Ready");
        assert_eq!(patch["status"]["observedGeneration"], 4);
        assert!(patch["status"]["lastReconciled"].is_string());
    }
}
