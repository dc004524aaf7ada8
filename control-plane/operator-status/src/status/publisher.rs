use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, trace};

use super::status_reducer::{merge_status, should_write};
use super::types::Status;
use crate::crd::cluster_operator::{
    ClusterOperator, ClusterOperatorSpec, Condition, ObjectReference,
};
use crate::errors::StoreError;
use crate::store::StatusStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublishOutcome {
    Created,
    Updated,
    Unchanged,
    Failed,
}

/// Sole writer of the persisted `ClusterOperator`. Runs as one task draining
/// the status queue, so at most one fetch/merge/write cycle is in flight.
pub struct StatusPublisher {
    name: String,
    release_version: String,
    store: Arc<dyn StatusStore>,
    related_objects: Arc<RwLock<Vec<ObjectReference>>>,
}

impl StatusPublisher {
    pub fn new(
        name: String,
        release_version: String,
        store: Arc<dyn StatusStore>,
        related_objects: Arc<RwLock<Vec<ObjectReference>>>,
    ) -> Self {
        Self {
            name,
            release_version,
            store,
            related_objects,
        }
    }

    /// Spawn the worker. It stops once every sender of `rx` is dropped and
    /// the queue has been drained.
    pub fn spawn(self, rx: mpsc::Receiver<Status>) -> JoinHandle<()> {
        tokio::spawn(self.run(rx))
    }

    async fn run(self, mut rx: mpsc::Receiver<Status>) {
        while let Some(status) = rx.recv().await {
            self.publish(status).await;
        }
        debug!(name = %self.name, "publisher: status queue closed");
    }

    #[instrument(skip_all, fields(name = %self.name))]
    pub async fn publish(&self, status: Status) -> PublishOutcome {
        let (mut co, exists) = match self.store.get(&self.name).await {
            Ok(co) => (co, true),
            Err(StoreError::NotFound(_)) => (
                ClusterOperator::new(&self.name, ClusterOperatorSpec::default()),
                false,
            ),
            Err(e) => {
                error!(error = %e, "publisher: failed to get ClusterOperator");
                return PublishOutcome::Failed;
            }
        };

        let current = co.status.clone().unwrap_or_default();
        let related = self.related_objects.read().await.clone();
        let now = Utc::now().to_rfc3339();
        let desired = merge_status(
            &current,
            &status,
            &related,
            &self.release_version,
            &now,
        );

        if !should_write(&current, &desired) {
            trace!("publisher: status unchanged; skipping write");
            return PublishOutcome::Unchanged;
        }

        let rendered = render_conditions(&desired.conditions);
        co.status = Some(desired);

        if exists {
            match self.store.update_status(&co).await {
                Ok(()) => {
                    info!("Updated ClusterOperator with conditions:\n{rendered}");
                    PublishOutcome::Updated
                }
                Err(e) => {
                    error!(error = %e, "publisher: failed to update ClusterOperator");
                    PublishOutcome::Failed
                }
            }
        } else {
            match self.store.create(&co).await {
                Ok(()) => {
                    info!("Created ClusterOperator with conditions:\n{rendered}");
                    PublishOutcome::Created
                }
                Err(e) => {
                    error!(error = %e, "publisher: failed to create ClusterOperator");
                    PublishOutcome::Failed
                }
            }
        }
    }
}

fn render_conditions(conditions: &[Condition]) -> String {
    serde_yaml::to_string(conditions)
        .unwrap_or_else(|e| format!("(failed to convert to YAML: {e})"))
}
