use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::level::{DegradedLevels, degraded};
use super::pods::{self, PodsReport};
use super::publisher::StatusPublisher;
use super::types::{Status, StatusLevel, WorkloadRef};
use crate::crd::cluster_operator::{Condition, ObjectReference};
use crate::inspector::WorkloadInspector;
use crate::store::StatusStore;

pub const DEFAULT_QUEUE_CAPACITY: usize = 5;

/// Coordinates every change to one `ClusterOperator`'s status.
///
/// Reconcilers report through the level-scoped `set_*` calls; each call turns
/// the current in-memory state into a [`Status`] and queues it for the single
/// publisher task. A full queue makes the caller wait.
pub struct StatusManager {
    name: String,
    release_version: String,
    inspector: Arc<dyn WorkloadInspector>,

    levels: RwLock<DegradedLevels>,
    daemon_sets: RwLock<Vec<WorkloadRef>>,
    deployments: RwLock<Vec<WorkloadRef>>,
    related_objects: Arc<RwLock<Vec<ObjectReference>>>,

    queue: mpsc::Sender<Status>,
    worker: JoinHandle<()>,
}

impl StatusManager {
    /// Must be called from within a tokio runtime; the publisher is spawned
    /// immediately.
    pub fn new(
        name: impl Into<String>,
        release_version: impl Into<String>,
        store: Arc<dyn StatusStore>,
        inspector: Arc<dyn WorkloadInspector>,
        queue_capacity: usize,
    ) -> Self {
        let name = name.into();
        let release_version = release_version.into();
        let related_objects = Arc::new(RwLock::new(Vec::new()));
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let worker = StatusPublisher::new(
            name.clone(),
            release_version.clone(),
            store,
            related_objects.clone(),
        )
        .spawn(rx);
        info!(%name, %release_version, queue_capacity, "status manager started");

        Self {
            name,
            release_version,
            inspector,
            levels: RwLock::new(DegradedLevels::new()),
            daemon_sets: RwLock::new(Vec::new()),
            deployments: RwLock::new(Vec::new()),
            related_objects,
            queue: tx,
            worker,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn release_version(&self) -> &str {
        &self.release_version
    }

    async fn enqueue(&self, status: Status) {
        if self.queue.send(status).await.is_err() {
            warn!(name = %self.name, "status queue closed; dropping status");
        }
    }

    /// Mark the operator Degraded at `level`. Only surfaces if no
    /// higher-priority level is already failing.
    pub async fn set_degraded(
        &self,
        level: StatusLevel,
        reason: &str,
        message: &str,
    ) {
        debug!(name = %self.name, %level, reason, "set degraded");
        self.sync_degraded(level, Some(degraded(reason, message))).await;
    }

    /// Clear `level`. The next failing level, if any, becomes the published
    /// Degraded condition.
    pub async fn set_not_degraded(&self, level: StatusLevel) {
        debug!(name = %self.name, %level, "set not degraded");
        self.sync_degraded(level, None).await;
    }

    // Lock is held across the enqueue so resolved conditions reach the queue
    // in mutation order.
    async fn sync_degraded(
        &self,
        level: StatusLevel,
        condition: Option<Condition>,
    ) {
        let mut levels = self.levels.write().await;
        levels.set(level, condition);
        let resolved = levels.resolve();
        self.enqueue(Status::new(vec![resolved], false)).await;
    }

    pub async fn degraded_at(&self, level: StatusLevel) -> Option<Condition> {
        self.levels.read().await.get(level).cloned()
    }

    pub async fn set_daemon_sets(&self, daemon_sets: Vec<WorkloadRef>) {
        *self.daemon_sets.write().await = daemon_sets;
    }

    pub async fn set_deployments(&self, deployments: Vec<WorkloadRef>) {
        *self.deployments.write().await = deployments;
    }

    pub async fn set_related_objects(&self, related: Vec<ObjectReference>) {
        *self.related_objects.write().await = related;
    }

    /// Derive Progressing/Available from the tracked workloads. Fetch
    /// failures count as still progressing, never as Degraded.
    pub async fn set_from_pods(&self) -> PodsReport {
        self.set_not_degraded(StatusLevel::PodDeployment).await;

        let daemon_sets = self.daemon_sets.read().await.clone();
        let deployments = self.deployments.read().await.clone();
        let report = pods::evaluate(
            self.inspector.as_ref(),
            &daemon_sets,
            &deployments,
            &self.release_version,
        )
        .await;
        debug!(
            name = %self.name,
            reached = report.reached_available_level,
            progressing = report.progressing.len(),
            "set from pods"
        );

        self.enqueue(report.clone().into_status()).await;
        report
    }

    /// Close the queue and wait until everything already queued has been
    /// published.
    pub async fn shutdown(self) {
        let Self { name, queue, worker, .. } = self;
        drop(queue);
        if let Err(e) = worker.await {
            warn!(%name, error = %e, "status publisher task ended abnormally");
        }
    }
}
