#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::{
    DaemonSet, DaemonSetStatus, Deployment, DeploymentStatus,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use tokio::sync::{Mutex, RwLock};

use operator_status::crd::cluster_operator::{
    ClusterOperator, ClusterOperatorStatus, Condition, ConditionType,
};
use operator_status::errors::{InspectError, StoreError};
use operator_status::inspector::WorkloadInspector;
use operator_status::status::WorkloadRef;
use operator_status::status::pods::VERSION_ANNOTATION;
use operator_status::store::StatusStore;

pub const RELEASE: &str = "4.15.0";

/// In-memory ClusterOperator store. Enforces resourceVersion on status
/// updates the way the API server does, and counts calls that overlap.
#[derive(Default)]
pub struct MemoryStore {
    object: Mutex<Option<ClusterOperator>>,
    resource_version: AtomicU64,
    creates: AtomicUsize,
    updates: AtomicUsize,
    conflicts: AtomicUsize,
    in_flight: AtomicUsize,
    overlaps: AtomicUsize,
    fail_gets: AtomicBool,
    fail_writes: AtomicBool,
    /// Held by a test to stall the publisher inside `get`.
    pub hold: Mutex<()>,
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    async fn enter(&self) -> InFlight<'_> {
        if self.in_flight.fetch_add(1, Ordering::SeqCst) > 0 {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        let guard = InFlight(&self.in_flight);
        tokio::task::yield_now().await;
        guard
    }

    pub async fn seed(&self, status: ClusterOperatorStatus) {
        let mut co = ClusterOperator::new("network", Default::default());
        co.status = Some(status);
        co.metadata.resource_version = Some(
            (self.resource_version.fetch_add(1, Ordering::SeqCst) + 1)
                .to_string(),
        );
        *self.object.lock().await = Some(co);
    }

    pub async fn status(&self) -> Option<ClusterOperatorStatus> {
        self.object.lock().await.as_ref().and_then(|co| co.status.clone())
    }

    pub async fn condition(&self, type_: ConditionType) -> Option<Condition> {
        self.status()
            .await
            .and_then(|s| s.conditions.into_iter().find(|c| c.type_ == type_))
    }

    pub fn writes(&self) -> usize {
        self.creates.load(Ordering::SeqCst) + self.updates.load(Ordering::SeqCst)
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn conflicts(&self) -> usize {
        self.conflicts.load(Ordering::SeqCst)
    }

    pub fn overlaps(&self) -> usize {
        self.overlaps.load(Ordering::SeqCst)
    }

    pub fn fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn next_version(&self) -> String {
        (self.resource_version.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }
}

#[async_trait]
impl StatusStore for MemoryStore {
    async fn get(&self, name: &str) -> Result<ClusterOperator, StoreError> {
        let _hold = self.hold.lock().await;
        let _g = self.enter().await;
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(StoreError::Internal("injected get failure".into()));
        }
        self.object
            .lock()
            .await
            .clone()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn create(&self, obj: &ClusterOperator) -> Result<(), StoreError> {
        let _g = self.enter().await;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Internal("injected create failure".into()));
        }
        let mut slot = self.object.lock().await;
        if slot.is_some() {
            return Err(StoreError::Internal("already exists".into()));
        }
        let mut co = obj.clone();
        co.metadata.resource_version = Some(self.next_version());
        *slot = Some(co);
        self.creates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn update_status(
        &self,
        obj: &ClusterOperator,
    ) -> Result<(), StoreError> {
        let _g = self.enter().await;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Internal("injected update failure".into()));
        }
        let mut slot = self.object.lock().await;
        let Some(stored) = slot.as_mut() else {
            return Err(StoreError::NotFound("network".into()));
        };
        if stored.metadata.resource_version != obj.metadata.resource_version {
            self.conflicts.fetch_add(1, Ordering::SeqCst);
            return Err(StoreError::Internal("conflict".into()));
        }
        stored.status = obj.status.clone();
        stored.metadata.resource_version = Some(self.next_version());
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeInspector {
    daemon_sets: RwLock<HashMap<String, DaemonSet>>,
    deployments: RwLock<HashMap<String, Deployment>>,
}

impl FakeInspector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn put_daemon_set(&self, id: &WorkloadRef, ds: DaemonSet) {
        self.daemon_sets.write().await.insert(id.to_string(), ds);
    }

    pub async fn put_deployment(&self, id: &WorkloadRef, dep: Deployment) {
        self.deployments.write().await.insert(id.to_string(), dep);
    }
}

#[async_trait]
impl WorkloadInspector for FakeInspector {
    async fn daemon_set(
        &self,
        id: &WorkloadRef,
    ) -> Result<DaemonSet, InspectError> {
        self.daemon_sets
            .read()
            .await
            .get(&id.to_string())
            .cloned()
            .ok_or_else(|| InspectError::NotFound(id.to_string()))
    }

    async fn deployment(
        &self,
        id: &WorkloadRef,
    ) -> Result<Deployment, InspectError> {
        self.deployments
            .read()
            .await
            .get(&id.to_string())
            .cloned()
            .ok_or_else(|| InspectError::NotFound(id.to_string()))
    }
}

fn versioned_meta(generation: i64, version: &str) -> ObjectMeta {
    ObjectMeta {
        generation: Some(generation),
        annotations: Some(BTreeMap::from([(
            VERSION_ANNOTATION.to_string(),
            version.to_string(),
        )])),
        ..Default::default()
    }
}

/// Fully rolled out DaemonSet on `nodes` nodes.
pub fn ready_daemon_set(nodes: i32, version: &str) -> DaemonSet {
    DaemonSet {
        metadata: versioned_meta(1, version),
        status: Some(DaemonSetStatus {
            desired_number_scheduled: nodes,
            updated_number_scheduled: Some(nodes),
            number_available: Some(nodes),
            number_unavailable: Some(0),
            observed_generation: Some(1),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// DaemonSet with `updated` of `nodes` pods on the new revision.
pub fn rolling_daemon_set(nodes: i32, updated: i32, version: &str) -> DaemonSet {
    DaemonSet {
        metadata: versioned_meta(2, version),
        status: Some(DaemonSetStatus {
            desired_number_scheduled: nodes,
            updated_number_scheduled: Some(updated),
            number_available: Some(nodes),
            number_unavailable: Some(0),
            observed_generation: Some(2),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn ready_deployment(replicas: i32, version: &str) -> Deployment {
    Deployment {
        metadata: versioned_meta(1, version),
        status: Some(DeploymentStatus {
            replicas: Some(replicas),
            updated_replicas: Some(replicas),
            available_replicas: Some(replicas),
            unavailable_replicas: Some(0),
            observed_generation: Some(1),
            ..Default::default()
        }),
        ..Default::default()
    }
}
