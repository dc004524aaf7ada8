use async_trait::async_trait;
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment};
use kube::{Client, api::Api};

use crate::errors::InspectError;
use crate::status::types::WorkloadRef;

/// Read-only view of the workloads whose rollout state feeds the
/// Progressing/Available conditions.
#[async_trait]
pub trait WorkloadInspector: Send + Sync {
    async fn daemon_set(
        &self,
        id: &WorkloadRef,
    ) -> Result<DaemonSet, InspectError>;

    async fn deployment(
        &self,
        id: &WorkloadRef,
    ) -> Result<Deployment, InspectError>;
}

#[derive(Clone)]
pub struct KubeWorkloadInspector {
    client: Client,
}

impl KubeWorkloadInspector {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn map_kube_err(kind: &str, id: &WorkloadRef, e: kube::Error) -> InspectError {
    match e {
        kube::Error::Api(ae) if ae.code == 404 => {
            InspectError::NotFound(format!("{kind} {id}"))
        }
        other => InspectError::Kube(other),
    }
}

#[async_trait]
impl WorkloadInspector for KubeWorkloadInspector {
    async fn daemon_set(
        &self,
        id: &WorkloadRef,
    ) -> Result<DaemonSet, InspectError> {
        let api: Api<DaemonSet> =
            Api::namespaced(self.client.clone(), &id.namespace);
        api.get(&id.name)
            .await
            .map_err(|e| map_kube_err("DaemonSet", id, e))
    }

    async fn deployment(
        &self,
        id: &WorkloadRef,
    ) -> Result<Deployment, InspectError> {
        let api: Api<Deployment> =
            Api::namespaced(self.client.clone(), &id.namespace);
        api.get(&id.name)
            .await
            .map_err(|e| map_kube_err("Deployment", id, e))
    }
}
