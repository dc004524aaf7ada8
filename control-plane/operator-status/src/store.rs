use async_trait::async_trait;
use kube::{
    Client,
    api::{Api, PostParams},
};
use tracing::trace;

use crate::crd::cluster_operator::ClusterOperator;
use crate::errors::StoreError;

/// Backing store for the persisted `ClusterOperator`.
///
/// `get` must report a missing object as [`StoreError::NotFound`]; the
/// publisher relies on that to pick the create path.
#[async_trait]
pub trait StatusStore: Send + Sync {
    async fn get(&self, name: &str) -> Result<ClusterOperator, StoreError>;

    async fn create(&self, obj: &ClusterOperator) -> Result<(), StoreError>;

    /// Write only the status subresource of an existing object.
    async fn update_status(
        &self,
        obj: &ClusterOperator,
    ) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct KubeStatusStore {
    api: Api<ClusterOperator>,
}

impl KubeStatusStore {
    pub fn new(client: Client) -> Self {
        Self {
            api: Api::all(client),
        }
    }
}

#[async_trait]
impl StatusStore for KubeStatusStore {
    async fn get(&self, name: &str) -> Result<ClusterOperator, StoreError> {
        match self.api.get(name).await {
            Ok(co) => Ok(co),
            Err(kube::Error::Api(ae)) if ae.code == 404 => {
                Err(StoreError::NotFound(format!("ClusterOperator {name:?}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn create(&self, obj: &ClusterOperator) -> Result<(), StoreError> {
        let created = self.api.create(&PostParams::default(), obj).await?;
        trace!(
            name = %obj.metadata.name.as_deref().unwrap_or_default(),
            resource_version = ?created.metadata.resource_version,
            "store: created"
        );
        Ok(())
    }

    async fn update_status(
        &self,
        obj: &ClusterOperator,
    ) -> Result<(), StoreError> {
        let name = obj.metadata.name.as_deref().ok_or_else(|| {
            StoreError::Internal("ClusterOperator without a name".into())
        })?;
        let data = serde_json::to_vec(obj)?;
        self.api
            .replace_status(name, &PostParams::default(), data)
            .await?;
        Ok(())
    }
}
