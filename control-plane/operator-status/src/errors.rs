use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

#[derive(Error, Debug)]
pub enum InspectError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid workload reference {0:?}: expected namespace/name")]
    InvalidWorkloadRef(String),

    #[error(
        "invalid related object {0:?}: expected group/resource/namespace/name"
    )]
    InvalidObjectReference(String),
}
