use envconfig::Envconfig;

use crate::crd::cluster_operator::ObjectReference;
use crate::errors::ConfigError;
use crate::status::WorkloadRef;

#[derive(Envconfig, Clone, Debug)]
pub struct StatusConfig {
    /// Name of the ClusterOperator this process reports through
    #[envconfig(from = "OPERATOR_NAME", default = "network")]
    pub operator_name: String,

    /// Release the operands are expected to converge to. Gates publication of
    /// operand versions and is compared against each workload's version
    /// annotation.
    #[envconfig(from = "RELEASE_VERSION", default = "")]
    pub release_version: String,

    #[envconfig(from = "STATUS_QUEUE_CAPACITY", default = "5")]
    pub queue_capacity: usize,

    /// Interval between pod-derived status refreshes.
    /// Env: STATUS_RESYNC_SECS
    #[envconfig(from = "STATUS_RESYNC_SECS", default = "30")]
    pub resync_secs: u64,

    /// Comma-separated namespace/name list
    #[envconfig(from = "STATUS_DAEMONSETS", default = "")]
    pub daemon_sets: String,

    /// Comma-separated namespace/name list
    #[envconfig(from = "STATUS_DEPLOYMENTS", default = "")]
    pub deployments: String,

    /// Comma-separated group/resource/namespace/name list; group and
    /// namespace may be empty (e.g. "/namespaces//openshift-sdn")
    #[envconfig(from = "STATUS_RELATED_OBJECTS", default = "")]
    pub related_objects: String,
}

impl StatusConfig {
    pub fn daemon_set_refs(&self) -> Result<Vec<WorkloadRef>, ConfigError> {
        parse_workload_refs(&self.daemon_sets)
    }

    pub fn deployment_refs(&self) -> Result<Vec<WorkloadRef>, ConfigError> {
        parse_workload_refs(&self.deployments)
    }

    pub fn related_object_refs(
        &self,
    ) -> Result<Vec<ObjectReference>, ConfigError> {
        parse_related_objects(&self.related_objects)
    }
}

fn entries(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

pub fn parse_workload_refs(raw: &str) -> Result<Vec<WorkloadRef>, ConfigError> {
    entries(raw)
        .map(|entry| match entry.split_once('/') {
            Some((ns, name))
                if !ns.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(WorkloadRef::new(ns, name))
            }
            _ => Err(ConfigError::InvalidWorkloadRef(entry.to_string())),
        })
        .collect()
}

pub fn parse_related_objects(
    raw: &str,
) -> Result<Vec<ObjectReference>, ConfigError> {
    entries(raw)
        .map(|entry| {
            let parts: Vec<&str> = entry.split('/').collect();
            match parts.as_slice() {
                [group, resource, namespace, name]
                    if !resource.is_empty() && !name.is_empty() =>
                {
                    Ok(ObjectReference {
                        group: group.to_string(),
                        resource: resource.to_string(),
                        namespace: namespace.to_string(),
                        name: name.to_string(),
                    })
                }
                _ => Err(ConfigError::InvalidObjectReference(entry.to_string())),
            }
        })
        .collect()
}
