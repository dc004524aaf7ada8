use k8s_openapi::api::apps::v1::{
    DaemonSet, DaemonSetStatus, Deployment, DeploymentStatus,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use tracing::{debug, warn};

use super::types::{Status, WorkloadKind, WorkloadRef};
use crate::crd::cluster_operator::{Condition, ConditionStatus, ConditionType};
use crate::inspector::WorkloadInspector;

/// Annotation carrying the release a workload was rendered for.
pub const VERSION_ANNOTATION: &str = "release.openshift.io/version";

/// Outcome of inspecting a single workload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkloadProgress {
    /// Why the workload is still rolling out, if it is.
    pub message: Option<String>,
    /// Fully rolled out at the target release.
    pub at_level: bool,
}

/// Aggregate verdict over every tracked workload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PodsReport {
    pub reached_available_level: bool,
    pub progressing: Vec<String>,
}

impl PodsReport {
    /// Exactly one of Progressing=True (with the joined messages) or
    /// Progressing=False plus Available=True.
    pub fn into_status(self) -> Status {
        let conditions = if self.progressing.is_empty() {
            vec![
                Condition::new(
                    ConditionType::Progressing,
                    ConditionStatus::False,
                ),
                Condition::new(ConditionType::Available, ConditionStatus::True),
            ]
        } else {
            vec![
                Condition::new(ConditionType::Progressing, ConditionStatus::True)
                    .with_reason("Deploying")
                    .with_message(self.progressing.join("\n")),
            ]
        };
        Status::new(conditions, self.reached_available_level)
    }

    fn fold(&mut self, id: &WorkloadRef, progress: WorkloadProgress) {
        if !progress.at_level {
            debug!(workload = %id, "pods: workload not at target level");
            self.reached_available_level = false;
        }
        if let Some(msg) = progress.message {
            self.progressing.push(msg);
        }
    }
}

fn version_annotation(meta: &ObjectMeta) -> &str {
    meta.annotations
        .as_ref()
        .and_then(|a| a.get(VERSION_ANNOTATION))
        .map(String::as_str)
        .unwrap_or_default()
}

pub fn daemon_set_progress(
    id: &WorkloadRef,
    ds: &DaemonSet,
    target_version: &str,
) -> WorkloadProgress {
    let empty = DaemonSetStatus::default();
    let st = ds.status.as_ref().unwrap_or(&empty);
    let generation = ds.metadata.generation.unwrap_or(0);
    let observed_generation = st.observed_generation.unwrap_or(0);
    let desired = st.desired_number_scheduled;
    let updated = st.updated_number_scheduled.unwrap_or(0);
    let unavailable = st.number_unavailable.unwrap_or(0);
    let available = st.number_available.unwrap_or(0);

    let message = if updated < desired {
        Some(format!(
            "DaemonSet \"{id}\" update is rolling out ({updated} out of {desired} updated)"
        ))
    } else if unavailable > 0 {
        Some(format!(
            "DaemonSet \"{id}\" is not available (awaiting {unavailable} nodes)"
        ))
    } else if available == 0 {
        Some(format!(
            "DaemonSet \"{id}\" is not yet scheduled on any nodes"
        ))
    } else if generation > observed_generation {
        Some(format!(
            "DaemonSet \"{id}\" update is being processed (generation {generation}, observed generation {observed_generation})"
        ))
    } else {
        None
    };

    let at_level = generation <= observed_generation
        && updated == desired
        && unavailable == 0
        && version_annotation(&ds.metadata) == target_version;

    WorkloadProgress { message, at_level }
}

pub fn deployment_progress(
    id: &WorkloadRef,
    dep: &Deployment,
    target_version: &str,
) -> WorkloadProgress {
    let empty = DeploymentStatus::default();
    let st = dep.status.as_ref().unwrap_or(&empty);
    let generation = dep.metadata.generation.unwrap_or(0);
    let observed_generation = st.observed_generation.unwrap_or(0);
    let replicas = st.replicas.unwrap_or(0);
    let updated = st.updated_replicas.unwrap_or(0);
    let unavailable = st.unavailable_replicas.unwrap_or(0);
    let available = st.available_replicas.unwrap_or(0);

    let message = if unavailable > 0 {
        Some(format!(
            "Deployment \"{id}\" is not available (awaiting {unavailable} nodes)"
        ))
    } else if available == 0 {
        Some(format!(
            "Deployment \"{id}\" is not yet scheduled on any nodes"
        ))
    } else if observed_generation < generation {
        Some(format!(
            "Deployment \"{id}\" update is being processed (generation {generation}, observed generation {observed_generation})"
        ))
    } else {
        None
    };

    let at_level = generation <= observed_generation
        && updated == replicas
        && available > 0
        && version_annotation(&dep.metadata) == target_version;

    WorkloadProgress { message, at_level }
}

/// Inspect every tracked workload, DaemonSets first.
///
/// A workload that cannot be fetched is reported as still being created and
/// does not affect the availability fold; the config reconciler is expected
/// to raise Degraded itself if it failed to create it. Every workload is
/// visited even once the fold has gone false so all messages are collected.
pub async fn evaluate(
    inspector: &dyn WorkloadInspector,
    daemon_sets: &[WorkloadRef],
    deployments: &[WorkloadRef],
    target_version: &str,
) -> PodsReport {
    let mut report = PodsReport {
        reached_available_level: !daemon_sets.is_empty()
            || !deployments.is_empty(),
        progressing: Vec::new(),
    };

    for id in daemon_sets {
        let progress = match inspector.daemon_set(id).await {
            Ok(ds) => daemon_set_progress(id, &ds, target_version),
            Err(e) => {
                warn!(workload = %id, error = %e, "pods: error getting DaemonSet");
                report
                    .progressing
                    .push(waiting_for(WorkloadKind::DaemonSet, id));
                continue;
            }
        };
        report.fold(id, progress);
    }

    for id in deployments {
        let progress = match inspector.deployment(id).await {
            Ok(dep) => deployment_progress(id, &dep, target_version),
            Err(e) => {
                warn!(workload = %id, error = %e, "pods: error getting Deployment");
                report
                    .progressing
                    .push(waiting_for(WorkloadKind::Deployment, id));
                continue;
            }
        };
        report.fold(id, progress);
    }

    report
}

fn waiting_for(kind: WorkloadKind, id: &WorkloadRef) -> String {
    format!("Waiting for {kind} \"{id}\" to be created")
}
