use crate::crd::cluster_operator::Condition;

/// Priority tier of a Degraded cause. Lower tiers win when several are set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatusLevel {
    ClusterConfig = 0,
    OperatorConfig = 1,
    PodDeployment = 2,
}

impl StatusLevel {
    pub const COUNT: usize = 3;

    /// All levels in priority order.
    pub const ALL: [StatusLevel; StatusLevel::COUNT] = [
        StatusLevel::ClusterConfig,
        StatusLevel::OperatorConfig,
        StatusLevel::PodDeployment,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusLevel::ClusterConfig => write!(f, "cluster-config"),
            StatusLevel::OperatorConfig => write!(f, "operator-config"),
            StatusLevel::PodDeployment => write!(f, "pod-deployment"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkloadKind {
    DaemonSet,
    Deployment,
}

impl std::fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkloadKind::DaemonSet => write!(f, "DaemonSet"),
            WorkloadKind::Deployment => write!(f, "Deployment"),
        }
    }
}

/// Namespaced identity of a tracked workload.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WorkloadRef {
    pub namespace: String,
    pub name: String,
}

impl WorkloadRef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for WorkloadRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// A single unit of work for the publisher: conditions to merge, plus
/// whether operand versions may be published alongside them.
#[derive(Clone, Debug, PartialEq)]
pub struct Status {
    pub conditions: Vec<Condition>,
    pub reached_available_level: bool,
}

impl Status {
    pub fn new(conditions: Vec<Condition>, reached_available_level: bool) -> Self {
        Self {
            conditions,
            reached_available_level,
        }
    }
}
