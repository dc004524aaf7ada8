use std::collections::{BTreeMap, BTreeSet};

use super::types::Status;
use crate::crd::cluster_operator::{
    ClusterOperatorStatus, Condition, ConditionStatus, ConditionType,
    ObjectReference, OperandVersion,
};

pub const OPERATOR_OPERAND: &str = "operator";

pub fn find_condition<'a>(
    conditions: &'a [Condition],
    type_: &ConditionType,
) -> Option<&'a Condition> {
    conditions.iter().find(|c| &c.type_ == type_)
}

/// Upsert `incoming` by type. The transition time moves only when the status
/// value actually changes.
pub fn set_condition(
    conditions: &mut Vec<Condition>,
    mut incoming: Condition,
    now: &str,
) {
    match conditions.iter_mut().find(|c| c.type_ == incoming.type_) {
        Some(existing) => {
            if existing.status != incoming.status {
                existing.status = incoming.status;
                existing.last_transition_time = Some(now.to_string());
            }
            existing.reason = incoming.reason;
            existing.message = incoming.message;
        }
        None => {
            incoming.last_transition_time = Some(now.to_string());
            conditions.push(incoming);
        }
    }
}

/// Fold one queued `Status` into the current persisted status.
///
/// Related objects are replaced wholesale. Versions are only touched once the
/// operands reached the target level; otherwise whatever was last published
/// stays. Upgradeable is always forced to True, and Available=False/Startup is
/// synthesized when Progressing=True is about to be reported before any
/// Available condition exists.
pub fn merge_status(
    current: &ClusterOperatorStatus,
    status: &Status,
    related_objects: &[ObjectReference],
    release_version: &str,
    now: &str,
) -> ClusterOperatorStatus {
    let mut out = current.clone();
    out.related_objects = related_objects.to_vec();

    if status.reached_available_level {
        out.versions = if release_version.is_empty() {
            Vec::new()
        } else {
            vec![OperandVersion {
                name: OPERATOR_OPERAND.to_string(),
                version: release_version.to_string(),
            }]
        };
    }

    for c in &status.conditions {
        set_condition(&mut out.conditions, c.clone(), now);
    }

    let available =
        find_condition(&out.conditions, &ConditionType::Available).is_some();
    let progressing =
        find_condition(&out.conditions, &ConditionType::Progressing)
            .is_some_and(Condition::is_true);
    if !available && progressing {
        set_condition(
            &mut out.conditions,
            Condition::new(ConditionType::Available, ConditionStatus::False)
                .with_reason("Startup")
                .with_message("The operator is starting up"),
            now,
        );
    }

    set_condition(
        &mut out.conditions,
        Condition::new(ConditionType::Upgradeable, ConditionStatus::True),
        now,
    );

    out
}

/// Order-insensitive view of a status used to decide whether a write is
/// needed at all.
#[derive(Debug, PartialEq, Eq)]
pub struct StatusSnapshot {
    conditions: BTreeMap<ConditionType, Condition>,
    versions: BTreeMap<String, String>,
    related_objects: BTreeSet<ObjectReference>,
}

impl From<&ClusterOperatorStatus> for StatusSnapshot {
    fn from(s: &ClusterOperatorStatus) -> Self {
        Self {
            conditions: s
                .conditions
                .iter()
                .map(|c| (c.type_.clone(), c.clone()))
                .collect(),
            versions: s
                .versions
                .iter()
                .map(|v| (v.name.clone(), v.version.clone()))
                .collect(),
            related_objects: s.related_objects.iter().cloned().collect(),
        }
    }
}

pub fn should_write(
    current: &ClusterOperatorStatus,
    desired: &ClusterOperatorStatus,
) -> bool {
    StatusSnapshot::from(current) != StatusSnapshot::from(desired)
}
