use super::types::StatusLevel;
use crate::crd::cluster_operator::{Condition, ConditionStatus, ConditionType};

/// Per-level Degraded causes. Only the highest-priority one is ever surfaced.
#[derive(Clone, Debug, Default)]
pub struct DegradedLevels {
    failing: [Option<Condition>; StatusLevel::COUNT],
}

impl DegradedLevels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, level: StatusLevel, condition: Option<Condition>) {
        self.failing[level.index()] = condition;
    }

    pub fn get(&self, level: StatusLevel) -> Option<&Condition> {
        self.failing[level.index()].as_ref()
    }

    pub fn is_degraded(&self) -> bool {
        self.failing.iter().any(Option::is_some)
    }

    /// The Degraded condition to publish: the lowest set level, or
    /// Degraded=False when nothing is failing.
    pub fn resolve(&self) -> Condition {
        self.failing
            .iter()
            .flatten()
            .next()
            .cloned()
            .unwrap_or_else(|| {
                Condition::new(ConditionType::Degraded, ConditionStatus::False)
            })
    }
}

pub fn degraded(reason: &str, message: &str) -> Condition {
    Condition::new(ConditionType::Degraded, ConditionStatus::True)
        .with_reason(reason)
        .with_message(message)
}
