//! Goal model - top-level objective scored from its criteria and linked entities.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::id::{CriterionId, GoalId, MetricId};
use crate::Time;

/// A goal is a user objective that aggregates progress from its own success
/// criteria and from the tasks, metrics and habits linked to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    /// Unique identifier
    pub id: GoalId,

    /// Goal title
    pub title: String,

    /// Detailed description
    #[serde(default)]
    pub description: String,

    /// Success criteria, in display order
    #[serde(default)]
    pub success_criteria: Vec<SuccessCriterion>,

    /// Parent goal (non-owning back-reference)
    #[serde(default)]
    pub parent_goal_id: Option<GoalId>,

    /// Goal status
    #[serde(default)]
    pub status: GoalStatus,

    /// When created
    #[serde(default = "chrono::Utc::now")]
    pub created_at: Time,

    /// Last updated
    #[serde(default = "chrono::Utc::now")]
    pub updated_at: Time,
}

impl Goal {
    /// Create a new active goal with no criteria.
    pub fn new(title: impl Into<String>) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: GoalId::new(),
            title: title.into(),
            description: String::new(),
            success_criteria: Vec::new(),
            parent_goal_id: None,
            status: GoalStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a success criterion.
    pub fn with_criterion(mut self, criterion: SuccessCriterion) -> Self {
        self.success_criteria.push(criterion);
        self
    }

    /// Set the parent goal.
    pub fn with_parent(mut self, parent: GoalId) -> Self {
        self.parent_goal_id = Some(parent);
        self
    }
}

/// Goal status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalStatus {
    /// Goal is active
    #[default]
    Active,
    /// Goal completed
    Completed,
    /// Goal paused
    Paused,
    /// Goal archived
    Archived,
}

/// A discrete checklist item attached to a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessCriterion {
    /// Unique identifier
    pub id: CriterionId,

    /// Description
    pub description: String,

    /// Whether the criterion has been met
    #[serde(default)]
    pub is_completed: bool,

    /// Optional target date
    #[serde(default)]
    pub target_date: Option<NaiveDate>,

    /// Metric this criterion tracks, if any
    #[serde(default)]
    pub linked_metric_id: Option<MetricId>,
}

impl SuccessCriterion {
    /// Create an open criterion.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: CriterionId::new(),
            description: description.into(),
            is_completed: false,
            target_date: None,
            linked_metric_id: None,
        }
    }

    /// Create a criterion that is already met.
    pub fn completed(description: impl Into<String>) -> Self {
        Self {
            is_completed: true,
            ..Self::new(description)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_builder() {
        let parent = GoalId::new();
        let goal = Goal::new("Run a marathon")
            .with_criterion(SuccessCriterion::completed("Buy shoes"))
            .with_criterion(SuccessCriterion::new("Finish race"))
            .with_parent(parent);

        assert_eq!(goal.success_criteria.len(), 2);
        assert!(goal.success_criteria[0].is_completed);
        assert!(!goal.success_criteria[1].is_completed);
        assert_eq!(goal.parent_goal_id, Some(parent));
        assert_eq!(goal.status, GoalStatus::Active);
    }

    #[test]
    fn test_goal_missing_criteria_defaults_to_empty() {
        let json = serde_json::json!({
            "id": GoalId::new(),
            "title": "Partially loaded",
            "created_at": chrono::Utc::now(),
            "updated_at": chrono::Utc::now(),
        });
        let goal: Goal = serde_json::from_value(json).unwrap();
        assert!(goal.success_criteria.is_empty());
        assert!(goal.parent_goal_id.is_none());
    }
}
