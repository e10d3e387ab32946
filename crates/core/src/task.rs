//! Task model - a unit of work that may be linked to a goal.

use serde::{Deserialize, Serialize};
use crate::id::{GoalId, TaskId};
use crate::{ParseError, Time};

/// A task contributes a binary completed signal to its goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Task title
    pub title: String,

    /// Current status
    #[serde(default)]
    pub status: TaskStatus,

    /// Goal this task is linked to
    #[serde(default)]
    pub goal_id: Option<GoalId>,

    /// Creation timestamp
    #[serde(default = "chrono::Utc::now")]
    pub created_at: Time,

    /// Last update timestamp
    #[serde(default = "chrono::Utc::now")]
    pub updated_at: Time,
}

impl Task {
    /// Create a new, not-started task.
    pub fn new(title: impl Into<String>) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: TaskId::new(),
            title: title.into(),
            status: TaskStatus::NotStarted,
            goal_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Link the task to a goal.
    pub fn for_goal(mut self, goal_id: GoalId) -> Self {
        self.goal_id = Some(goal_id);
        self
    }

    /// Set the status.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether the task counts as completed for progress.
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

/// Task status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Not started yet
    #[default]
    NotStarted,
    /// Being worked on
    InProgress,
    /// Done
    Completed,
    /// Waiting on something else
    Blocked,
    /// Dropped; still counts toward the goal's total
    Cancelled,
}

impl TaskStatus {
    /// All statuses, in workflow order.
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Blocked,
        TaskStatus::Cancelled,
    ];

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "not-started",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
            TaskStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['_', ' '], "-").as_str() {
            "not-started" | "todo" => Ok(TaskStatus::NotStarted),
            "in-progress" | "active" => Ok(TaskStatus::InProgress),
            "completed" | "done" => Ok(TaskStatus::Completed),
            "blocked" => Ok(TaskStatus::Blocked),
            "cancelled" | "canceled" => Ok(TaskStatus::Cancelled),
            _ => Err(ParseError::UnknownVariant {
                kind: "task status",
                value: s.to_string(),
            }),
        }
    }
}
