//! Storage trait abstraction.

use async_trait::async_trait;
use growth_core::{Goal, GoalId, Habit, HabitId, Metric, MetricId, Task, TaskId};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A stored record could not be parsed
    #[error("Corrupt record {path}: {source}")]
    Corrupt {
        /// File holding the record
        path: String,
        /// Parse failure
        source: serde_json::Error,
    },

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Storage abstraction for Growth data.
///
/// Besides plain CRUD, backends resolve goal linkage: the `*_for_goal`
/// queries return only the entities whose `goal_id` matches.
#[async_trait]
pub trait Storage: Send + Sync {
    // === Goal operations ===

    /// Save a goal (create or update).
    async fn save_goal(&mut self, goal: &Goal) -> Result<()>;

    /// Load a goal by ID.
    async fn load_goal(&self, id: GoalId) -> Result<Option<Goal>>;

    /// List all goals.
    async fn list_goals(&self) -> Result<Vec<Goal>>;

    /// Delete a goal.
    async fn delete_goal(&mut self, id: GoalId) -> Result<()>;

    // === Task operations ===

    /// Save a task (create or update).
    async fn save_task(&mut self, task: &Task) -> Result<()>;

    /// Load a task by ID.
    async fn load_task(&self, id: TaskId) -> Result<Option<Task>>;

    /// List all tasks.
    async fn list_tasks(&self) -> Result<Vec<Task>>;

    /// Delete a task.
    async fn delete_task(&mut self, id: TaskId) -> Result<()>;

    // === Metric operations ===

    /// Save a metric (create or update).
    async fn save_metric(&mut self, metric: &Metric) -> Result<()>;

    /// Load a metric by ID.
    async fn load_metric(&self, id: MetricId) -> Result<Option<Metric>>;

    /// List all metrics.
    async fn list_metrics(&self) -> Result<Vec<Metric>>;

    /// Delete a metric.
    async fn delete_metric(&mut self, id: MetricId) -> Result<()>;

    // === Habit operations ===

    /// Save a habit (create or update).
    async fn save_habit(&mut self, habit: &Habit) -> Result<()>;

    /// Load a habit by ID.
    async fn load_habit(&self, id: HabitId) -> Result<Option<Habit>>;

    /// List all habits.
    async fn list_habits(&self) -> Result<Vec<Habit>>;

    /// Delete a habit.
    async fn delete_habit(&mut self, id: HabitId) -> Result<()>;

    // === Linkage ===

    /// Tasks linked to a goal.
    async fn list_tasks_for_goal(&self, goal_id: GoalId) -> Result<Vec<Task>> {
        let tasks = self.list_tasks().await?;
        Ok(tasks.into_iter().filter(|t| t.goal_id == Some(goal_id)).collect())
    }

    /// Metrics linked to a goal.
    async fn list_metrics_for_goal(&self, goal_id: GoalId) -> Result<Vec<Metric>> {
        let metrics = self.list_metrics().await?;
        Ok(metrics.into_iter().filter(|m| m.goal_id == Some(goal_id)).collect())
    }

    /// Habits linked to a goal.
    async fn list_habits_for_goal(&self, goal_id: GoalId) -> Result<Vec<Habit>> {
        let habits = self.list_habits().await?;
        Ok(habits.into_iter().filter(|h| h.goal_id == Some(goal_id)).collect())
    }

    /// Goals whose parent is `goal_id`.
    async fn list_child_goals(&self, goal_id: GoalId) -> Result<Vec<Goal>> {
        let goals = self.list_goals().await?;
        Ok(goals.into_iter().filter(|g| g.parent_goal_id == Some(goal_id)).collect())
    }
}
