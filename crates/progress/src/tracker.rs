//! Progress tracking service.
//!
//! Fetches a goal's linked entities from storage and runs the engine. If the
//! linked entities cannot be loaded, the tracker degrades to a criteria-only
//! breakdown instead of surfacing the error.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use growth_core::{Goal, GoalId, GoalProgressBreakdown, Habit, Metric, Task};
use growth_storage::{Storage, StorageError};
use tracing::{debug, warn};

use crate::engine::GoalProgressEngine;

/// Error type for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Errors that can occur while tracking progress.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// The goal itself could not be loaded
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Progress tracking service.
#[async_trait]
pub trait ProgressTracker: Send + Sync {
    /// Breakdown for one goal, or `None` if the goal does not exist.
    async fn goal_progress(&self, goal_id: GoalId) -> Result<Option<GoalProgressBreakdown>>;

    /// Take a progress snapshot of every goal.
    async fn snapshot(&self) -> Result<ProgressSnapshot>;
}

/// A snapshot of progress at a point in time.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProgressSnapshot {
    /// When snapshot was taken
    pub timestamp: DateTime<Utc>,

    /// Goal progress by goal ID
    pub goal_progress: Vec<(GoalId, GoalProgressBreakdown)>,
}

/// Basic progress tracker implementation.
pub struct BasicProgressTracker<S: Storage> {
    storage: Arc<S>,
    engine: GoalProgressEngine,
    as_of: Option<NaiveDate>,
}

impl<S: Storage> BasicProgressTracker<S> {
    /// Create a new progress tracker.
    pub fn new(storage: S) -> Self {
        Self::from_arc(Arc::new(storage))
    }

    /// Create a tracker over shared storage.
    pub fn from_arc(storage: Arc<S>) -> Self {
        Self {
            storage,
            engine: GoalProgressEngine::default(),
            as_of: None,
        }
    }

    /// Use a configured engine.
    pub fn with_engine(mut self, engine: GoalProgressEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Evaluate habits as of a fixed day instead of today.
    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }

    fn today(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Utc::now().date_naive())
    }

    async fn load_linked(
        &self,
        goal_id: GoalId,
    ) -> std::result::Result<(Vec<Task>, Vec<Metric>, Vec<Habit>), StorageError> {
        let tasks = self.storage.list_tasks_for_goal(goal_id).await?;
        let metrics = self.storage.list_metrics_for_goal(goal_id).await?;
        let habits = self.storage.list_habits_for_goal(goal_id).await?;
        Ok((tasks, metrics, habits))
    }

    /// Compute the breakdown for an already-loaded goal.
    pub async fn progress_for(&self, goal: &Goal) -> GoalProgressBreakdown {
        match self.load_linked(goal.id).await {
            Ok((tasks, metrics, habits)) => {
                debug!(
                    "Goal {}: {} tasks, {} metrics, {} habits linked",
                    goal.id,
                    tasks.len(),
                    metrics.len(),
                    habits.len()
                );
                self.engine
                    .compute_progress_at(goal, &tasks, &metrics, &habits, self.today())
            }
            Err(e) => {
                warn!(
                    "Failed to load linked entities for goal {}, using criteria only: {}",
                    goal.id, e
                );
                GoalProgressBreakdown::criteria_only(&goal.success_criteria)
            }
        }
    }
}

#[async_trait]
impl<S: Storage + 'static> ProgressTracker for BasicProgressTracker<S> {
    async fn goal_progress(&self, goal_id: GoalId) -> Result<Option<GoalProgressBreakdown>> {
        let Some(goal) = self.storage.load_goal(goal_id).await? else {
            return Ok(None);
        };
        Ok(Some(self.progress_for(&goal).await))
    }

    async fn snapshot(&self) -> Result<ProgressSnapshot> {
        let goals = self.storage.list_goals().await?;
        let mut goal_progress = Vec::with_capacity(goals.len());

        for goal in goals {
            let progress = self.progress_for(&goal).await;
            goal_progress.push((goal.id, progress));
        }

        Ok(ProgressSnapshot {
            timestamp: Utc::now(),
            goal_progress,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use growth_core::{HabitId, MetricId, SuccessCriterion, TaskId, TaskStatus};
    use growth_storage::{JsonStorage, Result as StorageResult};

    #[derive(Default)]
    struct MemoryStorage {
        goals: Vec<Goal>,
        tasks: Vec<Task>,
        metrics: Vec<Metric>,
        habits: Vec<Habit>,
        fail_linked: bool,
    }

    impl MemoryStorage {
        fn check(&self) -> StorageResult<()> {
            if self.fail_linked {
                Err(StorageError::Other("backend unavailable".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl Storage for MemoryStorage {
        async fn save_goal(&mut self, goal: &Goal) -> StorageResult<()> { self.goals.push(goal.clone()); Ok(()) }
        async fn load_goal(&self, id: GoalId) -> StorageResult<Option<Goal>> { Ok(self.goals.iter().find(|g| g.id == id).cloned()) }
        async fn list_goals(&self) -> StorageResult<Vec<Goal>> { Ok(self.goals.clone()) }
        async fn delete_goal(&mut self, id: GoalId) -> StorageResult<()> { self.goals.retain(|g| g.id != id); Ok(()) }
        async fn save_task(&mut self, task: &Task) -> StorageResult<()> { self.tasks.push(task.clone()); Ok(()) }
        async fn load_task(&self, id: TaskId) -> StorageResult<Option<Task>> { Ok(self.tasks.iter().find(|t| t.id == id).cloned()) }
        async fn list_tasks(&self) -> StorageResult<Vec<Task>> { self.check()?; Ok(self.tasks.clone()) }
        async fn delete_task(&mut self, id: TaskId) -> StorageResult<()> { self.tasks.retain(|t| t.id != id); Ok(()) }
        async fn save_metric(&mut self, metric: &Metric) -> StorageResult<()> { self.metrics.push(metric.clone()); Ok(()) }
        async fn load_metric(&self, id: MetricId) -> StorageResult<Option<Metric>> { Ok(self.metrics.iter().find(|m| m.id == id).cloned()) }
        async fn list_metrics(&self) -> StorageResult<Vec<Metric>> { self.check()?; Ok(self.metrics.clone()) }
        async fn delete_metric(&mut self, id: MetricId) -> StorageResult<()> { self.metrics.retain(|m| m.id != id); Ok(()) }
        async fn save_habit(&mut self, habit: &Habit) -> StorageResult<()> { self.habits.push(habit.clone()); Ok(()) }
        async fn load_habit(&self, id: HabitId) -> StorageResult<Option<Habit>> { Ok(self.habits.iter().find(|h| h.id == id).cloned()) }
        async fn list_habits(&self) -> StorageResult<Vec<Habit>> { self.check()?; Ok(self.habits.clone()) }
        async fn delete_habit(&mut self, id: HabitId) -> StorageResult<()> { self.habits.retain(|h| h.id != id); Ok(()) }
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    async fn seeded(fail_linked: bool) -> (MemoryStorage, Goal) {
        let mut storage = MemoryStorage::default();
        let goal = Goal::new("Ship side project")
            .with_criterion(SuccessCriterion::completed("Pick a name"))
            .with_criterion(SuccessCriterion::new("Launch"));
        storage.save_goal(&goal).await.unwrap();
        storage.save_task(&Task::new("a").for_goal(goal.id).with_status(TaskStatus::Completed)).await.unwrap();
        storage.save_task(&Task::new("b").for_goal(goal.id).with_status(TaskStatus::Completed)).await.unwrap();
        storage.save_task(&Task::new("unrelated")).await.unwrap();
        storage.fail_linked = fail_linked;
        (storage, goal)
    }

    #[tokio::test]
    async fn test_goal_progress_uses_linked_entities() {
        let (storage, goal) = seeded(false).await;
        let tracker = BasicProgressTracker::new(storage).with_as_of(as_of());

        let progress = tracker.goal_progress(goal.id).await.unwrap().unwrap();
        assert_eq!(progress.criteria.percentage, 50);
        assert_eq!(progress.tasks.total, 2);
        assert_eq!(progress.tasks.percentage, 100);
        assert_eq!(progress.overall, 75);
        assert!(!progress.fallback);
    }

    #[tokio::test]
    async fn test_fetch_failure_falls_back_to_criteria() {
        let (storage, goal) = seeded(true).await;
        let tracker = BasicProgressTracker::new(storage).with_as_of(as_of());

        let progress = tracker.goal_progress(goal.id).await.unwrap().unwrap();
        assert!(progress.fallback);
        assert_eq!(progress.overall, 50);
        assert_eq!(progress.tasks.total, 0);
    }

    async fn json_store_with_partial_tasks() -> (tempfile::TempDir, JsonStorage, Goal) {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        let goal = Goal::new("Finish course").with_criterion(SuccessCriterion::new("Pass exam"));
        storage.save_goal(&goal).await.unwrap();

        for (name, status) in [("done", "Completed"), ("open", "InProgress")] {
            let record = serde_json::json!({
                "id": TaskId::new(),
                "title": name,
                "status": status,
                "goal_id": goal.id,
            });
            std::fs::write(dir.path().join("tasks").join(format!("{}.json", name)), record.to_string()).unwrap();
        }
        (dir, storage, goal)
    }

    #[tokio::test]
    async fn test_partial_linked_records_still_count() {
        let (_dir, storage, goal) = json_store_with_partial_tasks().await;
        let tracker = BasicProgressTracker::new(storage).with_as_of(as_of());

        let progress = tracker.goal_progress(goal.id).await.unwrap().unwrap();
        assert!(!progress.fallback);
        assert_eq!(progress.tasks.completed, 1);
        assert_eq!(progress.tasks.total, 2);
        assert_eq!(progress.tasks.percentage, 50);
        assert_eq!(progress.overall, 25);
    }

    #[tokio::test]
    async fn test_corrupt_linked_record_falls_back_to_criteria() {
        let (dir, storage, goal) = json_store_with_partial_tasks().await;
        std::fs::write(dir.path().join("metrics").join("bad.json"), r#"{"name": "no id"}"#).unwrap();
        let tracker = BasicProgressTracker::new(storage).with_as_of(as_of());

        let progress = tracker.goal_progress(goal.id).await.unwrap().unwrap();
        assert!(progress.fallback);
        assert_eq!(progress.tasks.total, 0);
        assert_eq!(progress.criteria.total, 1);
        assert_eq!(progress.overall, 0);
    }

    #[tokio::test]
    async fn test_missing_goal() {
        let tracker = BasicProgressTracker::new(MemoryStorage::default());
        assert!(tracker.goal_progress(GoalId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_snapshot_covers_all_goals() {
        let (mut storage, goal) = seeded(false).await;
        let empty = Goal::new("Someday");
        storage.save_goal(&empty).await.unwrap();
        let tracker = BasicProgressTracker::new(storage).with_as_of(as_of());

        let snapshot = tracker.snapshot().await.unwrap();
        assert_eq!(snapshot.goal_progress.len(), 2);
        let (_, first) = snapshot.goal_progress.iter().find(|(id, _)| *id == goal.id).unwrap();
        assert_eq!(first.overall, 75);
        let (_, second) = snapshot.goal_progress.iter().find(|(id, _)| *id == empty.id).unwrap();
        assert_eq!(second.overall, 0);
    }
}
