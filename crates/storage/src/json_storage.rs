//! JSON file storage implementation.
//!
//! Stores one pretty-printed JSON file per entity in a `.growth` directory:
//! `goals/`, `tasks/`, `metrics/` and `habits/`, each named `<id>.json`.

use std::path::{Path, PathBuf};

use growth_core::{Goal, GoalId, Habit, HabitId, Metric, MetricId, Task, TaskId};
use serde::Serialize;
use tokio::fs;
use tracing::{debug, warn};

use super::{Result, Storage, StorageError};

const GOALS: &str = "goals";
const TASKS: &str = "tasks";
const METRICS: &str = "metrics";
const HABITS: &str = "habits";

/// File-based JSON storage backend.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Create storage rooted at `root`, creating the entity directories.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        for kind in [GOALS, TASKS, METRICS, HABITS] {
            fs::create_dir_all(root.join(kind)).await?;
        }

        debug!("Opened JSON storage at {}", root.display());
        Ok(Self { root })
    }

    /// Root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entity_path(&self, kind: &str, id: impl std::fmt::Display) -> PathBuf {
        self.root.join(kind).join(format!("{}.json", id))
    }

    async fn write<T: Serialize>(&self, kind: &str, id: impl std::fmt::Display, value: &T) -> Result<()> {
        let path = self.entity_path(kind, id);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json.as_bytes()).await?;
        Ok(())
    }

    async fn remove(&self, kind: &str, id: impl std::fmt::Display) -> Result<()> {
        fs::remove_file(self.entity_path(kind, id)).await.or_else(|e| {
            if e.kind() == std::io::ErrorKind::NotFound { Ok(()) } else { Err(e) }
        })?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn save_goal(&mut self, goal: &Goal) -> Result<()> {
        self.write(GOALS, goal.id, goal).await
    }

    async fn load_goal(&self, id: GoalId) -> Result<Option<Goal>> {
        read_json(&self.entity_path(GOALS, id)).await
    }

    async fn list_goals(&self) -> Result<Vec<Goal>> {
        let mut goals: Vec<Goal> = list_dir(&self.root.join(GOALS)).await?;
        goals.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(goals)
    }

    async fn delete_goal(&mut self, id: GoalId) -> Result<()> {
        self.remove(GOALS, id).await
    }

    async fn save_task(&mut self, task: &Task) -> Result<()> {
        self.write(TASKS, task.id, task).await
    }

    async fn load_task(&self, id: TaskId) -> Result<Option<Task>> {
        read_json(&self.entity_path(TASKS, id)).await
    }

    async fn list_tasks(&self) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = list_dir(&self.root.join(TASKS)).await?;
        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(tasks)
    }

    async fn delete_task(&mut self, id: TaskId) -> Result<()> {
        self.remove(TASKS, id).await
    }

    async fn save_metric(&mut self, metric: &Metric) -> Result<()> {
        self.write(METRICS, metric.id, metric).await
    }

    async fn load_metric(&self, id: MetricId) -> Result<Option<Metric>> {
        read_json(&self.entity_path(METRICS, id)).await
    }

    async fn list_metrics(&self) -> Result<Vec<Metric>> {
        let mut metrics: Vec<Metric> = list_dir(&self.root.join(METRICS)).await?;
        metrics.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(metrics)
    }

    async fn delete_metric(&mut self, id: MetricId) -> Result<()> {
        self.remove(METRICS, id).await
    }

    async fn save_habit(&mut self, habit: &Habit) -> Result<()> {
        self.write(HABITS, habit.id, habit).await
    }

    async fn load_habit(&self, id: HabitId) -> Result<Option<Habit>> {
        read_json(&self.entity_path(HABITS, id)).await
    }

    async fn list_habits(&self) -> Result<Vec<Habit>> {
        let mut habits: Vec<Habit> = list_dir(&self.root.join(HABITS)).await?;
        habits.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(habits)
    }

    async fn delete_habit(&mut self, id: HabitId) -> Result<()> {
        self.remove(HABITS, id).await
    }

    // Linked queries feed progress scoring, so a record that cannot be read
    // is an error here rather than silently missing from the total.

    async fn list_tasks_for_goal(&self, goal_id: GoalId) -> Result<Vec<Task>> {
        let tasks: Vec<Task> = list_dir_strict(&self.root.join(TASKS)).await?;
        Ok(tasks.into_iter().filter(|t| t.goal_id == Some(goal_id)).collect())
    }

    async fn list_metrics_for_goal(&self, goal_id: GoalId) -> Result<Vec<Metric>> {
        let metrics: Vec<Metric> = list_dir_strict(&self.root.join(METRICS)).await?;
        Ok(metrics.into_iter().filter(|m| m.goal_id == Some(goal_id)).collect())
    }

    async fn list_habits_for_goal(&self, goal_id: GoalId) -> Result<Vec<Habit>> {
        let habits: Vec<Habit> = list_dir_strict(&self.root.join(HABITS)).await?;
        Ok(habits.into_iter().filter(|h| h.goal_id == Some(goal_id)).collect())
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        match read_json(&path).await {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {}
            Err(e) => warn!("Skipping unreadable {}: {}", path.display(), e),
        }
    }
    Ok(items)
}

async fn list_dir_strict<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        match read_json(&path).await {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {}
            Err(StorageError::Json(source)) => {
                return Err(StorageError::Corrupt {
                    path: path.display().to_string(),
                    source,
                });
            }
            Err(e) => return Err(e),
        }
    }
    Ok(items)
}
