//! Goal progress aggregation.
//!
//! A pure engine that scores a goal from its success criteria and linked
//! tasks, metrics and habits, plus a storage-backed tracker that fetches the
//! linked entities and falls back to criteria-only scoring when it cannot.

#![warn(missing_docs)]

pub mod config;
pub mod engine;
pub mod habit;
pub mod tracker;

pub use config::{CategoryWeights, ConfigError, ProgressConfig, MAX_WINDOW_DAYS};
pub use engine::{
    calculate_habit_progress, calculate_metric_progress, calculate_task_progress,
    renormalized_overall, GoalProgressEngine, WeightedScore,
};
pub use growth_core::calculate_criteria_progress;
pub use habit::{consistency, current_streak_days, score_habit, HabitScore};
pub use tracker::{BasicProgressTracker, ProgressSnapshot, ProgressTracker, TrackerError};
