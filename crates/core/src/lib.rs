//! Growth core data models.
//!
//! This crate defines goals, their success criteria, and the tasks, metrics
//! and habits that can be linked to them, plus the derived progress
//! breakdown shown for a goal.

#![warn(missing_docs)]

// Core identities
mod id;

// Goals and linked entities
mod goal;
mod task;
mod metric;
mod habit;

// Derived progress
mod progress;

// Re-exports
pub use id::*;

pub use goal::{Goal, GoalStatus, SuccessCriterion};
pub use task::{Task, TaskStatus};
pub use metric::{Metric, MetricDirection};
pub use habit::{Habit, HabitFrequency, HabitLog};
pub use progress::{
    calculate_criteria_progress, ratio_percentage, CompletionBreakdown, GoalProgressBreakdown,
    HabitBreakdown, MetricBreakdown,
};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;

/// Error parsing a model enum from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The text does not name any variant
    #[error("unknown {kind}: {value}")]
    UnknownVariant {
        /// What was being parsed
        kind: &'static str,
        /// The rejected input
        value: String,
    },
}
