//! Goal progress engine.
//!
//! Combines four independent sub-scores (success criteria, tasks, metrics,
//! habits) into one overall percentage. Categories with no linked entities
//! are left out of the weighting entirely, so an inapplicable category never
//! drags a goal toward zero.
//!
//! The engine is a pure function of its inputs: callers fetch the linked
//! entities and re-invoke it whenever any of them change.

use chrono::{NaiveDate, Utc};
use growth_core::{
    calculate_criteria_progress, CompletionBreakdown, Goal, GoalProgressBreakdown, Habit,
    HabitBreakdown, Metric, MetricBreakdown, Task,
};
use tracing::debug;

use crate::config::ProgressConfig;
use crate::habit::score_habit;

/// A populated category's contribution to the overall score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedScore {
    /// Base weight of the category
    pub weight: f64,
    /// Category score, 0-100
    pub score: f64,
}

/// Weighted mean of `scores`, re-normalized over their weights and rounded.
///
/// Only populated categories should be passed in. Returns 0 when the list is
/// empty or the weights sum to zero.
pub fn renormalized_overall(scores: &[WeightedScore]) -> u8 {
    let total_weight: f64 = scores.iter().map(|s| s.weight).sum();
    if total_weight <= 0.0 || !total_weight.is_finite() {
        return 0;
    }
    let weighted: f64 = scores.iter().map(|s| s.weight * s.score).sum();
    (weighted / total_weight).round().clamp(0.0, 100.0) as u8
}

/// Percentage of linked tasks whose status is `Completed`.
pub fn calculate_task_progress(tasks: &[Task]) -> CompletionBreakdown {
    let completed = tasks.iter().filter(|t| t.is_completed()).count();
    CompletionBreakdown::from_counts(completed, tasks.len())
}

/// Percentage of linked metrics that have reached their target.
pub fn calculate_metric_progress(metrics: &[Metric]) -> MetricBreakdown {
    let at_target = metrics.iter().filter(|m| m.is_at_target()).count();
    MetricBreakdown::from_counts(at_target, metrics.len())
}

/// Blended streak/consistency score across linked habits.
///
/// `streak_days` is the longest current streak among the habits and
/// `consistency` the rounded mean consistency.
pub fn calculate_habit_progress(
    habits: &[Habit],
    as_of: NaiveDate,
    config: &ProgressConfig,
) -> HabitBreakdown {
    habit_summary(habits, as_of, config).0
}

fn habit_summary(habits: &[Habit], as_of: NaiveDate, config: &ProgressConfig) -> (HabitBreakdown, f64) {
    if habits.is_empty() {
        return (HabitBreakdown::default(), 0.0);
    }

    let scores: Vec<_> = habits.iter().map(|h| score_habit(h, as_of, config)).collect();
    let n = scores.len() as f64;
    let score = scores.iter().map(|s| s.score).sum::<f64>() / n;
    let consistency = scores.iter().map(|s| s.consistency).sum::<f64>() / n;

    let breakdown = HabitBreakdown {
        streak_days: scores.iter().map(|s| s.streak_days).max().unwrap_or(0),
        consistency: consistency.round().clamp(0.0, 100.0) as u8,
        total: habits.len(),
        score: score.round().clamp(0.0, 100.0) as u8,
    };
    (breakdown, score)
}

fn exact_ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Computes [`GoalProgressBreakdown`]s.
#[derive(Debug, Clone, Default)]
pub struct GoalProgressEngine {
    config: ProgressConfig,
}

impl GoalProgressEngine {
    /// Create an engine with the default weights.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: ProgressConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &ProgressConfig {
        &self.config
    }

    /// Compute progress with habits evaluated as of today (UTC).
    pub fn compute_progress(
        &self,
        goal: &Goal,
        tasks: &[Task],
        metrics: &[Metric],
        habits: &[Habit],
    ) -> GoalProgressBreakdown {
        self.compute_progress_at(goal, tasks, metrics, habits, Utc::now().date_naive())
    }

    /// Compute progress with habits evaluated as of `as_of`.
    ///
    /// `tasks`, `metrics` and `habits` must already be filtered to the goal.
    pub fn compute_progress_at(
        &self,
        goal: &Goal,
        tasks: &[Task],
        metrics: &[Metric],
        habits: &[Habit],
        as_of: NaiveDate,
    ) -> GoalProgressBreakdown {
        let criteria = calculate_criteria_progress(&goal.success_criteria);
        let task_progress = calculate_task_progress(tasks);
        let metric_progress = calculate_metric_progress(metrics);
        let (habit_progress, habit_score) = habit_summary(habits, as_of, &self.config);

        let weights = &self.config.weights;
        let mut populated = Vec::with_capacity(4);
        if criteria.has_data() {
            populated.push(WeightedScore {
                weight: weights.criteria,
                score: exact_ratio(criteria.completed, criteria.total),
            });
        }
        if task_progress.has_data() {
            populated.push(WeightedScore {
                weight: weights.tasks,
                score: exact_ratio(task_progress.completed, task_progress.total),
            });
        }
        if metric_progress.has_data() {
            populated.push(WeightedScore {
                weight: weights.metrics,
                score: exact_ratio(metric_progress.at_target, metric_progress.total),
            });
        }
        if habit_progress.has_data() {
            populated.push(WeightedScore {
                weight: weights.habits,
                score: habit_score,
            });
        }

        let overall = renormalized_overall(&populated);
        debug!(
            "Goal {} progress: overall={} ({} populated categories)",
            goal.id,
            overall,
            populated.len()
        );

        GoalProgressBreakdown {
            overall,
            criteria,
            tasks: task_progress,
            metrics: metric_progress,
            habits: habit_progress,
            fallback: false,
        }
    }
}
