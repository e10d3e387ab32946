//! Derived progress breakdown for a goal. Never persisted.

use serde::{Deserialize, Serialize};
use crate::goal::SuccessCriterion;

/// Completed/total counts for a category scored by a simple ratio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionBreakdown {
    /// Items counted as done
    pub completed: usize,
    /// Items in the category
    pub total: usize,
    /// `round(100 * completed / total)`, 0 when `total == 0`
    pub percentage: u8,
}

impl CompletionBreakdown {
    /// Build from counts. An empty category has percentage 0 and no data.
    pub fn from_counts(completed: usize, total: usize) -> Self {
        Self {
            completed,
            total,
            percentage: ratio_percentage(completed, total),
        }
    }

    /// Whether this category has any items to score.
    pub fn has_data(&self) -> bool {
        self.total > 0
    }
}

/// Metric category counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricBreakdown {
    /// Metrics whose current value has reached the target
    pub at_target: usize,
    /// Linked metrics
    pub total: usize,
    /// `round(100 * at_target / total)`, 0 when `total == 0`
    pub percentage: u8,
}

impl MetricBreakdown {
    /// Build from counts.
    pub fn from_counts(at_target: usize, total: usize) -> Self {
        Self {
            at_target,
            total,
            percentage: ratio_percentage(at_target, total),
        }
    }

    /// Whether any metric is linked.
    pub fn has_data(&self) -> bool {
        self.total > 0
    }
}

/// Habit category summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitBreakdown {
    /// Longest current streak among linked habits, in days
    pub streak_days: u32,
    /// Mean trailing-window consistency, 0-100
    pub consistency: u8,
    /// Linked habits
    pub total: usize,
    /// Blended streak/consistency sub-score, 0-100
    pub score: u8,
}

impl HabitBreakdown {
    /// Whether any habit is linked.
    pub fn has_data(&self) -> bool {
        self.total > 0
    }
}

/// Composite progress for one goal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgressBreakdown {
    /// Weighted overall percentage, 0-100
    pub overall: u8,
    /// Success criteria
    pub criteria: CompletionBreakdown,
    /// Linked tasks
    pub tasks: CompletionBreakdown,
    /// Linked metrics
    pub metrics: MetricBreakdown,
    /// Linked habits
    pub habits: HabitBreakdown,
    /// True when only the criteria could be scored
    #[serde(default)]
    pub fallback: bool,
}

impl GoalProgressBreakdown {
    /// Degraded breakdown scored from success criteria alone.
    ///
    /// Used when linked entities could not be loaded; `overall` equals the
    /// criteria percentage.
    pub fn criteria_only(criteria: &[SuccessCriterion]) -> Self {
        let criteria = calculate_criteria_progress(criteria);
        Self {
            overall: criteria.percentage,
            criteria,
            fallback: true,
            ..Default::default()
        }
    }
}

/// Score a goal's success criteria. Order is irrelevant; never panics.
pub fn calculate_criteria_progress(criteria: &[SuccessCriterion]) -> CompletionBreakdown {
    let completed = criteria.iter().filter(|c| c.is_completed).count();
    CompletionBreakdown::from_counts(completed, criteria.len())
}

/// Round `100 * part / whole` to the nearest integer, clamped to 0-100.
pub fn ratio_percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let pct = (part.min(whole) as f64 / whole as f64) * 100.0;
    pct.round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criteria_progress_empty() {
        let result = calculate_criteria_progress(&[]);
        assert_eq!(result, CompletionBreakdown { completed: 0, total: 0, percentage: 0 });
        assert!(!result.has_data());
    }

    #[test]
    fn test_criteria_progress_rounding() {
        let criteria = vec![
            SuccessCriterion::completed("a"),
            SuccessCriterion::new("b"),
            SuccessCriterion::new("c"),
        ];
        let result = calculate_criteria_progress(&criteria);
        assert_eq!(result.completed, 1);
        assert_eq!(result.total, 3);
        assert_eq!(result.percentage, 33);

        let criteria = vec![
            SuccessCriterion::completed("a"),
            SuccessCriterion::completed("b"),
            SuccessCriterion::new("c"),
        ];
        assert_eq!(calculate_criteria_progress(&criteria).percentage, 67);
    }

    #[test]
    fn test_criteria_progress_bounds() {
        for total in 0..12 {
            for completed in 0..=total {
                let criteria: Vec<_> = (0..total)
                    .map(|i| {
                        if i < completed {
                            SuccessCriterion::completed("done")
                        } else {
                            SuccessCriterion::new("open")
                        }
                    })
                    .collect();
                let pct = calculate_criteria_progress(&criteria).percentage;
                assert!(pct <= 100);
            }
        }
    }

    #[test]
    fn test_criteria_only_fallback() {
        let criteria = vec![SuccessCriterion::completed("a"), SuccessCriterion::new("b")];
        let breakdown = GoalProgressBreakdown::criteria_only(&criteria);
        assert_eq!(breakdown.overall, 50);
        assert_eq!(breakdown.criteria.percentage, 50);
        assert_eq!(breakdown.tasks.total, 0);
        assert!(breakdown.fallback);
    }

    #[test]
    fn test_breakdown_camel_case() {
        let breakdown = GoalProgressBreakdown {
            metrics: MetricBreakdown::from_counts(1, 2),
            habits: HabitBreakdown { streak_days: 4, consistency: 80, total: 1, score: 47 },
            ..Default::default()
        };
        let json = serde_json::to_value(&breakdown).unwrap();
        assert_eq!(json["metrics"]["atTarget"], 1);
        assert_eq!(json["habits"]["streakDays"], 4);
    }
}
