//! Metric model - a measured quantity with a target.

use serde::{Deserialize, Deserializer, Serialize};
use crate::id::{GoalId, MetricId};
use crate::{ParseError, Time};

/// A metric linked to a goal. It is "at target" once its current value has
/// reached the target in the metric's direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metric {
    /// Unique identifier
    pub id: MetricId,

    /// Display name
    pub name: String,

    /// Unit label (kg, km, pages, ...)
    #[serde(default)]
    pub unit: Option<String>,

    /// Latest measured value; absent or non-numeric input is treated as zero
    #[serde(default, deserialize_with = "lenient_number")]
    pub current_value: Option<f64>,

    /// Target value; absent or non-numeric input is treated as zero
    #[serde(default, deserialize_with = "lenient_number")]
    pub target_value: Option<f64>,

    /// Which way is better
    #[serde(default)]
    pub direction: MetricDirection,

    /// Goal this metric is linked to
    #[serde(default)]
    pub goal_id: Option<GoalId>,

    /// Last update timestamp
    #[serde(default = "chrono::Utc::now")]
    pub updated_at: Time,
}

impl Metric {
    /// Create a higher-is-better metric.
    pub fn new(name: impl Into<String>, current: f64, target: f64) -> Self {
        Self {
            id: MetricId::new(),
            name: name.into(),
            unit: None,
            current_value: Some(current),
            target_value: Some(target),
            direction: MetricDirection::HigherIsBetter,
            goal_id: None,
            updated_at: chrono::Utc::now(),
        }
    }

    /// Link the metric to a goal.
    pub fn for_goal(mut self, goal_id: GoalId) -> Self {
        self.goal_id = Some(goal_id);
        self
    }

    /// Set the direction.
    pub fn with_direction(mut self, direction: MetricDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Current value, zero when missing or not finite.
    pub fn current(&self) -> f64 {
        finite_or_zero(self.current_value)
    }

    /// Target value, zero when missing or not finite.
    pub fn target(&self) -> f64 {
        finite_or_zero(self.target_value)
    }

    /// Whether the current value has reached the target.
    pub fn is_at_target(&self) -> bool {
        match self.direction {
            MetricDirection::HigherIsBetter => self.current() >= self.target(),
            MetricDirection::LowerIsBetter => self.current() <= self.target(),
        }
    }
}

/// Direction in which a metric improves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricDirection {
    /// Larger values are better; at target once `current >= target`
    #[default]
    HigherIsBetter,
    /// Smaller values are better; at target once `current <= target`
    LowerIsBetter,
}

impl std::str::FromStr for MetricDirection {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "higher" | "up" | "higher-is-better" => Ok(MetricDirection::HigherIsBetter),
            "lower" | "down" | "lower-is-better" => Ok(MetricDirection::LowerIsBetter),
            _ => Err(ParseError::UnknownVariant {
                kind: "metric direction",
                value: s.to_string(),
            }),
        }
    }
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Accept numbers, numeric strings and null; anything else becomes `None`.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_higher_is_better() {
        assert!(Metric::new("pushups", 50.0, 50.0).is_at_target());
        assert!(Metric::new("pushups", 60.0, 50.0).is_at_target());
        assert!(!Metric::new("pushups", 49.0, 50.0).is_at_target());
    }

    #[test]
    fn test_lower_is_better() {
        let weight = Metric::new("weight", 72.0, 75.0).with_direction(MetricDirection::LowerIsBetter);
        assert!(weight.is_at_target());

        let weight = Metric::new("weight", 80.0, 75.0).with_direction(MetricDirection::LowerIsBetter);
        assert!(!weight.is_at_target());
    }

    #[test]
    fn test_lenient_values() {
        let json = serde_json::json!({
            "id": MetricId::new(),
            "name": "books",
            "current_value": "12",
            "target_value": "lots",
            "updated_at": chrono::Utc::now(),
        });
        let metric: Metric = serde_json::from_value(json).unwrap();
        assert_eq!(metric.current(), 12.0);
        assert_eq!(metric.target_value, None);
        assert_eq!(metric.target(), 0.0);
        assert_eq!(metric.direction, MetricDirection::HigherIsBetter);
    }

    #[test]
    fn test_missing_values_are_zero() {
        let json = serde_json::json!({
            "id": MetricId::new(),
            "name": "empty",
            "current_value": null,
            "updated_at": chrono::Utc::now(),
        });
        let metric: Metric = serde_json::from_value(json).unwrap();
        assert_eq!(metric.current(), 0.0);
        assert_eq!(metric.target(), 0.0);
        assert!(metric.is_at_target());
    }

    #[test]
    fn test_non_finite_is_zero() {
        let mut metric = Metric::new("nan", 1.0, 2.0);
        metric.target_value = Some(f64::NAN);
        assert_eq!(metric.target(), 0.0);
        assert!(metric.is_at_target());
    }
}
