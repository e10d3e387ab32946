//! Progress engine configuration.

use serde::{Deserialize, Serialize};

/// Longest accepted consistency window, in days.
pub const MAX_WINDOW_DAYS: u32 = 3660;

/// Errors in a [`ProgressConfig`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A category weight is negative, NaN or infinite
    #[error("invalid weight for {category}: {value}")]
    InvalidWeight {
        /// Category name
        category: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Every weight is zero
    #[error("at least one category weight must be positive")]
    AllWeightsZero,

    /// Streak cap must be at least one day
    #[error("streak cap must be at least 1 day")]
    ZeroStreakCap,

    /// Consistency window must be at least one day
    #[error("consistency window must be at least 1 day")]
    ZeroWindow,

    /// Consistency window is longer than [`MAX_WINDOW_DAYS`]
    #[error("consistency window of {0} days exceeds {MAX_WINDOW_DAYS}")]
    WindowTooLong(u32),
}

/// Configuration for the goal progress engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Base category weights, re-normalized over the populated categories
    pub weights: CategoryWeights,

    /// Streak length (days) that maps to a full streak score
    pub streak_cap_days: u32,

    /// Trailing window (days, including today) for habit consistency
    pub consistency_window_days: u32,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            weights: CategoryWeights::default(),
            streak_cap_days: 30,
            consistency_window_days: 30,
        }
    }
}

impl ProgressConfig {
    /// Check the configuration for values the engine cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;
        if self.streak_cap_days == 0 {
            return Err(ConfigError::ZeroStreakCap);
        }
        if self.consistency_window_days == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if self.consistency_window_days > MAX_WINDOW_DAYS {
            return Err(ConfigError::WindowTooLong(self.consistency_window_days));
        }
        Ok(())
    }
}

/// Base weight of each progress category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryWeights {
    /// Success criteria
    pub criteria: f64,
    /// Linked tasks
    pub tasks: f64,
    /// Linked metrics
    pub metrics: f64,
    /// Linked habits
    pub habits: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            criteria: 30.0,
            tasks: 30.0,
            metrics: 20.0,
            habits: 20.0,
        }
    }
}

impl CategoryWeights {
    fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("criteria", self.criteria),
            ("tasks", self.tasks),
            ("metrics", self.metrics),
            ("habits", self.habits),
        ];
        for (category, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { category, value });
            }
        }
        if named.iter().all(|(_, w)| *w == 0.0) {
            return Err(ConfigError::AllWeightsZero);
        }
        Ok(())
    }
}
