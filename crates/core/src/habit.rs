//! Habit model - a recurring behaviour with a log history.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::id::{GoalId, HabitId};
use crate::Time;

/// A habit linked to a goal. Streak and consistency are derived from `logs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier
    pub id: HabitId,

    /// Display name
    pub name: String,

    /// How often the habit is expected
    #[serde(default)]
    pub frequency: HabitFrequency,

    /// First day the habit is expected; earlier days never count as missed
    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    /// Log history, in any order
    #[serde(default)]
    pub logs: Vec<HabitLog>,

    /// Goal this habit is linked to
    #[serde(default)]
    pub goal_id: Option<GoalId>,

    /// When created
    #[serde(default = "chrono::Utc::now")]
    pub created_at: Time,
}

impl Habit {
    /// Create a daily habit with no history.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: HabitId::new(),
            name: name.into(),
            frequency: HabitFrequency::Daily,
            start_date: None,
            logs: Vec::new(),
            goal_id: None,
            created_at: chrono::Utc::now(),
        }
    }

    /// Link the habit to a goal.
    pub fn for_goal(mut self, goal_id: GoalId) -> Self {
        self.goal_id = Some(goal_id);
        self
    }

    /// Set the frequency.
    pub fn with_frequency(mut self, frequency: HabitFrequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Set the start date.
    pub fn starting(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Record a completion on `date`.
    pub fn log(&mut self, date: NaiveDate) {
        self.logs.push(HabitLog { date, completed: true });
    }

    /// Distinct days with a completed log, up to and including `as_of`.
    pub fn completed_days(&self, as_of: NaiveDate) -> BTreeSet<NaiveDate> {
        self.logs
            .iter()
            .filter(|log| log.completed && log.date <= as_of)
            .map(|log| log.date)
            .collect()
    }
}

/// How often a habit is expected to be performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HabitFrequency {
    /// Once every day
    #[default]
    Daily,
    /// A number of days per Monday-based week
    Weekly {
        /// Required completions per week
        times_per_week: u32,
    },
}

/// One entry in a habit's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitLog {
    /// Day the entry refers to
    pub date: NaiveDate,

    /// Whether the habit was done; `false` records an explicit miss
    #[serde(default = "default_completed")]
    pub completed: bool,
}

fn default_completed() -> bool {
    true
}
