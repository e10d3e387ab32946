//! Habit scoring: current streak blended with trailing-window consistency.
//!
//! A streak alone is a poor measure of follow-through (a streak restarted
//! yesterday looks the same as a healthy one on day 1), so each habit's
//! sub-score is the mean of a capped streak score and its consistency over a
//! recent window.

use chrono::{Datelike, Days, NaiveDate};
use growth_core::{Habit, HabitFrequency};
use std::collections::BTreeSet;

use crate::config::{ProgressConfig, MAX_WINDOW_DAYS};

/// Score for a single habit as of a given day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HabitScore {
    /// Current streak, in days
    pub streak_days: u32,
    /// `min(streak_days, cap) / cap * 100`
    pub streak_score: f64,
    /// Completion rate over the trailing window, 0-100
    pub consistency: f64,
    /// Mean of `streak_score` and `consistency`
    pub score: f64,
}

/// Score one habit.
pub fn score_habit(habit: &Habit, as_of: NaiveDate, config: &ProgressConfig) -> HabitScore {
    let streak_days = current_streak_days(habit, as_of);
    let cap = config.streak_cap_days.max(1);
    let streak_score = f64::from(streak_days.min(cap)) / f64::from(cap) * 100.0;
    let consistency = consistency(habit, as_of, config.consistency_window_days);

    HabitScore {
        streak_days,
        streak_score,
        consistency,
        score: (streak_score + consistency) / 2.0,
    }
}

/// Length of the current streak in days.
///
/// Daily habits count consecutive logged days. Weekly habits count
/// consecutive Monday-based weeks that met `times_per_week`, reported as
/// seven days per week. A current period that has not qualified yet is
/// skipped rather than treated as a break.
pub fn current_streak_days(habit: &Habit, as_of: NaiveDate) -> u32 {
    let days = habit.completed_days(as_of);
    match habit.frequency {
        HabitFrequency::Daily => daily_streak(&days, as_of),
        HabitFrequency::Weekly { times_per_week } => {
            weekly_streak(&days, as_of, required_per_week(times_per_week)) * 7
        }
    }
}

/// Completion rate (0-100) over the `window_days` ending at `as_of`.
///
/// The window never starts before the habit's `start_date`. Expected
/// completions are one per day for daily habits and `times_per_week / 7`
/// per day for weekly ones. A weekly target of zero expects nothing and
/// scores 0. The window is capped at [`MAX_WINDOW_DAYS`].
pub fn consistency(habit: &Habit, as_of: NaiveDate, window_days: u32) -> f64 {
    let window_days = window_days.clamp(1, MAX_WINDOW_DAYS);
    let mut start = as_of
        .checked_sub_days(Days::new(u64::from(window_days - 1)))
        .unwrap_or(NaiveDate::MIN);
    if let Some(first) = habit.start_date {
        start = start.max(first);
    }
    if start > as_of {
        return 0.0;
    }

    let span = (as_of - start).num_days() + 1;
    let expected = match habit.frequency {
        HabitFrequency::Daily => span as f64,
        HabitFrequency::Weekly { times_per_week } => {
            f64::from(required_per_week(times_per_week)) * span as f64 / 7.0
        }
    };
    if expected <= 0.0 {
        return 0.0;
    }

    let actual = habit.completed_days(as_of).range(start..=as_of).count() as f64;
    (actual / expected).min(1.0) * 100.0
}

fn required_per_week(times_per_week: u32) -> u32 {
    times_per_week.min(7)
}

fn daily_streak(days: &BTreeSet<NaiveDate>, as_of: NaiveDate) -> u32 {
    let mut cursor = if days.contains(&as_of) {
        Some(as_of)
    } else {
        as_of.pred_opt()
    };

    let mut streak = 0;
    while let Some(day) = cursor {
        if !days.contains(&day) {
            break;
        }
        streak += 1;
        cursor = day.pred_opt();
    }
    streak
}

fn weekly_streak(days: &BTreeSet<NaiveDate>, as_of: NaiveDate, required: u32) -> u32 {
    if required == 0 {
        return 0;
    }
    let Some(current_week) = week_start(as_of) else {
        return 0;
    };
    let qualifies = |start: NaiveDate| -> bool {
        let end = start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
        days.range(start..=end).count() as u32 >= required
    };

    let mut cursor = if qualifies(current_week) {
        Some(current_week)
    } else {
        current_week.checked_sub_days(Days::new(7))
    };

    let mut streak = 0;
    while let Some(start) = cursor {
        if !qualifies(start) {
            break;
        }
        streak += 1;
        cursor = start.checked_sub_days(Days::new(7));
    }
    streak
}

fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
}
