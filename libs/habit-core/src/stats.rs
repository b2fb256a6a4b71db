//! Monthly completion statistics.
//!
//! Pure functions over (habits, completions, month); no I/O and no
//! mutation, so results are reproducible for the same inputs.

use chrono::{Datelike, NaiveDate};

use crate::key::completion_key;
use crate::types::{Completions, Habit};

/// Completion statistics for one habit or a whole month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthStats {
    pub completed: u32,
    pub total: u32,
    /// Rounded to the nearest integer percent; 0 when `total` is 0.
    pub percentage: u32,
}

impl MonthStats {
    fn from_counts(completed: u32, total: u32) -> Self {
        let percentage = if total > 0 {
            ((completed as f64 / total as f64) * 100.0).round() as u32
        } else {
            0
        };
        Self {
            completed,
            total,
            percentage,
        }
    }
}

/// Number of calendar days in the given month, or 0 for an invalid month.
///
/// Uses the day-before-the-first-of-next-month trick, so leap years fall
/// out of the calendar arithmetic.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(0)
}

/// Aggregate completion percentage across all habits for one month.
pub fn overall_stats(
    habits: &[Habit],
    completions: &Completions,
    year: i32,
    month: u32,
) -> MonthStats {
    let days = days_in_month(year, month);
    let total = habits.len() as u32 * days;

    let completed = habits
        .iter()
        .map(|habit| count_completed(habit.id, completions, year, month, days))
        .sum();

    MonthStats::from_counts(completed, total)
}

/// Completion percentage for a single habit over one month.
pub fn habit_stats(
    habit_id: i64,
    completions: &Completions,
    year: i32,
    month: u32,
) -> MonthStats {
    let days = days_in_month(year, month);
    let completed = count_completed(habit_id, completions, year, month, days);
    MonthStats::from_counts(completed, days)
}

fn count_completed(
    habit_id: i64,
    completions: &Completions,
    year: i32,
    month: u32,
    days: u32,
) -> u32 {
    (1..=days)
        .filter(|day| {
            completions
                .get(&completion_key(habit_id, year, month, *day))
                .copied()
                .unwrap_or(false)
        })
        .count() as u32
}
