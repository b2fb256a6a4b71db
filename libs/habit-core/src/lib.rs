//! Core habit-tracking library shared by the backend and the sync client.
//!
//! Provides:
//! - Shared types (Habit, User, completion map)
//! - The completion key scheme
//! - Monthly completion statistics

pub mod error;
pub mod key;
pub mod stats;
pub mod types;

pub use error::{KeyError, Result};
pub use key::{completion_key, parse_completion_key, CompletionKey};
pub use stats::{days_in_month, habit_stats, overall_stats, MonthStats};
pub use types::{Completions, Habit, User};
