//! Completion key scheme.
//!
//! A completion is keyed by `"{habitId}-{year}-{month}-{day}"`, e.g.
//! `"1718-2024-6-15"`. Month and day are written without zero padding.
//! The key carries the full date so the same day-of-month in different
//! months never collides.

use crate::error::{KeyError, Result};

/// Parsed form of a completion key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionKey {
    pub habit_id: i64,
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// Format the completion key for a habit on a given date.
pub fn completion_key(habit_id: i64, year: i32, month: u32, day: u32) -> String {
    format!("{habit_id}-{year}-{month}-{day}")
}

/// Parse a completion key back into its components.
pub fn parse_completion_key(key: &str) -> Result<CompletionKey> {
    let segments: Vec<&str> = key.split('-').collect();
    if segments.len() != 4 {
        return Err(KeyError::Malformed {
            key: key.to_string(),
        });
    }

    fn segment<T: std::str::FromStr>(value: &str) -> Result<T> {
        value.parse().map_err(|_| KeyError::InvalidSegment {
            value: value.to_string(),
        })
    }

    Ok(CompletionKey {
        habit_id: segment(segments[0])?,
        year: segment(segments[1])?,
        month: segment(segments[2])?,
        day: segment(segments[3])?,
    })
}
