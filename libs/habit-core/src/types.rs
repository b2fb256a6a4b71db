//! Core types for the habit tracker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Completion map: completion key -> done flag.
///
/// Keys follow the scheme in [`crate::key`]. Only `true` entries count as
/// completed; a missing key and an explicit `false` are equivalent.
pub type Completions = HashMap<String, bool>;

/// A user-defined recurring task tracked per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Millisecond timestamp taken at creation time.
    pub id: i64,
    pub name: String,
    pub emoji: String,
    pub color: String,
    pub order: u32,
    pub created_at: DateTime<Utc>,
    /// Set on habits fabricated locally while offline, cleared once the
    /// server confirms them.
    #[serde(default, skip_serializing_if = "is_false")]
    pub provisional: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Habit {
    /// Create a habit with the given id and name and default appearance.
    pub fn new(id: i64, name: impl Into<String>, order: u32) -> Self {
        Self {
            id,
            name: name.into(),
            emoji: "✨".to_string(),
            color: "bg-cyan-100".to_string(),
            order,
            created_at: Utc::now(),
            provisional: false,
        }
    }
}

/// An account as seen by clients. The stored password never leaves the
/// backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    /// Unique login key.
    pub code: String,
    pub username: String,
    pub language: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn habit_defaults() {
        let habit = Habit::new(1700000000000, "Read", 0);
        assert_eq!(habit.emoji, "✨");
        assert_eq!(habit.color, "bg-cyan-100");
        assert_eq!(habit.order, 0);
        assert!(!habit.provisional);
    }

    #[test]
    fn provisional_flag_omitted_when_false() {
        let habit = Habit::new(1, "Run", 0);
        let json = serde_json::to_value(&habit).unwrap();
        assert!(json.get("provisional").is_none());
    }

    #[test]
    fn provisional_flag_serialized_when_set() {
        let mut habit = Habit::new(1, "Run", 0);
        habit.provisional = true;
        let json = serde_json::to_value(&habit).unwrap();
        assert_eq!(json["provisional"], serde_json::json!(true));
    }

    #[test]
    fn habit_round_trips_without_provisional_field() {
        // Habits stored by older snapshots have no provisional field.
        let json = serde_json::json!({
            "id": 5,
            "name": "Read",
            "emoji": "📚",
            "color": "bg-cyan-100",
            "order": 2,
            "createdAt": "2024-06-01T00:00:00Z"
        });
        let habit: Habit = serde_json::from_value(json).unwrap();
        assert!(!habit.provisional);
        assert_eq!(habit.name, "Read");
    }
}
