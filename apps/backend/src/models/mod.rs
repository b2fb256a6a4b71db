//! Stored records and API request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

// Re-export shared types from habit-core
pub use habit_core::types::{Completions, Habit, User};

// === Stored Records ===

/// A user as persisted in the data file. Plaintext password, per the
/// original system; never serialized into API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    pub id: Uuid,
    pub code: String,
    pub username: String,
    pub password: String,
    pub language: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl StoredUser {
    /// The client-visible shape, with the password stripped.
    pub fn public(&self) -> User {
        User {
            id: self.id,
            code: self.code.clone(),
            username: self.username.clone(),
            language: self.language.clone(),
            is_admin: self.is_admin,
            created_at: self.created_at,
        }
    }
}

/// Entire persisted state: one JSON document, rewritten on every write.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppData {
    #[serde(default)]
    pub users: HashMap<String, StoredUser>,
    /// Per user code: that user's habit list.
    #[serde(default)]
    pub habits: HashMap<String, Vec<Habit>>,
    /// Per user code: completion key -> done flag.
    #[serde(default)]
    pub completions: HashMap<String, Completions>,
}

// === Auth types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub code: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: User,
}

/// Generic `{success: true}` acknowledgement.
#[derive(Debug, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

// === Sync types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct SyncResponse {
    pub success: bool,
    pub user: User,
    pub habits: Vec<Habit>,
    pub completions: Completions,
}

// === Habit types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct AddHabitRequest {
    pub name: String,
    pub emoji: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HabitResponse {
    pub success: bool,
    pub habit: Habit,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateHabitsRequest {
    pub habits: Vec<Habit>,
}

// === Completion types ===

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleCompletionRequest {
    pub habit_id: i64,
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleCompletionResponse {
    pub success: bool,
    pub completed: bool,
}

// === User settings types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateLanguageRequest {
    pub language: String,
}

// === Health ===

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub users_count: usize,
    pub data_file: bool,
}

// === Admin types ===

fn default_language() -> String {
    "uz".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub code: String,
    pub username: String,
    pub password: String,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub success: bool,
    pub user: User,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub new_password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsersResponse {
    pub success: bool,
    pub users: Vec<User>,
    pub count: usize,
}
