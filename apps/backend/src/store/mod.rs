//! JSON-file persistence.
//!
//! All state lives in one in-memory [`AppData`] guarded by a mutex and is
//! dumped to a single JSON file on every mutation. Not atomic and not
//! multi-process safe; that matches the system this replaces.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{error, info};
use uuid::Uuid;

use habit_core::key::{completion_key, parse_completion_key};

use crate::error::{ApiError, Result};
use crate::models::{AppData, Completions, Habit, StoredUser, User};

/// The `(code, password)` pairs seeded into a fresh data file.
const DEFAULT_USERS: [(&str, &str, &str); 4] = [
    ("admin_ismoil", "Ismoil", "ismoil123"),
    ("admin-mustafo", "Mustafo", "mustafo123"),
    ("admin-oyatillo", "Oyatillo", "oyatillo123"),
    ("toxir", "Toxir", "toxir123"),
];

pub struct JsonStore {
    path: PathBuf,
    data: Mutex<AppData>,
}

impl JsonStore {
    /// Load the data file, or seed default users when it is missing or
    /// unreadable.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = load_data(&path).await;
        info!(users = data.users.len(), path = %path.display(), "store opened");
        Self {
            path,
            data: Mutex::new(data),
        }
    }

    // === Users ===

    /// Check a login code/password pair against the stored users.
    pub async fn verify_login(&self, code: &str, password: &str) -> Result<User> {
        let data = self.data.lock().await;
        let user = data
            .users
            .get(code)
            .ok_or_else(|| ApiError::Unauthorized("unknown user code".to_string()))?;
        if user.password != password {
            return Err(ApiError::Unauthorized("wrong password".to_string()));
        }
        Ok(user.public())
    }

    pub async fn get_user(&self, code: &str) -> Option<User> {
        let data = self.data.lock().await;
        data.users.get(code).map(StoredUser::public)
    }

    pub async fn create_user(
        &self,
        code: &str,
        username: &str,
        password: &str,
        language: &str,
    ) -> Result<User> {
        let mut data = self.data.lock().await;
        if data.users.contains_key(code) {
            return Err(ApiError::BadRequest(
                "this login code already exists".to_string(),
            ));
        }

        let user = StoredUser {
            id: Uuid::new_v4(),
            code: code.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            language: language.to_string(),
            is_admin: false,
            created_at: Utc::now(),
        };
        let public = user.public();

        data.users.insert(code.to_string(), user);
        data.habits.insert(code.to_string(), Vec::new());
        data.completions.insert(code.to_string(), Completions::new());
        self.persist(&data).await?;

        Ok(public)
    }

    /// Delete a user along with their habits and completions.
    pub async fn delete_user(&self, code: &str) -> Result<()> {
        let mut data = self.data.lock().await;
        if data.users.remove(code).is_none() {
            return Err(ApiError::NotFound("user not found".to_string()));
        }
        data.habits.remove(code);
        data.completions.remove(code);
        self.persist(&data).await
    }

    pub async fn change_password(&self, code: &str, new_password: &str) -> Result<()> {
        let mut data = self.data.lock().await;
        let user = data
            .users
            .get_mut(code)
            .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;
        user.password = new_password.to_string();
        self.persist(&data).await
    }

    pub async fn set_language(&self, code: &str, language: &str) -> Result<()> {
        let mut data = self.data.lock().await;
        let user = data
            .users
            .get_mut(code)
            .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;
        user.language = language.to_string();
        self.persist(&data).await
    }

    pub async fn list_users(&self) -> Vec<User> {
        let data = self.data.lock().await;
        let mut users: Vec<User> = data.users.values().map(StoredUser::public).collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        users
    }

    pub async fn users_count(&self) -> usize {
        self.data.lock().await.users.len()
    }

    pub fn data_file_exists(&self) -> bool {
        self.path.exists()
    }

    // === Snapshot ===

    /// Everything one user sees: their account, habits and completions.
    pub async fn snapshot(&self, code: &str) -> Result<(User, Vec<Habit>, Completions)> {
        let data = self.data.lock().await;
        let user = data
            .users
            .get(code)
            .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?
            .public();
        let habits = data.habits.get(code).cloned().unwrap_or_default();
        let completions = data.completions.get(code).cloned().unwrap_or_default();
        Ok((user, habits, completions))
    }

    // === Habits ===

    pub async fn add_habit(
        &self,
        code: &str,
        name: &str,
        emoji: Option<String>,
        color: Option<String>,
    ) -> Result<Habit> {
        let mut data = self.data.lock().await;
        if !data.users.contains_key(code) {
            return Err(ApiError::NotFound("user not found".to_string()));
        }

        let list = data.habits.entry(code.to_string()).or_default();
        let habit = Habit {
            id: Utc::now().timestamp_millis(),
            name: name.to_string(),
            emoji: emoji.unwrap_or_else(|| "✨".to_string()),
            color: color.unwrap_or_else(|| "bg-cyan-100".to_string()),
            order: list.len() as u32,
            created_at: Utc::now(),
            provisional: false,
        };
        list.push(habit.clone());
        self.persist(&data).await?;

        Ok(habit)
    }

    /// Bulk replace, used for reorder. The incoming list wins wholesale.
    pub async fn replace_habits(&self, code: &str, habits: Vec<Habit>) -> Result<()> {
        let mut data = self.data.lock().await;
        if !data.users.contains_key(code) {
            return Err(ApiError::NotFound("user not found".to_string()));
        }
        data.habits.insert(code.to_string(), habits);
        self.persist(&data).await
    }

    /// Delete one habit and every completion recorded for it.
    pub async fn delete_habit(&self, code: &str, habit_id: i64) -> Result<()> {
        let mut data = self.data.lock().await;
        if !data.users.contains_key(code) {
            return Err(ApiError::NotFound("user not found".to_string()));
        }

        if let Some(list) = data.habits.get_mut(code) {
            list.retain(|h| h.id != habit_id);
        }
        if let Some(completions) = data.completions.get_mut(code) {
            completions.retain(|key, _| {
                parse_completion_key(key)
                    .map(|parsed| parsed.habit_id != habit_id)
                    .unwrap_or(true)
            });
        }
        self.persist(&data).await
    }

    // === Completions ===

    /// Flip the completion flag for a habit on a date; returns the new state.
    pub async fn toggle_completion(
        &self,
        code: &str,
        habit_id: i64,
        year: i32,
        month: u32,
        day: u32,
    ) -> Result<bool> {
        let mut data = self.data.lock().await;
        if !data.users.contains_key(code) {
            return Err(ApiError::NotFound("user not found".to_string()));
        }

        let completions = data.completions.entry(code.to_string()).or_default();
        let key = completion_key(habit_id, year, month, day);
        let current = completions.get(&key).copied().unwrap_or(false);
        completions.insert(key, !current);
        self.persist(&data).await?;

        Ok(!current)
    }

    /// Clear every habit and completion for one user.
    pub async fn reset_user(&self, code: &str) -> Result<()> {
        let mut data = self.data.lock().await;
        if !data.users.contains_key(code) {
            return Err(ApiError::NotFound("user not found".to_string()));
        }
        data.habits.insert(code.to_string(), Vec::new());
        data.completions.insert(code.to_string(), Completions::new());
        self.persist(&data).await
    }

    // === Persistence ===

    async fn persist(&self, data: &AppData) -> Result<()> {
        let payload = serde_json::to_vec_pretty(data)
            .map_err(|e| ApiError::Storage(format!("serialize data file: {e}")))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ApiError::Storage(format!("create data dir: {e}")))?;
            }
        }
        fs::write(&self.path, payload)
            .await
            .map_err(|e| ApiError::Storage(format!("write data file: {e}")))
    }
}

async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse data file, seeding defaults: {err}");
                seed_defaults()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => seed_defaults(),
        Err(err) => {
            error!("failed to read data file, seeding defaults: {err}");
            seed_defaults()
        }
    }
}

fn seed_defaults() -> AppData {
    let mut data = AppData::default();
    for (code, username, password) in DEFAULT_USERS {
        data.users.insert(
            code.to_string(),
            StoredUser {
                id: Uuid::new_v4(),
                code: code.to_string(),
                username: username.to_string(),
                password: password.to_string(),
                language: "uz".to_string(),
                is_admin: false,
                created_at: Utc::now(),
            },
        );
        data.habits.insert(code.to_string(), Vec::new());
        data.completions.insert(code.to_string(), Completions::new());
    }
    data
}
