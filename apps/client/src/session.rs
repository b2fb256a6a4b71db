//! File-backed session store.
//!
//! Holds the auth token plus the cached server snapshot (user, habits,
//! completions) in one JSON file, playing the role browser local storage
//! played for the web client. Snapshots are always overwritten whole,
//! never merged.

use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::warn;

use habit_core::types::{Completions, Habit, User};

use crate::error::{ClientError, Result};

/// Everything persisted between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionData {
    pub token: Option<String>,
    pub user: Option<User>,
    #[serde(default)]
    pub habits: Vec<Habit>,
    #[serde(default)]
    pub completions: Completions,
}

pub struct SessionStore {
    path: PathBuf,
    data: Mutex<SessionData>,
}

impl SessionStore {
    /// Load the session file; an unreadable or missing file yields an
    /// empty session.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|err| {
                warn!("failed to parse session file, starting empty: {err}");
                SessionData::default()
            }),
            Err(_) => SessionData::default(),
        };
        Self {
            path,
            data: Mutex::new(data),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.lock().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.lock().user.clone()
    }

    pub fn habits(&self) -> Vec<Habit> {
        self.lock().habits.clone()
    }

    pub fn completions(&self) -> Completions {
        self.lock().completions.clone()
    }

    /// Store the token and user returned by a successful login.
    pub fn set_session(&self, token: String, user: User) -> Result<()> {
        let mut data = self.lock();
        data.token = Some(token);
        data.user = Some(user);
        self.persist(&data)
    }

    /// Overwrite the cached snapshot with fresh server state.
    pub fn set_snapshot(&self, user: User, habits: Vec<Habit>, completions: Completions) -> Result<()> {
        let mut data = self.lock();
        data.user = Some(user);
        data.habits = habits;
        data.completions = completions;
        self.persist(&data)
    }

    pub fn set_habits(&self, habits: Vec<Habit>) -> Result<()> {
        let mut data = self.lock();
        data.habits = habits;
        self.persist(&data)
    }

    pub fn push_habit(&self, habit: Habit) -> Result<()> {
        let mut data = self.lock();
        data.habits.push(habit);
        self.persist(&data)
    }

    pub fn remove_habit(&self, habit_id: i64) -> Result<()> {
        let mut data = self.lock();
        data.habits.retain(|h| h.id != habit_id);
        self.persist(&data)
    }

    /// Flip a completion flag locally; returns the new value.
    pub fn toggle_completion(&self, key: &str) -> Result<bool> {
        let mut data = self.lock();
        let current = data.completions.get(key).copied().unwrap_or(false);
        data.completions.insert(key.to_string(), !current);
        self.persist(&data)?;
        Ok(!current)
    }

    pub fn patch_language(&self, language: &str) -> Result<()> {
        let mut data = self.lock();
        if let Some(user) = data.user.as_mut() {
            user.language = language.to_string();
        }
        self.persist(&data)
    }

    /// Drop habits and completions but keep the session itself.
    pub fn clear_data(&self) -> Result<()> {
        let mut data = self.lock();
        data.habits = Vec::new();
        data.completions = Completions::new();
        self.persist(&data)
    }

    /// Forget everything: token, user and cached snapshot.
    pub fn clear(&self) -> Result<()> {
        let mut data = self.lock();
        *data = SessionData::default();
        self.persist(&data)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionData> {
        // A poisoned lock means a panic while holding the guard; the data
        // is plain-old-data, so continuing is safe.
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, data: &SessionData) -> Result<()> {
        let payload = serde_json::to_vec_pretty(data)
            .map_err(|e| ClientError::Storage(format!("serialize session: {e}")))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ClientError::Storage(format!("create session dir: {e}")))?;
            }
        }
        std::fs::write(&self.path, payload)
            .map_err(|e| ClientError::Storage(format!("write session file: {e}")))
    }
}
