//! Remote API client.
//!
//! Single point of contact with the backend. Every mutation maps to one
//! HTTP request; when the request cannot be delivered the client falls
//! back to the cached snapshot, applies the change optimistically and
//! records it in the sync queue. Each operation has one explicit policy:
//!
//! - `login`, `delete_habit`, `reset_data` propagate errors
//!   (`delete_habit` also queues a retry);
//! - `add_habit`, `update_habits`, `toggle_completion`, `update_language`
//!   never fail, returning [`Outcome::Queued`] instead;
//! - `sync_data` never fails either, degrading to the cached snapshot;
//! - `check_health` maps every failure to `false`.

use std::sync::Arc;

use chrono::Utc;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use habit_core::key::completion_key;
use habit_core::stats::{self, MonthStats};
use habit_core::types::{Completions, Habit, User};

use crate::error::{ClientError, Result};
use crate::queue::{NewHabit, SyncAction, SyncQueue};
use crate::session::SessionStore;

/// Result of a mutation, distinguishing a server-confirmed change from an
/// optimistic local one awaiting replay.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The server acknowledged the mutation.
    Confirmed(T),
    /// The server was unreachable; the mutation was applied locally and
    /// queued for replay.
    Queued(T),
}

impl<T> Outcome<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Confirmed(value) | Self::Queued(value) => value,
        }
    }

    pub fn is_queued(&self) -> bool {
        matches!(self, Self::Queued(_))
    }
}

/// Token and user returned by a successful login.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginSuccess {
    pub token: String,
    pub user: User,
}

/// The data a UI renders: user, habits and completions, either fresh from
/// the server or out of the local cache.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub user: Option<User>,
    pub habits: Vec<Habit>,
    pub completions: Completions,
    /// True when the server was unreachable and this is cached data.
    pub from_cache: bool,
}

impl Snapshot {
    /// Aggregate completion percentage across every habit for one month.
    pub fn overall_stats(&self, year: i32, month: u32) -> MonthStats {
        stats::overall_stats(&self.habits, &self.completions, year, month)
    }

    /// Completion percentage for a single habit over one month.
    pub fn habit_stats(&self, habit_id: i64, year: i32, month: u32) -> MonthStats {
        stats::habit_stats(habit_id, &self.completions, year, month)
    }
}

// === Wire types ===

#[derive(Serialize)]
struct LoginRequest<'a> {
    code: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    user: User,
}

#[derive(Deserialize)]
struct SyncResponse {
    user: User,
    habits: Vec<Habit>,
    completions: Completions,
}

#[derive(Deserialize)]
struct HabitResponse {
    habit: Habit,
}

#[derive(Serialize)]
struct UpdateHabitsRequest<'a> {
    habits: &'a [Habit],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToggleRequest {
    habit_id: i64,
    day: u32,
    month: u32,
    year: i32,
}

#[derive(Deserialize)]
struct ToggleResponse {
    completed: bool,
}

#[derive(Serialize)]
struct LanguageRequest<'a> {
    language: &'a str,
}

#[derive(Deserialize)]
struct Ack {
    #[allow(dead_code)]
    success: bool,
}

#[derive(Deserialize)]
struct HealthResponse {
    status: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

struct ClientInner {
    http: Client,
    base_url: String,
    session: SessionStore,
    queue: SyncQueue,
}

/// Clone-able handle to the sync client; all state sits behind an `Arc`
/// so clones share the session cache and the queue.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://localhost:5001`.
    pub fn new(base_url: impl Into<String>, session: SessionStore) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                http: Client::new(),
                base_url: base_url.into().trim_end_matches('/').to_string(),
                session,
                queue: SyncQueue::new(),
            }),
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    pub fn queue(&self) -> &SyncQueue {
        &self.inner.queue
    }

    // === Auth ===

    /// Log in with a code/password pair. Persists the token and user on
    /// success. Login failures are never queued for retry.
    pub async fn login(&self, code: &str, password: &str) -> Result<LoginSuccess> {
        let resp: LoginResponse = self
            .request(
                Method::POST,
                "/api/auth/login",
                Some(&LoginRequest { code, password }),
                false,
            )
            .await?;

        self.inner
            .session
            .set_session(resp.token.clone(), resp.user.clone())?;
        tracing::info!(code, "logged in");

        Ok(LoginSuccess {
            token: resp.token,
            user: resp.user,
        })
    }

    /// Log out. The local session is cleared even when the server call
    /// fails; a stateless token has nothing to revoke anyway.
    pub async fn logout(&self) {
        if let Err(err) = self
            .request::<(), Ack>(Method::POST, "/api/auth/logout", None, true)
            .await
        {
            tracing::warn!(error = %err, "logout request failed");
        }
        if let Err(err) = self.inner.session.clear() {
            tracing::warn!(error = %err, "failed to clear session file");
        }
    }

    // === Sync ===

    /// Fetch the full snapshot. On success the local cache is overwritten
    /// wholesale. On failure this degrades to the cached snapshot and
    /// never returns an error; a 401 additionally clears the session.
    pub async fn sync_data(&self) -> Snapshot {
        match self
            .request::<(), SyncResponse>(Method::GET, "/api/user/sync", None, true)
            .await
        {
            Ok(resp) => {
                if let Err(err) = self.inner.session.set_snapshot(
                    resp.user.clone(),
                    resp.habits.clone(),
                    resp.completions.clone(),
                ) {
                    tracing::warn!(error = %err, "failed to cache snapshot");
                }
                Snapshot {
                    user: Some(resp.user),
                    habits: resp.habits,
                    completions: resp.completions,
                    from_cache: false,
                }
            }
            Err(err) => {
                if matches!(err, ClientError::SessionExpired) {
                    tracing::warn!("session rejected by server, clearing");
                    if let Err(clear_err) = self.inner.session.clear() {
                        tracing::warn!(error = %clear_err, "failed to clear session file");
                    }
                } else {
                    tracing::warn!(error = %err, "sync failed, serving cached snapshot");
                }
                Snapshot {
                    user: self.inner.session.user(),
                    habits: self.inner.session.habits(),
                    completions: self.inner.session.completions(),
                    from_cache: true,
                }
            }
        }
    }

    // === Habits ===

    /// Add a habit. Offline, a provisional habit with a locally generated
    /// id stands in until the queued request replays.
    pub async fn add_habit(&self, habit: NewHabit) -> Outcome<Habit> {
        match self
            .request::<NewHabit, HabitResponse>(Method::POST, "/api/habits", Some(&habit), true)
            .await
        {
            Ok(resp) => {
                if let Err(err) = self.inner.session.push_habit(resp.habit.clone()) {
                    tracing::warn!(error = %err, "failed to cache new habit");
                }
                Outcome::Confirmed(resp.habit)
            }
            Err(err) => {
                tracing::warn!(error = %err, "add habit failed, queueing");
                self.inner.queue.enqueue(SyncAction::AddHabit(habit.clone()));

                let provisional = Habit {
                    id: Utc::now().timestamp_millis(),
                    name: habit.name,
                    emoji: habit.emoji.unwrap_or_else(|| "✨".to_string()),
                    color: habit.color.unwrap_or_else(|| "bg-cyan-100".to_string()),
                    order: self.inner.session.habits().len() as u32,
                    created_at: Utc::now(),
                    provisional: true,
                };
                if let Err(err) = self.inner.session.push_habit(provisional.clone()) {
                    tracing::warn!(error = %err, "failed to cache provisional habit");
                }
                Outcome::Queued(provisional)
            }
        }
    }

    /// Delete a habit. The one mutation whose failure propagates: the
    /// deletion is queued for replay, but the caller still sees the error.
    pub async fn delete_habit(&self, habit_id: i64) -> Result<()> {
        match self
            .request::<(), Ack>(Method::DELETE, &format!("/api/habits/{habit_id}"), None, true)
            .await
        {
            Ok(_) => {
                if let Err(err) = self.inner.session.remove_habit(habit_id) {
                    tracing::warn!(error = %err, "failed to update cached habits");
                }
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "delete habit failed, queueing");
                self.inner.queue.enqueue(SyncAction::DeleteHabit { habit_id });
                Err(err)
            }
        }
    }

    /// Bulk replace the habit list (reorder). Optimistic: the new list is
    /// written to the cache whether or not the server accepted it.
    pub async fn update_habits(&self, habits: Vec<Habit>) -> Outcome<()> {
        let result = self
            .request::<UpdateHabitsRequest, Ack>(
                Method::PUT,
                "/api/habits",
                Some(&UpdateHabitsRequest { habits: &habits }),
                true,
            )
            .await;

        let outcome = match result {
            Ok(_) => Outcome::Confirmed(()),
            Err(err) => {
                tracing::warn!(error = %err, "update habits failed, queueing");
                self.inner.queue.enqueue(SyncAction::UpdateHabits {
                    habits: habits.clone(),
                });
                Outcome::Queued(())
            }
        };

        if let Err(err) = self.inner.session.set_habits(habits) {
            tracing::warn!(error = %err, "failed to cache habit list");
        }
        outcome
    }

    // === Completions ===

    /// Toggle one completion flag; returns the resulting value. Offline,
    /// the flag is flipped in the local cache and the toggle is queued.
    pub async fn toggle_completion(
        &self,
        habit_id: i64,
        day: u32,
        month: u32,
        year: i32,
    ) -> Outcome<bool> {
        let request = ToggleRequest {
            habit_id,
            day,
            month,
            year,
        };
        match self
            .request::<ToggleRequest, ToggleResponse>(
                Method::POST,
                "/api/completions/toggle",
                Some(&request),
                true,
            )
            .await
        {
            Ok(resp) => Outcome::Confirmed(resp.completed),
            Err(err) => {
                tracing::warn!(error = %err, "toggle failed, queueing");
                self.inner.queue.enqueue(SyncAction::ToggleCompletion {
                    habit_id,
                    day,
                    month,
                    year,
                });

                let key = completion_key(habit_id, year, month, day);
                let flipped = self.inner.session.toggle_completion(&key).unwrap_or_else(|err| {
                    tracing::warn!(error = %err, "failed to persist local toggle");
                    // The in-memory flip still happened; read it back.
                    self.inner.session.completions().get(&key).copied().unwrap_or(false)
                });
                Outcome::Queued(flipped)
            }
        }
    }

    // === User settings ===

    /// Change the interface language. Failures are queued silently; the
    /// cached user is only patched once the server confirms.
    pub async fn update_language(&self, language: &str) -> Outcome<()> {
        match self
            .request::<LanguageRequest, Ack>(
                Method::PUT,
                "/api/user/language",
                Some(&LanguageRequest { language }),
                true,
            )
            .await
        {
            Ok(_) => {
                if let Err(err) = self.inner.session.patch_language(language) {
                    tracing::warn!(error = %err, "failed to patch cached user");
                }
                Outcome::Confirmed(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "language update failed, queueing");
                self.inner.queue.enqueue(SyncAction::UpdateLanguage {
                    language: language.to_string(),
                });
                Outcome::Queued(())
            }
        }
    }

    /// Wipe all habits and completions. Destructive, so never silently
    /// retried: failures propagate and nothing is queued.
    pub async fn reset_data(&self) -> Result<()> {
        self.request::<(), Ack>(Method::DELETE, "/api/user/reset", None, true)
            .await?;
        self.inner.session.clear_data()?;
        Ok(())
    }

    // === Health ===

    /// Liveness probe; any failure maps to `false`.
    pub async fn check_health(&self) -> bool {
        match self
            .request::<(), HealthResponse>(Method::GET, "/api/health", None, false)
            .await
        {
            Ok(resp) => resp.status == "OK",
            Err(_) => false,
        }
    }

    // === Sync queue ===

    /// Replay queued mutations in FIFO order. Single-flight: a second
    /// call while a drain is running returns immediately. A failed item
    /// moves to the tail and ends the pass; remaining items wait for the
    /// next online transition.
    pub async fn process_sync_queue(&self) {
        if !self.inner.queue.try_begin_drain() {
            tracing::debug!("drain already in progress");
            return;
        }

        tracing::info!(pending = self.inner.queue.len(), "processing sync queue");

        while let Some(item) = self.inner.queue.pop_front() {
            match self.replay(&item.action).await {
                Ok(()) => {
                    tracing::debug!(action = item.action.name(), "replayed");
                }
                Err(err) => {
                    tracing::warn!(
                        action = item.action.name(),
                        error = %err,
                        "replay failed, halting drain"
                    );
                    self.inner.queue.requeue(item);
                    break;
                }
            }
        }

        self.inner.queue.end_drain();
    }

    /// Issue the plain HTTP request for one queued action, with none of
    /// the optimistic fallbacks: a replay failure must surface so the
    /// drain can stop.
    async fn replay(&self, action: &SyncAction) -> Result<()> {
        match action {
            SyncAction::AddHabit(habit) => {
                let _: HabitResponse = self
                    .request(Method::POST, "/api/habits", Some(habit), true)
                    .await?;
            }
            SyncAction::DeleteHabit { habit_id } => {
                let _: Ack = self
                    .request::<(), _>(
                        Method::DELETE,
                        &format!("/api/habits/{habit_id}"),
                        None,
                        true,
                    )
                    .await?;
            }
            SyncAction::UpdateHabits { habits } => {
                let _: Ack = self
                    .request(
                        Method::PUT,
                        "/api/habits",
                        Some(&UpdateHabitsRequest { habits }),
                        true,
                    )
                    .await?;
            }
            SyncAction::ToggleCompletion {
                habit_id,
                day,
                month,
                year,
            } => {
                let _: ToggleResponse = self
                    .request(
                        Method::POST,
                        "/api/completions/toggle",
                        Some(&ToggleRequest {
                            habit_id: *habit_id,
                            day: *day,
                            month: *month,
                            year: *year,
                        }),
                        true,
                    )
                    .await?;
            }
            SyncAction::UpdateLanguage { language } => {
                let _: Ack = self
                    .request(
                        Method::PUT,
                        "/api/user/language",
                        Some(&LanguageRequest { language }),
                        true,
                    )
                    .await?;
            }
        }
        Ok(())
    }

    // === Transport ===

    async fn request<B, R>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        with_auth: bool,
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.inner.base_url, path);
        let mut request = self.inner.http.request(method, &url);

        if with_auth {
            if let Some(token) = self.inner.session.token() {
                request = request.bearer_auth(token);
            }
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED && with_auth {
                return Err(ClientError::SessionExpired);
            }
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| status.to_string());
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }
}
