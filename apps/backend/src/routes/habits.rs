//! Habit endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::error::{ApiError, Result};
use crate::models::{Ack, AddHabitRequest, HabitResponse, UpdateHabitsRequest};
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// POST /api/habits
pub async fn add(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<AddHabitRequest>,
) -> Result<Json<HabitResponse>> {
    let code = auth.require_user()?;

    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("habit name is required".to_string()));
    }

    let habit = state
        .store
        .add_habit(code, name, payload.emoji, payload.color)
        .await?;

    tracing::info!(code, habit_id = habit.id, "habit added");

    Ok(Json(HabitResponse {
        success: true,
        habit,
    }))
}

/// PUT /api/habits
/// Bulk replace, used for reorder.
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<UpdateHabitsRequest>,
) -> Result<Json<Ack>> {
    let code = auth.require_user()?;
    state.store.replace_habits(code, payload.habits).await?;
    Ok(Json(Ack::ok()))
}

/// DELETE /api/habits/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(habit_id): Path<i64>,
) -> Result<Json<Ack>> {
    let code = auth.require_user()?;
    state.store.delete_habit(code, habit_id).await?;
    tracing::info!(code, habit_id, "habit deleted");
    Ok(Json(Ack::ok()))
}
