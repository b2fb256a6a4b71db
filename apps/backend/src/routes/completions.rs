//! Completion endpoints

use axum::{extract::State, Extension, Json};

use crate::error::Result;
use crate::models::{ToggleCompletionRequest, ToggleCompletionResponse};
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// POST /api/completions/toggle
pub async fn toggle(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<ToggleCompletionRequest>,
) -> Result<Json<ToggleCompletionResponse>> {
    let code = auth.require_user()?;

    let completed = state
        .store
        .toggle_completion(
            code,
            payload.habit_id,
            payload.year,
            payload.month,
            payload.day,
        )
        .await?;

    Ok(Json(ToggleCompletionResponse {
        success: true,
        completed,
    }))
}
