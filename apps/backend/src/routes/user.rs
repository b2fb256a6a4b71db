//! Per-user endpoints: snapshot sync, language, reset.

use axum::{extract::State, Extension, Json};

use crate::error::Result;
use crate::models::{Ack, Completions, SyncResponse, UpdateLanguageRequest};
use crate::routes::auth::{admin_user, AuthenticatedUser};
use crate::AppState;

/// GET /api/user/sync
///
/// The full snapshot for the authenticated account. The super-admin has
/// no habit data, so it gets its synthetic user and empty collections.
pub async fn sync(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<SyncResponse>> {
    if auth.is_admin {
        return Ok(Json(SyncResponse {
            success: true,
            user: admin_user(&state.config.admin_code),
            habits: Vec::new(),
            completions: Completions::new(),
        }));
    }

    let (user, habits, completions) = state.store.snapshot(&auth.code).await?;

    Ok(Json(SyncResponse {
        success: true,
        user,
        habits,
        completions,
    }))
}

/// PUT /api/user/language
pub async fn update_language(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<UpdateLanguageRequest>,
) -> Result<Json<Ack>> {
    let code = auth.require_user()?;
    state.store.set_language(code, &payload.language).await?;
    Ok(Json(Ack::ok()))
}

/// DELETE /api/user/reset
/// Clears every habit and completion for the authenticated user.
pub async fn reset(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<Ack>> {
    let code = auth.require_user()?;
    state.store.reset_user(code).await?;
    tracing::info!(code, "user data reset");
    Ok(Json(Ack::ok()))
}
