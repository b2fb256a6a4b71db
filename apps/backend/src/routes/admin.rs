//! Admin endpoints: user CRUD and password resets.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::{ApiError, Result};
use crate::models::{
    Ack, ChangePasswordRequest, CreateUserRequest, CreateUserResponse, UsersResponse,
};
use crate::AppState;

/// POST /api/admin/create-user
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<CreateUserResponse>> {
    let code = payload.code.trim();
    let username = payload.username.trim();
    let password = payload.password.trim();

    if code.is_empty() || username.is_empty() || password.is_empty() {
        return Err(ApiError::BadRequest(
            "code, username and password are required".to_string(),
        ));
    }

    let user = state
        .store
        .create_user(code, username, password, &payload.language)
        .await?;

    tracing::info!(code, "user created by admin");

    Ok(Json(CreateUserResponse {
        success: true,
        user,
    }))
}

/// DELETE /api/admin/delete-user/:code
pub async fn delete_user(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Ack>> {
    state.store.delete_user(&code).await?;
    tracing::info!(%code, "user deleted by admin");
    Ok(Json(Ack::ok()))
}

/// PUT /api/admin/change-password/:code
pub async fn change_password(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<Ack>> {
    let new_password = payload.new_password.trim();
    if new_password.is_empty() {
        return Err(ApiError::BadRequest("new password is required".to_string()));
    }

    state.store.change_password(&code, new_password).await?;
    tracing::info!(%code, "password changed by admin");
    Ok(Json(Ack::ok()))
}

/// GET /api/admin/users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UsersResponse>> {
    let users = state.store.list_users().await;
    let count = users.len();
    Ok(Json(UsersResponse {
        success: true,
        users,
        count,
    }))
}
