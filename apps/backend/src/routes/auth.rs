//! Login/logout handlers and the bearer-token middleware.
//!
//! Tokens are plain string tags, not signed credentials:
//! `admin_<ADMIN_CODE>` for the super-admin and `user_<code>` for
//! everyone else. Anyone who knows a login code can forge the matching
//! token; that weakness is inherited from the system this replaces.

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    Json,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::{Ack, LoginRequest, LoginResponse, User};
use crate::AppState;

/// Authenticated account info stored in request extensions.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub code: String,
    pub is_admin: bool,
}

impl AuthenticatedUser {
    /// The user code, rejecting the super-admin token. Habit and
    /// completion routes operate on per-user data the admin does not have.
    pub fn require_user(&self) -> Result<&str> {
        if self.is_admin {
            return Err(ApiError::Unauthorized(
                "admin token cannot access user data".to_string(),
            ));
        }
        Ok(&self.code)
    }
}

pub fn user_token(code: &str) -> String {
    format!("user_{code}")
}

pub fn admin_token(admin_code: &str) -> String {
    format!("admin_{admin_code}")
}

/// The synthetic account returned for the super-admin, which has no
/// record in the store.
pub fn admin_user(admin_code: &str) -> User {
    User {
        id: Uuid::nil(),
        code: admin_code.to_string(),
        username: "Super Admin".to_string(),
        language: "uz".to_string(),
        is_admin: true,
        created_at: chrono::DateTime::UNIX_EPOCH,
    }
}

fn bearer_token(request: &Request<Body>) -> Result<String> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("missing Authorization header".to_string()))?;

    Ok(header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("invalid Authorization format".to_string()))?
        .trim()
        .to_string())
}

/// Auth middleware for all protected routes.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let token = bearer_token(&request)?;

    let auth = if token == admin_token(&state.config.admin_code) {
        AuthenticatedUser {
            code: state.config.admin_code.clone(),
            is_admin: true,
        }
    } else if let Some(code) = token.strip_prefix("user_") {
        let user = state
            .store
            .get_user(code)
            .await
            .ok_or_else(|| ApiError::Unauthorized("invalid token".to_string()))?;
        AuthenticatedUser {
            code: user.code,
            is_admin: false,
        }
    } else {
        return Err(ApiError::Unauthorized("invalid token".to_string()));
    };

    request.extensions_mut().insert(auth);
    Ok(next.run(request).await)
}

/// Admin guard layered on top of [`auth_middleware`] for `/api/admin/*`.
pub async fn admin_middleware(request: Request<Body>, next: Next) -> Result<Response> {
    let auth = request
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or_else(|| ApiError::Unauthorized("missing auth context".to_string()))?;

    if !auth.is_admin {
        return Err(ApiError::Forbidden("admin privileges required".to_string()));
    }

    Ok(next.run(request).await)
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let code = payload.code.trim();
    let password = payload.password.trim();

    if code.is_empty() {
        return Err(ApiError::BadRequest("login code is required".to_string()));
    }
    if password.is_empty() {
        return Err(ApiError::BadRequest("password is required".to_string()));
    }

    // Super-admin login, checked against config rather than the store.
    if code == state.config.admin_code {
        if password != state.config.admin_password {
            return Err(ApiError::Unauthorized("wrong admin password".to_string()));
        }
        tracing::info!("admin logged in");
        return Ok(Json(LoginResponse {
            success: true,
            token: admin_token(&state.config.admin_code),
            user: admin_user(&state.config.admin_code),
        }));
    }

    let user = state.store.verify_login(code, password).await?;
    tracing::info!(code, "user logged in");

    Ok(Json(LoginResponse {
        success: true,
        token: user_token(code),
        user,
    }))
}

/// POST /api/auth/logout
///
/// Tokens are stateless, so there is nothing to revoke server-side.
pub async fn logout() -> Json<Ack> {
    Json(Ack::ok())
}
