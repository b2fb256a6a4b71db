pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use axum::{
    extract::State,
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::models::HealthResponse;
use crate::store::JsonStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<JsonStore>,
    pub config: Arc<Config>,
}

/// Build the full router. Shared between `run` and the test harnesses.
pub fn build_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/api/admin/create-user", post(routes::admin::create_user))
        .route(
            "/api/admin/delete-user/:code",
            delete(routes::admin::delete_user),
        )
        .route(
            "/api/admin/change-password/:code",
            put(routes::admin::change_password),
        )
        .route("/api/admin/users", get(routes::admin::list_users))
        .layer(middleware::from_fn(routes::auth::admin_middleware));

    let protected_routes = Router::new()
        // User routes
        .route("/api/user/sync", get(routes::user::sync))
        .route("/api/user/language", put(routes::user::update_language))
        .route("/api/user/reset", delete(routes::user::reset))
        // Habit routes
        .route("/api/habits", post(routes::habits::add))
        .route("/api/habits", put(routes::habits::update))
        .route("/api/habits/:id", delete(routes::habits::delete))
        // Completion routes
        .route(
            "/api/completions/toggle",
            post(routes::completions::toggle),
        )
        // Logout needs a token to make sense, nothing else
        .route("/api/auth/logout", post(routes::auth::logout))
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/login", post(routes::auth::login))
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    tracing::info!(path = %config.data_path.display(), "opening data file");
    let store = JsonStore::open(config.data_path.clone()).await;

    let addr = format!("{}:{}", config.host, config.port);

    let state = AppState {
        store: Arc::new(store),
        config: Arc::new(config),
    };
    let app = build_router(state);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// GET /api/health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: chrono::Utc::now(),
        users_count: state.store.users_count().await,
        data_file: state.store.data_file_exists(),
    })
}
