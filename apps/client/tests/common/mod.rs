//! Shared client test harness.
//!
//! Online tests run the real backend router on an ephemeral port inside
//! the test's tokio runtime; offline tests point the client at a port
//! nothing listens on.

use std::path::PathBuf;
use std::sync::Arc;

use habitgrid_backend::config::Config;
use habitgrid_backend::store::JsonStore;
use habitgrid_backend::{build_router, AppState};

use habitgrid_client::{ApiClient, SessionStore};

pub const ADMIN_CODE: &str = "Ismoil";
pub const ADMIN_PASSWORD: &str = "tox1roff_17";

/// Base URL guaranteed to refuse connections (port 9, discard, unbound).
pub const DEAD_SERVER: &str = "http://127.0.0.1:9";

pub fn unique_temp_path(tag: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    std::env::temp_dir().join(format!(
        "habitgrid-client-test-{tag}-{}-{}.json",
        std::process::id(),
        nanos
    ))
}

/// Start a backend with a fresh data file; returns its base URL.
pub async fn spawn_backend() -> String {
    let data_path = unique_temp_path("server");
    let config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        data_path: data_path.clone(),
        admin_code: ADMIN_CODE.to_string(),
        admin_password: ADMIN_PASSWORD.to_string(),
    };

    let store = Arc::new(JsonStore::open(data_path).await);
    let state = AppState {
        store,
        config: Arc::new(config),
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });

    format!("http://{addr}")
}

pub fn fresh_client(base_url: &str) -> ApiClient {
    let session = SessionStore::open(unique_temp_path("session"));
    ApiClient::new(base_url, session)
}

/// Client logged in as the seeded `toxir` user against a live backend.
pub async fn logged_in_client() -> ApiClient {
    let base_url = spawn_backend().await;
    let client = fresh_client(&base_url);
    client
        .login("toxir", "toxir123")
        .await
        .expect("seed login");
    client
}
