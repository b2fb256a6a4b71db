//! Shared integration test harness.
//!
//! Each test context gets its own throwaway data file under the system
//! temp directory, so tests never share state and can run in parallel.

pub mod fixtures;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;

use habitgrid_backend::config::Config;
use habitgrid_backend::store::JsonStore;
use habitgrid_backend::{build_router, AppState};

pub const ADMIN_CODE: &str = "Ismoil";
pub const ADMIN_PASSWORD: &str = "tox1roff_17";

/// Test context owning the store and router for one isolated server.
pub struct TestContext {
    pub store: Arc<JsonStore>,
    app: Router,
    data_path: PathBuf,
}

impl TestContext {
    pub async fn new() -> Self {
        let data_path = unique_data_path();
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            data_path: data_path.clone(),
            admin_code: ADMIN_CODE.to_string(),
            admin_password: ADMIN_PASSWORD.to_string(),
        };

        let store = Arc::new(JsonStore::open(data_path.clone()).await);
        let state = AppState {
            store: store.clone(),
            config: Arc::new(config),
        };

        Self {
            store,
            app: build_router(state),
            data_path,
        }
    }

    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {}", token)
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.data_path);
    }
}

/// Log in and return the bearer token.
pub async fn login_token(server: &TestServer, code: &str, password: &str) -> String {
    let response = server
        .post("/api/auth/login")
        .json(&fixtures::login_body(code, password))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    body["token"].as_str().expect("login response token").to_string()
}

fn unique_data_path() -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    std::env::temp_dir().join(format!(
        "habitgrid-test-{}-{}.json",
        std::process::id(),
        nanos
    ))
}
