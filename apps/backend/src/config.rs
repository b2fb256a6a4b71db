//! Environment-based configuration.

use std::env;
use std::path::PathBuf;

/// Server configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_path: PathBuf,
    /// Login code of the super-admin account.
    pub admin_code: String,
    pub admin_password: String,
}

impl Config {
    /// Build configuration from environment variables, with the defaults
    /// of the original deployment.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5001),
            data_path: env::var("HABITGRID_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data.json")),
            admin_code: env::var("HABITGRID_ADMIN_CODE").unwrap_or_else(|_| "Ismoil".to_string()),
            admin_password: env::var("HABITGRID_ADMIN_PASSWORD")
                .unwrap_or_else(|_| "tox1roff_17".to_string()),
        }
    }
}
