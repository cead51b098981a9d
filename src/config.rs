use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::api::BackendConfig;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub backend_url: String,
    pub backend_timeout: Duration,
    pub support_email: String,
    pub upload_limit_bytes: usize,
}

impl Config {
    /// Reads settings from the environment, falling back to local defaults.
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:workout_tracker.db?mode=rwc".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", 3001),
            backend_url: env::var("BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            backend_timeout: Duration::from_secs(parse_var("BACKEND_TIMEOUT_SECS", 30)),
            support_email: env::var("SUPPORT_EMAIL")
                .unwrap_or_else(|_| "support@example.com".to_string()),
            upload_limit_bytes: megabytes(parse_var("UPLOAD_LIMIT_MB", 100)),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn backend(&self) -> BackendConfig {
        BackendConfig {
            base_url: self.backend_url.clone(),
            timeout: self.backend_timeout,
        }
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Huge values clamp to `usize::MAX` instead of overflowing.
fn megabytes(mb: usize) -> usize {
    mb.saturating_mul(1024 * 1024)
}
