//! Process configuration read from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `LISTS_BACKEND` | `memory` (or `http`) |
//! | `LISTS_BACKEND_URL` | `http://localhost:8080` |
//! | `LISTS_USERNAME` | `cook` |
//! | `LISTS_ACCESS_TOKEN` | empty |
//! | `LISTS_CREATE_USER_PATH` | `/create_user` |
//! | `LISTS_CATALOG_PATH` | `/get_all_ingredients` |
//! | `LISTS_UNITS_PATH` | `/get_all_measurements` |
//! | `LISTS_PATH` | `/lists` |
//! | `LISTS_REQUEST_TIMEOUT_SECS` | `10` |
//! | `LISTS_COMPENSATION_ATTEMPTS` | `3` |
//! | `LISTS_COMPENSATION_BACKOFF_MS` | `200` |
//! | `BIND_ADDR` | `127.0.0.1:3001` |

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;

use crate::transfer::CompensationPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Memory,
    Http,
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mock" => Ok(BackendKind::Memory),
            "http" => Ok(BackendKind::Http),
            other => anyhow::bail!("Unknown backend '{}', expected 'memory' or 'http'", other),
        }
    }
}

/// Where the remote lists API lives and which paths it serves.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    pub base_url: String,
    pub create_user_path: String,
    pub catalog_path: String,
    pub units_path: String,
    pub lists_path: String,
    pub request_timeout: Duration,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            create_user_path: "/create_user".to_string(),
            catalog_path: "/get_all_ingredients".to_string(),
            units_path: "/get_all_measurements".to_string(),
            lists_path: "/lists".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }

    pub fn is_valid(&self) -> bool {
        [
            &self.base_url,
            &self.create_user_path,
            &self.catalog_path,
            &self.units_path,
            &self.lists_path,
        ]
        .iter()
        .all(|value| !value.trim().is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendKind,
    pub http: BackendConfig,
    pub username: String,
    pub access_token: String,
    pub compensation: CompensationPolicy,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let backend = env_or("LISTS_BACKEND", "memory").parse()?;

        let http = BackendConfig {
            base_url: env_or("LISTS_BACKEND_URL", "http://localhost:8080"),
            create_user_path: env_or("LISTS_CREATE_USER_PATH", "/create_user"),
            catalog_path: env_or("LISTS_CATALOG_PATH", "/get_all_ingredients"),
            units_path: env_or("LISTS_UNITS_PATH", "/get_all_measurements"),
            lists_path: env_or("LISTS_PATH", "/lists"),
            request_timeout: Duration::from_secs(parse_env("LISTS_REQUEST_TIMEOUT_SECS", 10)?),
        };

        if backend == BackendKind::Http && !http.is_valid() {
            anyhow::bail!("HTTP backend selected but its URL or endpoint paths are empty");
        }

        let defaults = CompensationPolicy::default();
        let compensation = CompensationPolicy {
            max_attempts: parse_env("LISTS_COMPENSATION_ATTEMPTS", defaults.max_attempts)?,
            backoff: Duration::from_millis(parse_env(
                "LISTS_COMPENSATION_BACKOFF_MS",
                defaults.backoff.as_millis() as u64,
            )?),
        };

        Ok(Self {
            backend,
            http,
            username: env_or("LISTS_USERNAME", "cook"),
            access_token: env::var("LISTS_ACCESS_TOKEN").unwrap_or_default(),
            compensation,
            bind_addr: env_or("BIND_ADDR", "127.0.0.1:3001"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid value '{}' for {}: {}", raw, key, e)),
        Err(_) => Ok(default),
    }
}
