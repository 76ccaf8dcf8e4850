// src/config.rs
use crate::errors::ServerError;
use std::net::SocketAddr;

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: String,
    pub schema_path: String,
    pub bind_addr: SocketAddr,
    pub max_workers: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: "listings.sqlite3".to_string(),
            schema_path: "sql/schema.sql".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_workers: 8,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ServerError> {
        // A missing .env file is fine, real env vars still apply.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = AppConfig::default();

        if let Some(path) = lookup("DATABASE_PATH") {
            cfg.database_path = path;
        }
        if let Some(path) = lookup("SCHEMA_PATH") {
            cfg.schema_path = path;
        }
        if let Some(addr) = lookup("BIND_ADDR") {
            cfg.bind_addr = addr
                .parse()
                .map_err(|e| ServerError::Config(format!("BIND_ADDR '{addr}': {e}")))?;
        }
        if let Some(workers) = lookup("MAX_WORKERS") {
            cfg.max_workers = workers
                .parse()
                .ok()
                .filter(|n: &usize| *n > 0)
                .ok_or_else(|| {
                    ServerError::Config(format!("MAX_WORKERS must be a positive integer, got '{workers}'"))
                })?;
        }

        Ok(cfg)
    }
}
