use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Which `ApplicationStore` backs the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Postgres => "postgres",
            StorageBackend::Memory => "memory",
        }
    }
}

/// Application configuration loaded from environment variables.
/// Everything is optional: with no variables set the API runs on the
/// in-memory store with the AI coach in fallback mode.
#[derive(Debug, Clone)]
pub struct Config {
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_connect_timeout: Duration,
    pub anthropic_api_key: Option<String>,
    pub ai_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage_backend: StorageBackend::Memory,
            database_url: None,
            db_max_connections: 10,
            db_connect_timeout: Duration::from_secs(5),
            anthropic_api_key: None,
            ai_timeout: Duration::from_secs(20),
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();

        let database_url = get("DATABASE_URL");
        let storage_backend = match get("STORAGE_BACKEND").as_deref() {
            Some("postgres") => StorageBackend::Postgres,
            Some("memory") => StorageBackend::Memory,
            Some(other) => bail!("STORAGE_BACKEND must be 'postgres' or 'memory', got '{other}'"),
            None if database_url.is_some() => StorageBackend::Postgres,
            None => StorageBackend::Memory,
        };

        Ok(Config {
            storage_backend,
            database_url,
            db_max_connections: parse_or(
                "DB_MAX_CONNECTIONS",
                get("DB_MAX_CONNECTIONS"),
                defaults.db_max_connections,
            )?,
            db_connect_timeout: Duration::from_secs(parse_or(
                "DB_CONNECT_TIMEOUT_SECS",
                get("DB_CONNECT_TIMEOUT_SECS"),
                defaults.db_connect_timeout.as_secs(),
            )?),
            anthropic_api_key: get("ANTHROPIC_API_KEY"),
            ai_timeout: Duration::from_secs(parse_or(
                "AI_TIMEOUT_SECS",
                get("AI_TIMEOUT_SECS"),
                defaults.ai_timeout.as_secs(),
            )?),
            port: parse_or("PORT", get("PORT"), defaults.port)?,
            rust_log: get("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(v) => v
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{v}'")),
        None => Ok(default),
    }
}
