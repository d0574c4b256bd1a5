//! Server configuration from environment variables.
//!
//! Variables are read after `dotenvy::dotenv()` in `main`, so a local `.env`
//! file works for development.
//!
//! | Variable | Default |
//! |---|---|
//! | `DATABASE_URL` | `postgres://localhost/sharenote` |
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `8000` |
//! | `ALLOWED_ORIGINS` | `http://localhost:5173,http://localhost:3000` |
//! | `DB_MAX_CONNECTIONS` | `10` |
//! | `DB_MIN_CONNECTIONS` | `1` |
//! | `DB_ACQUIRE_TIMEOUT_SECS` | `30` |
//! | `DB_IDLE_TIMEOUT_SECS` | `600` |
//! | `DB_MAX_LIFETIME_SECS` | `1800` (`0` disables recycling) |
//! | `RATE_LIMIT_ENABLED` | `true` |
//! | `RATE_LIMIT_REQUESTS` | `100` |
//! | `RATE_LIMIT_PERIOD_SECS` | `60` |
//! | `REQUEST_BODY_LIMIT_BYTES` | `1048576` |
//! | `STORE_BACKEND` | `postgres` (or `memory`) |

use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use sharenote_core::{Error, Result};
use sharenote_db::pool::{self, PoolConfig};

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/sharenote";
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";
pub const DEFAULT_REQUEST_BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Which repository implementation backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(Error::Config(format!("Unknown STORE_BACKEND: {}", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub db_idle_timeout_secs: u64,
    /// `None` when `DB_MAX_LIFETIME_SECS=0`.
    pub db_max_lifetime_secs: Option<u64>,
    pub rate_limit_enabled: bool,
    pub rate_limit_requests: u32,
    pub rate_limit_period_secs: u64,
    pub request_body_limit_bytes: usize,
    pub store_backend: StoreBackend,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            allowed_origins: split_origins(DEFAULT_ALLOWED_ORIGINS),
            db_max_connections: pool::DEFAULT_MAX_CONNECTIONS,
            db_min_connections: pool::DEFAULT_MIN_CONNECTIONS,
            db_acquire_timeout_secs: pool::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            db_idle_timeout_secs: pool::DEFAULT_IDLE_TIMEOUT_SECS,
            db_max_lifetime_secs: Some(pool::DEFAULT_MAX_LIFETIME_SECS),
            rate_limit_enabled: true,
            rate_limit_requests: 100,
            rate_limit_period_secs: 60,
            request_body_limit_bytes: DEFAULT_REQUEST_BODY_LIMIT_BYTES,
            store_backend: StoreBackend::Postgres,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let allowed_origins = match lookup("ALLOWED_ORIGINS") {
            Some(v) if !v.trim().is_empty() => split_origins(&v),
            _ => defaults.allowed_origins,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT", defaults.port)?,
            allowed_origins,
            db_max_connections: parse_var(
                &lookup,
                "DB_MAX_CONNECTIONS",
                defaults.db_max_connections,
            )?,
            db_min_connections: parse_var(
                &lookup,
                "DB_MIN_CONNECTIONS",
                defaults.db_min_connections,
            )?,
            db_acquire_timeout_secs: parse_var(
                &lookup,
                "DB_ACQUIRE_TIMEOUT_SECS",
                defaults.db_acquire_timeout_secs,
            )?,
            db_idle_timeout_secs: parse_var(
                &lookup,
                "DB_IDLE_TIMEOUT_SECS",
                defaults.db_idle_timeout_secs,
            )?,
            db_max_lifetime_secs: match parse_var(
                &lookup,
                "DB_MAX_LIFETIME_SECS",
                pool::DEFAULT_MAX_LIFETIME_SECS,
            )? {
                0 => None,
                secs => Some(secs),
            },
            rate_limit_enabled: lookup("RATE_LIMIT_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.rate_limit_enabled),
            rate_limit_requests: parse_var(
                &lookup,
                "RATE_LIMIT_REQUESTS",
                defaults.rate_limit_requests,
            )?,
            rate_limit_period_secs: parse_var(
                &lookup,
                "RATE_LIMIT_PERIOD_SECS",
                defaults.rate_limit_period_secs,
            )?,
            request_body_limit_bytes: parse_var(
                &lookup,
                "REQUEST_BODY_LIMIT_BYTES",
                defaults.request_body_limit_bytes,
            )?,
            store_backend: match lookup("STORE_BACKEND") {
                Some(v) => v.parse()?,
                None => defaults.store_backend,
            },
        })
    }

    /// Pool settings for the Postgres backend.
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new()
            .max_connections(self.db_max_connections)
            .min_connections(self.db_min_connections)
            .acquire_timeout(Duration::from_secs(self.db_acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(self.db_idle_timeout_secs))
            .max_lifetime(self.db_max_lifetime_secs.map(Duration::from_secs))
    }

    /// Socket address string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// CORS origins as header values. Unparseable entries are skipped with a warning.
    pub fn cors_origins(&self) -> Vec<HeaderValue> {
        self.allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", origin, e);
                    None
                }
            })
            .collect()
    }
}

fn split_origins(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, raw))),
        None => Ok(default),
    }
}
