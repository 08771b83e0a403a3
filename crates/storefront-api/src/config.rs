//! Server configuration loaded from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DATABASE_URL` | `postgres://localhost/storefront` |
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `3001` |
//! | `DB_MAX_CONNECTIONS` | `10` |
//! | `DB_ACQUIRE_TIMEOUT_SECS` | `30` |
//! | `DB_IDLE_TIMEOUT_SECS` | `600` |
//! | `RUN_MIGRATIONS` | `true` |
//! | `SEED_DATABASE` | `false` |
//! | `CORS_ALLOWED_ORIGINS` | unset (any origin) |
//! | `LOG_FORMAT` | `text` (`json` for structured output) |
//! | `LOG_FILE` | unset (stdout) |
//! | `LOG_ANSI` | auto |

use std::str::FromStr;
use std::time::Duration;

use storefront_db::pool::{
    DEFAULT_ACQUIRE_TIMEOUT_SECS, DEFAULT_IDLE_TIMEOUT_SECS, DEFAULT_MAX_CONNECTIONS,
};
use storefront_db::PoolConfig;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/storefront";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Path of a daily-rotated log file; stdout when `None`.
    pub file: Option<String>,
    /// ANSI color override; auto-detected when `None`.
    pub ansi: Option<bool>,
}

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub db_idle_timeout_secs: u64,
    pub run_migrations: bool,
    pub seed_database: bool,
    /// Allowed CORS origins; any origin when `None`.
    pub cors_allowed_origins: Option<Vec<String>>,
    pub log: LogConfig,
    /// Problems found while parsing, logged once tracing is up.
    pub warnings: Vec<String>,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut warnings = Vec::new();

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT, &mut warnings);
        let db_max_connections = parse_or(
            &lookup,
            "DB_MAX_CONNECTIONS",
            DEFAULT_MAX_CONNECTIONS,
            &mut warnings,
        );
        let db_acquire_timeout_secs = parse_or(
            &lookup,
            "DB_ACQUIRE_TIMEOUT_SECS",
            DEFAULT_ACQUIRE_TIMEOUT_SECS,
            &mut warnings,
        );
        let db_idle_timeout_secs = parse_or(
            &lookup,
            "DB_IDLE_TIMEOUT_SECS",
            DEFAULT_IDLE_TIMEOUT_SECS,
            &mut warnings,
        );
        let run_migrations = lookup("RUN_MIGRATIONS").map(|v| is_truthy(&v)).unwrap_or(true);
        let seed_database = lookup("SEED_DATABASE").map(|v| is_truthy(&v)).unwrap_or(false);

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS").and_then(|v| {
            let origins: Vec<String> = v
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
            (!origins.is_empty()).then_some(origins)
        });

        let format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                warnings.push(format!("Unknown LOG_FORMAT '{}', using text", other));
                LogFormat::Text
            }
        };
        let log = LogConfig {
            format,
            file: lookup("LOG_FILE").filter(|f| !f.is_empty()),
            ansi: lookup("LOG_ANSI").map(|v| is_truthy(&v)),
        };

        Self {
            database_url,
            host,
            port,
            db_max_connections,
            db_acquire_timeout_secs,
            db_idle_timeout_secs,
            run_migrations,
            seed_database,
            cors_allowed_origins,
            log,
            warnings,
        }
    }

    /// Pool settings for the catalog database.
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            max_connections: self.db_max_connections,
            acquire_timeout: Duration::from_secs(self.db_acquire_timeout_secs),
            idle_timeout: Duration::from_secs(self.db_idle_timeout_secs),
        }
    }

    /// Socket address string to bind the listener to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim(), "true" | "1" | "yes")
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T, warnings: &mut Vec<String>) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warnings.push(format!(
                "Invalid {} value '{}', using default {}",
                key, raw, default
            ));
            default
        }),
    }
}
