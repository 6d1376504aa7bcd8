use std::path::PathBuf;

/// Which [`MovieStore`](reel_db::store::MovieStore) backs the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    /// Process-local storage, lost on restart.
    Memory,
}

/// Log output format for the `fmt` subscriber layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL have sensible defaults suitable for
/// local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub store: StoreBackend,
    /// Directory uploaded posters are written under.
    pub media_root: PathBuf,
    /// Public URL prefix `media_root` is served at, without trailing slash.
    pub media_url: String,
    /// Request body limit, which bounds poster uploads.
    pub max_upload_bytes: usize,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `8000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `MOVIE_STORE`          | `postgres`                 |
    /// | `DATABASE_URL`         | required for `postgres`    |
    /// | `DB_MAX_CONNECTIONS`   | `20`                       |
    /// | `MEDIA_ROOT`           | `media`                    |
    /// | `MEDIA_URL`            | `/media`                   |
    /// | `MAX_UPLOAD_BYTES`     | `10485760`                 |
    /// | `LOG_FORMAT`           | `pretty`                   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var("HOST", "0.0.0.0");
        let port = parse(&lookup, "PORT", 8000)?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = parse(&lookup, "REQUEST_TIMEOUT_SECS", 30)?;

        let store = match var("MOVIE_STORE", "postgres").to_lowercase().as_str() {
            "postgres" => StoreBackend::Postgres {
                database_url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
                max_connections: parse(&lookup, "DB_MAX_CONNECTIONS", 20)?,
            },
            "memory" => StoreBackend::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    var: "MOVIE_STORE",
                    reason: format!("expected 'postgres' or 'memory', got '{other}'"),
                })
            }
        };

        let media_root = PathBuf::from(var("MEDIA_ROOT", "media"));

        let media_url = var("MEDIA_URL", "/media").trim_end_matches('/').to_string();
        if !media_url.starts_with('/') {
            return Err(ConfigError::Invalid {
                var: "MEDIA_URL",
                reason: format!("must be an absolute path below '/', got '{media_url}'"),
            });
        }

        let max_upload_bytes = parse(&lookup, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?;

        let log_format = match var("LOG_FORMAT", "pretty").to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::Invalid {
                    var: "LOG_FORMAT",
                    reason: format!("expected 'pretty' or 'json', got '{other}'"),
                })
            }
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            store,
            media_root,
            media_url,
            max_upload_bytes,
            log_format,
        })
    }
}

fn parse<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
    }
}
