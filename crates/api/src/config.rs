use std::str::FromStr;
use std::time::Duration;

/// Error raised when an environment variable holds an unparseable value.
#[derive(Debug, thiserror::Error)]
#[error("{var} has invalid value '{value}'")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Time allowed for final saves during shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Quiet period after the last edit before an autosave (default: `1500`).
    pub autosave_debounce_ms: u64,
    /// Sessions with no requests for this long are saved and closed
    /// (default: `1800`).
    pub session_idle_timeout_secs: u64,
    /// How often the idle-session sweep runs (default: `60`).
    pub session_sweep_interval_secs: u64,
    /// Text generation endpoint. Copy generation is disabled when unset.
    pub copy_endpoint: Option<String>,
    pub copy_api_key: Option<String>,
    /// PostgreSQL URL. The in-memory store is used when unset.
    pub database_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            cors_origins: vec!["http://localhost:5173".into()],
            request_timeout_secs: 30,
            shutdown_timeout_secs: 30,
            autosave_debounce_ms: 1500,
            session_idle_timeout_secs: 1800,
            session_sweep_interval_secs: 60,
            copy_endpoint: None,
            copy_api_key: None,
            database_url: None,
        }
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError { var, value }),
        None => Ok(default),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                     |
    /// |-------------------------------|-----------------------------|
    /// | `HOST`                        | `0.0.0.0`                   |
    /// | `PORT`                        | `3000`                      |
    /// | `CORS_ORIGINS`                | `http://localhost:5173`     |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                        |
    /// | `SHUTDOWN_TIMEOUT_SECS`       | `30`                        |
    /// | `AUTOSAVE_DEBOUNCE_MS`        | `1500`                      |
    /// | `SESSION_IDLE_TIMEOUT_SECS`   | `1800`                      |
    /// | `SESSION_SWEEP_INTERVAL_SECS` | `60`                        |
    /// | `COPY_ENDPOINT`               | unset (copy generation off) |
    /// | `COPY_API_KEY`                | unset                       |
    /// | `DATABASE_URL`                | unset (in-memory store)     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let cors_origins = match lookup("CORS_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.cors_origins,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            cors_origins,
            request_timeout_secs: parse_or(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,
            shutdown_timeout_secs: parse_or(
                &lookup,
                "SHUTDOWN_TIMEOUT_SECS",
                defaults.shutdown_timeout_secs,
            )?,
            autosave_debounce_ms: parse_or(
                &lookup,
                "AUTOSAVE_DEBOUNCE_MS",
                defaults.autosave_debounce_ms,
            )?,
            session_idle_timeout_secs: parse_or(
                &lookup,
                "SESSION_IDLE_TIMEOUT_SECS",
                defaults.session_idle_timeout_secs,
            )?,
            session_sweep_interval_secs: parse_or(
                &lookup,
                "SESSION_SWEEP_INTERVAL_SECS",
                defaults.session_sweep_interval_secs,
            )?,
            copy_endpoint: non_empty(lookup("COPY_ENDPOINT")),
            copy_api_key: non_empty(lookup("COPY_API_KEY")),
            database_url: non_empty(lookup("DATABASE_URL")),
        })
    }

    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_timeout_secs)
    }

    /// Never zero; `tokio::time::interval` panics on a zero period.
    pub fn session_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.session_sweep_interval_secs.max(1))
    }
}
