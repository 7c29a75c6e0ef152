//! Configuration management for the banking server.
//!
//! Loads configuration from environment variables with sensible defaults.

use banking_telemetry::TelemetryConfig;
use std::env;
use std::path::PathBuf;

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,banking_web=debug";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Telemetry sinks
    pub telemetry: TelemetryConfig,
}

/// Log line format of the process-wide subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind address (default: 0.0.0.0)
    pub host: String,
    /// Port (default: 3000)
    pub port: u16,
    /// Ledger file; unset keeps the ledger in memory
    pub ledger_path: Option<PathBuf>,
    /// Directory of static assets served as fallback
    pub static_dir: Option<PathBuf>,
    /// Log format
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            ledger_path: None,
            static_dir: None,
            log_format: LogFormat::Text,
        }
    }
}

fn path_var(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
}

impl ServerConfig {
    /// Load `HOST`, `PORT`, `LEDGER_PATH`, `STATIC_DIR` and `LOG_FORMAT`.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            ledger_path: path_var("LEDGER_PATH"),
            static_dir: path_var("STATIC_DIR"),
            log_format: env::var("LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
        }
    }

    /// `host:port`
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            telemetry: TelemetryConfig::from_env(),
        }
    }
}
