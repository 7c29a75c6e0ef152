//! Event collector configuration.

use crate::error::TelemetryError;
use reqwest::Url;
use std::env;
use std::time::Duration;

/// Authorization scheme placed before the token.
pub const DEFAULT_AUTH_SCHEME: &str = "Splunk";

/// Sourcetype reported when none is configured.
pub const DEFAULT_SOURCETYPE: &str = "_json";

const DEFAULT_SOURCE: &str = "banking-app";
const DEFAULT_APP: &str = "banking-app";
const DEFAULT_ENVIRONMENT: &str = "development";
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Event collector settings.
///
/// Endpoint and token are optional; without both the sink only logs
/// locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HecConfig {
    /// Collector URL (`http://` or `https://`)
    pub endpoint: Option<String>,
    /// Collector token
    pub token: Option<String>,
    /// Scheme used in the `Authorization` header
    pub auth_scheme: String,
    /// Envelope `source`
    pub source: String,
    /// Envelope `sourcetype`
    pub sourcetype: String,
    /// Envelope `index`, omitted when `None`
    pub index: Option<String>,
    /// `event.app`
    pub app: String,
    /// `event.environment`
    pub environment: String,
    /// Envelope `host`; the local hostname when `None`
    pub host: Option<String>,
    /// Verify the collector's TLS certificate
    pub verify_tls: bool,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for HecConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            token: None,
            auth_scheme: DEFAULT_AUTH_SCHEME.to_string(),
            source: DEFAULT_SOURCE.to_string(),
            sourcetype: DEFAULT_SOURCETYPE.to_string(),
            index: None,
            app: DEFAULT_APP.to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            host: None,
            verify_tls: true,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl HecConfig {
    /// Configuration pointing at a collector.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Load from `HEC_*`, `APP_NAME` and `APP_ENV` environment variables.
    ///
    /// Empty values count as unset.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            endpoint: non_empty_var("HEC_URL"),
            token: non_empty_var("HEC_TOKEN"),
            auth_scheme: non_empty_var("HEC_AUTH_SCHEME").unwrap_or(defaults.auth_scheme),
            source: non_empty_var("HEC_SOURCE").unwrap_or(defaults.source),
            sourcetype: non_empty_var("HEC_SOURCETYPE").unwrap_or(defaults.sourcetype),
            index: non_empty_var("HEC_INDEX"),
            app: non_empty_var("APP_NAME").unwrap_or(defaults.app),
            environment: non_empty_var("APP_ENV").unwrap_or(defaults.environment),
            host: non_empty_var("HEC_HOST"),
            verify_tls: !non_empty_var("HEC_INSECURE_SKIP_VERIFY")
                .is_some_and(|v| matches!(v.as_str(), "true" | "1" | "yes" | "TRUE" | "YES")),
            timeout: non_empty_var("HEC_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map_or(defaults.timeout, Duration::from_secs),
        }
    }

    /// Set the envelope source and sourcetype.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>, sourcetype: impl Into<String>) -> Self {
        self.source = source.into();
        self.sourcetype = sourcetype.into();
        self
    }

    /// Set the envelope index.
    #[must_use]
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    /// Set the application name and environment reported in each event.
    #[must_use]
    pub fn with_app(mut self, app: impl Into<String>, environment: impl Into<String>) -> Self {
        self.app = app.into();
        self.environment = environment.into();
        self
    }

    /// Override the reported host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disable TLS certificate verification.
    ///
    /// Only for demos and tests against self-signed collectors.
    #[must_use]
    pub const fn insecure_skip_verify(mut self) -> Self {
        self.verify_tls = false;
        self
    }

    /// Validated endpoint and `Authorization` header value.
    ///
    /// Returns `Ok(None)` when endpoint or token is missing.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::Config`] if the endpoint is not an
    /// `http`/`https` URL.
    pub fn target(&self) -> Result<Option<(Url, String)>, TelemetryError> {
        let (Some(endpoint), Some(token)) = (
            self.endpoint.as_deref().filter(|e| !e.trim().is_empty()),
            self.token.as_deref().filter(|t| !t.trim().is_empty()),
        ) else {
            return Ok(None);
        };

        let url = Url::parse(endpoint.trim())
            .map_err(|e| TelemetryError::Config(format!("invalid collector URL: {e}")))?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(TelemetryError::Config(format!(
                    "unsupported collector URL scheme '{other}'"
                )));
            }
        }

        Ok(Some((url, format!("{} {}", self.auth_scheme, token.trim()))))
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Best-effort local hostname.
///
/// Checks `HOSTNAME`, `COMPUTERNAME`, then `/etc/hostname`; falls back to
/// `localhost`.
#[must_use]
pub fn local_hostname() -> String {
    non_empty_var("HOSTNAME")
        .or_else(|| non_empty_var("COMPUTERNAME"))
        .or_else(|| {
            std::fs::read_to_string("/etc/hostname")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_else(|| "localhost".to_string())
}
