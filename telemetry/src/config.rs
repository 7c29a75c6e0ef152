//! Telemetry configuration and hub assembly.

use crate::error::TelemetryError;
use crate::hec::{HecConfig, HecSink};
use crate::hub::TelemetryHub;
use crate::sink::TelemetrySink;
use crate::sinks::{ConsoleSink, JsonLinesSink};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

/// Which sinks to build and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Enable the line-formatted console sink
    pub console: bool,
    /// Write JSON lines to this file when set
    pub json_lines_path: Option<PathBuf>,
    /// Enable the event collector sink
    pub collector: bool,
    /// Event collector settings
    pub hec: HecConfig,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            console: true,
            json_lines_path: None,
            collector: true,
            hec: HecConfig::default(),
        }
    }
}

impl TelemetryConfig {
    /// Load from environment variables.
    ///
    /// - `TELEMETRY_CONSOLE` (default `true`)
    /// - `TELEMETRY_JSON_PATH` (unset disables the JSON-lines sink)
    /// - `TELEMETRY_COLLECTOR` (default `true`)
    /// - `HEC_*`, `APP_NAME`, `APP_ENV` (see [`HecConfig::from_env`])
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            console: flag("TELEMETRY_CONSOLE", true),
            json_lines_path: env::var("TELEMETRY_JSON_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            collector: flag("TELEMETRY_COLLECTOR", true),
            hec: HecConfig::from_env(),
        }
    }

    /// Build a hub with the configured sinks.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError`] if the JSON-lines file cannot be opened or
    /// the collector's HTTP client cannot be built.
    pub async fn build_hub(&self) -> Result<TelemetryHub, TelemetryError> {
        let mut sinks: Vec<Arc<dyn TelemetrySink>> = Vec::new();

        if self.console {
            sinks.push(Arc::new(ConsoleSink::new()));
        }

        if let Some(path) = &self.json_lines_path {
            let sink =
                JsonLinesSink::open(path, self.hec.app.clone(), self.hec.environment.clone())
                    .await?;
            sinks.push(Arc::new(sink));
        }

        if self.collector {
            let sink = HecSink::new(self.hec.clone())?;
            tracing::info!(
                configured = sink.is_configured(),
                verify_tls = self.hec.verify_tls,
                "Event collector sink ready"
            );
            sinks.push(Arc::new(sink));
        }

        let hub = TelemetryHub::new(sinks);
        tracing::info!(sinks = ?hub.sink_names(), "Telemetry hub assembled");
        Ok(hub)
    }
}

fn flag(key: &str, default: bool) -> bool {
    match env::var(key).ok().as_deref() {
        Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
        Some("false" | "0" | "no" | "FALSE" | "NO") => false,
        _ => default,
    }
}
