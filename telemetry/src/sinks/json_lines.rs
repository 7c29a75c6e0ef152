//! Structured JSON sink: one object per line, appended to a file.

use crate::error::TelemetryError;
use crate::event::TelemetryEvent;
use crate::sink::{SinkFuture, TelemetrySink};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Line written by [`JsonLinesSink`].
#[derive(Debug, Serialize)]
struct JsonLine<'a> {
    timestamp: String,
    level: &'static str,
    app: &'a str,
    environment: &'a str,
    event_type: &'a str,
    user_id: &'a str,
    user_name: &'a str,
    correlation_id: &'a str,
    data: &'a Map<String, Value>,
}

/// Appends events as JSON lines to a file.
///
/// Writes are serialized through an async mutex so concurrent events never
/// interleave within a line.
#[derive(Debug)]
pub struct JsonLinesSink {
    path: PathBuf,
    app: String,
    environment: String,
    file: Mutex<File>,
}

impl JsonLinesSink {
    /// Open (or create) the output file in append mode.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::Io`] if the file or its parent directory
    /// cannot be created.
    pub async fn open(
        path: impl AsRef<Path>,
        app: impl Into<String>,
        environment: impl Into<String>,
    ) -> Result<Self, TelemetryError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        Ok(Self {
            path,
            app: app.into(),
            environment: environment.into(),
            file: Mutex::new(file),
        })
    }

    /// Path of the output file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn encode(&self, event: &TelemetryEvent) -> Result<Vec<u8>, TelemetryError> {
        let line = JsonLine {
            timestamp: event.timestamp.to_rfc3339(),
            level: "info",
            app: &self.app,
            environment: &self.environment,
            event_type: &event.event_type,
            user_id: event.actor.resolved_id(),
            user_name: event.actor.resolved_name(),
            correlation_id: event.correlation_id.as_deref().unwrap_or_default(),
            data: &event.data,
        };

        let mut bytes = serde_json::to_vec(&line)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

impl TelemetrySink for JsonLinesSink {
    fn name(&self) -> &'static str {
        "json_lines"
    }

    fn send<'a>(&'a self, event: &'a TelemetryEvent) -> SinkFuture<'a> {
        Box::pin(async move {
            let bytes = self.encode(event)?;
            let mut file = self.file.lock().await;
            file.write_all(&bytes).await?;
            file.flush().await?;
            Ok(())
        })
    }
}
