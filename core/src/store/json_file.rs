use super::{LedgerStore, StoreFuture};
use crate::error::StoreError;
use crate::seed::demo_ledger;
use crate::types::LedgerState;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Ledger persisted as a pretty-printed JSON document.
///
/// A missing file is treated as a fresh install and loads the demo ledger.
/// Each save writes its own uniquely named sibling temp file and renames it
/// over the target, so overlapping saves never share a temp file.
#[derive(Debug, Clone)]
pub struct JsonFileLedgerStore {
    path: PathBuf,
}

impl JsonFileLedgerStore {
    /// Create a store backed by `path`. Nothing is read until `load`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the ledger file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
        self.path.with_file_name(name)
    }

    async fn read(&self) -> Result<LedgerState, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "Ledger file not found; seeding demo data");
                Ok(demo_ledger())
            }
            Err(error) => Err(error.into()),
        }
    }

    async fn write(&self, state: &LedgerState) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(state)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp = self.temp_path();
        let written = match tokio::fs::write(&temp, &bytes).await {
            Ok(()) => tokio::fs::rename(&temp, &self.path).await,
            Err(error) => Err(error),
        };
        if let Err(error) = written {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(error.into());
        }

        tracing::debug!(
            path = %self.path.display(),
            bytes = bytes.len(),
            "Ledger saved"
        );
        Ok(())
    }
}

impl LedgerStore for JsonFileLedgerStore {
    fn load(&self) -> StoreFuture<'_, LedgerState> {
        Box::pin(self.read())
    }

    fn save<'a>(&'a self, state: &'a LedgerState) -> StoreFuture<'a, ()> {
        Box::pin(self.write(state))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_path_is_a_unique_sibling() {
        let store = JsonFileLedgerStore::new("/var/lib/bank/ledger.json");
        let first = store.temp_path();
        let second = store.temp_path();

        assert_eq!(first.parent(), Some(Path::new("/var/lib/bank")));
        let name = first.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("ledger.json."));
        assert!(name.ends_with(".tmp"));
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        tokio::fs::write(&path, b"{ not json").await.unwrap();

        let result = JsonFileLedgerStore::new(&path).load().await;
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }
}
