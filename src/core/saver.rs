//! Local save of a retrieved payload
//!
//! Mirrors the browser's object-URL dance: the payload is first staged behind
//! a temporary handle, the save is dispatched under a chosen filename, and the
//! handle is revoked afterwards to release the staged resource.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use tempfile::{NamedTempFile, TempDir, TempPath};
use tracing::{debug, warn};

use crate::core::models::{AppError, AppResult};
use crate::utils::file_utils::ensure_dir_exists;

/// Temporary resource handle for a staged payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveHandle {
    pub id: u64,
    pub location: PathBuf,
}

impl SaveHandle {
    pub fn new(id: u64, location: impl Into<PathBuf>) -> Self {
        Self {
            id,
            location: location.into(),
        }
    }
}

#[async_trait]
pub trait LocalSaver: Send + Sync {
    /// Stage the payload and hand back a temporary handle to it
    async fn stage(&self, payload: Bytes) -> AppResult<SaveHandle>;

    /// Save the staged payload under `filename`, returning where it landed
    async fn dispatch(&self, handle: &SaveHandle, filename: &str) -> AppResult<PathBuf>;

    /// Release the handle. Revoking an unknown handle is a no-op.
    async fn revoke(&self, handle: SaveHandle) -> AppResult<()>;
}

/// Saves payloads into a downloads directory, staging them in a private
/// temporary directory first
pub struct FileSaver {
    downloads_dir: PathBuf,
    staging: TempDir,
    next_id: AtomicU64,
    staged: Mutex<HashMap<u64, TempPath>>,
}

impl FileSaver {
    pub fn new(downloads_dir: impl Into<PathBuf>) -> AppResult<Self> {
        let downloads_dir = downloads_dir.into();
        ensure_dir_exists(&downloads_dir).map_err(|e| AppError::Save(e.to_string()))?;

        Ok(Self {
            downloads_dir,
            staging: tempfile::Builder::new().prefix("tiktok-staging").tempdir()?,
            next_id: AtomicU64::new(0),
            staged: Mutex::new(HashMap::new()),
        })
    }

    pub fn downloads_dir(&self) -> &Path {
        &self.downloads_dir
    }

    /// Number of handles not yet revoked
    pub fn outstanding(&self) -> usize {
        self.staged.lock().len()
    }
}

#[async_trait]
impl LocalSaver for FileSaver {
    async fn stage(&self, payload: Bytes) -> AppResult<SaveHandle> {
        let temp_path = NamedTempFile::new_in(self.staging.path())?.into_temp_path();
        tokio::fs::write(&temp_path, &payload).await?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let handle = SaveHandle::new(id, temp_path.to_path_buf());
        self.staged.lock().insert(id, temp_path);

        debug!("Staged {} bytes as handle {}", payload.len(), id);
        Ok(handle)
    }

    async fn dispatch(&self, handle: &SaveHandle, filename: &str) -> AppResult<PathBuf> {
        if !self.staged.lock().contains_key(&handle.id) {
            return Err(AppError::Save(format!(
                "handle {} was already revoked",
                handle.id
            )));
        }

        let target = self.downloads_dir.join(filename);
        tokio::fs::copy(&handle.location, &target).await?;
        debug!("Saved handle {} to {:?}", handle.id, target);
        Ok(target)
    }

    async fn revoke(&self, handle: SaveHandle) -> AppResult<()> {
        let staged = self.staged.lock().remove(&handle.id);
        match staged {
            Some(temp_path) => {
                tokio::task::spawn_blocking(move || temp_path.close())
                    .await
                    .map_err(|e| AppError::Save(e.to_string()))??;
                debug!("Revoked handle {}", handle.id);
            }
            None => warn!("Revoke of unknown handle {}", handle.id),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_stage_dispatch_revoke() -> AppResult<()> {
        let downloads = tempdir()?;
        let saver = FileSaver::new(downloads.path())?;

        let handle = saver.stage(Bytes::from_static(b"video-bytes")).await?;
        assert!(handle.location.exists());
        assert_eq!(saver.outstanding(), 1);

        let saved = saver.dispatch(&handle, "clip.mp4").await?;
        assert_eq!(saved, downloads.path().join("clip.mp4"));
        assert_eq!(std::fs::read(&saved)?, b"video-bytes");

        let staged_location = handle.location.clone();
        saver.revoke(handle).await?;
        assert!(!staged_location.exists());
        assert!(saved.exists());
        assert_eq!(saver.outstanding(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_dispatch_after_revoke_fails() -> AppResult<()> {
        let downloads = tempdir()?;
        let saver = FileSaver::new(downloads.path())?;

        let handle = saver.stage(Bytes::from_static(b"x")).await?;
        saver.revoke(handle.clone()).await?;

        let result = saver.dispatch(&handle, "late.mp4").await;
        assert!(matches!(result, Err(AppError::Save(_))));
        // Second revoke is harmless
        saver.revoke(handle).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_downloads_dir_is_created() -> AppResult<()> {
        let root = tempdir()?;
        let nested = root.path().join("a").join("b");
        let saver = FileSaver::new(&nested)?;
        assert!(nested.is_dir());
        assert_eq!(saver.downloads_dir(), nested.as_path());
        Ok(())
    }
}
