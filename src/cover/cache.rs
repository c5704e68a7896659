//! Per-release cover image cache.
//!
//! Each release's artwork is fetched at most once per run and stored under a
//! deterministic name derived from the release id. Concurrent callers for the
//! same release wait on a single download through a per-release
//! [`OnceCell`]; callers for different releases never block each other.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::catalog::MediaFetcher;
use crate::error::{Error, Result, ResultExt};

/// Cover art disk cache.
pub struct CoverCache {
    cache_dir: PathBuf,
    fetcher: Arc<dyn MediaFetcher>,
    slots: Mutex<HashMap<u64, Arc<OnceCell<PathBuf>>>>,
}

impl CoverCache {
    /// Create a cache storing images in `cache_dir`.
    pub fn new(cache_dir: impl Into<PathBuf>, fetcher: Arc<dyn MediaFetcher>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            fetcher,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Local path of the cover for `release_id`, downloading it if needed.
    ///
    /// An existing file at the cache path is returned unchanged, without
    /// re-fetching or re-validating it. The bytes are stored verbatim.
    pub async fn fetch_cover(&self, release_id: u64, image_url: &str) -> Result<PathBuf> {
        let slot = self.slots.lock().entry(release_id).or_default().clone();

        let path = slot
            .get_or_try_init(|| self.load_or_download(release_id, image_url))
            .await?;

        Ok(path.clone())
    }

    async fn load_or_download(&self, release_id: u64, image_url: &str) -> Result<PathBuf> {
        let path = self.cache_path(release_id);
        if path.is_file() {
            tracing::debug!("Cover cache hit for release {}", release_id);
            return Ok(path);
        }

        if image_url.is_empty() {
            return Err(Error::image_download(release_id, "release has no cover URL"));
        }

        tracing::debug!("Fetching cover for release {} from {}", release_id, image_url);
        let data = self
            .fetcher
            .fetch(image_url)
            .await
            .map_err(|e| Error::image_download(release_id, e.to_string()))?;

        fs::create_dir_all(&self.cache_dir).with_context("creating cover cache directory")?;

        // Write to temp, then rename so readers never see a partial image
        let temp_path = path.with_extension("jpg.part");
        fs::write(&temp_path, &data).with_context("writing cached cover")?;
        fs::rename(&temp_path, &path).with_context("finalizing cached cover")?;

        Ok(path)
    }

    /// Deterministic cache path for a release.
    pub fn cache_path(&self, release_id: u64) -> PathBuf {
        self.cache_dir.join(format!("temp_{}.jpg", release_id))
    }

    /// Check if a release is cached on disk.
    #[cfg(test)]
    pub fn contains(&self, release_id: u64) -> bool {
        self.cache_path(release_id).is_file()
    }

    /// Remove every cached image. Called once at the end of a run.
    pub fn clear(&self) -> std::io::Result<()> {
        if self.cache_dir.exists() {
            for entry in fs::read_dir(&self.cache_dir)? {
                let entry = entry?;
                let name = entry.file_name();
                if entry.file_type()?.is_file() && name.to_string_lossy().starts_with("temp_") {
                    fs::remove_file(entry.path())?;
                }
            }
        }
        self.slots.lock().clear();
        Ok(())
    }
}
