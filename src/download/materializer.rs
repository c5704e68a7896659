//! Materialize one track: cover, folder, audio payload, tags.
//!
//! Steps run in strict order per track. Folder creation and the shared
//! album cover happen before the audio file is written into that folder.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::catalog::MediaFetcher;
use crate::cover::{CoverCache, FolderCovers};
use crate::error::{Error, Result, ResultExt};
use crate::metadata;
use crate::model::{Placement, TrackRecord};
use crate::organizer;

/// Writes tracks below a fixed output root.
pub struct Materializer {
    output_root: PathBuf,
    fetcher: Arc<dyn MediaFetcher>,
    covers: CoverCache,
    folder_covers: FolderCovers,
}

impl Materializer {
    pub fn new(
        output_root: impl Into<PathBuf>,
        fetcher: Arc<dyn MediaFetcher>,
        covers: CoverCache,
    ) -> Self {
        Self {
            output_root: output_root.into(),
            fetcher,
            covers,
            folder_covers: FolderCovers::new(),
        }
    }

    /// The per-release cover cache.
    pub fn covers(&self) -> &CoverCache {
        &self.covers
    }

    /// Download and tag one track, returning the written path.
    ///
    /// A partially written or untagged file is left in place on failure.
    pub async fn materialize(&self, record: &TrackRecord, placement: &Placement) -> Result<PathBuf> {
        let cover_path = self
            .covers
            .fetch_cover(record.release_id, &record.cover_url)
            .await?;

        let folder = self.output_root.join(&placement.folder);
        fs::create_dir_all(&folder)
            .with_context(format!("creating folder {}", folder.display()))?;

        if placement.is_album_context(record.track_total) {
            self.folder_covers.ensure(&folder, &cover_path)?;
        }

        let path = organizer::track_path(&self.output_root, record, placement);

        tracing::debug!("Downloading {} -> {:?}", record.source_url, path);
        let data = self
            .fetcher
            .fetch(&record.source_url)
            .await
            .map_err(|e| Error::audio_download(&record.source_url, e.to_string()))?;
        fs::write(&path, &data).with_context(format!("writing {}", path.display()))?;

        let cover = fs::read(&cover_path).with_context("reading cached cover")?;

        // lofty does blocking file I/O
        let tag_path = path.clone();
        let tag_record = record.clone();
        tokio::task::spawn_blocking(move || metadata::write_tags(&tag_path, &tag_record, &cover))
            .await
            .map_err(|e| Error::corrupt(&path, format!("tag writer aborted: {e}")))??;

        tracing::info!("Saved {:?}", path);
        Ok(path)
    }
}
