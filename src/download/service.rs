//! Download service - resolves requested entities and drives the materializer
//!
//! 1. One batched catalog query per request kind
//! 2. Normalize every track leaf and attach its placement
//! 3. Materialize tracks, one at a time or through a bounded pool
//!
//! A track that cannot be normalized is skipped; a track that fails to
//! materialize is reported. Neither affects its siblings. Catalog failures
//! abort the batch before anything is written.

use futures::StreamExt;
use std::path::PathBuf;
use std::sync::Arc;

use super::materializer::Materializer;
use crate::catalog::{CatalogApi, adapter, dto};
use crate::error::{Error, Result};
use crate::model::{EntityKind, Placement, TrackRecord};
use crate::organizer;

/// Configuration for the download service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Tracks materialized concurrently (1 = strictly sequential)
    pub jobs: usize,
    /// Folder name for the favorites collection
    pub favorites_folder: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            jobs: 1,
            favorites_folder: "Favorites".to_string(),
        }
    }
}

/// A normalized track and where it goes.
#[derive(Debug, Clone)]
pub struct Job {
    pub record: TrackRecord,
    pub placement: Placement,
}

/// A track dropped during normalization.
#[derive(Debug)]
pub struct Skipped {
    pub track_id: u64,
    pub title: String,
    pub error: Error,
}

/// Resolved batch, ready to materialize.
#[derive(Debug, Default)]
pub struct Plan {
    pub jobs: Vec<Job>,
    pub skipped: Vec<Skipped>,
}

/// Progress notifications for the caller.
#[derive(Debug)]
pub enum Progress<'a> {
    /// A track is about to be materialized (`index` is 1-based)
    Started {
        index: usize,
        total: usize,
        record: &'a TrackRecord,
    },
    /// A track was written and tagged
    Finished {
        index: usize,
        total: usize,
        path: &'a PathBuf,
    },
    /// A track failed; siblings continue
    Failed {
        index: usize,
        total: usize,
        record: &'a TrackRecord,
        error: &'a Error,
    },
}

/// Outcome of one batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub downloaded: Vec<PathBuf>,
    pub skipped: Vec<Skipped>,
    pub failed: Vec<(TrackRecord, Error)>,
}

/// Service turning catalog entities into tagged files on disk.
pub struct DownloadService {
    catalog: Arc<dyn CatalogApi>,
    materializer: Materializer,
    config: ServiceConfig,
}

impl DownloadService {
    pub fn new(
        catalog: Arc<dyn CatalogApi>,
        materializer: Materializer,
        config: ServiceConfig,
    ) -> Self {
        Self {
            catalog,
            materializer,
            config,
        }
    }

    /// The materializer (and through it the cover cache).
    pub fn materializer(&self) -> &Materializer {
        &self.materializer
    }

    /// Resolve a batch of ids of one kind into jobs.
    ///
    /// `ids` is ignored for [`EntityKind::Favorites`].
    pub async fn plan(&self, kind: EntityKind, ids: &[u64]) -> Result<Plan> {
        let mut plan = Plan::default();

        match kind {
            EntityKind::Track => {
                let tracks = self.catalog.tracks(ids).await?;
                for track in &tracks {
                    plan.push(track, Placement::single(), |_| {});
                }
            }
            EntityKind::Release => {
                for release in self.catalog.releases(ids).await? {
                    plan_release(&mut plan, &release);
                }
            }
            EntityKind::Playlist => {
                for playlist in self.catalog.playlists(ids).await? {
                    let placement = Placement::playlist(organizer::sanitize(&playlist.title));
                    for track in playlist.tracks.iter().flatten() {
                        plan.push(track, placement.clone(), |_| {});
                    }
                }
            }
            EntityKind::Favorites => {
                let placement =
                    Placement::playlist(organizer::sanitize(&self.config.favorites_folder));
                for track in &self.catalog.favorites().await? {
                    plan.push(track, placement.clone(), |_| {});
                }
            }
        }

        tracing::info!(
            "Resolved {:?} batch: {} tracks, {} skipped",
            kind,
            plan.jobs.len(),
            plan.skipped.len()
        );
        Ok(plan)
    }

    /// Materialize every job of a plan.
    ///
    /// With `jobs == 1` each track is finished (including tags) before the
    /// next begins.
    pub async fn run<F>(&self, plan: Plan, on_progress: F) -> BatchReport
    where
        F: Fn(Progress<'_>) + Send + Sync,
    {
        let total = plan.jobs.len();
        let on_progress = &on_progress;

        let outcomes: Vec<(Job, Result<PathBuf>)> = futures::stream::iter(plan.jobs.into_iter().enumerate())
            .map(|(i, job)| async move {
                let index = i + 1;
                on_progress(Progress::Started {
                    index,
                    total,
                    record: &job.record,
                });

                let result = self.materializer.materialize(&job.record, &job.placement).await;
                match &result {
                    Ok(path) => on_progress(Progress::Finished { index, total, path }),
                    Err(error) => {
                        if error.is_track_local() {
                            tracing::warn!("Track {} failed: {}", job.record.track_id, error);
                        } else {
                            tracing::error!("Track {} failed: {}", job.record.track_id, error);
                        }
                        on_progress(Progress::Failed {
                            index,
                            total,
                            record: &job.record,
                            error,
                        })
                    }
                }
                (job, result)
            })
            .buffer_unordered(self.config.jobs.max(1))
            .collect()
            .await;

        let mut report = BatchReport {
            skipped: plan.skipped,
            ..Default::default()
        };
        for (job, result) in outcomes {
            match result {
                Ok(path) => report.downloaded.push(path),
                Err(error) => report.failed.push((job.record, error)),
            }
        }
        report
    }

    /// Plan and run in one call.
    pub async fn download<F>(&self, kind: EntityKind, ids: &[u64], on_progress: F) -> Result<BatchReport>
    where
        F: Fn(Progress<'_>) + Send + Sync,
    {
        let plan = self.plan(kind, ids).await?;
        Ok(self.run(plan, on_progress).await)
    }
}

impl Plan {
    /// Normalize one track and queue it, or record why it was skipped.
    fn push(
        &mut self,
        track: &dto::Track,
        placement: Placement,
        adjust: impl FnOnce(&mut TrackRecord),
    ) {
        match adapter::to_record(track) {
            Ok(mut record) => {
                adjust(&mut record);
                self.jobs.push(Job { record, placement });
            }
            Err(error) => {
                tracing::warn!("Skipping track {}: {}", track.id, error);
                self.skipped.push(Skipped {
                    track_id: track.id,
                    title: track.title.clone(),
                    error,
                });
            }
        }
    }
}

/// Queue every child of a release.
///
/// Multi-track releases go into their album folder; a one-track release is
/// placed like a single.
fn plan_release(plan: &mut Plan, release: &dto::Release) {
    let date = release.date.clone().unwrap_or_default();
    let children: Vec<&dto::Track> = release.tracks.iter().flatten().collect();
    let track_total = release_track_total(&children);

    let placement = if track_total > 1 {
        let credits = adapter::credit_line(release.credits.as_deref(), &release.artists);
        Placement::album(organizer::album_folder_name(&credits, &release.title, &date))
    } else {
        Placement::single()
    };

    for track in children {
        plan.push(track, placement.clone(), |record| {
            record.track_total = track_total;
            if record.release_id == 0 {
                record.release_id = release.id;
            }
            if record.album.is_empty() {
                record.album = release.title.clone();
            }
            if record.release_date.is_empty() {
                record.release_date = date.clone();
            }
        });
    }
}

/// Length of the release's full track-id list, else the number of children
/// the catalog returned. `null` children are part of the listed length.
fn release_track_total(children: &[&dto::Track]) -> u32 {
    let listed = children
        .iter()
        .filter_map(|t| t.release.as_ref())
        .map(|r| r.track_ids.len())
        .find(|&n| n > 0)
        .unwrap_or(children.len());
    u32::try_from(listed).unwrap_or(u32::MAX)
}
