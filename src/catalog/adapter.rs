//! Adapter layer: Convert catalog DTOs to domain models
//!
//! This is the ONLY place where catalog DTO types are converted to
//! [`TrackRecord`]s. All four entry points (tracks, releases, playlists,
//! favorites) feed the same track leaf through [`to_record`].

use super::dto;
use crate::error::{Error, Result};
use crate::model::{AudioFormat, TrackRecord};

/// Size token substituted into the cover URL template
pub const COVER_SIZE_TOKEN: &str = "orig";

/// Normalize one raw track leaf into a [`TrackRecord`].
///
/// Fails with [`Error::MissingStreamKind`] when the track has no stream URL
/// for the format selected from its `hasFlac` flag.
pub fn to_record(track: &dto::Track) -> Result<TrackRecord> {
    let format = if track.has_flac {
        AudioFormat::Lossless
    } else {
        AudioFormat::Lossy
    };

    let stream = track.stream.as_ref();
    let source_url = match format {
        AudioFormat::Lossless => stream.and_then(|s| s.flac.as_deref()),
        AudioFormat::Lossy => stream.and_then(|s| s.high.as_deref()),
    }
    .filter(|url| !url.is_empty())
    .ok_or_else(|| Error::MissingStreamKind {
        track_id: track.id,
        title: track.title.clone(),
        format: format.stream_kind(),
    })?
    .to_string();

    let release = track.release.as_ref();

    Ok(TrackRecord {
        track_id: track.id,
        release_id: release.map(|r| r.id).unwrap_or_default(),
        title: track.title.clone(),
        artist: credit_line(track.credits.as_deref(), &track.artists),
        album: release.map(|r| r.title.clone()).unwrap_or_default(),
        genre: join_genres(&track.genres),
        release_date: release.and_then(|r| r.date.clone()).unwrap_or_default(),
        copyright: release
            .and_then(|r| r.label.as_ref())
            .map(|l| l.title.clone())
            .unwrap_or_default(),
        track_number: track_number(track),
        track_total: track_total(track),
        format,
        source_url,
        cover_url: release
            .and_then(|r| r.image.as_ref())
            .and_then(|i| i.src.as_deref())
            .map(resolve_cover_url)
            .unwrap_or_default(),
    })
}

/// Credit line: the preformatted `credits` if present, else artist titles
/// joined with `", "`.
pub fn credit_line(credits: Option<&str>, artists: &[dto::Artist]) -> String {
    match credits {
        Some(c) if !c.trim().is_empty() => c.to_string(),
        _ => artists
            .iter()
            .map(|a| a.title.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Join genre names with `", "`; empty list gives an empty string.
fn join_genres(genres: &[dto::Genre]) -> String {
    genres
        .iter()
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Replace the `{size}` placeholder with [`COVER_SIZE_TOKEN`].
pub fn resolve_cover_url(template: &str) -> String {
    template.replace("{size}", COVER_SIZE_TOKEN)
}

/// Position reported by the catalog, else the index in the release's
/// track list, else 1.
fn track_number(track: &dto::Track) -> u32 {
    track
        .position
        .filter(|&p| p > 0)
        .or_else(|| {
            let ids = &track.release.as_ref()?.track_ids;
            let idx = ids.iter().position(|&id| id == track.id)?;
            u32::try_from(idx + 1).ok()
        })
        .unwrap_or(1)
}

/// Count of the release's track ids; never below the track's own number.
fn track_total(track: &dto::Track) -> u32 {
    let listed = track
        .release
        .as_ref()
        .map(|r| r.track_ids.len())
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0);
    listed.max(track_number(track))
}
