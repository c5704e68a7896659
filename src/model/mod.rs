//! Core data models for the download pipeline.
//!
//! - [`TrackRecord`]: the flat, self-consistent per-track metadata produced by
//!   the normalizer and consumed by the materializer and tag writer.
//! - [`Placement`]: where a track lands on disk and whether it is part of a
//!   multi-track album folder.
//! - [`EntityRef`]: a requested catalog entity (track, release, playlist or
//!   the favorites collection).

use std::fmt;
use std::path::PathBuf;

/// Audio container family. Decided once at normalization time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    /// FLAC with Vorbis comments
    Lossless,
    /// MP3 with ID3v2
    Lossy,
}

impl AudioFormat {
    /// File extension including the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Lossless => ".flac",
            Self::Lossy => ".mp3",
        }
    }

    /// Catalog name of the stream kind.
    pub fn stream_kind(self) -> &'static str {
        match self {
            Self::Lossless => "flac",
            Self::Lossy => "high",
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lossless => write!(f, "FLAC"),
            Self::Lossy => write!(f, "MP3"),
        }
    }
}

/// Normalized per-track metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    pub track_id: u64,
    /// Groups tracks sharing a cover image
    pub release_id: u64,
    pub title: String,
    /// Credited performer(s)
    pub artist: String,
    pub album: String,
    /// Comma-joined genre names, empty if none
    pub genre: String,
    /// Full catalog date; truncated to the year only when tags are written
    pub release_date: String,
    /// Label title, empty if unknown
    pub copyright: String,
    /// 1-based position within the release
    pub track_number: u32,
    pub track_total: u32,
    pub format: AudioFormat,
    pub source_url: String,
    /// Cover location with the size placeholder already resolved
    pub cover_url: String,
}

impl TrackRecord {
    /// Four-character year as written into tags.
    pub fn year(&self) -> &str {
        match self.release_date.char_indices().nth(4) {
            Some((idx, _)) => &self.release_date[..idx],
            None => &self.release_date,
        }
    }
}

impl fmt::Display for TrackRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Track:     {} - {}", self.artist, self.title)?;
        writeln!(f, "  Album:     {} ({})", self.album, self.release_date)?;
        writeln!(f, "  Number:    {}/{}", self.track_number, self.track_total)?;
        writeln!(f, "  Genre:     {}", self.genre)?;
        writeln!(f, "  Copyright: {}", self.copyright)?;
        write!(f, "  Format:    {}", self.format)
    }
}

/// How a track is placed on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementKind {
    /// Loose file in the output directory
    Single,
    /// Numbered file inside an album folder with a shared `cover.jpg`
    Album,
    /// `artist - title` file inside a named folder, no shared cover
    Playlist,
}

/// Per-track destination context computed by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Sanitized folder name relative to the output root; empty for loose files
    pub folder: PathBuf,
    pub kind: PlacementKind,
}

impl Placement {
    /// Loose file in the output root.
    pub fn single() -> Self {
        Self {
            folder: PathBuf::new(),
            kind: PlacementKind::Single,
        }
    }

    /// Album folder placement.
    pub fn album(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            kind: PlacementKind::Album,
        }
    }

    /// Playlist (or favorites) folder placement.
    pub fn playlist(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            kind: PlacementKind::Playlist,
        }
    }

    /// True only for album placement of a release with more than one track.
    pub fn is_album_context(&self, track_total: u32) -> bool {
        self.kind == PlacementKind::Album && track_total > 1
    }
}

/// Kind of catalog entity a user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Release,
    Playlist,
    Track,
    Favorites,
}

/// A single requested entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRef {
    pub kind: EntityKind,
    /// Ignored for [`EntityKind::Favorites`]
    pub id: u64,
}
