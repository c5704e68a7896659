//! Cover art handling for downloaded releases.
//!
//! - [`CoverCache`]: one transient image per release id, fetched at most once
//!   per run and shared by every track of that release.
//! - [`FolderCovers`]: the `cover.jpg` copied once into each album folder.
//!
//! Cached images are removed by the caller at the end of a run via
//! [`CoverCache::clear`]; nothing here deletes them on its own.

mod cache;
mod sidecar;

pub use cache::CoverCache;
pub use sidecar::FolderCovers;

/// MIME type of every embedded cover
pub const COVER_MIME: &str = "image/jpeg";
