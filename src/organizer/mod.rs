//! On-disk naming for downloaded tracks.
//!
//! Provides the filename sanitizer and the naming rules for album folders,
//! numbered album tracks and loose `Artist - Title` files.
//!
//! # Layout
//! - Album with more than one track: `{credits} - {album} ({year})/NN - {title}.ext`
//! - Playlist / favorites: `{playlist}/{artist} - {title}.ext`
//! - Single: `{artist} - {title}.ext` in the output root

use std::path::{Path, PathBuf};

use crate::model::{AudioFormat, Placement, TrackRecord};

/// Characters replaced with `_` in every generated name.
pub const FORBIDDEN_CHARS: [char; 13] = [
    '<', '>', '@', '%', '!', '+', ':', '"', '/', '\\', '|', '?', '*',
];

/// Shared cover file written once into album folders.
pub const FOLDER_COVER_NAME: &str = "cover.jpg";

/// Map an arbitrary title to a filesystem-safe name.
///
/// Replaces [`FORBIDDEN_CHARS`] with `_`, collapses whitespace runs to a
/// single space (trimming both ends) and drops a space left in front of a
/// known extension.
pub fn sanitize(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if FORBIDDEN_CHARS.contains(&c) { '_' } else { c })
        .collect();

    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");

    [AudioFormat::Lossless, AudioFormat::Lossy]
        .iter()
        .fold(collapsed, |acc, format| {
            let ext = format.extension();
            acc.replace(&format!(" {ext}"), ext)
        })
}

/// Folder name for a release: `{credits} - {title} ({year})`.
pub fn album_folder_name(credits: &str, title: &str, date: &str) -> String {
    let year: String = date.chars().take(4).collect();
    sanitize(&format!("{credits} - {title} ({year})"))
}

/// File name for a track under the given placement.
pub fn track_file_name(record: &TrackRecord, placement: &Placement) -> String {
    let ext = record.format.extension();
    if placement.is_album_context(record.track_total) {
        sanitize(&format!("{:02} - {}{}", record.track_number, record.title, ext))
    } else {
        sanitize(&format!("{} - {}{}", record.artist, record.title, ext))
    }
}

/// Full destination path of a track below `output_root`.
pub fn track_path(output_root: &Path, record: &TrackRecord, placement: &Placement) -> PathBuf {
    output_root
        .join(&placement.folder)
        .join(track_file_name(record, placement))
}
