//! Test utilities and fixtures for zvuk-fetch tests.
//!
//! This module provides catalog DTO factories, normalized record mocks and
//! the smallest audio payloads lofty accepts, to reduce boilerplate in tests.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{dto_release, mock_fetcher_for};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let release = dto_release(7, "Artist", "Album", "2024-05-01", &["A", "B"]);
//!     let fetcher = mock_fetcher_for(release.tracks.iter().flatten());
//!     // ... test logic
//! }
//! ```

use crate::catalog::adapter::resolve_cover_url;
use crate::catalog::dto;
use crate::catalog::traits::mocks::MockFetcher;
use crate::model::{AudioFormat, TrackRecord};

/// Bytes served for every mocked cover URL.
pub const COVER_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0test-cover";

/// Smallest FLAC stream lofty will open and rewrite: the marker, one
/// STREAMINFO block (44.1 kHz, stereo, 16 bit, zero samples) and a trailing
/// PADDING block.
pub fn minimal_flac() -> Vec<u8> {
    let mut data = b"fLaC".to_vec();
    // Type 0 (STREAMINFO), length 34, not last
    data.extend_from_slice(&[0x00, 0x00, 0x00, 0x22]);
    data.extend_from_slice(&streaminfo());
    // Last-metadata-block flag, type 1 (PADDING), length 8
    data.extend_from_slice(&[0x81, 0x00, 0x00, 0x08]);
    data.extend_from_slice(&[0x00; 8]);
    data
}

/// A FLAC stream whose only metadata block is STREAMINFO.
pub fn streaminfo_only_flac() -> Vec<u8> {
    let mut data = b"fLaC".to_vec();
    // Last-metadata-block flag, type 0 (STREAMINFO), length 34
    data.extend_from_slice(&[0x80, 0x00, 0x00, 0x22]);
    data.extend_from_slice(&streaminfo());
    data
}

fn streaminfo() -> Vec<u8> {
    let mut block = Vec::with_capacity(34);
    block.extend_from_slice(&[0x10, 0x00, 0x10, 0x00]);
    block.extend_from_slice(&[0x00; 6]);
    block.extend_from_slice(&[0x0A, 0xC4, 0x42, 0xF0, 0x00, 0x00, 0x00, 0x00]);
    block.extend_from_slice(&[0x00; 16]);
    block
}

/// A few silent MPEG-1 Layer III frames (128 kbps, 44.1 kHz).
pub fn minimal_mp3() -> Vec<u8> {
    const FRAME_LEN: usize = 417;
    let mut data = Vec::with_capacity(FRAME_LEN * 8);
    for _ in 0..8 {
        let mut frame = vec![0u8; FRAME_LEN];
        frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x64]);
        data.extend_from_slice(&frame);
    }
    data
}

/// Creates a mock TrackRecord with sensible defaults.
///
/// Customize with struct update syntax:
///
/// ```ignore
/// let record = TrackRecord {
///     title: "Custom Title".to_string(),
///     ..mock_record()
/// };
/// ```
pub fn mock_record() -> TrackRecord {
    TrackRecord {
        track_id: 1,
        release_id: 1,
        title: "Test Track".to_string(),
        artist: "Test Artist".to_string(),
        album: "Test Album".to_string(),
        genre: "Rock".to_string(),
        release_date: "2023-01-01".to_string(),
        copyright: "Test Label".to_string(),
        track_number: 1,
        track_total: 1,
        format: AudioFormat::Lossless,
        source_url: "https://cdn.test/1.flac".to_string(),
        cover_url: "https://img.test/1?size=orig&ext=jpg".to_string(),
    }
}

/// Raw track leaf belonging to release 7 ("Album", 2024-05-01).
///
/// `position` of 0 is passed through as-is; set it to `None` on the result
/// to exercise the release-order fallback.
pub fn dto_track(id: u64, title: &str, position: u32, track_ids: &[u64]) -> dto::Track {
    dto_track_in(7, "Album", "2024-05-01", id, title, position, track_ids)
}

fn dto_track_in(
    release_id: u64,
    album: &str,
    date: &str,
    id: u64,
    title: &str,
    position: u32,
    track_ids: &[u64],
) -> dto::Track {
    dto::Track {
        id,
        title: title.to_string(),
        position: Some(position),
        has_flac: true,
        credits: None,
        artists: vec![dto::Artist {
            title: "Artist".to_string(),
        }],
        genres: vec![
            dto::Genre {
                name: "Rock".to_string(),
            },
            dto::Genre {
                name: "Indie".to_string(),
            },
        ],
        stream: Some(dto::Stream {
            flac: Some(format!("https://cdn.test/{id}.flac")),
            high: Some(format!("https://cdn.test/{id}.mp3")),
        }),
        release: Some(dto::TrackRelease {
            id: release_id,
            title: album.to_string(),
            date: Some(date.to_string()),
            image: Some(dto::Image {
                src: Some(format!("https://img.test/{release_id}?size={{size}}&ext=jpg")),
            }),
            label: Some(dto::Label {
                title: "Label".to_string(),
            }),
            track_ids: track_ids.to_vec(),
        }),
    }
}

/// Release with one track per title, positions starting at 1.
///
/// Track ids are `release_id * 100 + position`.
pub fn dto_release(
    release_id: u64,
    credits: &str,
    title: &str,
    date: &str,
    titles: &[&str],
) -> dto::Release {
    let ids: Vec<u64> = (1..=titles.len() as u64)
        .map(|n| release_id * 100 + n)
        .collect();

    let tracks = titles
        .iter()
        .zip(&ids)
        .enumerate()
        .map(|(i, (track_title, &id))| {
            Some(dto_track_in(
                release_id,
                title,
                date,
                id,
                track_title,
                i as u32 + 1,
                &ids,
            ))
        })
        .collect();

    dto::Release {
        id: release_id,
        title: title.to_string(),
        date: Some(date.to_string()),
        credits: Some(credits.to_string()),
        artists: Vec::new(),
        tracks,
    }
}

/// The `n` track leaves of a release titled "Album".
pub fn dto_release_tracks(release_id: u64, n: usize) -> Vec<dto::Track> {
    let titles: Vec<String> = (1..=n).map(|i| format!("Track {i}")).collect();
    let titles: Vec<&str> = titles.iter().map(String::as_str).collect();
    dto_release(release_id, "Artist", "Album", "2024-05-01", &titles)
        .tracks
        .into_iter()
        .flatten()
        .collect()
}

/// Playlist of standalone tracks with ids starting at `playlist_id * 100 + 1`.
pub fn dto_playlist(playlist_id: u64, title: &str, titles: &[&str]) -> dto::Playlist {
    let tracks = titles
        .iter()
        .enumerate()
        .map(|(i, track_title)| {
            let id = playlist_id * 100 + i as u64 + 1;
            Some(dto_track(id, track_title, 1, &[id]))
        })
        .collect();

    dto::Playlist {
        id: playlist_id,
        title: title.to_string(),
        tracks,
    }
}

/// Fetcher serving FLAC audio and cover bytes for every given track.
pub fn mock_fetcher_for<'a>(tracks: impl IntoIterator<Item = &'a dto::Track>) -> MockFetcher {
    tracks.into_iter().fold(MockFetcher::default(), |fetcher, track| {
        let mut fetcher = fetcher;
        if let Some(url) = track.stream.as_ref().and_then(|s| s.flac.clone()) {
            fetcher = fetcher.with(url, minimal_flac());
        }
        if let Some(src) = track
            .release
            .as_ref()
            .and_then(|r| r.image.as_ref())
            .and_then(|i| i.src.as_deref())
        {
            fetcher = fetcher.with(resolve_cover_url(src), COVER_BYTES.to_vec());
        }
        fetcher
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_record_defaults() {
        let record = mock_record();
        assert_eq!(record.title, "Test Track");
        assert_eq!(record.format, AudioFormat::Lossless);
        assert_eq!(record.track_total, 1);
    }

    #[test]
    fn test_dto_release_numbers_children() {
        let release = dto_release(3, "Artist", "Album", "2021", &["A", "B", "C"]);
        let tracks: Vec<_> = release.tracks.iter().flatten().collect();
        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks[2].id, 303);
        assert_eq!(tracks[2].position, Some(3));
        assert_eq!(
            tracks[0].release.as_ref().unwrap().track_ids,
            vec![301, 302, 303]
        );
    }

    #[test]
    fn test_cover_template_has_placeholder() {
        let track = dto_track(1, "T", 1, &[1]);
        let src = track.release.unwrap().image.unwrap().src.unwrap();
        assert_eq!(src, "https://img.test/7?size={size}&ext=jpg");
    }

    #[test]
    fn test_mock_fetcher_serves_audio_and_cover() {
        let track = dto_track(1, "T", 1, &[1]);
        let fetcher = mock_fetcher_for([&track]);
        assert!(fetcher.responses.contains_key("https://cdn.test/1.flac"));
        assert!(
            fetcher
                .responses
                .contains_key("https://img.test/7?size=orig&ext=jpg")
        );
    }

    #[test]
    fn test_flac_fixtures_share_streaminfo() {
        let padded = minimal_flac();
        let bare = streaminfo_only_flac();
        assert_eq!(padded.len(), bare.len() + 12);
        assert_eq!(padded[8..42], bare[8..42]);
        assert_eq!(padded[4], 0x00);
        assert_eq!(bare[4], 0x80);
    }

    #[test]
    fn test_fixtures_detect_as_audio() {
        use lofty::file::FileType;
        use std::io::Cursor;

        let flac = lofty::probe::Probe::new(Cursor::new(minimal_flac()))
            .guess_file_type()
            .unwrap();
        assert_eq!(flac.file_type(), Some(FileType::Flac));

        let mp3 = lofty::probe::Probe::new(Cursor::new(minimal_mp3()))
            .guess_file_type()
            .unwrap();
        assert_eq!(mp3.file_type(), Some(FileType::Mpeg));
    }
}
