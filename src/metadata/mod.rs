//! Tag writing for downloaded audio files.
//!
//! Uses the lofty crate. Both container families share one semantic field
//! table ([`FIELD_TABLE`]); a [`TagScheme`] only decides which container and
//! tag type the table is written into.
//!
//! | field     | lossless (Vorbis) | lossy (ID3v2)          |
//! |-----------|-------------------|------------------------|
//! | artist    | ARTIST            | TPE1                   |
//! | title     | TITLE             | TIT2                   |
//! | album     | ALBUM             | TALB                   |
//! | genre     | GENRE             | TCON                   |
//! | year      | DATE              | TDRC                   |
//! | number    | TRACKNUMBER       | TRCK (`n/total`)       |
//! | total     | TRACKTOTAL        | folded into TRCK       |
//! | copyright | COPYRIGHT         | TCOP                   |
//! | cover     | PICTURE block     | APIC                   |
//!
//! The catalog ids ([`ID_FIELDS`]) are written as custom text items:
//! `RELEASE_ID` / `TRACK_ID` Vorbis keys, or `TXXX` frames with those
//! descriptions.

use lofty::config::WriteOptions;
use lofty::file::{FileType, TaggedFile, TaggedFileExt};
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::probe::Probe;
use lofty::tag::{ItemKey, ItemValue, Tag, TagExt, TagItem, TagType};
use std::fs;
use std::path::Path;

use crate::cover::COVER_MIME;
use crate::error::{Error, Result, ResultExt};
use crate::model::{AudioFormat, TrackRecord};

/// One semantic tag field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Artist,
    Title,
    Album,
    Genre,
    Year,
    TrackNumber,
    TrackTotal,
    Copyright,
    ReleaseId,
    TrackId,
}

/// Semantic field to lofty item key, shared by both schemes.
pub const FIELD_TABLE: [(Field, ItemKey); 8] = [
    (Field::Artist, ItemKey::TrackArtist),
    (Field::Title, ItemKey::TrackTitle),
    (Field::Album, ItemKey::AlbumTitle),
    (Field::Genre, ItemKey::Genre),
    (Field::Year, ItemKey::RecordingDate),
    (Field::TrackNumber, ItemKey::TrackNumber),
    (Field::TrackTotal, ItemKey::TrackTotal),
    (Field::Copyright, ItemKey::CopyrightMessage),
];

/// Catalog ids, written under custom keys in both schemes.
pub const ID_FIELDS: [(Field, &str); 2] = [
    (Field::ReleaseId, "RELEASE_ID"),
    (Field::TrackId, "TRACK_ID"),
];

impl Field {
    /// Text value of this field for a record. Numbers are decimal strings.
    pub fn value(self, record: &TrackRecord) -> String {
        match self {
            Self::Artist => record.artist.clone(),
            Self::Title => record.title.clone(),
            Self::Album => record.album.clone(),
            Self::Genre => record.genre.clone(),
            Self::Year => record.year().to_string(),
            Self::TrackNumber => record.track_number.to_string(),
            Self::TrackTotal => record.track_total.to_string(),
            Self::Copyright => record.copyright.clone(),
            Self::ReleaseId => record.release_id.to_string(),
            Self::TrackId => record.track_id.to_string(),
        }
    }
}

/// Container-specific half of the tag writer.
pub trait TagScheme: Send + Sync {
    /// Container the downloaded file must parse as.
    fn file_type(&self) -> FileType;

    /// Tag type the field table is written into.
    fn tag_type(&self) -> TagType;
}

/// FLAC with Vorbis comments
pub struct LosslessScheme;

/// MP3 with ID3v2
pub struct LossyScheme;

impl TagScheme for LosslessScheme {
    fn file_type(&self) -> FileType {
        FileType::Flac
    }

    fn tag_type(&self) -> TagType {
        TagType::VorbisComments
    }
}

impl TagScheme for LossyScheme {
    fn file_type(&self) -> FileType {
        FileType::Mpeg
    }

    fn tag_type(&self) -> TagType {
        TagType::Id3v2
    }
}

/// The scheme for a record's format.
pub fn scheme_for(format: AudioFormat) -> &'static dyn TagScheme {
    match format {
        AudioFormat::Lossless => &LosslessScheme,
        AudioFormat::Lossy => &LossyScheme,
    }
}

/// Write the record's tags and front cover into `path`.
///
/// The cover is attached only if the tag has no front cover yet, so writing
/// the same file twice leaves exactly one embedded picture. A file that does
/// not parse as the record's container is [`Error::CorruptAudioFile`].
pub fn write_tags(path: &Path, record: &TrackRecord, cover: &[u8]) -> Result<()> {
    let scheme = scheme_for(record.format);
    let mut tagged_file = open_as(path, scheme)?;
    if scheme.file_type() == FileType::Flac && pad_lone_streaminfo(path)? {
        tracing::debug!("Added PADDING block to {:?}", path);
    }

    let tag_type = scheme.tag_type();
    if tagged_file.tag(tag_type).is_none() {
        tagged_file.insert_tag(Tag::new(tag_type));
    }
    let tag = tagged_file
        .tag_mut(tag_type)
        .ok_or_else(|| Error::corrupt(path, format!("{tag_type:?} not supported")))?;

    for (field, key) in FIELD_TABLE {
        tag.insert_text(key, field.value(record));
    }
    // Custom keys have no mapping, so insert() would drop them
    for (field, key) in ID_FIELDS {
        tag.insert_unchecked(TagItem::new(
            ItemKey::Unknown(key.to_string()),
            ItemValue::Text(field.value(record)),
        ));
    }

    let has_front_cover = tag
        .pictures()
        .iter()
        .any(|p| p.pic_type() == PictureType::CoverFront);
    if !has_front_cover {
        tag.push_picture(Picture::new_unchecked(
            PictureType::CoverFront,
            Some(MimeType::from_str(COVER_MIME)),
            None,
            cover.to_vec(),
        ));
    }

    tag.save_to_path(path, WriteOptions::default())
        .map_err(|e| Error::corrupt(path, format!("failed to save tags: {e}")))?;

    tracing::debug!("Tagged {:?} ({} cover)", path, if has_front_cover { "kept" } else { "added" });
    Ok(())
}

const FLAC_MARKER: &[u8] = b"fLaC";
const STREAMINFO_LEN: [u8; 3] = [0x00, 0x00, 0x22];
const STREAMINFO_END: usize = 4 + 4 + 34;
/// Last-block flag, type 1 (PADDING), 8 zero bytes
const PADDING_BLOCK: [u8; 12] = [0x81, 0x00, 0x00, 0x08, 0, 0, 0, 0, 0, 0, 0, 0];

/// Append a PADDING block when STREAMINFO is the file's only metadata block.
///
/// lofty cannot rewrite such a file. Returns `true` if the file was changed.
fn pad_lone_streaminfo(path: &Path) -> Result<bool> {
    let mut data = fs::read(path).with_context(format!("reading {}", path.display()))?;
    if data.len() < STREAMINFO_END || !data.starts_with(FLAC_MARKER) {
        return Ok(false);
    }
    // STREAMINFO (type 0) flagged as last
    if data[4] != 0x80 || data[5..8] != STREAMINFO_LEN {
        return Ok(false);
    }

    data[4] = 0x00;
    data.splice(STREAMINFO_END..STREAMINFO_END, PADDING_BLOCK);
    fs::write(path, &data).with_context(format!("writing {}", path.display()))?;
    Ok(true)
}

/// Open `path` and require the scheme's container.
fn open_as(path: &Path, scheme: &dyn TagScheme) -> Result<TaggedFile> {
    let tagged_file = Probe::open(path)
        .map_err(|e| Error::corrupt(path, e.to_string()))?
        .guess_file_type()
        .map_err(|e| Error::corrupt(path, e.to_string()))?
        .read()
        .map_err(|e| Error::corrupt(path, e.to_string()))?;

    if tagged_file.file_type() != scheme.file_type() {
        return Err(Error::corrupt(
            path,
            format!(
                "expected {:?}, found {:?}",
                scheme.file_type(),
                tagged_file.file_type()
            ),
        ));
    }
    Ok(tagged_file)
}

#[cfg(test)]
pub use readback::{WrittenTags, read};


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{minimal_flac, minimal_mp3, mock_record, streaminfo_only_flac};
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn record(format: AudioFormat) -> TrackRecord {
        TrackRecord {
            title: "Song A".to_string(),
            artist: "Artist".to_string(),
            album: "Album".to_string(),
            genre: "Rock, Indie".to_string(),
            release_date: "2024-05-01".to_string(),
            copyright: "Label".to_string(),
            track_id: 101,
            release_id: 7,
            track_number: 3,
            track_total: 10,
            format,
            ..mock_record()
        }
    }

    #[test]
    fn test_field_values_are_text() {
        let r = record(AudioFormat::Lossless);
        assert_eq!(Field::Year.value(&r), "2024");
        assert_eq!(Field::TrackNumber.value(&r), "3");
        assert_eq!(Field::TrackTotal.value(&r), "10");
        assert_eq!(Field::Genre.value(&r), "Rock, Indie");
        assert_eq!(Field::ReleaseId.value(&r), "7");
        assert_eq!(Field::TrackId.value(&r), "101");
    }

    #[test]
    fn test_schemes_map_formats() {
        assert_eq!(scheme_for(AudioFormat::Lossless).file_type(), FileType::Flac);
        assert_eq!(
            scheme_for(AudioFormat::Lossless).tag_type(),
            TagType::VorbisComments
        );
        assert_eq!(scheme_for(AudioFormat::Lossy).file_type(), FileType::Mpeg);
        assert_eq!(scheme_for(AudioFormat::Lossy).tag_type(), TagType::Id3v2);
    }

    #[test]
    fn test_write_flac_tags() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("01 - Song A.flac");
        std::fs::write(&path, minimal_flac()).unwrap();

        write_tags(&path, &record(AudioFormat::Lossless), b"\xFF\xD8\xFFcover").unwrap();

        let tags = read(&path).unwrap();
        assert_eq!(tags.artist.as_deref(), Some("Artist"));
        assert_eq!(tags.title.as_deref(), Some("Song A"));
        assert_eq!(tags.album.as_deref(), Some("Album"));
        assert_eq!(tags.genre.as_deref(), Some("Rock, Indie"));
        assert_eq!(tags.date.as_deref(), Some("2024"));
        assert_eq!(tags.track_number, Some(3));
        assert_eq!(tags.track_total, Some(10));
        assert_eq!(tags.copyright.as_deref(), Some("Label"));
        assert_eq!(tags.release_id.as_deref(), Some("7"));
        assert_eq!(tags.track_id.as_deref(), Some("101"));
        assert_eq!(tags.front_covers, 1);
    }

    #[test]
    fn test_write_mp3_tags() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Artist - Song A.mp3");
        std::fs::write(&path, minimal_mp3()).unwrap();

        write_tags(&path, &record(AudioFormat::Lossy), b"\xFF\xD8\xFFcover").unwrap();

        let tags = read(&path).unwrap();
        assert_eq!(tags.artist.as_deref(), Some("Artist"));
        assert_eq!(tags.title.as_deref(), Some("Song A"));
        assert_eq!(tags.track_number, Some(3));
        assert_eq!(tags.track_total, Some(10));
        assert_eq!(tags.copyright.as_deref(), Some("Label"));
        assert_eq!(tags.release_id.as_deref(), Some("7"));
        assert_eq!(tags.track_id.as_deref(), Some("101"));
        assert_eq!(tags.front_covers, 1);
    }

    #[test]
    fn test_lone_streaminfo_flac_is_tagged() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bare.flac");
        std::fs::write(&path, streaminfo_only_flac()).unwrap();

        write_tags(&path, &record(AudioFormat::Lossless), b"cover").unwrap();

        let tags = read(&path).unwrap();
        assert_eq!(tags.title.as_deref(), Some("Song A"));
        assert_eq!(tags.front_covers, 1);
    }

    #[test]
    fn test_lone_streaminfo_with_frames_keeps_audio() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("frames.flac");
        let frames = [0xFF, 0xF8, 0x69, 0x08, 0x00, 0x00, 0x00, 0x00];
        let mut data = streaminfo_only_flac();
        data.extend_from_slice(&frames);
        std::fs::write(&path, &data).unwrap();

        write_tags(&path, &record(AudioFormat::Lossless), b"cover").unwrap();

        let written = std::fs::read(&path).unwrap();
        assert!(written.ends_with(&frames));
        assert_eq!(read(&path).unwrap().track_number, Some(3));
    }

    #[test]
    fn test_padding_added_only_once() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bare.flac");
        std::fs::write(&path, streaminfo_only_flac()).unwrap();

        assert!(pad_lone_streaminfo(&path).unwrap());
        assert!(!pad_lone_streaminfo(&path).unwrap());
        assert_eq!(std::fs::read(&path).unwrap(), minimal_flac());
    }

    #[test]
    fn test_retag_replaces_ids() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("song.mp3");
        std::fs::write(&path, minimal_mp3()).unwrap();

        write_tags(&path, &record(AudioFormat::Lossy), b"cover").unwrap();
        let retagged = TrackRecord {
            track_id: 202,
            ..record(AudioFormat::Lossy)
        };
        write_tags(&path, &retagged, b"cover").unwrap();

        assert_eq!(read(&path).unwrap().track_id.as_deref(), Some("202"));
    }

    #[test]
    fn test_rewrite_does_not_duplicate_cover() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("song.flac");
        std::fs::write(&path, minimal_flac()).unwrap();
        let r = record(AudioFormat::Lossless);

        write_tags(&path, &r, b"cover").unwrap();
        write_tags(&path, &r, b"cover").unwrap();

        assert_eq!(read(&path).unwrap().front_covers, 1);
    }

    #[test]
    fn test_rewrite_mp3_does_not_duplicate_cover() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("song.mp3");
        std::fs::write(&path, minimal_mp3()).unwrap();
        let r = record(AudioFormat::Lossy);

        write_tags(&path, &r, b"cover").unwrap();
        write_tags(&path, &r, b"cover").unwrap();

        assert_eq!(read(&path).unwrap().front_covers, 1);
    }

    #[test]
    fn test_non_audio_file_is_corrupt() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "<html>403 Forbidden</html>").expect("Failed to write");

        let err = write_tags(file.path(), &record(AudioFormat::Lossless), b"c").unwrap_err();
        assert!(matches!(err, Error::CorruptAudioFile { .. }));
    }

    #[test]
    fn test_wrong_container_is_corrupt() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("song.flac");
        // MP3 payload saved under a lossless record
        std::fs::write(&path, minimal_mp3()).unwrap();

        let err = write_tags(&path, &record(AudioFormat::Lossless), b"c").unwrap_err();
        assert!(matches!(err, Error::CorruptAudioFile { .. }));
        assert!(path.exists(), "corrupt files are left on disk");
    }

    #[test]
    fn test_missing_file_is_corrupt() {
        let err = write_tags(
            Path::new("non_existent_file.flac"),
            &record(AudioFormat::Lossless),
            b"c",
        )
        .unwrap_err();
        assert!(matches!(err, Error::CorruptAudioFile { .. }));
    }
}
