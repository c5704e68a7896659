//! Catalog API Data Transfer Objects
//!
//! These types match what the catalog GraphQL endpoint returns.
//! DO NOT use these types outside the catalog module - convert them with
//! [`super::adapter`] first.
//!
//! Track leaves are structurally identical whether they come from a direct
//! track lookup, a release, a playlist or the favorites collection.

use serde::{Deserialize, Deserializer, Serialize};

/// GraphQL response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

/// GraphQL error entry
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// Request body for one batched query
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRequest<'a> {
    pub operation_name: &'a str,
    pub variables: Variables<'a>,
    pub query: &'a str,
}

/// Query variables: the id batch
#[derive(Debug, Clone, Serialize)]
pub struct Variables<'a> {
    pub ids: &'a [u64],
}

/// `getTracks` payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TracksData {
    /// Unknown ids come back as `null`
    #[serde(default)]
    pub get_tracks: Vec<Option<Track>>,
}

/// `getReleases` payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleasesData {
    #[serde(default)]
    pub get_releases: Vec<Option<Release>>,
}

/// `getPlaylists` payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistsData {
    #[serde(default)]
    pub get_playlists: Vec<Option<Playlist>>,
}

/// `collection` payload (the user's saved tracks)
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionData {
    pub collection: Option<Collection>,
}

/// Favorites collection
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Collection {
    #[serde(default)]
    pub tracks: Vec<Option<Track>>,
}

/// Track leaf
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    #[serde(deserialize_with = "de_id")]
    pub id: u64,
    pub title: String,
    /// 1-based position within the release
    pub position: Option<u32>,
    /// Explicit lossless availability flag
    #[serde(default)]
    pub has_flac: bool,
    /// Preformatted artist credit line
    pub credits: Option<String>,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub stream: Option<Stream>,
    pub release: Option<TrackRelease>,
}

/// Performer credit
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Artist {
    pub title: String,
}

/// Genre entry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Genre {
    pub name: String,
}

/// Signed stream locations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Stream {
    /// Lossless stream
    pub flac: Option<String>,
    /// Highest lossy (MP3 320) stream
    pub high: Option<String>,
}

/// Release as nested under a track
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRelease {
    #[serde(deserialize_with = "de_id")]
    pub id: u64,
    pub title: String,
    /// YYYY, YYYY-MM-DD or a full timestamp
    pub date: Option<String>,
    pub image: Option<Image>,
    pub label: Option<Label>,
    /// Every track id of the release, in order
    #[serde(default, deserialize_with = "de_ids")]
    pub track_ids: Vec<u64>,
}

/// Artwork reference
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Image {
    /// URL template containing a `{size}` placeholder
    pub src: Option<String>,
}

/// Label / copyright holder
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Label {
    pub title: String,
}

/// Release entry (album, EP, single)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    #[serde(deserialize_with = "de_id")]
    pub id: u64,
    pub title: String,
    pub date: Option<String>,
    pub credits: Option<String>,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub tracks: Vec<Option<Track>>,
}

/// Playlist entry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Playlist {
    #[serde(deserialize_with = "de_id")]
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub tracks: Vec<Option<Track>>,
}

/// GraphQL ids arrive either as numbers or numeric strings
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Num(u64),
    Str(String),
}

impl RawId {
    fn into_u64<E: serde::de::Error>(self) -> Result<u64, E> {
        match self {
            RawId::Num(n) => Ok(n),
            RawId::Str(s) => s
                .parse()
                .map_err(|_| E::custom(format!("invalid id: {s:?}"))),
        }
    }
}

fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    RawId::deserialize(deserializer)?.into_u64()
}

fn de_ids<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u64>, D::Error> {
    Vec::<RawId>::deserialize(deserializer)?
        .into_iter()
        .map(RawId::into_u64)
        .collect()
}
