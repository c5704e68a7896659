//! Trait definitions for the network collaborators.
//!
//! The download pipeline only talks to [`CatalogApi`] and [`MediaFetcher`],
//! so tests can substitute the mocks below for the HTTP clients.

use async_trait::async_trait;

use super::client::CatalogClient;
use super::dto;
use super::fetch::{FetchError, HttpFetcher};
use crate::error::Result;

/// Batched catalog queries.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Look up ad-hoc tracks.
    async fn tracks(&self, ids: &[u64]) -> Result<Vec<dto::Track>>;

    /// Look up releases with nested track lists.
    async fn releases(&self, ids: &[u64]) -> Result<Vec<dto::Release>>;

    /// Look up playlists with nested track lists.
    async fn playlists(&self, ids: &[u64]) -> Result<Vec<dto::Playlist>>;

    /// Fetch the favorites collection.
    async fn favorites(&self) -> Result<Vec<dto::Track>>;
}

/// Generic GET-and-return-bytes.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError>;
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn tracks(&self, ids: &[u64]) -> Result<Vec<dto::Track>> {
        self.get_tracks(ids).await
    }

    async fn releases(&self, ids: &[u64]) -> Result<Vec<dto::Release>> {
        self.get_releases(ids).await
    }

    async fn playlists(&self, ids: &[u64]) -> Result<Vec<dto::Playlist>> {
        self.get_playlists(ids).await
    }

    async fn favorites(&self) -> Result<Vec<dto::Track>> {
        self.get_favorites().await
    }
}

#[async_trait]
impl MediaFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        self.get_bytes(url).await
    }
}
