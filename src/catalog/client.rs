//! Catalog HTTP client
//!
//! Every query is one batched GraphQL POST: a release or playlist comes back
//! with all of its track leaves nested, so the number of requests is bounded
//! by the number of batches, not the number of tracks.
//!
//! The auth token travels in the `x-auth-token` header.

use serde::de::DeserializeOwned;

use super::dto;
use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// Header carrying the auth token
pub const AUTH_HEADER: &str = "x-auth-token";

const GRAPHQL_PATH: &str = "/api/v1/graphql";

const TRACK_FIELDS: &str = "id title position hasFlac credits \
    artists { title } genres { name } stream { flac high } \
    release { id title date image { src } label { title } trackIds }";

/// Catalog API client
pub struct CatalogClient {
    http_client: reqwest::Client,
    config: ClientConfig,
}

impl CatalogClient {
    /// Create a client from an explicit configuration.
    ///
    /// Fails with [`Error::AuthMissingOrInvalid`] if the config carries no
    /// token: every catalog query is authenticated.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.token.is_none() {
            return Err(Error::auth("catalog queries need an auth token"));
        }
        let http_client = config.http_client()?;
        Ok(Self {
            http_client,
            config,
        })
    }

    /// Look up a batch of tracks by id.
    pub async fn get_tracks(&self, ids: &[u64]) -> Result<Vec<dto::Track>> {
        let query = format!("query getTracks($ids: [ID!]!) {{ getTracks(ids: $ids) {{ {TRACK_FIELDS} }} }}");
        let data: dto::TracksData = self.query("getTracks", &query, ids).await?;
        Ok(flatten("track", data.get_tracks))
    }

    /// Look up a batch of releases with their nested track lists.
    pub async fn get_releases(&self, ids: &[u64]) -> Result<Vec<dto::Release>> {
        let query = format!(
            "query getReleases($ids: [ID!]!) {{ getReleases(ids: $ids) {{ \
             id title date credits artists {{ title }} tracks {{ {TRACK_FIELDS} }} }} }}"
        );
        let data: dto::ReleasesData = self.query("getReleases", &query, ids).await?;
        Ok(flatten("release", data.get_releases))
    }

    /// Look up a batch of playlists with their nested track lists.
    pub async fn get_playlists(&self, ids: &[u64]) -> Result<Vec<dto::Playlist>> {
        let query = format!(
            "query getPlaylists($ids: [ID!]!) {{ getPlaylists(ids: $ids) {{ \
             id title tracks {{ {TRACK_FIELDS} }} }} }}"
        );
        let data: dto::PlaylistsData = self.query("getPlaylists", &query, ids).await?;
        Ok(flatten("playlist", data.get_playlists))
    }

    /// Fetch the user's saved tracks.
    pub async fn get_favorites(&self) -> Result<Vec<dto::Track>> {
        let query = format!("query userCollection {{ collection {{ tracks {{ {TRACK_FIELDS} }} }} }}");
        let data: dto::CollectionData = self.query("userCollection", &query, &[]).await?;
        Ok(flatten(
            "favorite track",
            data.collection.unwrap_or_default().tracks,
        ))
    }

    /// Send one GraphQL request and unwrap its envelope.
    async fn query<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        ids: &[u64],
    ) -> Result<T> {
        let url = format!("{}{}", self.config.base_url, GRAPHQL_PATH);
        let body = dto::GraphQlRequest {
            operation_name: operation,
            variables: dto::Variables { ids },
            query,
        };

        tracing::debug!(operation, ?ids, "Catalog query");

        let mut request = self.http_client.post(&url).json(&body);
        if let Some(token) = &self.config.token {
            request = request.header(AUTH_HEADER, token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::catalog(format!("{operation}: {e}")))?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::auth(format!("{operation}: HTTP {status}")));
        }

        if !status.is_success() {
            return Err(Error::catalog(format!(
                "{operation}: HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let envelope = response
            .json::<dto::GraphQlResponse<T>>()
            .await
            .map_err(|e| Error::catalog(format!("{operation}: failed to parse response: {e}")))?;

        unwrap_envelope(operation, envelope)
    }
}

/// Turn a GraphQL envelope into its payload.
fn unwrap_envelope<T>(operation: &str, envelope: dto::GraphQlResponse<T>) -> Result<T> {
    if !envelope.errors.is_empty() {
        let messages: Vec<_> = envelope.errors.iter().map(|e| e.message.as_str()).collect();
        return Err(Error::catalog(format!("{operation}: {}", messages.join("; "))));
    }
    envelope
        .data
        .ok_or_else(|| Error::catalog(format!("{operation}: response has no data")))
}

/// Drop `null` entries (ids the catalog does not know), logging each.
fn flatten<T>(what: &str, entries: Vec<Option<T>>) -> Vec<T> {
    let total = entries.len();
    let found: Vec<T> = entries.into_iter().flatten().collect();
    if found.len() < total {
        tracing::warn!("{} of {} {} ids not found in catalog", total - found.len(), total, what);
    }
    found
}
