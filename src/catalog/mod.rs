//! Catalog service access.
//!
//! # Architecture
//!
//! - **DTOs** (`dto.rs`) - exact GraphQL response shapes
//! - **Adapter** (`adapter.rs`) - normalizes track leaves into [`TrackRecord`]s
//! - **Client** (`client.rs`) - batched, authenticated catalog queries
//! - **Fetch** (`fetch.rs`) - unauthenticated GET for audio and artwork
//! - **Auth** (`auth.rs`) - token file and one-shot login
//! - **Traits** (`traits.rs`) - seams used by the download pipeline and mocks
//!
//! [`TrackRecord`]: crate::model::TrackRecord

pub mod adapter;
pub mod auth;
pub mod client;
pub mod dto;
pub mod fetch;
pub mod traits;

pub use adapter::to_record;
pub use client::CatalogClient;
pub use fetch::{FetchError, HttpFetcher};
pub use traits::{CatalogApi, MediaFetcher};
