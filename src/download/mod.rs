//! Download pipeline.
//!
//! [`DownloadService`] resolves a batch of catalog entities into placed
//! tracks and hands each one to the [`Materializer`], which fetches the
//! cover and audio, writes the file and tags it.

pub mod materializer;
pub mod service;

pub use materializer::Materializer;
pub use service::{BatchReport, DownloadService, Progress, ServiceConfig};
