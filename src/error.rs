//! Application-wide error types.
//!
//! Core modules return [`Error`] through the [`Result`] alias; the CLI layer
//! wraps everything in `anyhow` for reporting.
//!
//! # Scope of failures
//!
//! - Batch-fatal: [`Error::AuthMissingOrInvalid`], [`Error::CatalogQueryFailed`].
//!   These abort the whole command.
//! - Track-local: everything reported by [`Error::is_track_local`]. The
//!   failing track is reported and its siblings keep going.
//!
//! # Example
//!
//! ```ignore
//! use zvuk_fetch::error::{Error, Result, ResultExt};
//!
//! fn write_cover(path: &Path, bytes: &[u8]) -> Result<()> {
//!     std::fs::write(path, bytes).with_context("writing cover.jpg")?;
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Auth token file missing, unreadable or not 32 characters
    #[error("Auth token missing or invalid: {0}")]
    AuthMissingOrInvalid(String),

    /// The catalog query for a whole batch failed
    #[error("Catalog query failed: {0}")]
    CatalogQueryFailed(String),

    /// The track has no stream URL for the format chosen at normalization
    #[error("Track {track_id} ({title}) has no {format} stream")]
    MissingStreamKind {
        track_id: u64,
        title: String,
        format: &'static str,
    },

    /// Cover image fetch returned a non-success status or failed in transit
    #[error("Cover download failed for release {release_id}: {message}")]
    ImageDownloadFailed { release_id: u64, message: String },

    /// Audio payload fetch returned a non-success status or failed in transit
    #[error("Audio download failed for {url}: {message}")]
    AudioDownloadFailed { url: String, message: String },

    /// The downloaded file is not a valid container of the expected format
    #[error("Corrupt audio file {path}: {message}")]
    CorruptAudioFile { path: PathBuf, message: String },

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an auth error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::AuthMissingOrInvalid(message.into())
    }

    /// Create a catalog query error.
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::CatalogQueryFailed(message.into())
    }

    /// Create an image download error.
    pub fn image_download(release_id: u64, message: impl Into<String>) -> Self {
        Self::ImageDownloadFailed {
            release_id,
            message: message.into(),
        }
    }

    /// Create an audio download error.
    pub fn audio_download(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AudioDownloadFailed {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a corrupt file error.
    pub fn corrupt(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::CorruptAudioFile {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }

    /// Whether this error only invalidates the track being processed.
    ///
    /// Auth and catalog failures abort the containing command instead.
    pub fn is_track_local(&self) -> bool {
        match self {
            Self::AuthMissingOrInvalid(_) | Self::CatalogQueryFailed(_) | Self::Config(_) => false,
            Self::MissingStreamKind { .. }
            | Self::ImageDownloadFailed { .. }
            | Self::AudioDownloadFailed { .. }
            | Self::CorruptAudioFile { .. }
            | Self::Io(_) => true,
            Self::WithContext { source, .. } => source.is_track_local(),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}
