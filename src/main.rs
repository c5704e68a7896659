//! zvuk-fetch - download and tag music from the Zvuk catalog.
//!
//! Resolves tracks, releases, playlists and the favorites collection,
//! downloads audio and cover art, and writes format-appropriate tags
//! (Vorbis comments for FLAC, ID3v2 for MP3).

pub mod catalog;
pub mod cli;
pub mod config;
pub mod cover;
pub mod download;
pub mod error;
pub mod metadata;
pub mod model;
pub mod organizer;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("zvuk_fetch=info".parse()?))
        .init();

    cli::run_command(&args)
}
