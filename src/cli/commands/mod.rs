//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `download`: resolve references and write tagged files
//! - `login`: obtain and store an auth token
//! - `refs`: parsing of download references

mod download;
mod login;
mod refs;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

pub use download::{DownloadOptions, cmd_download};
pub use login::cmd_login;

/// zvuk-fetch CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Download tracks, releases, playlists or favorites
    Download {
        /// Catalog URLs, kind:id pairs (track:1, release:2, playlist:3) or "favorites"
        #[arg(required = true)]
        refs: Vec<String>,
        /// Output root directory (overrides download.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Tracks downloaded concurrently (overrides download.jobs)
        #[arg(short, long)]
        jobs: Option<usize>,
        /// Skip TLS certificate verification
        #[arg(long)]
        insecure: bool,
        /// Keep cached cover images after the run
        #[arg(long)]
        keep_cache: bool,
    },
    /// Log in and store the auth token
    Login {
        email: String,
        password: String,
        /// Skip TLS certificate verification
        #[arg(long)]
        insecure: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;

    match &cli.command {
        Commands::Download {
            refs,
            output,
            jobs,
            insecure,
            keep_cache,
        } => cmd_download(
            &rt,
            DownloadOptions {
                refs,
                output: output.as_ref(),
                jobs: *jobs,
                insecure: *insecure,
                keep_cache: *keep_cache,
            },
        ),
        Commands::Login {
            email,
            password,
            insecure,
        } => cmd_login(&rt, email, password, *insecure),
    }
}
