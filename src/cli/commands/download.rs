//! Download command.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

use super::refs;
use crate::catalog::{CatalogClient, HttpFetcher, MediaFetcher, auth};
use crate::config::{self, ClientConfig};
use crate::cover::CoverCache;
use crate::download::{DownloadService, Materializer, Progress, ServiceConfig};

/// Options shared by every batch of one download command
pub struct DownloadOptions<'a> {
    pub refs: &'a [String],
    pub output: Option<&'a PathBuf>,
    pub jobs: Option<usize>,
    pub insecure: bool,
    pub keep_cache: bool,
}

#[derive(Default)]
struct Totals {
    downloaded: usize,
    skipped: usize,
    failed: usize,
}

/// Resolve and download every reference
pub fn cmd_download(rt: &Runtime, opts: DownloadOptions<'_>) -> anyhow::Result<()> {
    let parsed = opts
        .refs
        .iter()
        .map(|r| refs::parse_ref(r))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let batches = refs::group(&parsed);

    let mut config = config::load();
    if let Some(output) = opts.output {
        config.download.output_dir = output.clone();
    }
    if let Some(jobs) = opts.jobs {
        config.download.jobs = jobs;
    }
    if opts.insecure {
        config.catalog.verify_tls = false;
    }

    let token = auth::read_token(&config.auth.token_path)?;
    let client_config = ClientConfig::from_catalog(&config.catalog, Some(token));
    let fetcher: Arc<dyn MediaFetcher> = Arc::new(HttpFetcher::new(&client_config)?);
    let catalog = Arc::new(CatalogClient::new(client_config)?);

    let covers = CoverCache::new(config.download.cache_dir(), fetcher.clone());
    let materializer = Materializer::new(&config.download.output_dir, fetcher, covers);
    let service = DownloadService::new(
        catalog,
        materializer,
        ServiceConfig {
            jobs: config.download.jobs,
            favorites_folder: config.download.favorites_folder.clone(),
        },
    );

    println!("Output: {:?}", config.download.output_dir);
    if config.download.jobs > 1 {
        println!("Workers: {}", config.download.jobs);
    }

    let mut totals = Totals::default();
    let result: anyhow::Result<()> = rt.block_on(async {
        for (kind, ids) in &batches {
            let plan = service.plan(*kind, ids).await?;

            println!("\n{:?}: {} tracks resolved", kind, plan.jobs.len());
            for job in &plan.jobs {
                println!("{}\n", job.record);
            }
            for skipped in &plan.skipped {
                eprintln!("SKIPPED {} ({}): {}", skipped.track_id, skipped.title, skipped.error);
            }

            let report = service.run(plan, print_progress).await;
            totals.downloaded += report.downloaded.len();
            totals.skipped += report.skipped.len();
            totals.failed += report.failed.len();
        }
        Ok::<(), anyhow::Error>(())
    });

    if opts.keep_cache {
        tracing::debug!("Keeping cover cache at {:?}", config.download.cache_dir());
    } else if let Err(e) = service.materializer().covers().clear() {
        tracing::warn!("Failed to clear cover cache: {}", e);
    }

    println!(
        "\nCompleted: {} downloaded, {} skipped, {} failed",
        totals.downloaded, totals.skipped, totals.failed
    );
    result
}

fn print_progress(progress: Progress<'_>) {
    match progress {
        Progress::Started {
            index,
            total,
            record,
        } => println!("Downloading {}/{}: {} - {}", index, total, record.artist, record.title),
        Progress::Finished { path, .. } => println!("  Saved {}", path.display()),
        Progress::Failed { record, error, .. } => {
            eprintln!("  ERROR {} - {}: {}", record.artist, record.title, error)
        }
    }
}
