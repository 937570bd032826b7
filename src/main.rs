//! # Lab Site Data
//!
//! Loads every data file behind the lab site, derives image paths, ranks the
//! latest updates, and writes the result as JSON for the front end.
//!
//! ## Usage
//!
//! ```sh
//! lab_site_data -o ./public -d ./data
//! ```
//!
//! ## Architecture
//!
//! 1. **Configuration**: CLI flags over an optional YAML file
//! 2. **Loading**: Fetch all sources concurrently; failures fall back to empty
//! 3. **Post-processing**: Derive professor and activity photo paths
//! 4. **Output**: Write `snapshot.json` and `news.json`

use clap::Parser;
use lab_site_data::cli::Cli;
use lab_site_data::config::SiteConfig;
use lab_site_data::outputs::json;
use lab_site_data::sources::{Fetcher, FsFetcher, HttpFetcher};
use lab_site_data::utils::ensure_writable_dir;
use lab_site_data::{default_catalog, derive, latest, load_all, LoadState};
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};
use url::Url;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("lab_site_data starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = SiteConfig::resolve(&args)?;
    info!(
        data_dir = %config.data_dir.display(),
        base_url = ?config.base_url,
        news_limit = config.news_limit,
        "Resolved configuration"
    );

    // Early check: ensure output dir is writable
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let fetcher = match &config.base_url {
        Some(base) => Fetcher::Http(HttpFetcher::new(reqwest::Client::new(), Url::parse(base)?)),
        None => Fetcher::Fs(FsFetcher::new(&config.data_dir)),
    };

    // ---- Load phase ----
    let catalog = default_catalog();
    let state = match load_all(Arc::new(fetcher), &catalog, &config.load_options()).await {
        Ok(mut loaded) => {
            let failed = loaded.report.failed_keys();
            if !failed.is_empty() {
                warn!(count = failed.len(), ?failed, "Rendering with empty defaults for failed sources");
            }
            derive(&mut loaded.snapshot, &config.photos);
            LoadState::Ready(loaded.snapshot)
        }
        Err(e) => {
            error!(error = %e, "Load phase failed");
            LoadState::from_load(Err(e))
        }
    };

    let snapshot = match &state {
        LoadState::Ready(snapshot) => snapshot,
        LoadState::Failed(message) => return Err(message.clone().into()),
        LoadState::Loading => return Err(LoadState::GENERIC_ERROR.into()),
    };

    match snapshot.professor() {
        Ok(profile) => info!(name = %profile.name, photo_url = %profile.photo_url, "Professor profile ready"),
        Err(e) => warn!(error = %e, "Professor profile incomplete; front end will use placeholders"),
    }
    match snapshot.activity_photos() {
        Ok(photos) => info!(count = photos.len(), "Activity photos ready"),
        Err(e) => warn!(error = %e, "Activity photo records incomplete"),
    }

    // ---- News feed ----
    let news = latest(snapshot, config.news_limit);
    info!(count = news.len(), limit = config.news_limit, "Ranked latest updates");

    // ---- Output ----
    json::write_snapshot(snapshot, &args.output_dir).await?;
    json::write_news(&news, &args.output_dir).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
