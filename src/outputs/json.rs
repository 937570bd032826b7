//! JSON output for the presentation layer.
//!
//! The site's front end reads two files:
//! ```text
//! output_dir/
//! ├── snapshot.json   # source key → dataset, post-processed
//! └── news.json       # ranked latest-updates feed
//! ```

use crate::models::Snapshot;
use crate::news::NewsItem;
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

pub const SNAPSHOT_FILE: &str = "snapshot.json";
pub const NEWS_FILE: &str = "news.json";

async fn write_json<T: Serialize + ?Sized>(
    value: &T,
    output_dir: &str,
    file_name: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(value)?;

    if let Err(e) = fs::create_dir_all(output_dir).await {
        error!(%output_dir, error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = Path::new(output_dir).join(file_name);
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON file");
    Ok(path)
}

/// Write the post-processed snapshot to `{output_dir}/snapshot.json`.
#[instrument(level = "info", skip_all, fields(%output_dir))]
pub async fn write_snapshot(
    snapshot: &Snapshot,
    output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    write_json(snapshot, output_dir, SNAPSHOT_FILE).await
}

/// Write the ranked feed to `{output_dir}/news.json`.
#[instrument(level = "info", skip_all, fields(%output_dir, count = items.len()))]
pub async fn write_news(items: &[NewsItem], output_dir: &str) -> Result<PathBuf, Box<dyn Error>> {
    write_json(items, output_dir, NEWS_FILE).await
}
