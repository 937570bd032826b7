//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Most options can also come from environment variables or the YAML config
//! file; flags win over both.

use clap::Parser;

/// Command-line arguments for the site data loader.
///
/// # Examples
///
/// ```sh
/// # Load from ./data and write snapshot.json + news.json to ./public
/// lab_site_data -o ./public
///
/// # Fetch sources over HTTP with a 10 second per-source timeout
/// lab_site_data -o ./public --base-url https://lab.example.edu/data/ --timeout-secs 10
///
/// # Settings from a config file, feed shortened to 3 items
/// lab_site_data -o ./public -c site.yaml -l 3
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for snapshot.json and news.json
    #[arg(short, long)]
    pub output_dir: String,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory holding the delimited-text sources
    #[arg(short, long, env = "LAB_DATA_DIR")]
    pub data_dir: Option<String>,

    /// Fetch sources relative to this URL instead of the data directory
    #[arg(long, env = "LAB_DATA_URL")]
    pub base_url: Option<String>,

    /// Number of items in the latest-updates feed
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Per-source fetch timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "lab_site_data",
            "--output-dir",
            "./public",
            "--data-dir",
            "./data",
            "--limit",
            "4",
        ]);

        assert_eq!(cli.output_dir, "./public");
        assert_eq!(cli.data_dir.as_deref(), Some("./data"));
        assert_eq!(cli.limit, Some(4));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["lab_site_data", "-o", "/tmp/out", "-c", "site.yaml", "-l", "2"]);

        assert_eq!(cli.output_dir, "/tmp/out");
        assert_eq!(cli.config.as_deref(), Some("site.yaml"));
        assert_eq!(cli.limit, Some(2));
    }

    #[test]
    fn test_cli_requires_output_dir() {
        assert!(Cli::try_parse_from(["lab_site_data"]).is_err());
    }
}
