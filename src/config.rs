//! Site configuration loaded from an optional YAML file.
//!
//! Every field has a default, so an empty file (or no file) is valid.
//! Unknown keys are rejected, including inside `photos`.
//! Command-line flags take precedence over file values.
//!
//! ```yaml
//! data_dir: ./data
//! news_limit: 6
//! fetch_timeout_secs: 10
//! photos:
//!   professor_dir: /images/professor
//!   activity_dir: /images/activities
//!   placeholder: /images/placeholder.png
//! ```

use crate::cli::Cli;
use crate::loader::LoadOptions;
use crate::news::DEFAULT_LIMIT;
use crate::postprocess::PhotoPaths;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory holding the delimited-text sources.
    pub data_dir: PathBuf,
    /// When set, sources are fetched relative to this URL instead of `data_dir`.
    pub base_url: Option<String>,
    pub news_limit: usize,
    pub fetch_timeout_secs: Option<u64>,
    pub photos: PhotoPaths,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            base_url: None,
            news_limit: DEFAULT_LIMIT,
            fetch_timeout_secs: None,
            photos: PhotoPaths::default(),
        }
    }
}

impl SiteConfig {
    pub fn from_yaml_str(yaml: &str, origin: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })
    }

    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let origin = path.display().to_string();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: origin.clone(),
            source,
        })?;
        let config = Self::from_yaml_str(&yaml, &origin)?;
        info!("Loaded configuration");
        Ok(config)
    }

    /// File config (if any) with command-line overrides applied.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(Path::new(path))?,
            None => Self::default(),
        };
        config.apply_overrides(cli);
        Ok(config)
    }

    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(dir) = &cli.data_dir {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(url) = &cli.base_url {
            self.base_url = Some(url.clone());
        }
        if let Some(limit) = cli.limit {
            self.news_limit = limit;
        }
        if let Some(secs) = cli.timeout_secs {
            self.fetch_timeout_secs = Some(secs);
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            timeout: self.fetch_timeout_secs.map(Duration::from_secs),
        }
    }
}
