//! Resource fetchers.
//!
//! A fetcher only knows how to turn a locator into text. It does not parse
//! and it does not fall back: every failure comes back as a [`LoadError`]
//! for the loader to isolate.

use crate::loader::LoadError;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, instrument};
use url::Url;

/// Load the text of a named resource; fails if the resource is absent.
pub trait ResourceFetcher: Send + Sync + 'static {
    fn fetch(&self, locator: &str) -> impl Future<Output = Result<String, LoadError>> + Send;
}

/// Reads resources from a local data directory.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceFetcher for FsFetcher {
    #[instrument(level = "debug", skip(self), fields(root = %self.root.display()))]
    async fn fetch(&self, locator: &str) -> Result<String, LoadError> {
        let path = self.root.join(locator);
        match fs::read_to_string(&path).await {
            Ok(text) => {
                debug!(bytes = text.len(), path = %path.display(), "Read data file");
                Ok(text)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(LoadError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(LoadError::Io {
                locator: path.display().to_string(),
                source: e,
            }),
        }
    }
}

/// Fetches resources over HTTP relative to a base URL.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base: Url,
}

impl HttpFetcher {
    /// `base` is treated as a directory: a missing trailing slash is added so
    /// locators resolve beneath it rather than beside it.
    pub fn new(client: reqwest::Client, mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { client, base }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }
}

impl ResourceFetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self), fields(base = %self.base))]
    async fn fetch(&self, locator: &str) -> Result<String, LoadError> {
        let url = self
            .base
            .join(locator)
            .map_err(|e| LoadError::InvalidLocator {
                locator: locator.to_string(),
                reason: e.to_string(),
            })?;

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LoadError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(LoadError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await?;
        debug!(bytes = text.len(), %url, "Fetched data file");
        Ok(text)
    }
}

/// Runtime choice between the local and the HTTP fetcher.
#[derive(Debug, Clone)]
pub enum Fetcher {
    Fs(FsFetcher),
    Http(HttpFetcher),
}

impl ResourceFetcher for Fetcher {
    async fn fetch(&self, locator: &str) -> Result<String, LoadError> {
        match self {
            Fetcher::Fs(fetcher) => fetcher.fetch(locator).await,
            Fetcher::Http(fetcher) => fetcher.fetch(locator).await,
        }
    }
}
