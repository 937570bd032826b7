//! Concurrent loading of every catalogued source into a [`Snapshot`].
//!
//! Each source is fetched and parsed in its own task. All tasks are joined
//! before anything is returned, so callers never see a partly built
//! snapshot.
//!
//! # Failure tiers
//!
//! - **Per source**: a fetch that fails (missing resource, bad status, I/O,
//!   timeout, cancelled task) is logged and replaced by the source's empty
//!   default. Siblings are unaffected and the load still succeeds.
//! - **Orchestration**: an unusable catalog or a panicked load task fails
//!   the whole load with an [`OrchestrationError`].
//!
//! Per-source outcomes stay explicit as `Result<Dataset, LoadError>` until
//! the snapshot is assembled; [`LoadReport`] keeps them for inspection.

use crate::models::{Dataset, Snapshot};
use crate::parser::parse;
use crate::sources::{ResourceFetcher, SourceDescriptor, SourceKey};
use crate::utils::truncate_for_log;
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

/// Why a single source could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The resource does not exist.
    #[error("resource not found: {0}")]
    NotFound(String),
    /// HTTP response with a non-2xx status other than 404
    #[error("HTTP error: status {status} for {url}")]
    HttpStatus { status: u16, url: String },
    /// Connection, TLS or body decoding failure
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("failed to read {locator}: {source}")]
    Io {
        locator: String,
        source: std::io::Error,
    },
    #[error("invalid locator {locator}: {reason}")]
    InvalidLocator { locator: String, reason: String },
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    /// The load task was cancelled before it settled.
    #[error("load cancelled")]
    Cancelled,
}

/// The load phase itself could not run.
#[derive(Debug, Error)]
pub enum OrchestrationError {
    #[error("source catalog is empty")]
    EmptyCatalog,
    #[error("source `{0}` is listed more than once")]
    DuplicateSource(SourceKey),
    #[error("load task for `{key}` panicked: {message}")]
    TaskPanicked { key: SourceKey, message: String },
}

/// Knobs for a load phase.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Per-source limit; an expired fetch counts as a per-source failure.
    pub timeout: Option<Duration>,
}

/// How one source settled.
#[derive(Debug)]
pub struct SourceOutcome {
    pub key: SourceKey,
    /// Record count on success.
    pub result: Result<usize, LoadError>,
}

/// Per-source outcomes of a load phase, in catalog order.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub outcomes: Vec<SourceOutcome>,
    pub elapsed: Duration,
}

impl LoadReport {
    pub fn failed(&self) -> impl Iterator<Item = &SourceOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &SourceOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_ok())
    }

    /// Keys of the failed sources, in catalog order.
    pub fn failed_keys(&self) -> Vec<SourceKey> {
        self.failed().map(|o| o.key).collect()
    }
}

/// A fully assembled snapshot together with how each source fared.
#[derive(Debug)]
pub struct Loaded {
    pub snapshot: Snapshot,
    pub report: LoadReport,
}

/// Fetch and parse one source.
///
/// Singletons keep only their first record, or an empty mapping when the
/// resource held no data rows.
pub async fn load_source<F: ResourceFetcher>(
    fetcher: &F,
    descriptor: &SourceDescriptor,
    timeout: Option<Duration>,
) -> Result<Dataset, LoadError> {
    let text = match timeout {
        Some(limit) => tokio::time::timeout(limit, fetcher.fetch(&descriptor.locator))
            .await
            .map_err(|_| LoadError::Timeout(limit))??,
        None => fetcher.fetch(&descriptor.locator).await?,
    };
    debug!(
        key = %descriptor.key,
        preview = %truncate_for_log(&text, 80),
        "Fetched source text"
    );

    let records = parse(&text);
    Ok(Dataset::from_records(descriptor.cardinality, records))
}

fn validate_catalog(sources: &[SourceDescriptor]) -> Result<(), OrchestrationError> {
    if sources.is_empty() {
        return Err(OrchestrationError::EmptyCatalog);
    }
    let mut seen = HashSet::new();
    for descriptor in sources {
        if !seen.insert(descriptor.key) {
            return Err(OrchestrationError::DuplicateSource(descriptor.key));
        }
    }
    Ok(())
}

/// Load every source concurrently and assemble the snapshot.
///
/// Every key in `sources` is present in the returned snapshot. Sources that
/// failed hold their empty default and are listed in [`LoadReport::failed`].
/// Each failure is logged here once at `warn`.
///
/// # Arguments
///
/// * `fetcher` - Shared fetcher used by every load task
/// * `sources` - Catalog to load; keys must be unique
/// * `options` - Per-source timeout
///
/// # Returns
///
/// The assembled [`Snapshot`] and a [`LoadReport`] with one outcome per
/// source in catalog order.
///
/// # Errors
///
/// Returns an [`OrchestrationError`] if the catalog is empty or repeats a
/// key, or if a load task panicked. No snapshot is produced in that case.
#[instrument(level = "info", skip_all, fields(sources = sources.len()))]
pub async fn load_all<F: ResourceFetcher>(
    fetcher: Arc<F>,
    sources: &[SourceDescriptor],
    options: &LoadOptions,
) -> Result<Loaded, OrchestrationError> {
    validate_catalog(sources)?;
    let start = Instant::now();

    let tasks = sources.iter().cloned().map(|descriptor| {
        let fetcher = Arc::clone(&fetcher);
        let timeout = options.timeout;
        tokio::spawn(async move { load_source(&*fetcher, &descriptor, timeout).await })
    });
    let joined = join_all(tasks).await;

    let mut snapshot = Snapshot::new();
    let mut outcomes = Vec::with_capacity(sources.len());
    for (expected, joined) in sources.iter().zip(joined) {
        let result = match joined {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(LoadError::Cancelled),
            Err(e) => {
                error!(key = %expected.key, error = %e, "Load task panicked");
                return Err(OrchestrationError::TaskPanicked {
                    key: expected.key,
                    message: e.to_string(),
                });
            }
        };

        let (dataset, result) = match result {
            Ok(dataset) => {
                let count = dataset.len();
                debug!(key = %expected.key, count, "Loaded source");
                (dataset, Ok(count))
            }
            Err(e) => {
                warn!(
                    key = %expected.key,
                    locator = %expected.locator,
                    error = %e,
                    "Source failed to load; using empty default"
                );
                (Dataset::empty(expected.cardinality), Err(e))
            }
        };
        snapshot.insert(expected.key, dataset);
        outcomes.push(SourceOutcome {
            key: expected.key,
            result,
        });
    }

    let report = LoadReport {
        outcomes,
        elapsed: start.elapsed(),
    };
    info!(
        loaded = report.succeeded().count(),
        failed = report.failed().count(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        "Load phase complete"
    );

    Ok(Loaded { snapshot, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldMapping;
    use crate::sources::{default_catalog, Cardinality};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    /// Serves canned text by locator; anything else is missing.
    struct MapFetcher(HashMap<String, String>);

    impl MapFetcher {
        fn new(entries: &[(&str, &str)]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            )
        }
    }

    impl ResourceFetcher for MapFetcher {
        async fn fetch(&self, locator: &str) -> Result<String, LoadError> {
            self.0
                .get(locator)
                .cloned()
                .ok_or_else(|| LoadError::NotFound(locator.to_string()))
        }
    }

    struct SlowFetcher;

    impl ResourceFetcher for SlowFetcher {
        async fn fetch(&self, _locator: &str) -> Result<String, LoadError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("a,b\n1,2\n".to_string())
        }
    }

    struct PanickingFetcher;

    impl ResourceFetcher for PanickingFetcher {
        async fn fetch(&self, locator: &str) -> Result<String, LoadError> {
            if locator == "honors.csv" {
                panic!("fetcher bug");
            }
            Ok(String::new())
        }
    }

    fn every_source() -> MapFetcher {
        MapFetcher::new(&[
            ("lab_info.csv", "name,motto\nEdge Lab,Ship it\n"),
            ("professor.csv", "name,photo\nDr. Kim,kim.jpg\n"),
            ("education.csv", "degree,school\nPhD,KAIST\nBS,SNU\n"),
            ("experience_academic.csv", "role,org\nProfessor,Univ\n"),
            ("experience_industry.csv", "role,org\nEngineer,Corp\n"),
            ("honors.csv", "year,title,date\n2020,Award,2020-01-01\n"),
            ("patents.csv", "year,title,region,number,date\n2023,Widget,KR,10-1,2023-06-01\n"),
            ("conferences_intl.csv", "year,title,date\n2022,Talk,2022-03-03\n"),
            ("conferences_domestic.csv", "year,title,date\n2021,Poster,2021-04-04\n"),
            ("projects.csv", "title,agency,date\nTwin,NRF,2019-05-05\n"),
            ("activities.csv", "filename,caption\na.jpg,Retreat\nb.jpg,Workshop\n"),
        ])
    }

    #[tokio::test]
    async fn test_load_all_sources() {
        let catalog = default_catalog();
        let loaded = load_all(Arc::new(every_source()), &catalog, &LoadOptions::default())
            .await
            .unwrap();

        assert_eq!(loaded.snapshot.len(), catalog.len());
        assert_eq!(loaded.report.failed().count(), 0);
        assert_eq!(
            loaded.snapshot.record(SourceKey::Professor).unwrap().get("name"),
            Some("Dr. Kim")
        );
        assert_eq!(loaded.snapshot.records(SourceKey::Education).len(), 2);
        assert_eq!(loaded.snapshot.records(SourceKey::ActivityPhotos).len(), 2);
    }

    #[tokio::test]
    async fn test_one_missing_source_is_isolated() {
        let mut fetcher = every_source();
        fetcher.0.remove("patents.csv");
        fetcher.0.remove("professor.csv");
        let catalog = default_catalog();

        let loaded = load_all(Arc::new(fetcher), &catalog, &LoadOptions::default())
            .await
            .unwrap();

        assert_eq!(
            loaded.snapshot.get(SourceKey::Patents),
            Some(&Dataset::Many(vec![]))
        );
        assert_eq!(
            loaded.snapshot.get(SourceKey::Professor),
            Some(&Dataset::Single(FieldMapping::new()))
        );
        assert_eq!(loaded.snapshot.records(SourceKey::Honors).len(), 1);
        assert_eq!(loaded.snapshot.len(), catalog.len());

        assert_eq!(
            loaded.report.failed_keys(),
            vec![SourceKey::Professor, SourceKey::Patents]
        );
    }

    #[tokio::test]
    async fn test_failed_keys_empty_when_all_load() {
        let loaded = load_all(Arc::new(every_source()), &default_catalog(), &LoadOptions::default())
            .await
            .unwrap();

        assert!(loaded.report.failed_keys().is_empty());
        assert_eq!(loaded.report.succeeded().count(), default_catalog().len());
    }

    #[tokio::test]
    async fn test_single_source_keeps_first_record() {
        let fetcher = MapFetcher::new(&[("lab.csv", "name\nFirst\nSecond\n")]);
        let descriptor = SourceDescriptor::new(SourceKey::LabInfo, "lab.csv", Cardinality::Single);

        let dataset = load_source(&fetcher, &descriptor, None).await.unwrap();
        assert_eq!(dataset.as_single().unwrap().get("name"), Some("First"));
    }

    #[tokio::test]
    async fn test_single_source_without_rows_is_empty_mapping() {
        let fetcher = MapFetcher::new(&[("lab.csv", "name,motto\n")]);
        let descriptor = SourceDescriptor::new(SourceKey::LabInfo, "lab.csv", Cardinality::Single);

        let dataset = load_source(&fetcher, &descriptor, None).await.unwrap();
        assert_eq!(dataset, Dataset::Single(FieldMapping::new()));
    }

    #[tokio::test]
    async fn test_load_source_reports_error() {
        let fetcher = MapFetcher::new(&[]);
        let descriptor = SourceDescriptor::new(SourceKey::Honors, "honors.csv", Cardinality::Many);

        let result = load_source(&fetcher, &descriptor, None).await;
        assert!(matches!(result, Err(LoadError::NotFound(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_a_per_source_failure() {
        let catalog = vec![SourceDescriptor::new(
            SourceKey::Honors,
            "honors.csv",
            Cardinality::Many,
        )];
        let options = LoadOptions {
            timeout: Some(Duration::from_millis(50)),
        };

        let loaded = load_all(Arc::new(SlowFetcher), &catalog, &options).await.unwrap();
        assert_eq!(loaded.snapshot.get(SourceKey::Honors), Some(&Dataset::Many(vec![])));
        let outcome = &loaded.report.outcomes[0];
        assert!(matches!(outcome.result, Err(LoadError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_empty_catalog_is_orchestration_error() {
        let result = load_all(Arc::new(every_source()), &[], &LoadOptions::default()).await;
        assert!(matches!(result, Err(OrchestrationError::EmptyCatalog)));
    }

    #[tokio::test]
    async fn test_duplicate_key_is_orchestration_error() {
        let catalog = vec![
            SourceDescriptor::new(SourceKey::Honors, "honors.csv", Cardinality::Many),
            SourceDescriptor::new(SourceKey::Honors, "honors2.csv", Cardinality::Many),
        ];
        let result = load_all(Arc::new(every_source()), &catalog, &LoadOptions::default()).await;
        assert!(matches!(
            result,
            Err(OrchestrationError::DuplicateSource(SourceKey::Honors))
        ));
    }

    #[tokio::test]
    async fn test_panicking_task_fails_the_load() {
        let catalog = default_catalog();
        let result = load_all(Arc::new(PanickingFetcher), &catalog, &LoadOptions::default()).await;
        assert!(matches!(
            result,
            Err(OrchestrationError::TaskPanicked { key: SourceKey::Honors, .. })
        ));
    }
}
