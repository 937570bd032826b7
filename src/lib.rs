//! # Lab Site Data
//!
//! The data-ingestion pipeline behind a research lab's informational site.
//! Biography, timeline, honors, patents, conference, project and photo data
//! live in small comma-separated files; this crate loads them all at once,
//! enriches them, and produces a ranked "latest updates" feed.
//!
//! ## Pipeline
//!
//! 1. **Catalog**: [`sources::default_catalog`] names every source and its shape
//! 2. **Loading**: [`loader::load_all`] fetches every source concurrently and
//!    parses each with [`parser::parse`]; one failing source falls back to an
//!    empty dataset without affecting the others
//! 3. **Post-processing**: [`postprocess::derive`] fills in image paths
//! 4. **Aggregation**: [`news::latest`] merges the dated sources into one feed
//!
//! The resulting [`models::Snapshot`] and feed are everything a presentation
//! layer needs. [`models::LoadState`] and [`navigation::NavState`] model the
//! loading indicator and page selection on that side.

pub mod cli;
pub mod config;
pub mod loader;
pub mod models;
pub mod navigation;
pub mod news;
pub mod outputs;
pub mod parser;
pub mod postprocess;
pub mod sources;
pub mod utils;

pub use loader::{load_all, LoadError, LoadOptions, Loaded, OrchestrationError};
pub use models::{Dataset, FieldMapping, LoadState, Snapshot};
pub use news::{latest, NewsItem, DEFAULT_LIMIT};
pub use parser::parse;
pub use postprocess::{derive, PhotoPaths};
pub use sources::{default_catalog, Cardinality, SourceDescriptor, SourceKey};
