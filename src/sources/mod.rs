//! Data sources: the static catalog and the fetchers that read it.
//!
//! Every dataset the site shows comes from one delimited-text resource under
//! a fixed data directory. Loading happens in two parts:
//!
//! 1. **Catalog**: [`default_catalog`] names each source, where it lives and
//!    whether it holds one record or many
//! 2. **Fetching**: a [`ResourceFetcher`] turns a locator into raw text
//!
//! # Sources
//!
//! | Key | Locator | Cardinality |
//! |-----|---------|-------------|
//! | `lab_info` | `lab_info.csv` | single |
//! | `professor` | `professor.csv` | single |
//! | `education` | `education.csv` | many |
//! | `experience_academic` | `experience_academic.csv` | many |
//! | `experience_industry` | `experience_industry.csv` | many |
//! | `honors` | `honors.csv` | many |
//! | `patents` | `patents.csv` | many |
//! | `conferences_intl` | `conferences_intl.csv` | many |
//! | `conferences_domestic` | `conferences_domestic.csv` | many |
//! | `projects` | `projects.csv` | many |
//! | `activity_photos` | `activities.csv` | many |
//!
//! # Fetchers
//!
//! - [`FsFetcher`]: reads from a local data directory with `tokio::fs`
//! - [`HttpFetcher`]: GETs relative to a base URL with `reqwest`
//! - [`Fetcher`]: picks one of the two at runtime

mod catalog;
mod fetch;

pub use catalog::{default_catalog, Cardinality, SourceDescriptor, SourceKey};
pub use fetch::{Fetcher, FsFetcher, HttpFetcher, ResourceFetcher};
