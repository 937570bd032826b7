//! The "latest updates" feed.
//!
//! Five dated sources are merged into one list, ranked newest first and cut
//! to a limit. Each item keeps every original field and is tagged with the
//! type label and category tag of the source it came from.
//!
//! # Ordering
//!
//! 1. Items with an empty `date` are dropped.
//! 2. Dates that parse (`YYYY-MM-DD`, or an RFC 3339 timestamp's date) sort
//!    newest first.
//! 3. Dates that do not parse sort after every parsed date.
//! 4. Ties keep concatenation order: honors, patents, international
//!    conferences, domestic conferences, projects, each in file order.

use crate::models::{columns, FieldMapping, Snapshot};
use crate::sources::SourceKey;
use chrono::{DateTime, NaiveDate};
use itertools::Itertools;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;

/// Feed length when the caller does not choose one.
pub const DEFAULT_LIMIT: usize = 6;

/// A source that feeds the news list, with its display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewsSource {
    pub key: SourceKey,
    pub label: &'static str,
    pub category: &'static str,
}

/// News-feeding sources in tie-break order.
pub const NEWS_SOURCES: [NewsSource; 5] = [
    NewsSource {
        key: SourceKey::Honors,
        label: "Honor",
        category: "honor",
    },
    NewsSource {
        key: SourceKey::Patents,
        label: "Patent",
        category: "patent",
    },
    NewsSource {
        key: SourceKey::ConferencesIntl,
        label: "Intl Conference",
        category: "conf_intl",
    },
    NewsSource {
        key: SourceKey::ConferencesDomestic,
        label: "Domestic Conference",
        category: "conf_dom",
    },
    NewsSource {
        key: SourceKey::Projects,
        label: "Project",
        category: "project",
    },
];

/// One entry in the ranked feed.
///
/// Serializes as `type`, `category`, `date`, `title`, then every other
/// original field in header order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsItem {
    pub kind: &'static str,
    pub category: &'static str,
    pub date: String,
    pub title: String,
    pub fields: FieldMapping,
}

impl NewsItem {
    fn new(source: &NewsSource, record: &FieldMapping) -> Self {
        Self {
            kind: source.label,
            category: source.category,
            date: record.get_or_empty(columns::DATE).to_string(),
            title: record.get_or_empty(columns::TITLE).to_string(),
            fields: record.clone(),
        }
    }

    /// The item's date, if it parses.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

impl Serialize for NewsItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.kind)?;
        map.serialize_entry("category", self.category)?;
        map.serialize_entry(columns::DATE, &self.date)?;
        map.serialize_entry(columns::TITLE, &self.title)?;
        for (k, v) in self.fields.iter() {
            if !matches!(k, "type" | "category" | columns::DATE | columns::TITLE) {
                map.serialize_entry(k, v)?;
            }
        }
        map.end()
    }
}

/// Parse a calendar date: `YYYY-MM-DD`, or the date part of an RFC 3339
/// timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Newest first; unparsable after every parsed date; equal otherwise.
fn newest_first(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// The `limit` most recent dated items across all news-feeding sources.
///
/// # Arguments
///
/// * `snapshot` - Loaded snapshot; missing or failed sources contribute nothing
/// * `limit` - Maximum number of items to return
///
/// # Returns
///
/// At most `limit` items, ranked as described in the module docs.
pub fn latest(snapshot: &Snapshot, limit: usize) -> Vec<NewsItem> {
    NEWS_SOURCES
        .iter()
        .flat_map(|source| {
            snapshot
                .records(source.key)
                .iter()
                .map(move |record| NewsItem::new(source, record))
        })
        .filter(|item| !item.date.trim().is_empty())
        .map(|item| (item.parsed_date(), item))
        // sorted_by is a stable sort, which keeps the tie-break order
        .sorted_by(|(a, _), (b, _)| newest_first(*a, *b))
        .take(limit)
        .map(|(_, item)| item)
        .collect()
}
