//! Data models for parsed records and the assembled site dataset.
//!
//! This module defines the core data structures used throughout the crate:
//! - [`FieldMapping`]: One parsed data row, ordered header name → raw string
//! - [`Dataset`]: A single record or an ordered list of records, per source
//! - [`Snapshot`]: Every configured source's dataset, keyed by [`SourceKey`]
//! - [`LoadState`]: What the presentation layer should show for a load phase
//! - Typed views: [`ProfessorProfile`], [`ActivityPhoto`], [`DatedEntry`]
//!
//! All parsed values stay strings. The typed views only check that the
//! columns they read are present; they never coerce dates or years.

use crate::loader::OrchestrationError;
use crate::sources::{Cardinality, SourceKey};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use thiserror::Error;

/// Column names read or written by the post-processor and the typed views.
pub mod columns {
    /// Bare image filename on the professor record.
    pub const PROFESSOR_PHOTO: &str = "photo";
    /// Derived display path for the professor image.
    pub const PROFESSOR_PHOTO_URL: &str = "photo_url";
    /// Bare image filename on each activity-photo record.
    pub const ACTIVITY_FILENAME: &str = "filename";
    /// Derived display URL for each activity photo.
    pub const ACTIVITY_URL: &str = "url";
    pub const NAME: &str = "name";
    pub const CAPTION: &str = "caption";
    pub const TITLE: &str = "title";
    pub const DATE: &str = "date";
}

/// An ordered set of named string fields produced from one data row.
///
/// Keys follow header order. Inserting an existing key replaces its value
/// in place, so the key keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    fields: Vec<(String, String)>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a field by header name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a field, treating an absent key as an empty value.
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    /// Set `key` to `value`, replacing any existing value without moving the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = FieldMapping::new();
        for (k, v) in iter {
            mapping.insert(k, v);
        }
        mapping
    }
}

impl Serialize for FieldMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// The parsed contents of one source, shaped by its [`Cardinality`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Dataset {
    Single(FieldMapping),
    Many(Vec<FieldMapping>),
}

impl Dataset {
    /// The fallback used when a source cannot be loaded.
    pub fn empty(cardinality: Cardinality) -> Self {
        match cardinality {
            Cardinality::Single => Dataset::Single(FieldMapping::new()),
            Cardinality::Many => Dataset::Many(Vec::new()),
        }
    }

    /// Shape parsed records for a source: first record only for singletons.
    pub fn from_records(cardinality: Cardinality, records: Vec<FieldMapping>) -> Self {
        match cardinality {
            Cardinality::Single => {
                Dataset::Single(records.into_iter().next().unwrap_or_default())
            }
            Cardinality::Many => Dataset::Many(records),
        }
    }

    pub fn as_single(&self) -> Option<&FieldMapping> {
        match self {
            Dataset::Single(record) => Some(record),
            Dataset::Many(_) => None,
        }
    }

    pub fn as_many(&self) -> Option<&[FieldMapping]> {
        match self {
            Dataset::Single(_) => None,
            Dataset::Many(records) => Some(records),
        }
    }

    /// Number of records held; an empty singleton counts as zero.
    pub fn len(&self) -> usize {
        match self {
            Dataset::Single(record) if record.is_empty() => 0,
            Dataset::Single(_) => 1,
            Dataset::Many(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Every configured source's dataset, keyed by logical source name.
///
/// Built once by the loader, enriched once by the post-processor, then
/// only read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    datasets: BTreeMap<SourceKey, Dataset>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: SourceKey, dataset: Dataset) {
        self.datasets.insert(key, dataset);
    }

    pub fn get(&self, key: SourceKey) -> Option<&Dataset> {
        self.datasets.get(&key)
    }

    pub fn get_mut(&mut self, key: SourceKey) -> Option<&mut Dataset> {
        self.datasets.get_mut(&key)
    }

    /// The records of a many-cardinality source, or an empty slice.
    pub fn records(&self, key: SourceKey) -> &[FieldMapping] {
        self.get(key).and_then(Dataset::as_many).unwrap_or(&[])
    }

    /// The record of a single-cardinality source, if one was loaded.
    pub fn record(&self, key: SourceKey) -> Option<&FieldMapping> {
        self.get(key).and_then(Dataset::as_single)
    }

    pub fn keys(&self) -> impl Iterator<Item = SourceKey> + '_ {
        self.datasets.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Typed view of the professor record.
    pub fn professor(&self) -> Result<ProfessorProfile, SchemaError> {
        let record = self
            .record(SourceKey::Professor)
            .ok_or(SchemaError::MissingDataset(SourceKey::Professor))?;
        ProfessorProfile::try_from(record)
    }

    /// Typed views of every activity photo, in source order.
    pub fn activity_photos(&self) -> Result<Vec<ActivityPhoto>, SchemaError> {
        self.records(SourceKey::ActivityPhotos)
            .iter()
            .map(ActivityPhoto::try_from)
            .collect()
    }
}

/// A record did not carry a column its typed view needs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("missing column `{0}`")]
    MissingColumn(&'static str),
    #[error("no single-record dataset for source `{0}`")]
    MissingDataset(SourceKey),
}

fn required(record: &FieldMapping, column: &'static str) -> Result<String, SchemaError> {
    record
        .get(column)
        .map(str::to_string)
        .ok_or(SchemaError::MissingColumn(column))
}

/// The professor record after post-processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfessorProfile {
    pub name: String,
    /// Bare filename; empty when the source had none.
    pub photo: String,
    /// Display path; the placeholder when no photo was given.
    pub photo_url: String,
}

impl TryFrom<&FieldMapping> for ProfessorProfile {
    type Error = SchemaError;

    fn try_from(record: &FieldMapping) -> Result<Self, Self::Error> {
        Ok(Self {
            name: required(record, columns::NAME)?,
            photo: record.get_or_empty(columns::PROFESSOR_PHOTO).to_string(),
            photo_url: required(record, columns::PROFESSOR_PHOTO_URL)?,
        })
    }
}

/// One activity photo after post-processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityPhoto {
    pub filename: String,
    pub caption: String,
    pub url: String,
}

impl TryFrom<&FieldMapping> for ActivityPhoto {
    type Error = SchemaError;

    fn try_from(record: &FieldMapping) -> Result<Self, Self::Error> {
        Ok(Self {
            filename: required(record, columns::ACTIVITY_FILENAME)?,
            caption: record.get_or_empty(columns::CAPTION).to_string(),
            url: required(record, columns::ACTIVITY_URL)?,
        })
    }
}

/// The title/date pair every news-feeding source carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatedEntry {
    pub title: String,
    pub date: String,
}

impl TryFrom<&FieldMapping> for DatedEntry {
    type Error = SchemaError;

    fn try_from(record: &FieldMapping) -> Result<Self, Self::Error> {
        Ok(Self {
            title: required(record, columns::TITLE)?,
            date: required(record, columns::DATE)?,
        })
    }
}

/// The load phase as seen by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Fetches are still in flight; show a loading indicator.
    Loading,
    /// Every source has settled; render with whatever each one supplied.
    Ready(Snapshot),
    /// The load phase itself failed; show a single generic message.
    Failed(String),
}

impl LoadState {
    pub const GENERIC_ERROR: &'static str = "Failed to load site data.";

    pub fn from_load(result: Result<Snapshot, OrchestrationError>) -> Self {
        match result {
            Ok(snapshot) => LoadState::Ready(snapshot),
            Err(_) => LoadState::Failed(Self::GENERIC_ERROR.to_string()),
        }
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            LoadState::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mapping(pairs: &[(&str, &str)]) -> FieldMapping {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut record = mapping(&[("year", "2020"), ("title", "A")]);
        record.insert("year", "2021");
        record.insert("date", "2021-01-01");

        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["year", "title", "date"]);
        assert_eq!(record.get("year"), Some("2021"));
        assert_eq!(record.get_or_empty("missing"), "");
    }

    #[test]
    fn test_field_mapping_serializes_in_header_order() {
        let record = mapping(&[("z", "1"), ("a", "2")]);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"z":"1","a":"2"}"#);
    }

    #[test]
    fn test_dataset_empty_defaults() {
        assert_eq!(
            Dataset::empty(Cardinality::Single),
            Dataset::Single(FieldMapping::new())
        );
        assert_eq!(Dataset::empty(Cardinality::Many), Dataset::Many(vec![]));
        assert!(Dataset::empty(Cardinality::Single).is_empty());
    }

    #[test]
    fn test_dataset_from_records_takes_first_for_single() {
        let records = vec![mapping(&[("name", "first")]), mapping(&[("name", "second")])];
        let single = Dataset::from_records(Cardinality::Single, records.clone());
        assert_eq!(single.as_single().unwrap().get("name"), Some("first"));

        let many = Dataset::from_records(Cardinality::Many, records);
        assert_eq!(many.len(), 2);
    }

    #[test]
    fn test_snapshot_serialization_uses_source_names() {
        let mut snapshot = Snapshot::new();
        snapshot.insert(SourceKey::Honors, Dataset::Many(vec![mapping(&[("title", "Award")])]));
        snapshot.insert(SourceKey::LabInfo, Dataset::empty(Cardinality::Single));

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["honors"][0]["title"], "Award");
        assert_eq!(json["lab_info"], serde_json::json!({}));
    }

    #[test]
    fn test_snapshot_records_of_missing_source_is_empty() {
        let snapshot = Snapshot::new();
        assert!(snapshot.records(SourceKey::Patents).is_empty());
        assert!(snapshot.record(SourceKey::Professor).is_none());
    }

    #[test]
    fn test_professor_view_requires_name() {
        let mut snapshot = Snapshot::new();
        snapshot.insert(
            SourceKey::Professor,
            Dataset::Single(mapping(&[("photo_url", "/img/none.png")])),
        );
        assert_eq!(
            snapshot.professor(),
            Err(SchemaError::MissingColumn(columns::NAME))
        );
    }

    #[test]
    fn test_activity_photo_view() {
        let mut snapshot = Snapshot::new();
        snapshot.insert(
            SourceKey::ActivityPhotos,
            Dataset::Many(vec![mapping(&[
                ("filename", "a.jpg"),
                ("caption", "Retreat"),
                ("url", "/photos/a.jpg"),
            ])]),
        );
        let photos = snapshot.activity_photos().unwrap();
        assert_eq!(
            photos,
            vec![ActivityPhoto {
                filename: "a.jpg".into(),
                caption: "Retreat".into(),
                url: "/photos/a.jpg".into(),
            }]
        );
    }

    #[test]
    fn test_dated_entry_view() {
        let record = mapping(&[("year", "2020"), ("title", "Best Paper"), ("date", "2020-05-01")]);
        let entry = DatedEntry::try_from(&record).unwrap();
        assert_eq!(entry.title, "Best Paper");
        assert_eq!(entry.date, "2020-05-01");
    }

    #[test]
    fn test_load_state_hides_orchestration_detail() {
        let state = LoadState::from_load(Err(OrchestrationError::EmptyCatalog));
        assert_eq!(state, LoadState::Failed(LoadState::GENERIC_ERROR.to_string()));
        assert!(state.snapshot().is_none());
    }
}
