use serde::Serialize;
use std::fmt;

/// Logical name of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKey {
    LabInfo,
    Professor,
    Education,
    ExperienceAcademic,
    ExperienceIndustry,
    Honors,
    Patents,
    ConferencesIntl,
    ConferencesDomestic,
    Projects,
    ActivityPhotos,
}

impl SourceKey {
    pub const ALL: [SourceKey; 11] = [
        SourceKey::LabInfo,
        SourceKey::Professor,
        SourceKey::Education,
        SourceKey::ExperienceAcademic,
        SourceKey::ExperienceIndustry,
        SourceKey::Honors,
        SourceKey::Patents,
        SourceKey::ConferencesIntl,
        SourceKey::ConferencesDomestic,
        SourceKey::Projects,
        SourceKey::ActivityPhotos,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SourceKey::LabInfo => "lab_info",
            SourceKey::Professor => "professor",
            SourceKey::Education => "education",
            SourceKey::ExperienceAcademic => "experience_academic",
            SourceKey::ExperienceIndustry => "experience_industry",
            SourceKey::Honors => "honors",
            SourceKey::Patents => "patents",
            SourceKey::ConferencesIntl => "conferences_intl",
            SourceKey::ConferencesDomestic => "conferences_domestic",
            SourceKey::Projects => "projects",
            SourceKey::ActivityPhotos => "activity_photos",
        }
    }

    /// Conventional resource name under the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            SourceKey::ActivityPhotos => "activities.csv",
            SourceKey::LabInfo => "lab_info.csv",
            SourceKey::Professor => "professor.csv",
            SourceKey::Education => "education.csv",
            SourceKey::ExperienceAcademic => "experience_academic.csv",
            SourceKey::ExperienceIndustry => "experience_industry.csv",
            SourceKey::Honors => "honors.csv",
            SourceKey::Patents => "patents.csv",
            SourceKey::ConferencesIntl => "conferences_intl.csv",
            SourceKey::ConferencesDomestic => "conferences_domestic.csv",
            SourceKey::Projects => "projects.csv",
        }
    }

    pub fn cardinality(self) -> Cardinality {
        match self {
            SourceKey::LabInfo | SourceKey::Professor => Cardinality::Single,
            _ => Cardinality::Many,
        }
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a source yields one record or an ordered list of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    Single,
    Many,
}

/// Static configuration for one dataset: its name, location and shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub key: SourceKey,
    /// Resource path relative to the fetcher's root.
    pub locator: String,
    pub cardinality: Cardinality,
}

impl SourceDescriptor {
    pub fn new(key: SourceKey, locator: impl Into<String>, cardinality: Cardinality) -> Self {
        Self {
            key,
            locator: locator.into(),
            cardinality,
        }
    }
}

/// The fixed catalog of every source the site reads.
pub fn default_catalog() -> Vec<SourceDescriptor> {
    SourceKey::ALL
        .iter()
        .map(|&key| SourceDescriptor::new(key, key.file_name(), key.cardinality()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_covers_every_key_once() {
        let catalog = default_catalog();
        let keys: HashSet<_> = catalog.iter().map(|d| d.key).collect();
        assert_eq!(catalog.len(), SourceKey::ALL.len());
        assert_eq!(keys.len(), catalog.len());
    }

    #[test]
    fn test_singletons() {
        let singles: Vec<_> = default_catalog()
            .into_iter()
            .filter(|d| d.cardinality == Cardinality::Single)
            .map(|d| d.key)
            .collect();
        assert_eq!(singles, vec![SourceKey::LabInfo, SourceKey::Professor]);
    }

    #[test]
    fn test_display_matches_serialized_name() {
        for key in SourceKey::ALL {
            let json = serde_json::to_string(&key).unwrap();
            assert_eq!(json, format!("\"{}\"", key));
        }
    }

    #[test]
    fn test_activity_locator() {
        assert_eq!(SourceKey::ActivityPhotos.file_name(), "activities.csv");
    }
}
