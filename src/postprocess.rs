//! Derived image fields on a freshly loaded [`Snapshot`].
//!
//! Image-bearing records store a bare filename. This step joins each one
//! against its photo directory and stores the result next to the original
//! field:
//!
//! - `professor.photo` → `professor.photo_url` (placeholder when blank)
//! - `activity_photos[*].filename` → `activity_photos[*].url`
//!
//! Derived values are always computed from the stored filename, never from a
//! previous derived value, so running this twice gives the same result.

use crate::models::{columns, Dataset, FieldMapping, Snapshot};
use crate::sources::SourceKey;
use crate::utils::join_path;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Where derived image paths point.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhotoPaths {
    pub professor_dir: String,
    pub activity_dir: String,
    /// Used when the professor record names no photo.
    pub placeholder: String,
}

impl Default for PhotoPaths {
    fn default() -> Self {
        Self {
            professor_dir: "/images/professor".to_string(),
            activity_dir: "/images/activities".to_string(),
            placeholder: "/images/placeholder.png".to_string(),
        }
    }
}

/// Fill in derived image fields in place.
///
/// # Arguments
///
/// * `snapshot` - Snapshot to update; a missing professor entry is created
/// * `paths` - Directories and placeholder the derived paths point at
///
/// # Returns
///
/// Nothing. `professor.photo_url` and every `activity_photos[*].url` are
/// written into `snapshot`.
#[instrument(level = "debug", skip_all)]
pub fn derive(snapshot: &mut Snapshot, paths: &PhotoPaths) {
    if !matches!(snapshot.get(SourceKey::Professor), Some(Dataset::Single(_))) {
        snapshot.insert(SourceKey::Professor, Dataset::Single(FieldMapping::new()));
    }
    if let Some(Dataset::Single(professor)) = snapshot.get_mut(SourceKey::Professor) {
        let photo_url = professor_photo_url(professor, paths);
        professor.insert(columns::PROFESSOR_PHOTO_URL, photo_url);
    }

    if let Some(Dataset::Many(photos)) = snapshot.get_mut(SourceKey::ActivityPhotos) {
        for photo in photos.iter_mut() {
            let url = join_path(
                &paths.activity_dir,
                photo.get_or_empty(columns::ACTIVITY_FILENAME),
            );
            photo.insert(columns::ACTIVITY_URL, url);
        }
        debug!(count = photos.len(), "Derived activity photo URLs");
    }
}

fn professor_photo_url(record: &FieldMapping, paths: &PhotoPaths) -> String {
    match record.get(columns::PROFESSOR_PHOTO).map(str::trim) {
        Some(photo) if !photo.is_empty() => join_path(&paths.professor_dir, photo),
        _ => paths.placeholder.clone(),
    }
}
