//! Location and subject catalog
//!
//! Loaded once from two JSON documents:
//! - `countries.json`: `{ "<tz key>": { "position": [lon, lat], "color": "RED" } }`
//! - `people.json`: `[{ "name": "Ada", "tz": "<tz key>" }]`
//!
//! Subjects pointing at an unknown location are dropped with a warning.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo;

/// Region prefixes stripped from location keys for display
const REGION_PREFIXES: [&str; 4] = ["Europe/", "Asia/", "Africa/", "America/"];

/// Directory holding subject portraits
pub const IMAGE_DIR: &str = "public/people";

pub const LOCATIONS_FILE: &str = "countries.json";
pub const SUBJECTS_FILE: &str = "people.json";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("location {key:?} has {len} coordinates, expected [lon, lat] or [lon, lat, height]")]
    BadPosition { key: String, len: usize },
}

/// A fixed point on the globe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Catalog key (timezone-like, e.g. `Europe/Paris`)
    pub key: String,
    pub display_name: String,
    pub position: DVec3,
    pub color_tag: String,
}

impl Location {
    pub fn new(key: impl Into<String>, position: DVec3, color_tag: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            display_name: display_name(&key),
            key,
            position,
            color_tag: color_tag.into(),
        }
    }
}

/// The person the player has to find
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    /// Key of the home [`Location`]
    pub location_key: String,
    pub image_ref: String,
}

impl Subject {
    pub fn new(name: impl Into<String>, location_key: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            image_ref: format!("{IMAGE_DIR}/{name}.jpg"),
            name,
            location_key: location_key.into(),
        }
    }
}

/// Strip the region prefix from a location key
pub fn display_name(key: &str) -> String {
    REGION_PREFIXES
        .iter()
        .fold(key.to_string(), |name, prefix| name.replace(prefix, ""))
}

#[derive(Debug, Deserialize)]
struct RawLocation {
    position: Vec<f64>,
    #[serde(default)]
    color: String,
}

#[derive(Debug, Deserialize)]
struct RawSubject {
    name: String,
    tz: String,
}

/// Read-only catalog of locations and playable subjects
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    locations: BTreeMap<String, Location>,
    subjects: Vec<Subject>,
}

impl Catalog {
    /// Build a catalog, dropping subjects whose location is unknown
    pub fn new(locations: impl IntoIterator<Item = Location>, subjects: Vec<Subject>) -> Self {
        let locations: BTreeMap<String, Location> = locations
            .into_iter()
            .map(|loc| (loc.key.clone(), loc))
            .collect();

        let subjects = subjects
            .into_iter()
            .filter(|subject| {
                let known = locations.contains_key(&subject.location_key);
                if !known {
                    log::warn!(
                        "Location not found: {} (skipping {})",
                        subject.location_key,
                        subject.name
                    );
                }
                known
            })
            .collect();

        Self {
            locations,
            subjects,
        }
    }

    /// Parse the two catalog documents
    pub fn from_json(locations_json: &str, subjects_json: &str) -> Result<Self, CatalogError> {
        let raw_locations: BTreeMap<String, RawLocation> = serde_json::from_str(locations_json)?;
        let raw_subjects: Vec<RawSubject> = serde_json::from_str(subjects_json)?;

        let mut locations = Vec::with_capacity(raw_locations.len());
        for (key, raw) in raw_locations {
            let position = match raw.position.as_slice() {
                &[lon, lat] => geo::from_degrees(lon, lat, 0.0),
                &[lon, lat, height] => geo::from_degrees(lon, lat, height),
                other => {
                    return Err(CatalogError::BadPosition {
                        key,
                        len: other.len(),
                    });
                }
            };
            locations.push(Location::new(key, position, raw.color));
        }

        let subjects = raw_subjects
            .into_iter()
            .map(|raw| Subject::new(raw.name, raw.tz))
            .collect();

        let catalog = Self::new(locations, subjects);
        log::info!(
            "Catalog loaded: {} locations, {} playable subjects",
            catalog.locations.len(),
            catalog.subjects.len()
        );
        Ok(catalog)
    }

    /// Load `countries.json` and `people.json` from a directory
    pub fn load(dir: &Path) -> Result<Self, CatalogError> {
        let read = |name: &str| {
            let path = dir.join(name);
            fs::read_to_string(&path).map_err(|source| CatalogError::Io { path, source })
        };
        Self::from_json(&read(LOCATIONS_FILE)?, &read(SUBJECTS_FILE)?)
    }

    pub fn location(&self, key: &str) -> Option<&Location> {
        self.locations.get(key)
    }

    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    /// Playable subjects, in file order
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn subject(&self, index: usize) -> Option<&Subject> {
        self.subjects.get(index)
    }

    /// Home location of a subject
    pub fn home_of(&self, subject: &Subject) -> Option<&Location> {
        self.locations.get(&subject.location_key)
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTRIES: &str = r#"{
        "Europe/Paris": { "position": [2.35, 48.85], "color": "RED" },
        "America/New_York": { "position": [-74.0, 40.7, 10.0], "color": "BLUE" },
        "UTC": { "position": [0.0, 0.0] }
    }"#;

    const PEOPLE: &str = r#"[
        { "name": "Ada", "tz": "Europe/Paris" },
        { "name": "Grace", "tz": "America/New_York" },
        { "name": "Ghost", "tz": "Pacific/Nowhere" }
    ]"#;

    #[test]
    fn test_display_name_strips_region() {
        assert_eq!(display_name("Europe/Paris"), "Paris");
        assert_eq!(display_name("America/New_York"), "New_York");
        assert_eq!(display_name("Australia/Sydney"), "Australia/Sydney");
        assert_eq!(display_name("UTC"), "UTC");
    }

    #[test]
    fn test_from_json_skips_missing_locations() {
        let catalog = Catalog::from_json(COUNTRIES, PEOPLE).unwrap();
        assert_eq!(catalog.locations().count(), 3);
        let names: Vec<_> = catalog.subjects().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Ada", "Grace"]);
    }

    #[test]
    fn test_from_json_builds_locations() {
        let catalog = Catalog::from_json(COUNTRIES, PEOPLE).unwrap();
        let paris = catalog.location("Europe/Paris").unwrap();
        assert_eq!(paris.display_name, "Paris");
        assert_eq!(paris.color_tag, "RED");
        assert_eq!(paris.position, geo::from_degrees(2.35, 48.85, 0.0));

        let utc = catalog.location("UTC").unwrap();
        assert_eq!(utc.color_tag, "");
    }

    #[test]
    fn test_subject_image_ref() {
        let subject = Subject::new("Ada Lovelace", "Europe/London");
        assert_eq!(subject.image_ref, "public/people/Ada Lovelace.jpg");
    }

    #[test]
    fn test_home_of() {
        let catalog = Catalog::from_json(COUNTRIES, PEOPLE).unwrap();
        let grace = catalog.subject(1).unwrap();
        let home = catalog.home_of(grace).unwrap();
        assert_eq!(home.key, "America/New_York");
    }

    #[test]
    fn test_bad_position_is_rejected() {
        let bad = r#"{ "Nowhere": { "position": [1.0], "color": "RED" } }"#;
        let err = Catalog::from_json(bad, "[]").unwrap_err();
        assert!(matches!(err, CatalogError::BadPosition { len: 1, .. }));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let err = Catalog::from_json("{", "[]").unwrap_err();
        assert!(matches!(err, CatalogError::Json(_)));
    }

    #[test]
    fn test_load_missing_dir_reports_path() {
        let err = Catalog::load(Path::new("/definitely/not/here")).unwrap_err();
        match err {
            CatalogError::Io { path, .. } => assert!(path.ends_with(LOCATIONS_FILE)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::from_json("{}", "[]").unwrap();
        assert!(catalog.is_empty());
    }
}
