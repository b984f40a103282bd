//! Predefined named positions
//!
//! Users keep small files of frequently used spots ("home", "trailhead
//! parking") and load them for one-click manual placement. Entries with
//! missing fields or out-of-range coordinates are skipped with a warning,
//! so one bad line never rejects the rest of the file.

use crate::coord::validate_coordinates;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// One predefined position, tagged with the file it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedPosition {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
    pub source_file: String,
}

#[derive(Debug, Deserialize)]
struct PositionDocument {
    #[serde(default)]
    position: Vec<PositionEntry>,
}

#[derive(Debug, Deserialize)]
struct PositionEntry {
    name: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    altitude: Option<f64>,
}

/// In-memory store of all loaded positions, in load order
#[derive(Debug, Default)]
pub struct PositionStore {
    positions: Vec<NamedPosition>,
}

impl PositionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load positions from a TOML document of `[[position]]` entries.
    /// Returns the number of positions accepted.
    pub fn load_toml(&mut self, content: &str, source_file: &str) -> Result<usize> {
        let document: PositionDocument = toml::from_str(content)
            .map_err(|e| Error::Config(format!("invalid positions file {source_file}: {e}")))?;

        let mut accepted = 0;
        for entry in document.position {
            let (Some(name), Some(latitude), Some(longitude)) =
                (entry.name, entry.latitude, entry.longitude)
            else {
                warn!("Skipping incomplete position entry in {}", source_file);
                continue;
            };
            if validate_coordinates(latitude, longitude).is_err() {
                warn!(
                    "Skipping position {:?} in {}: coordinates out of range",
                    name, source_file
                );
                continue;
            }
            self.positions.push(NamedPosition {
                name,
                latitude,
                longitude,
                altitude: entry.altitude,
                source_file: source_file.to_string(),
            });
            accepted += 1;
        }

        info!("Loaded {} positions from {}", accepted, source_file);
        Ok(accepted)
    }

    pub fn all(&self) -> &[NamedPosition] {
        &self.positions
    }

    /// Positions grouped by the file they were loaded from
    pub fn by_file(&self) -> BTreeMap<String, Vec<NamedPosition>> {
        let mut groups: BTreeMap<String, Vec<NamedPosition>> = BTreeMap::new();
        for position in &self.positions {
            groups
                .entry(position.source_file.clone())
                .or_default()
                .push(position.clone());
        }
        groups
    }

    /// Drop every position loaded from one file
    pub fn remove_by_file(&mut self, source_file: &str) -> usize {
        let before = self.positions.len();
        self.positions.retain(|p| p.source_file != source_file);
        before - self.positions.len()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[[position]]
name = "Guggenheim"
latitude = 43.2686
longitude = -2.9340
altitude = 12.0

[[position]]
name = "Trailhead"
latitude = 43.1200
longitude = -2.8000
"#;

    #[test]
    fn loads_valid_entries() {
        let mut store = PositionStore::new();
        assert_eq!(store.load_toml(SAMPLE, "spots.toml").unwrap(), 2);

        let all = store.all();
        assert_eq!(all[0].name, "Guggenheim");
        assert_eq!(all[0].altitude, Some(12.0));
        assert_eq!(all[1].altitude, None);
        assert!(all.iter().all(|p| p.source_file == "spots.toml"));
    }

    #[test]
    fn skips_incomplete_and_out_of_range_entries() {
        let content = r#"
[[position]]
name = "no coords"

[[position]]
name = "bad"
latitude = 95.0
longitude = 0.0

[[position]]
name = "good"
latitude = 1.0
longitude = 2.0
"#;
        let mut store = PositionStore::new();
        assert_eq!(store.load_toml(content, "mixed.toml").unwrap(), 1);
        assert_eq!(store.all()[0].name, "good");
    }

    #[test]
    fn rejects_unparseable_documents() {
        let mut store = PositionStore::new();
        let err = store.load_toml("not [ toml", "broken.toml").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn removes_by_source_file() {
        let mut store = PositionStore::new();
        store.load_toml(SAMPLE, "a.toml").unwrap();
        store.load_toml(SAMPLE, "b.toml").unwrap();

        assert_eq!(store.remove_by_file("a.toml"), 2);
        assert_eq!(store.all().len(), 2);
        assert!(store.all().iter().all(|p| p.source_file == "b.toml"));
        // removing again is a no-op
        assert_eq!(store.remove_by_file("a.toml"), 0);
    }

    #[test]
    fn groups_by_file() {
        let mut store = PositionStore::new();
        store.load_toml(SAMPLE, "b.toml").unwrap();
        store.load_toml(SAMPLE, "a.toml").unwrap();

        let groups = store.by_file();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["a.toml"].len(), 2);
        assert_eq!(groups["b.toml"].len(), 2);
    }
}
