use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::common::{DomainError, DomainResult};
use crate::domains::navigation::Position2D;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub position: Position2D,
}

/// Named destinations agents can be sent to. Lookups ignore case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationTable {
    entries: Vec<Location>,
}

/// Destinations used by the single-agent intent pipeline.
pub static TOWN: Lazy<LocationTable> = Lazy::new(|| {
    LocationTable::from_pairs([
        ("PARK", -7.0, 4.0),
        ("HOME", 3.0, -3.0),
        ("GYM", -8.0, -3.0),
        ("LIBRARY", 6.0, 4.0),
    ])
});

/// Meeting spots used by the negotiation scene.
pub static TEA: Lazy<LocationTable> = Lazy::new(|| {
    LocationTable::from_pairs([
        ("park", 5.0, 3.0),
        ("gym", -8.0, 4.8),
        ("cafe", -8.0, -6.0),
        ("home", 11.0, -6.0),
    ])
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationPreset {
    #[default]
    Town,
    Tea,
}

impl LocationPreset {
    pub fn table(&self) -> LocationTable {
        match self {
            LocationPreset::Town => TOWN.clone(),
            LocationPreset::Tea => TEA.clone(),
        }
    }
}

impl LocationTable {
    /// Build a table, rejecting empty or duplicate (case-insensitive) names.
    pub fn new(entries: Vec<Location>) -> DomainResult<Self> {
        for (i, entry) in entries.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(DomainError::InvalidCommand {
                    reason: "Location names must not be empty".to_string(),
                });
            }
            if entries[..i].iter().any(|e| e.name.eq_ignore_ascii_case(&entry.name)) {
                return Err(DomainError::InvalidCommand {
                    reason: format!("Duplicate location: {}", entry.name),
                });
            }
        }
        Ok(Self { entries })
    }

    fn from_pairs<const N: usize>(pairs: [(&str, f64, f64); N]) -> Self {
        Self {
            entries: pairs
                .iter()
                .map(|(name, x, y)| Location { name: name.to_string(), position: Position2D::new(*x, *y) })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Location> {
        let name = name.trim();
        self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    pub fn resolve(&self, name: &str) -> DomainResult<Position2D> {
        self.get(name)
            .map(|l| l.position)
            .ok_or_else(|| DomainError::UnknownLocation { name: name.trim().to_string() })
    }

    /// The known location mentioned earliest in `text`, matched as a case-insensitive substring.
    /// When two names start at the same offset the longer one wins.
    pub fn find_in(&self, text: &str) -> Option<&Location> {
        let haystack = text.to_lowercase();
        self.entries
            .iter()
            .filter_map(|e| haystack.find(&e.name.to_lowercase()).map(|at| (at, e)))
            .min_by(|(a, x), (b, y)| a.cmp(b).then(y.name.len().cmp(&x.name.len())))
            .map(|(_, e)| e)
    }

    /// Comma separated names, for prompts.
    pub fn describe(&self) -> String {
        self.names().collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_ignore_case() {
        let table = LocationPreset::Town.table();
        assert_eq!(table.resolve("park").unwrap(), Position2D::new(-7.0, 4.0));
        assert_eq!(table.resolve(" Library ").unwrap(), Position2D::new(6.0, 4.0));
        assert!(matches!(
            table.resolve("cafe"),
            Err(DomainError::UnknownLocation { name }) if name == "cafe"
        ));
    }

    #[test]
    fn presets_are_kept_apart() {
        assert!(TOWN.get("cafe").is_none());
        assert!(TEA.get("library").is_none());
        assert_ne!(TOWN.resolve("home").unwrap(), TEA.resolve("home").unwrap());
    }

    #[test]
    fn earliest_mention_wins() {
        let table = LocationPreset::Tea.table();
        let found = table.find_in("Home sounds nice but final choice: cafe").unwrap();
        assert_eq!(found.name, "home");
        assert!(table.find_in("no idea").is_none());
    }

    #[test]
    fn rejects_duplicate_names() {
        let entries = vec![
            Location { name: "Park".into(), position: Position2D::new(0.0, 0.0) },
            Location { name: "PARK".into(), position: Position2D::new(1.0, 1.0) },
        ];
        assert!(LocationTable::new(entries).is_err());
    }
}
