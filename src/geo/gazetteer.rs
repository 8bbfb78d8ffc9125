use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GazetteerEntry {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Immutable district table. Entries keep the order of the source table,
/// which is also the order the resolver tries them in.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    entries: Vec<GazetteerEntry>,
}

impl Gazetteer {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Trims names, lower-cases aliases, and drops repeated aliases within an
    /// entry. Entries with a blank or already seen name are skipped.
    pub fn from_entries(entries: impl IntoIterator<Item = GazetteerEntry>) -> Self {
        let mut names = HashSet::new();
        let mut kept = Vec::new();

        for mut entry in entries {
            entry.name = entry.name.trim().to_string();
            // A blank name is a substring of every address.
            if entry.name.is_empty() {
                warn!("blank district name in gazetteer; skipping");
                continue;
            }
            if !names.insert(entry.name.clone()) {
                warn!(district = %entry.name, "duplicate district in gazetteer; keeping first");
                continue;
            }

            let mut seen = HashSet::new();
            entry.aliases = entry
                .aliases
                .into_iter()
                .map(|alias| alias.trim().to_lowercase())
                .filter(|alias| !alias.is_empty() && seen.insert(alias.clone()))
                .collect();

            kept.push(entry);
        }

        Self { entries: kept }
    }

    /// Parses a JSON array of entries.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<GazetteerEntry> = serde_json::from_str(raw)?;
        Ok(Self::from_entries(entries))
    }

    /// Loads the table from disk. A missing or malformed file yields an empty
    /// gazetteer, so every later lookup simply finds nothing.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "gazetteer unreadable; location lookup disabled");
                return Self::empty();
            }
        };

        match Self::from_json(&raw) {
            Ok(gazetteer) => {
                info!(path = %path.display(), districts = gazetteer.len(), "gazetteer loaded");
                gazetteer
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "gazetteer malformed; location lookup disabled");
                Self::empty()
            }
        }
    }

    pub fn entries(&self) -> &[GazetteerEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&GazetteerEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, aliases: &[&str]) -> GazetteerEntry {
        GazetteerEntry {
            name: name.to_string(),
            latitude: 1.0,
            longitude: 2.0,
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn aliases_are_lowercased_and_deduplicated() {
        let gazetteer = Gazetteer::from_entries(vec![entry("Gulshan", &["GUL", "gul", " Gulshan-1 "])]);
        assert_eq!(gazetteer.entries()[0].aliases, vec!["gul", "gulshan-1"]);
    }

    #[test]
    fn later_duplicate_names_are_dropped() {
        let gazetteer = Gazetteer::from_entries(vec![
            entry("Banani", &["a"]),
            entry("Uttara", &[]),
            entry("Banani", &["b"]),
        ]);
        assert_eq!(gazetteer.len(), 2);
        assert_eq!(gazetteer.get("Banani").unwrap().aliases, vec!["a"]);
        assert_eq!(gazetteer.entries()[1].name, "Uttara");
    }

    #[test]
    fn blank_names_are_dropped() {
        let gazetteer = Gazetteer::from_entries(vec![
            entry("", &["x"]),
            entry("  ", &[]),
            entry(" Mirpur ", &["mirpur-10"]),
        ]);
        assert_eq!(gazetteer.len(), 1);
        assert_eq!(gazetteer.entries()[0].name, "Mirpur");
        assert!(gazetteer.resolve(Some("House 3, Road 5, Uttara")).is_none());
    }

    #[test]
    fn json_keeps_source_order() {
        let gazetteer = Gazetteer::from_json(
            r#"[
                {"name": "Mirpur", "latitude": 23.8, "longitude": 90.36, "aliases": ["Pallabi"]},
                {"name": "Dhanmondi", "latitude": 23.74, "longitude": 90.37}
            ]"#,
        )
        .unwrap();

        let names: Vec<_> = gazetteer.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Mirpur", "Dhanmondi"]);
        assert!(gazetteer.entries()[1].aliases.is_empty());
    }

    #[test]
    fn missing_file_loads_empty() {
        let gazetteer = Gazetteer::load("/nonexistent/districts.json");
        assert!(gazetteer.is_empty());
    }

    #[test]
    fn malformed_file_loads_empty() {
        let path = std::env::temp_dir().join(format!("gazetteer-{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, "{ not json").unwrap();

        let gazetteer = Gazetteer::load(&path);
        assert!(gazetteer.is_empty());

        let _ = fs::remove_file(path);
    }
}
