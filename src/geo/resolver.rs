use std::fmt;

use serde::Serialize;

use super::{Gazetteer, GeoPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    DistrictName,
    Alias,
}

impl MatchType {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchType::DistrictName => "district_name",
            MatchType::Alias => "alias",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationMatch {
    pub district_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub match_type: MatchType,
    pub matched_text: String,
}

impl Gazetteer {
    /// First entry, in load order, whose name or one of whose aliases occurs
    /// in `address` ignoring case. An earlier entry shadows a later one even
    /// when the later one would be a longer match.
    pub fn resolve(&self, address: Option<&str>) -> Option<LocationMatch> {
        let normalized = address?.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }

        self.entries().iter().find_map(|entry| {
            let (match_type, matched_text) = if normalized.contains(&entry.name.to_lowercase()) {
                (MatchType::DistrictName, entry.name.clone())
            } else {
                let alias = entry
                    .aliases
                    .iter()
                    .find(|alias| normalized.contains(alias.as_str()))?;
                (MatchType::Alias, alias.clone())
            };

            Some(LocationMatch {
                district_name: entry.name.clone(),
                latitude: entry.latitude,
                longitude: entry.longitude,
                match_type,
                matched_text,
            })
        })
    }

    /// Resolves `address` and applies explicit coordinates on top.
    ///
    /// Explicit coordinates always win. The lookup still runs so its result
    /// can be reported, but it is then marked overridden.
    pub fn locate(&self, address: Option<&str>, explicit: Option<GeoPoint>) -> ResolvedLocation {
        let address = address
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string);
        let matched = self.resolve(address.as_deref());

        let (point, auto_detected) = match (explicit, matched.as_ref()) {
            (Some(point), _) => (Some(point), false),
            (None, Some(hit)) => (
                Some(GeoPoint {
                    lat: hit.latitude,
                    lng: hit.longitude,
                }),
                true,
            ),
            (None, None) => (None, false),
        };

        ResolvedLocation {
            overridden: explicit.is_some() && address.is_some(),
            auto_detected,
            point,
            address,
            matched,
        }
    }
}

/// Location to persist for a customer plus how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub address: Option<String>,
    pub point: Option<GeoPoint>,
    pub matched: Option<LocationMatch>,
    pub auto_detected: bool,
    pub overridden: bool,
}
