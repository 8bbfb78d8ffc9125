//! Address to coordinate lookup against a static district table.

pub mod gazetteer;
pub mod resolver;

use serde::{Deserialize, Serialize};

pub use gazetteer::{Gazetteer, GazetteerEntry};
pub use resolver::{LocationMatch, MatchType, ResolvedLocation};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}
