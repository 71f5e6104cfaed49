use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::models::{LocationQuery, Units};

/// Which lookup a cache entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Current,
    Forecast,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Current => "current",
            Operation::Forecast => "forecast",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical text form of a location for cache keys.
///
/// Coordinates are fixed to 4 decimals (about 11 m); city names are trimmed
/// and lowercased. The prefixes keep a city literally named like a coordinate
/// pair from sharing a key with it.
pub fn canonical_location(location: &LocationQuery) -> String {
    match location {
        LocationQuery::Coordinates { lat, lon } => {
            format!("coord:{:.4},{:.4}", round_coordinate(*lat), round_coordinate(*lon))
        }
        LocationQuery::City(city) => format!("city:{}", city.trim().to_lowercase()),
    }
}

/// Round to 4 decimals; adding 0.0 turns -0.0 into 0.0
fn round_coordinate(value: f64) -> f64 {
    (value * 1e4).round() / 1e4 + 0.0
}

/// Build the cache key for a lookup.
///
/// Only absent components are dropped before hashing; a day count of zero is
/// still part of the key.
pub fn build_key(
    operation: Operation,
    location: &LocationQuery,
    units: Units,
    days: Option<u8>,
) -> String {
    let components = [
        Some(operation.as_str().to_string()),
        Some(canonical_location(location)),
        Some(units.as_str().to_string()),
        days.map(|d| d.to_string()),
    ];

    let joined = components
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("|");

    let mut hasher = DefaultHasher::new();
    joined.hash(&mut hasher);
    format!("weather:{}:{:016x}", operation, hasher.finish())
}
