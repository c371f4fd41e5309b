//! Location model, the cached result of geocoding a search string

use serde::{Deserialize, Serialize};

/// A geocoded search string.
///
/// Identity is `search_query` exactly as the user typed it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Original user-entered city string
    pub search_query: String,
    /// Display name reported by the geocoding provider
    pub formatted_query: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(
        search_query: impl Into<String>,
        formatted_query: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            search_query: search_query.into(),
            formatted_query: formatted_query.into(),
            latitude,
            longitude,
        }
    }

    /// Store key for this location
    #[must_use]
    pub fn key(&self) -> &[u8] {
        self.search_query.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_key_is_raw_query() {
        let location = Location::new(" Seattle", "Seattle, WA, USA", 47.6, -122.3);
        assert_eq!(location.key(), b" Seattle");
    }

    #[test]
    fn test_location_serializes_wire_names() {
        let location = Location::new("Seattle", "Seattle, WA, USA", 47.6, -122.3);
        let json = serde_json::to_value(&location).unwrap();
        assert_eq!(json["search_query"], "Seattle");
        assert_eq!(json["formatted_query"], "Seattle, WA, USA");
        assert_eq!(json["latitude"], 47.6);
        assert_eq!(json["longitude"], -122.3);
    }
}
