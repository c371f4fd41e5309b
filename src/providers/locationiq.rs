//! LocationIQ forward geocoding

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{Provider, ProviderRequest, Providers};
use crate::resolver::Geocoder;
use crate::{GatewayError, Result};

/// One candidate from `search.php?format=json`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GeocodeCandidate {
    #[serde(default)]
    pub display_name: String,
    pub lat: Coordinate,
    pub lon: Coordinate,
}

/// LocationIQ sends coordinates as decimal strings; accept plain numbers too
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Coordinate {
    Number(f64),
    Text(String),
}

impl GeocodeCandidate {
    pub fn latitude(&self) -> Result<f64> {
        self.lat.degrees(90.0)
    }

    pub fn longitude(&self) -> Result<f64> {
        self.lon.degrees(180.0)
    }
}

impl Coordinate {
    /// Parse into decimal degrees within `-limit..=limit`
    pub fn degrees(&self, limit: f64) -> Result<f64> {
        let value = match self {
            Coordinate::Number(value) => Some(*value),
            Coordinate::Text(text) => text.trim().parse::<f64>().ok(),
        };

        match value {
            Some(degrees) if degrees.is_finite() && degrees.abs() <= limit => Ok(degrees),
            _ => Err(GatewayError::provider(
                Provider::Geocode.name(),
                format!("invalid coordinate '{}'", self.raw()),
            )),
        }
    }

    fn raw(&self) -> String {
        match self {
            Coordinate::Number(value) => value.to_string(),
            Coordinate::Text(text) => text.clone(),
        }
    }
}

#[async_trait]
impl Geocoder for Providers {
    async fn geocode(&self, query: &str) -> Result<Vec<GeocodeCandidate>> {
        let settings = self.settings(Provider::Geocode);
        debug!("Geocoding location: '{}'", query);

        let request = ProviderRequest::new(Provider::Geocode, &settings.base_url)
            .param("key", settings.key())
            .param("q", query)
            .param("format", "json");

        // "Unable to geocode" comes back as a 404
        let candidates: Vec<GeocodeCandidate> = self
            .client()
            .fetch_optional(request)
            .await?
            .unwrap_or_default();

        if candidates.is_empty() {
            warn!("No results found for location '{}'", query);
        } else {
            info!("Found {} geocoding results for '{}'", candidates.len(), query);
        }

        Ok(candidates)
    }
}
