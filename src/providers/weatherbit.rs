//! Weatherbit daily forecast

use serde::Deserialize;

use super::{Provider, ProviderRequest, Providers};
use crate::Result;

/// Days requested from the provider
pub const FORECAST_DAYS: usize = 8;

#[derive(Debug, Default, Deserialize)]
pub struct ForecastResponse {
    #[serde(default, deserialize_with = "super::lenient_list")]
    pub data: Vec<ForecastDay>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ForecastDay {
    #[serde(default, deserialize_with = "super::lenient")]
    pub weather: Option<Conditions>,
    #[serde(default, deserialize_with = "super::lenient")]
    pub valid_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Conditions {
    #[serde(default, deserialize_with = "super::lenient")]
    pub description: Option<String>,
}

impl Providers {
    /// Daily forecast for the given coordinates
    pub async fn daily_forecast(&self, latitude: f64, longitude: f64) -> Result<Vec<ForecastDay>> {
        let settings = self.settings(Provider::Weather);
        let request = ProviderRequest::new(Provider::Weather, &settings.base_url)
            .param("key", settings.key())
            .param("days", FORECAST_DAYS)
            .param("lat", latitude)
            .param("lon", longitude);

        let response: ForecastResponse = self.client().fetch(request).await?;
        Ok(response.data)
    }
}
