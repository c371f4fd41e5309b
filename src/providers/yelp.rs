//! Yelp business search

use serde::Deserialize;

use super::{Provider, ProviderRequest, Providers};
use crate::Result;

/// Results per page; also the offset stride
pub const PAGE_SIZE: u32 = 5;

#[derive(Debug, Default, Deserialize)]
pub struct BusinessSearchResponse {
    #[serde(default, deserialize_with = "super::lenient_list")]
    pub businesses: Vec<BusinessRecord>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct BusinessRecord {
    #[serde(default, deserialize_with = "super::lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "super::lenient")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "super::lenient")]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "super::lenient")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "super::lenient")]
    pub url: Option<String>,
}

impl Providers {
    /// One page of restaurants near `location`, starting at `offset`
    pub async fn restaurants(&self, location: &str, offset: u32) -> Result<Vec<BusinessRecord>> {
        let settings = self.settings(Provider::Restaurants);
        let request = ProviderRequest::new(Provider::Restaurants, &settings.base_url)
            .param("term", "restaurants")
            .param("location", location)
            .param("locale", "en_US")
            .param("limit", PAGE_SIZE)
            .param("offset", offset)
            .bearer(settings.key());

        let response: BusinessSearchResponse = self.client().fetch(request).await?;
        Ok(response.businesses)
    }
}
