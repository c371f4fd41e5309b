//! National Park Service park search

use serde::Deserialize;

use super::{Provider, ProviderRequest, Providers};
use crate::Result;

/// Parks requested per search
pub const PARK_LIMIT: usize = 10;

#[derive(Debug, Default, Deserialize)]
pub struct ParksResponse {
    #[serde(default, deserialize_with = "super::lenient_list")]
    pub data: Vec<ParkRecord>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParkRecord {
    #[serde(default, deserialize_with = "super::lenient")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_list")]
    pub addresses: Vec<ParkAddress>,
    #[serde(default, deserialize_with = "super::lenient_list")]
    pub entrance_fees: Vec<EntranceFee>,
    #[serde(default, deserialize_with = "super::lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "super::lenient")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParkAddress {
    #[serde(default, deserialize_with = "super::lenient")]
    pub line1: Option<String>,
    #[serde(default, deserialize_with = "super::lenient")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "super::lenient")]
    pub state_code: Option<String>,
    #[serde(default, deserialize_with = "super::lenient")]
    pub postal_code: Option<String>,
}

/// NPS reports fees as decimal strings ("35.00")
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct EntranceFee {
    #[serde(default)]
    pub cost: Option<serde_json::Value>,
}

impl Providers {
    /// Parks matching a free-text query
    pub async fn parks(&self, query: &str) -> Result<Vec<ParkRecord>> {
        let settings = self.settings(Provider::Parks);
        let request = ProviderRequest::new(Provider::Parks, &settings.base_url)
            .param("q", query)
            .param("api_key", settings.key())
            .param("limit", PARK_LIMIT);

        let response: ParksResponse = self.client().fetch(request).await?;
        Ok(response.data)
    }
}
