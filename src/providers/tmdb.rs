//! The Movie Database title search

use serde::Deserialize;

use super::{Provider, ProviderRequest, Providers};
use crate::Result;

/// Image host prefix for `poster_path` values (which start with '/')
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

#[derive(Debug, Default, Deserialize)]
pub struct MovieSearchResponse {
    #[serde(default, deserialize_with = "super::lenient_list")]
    pub results: Vec<MovieRecord>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct MovieRecord {
    #[serde(default, deserialize_with = "super::lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "super::lenient")]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "super::lenient")]
    pub vote_average: Option<f64>,
    #[serde(default, deserialize_with = "super::lenient")]
    pub vote_count: Option<u64>,
    #[serde(default, deserialize_with = "super::lenient")]
    pub popularity: Option<f64>,
    #[serde(default, deserialize_with = "super::lenient")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "super::lenient")]
    pub poster_path: Option<String>,
}

impl Providers {
    /// Movies whose title matches the query
    pub async fn movies(&self, query: &str) -> Result<Vec<MovieRecord>> {
        let settings = self.settings(Provider::Movies);
        let request = ProviderRequest::new(Provider::Movies, &settings.base_url)
            .param("api_key", settings.key())
            .param("language", "en-US")
            .param("query", query);

        let response: MovieSearchResponse = self.client().fetch(request).await?;
        Ok(response.results)
    }
}
