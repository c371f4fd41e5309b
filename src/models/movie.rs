use serde::{Deserialize, Serialize};

/// Movie search hit
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Movie {
    pub title: String,
    pub overview: String,
    pub average_votes: f64,
    pub total_votes: u64,
    /// Poster URL, empty when the provider has no poster for the movie
    pub image_url: String,
    pub popularity: f64,
    pub released_on: String,
}
