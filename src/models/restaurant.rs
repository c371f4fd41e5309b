use serde::{Deserialize, Serialize};

/// Restaurant listing
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Restaurant {
    pub name: String,
    pub image_url: String,
    /// Price tier such as "$$", empty when unknown
    pub price: String,
    pub rating: f64,
    pub url: String,
}
