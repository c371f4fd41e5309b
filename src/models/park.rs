use serde::{Deserialize, Serialize};

/// National park summary
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Park {
    pub name: String,
    /// "street, city, state, postal code"
    pub address: String,
    /// Entrance fee in dollars, 0 when the park lists none
    pub fee: f64,
    pub description: String,
    pub url: String,
}
